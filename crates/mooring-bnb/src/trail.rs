// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! Undo trail for the depth-first search.
//!
//! Every decision applied to the `SearchState` pushes one `TrailEntry` with
//! the values it overwrote. A `FrameEntry` marks where a tree level starts and
//! remembers the last decision of the parent, so [`SearchTrail::backtrack`]
//! can restore the parent state exactly.

use crate::state::SearchState;
use mooring_model::index::{BerthIndex, VesselIndex};
use num_traits::PrimInt;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct TrailEntry<T> {
    old_berth_time: T,
    old_objective: T,
    berth_index: BerthIndex,
    vessel_index: VesselIndex,
}

#[derive(Copy, Debug, Clone, PartialEq, Eq, Hash)]
pub struct FrameEntry<T> {
    previous_last_decision_time: T,
    previous_last_decision_vessel: VesselIndex,
    previous_last_decision_berth: BerthIndex,
    entry_start_index: usize,
}

#[derive(Debug, Clone)]
pub struct SearchTrail<T> {
    entries: Vec<TrailEntry<T>>,
    frames: Vec<FrameEntry<T>>,
}

impl<T> Default for SearchTrail<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> SearchTrail<T> {
    #[inline]
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            frames: Vec::new(),
        }
    }

    #[inline]
    pub fn preallocated(num_vessels: usize) -> Self {
        Self {
            entries: Vec::with_capacity(num_vessels),
            frames: Vec::with_capacity(num_vessels + 1),
        }
    }

    /// Makes sure a full-depth dive does not reallocate.
    pub fn ensure_capacity(&mut self, num_vessels: usize) {
        self.entries
            .reserve(num_vessels.saturating_sub(self.entries.len()));
        self.frames
            .reserve((num_vessels + 1).saturating_sub(self.frames.len()));
    }

    #[inline]
    pub fn push_frame(&mut self, state: &SearchState<T>)
    where
        T: PrimInt,
    {
        self.frames.push(FrameEntry {
            previous_last_decision_time: state.last_decision_time(),
            previous_last_decision_vessel: state.last_decision_vessel(),
            previous_last_decision_berth: state.last_decision_berth(),
            entry_start_index: self.entries.len(),
        });
    }

    /// Assigns `vessel_index` to `berth_index` at `start_time`, moving the
    /// berth's release time to `new_berth_time` and the objective to
    /// `new_objective`, and records what it overwrote.
    pub fn apply_assignment(
        &mut self,
        state: &mut SearchState<T>,
        berth_index: BerthIndex,
        vessel_index: VesselIndex,
        start_time: T,
        new_berth_time: T,
        new_objective: T,
    ) where
        T: PrimInt,
    {
        debug_assert!(
            !state.is_vessel_assigned(vessel_index),
            "called `SearchTrail::apply_assignment` with vessel {} which is already assigned",
            vessel_index
        );

        self.entries.push(TrailEntry {
            old_berth_time: state.berth_free_time(berth_index),
            old_objective: state.current_objective(),
            berth_index,
            vessel_index,
        });

        state.set_berth_free_time(berth_index, new_berth_time);
        state.assign_vessel(vessel_index, berth_index, start_time);
        state.set_current_objective(new_objective);
        state.set_last_decision(start_time, vessel_index, berth_index);
    }

    /// Pops the innermost frame and undoes every entry recorded since it
    /// was pushed. Returns `false` if there was no frame.
    pub fn backtrack(&mut self, state: &mut SearchState<T>) -> bool
    where
        T: PrimInt,
    {
        let Some(frame) = self.frames.pop() else {
            return false;
        };

        while self.entries.len() > frame.entry_start_index {
            let Some(entry) = self.entries.pop() else {
                break;
            };
            state.unassign_vessel(entry.vessel_index);
            state.set_berth_free_time(entry.berth_index, entry.old_berth_time);
            state.set_current_objective(entry.old_objective);
        }

        if frame.previous_last_decision_time == T::min_value() {
            state.reset_last_decision();
        } else {
            state.set_last_decision(
                frame.previous_last_decision_time,
                frame.previous_last_decision_vessel,
                frame.previous_last_decision_berth,
            );
        }
        true
    }

    #[inline]
    pub fn reset(&mut self) {
        self.entries.clear();
        self.frames.clear();
    }
}

impl<T> std::fmt::Display for SearchTrail<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "SearchTrail(entries: {}, frames: {})",
            self.entries.len(),
            self.frames.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(i: usize) -> VesselIndex {
        VesselIndex::new(i)
    }

    fn b(i: usize) -> BerthIndex {
        BerthIndex::new(i)
    }

    #[test]
    fn test_apply_and_backtrack_restores_state() {
        let mut state: SearchState<i64> = SearchState::new(2, 3);
        let mut trail = SearchTrail::preallocated(3);

        trail.push_frame(&state);
        trail.apply_assignment(&mut state, b(0), v(1), 2, 12, 12);
        assert_eq!(state.berth_free_time(b(0)), 12);
        assert_eq!(state.current_objective(), 12);
        assert_eq!(state.last_decision_time(), 2);

        trail.push_frame(&state);
        trail.apply_assignment(&mut state, b(1), v(0), 5, 9, 21);
        assert_eq!(trail.frames.len(), 2);
        assert_eq!(trail.entries.len(), 2);

        assert!(trail.backtrack(&mut state));
        assert!(!state.is_vessel_assigned(v(0)));
        assert_eq!(state.berth_free_time(b(1)), 0);
        assert_eq!(state.current_objective(), 12);
        assert_eq!(state.last_decision_time(), 2);
        assert_eq!(state.last_decision_vessel(), v(1));
        assert_eq!(state.last_decision_berth(), b(0));

        assert!(trail.backtrack(&mut state));
        assert!(state.is_root());
        assert_eq!(state.num_assigned_vessels(), 0);
        assert_eq!(state.current_objective(), 0);

        assert!(!trail.backtrack(&mut state));
        assert!(trail.frames.is_empty());
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut state: SearchState<i64> = SearchState::new(1, 1);
        let mut trail = SearchTrail::new();
        trail.push_frame(&state);
        trail.apply_assignment(&mut state, b(0), v(0), 0, 3, 3);
        trail.reset();
        assert_eq!(trail.to_string(), "SearchTrail(entries: 0, frames: 0)");
    }
}
