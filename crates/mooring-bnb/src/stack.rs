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

//! Decision stack for the depth-first search.
//!
//! Decisions of all open tree levels live in one flat vector; `frames` holds
//! the index where each level starts. Popping a frame truncates the
//! decisions of the abandoned level.

use crate::branching::decision::Decision;

#[derive(Clone, Debug)]
pub struct SearchStack<T> {
    entries: Vec<Decision<T>>,
    frames: Vec<usize>,
}

impl<T> Default for SearchStack<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> SearchStack<T> {
    #[inline]
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            frames: Vec::new(),
        }
    }

    #[inline]
    pub fn preallocated(num_berths: usize, num_vessels: usize) -> Self {
        let mut stack = Self::new();
        stack.ensure_capacity(num_berths, num_vessels);
        stack
    }

    #[inline]
    pub fn ensure_capacity(&mut self, num_berths: usize, num_vessels: usize) {
        let entry_capacity = num_vessels.saturating_mul(num_berths);
        let frame_capacity = num_vessels.saturating_add(1);
        self.entries
            .reserve(entry_capacity.saturating_sub(self.entries.len()));
        self.frames
            .reserve(frame_capacity.saturating_sub(self.frames.len()));
    }

    #[inline]
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    #[inline]
    pub fn push_frame(&mut self) {
        self.frames.push(self.entries.len());
    }

    /// Drops the innermost level and its remaining decisions.
    #[inline]
    pub fn pop_frame(&mut self) -> bool {
        match self.frames.pop() {
            Some(start) => {
                self.entries.truncate(start);
                true
            }
            None => false,
        }
    }

    /// Pushes `decisions`, given best-first, so that the best one is popped
    /// first. Returns how many were pushed.
    #[inline]
    pub fn extend_best_first<I>(&mut self, decisions: I) -> usize
    where
        I: IntoIterator<Item = Decision<T>>,
    {
        let start = self.entries.len();
        self.entries.extend(decisions);
        self.entries[start..].reverse();
        self.entries.len() - start
    }

    #[inline]
    pub fn pop(&mut self) -> Option<Decision<T>> {
        if self.is_current_level_empty() {
            return None;
        }
        self.entries.pop()
    }

    #[inline]
    pub fn is_current_level_empty(&self) -> bool {
        match self.frames.last() {
            Some(&start) => self.entries.len() == start,
            None => true,
        }
    }

    #[inline]
    pub fn reset(&mut self) {
        self.entries.clear();
        self.frames.clear();
    }
}

impl<T> std::fmt::Display for SearchStack<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "SearchStack(entries: {}, frames: {})",
            self.entries.len(),
            self.frames.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mooring_model::index::{BerthIndex, VesselIndex};

    fn d(v: usize, b: usize, cost: i64) -> Decision<i64> {
        Decision::new(VesselIndex::new(v), BerthIndex::new(b), 0, cost)
    }

    #[test]
    fn test_best_first_pops_first() {
        let mut stack = SearchStack::new();
        stack.push_frame();
        let pushed = stack.extend_best_first(vec![d(0, 0, 1), d(1, 0, 2), d(2, 0, 3)]);
        assert_eq!(pushed, 3);
        assert_eq!(stack.pop(), Some(d(0, 0, 1)));
        assert_eq!(stack.pop(), Some(d(1, 0, 2)));
        assert_eq!(stack.pop(), Some(d(2, 0, 3)));
        assert_eq!(stack.pop(), None);
    }

    #[test]
    fn test_frames_isolate_levels() {
        let mut stack = SearchStack::preallocated(2, 3);
        stack.push_frame();
        stack.extend_best_first(vec![d(0, 0, 1), d(0, 1, 2)]);
        stack.push_frame();
        assert!(stack.is_current_level_empty());
        assert_eq!(stack.pop(), None);

        stack.extend_best_first(vec![d(1, 0, 5)]);
        assert_eq!(stack.depth(), 2);
        assert_eq!(stack.to_string(), "SearchStack(entries: 3, frames: 2)");

        assert!(stack.pop_frame());
        assert_eq!(stack.entries.len(), 2);
        assert_eq!(stack.pop(), Some(d(0, 0, 1)));
    }

    #[test]
    fn test_pop_frame_truncates_and_reset_clears() {
        let mut stack = SearchStack::new();
        assert!(!stack.pop_frame());
        stack.push_frame();
        stack.extend_best_first(vec![d(0, 0, 1)]);
        stack.push_frame();
        stack.extend_best_first(vec![d(1, 0, 1), d(1, 1, 2)]);
        assert!(stack.pop_frame());
        assert_eq!(stack.entries.len(), 1);
        stack.reset();
        assert_eq!(stack.depth(), 0);
        assert_eq!(stack.to_string(), "SearchStack(entries: 0, frames: 0)");
    }
}
