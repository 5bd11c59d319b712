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

//! Search state of the branch-and-bound engine.
//!
//! `SearchState` is the mutable partial schedule the engine walks up and down
//! the tree with. It tracks
//!
//! - which vessels are assigned (a `FixedBitSet`), and where and when,
//! - the release time of every berth (`berth_free_times`), i.e. the finish
//!   time of the last vessel the search placed there,
//! - the objective accumulated so far,
//! - the last decision (time, vessel, berth) for chronological symmetry
//!   breaking.
//!
//! Fixed assignments are marked as assigned but do not move a berth's
//! release time; their windows are carved out of the berth availability
//! instead.
//!
//! Accessors come in checked and `_unchecked` flavours. The unchecked ones
//! only `debug_assert!` their preconditions and are meant for the hot loops of
//! the decision builders and evaluators.

use fixedbitset::FixedBitSet;
use mooring_model::{
    index::{BerthIndex, VesselIndex},
    solution::Solution,
};
use num_traits::{Bounded, PrimInt, Signed, Zero};

#[derive(Debug, Clone)]
pub struct SearchState<T> {
    berth_free_times: Vec<T>,
    vessel_start_times: Vec<T>,
    vessel_berths: Vec<BerthIndex>,
    vessel_assignments: FixedBitSet,
    current_objective: T,
    last_decision_time: T,
    last_decision_vessel: VesselIndex,
    last_decision_berth: BerthIndex,
    num_vessels: usize,
    num_assigned_vessels: usize,
}

impl<T> SearchState<T> {
    #[inline]
    pub fn new(num_berths: usize, num_vessels: usize) -> Self
    where
        T: Copy + Zero + Bounded,
    {
        Self {
            berth_free_times: vec![T::zero(); num_berths],
            vessel_start_times: vec![T::zero(); num_vessels],
            vessel_berths: vec![BerthIndex::new(0); num_vessels],
            vessel_assignments: FixedBitSet::with_capacity(num_vessels),
            current_objective: T::zero(),
            last_decision_time: T::min_value(),
            last_decision_vessel: VesselIndex::new(0),
            last_decision_berth: BerthIndex::new(0),
            num_vessels,
            num_assigned_vessels: 0,
        }
    }

    #[inline]
    pub fn num_berths(&self) -> usize {
        self.berth_free_times.len()
    }

    #[inline]
    pub fn num_vessels(&self) -> usize {
        self.num_vessels
    }

    #[inline]
    pub fn num_assigned_vessels(&self) -> usize {
        self.num_assigned_vessels
    }

    #[inline]
    pub fn is_complete(&self) -> bool {
        self.num_assigned_vessels == self.num_vessels
    }

    #[inline]
    pub fn current_objective(&self) -> T
    where
        T: Copy,
    {
        self.current_objective
    }

    #[inline]
    pub fn set_current_objective(&mut self, objective: T) {
        self.current_objective = objective;
    }

    /// Start time of the most recent decision, `T::min_value()` at the root.
    #[inline]
    pub fn last_decision_time(&self) -> T
    where
        T: Copy,
    {
        self.last_decision_time
    }

    #[inline]
    pub fn last_decision_vessel(&self) -> VesselIndex {
        self.last_decision_vessel
    }

    #[inline]
    pub fn last_decision_berth(&self) -> BerthIndex {
        self.last_decision_berth
    }

    /// Returns `true` while no search decision has been applied.
    #[inline]
    pub fn is_root(&self) -> bool
    where
        T: PrimInt,
    {
        self.last_decision_time == T::min_value()
    }

    #[inline]
    pub fn set_last_decision(
        &mut self,
        time: T,
        vessel_index: VesselIndex,
        berth_index: BerthIndex,
    ) {
        debug_assert!(
            vessel_index.get() < self.num_vessels,
            "called `SearchState::set_last_decision` with vessel index out of bounds: the len is {} but the index is {}",
            self.num_vessels,
            vessel_index.get()
        );
        debug_assert!(
            berth_index.get() < self.num_berths(),
            "called `SearchState::set_last_decision` with berth index out of bounds: the len is {} but the index is {}",
            self.num_berths(),
            berth_index.get()
        );

        self.last_decision_time = time;
        self.last_decision_vessel = vessel_index;
        self.last_decision_berth = berth_index;
    }

    /// Forgets the last decision, as at the root.
    #[inline]
    pub fn reset_last_decision(&mut self)
    where
        T: Bounded,
    {
        self.last_decision_time = T::min_value();
        self.last_decision_vessel = VesselIndex::new(0);
        self.last_decision_berth = BerthIndex::new(0);
    }

    /// # Panics
    ///
    /// Panics if `vessel_index` is not in `0..num_vessels()`.
    #[inline]
    pub fn is_vessel_assigned(&self, vessel_index: VesselIndex) -> bool {
        let index = vessel_index.get();
        assert!(
            index < self.num_vessels,
            "called `SearchState::is_vessel_assigned` with vessel index out of bounds: the len is {} but the index is {}",
            self.num_vessels,
            index
        );
        self.vessel_assignments.contains(index)
    }

    /// # Safety
    ///
    /// `vessel_index` must be in `0..num_vessels()`.
    #[inline]
    pub unsafe fn is_vessel_assigned_unchecked(&self, vessel_index: VesselIndex) -> bool {
        let index = vessel_index.get();
        debug_assert!(
            index < self.num_vessels,
            "called `SearchState::is_vessel_assigned_unchecked` with vessel index out of bounds: the len is {} but the index is {}",
            self.num_vessels,
            index
        );
        unsafe { self.vessel_assignments.contains_unchecked(index) }
    }

    /// Iterates the vessels that still need a decision.
    #[inline]
    pub fn unassigned_vessels(&self) -> impl Iterator<Item = VesselIndex> + '_ {
        self.vessel_assignments
            .zeroes()
            .take_while(|&v| v < self.num_vessels)
            .map(VesselIndex::new)
    }

    /// # Panics
    ///
    /// Panics if `vessel_index` is out of bounds or already assigned.
    #[inline]
    pub fn assign_vessel(&mut self, vessel_index: VesselIndex, berth_index: BerthIndex, start_time: T) {
        let index = vessel_index.get();
        assert!(
            index < self.num_vessels,
            "called `SearchState::assign_vessel` with vessel index out of bounds: the len is {} but the index is {}",
            self.num_vessels,
            index
        );
        assert!(
            !self.vessel_assignments.contains(index),
            "called `SearchState::assign_vessel` with vessel {} already assigned",
            index
        );

        self.vessel_assignments.insert(index);
        self.vessel_start_times[index] = start_time;
        self.vessel_berths[index] = berth_index;
        self.num_assigned_vessels += 1;
    }

    /// # Panics
    ///
    /// Panics if `vessel_index` is out of bounds or not assigned.
    #[inline]
    pub fn unassign_vessel(&mut self, vessel_index: VesselIndex) {
        let index = vessel_index.get();
        assert!(
            index < self.num_vessels,
            "called `SearchState::unassign_vessel` with vessel index out of bounds: the len is {} but the index is {}",
            self.num_vessels,
            index
        );
        assert!(
            self.vessel_assignments.contains(index),
            "called `SearchState::unassign_vessel` with vessel {} not assigned",
            index
        );

        self.vessel_assignments.set(index, false);
        self.num_assigned_vessels -= 1;
    }

    /// # Panics
    ///
    /// Panics if `vessel_index` is out of bounds. The value is meaningless for
    /// an unassigned vessel.
    #[inline]
    pub fn vessel_start_time(&self, vessel_index: VesselIndex) -> T
    where
        T: Copy,
    {
        let index = vessel_index.get();
        assert!(
            index < self.num_vessels,
            "called `SearchState::vessel_start_time` with vessel index out of bounds: the len is {} but the index is {}",
            self.num_vessels,
            index
        );
        debug_assert!(self.vessel_assignments.contains(index));
        self.vessel_start_times[index]
    }

    #[inline]
    pub fn vessel_berth(&self, vessel_index: VesselIndex) -> BerthIndex {
        let index = vessel_index.get();
        assert!(
            index < self.num_vessels,
            "called `SearchState::vessel_berth` with vessel index out of bounds: the len is {} but the index is {}",
            self.num_vessels,
            index
        );
        debug_assert!(self.vessel_assignments.contains(index));
        self.vessel_berths[index]
    }

    #[inline]
    pub fn berth_free_times(&self) -> &[T] {
        &self.berth_free_times
    }

    /// # Panics
    ///
    /// Panics if `berth_index` is not in `0..num_berths()`.
    #[inline]
    pub fn berth_free_time(&self, berth_index: BerthIndex) -> T
    where
        T: Copy,
    {
        let index = berth_index.get();
        assert!(
            index < self.num_berths(),
            "called `SearchState::berth_free_time` with berth index out of bounds: the len is {} but the index is {}",
            self.num_berths(),
            index
        );
        self.berth_free_times[index]
    }

    /// # Safety
    ///
    /// `berth_index` must be in `0..num_berths()`.
    #[inline]
    pub unsafe fn berth_free_time_unchecked(&self, berth_index: BerthIndex) -> T
    where
        T: Copy,
    {
        let index = berth_index.get();
        debug_assert!(
            index < self.num_berths(),
            "called `SearchState::berth_free_time_unchecked` with berth index out of bounds: the len is {} but the index is {}",
            self.num_berths(),
            index
        );
        unsafe { *self.berth_free_times.get_unchecked(index) }
    }

    #[inline]
    pub fn set_berth_free_time(&mut self, berth_index: BerthIndex, time: T) {
        let index = berth_index.get();
        assert!(
            index < self.num_berths(),
            "called `SearchState::set_berth_free_time` with berth index out of bounds: the len is {} but the index is {}",
            self.num_berths(),
            index
        );
        self.berth_free_times[index] = time;
    }

    /// Restores the root state, keeping the allocations.
    #[inline]
    pub fn reset(&mut self)
    where
        T: Copy + Zero + Bounded,
    {
        self.berth_free_times.fill(T::zero());
        self.vessel_start_times.fill(T::zero());
        self.vessel_berths.fill(BerthIndex::new(0));
        self.vessel_assignments.clear();
        self.current_objective = T::zero();
        self.last_decision_time = T::min_value();
        self.last_decision_vessel = VesselIndex::new(0);
        self.last_decision_berth = BerthIndex::new(0);
        self.num_assigned_vessels = 0;
    }
}

impl<T> std::fmt::Display for SearchState<T>
where
    T: std::fmt::Display,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "State(objective: {}, assigned_vessels: {}/{})",
            self.current_objective, self.num_assigned_vessels, self.num_vessels
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IncompleteSolutionError {
    assigned_vessels: usize,
    total_vessels: usize,
}

impl std::fmt::Display for IncompleteSolutionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "incomplete solution: assigned {}/{} vessels",
            self.assigned_vessels, self.total_vessels
        )
    }
}

impl std::error::Error for IncompleteSolutionError {}

impl<T> TryFrom<&SearchState<T>> for Solution<T>
where
    T: PrimInt + Signed,
{
    type Error = IncompleteSolutionError;

    fn try_from(state: &SearchState<T>) -> Result<Self, Self::Error> {
        if !state.is_complete() {
            return Err(IncompleteSolutionError {
                assigned_vessels: state.num_assigned_vessels,
                total_vessels: state.num_vessels,
            });
        }

        Ok(Solution::new(
            state.current_objective,
            state.vessel_berths.clone(),
            state.vessel_start_times.clone(),
        ))
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
    fn test_new_initial_state() {
        let s: SearchState<i64> = SearchState::new(3, 5);
        assert_eq!(s.num_berths(), 3);
        assert_eq!(s.num_vessels(), 5);
        assert_eq!(s.num_assigned_vessels(), 0);
        assert_eq!(s.current_objective(), 0);
        assert_eq!(s.last_decision_time(), i64::MIN);
        assert!(s.is_root());
        assert!(s.berth_free_times().iter().all(|&t| t == 0));
        assert_eq!(s.unassigned_vessels().count(), 5);
    }

    #[test]
    fn test_assignment_lifecycle() {
        let mut s: SearchState<i64> = SearchState::new(2, 3);
        s.assign_vessel(v(1), b(1), 7);
        assert!(s.is_vessel_assigned(v(1)));
        assert_eq!(s.vessel_berth(v(1)), b(1));
        assert_eq!(s.vessel_start_time(v(1)), 7);
        assert_eq!(
            s.unassigned_vessels().collect::<Vec<_>>(),
            vec![v(0), v(2)]
        );

        s.unassign_vessel(v(1));
        assert!(!s.is_vessel_assigned(v(1)));
        assert_eq!(s.num_assigned_vessels(), 0);
    }

    #[test]
    #[should_panic(expected = "already assigned")]
    fn test_double_assignment_panics() {
        let mut s: SearchState<i64> = SearchState::new(1, 1);
        s.assign_vessel(v(0), b(0), 0);
        s.assign_vessel(v(0), b(0), 1);
    }

    #[test]
    #[should_panic(expected = "vessel index out of bounds: the len is 2 but the index is 5")]
    fn test_out_of_bounds_vessel_panics() {
        let s: SearchState<i64> = SearchState::new(1, 2);
        s.is_vessel_assigned(v(5));
    }

    #[test]
    fn test_last_decision_and_reset() {
        let mut s: SearchState<i64> = SearchState::new(2, 2);
        s.set_last_decision(4, v(1), b(1));
        s.set_berth_free_time(b(1), 9);
        s.set_current_objective(12);
        s.assign_vessel(v(1), b(1), 4);
        assert!(!s.is_root());
        assert_eq!(s.last_decision_vessel(), v(1));
        assert_eq!(s.last_decision_berth(), b(1));

        s.reset();
        assert!(s.is_root());
        assert_eq!(s.berth_free_time(b(1)), 0);
        assert_eq!(s.current_objective(), 0);
        assert_eq!(s.num_assigned_vessels(), 0);
    }

    #[test]
    fn test_try_from_solution() {
        let mut s: SearchState<i64> = SearchState::new(2, 2);
        s.assign_vessel(v(0), b(1), 3);
        let err = Solution::try_from(&s).unwrap_err();
        assert_eq!(err.to_string(), "incomplete solution: assigned 1/2 vessels");

        s.assign_vessel(v(1), b(0), 5);
        s.set_current_objective(20);
        let solution = Solution::try_from(&s).unwrap();
        assert_eq!(solution.objective_value(), 20);
        assert_eq!(solution.berths(), &[b(1), b(0)]);
        assert_eq!(solution.start_times(), &[3, 5]);
    }
}
