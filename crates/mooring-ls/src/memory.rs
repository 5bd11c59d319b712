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

//! Search memory: the genotype, its undo journal and two decoded schedules.
//!
//! The genotype is a `VesselPriorityQueue` plus one preferred berth per
//! vessel. Operators edit it through a [`Mutator`], the decoder fills the
//! `candidate` schedule from it, and the engine then either accepts the
//! candidate (the schedules swap roles) or discards it (the journal is
//! rolled back). Buffers are kept between runs.

use crate::{mutator::Mutator, queue::VesselPriorityQueue, undo::UndoLog};
use mooring_model::{
    index::{BerthIndex, VesselIndex},
    solution::Solution,
};
use mooring_search::num::SolverNumeric;

/// A decoded schedule. Mirrors [`Solution`] but is reused in place.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Schedule<T> {
    objective_value: T,
    berths: Vec<BerthIndex>,
    start_times: Vec<T>,
}

impl<T> Schedule<T>
where
    T: SolverNumeric,
{
    #[inline]
    pub fn new() -> Self {
        Self {
            objective_value: T::zero(),
            berths: Vec::new(),
            start_times: Vec::new(),
        }
    }

    #[inline]
    pub fn preallocated(num_vessels: usize) -> Self {
        Self {
            objective_value: T::zero(),
            berths: Vec::with_capacity(num_vessels),
            start_times: Vec::with_capacity(num_vessels),
        }
    }

    #[inline]
    pub fn num_vessels(&self) -> usize {
        self.berths.len()
    }

    #[inline]
    pub fn objective_value(&self) -> T {
        self.objective_value
    }

    #[inline]
    pub fn berths(&self) -> &[BerthIndex] {
        &self.berths
    }

    #[inline]
    pub fn start_times(&self) -> &[T] {
        &self.start_times
    }

    /// # Panics
    ///
    /// Panics if `vessel_index` is out of bounds.
    #[inline]
    pub fn berth_for_vessel(&self, vessel_index: VesselIndex) -> BerthIndex {
        let index = vessel_index.get();
        assert!(
            index < self.num_vessels(),
            "called `Schedule::berth_for_vessel` with vessel index out of bounds: the len is {} but the index is {}",
            self.num_vessels(),
            index
        );
        self.berths[index]
    }

    /// # Panics
    ///
    /// Panics if `vessel_index` is out of bounds.
    #[inline]
    pub fn start_time_for_vessel(&self, vessel_index: VesselIndex) -> T {
        let index = vessel_index.get();
        assert!(
            index < self.num_vessels(),
            "called `Schedule::start_time_for_vessel` with vessel index out of bounds: the len is {} but the index is {}",
            self.num_vessels(),
            index
        );
        self.start_times[index]
    }

    /// Copies `solution` into this schedule, reusing the buffers.
    pub fn copy_from_solution(&mut self, solution: &Solution<T>) {
        self.objective_value = solution.objective_value();
        self.berths.clear();
        self.berths.extend_from_slice(solution.berths());
        self.start_times.clear();
        self.start_times.extend_from_slice(solution.start_times());
    }

    /// Sizes the schedule for `num_vessels` vessels and zeroes the objective.
    /// Entries keep stale values until they are assigned.
    pub(crate) fn reset(&mut self, num_vessels: usize) {
        self.objective_value = T::zero();
        self.berths.resize(num_vessels, BerthIndex::new(0));
        self.start_times.resize(num_vessels, T::zero());
    }

    #[inline]
    pub(crate) fn assign(&mut self, vessel_index: VesselIndex, berth_index: BerthIndex, start: T) {
        let index = vessel_index.get();
        self.berths[index] = berth_index;
        self.start_times[index] = start;
    }

    #[inline]
    pub(crate) fn set_objective_value(&mut self, objective_value: T) {
        self.objective_value = objective_value;
    }
}

impl<T> Default for Schedule<T>
where
    T: SolverNumeric,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> From<&Solution<T>> for Schedule<T>
where
    T: SolverNumeric,
{
    fn from(solution: &Solution<T>) -> Self {
        let mut schedule = Schedule::preallocated(solution.num_vessels());
        schedule.copy_from_solution(solution);
        schedule
    }
}

impl<T> From<Schedule<T>> for Solution<T>
where
    T: SolverNumeric,
{
    fn from(schedule: Schedule<T>) -> Self {
        Solution::new(schedule.objective_value, schedule.berths, schedule.start_times)
    }
}

impl<T> std::fmt::Display for Schedule<T>
where
    T: SolverNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Schedule(objective: {}, [", self.objective_value)?;
        for (i, (berth, start)) in self.berths.iter().zip(&self.start_times).enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}@{}", berth.get(), start)?;
        }
        write!(f, "])")
    }
}

/// The genotype of the best rejected candidate of a sweep, kept for
/// policies that move to it once the sweep is exhausted.
#[derive(Debug, Clone)]
struct Fallback<T> {
    queue: Vec<VesselIndex>,
    preferred_berths: Vec<BerthIndex>,
    schedule: Schedule<T>,
    present: bool,
}

#[derive(Debug, Clone)]
pub struct SearchMemory<T> {
    queue: VesselPriorityQueue,
    preferred_berths: Vec<BerthIndex>,
    undo_log: UndoLog,
    current: Schedule<T>,
    candidate: Schedule<T>,
    fallback: Fallback<T>,
}

impl<T> Default for SearchMemory<T>
where
    T: SolverNumeric,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> SearchMemory<T>
where
    T: SolverNumeric,
{
    pub fn new() -> Self {
        Self::preallocated(0)
    }

    pub fn preallocated(num_vessels: usize) -> Self {
        Self {
            queue: VesselPriorityQueue::preallocated(num_vessels),
            preferred_berths: Vec::with_capacity(num_vessels),
            undo_log: UndoLog::preallocated(num_vessels),
            current: Schedule::preallocated(num_vessels),
            candidate: Schedule::preallocated(num_vessels),
            fallback: Fallback {
                queue: Vec::with_capacity(num_vessels),
                preferred_berths: Vec::with_capacity(num_vessels),
                schedule: Schedule::preallocated(num_vessels),
                present: false,
            },
        }
    }

    /// Loads `solution` as the current schedule. Vessels are queued by start
    /// time (ties by index) and prefer the berth they occupy.
    pub fn initialize(&mut self, solution: &Solution<T>) {
        let start_times = solution.start_times();
        self.queue
            .fill_sorted_by_key(solution.num_vessels(), |v| start_times[v.get()]);
        self.preferred_berths.clear();
        self.preferred_berths.extend_from_slice(solution.berths());
        self.undo_log.clear();
        self.current.copy_from_solution(solution);
        self.candidate.copy_from_solution(solution);
        self.fallback.present = false;
    }

    #[inline]
    pub fn num_vessels(&self) -> usize {
        self.queue.len()
    }

    #[inline]
    pub fn queue(&self) -> &VesselPriorityQueue {
        &self.queue
    }

    #[inline]
    pub fn preferred_berths(&self) -> &[BerthIndex] {
        &self.preferred_berths
    }

    #[inline]
    pub fn current_schedule(&self) -> &Schedule<T> {
        &self.current
    }

    #[inline]
    pub fn candidate_schedule(&self) -> &Schedule<T> {
        &self.candidate
    }

    /// Starts a new mutation: the genotype as it is now becomes the state a
    /// rollback returns to.
    pub fn prepare_operator(&mut self) -> (&Schedule<T>, Mutator<'_>) {
        self.undo_log.clear();
        (
            &self.current,
            Mutator::new(&mut self.queue, &mut self.preferred_berths, &mut self.undo_log),
        )
    }

    /// What the decoder reads and the schedule it writes.
    pub fn evaluation_target(
        &mut self,
    ) -> (&VesselPriorityQueue, &[BerthIndex], &mut Schedule<T>) {
        (&self.queue, &self.preferred_berths, &mut self.candidate)
    }

    /// Makes the decoded candidate the current schedule. The preferred
    /// berths follow the berths actually used, so fallbacks taken by the
    /// decoder become part of the genotype.
    pub fn accept_candidate(&mut self) {
        std::mem::swap(&mut self.current, &mut self.candidate);
        self.sync_preferred_berths();
        self.undo_log.clear();
        self.fallback.present = false;
    }

    /// Rolls the genotype back to where the last mutation started.
    pub fn discard_candidate(&mut self) {
        self.undo_log
            .apply_rollback(&mut self.queue, &mut self.preferred_berths);
    }

    /// Keeps the mutated genotype and the decoded candidate if it beats the
    /// one kept so far. Call before [`Self::discard_candidate`].
    pub fn record_fallback(&mut self) {
        let fallback = &mut self.fallback;
        if fallback.present
            && fallback.schedule.objective_value() <= self.candidate.objective_value()
        {
            return;
        }
        fallback.queue.clear();
        fallback.queue.extend_from_slice(self.queue.as_slice());
        fallback.preferred_berths.clone_from(&self.preferred_berths);
        fallback.schedule.clone_from(&self.candidate);
        fallback.present = true;
    }

    #[inline]
    pub fn has_fallback(&self) -> bool {
        self.fallback.present
    }

    /// Forgets the kept candidate.
    #[inline]
    pub fn clear_fallback(&mut self) {
        self.fallback.present = false;
    }

    /// Moves to the kept candidate. Returns `false` if there is none.
    pub fn adopt_fallback(&mut self) -> bool {
        if !self.fallback.present {
            return false;
        }
        self.undo_log.clear();
        let queue = self.queue.buffer_mut();
        queue.clear();
        queue.extend_from_slice(&self.fallback.queue);
        self.current.clone_from(&self.fallback.schedule);
        self.sync_preferred_berths();
        self.fallback.present = false;
        debug_assert!(self.queue.is_permutation());
        true
    }

    fn sync_preferred_berths(&mut self) {
        self.preferred_berths.clear();
        self.preferred_berths.extend_from_slice(self.current.berths());
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

    fn solution() -> Solution<i64> {
        Solution::new(60, vec![b(1), b(0), b(0)], vec![20, 0, 10])
    }

    #[test]
    fn test_initialize_orders_queue_by_start_time() {
        let mut memory = SearchMemory::<i64>::new();
        memory.initialize(&solution());
        assert_eq!(memory.queue().as_slice(), &[v(1), v(2), v(0)]);
        assert_eq!(memory.preferred_berths(), &[b(1), b(0), b(0)]);
        assert_eq!(memory.current_schedule().objective_value(), 60);
        assert_eq!(memory.num_vessels(), 3);
    }

    #[test]
    fn test_discard_rolls_back_genotype() {
        let mut memory = SearchMemory::<i64>::preallocated(3);
        memory.initialize(&solution());
        {
            let (_, mut mutator) = memory.prepare_operator();
            mutator.swap(0, 2);
            mutator.set_preferred_berth(v(2), b(1));
        }
        assert_eq!(memory.queue().as_slice(), &[v(0), v(2), v(1)]);
        memory.discard_candidate();
        assert_eq!(memory.queue().as_slice(), &[v(1), v(2), v(0)]);
        assert_eq!(memory.preferred_berths(), &[b(1), b(0), b(0)]);
    }

    #[test]
    fn test_accept_swaps_schedules_and_syncs_berths() {
        let mut memory = SearchMemory::<i64>::new();
        memory.initialize(&solution());
        {
            let (_, mut mutator) = memory.prepare_operator();
            mutator.set_preferred_berth(v(0), b(0));
        }
        {
            let (_, _, candidate) = memory.evaluation_target();
            candidate.reset(3);
            candidate.assign(v(0), b(1), 0);
            candidate.assign(v(1), b(0), 0);
            candidate.assign(v(2), b(0), 10);
            candidate.set_objective_value(40);
        }
        memory.accept_candidate();
        assert_eq!(memory.current_schedule().objective_value(), 40);
        // The decoder fell back to berth 1 for vessel 0.
        assert_eq!(memory.preferred_berths(), &[b(1), b(0), b(0)]);
        memory.discard_candidate();
        assert_eq!(memory.preferred_berths(), &[b(1), b(0), b(0)]);
    }

    #[test]
    fn test_fallback_keeps_best_rejected_candidate() {
        let mut memory = SearchMemory::<i64>::new();
        memory.initialize(&solution());
        assert!(!memory.adopt_fallback());

        for (objective, swap) in [(80, (0, 1)), (70, (1, 2)), (90, (0, 2))] {
            {
                let (_, mut mutator) = memory.prepare_operator();
                mutator.swap(swap.0, swap.1);
            }
            {
                let (_, _, candidate) = memory.evaluation_target();
                candidate.set_objective_value(objective);
            }
            memory.record_fallback();
            memory.discard_candidate();
        }

        assert!(memory.has_fallback());
        assert!(memory.adopt_fallback());
        assert_eq!(memory.current_schedule().objective_value(), 70);
        assert_eq!(memory.queue().as_slice(), &[v(1), v(0), v(2)]);
        assert!(!memory.has_fallback());
    }

    #[test]
    fn test_schedule_round_trips_through_solution() {
        let schedule = Schedule::from(&solution());
        assert_eq!(schedule.berth_for_vessel(v(0)), b(1));
        assert_eq!(schedule.start_time_for_vessel(v(2)), 10);
        assert_eq!(schedule.to_string(), "Schedule(objective: 60, [1@20, 0@0, 0@10])");
        assert_eq!(Solution::from(schedule), solution());
    }
}
