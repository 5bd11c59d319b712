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

//! Fan-out monitor.
//!
//! Lets logging and stop conditions be combined without the engine knowing
//! about either. Put stricter stop conditions first.

use crate::{
    branching::decision::Decision,
    monitor::tree_search_monitor::{PruneReason, TreeSearchMonitor},
    state::SearchState,
    stats::BnbSolverStatistics,
};
use mooring_model::{model::Model, solution::Solution};
use mooring_search::{monitor::search_monitor::SearchCommand, num::SolverNumeric};

/// Fans every hook out to its children in insertion order. The first child
/// asking to terminate wins.
pub struct CompositeTreeSearchMonitor<'a, T>
where
    T: SolverNumeric,
{
    monitors: Vec<Box<dyn TreeSearchMonitor<T> + 'a>>,
}

impl<'a, T> Default for CompositeTreeSearchMonitor<'a, T>
where
    T: SolverNumeric,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, T> CompositeTreeSearchMonitor<'a, T>
where
    T: SolverNumeric,
{
    /// Creates a new empty `CompositeTreeSearchMonitor`.
    #[inline(always)]
    pub fn new() -> Self {
        Self {
            monitors: Vec::new(),
        }
    }

    /// Creates a new `CompositeTreeSearchMonitor` with the specified capacity.
    /// This pre-allocates space for the given number of monitors.
    #[inline(always)]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            monitors: Vec::with_capacity(capacity),
        }
    }

    #[inline(always)]
    pub fn from_vec(monitors: Vec<Box<dyn TreeSearchMonitor<T> + 'a>>) -> Self {
        Self { monitors }
    }

    /// Adds a new monitor to the composite monitor.
    #[inline(always)]
    pub fn add_monitor<M>(&mut self, monitor: M)
    where
        M: TreeSearchMonitor<T> + 'a,
    {
        self.monitors.push(Box::new(monitor));
    }

    /// Adds a boxed monitor to the composite monitor.
    #[inline(always)]
    pub fn add_monitor_boxed(&mut self, monitor: Box<dyn TreeSearchMonitor<T> + 'a>) {
        self.monitors.push(monitor);
    }

    /// Returns a slice of the monitors contained in the composite monitor.
    #[inline(always)]
    pub fn monitors(&self) -> &[Box<dyn TreeSearchMonitor<T> + 'a>] {
        &self.monitors
    }

    /// Returns a mutable slice of the monitors contained in the composite monitor.
    #[inline(always)]
    pub fn monitors_mut(&mut self) -> &mut [Box<dyn TreeSearchMonitor<T> + 'a>] {
        &mut self.monitors
    }

    /// Clears all monitors from the composite monitor.
    #[inline(always)]
    pub fn clear(&mut self) {
        self.monitors.clear();
    }

    /// Returns the number of monitors contained in the composite monitor.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.monitors.len()
    }

    /// Returns `true` if the composite monitor contains no monitors,
    /// `false` otherwise.
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.monitors.is_empty()
    }
}

impl<'a, T> FromIterator<Box<dyn TreeSearchMonitor<T> + 'a>> for CompositeTreeSearchMonitor<'a, T>
where
    T: SolverNumeric,
{
    #[inline(always)]
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = Box<dyn TreeSearchMonitor<T> + 'a>>,
    {
        Self {
            monitors: iter.into_iter().collect(),
        }
    }
}

impl<'a, T> TreeSearchMonitor<T> for CompositeTreeSearchMonitor<'a, T>
where
    T: SolverNumeric,
{
    #[inline(always)]
    fn name(&self) -> &str {
        "CompositeTreeSearchMonitor"
    }

    #[inline(always)]
    fn on_enter_search(&mut self, model: &Model<T>, statistics: &BnbSolverStatistics) {
        for monitor in &mut self.monitors {
            monitor.on_enter_search(model, statistics);
        }
    }

    #[inline(always)]
    fn on_exit_search(&mut self, statistics: &BnbSolverStatistics) {
        for monitor in &mut self.monitors {
            monitor.on_exit_search(statistics);
        }
    }

    #[inline(always)]
    fn search_command(
        &mut self,
        state: &SearchState<T>,
        statistics: &BnbSolverStatistics,
    ) -> SearchCommand {
        for monitor in &mut self.monitors {
            let command = monitor.search_command(state, statistics);
            if command.is_terminate() {
                return command;
            }
        }
        SearchCommand::Continue
    }

    #[inline(always)]
    fn on_step(&mut self, state: &SearchState<T>, statistics: &BnbSolverStatistics) {
        for monitor in &mut self.monitors {
            monitor.on_step(state, statistics);
        }
    }

    #[inline(always)]
    fn on_lower_bound_computed(
        &mut self,
        state: &SearchState<T>,
        lower_bound: T,
        estimated_remaining: T,
        statistics: &BnbSolverStatistics,
    ) {
        for monitor in &mut self.monitors {
            monitor.on_lower_bound_computed(state, lower_bound, estimated_remaining, statistics);
        }
    }

    #[inline(always)]
    fn on_prune(
        &mut self,
        state: &SearchState<T>,
        reason: PruneReason,
        statistics: &BnbSolverStatistics,
    ) {
        for monitor in &mut self.monitors {
            monitor.on_prune(state, reason, statistics);
        }
    }

    #[inline(always)]
    fn on_decisions_enqueued(
        &mut self,
        state: &SearchState<T>,
        count: usize,
        statistics: &BnbSolverStatistics,
    ) {
        for monitor in &mut self.monitors {
            monitor.on_decisions_enqueued(state, count, statistics);
        }
    }

    #[inline(always)]
    fn on_descend(
        &mut self,
        state: &SearchState<T>,
        decision: Decision<T>,
        statistics: &BnbSolverStatistics,
    ) {
        for monitor in &mut self.monitors {
            monitor.on_descend(state, decision, statistics);
        }
    }

    #[inline(always)]
    fn on_solution_found(&mut self, solution: &Solution<T>, statistics: &BnbSolverStatistics) {
        for monitor in &mut self.monitors {
            monitor.on_solution_found(solution, statistics);
        }
    }

    #[inline(always)]
    fn on_backtrack(&mut self, state: &SearchState<T>, statistics: &BnbSolverStatistics) {
        for monitor in &mut self.monitors {
            monitor.on_backtrack(state, statistics);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::monitor::{no_op::NoOperationMonitor, solution::SolutionLimitMonitor};

    struct Counting<'c> {
        steps: &'c mut u64,
    }

    impl<T> TreeSearchMonitor<T> for Counting<'_>
    where
        T: SolverNumeric,
    {
        fn name(&self) -> &str {
            "Counting"
        }

        fn on_step(&mut self, _state: &SearchState<T>, _statistics: &BnbSolverStatistics) {
            *self.steps += 1;
        }
    }

    #[test]
    fn test_hooks_reach_every_child() {
        let mut steps = 0;
        {
            let mut composite = CompositeTreeSearchMonitor::<i64>::with_capacity(2);
            composite.add_monitor(NoOperationMonitor::new());
            composite.add_monitor(Counting { steps: &mut steps });
            assert_eq!(composite.len(), 2);

            let state = SearchState::new(1, 1);
            let stats = BnbSolverStatistics::default();
            composite.on_step(&state, &stats);
            composite.on_step(&state, &stats);
        }
        assert_eq!(steps, 2);
    }

    #[test]
    fn test_first_terminate_wins() {
        let mut composite = CompositeTreeSearchMonitor::<i64>::new();
        assert!(composite.is_empty());
        composite.add_monitor(NoOperationMonitor::new());
        composite.add_monitor(SolutionLimitMonitor::new(1));

        let state = SearchState::new(1, 1);
        let mut stats = BnbSolverStatistics::default();
        assert!(!composite.search_command(&state, &stats).is_terminate());
        stats.on_solution_found();
        assert_eq!(
            composite.search_command(&state, &stats),
            SearchCommand::Terminate("solution limit reached".to_string())
        );
    }
}
