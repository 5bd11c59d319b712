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

//! Fan-out monitor for local search.

use crate::{
    memory::Schedule, monitor::local_search_monitor::LocalSearchMonitor,
    stats::LocalSearchStatistics,
};
use mooring_model::model::Model;
use mooring_search::{monitor::search_monitor::SearchCommand, num::SolverNumeric};

/// Forwards every hook to its children in insertion order. The first child
/// asking to terminate wins.
pub struct CompositeLocalSearchMonitor<'a, T>
where
    T: SolverNumeric,
{
    monitors: Vec<Box<dyn LocalSearchMonitor<T> + 'a>>,
}

impl<'a, T> Default for CompositeLocalSearchMonitor<'a, T>
where
    T: SolverNumeric,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, T> CompositeLocalSearchMonitor<'a, T>
where
    T: SolverNumeric,
{
    #[inline(always)]
    pub fn new() -> Self {
        Self {
            monitors: Vec::new(),
        }
    }

    #[inline(always)]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            monitors: Vec::with_capacity(capacity),
        }
    }

    #[inline(always)]
    pub fn from_vec(monitors: Vec<Box<dyn LocalSearchMonitor<T> + 'a>>) -> Self {
        Self { monitors }
    }

    #[inline(always)]
    pub fn add_monitor<M>(&mut self, monitor: M)
    where
        M: LocalSearchMonitor<T> + 'a,
    {
        self.monitors.push(Box::new(monitor));
    }

    #[inline(always)]
    pub fn add_monitor_boxed(&mut self, monitor: Box<dyn LocalSearchMonitor<T> + 'a>) {
        self.monitors.push(monitor);
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.monitors.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.monitors.is_empty()
    }
}

impl<'a, T> std::fmt::Debug for CompositeLocalSearchMonitor<'a, T>
where
    T: SolverNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.monitors.iter().map(|m| m.name()))
            .finish()
    }
}

impl<'a, T> LocalSearchMonitor<T> for CompositeLocalSearchMonitor<'a, T>
where
    T: SolverNumeric,
{
    fn name(&self) -> &str {
        "CompositeLocalSearchMonitor"
    }

    fn on_enter_search(
        &mut self,
        model: &Model<T>,
        initial_solution: &Schedule<T>,
        statistics: &LocalSearchStatistics,
    ) {
        for monitor in &mut self.monitors {
            monitor.on_enter_search(model, initial_solution, statistics);
        }
    }

    fn on_exit_search(&mut self, best_solution: &Schedule<T>, statistics: &LocalSearchStatistics) {
        for monitor in &mut self.monitors {
            monitor.on_exit_search(best_solution, statistics);
        }
    }

    fn search_command(&mut self, statistics: &LocalSearchStatistics) -> SearchCommand {
        for monitor in &mut self.monitors {
            if let SearchCommand::Terminate(message) = monitor.search_command(statistics) {
                return SearchCommand::Terminate(message);
            }
        }
        SearchCommand::Continue
    }

    fn on_iteration(&mut self, current_solution: &Schedule<T>, statistics: &LocalSearchStatistics) {
        for monitor in &mut self.monitors {
            monitor.on_iteration(current_solution, statistics);
        }
    }

    fn on_solution_accepted(&mut self, solution: &Schedule<T>, statistics: &LocalSearchStatistics) {
        for monitor in &mut self.monitors {
            monitor.on_solution_accepted(solution, statistics);
        }
    }

    fn on_solution_rejected(&mut self, candidate: &Schedule<T>, statistics: &LocalSearchStatistics) {
        for monitor in &mut self.monitors {
            monitor.on_solution_rejected(candidate, statistics);
        }
    }

    fn on_solution_found(&mut self, solution: &Schedule<T>, statistics: &LocalSearchStatistics) {
        for monitor in &mut self.monitors {
            monitor.on_solution_found(solution, statistics);
        }
    }

    fn on_local_optimum(&mut self, current_solution: &Schedule<T>, statistics: &LocalSearchStatistics) {
        for monitor in &mut self.monitors {
            monitor.on_local_optimum(current_solution, statistics);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::monitor::{no_op::NoOperationMonitor, solution::SolutionLimitMonitor};
    use mooring_model::{index::BerthIndex, solution::Solution};

    struct Counting<'c> {
        iterations: &'c mut u32,
    }

    impl<'c> LocalSearchMonitor<i64> for Counting<'c> {
        fn name(&self) -> &str {
            "Counting"
        }

        fn on_iteration(&mut self, _current: &Schedule<i64>, _statistics: &LocalSearchStatistics) {
            *self.iterations += 1;
        }
    }

    #[test]
    fn test_hooks_reach_every_child() {
        let mut iterations = 0;
        {
            let mut composite = CompositeLocalSearchMonitor::<i64>::with_capacity(2);
            composite.add_monitor(NoOperationMonitor::new());
            composite.add_monitor(Counting {
                iterations: &mut iterations,
            });
            assert_eq!(composite.len(), 2);

            let schedule = Schedule::from(&Solution::new(1, vec![BerthIndex::new(0)], vec![0]));
            let stats = LocalSearchStatistics::default();
            composite.on_iteration(&schedule, &stats);
            composite.on_iteration(&schedule, &stats);
        }
        assert_eq!(iterations, 2);
    }

    #[test]
    fn test_first_terminate_wins() {
        let mut composite = CompositeLocalSearchMonitor::<i64>::new();
        assert!(composite.is_empty());
        composite.add_monitor(NoOperationMonitor::new());
        composite.add_monitor(SolutionLimitMonitor::new(1));

        let mut stats = LocalSearchStatistics::default();
        assert!(!composite.search_command(&stats).is_terminate());
        stats.on_solution_examined();
        assert_eq!(
            composite.search_command(&stats),
            SearchCommand::Terminate("solution limit reached".to_string())
        );
    }
}
