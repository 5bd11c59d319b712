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

//! Progress logging through `tracing`.
//!
//! Events are emitted at `info` level with an `event` field naming the phase.

use crate::{
    memory::Schedule, monitor::local_search_monitor::LocalSearchMonitor,
    stats::LocalSearchStatistics,
};
use mooring_model::model::Model;
use mooring_search::num::SolverNumeric;
use std::time::Instant;
use tracing::info;

#[derive(Debug, Clone)]
pub struct LogLocalSearchMonitor<T> {
    start_time: Instant,
    /// Iterations between two progress lines.
    log_interval: u64,
    best_objective: Option<T>,
}

impl<T> LogLocalSearchMonitor<T> {
    pub const DEFAULT_LOG_INTERVAL: u64 = 1 << 12;

    /// A zero interval is treated as one.
    pub fn new(log_interval: u64) -> Self {
        Self {
            start_time: Instant::now(),
            log_interval: log_interval.max(1),
            best_objective: None,
        }
    }

    #[inline]
    pub fn log_interval(&self) -> u64 {
        self.log_interval
    }
}

impl<T> Default for LogLocalSearchMonitor<T> {
    fn default() -> Self {
        Self::new(Self::DEFAULT_LOG_INTERVAL)
    }
}

impl<T> std::fmt::Display for LogLocalSearchMonitor<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "LogLocalSearchMonitor(log_interval: {})", self.log_interval)
    }
}

impl<T> LocalSearchMonitor<T> for LogLocalSearchMonitor<T>
where
    T: SolverNumeric,
{
    fn name(&self) -> &str {
        "LogLocalSearchMonitor"
    }

    fn on_enter_search(
        &mut self,
        model: &Model<T>,
        initial_solution: &Schedule<T>,
        _statistics: &LocalSearchStatistics,
    ) {
        self.start_time = Instant::now();
        self.best_objective = Some(initial_solution.objective_value());
        info!(
            event = "ls_start",
            num_vessels = model.num_vessels(),
            num_berths = model.num_berths(),
            initial = %initial_solution.objective_value(),
        );
    }

    fn on_iteration(&mut self, current_solution: &Schedule<T>, statistics: &LocalSearchStatistics) {
        if statistics.iterations % self.log_interval != 0 {
            return;
        }
        info!(
            event = "ls_progress",
            elapsed_secs = self.start_time.elapsed().as_secs_f64(),
            iterations = statistics.iterations,
            accepted = statistics.accepted_solutions,
            current = %current_solution.objective_value(),
            best = ?self.best_objective,
        );
    }

    fn on_solution_found(&mut self, solution: &Schedule<T>, statistics: &LocalSearchStatistics) {
        self.best_objective = Some(solution.objective_value());
        info!(
            event = "ls_improvement",
            objective = %solution.objective_value(),
            iterations = statistics.iterations,
            elapsed_secs = self.start_time.elapsed().as_secs_f64(),
        );
    }

    fn on_exit_search(&mut self, best_solution: &Schedule<T>, statistics: &LocalSearchStatistics) {
        info!(
            event = "ls_end",
            iterations = statistics.iterations,
            examined = statistics.total_solutions,
            accepted = statistics.accepted_solutions,
            local_optima = statistics.local_optima,
            best = %best_solution.objective_value(),
            elapsed_secs = self.start_time.elapsed().as_secs_f64(),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mooring_model::{index::BerthIndex, solution::Solution};

    #[test]
    fn test_tracks_best_objective_without_subscriber() {
        let mut monitor = LogLocalSearchMonitor::<i64>::new(0);
        assert_eq!(monitor.log_interval(), 1);

        let stats = LocalSearchStatistics::default();
        let schedule = Schedule::from(&Solution::new(9, vec![BerthIndex::new(0)], vec![0]));
        monitor.on_iteration(&schedule, &stats);
        monitor.on_solution_found(&schedule, &stats);
        assert_eq!(monitor.best_objective, Some(9));
        monitor.on_exit_search(&schedule, &stats);
        assert_eq!(monitor.to_string(), "LogLocalSearchMonitor(log_interval: 1)");
    }
}
