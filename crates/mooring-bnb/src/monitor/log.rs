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
//! Nothing is printed unless the caller installs a subscriber. Events are
//! emitted at `info` level with an `event` field naming the phase.

use crate::{
    monitor::tree_search_monitor::TreeSearchMonitor, state::SearchState,
    stats::BnbSolverStatistics,
};
use mooring_model::{model::Model, solution::Solution};
use mooring_search::num::SolverNumeric;
use std::time::Instant;
use tracing::info;

#[derive(Debug, Clone)]
pub struct LogTreeSearchMonitor<T> {
    start_time: Instant,
    /// Steps between two progress lines.
    log_interval: u64,
    best_objective: Option<T>,
}

impl<T> LogTreeSearchMonitor<T> {
    pub const DEFAULT_LOG_INTERVAL: u64 = 1 << 16;

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

impl<T> Default for LogTreeSearchMonitor<T> {
    fn default() -> Self {
        Self::new(Self::DEFAULT_LOG_INTERVAL)
    }
}

impl<T> std::fmt::Display for LogTreeSearchMonitor<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "LogTreeSearchMonitor(log_interval: {})", self.log_interval)
    }
}

impl<T> TreeSearchMonitor<T> for LogTreeSearchMonitor<T>
where
    T: SolverNumeric,
{
    fn name(&self) -> &str {
        "LogTreeSearchMonitor"
    }

    fn on_enter_search(&mut self, model: &Model<T>, _statistics: &BnbSolverStatistics) {
        self.start_time = Instant::now();
        self.best_objective = None;
        info!(
            event = "bnb_start",
            num_vessels = model.num_vessels(),
            num_berths = model.num_berths(),
            log_complexity = model.log_complexity(),
        );
    }

    fn on_step(&mut self, state: &SearchState<T>, statistics: &BnbSolverStatistics) {
        if statistics.steps % self.log_interval != 0 {
            return;
        }
        info!(
            event = "bnb_progress",
            elapsed_secs = self.start_time.elapsed().as_secs_f64(),
            depth = state.num_assigned_vessels(),
            nodes = statistics.nodes_explored,
            backtracks = statistics.backtracks,
            prunings = statistics.prunings(),
            best = ?self.best_objective,
        );
    }

    fn on_solution_found(&mut self, solution: &Solution<T>, statistics: &BnbSolverStatistics) {
        self.best_objective = Some(solution.objective_value());
        info!(
            event = "bnb_solution",
            objective = %solution.objective_value(),
            nodes = statistics.nodes_explored,
            elapsed_secs = self.start_time.elapsed().as_secs_f64(),
        );
    }

    fn on_exit_search(&mut self, statistics: &BnbSolverStatistics) {
        info!(
            event = "bnb_end",
            nodes = statistics.nodes_explored,
            backtracks = statistics.backtracks,
            solutions = statistics.solutions_found,
            best = ?self.best_objective,
            elapsed_secs = self.start_time.elapsed().as_secs_f64(),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mooring_model::index::BerthIndex;

    #[test]
    fn test_tracks_best_objective_without_subscriber() {
        let mut monitor = LogTreeSearchMonitor::<i64>::new(0);
        assert_eq!(monitor.log_interval(), 1);

        let stats = BnbSolverStatistics::default();
        let state = SearchState::new(1, 1);
        monitor.on_step(&state, &stats);
        monitor.on_solution_found(&Solution::new(9, vec![BerthIndex::new(0)], vec![0]), &stats);
        assert_eq!(monitor.best_objective, Some(9));
        monitor.on_exit_search(&stats);
        assert_eq!(monitor.to_string(), "LogTreeSearchMonitor(log_interval: 1)");
    }
}
