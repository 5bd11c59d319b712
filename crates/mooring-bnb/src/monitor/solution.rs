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

use crate::{monitor::tree_search_monitor::TreeSearchMonitor, state::SearchState, stats::BnbSolverStatistics};
use mooring_search::{monitor::search_monitor::SearchCommand, num::SolverNumeric};

/// Stops the search once `solution_limit` improving solutions have been
/// found. A limit of zero stops before the first step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolutionLimitMonitor<T> {
    solution_limit: u64,
    _phantom: std::marker::PhantomData<T>,
}

impl<T> SolutionLimitMonitor<T> {
    pub fn new(solution_limit: u64) -> Self {
        Self {
            solution_limit,
            _phantom: std::marker::PhantomData,
        }
    }

    #[inline]
    pub fn solution_limit(&self) -> u64 {
        self.solution_limit
    }
}

impl<T> TreeSearchMonitor<T> for SolutionLimitMonitor<T>
where
    T: SolverNumeric,
{
    fn name(&self) -> &str {
        "SolutionLimitMonitor"
    }

    fn search_command(
        &mut self,
        _state: &SearchState<T>,
        statistics: &BnbSolverStatistics,
    ) -> SearchCommand {
        if statistics.solutions_found >= self.solution_limit {
            SearchCommand::Terminate("solution limit reached".to_string())
        } else {
            SearchCommand::Continue
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminates_at_limit() {
        let mut monitor = SolutionLimitMonitor::<i64>::new(2);
        let state = SearchState::new(1, 1);
        let mut stats = BnbSolverStatistics::default();

        stats.on_solution_found();
        assert_eq!(monitor.search_command(&state, &stats), SearchCommand::Continue);
        stats.on_solution_found();
        assert!(monitor.search_command(&state, &stats).is_terminate());
    }

    #[test]
    fn test_zero_limit_stops_immediately() {
        let mut monitor = SolutionLimitMonitor::<i64>::new(0);
        let state = SearchState::new(1, 1);
        let stats = BnbSolverStatistics::default();
        assert!(monitor.search_command(&state, &stats).is_terminate());
    }
}
