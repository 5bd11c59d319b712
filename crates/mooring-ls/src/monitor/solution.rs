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

use crate::{monitor::local_search_monitor::LocalSearchMonitor, stats::LocalSearchStatistics};
use mooring_search::{monitor::search_monitor::SearchCommand, num::SolverNumeric};

/// Stops the search once `solution_limit` candidates have been examined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SolutionLimitMonitor {
    solution_limit: u64,
}

impl SolutionLimitMonitor {
    #[inline]
    pub fn new(solution_limit: u64) -> Self {
        Self { solution_limit }
    }

    #[inline]
    pub fn solution_limit(&self) -> u64 {
        self.solution_limit
    }
}

impl<T> LocalSearchMonitor<T> for SolutionLimitMonitor
where
    T: SolverNumeric,
{
    fn name(&self) -> &str {
        "SolutionLimitMonitor"
    }

    fn search_command(&mut self, statistics: &LocalSearchStatistics) -> SearchCommand {
        if statistics.total_solutions >= self.solution_limit {
            return SearchCommand::Terminate("solution limit reached".to_string());
        }
        SearchCommand::Continue
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminates_at_limit() {
        let mut monitor = SolutionLimitMonitor::new(2);
        let mut stats = LocalSearchStatistics::default();
        stats.on_solution_examined();
        assert_eq!(
            LocalSearchMonitor::<i64>::search_command(&mut monitor, &stats),
            SearchCommand::Continue
        );
        stats.on_solution_examined();
        assert_eq!(
            LocalSearchMonitor::<i64>::search_command(&mut monitor, &stats),
            SearchCommand::Terminate("solution limit reached".to_string())
        );
    }
}
