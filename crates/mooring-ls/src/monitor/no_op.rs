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

use crate::monitor::local_search_monitor::LocalSearchMonitor;
use mooring_search::num::SolverNumeric;

/// Ignores every event and never stops the search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct NoOperationMonitor;

impl NoOperationMonitor {
    #[inline]
    pub fn new() -> Self {
        Self
    }
}

impl<T> LocalSearchMonitor<T> for NoOperationMonitor
where
    T: SolverNumeric,
{
    fn name(&self) -> &str {
        "NoOperationMonitor"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::LocalSearchStatistics;

    #[test]
    fn test_always_continues() {
        let mut monitor = NoOperationMonitor::new();
        let stats = LocalSearchStatistics::default();
        assert!(!LocalSearchMonitor::<i64>::search_command(&mut monitor, &stats).is_terminate());
        assert_eq!(LocalSearchMonitor::<i64>::name(&monitor), "NoOperationMonitor");
    }
}
