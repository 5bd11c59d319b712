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

use crate::{
    memory::Schedule, monitor::local_search_monitor::LocalSearchMonitor,
    stats::LocalSearchStatistics,
};
use mooring_model::model::Model;
use mooring_search::{monitor::search_monitor::SearchCommand, num::SolverNumeric};
use std::time::{Duration, Instant};

/// Stops the search once `time_limit` has elapsed since `on_enter_search`.
///
/// The clock is read only when `iterations & clock_check_mask == 0`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeLimitMonitor {
    start_time: Instant,
    time_limit: Duration,
    clock_check_mask: u64,
}

impl TimeLimitMonitor {
    /// Every 64 iterations; an iteration decodes a full schedule.
    pub const DEFAULT_CLOCK_CHECK_MASK: u64 = 0x3F;

    pub fn new(time_limit: Duration) -> Self {
        Self::with_clock_check_mask(time_limit, Self::DEFAULT_CLOCK_CHECK_MASK)
    }

    pub fn with_clock_check_mask(time_limit: Duration, clock_check_mask: u64) -> Self {
        Self {
            start_time: Instant::now(),
            time_limit,
            clock_check_mask,
        }
    }

    #[inline]
    pub fn time_limit(&self) -> Duration {
        self.time_limit
    }
}

impl<T> LocalSearchMonitor<T> for TimeLimitMonitor
where
    T: SolverNumeric,
{
    fn name(&self) -> &str {
        "TimeLimitMonitor"
    }

    fn on_enter_search(
        &mut self,
        _model: &Model<T>,
        _initial_solution: &Schedule<T>,
        _statistics: &LocalSearchStatistics,
    ) {
        self.start_time = Instant::now();
    }

    fn search_command(&mut self, statistics: &LocalSearchStatistics) -> SearchCommand {
        if statistics.iterations & self.clock_check_mask == 0
            && self.start_time.elapsed() >= self.time_limit
        {
            return SearchCommand::Terminate("time limit exceeded".to_string());
        }
        SearchCommand::Continue
    }
}
