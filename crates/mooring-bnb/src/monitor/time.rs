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
use mooring_model::model::Model;
use mooring_search::{monitor::search_monitor::SearchCommand, num::SolverNumeric};
use std::time::{Duration, Instant};

/// Stops the search once `time_limit` has elapsed since `on_enter_search`.
///
/// Reading the clock on every step is measurable, so it is only read when
/// `steps & clock_check_mask == 0`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeLimitMonitor<T> {
    start_time: Instant,
    time_limit: Duration,
    clock_check_mask: u64,
    _phantom: std::marker::PhantomData<T>,
}

impl<T> TimeLimitMonitor<T> {
    /// Every 256 steps.
    pub const DEFAULT_CLOCK_CHECK_MASK: u64 = 0xFF;

    pub fn new(time_limit: Duration) -> Self {
        Self::with_clock_check_mask(time_limit, Self::DEFAULT_CLOCK_CHECK_MASK)
    }

    pub fn with_clock_check_mask(time_limit: Duration, clock_check_mask: u64) -> Self {
        Self {
            start_time: Instant::now(),
            time_limit,
            clock_check_mask,
            _phantom: std::marker::PhantomData,
        }
    }

    #[inline]
    pub fn time_limit(&self) -> Duration {
        self.time_limit
    }

    #[inline]
    pub fn clock_check_mask(&self) -> u64 {
        self.clock_check_mask
    }
}

impl<T> TreeSearchMonitor<T> for TimeLimitMonitor<T>
where
    T: SolverNumeric,
{
    fn name(&self) -> &str {
        "TimeLimitMonitor"
    }

    fn on_enter_search(&mut self, _model: &Model<T>, _statistics: &BnbSolverStatistics) {
        self.start_time = Instant::now();
    }

    fn search_command(
        &mut self,
        _state: &SearchState<T>,
        statistics: &BnbSolverStatistics,
    ) -> SearchCommand {
        if statistics.steps & self.clock_check_mask == 0
            && self.start_time.elapsed() >= self.time_limit
        {
            return SearchCommand::Terminate("time limit exceeded".to_string());
        }
        SearchCommand::Continue
    }
}
