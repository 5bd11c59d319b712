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

use crate::{memory::Schedule, stats::LocalSearchStatistics};
use mooring_model::model::Model;
use mooring_search::{monitor::search_monitor::SearchCommand, num::SolverNumeric};

/// Observes a local search run and may stop it.
///
/// Every hook except [`name`](LocalSearchMonitor::name) has an empty
/// default. The engine consults
/// [`search_command`](LocalSearchMonitor::search_command) once per iteration,
/// before the iteration counter advances.
pub trait LocalSearchMonitor<T>
where
    T: SolverNumeric,
{
    fn name(&self) -> &str;

    fn on_enter_search(
        &mut self,
        _model: &Model<T>,
        _initial_solution: &Schedule<T>,
        _statistics: &LocalSearchStatistics,
    ) {
    }

    fn on_exit_search(&mut self, _best_solution: &Schedule<T>, _statistics: &LocalSearchStatistics) {}

    fn search_command(&mut self, _statistics: &LocalSearchStatistics) -> SearchCommand {
        SearchCommand::Continue
    }

    fn on_iteration(&mut self, _current_solution: &Schedule<T>, _statistics: &LocalSearchStatistics) {}

    fn on_solution_accepted(&mut self, _solution: &Schedule<T>, _statistics: &LocalSearchStatistics) {}

    fn on_solution_rejected(&mut self, _candidate: &Schedule<T>, _statistics: &LocalSearchStatistics) {}

    /// Called for every candidate that improves on the best schedule.
    fn on_solution_found(&mut self, _solution: &Schedule<T>, _statistics: &LocalSearchStatistics) {}

    fn on_local_optimum(&mut self, _current_solution: &Schedule<T>, _statistics: &LocalSearchStatistics) {}
}

impl<T> std::fmt::Debug for dyn LocalSearchMonitor<T>
where
    T: SolverNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "LocalSearchMonitor({})", self.name())
    }
}

impl<T> std::fmt::Display for dyn LocalSearchMonitor<T>
where
    T: SolverNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "LocalSearchMonitor({})", self.name())
    }
}
