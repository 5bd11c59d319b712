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

use crate::{branching::decision::Decision, state::SearchState, stats::BnbSolverStatistics};
use mooring_model::{model::Model, solution::Solution};
use mooring_search::{monitor::search_monitor::SearchCommand, num::SolverNumeric};

#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub enum PruneReason {
    /// Some unassigned vessel can no longer be placed.
    Infeasible,
    /// The lower bound reaches the incumbent objective.
    BoundDominated,
}

impl std::fmt::Display for PruneReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PruneReason::Infeasible => write!(f, "Infeasible"),
            PruneReason::BoundDominated => write!(f, "BoundDominated"),
        }
    }
}

/// Observes a branch-and-bound run and may stop it.
///
/// Every hook except [`name`](TreeSearchMonitor::name) has an empty default,
/// so a monitor only implements what it listens to. The engine consults
/// [`search_command`](TreeSearchMonitor::search_command) once per step.
pub trait TreeSearchMonitor<T>
where
    T: SolverNumeric,
{
    fn name(&self) -> &str;

    fn on_enter_search(&mut self, _model: &Model<T>, _statistics: &BnbSolverStatistics) {}

    fn on_exit_search(&mut self, _statistics: &BnbSolverStatistics) {}

    fn search_command(
        &mut self,
        _state: &SearchState<T>,
        _statistics: &BnbSolverStatistics,
    ) -> SearchCommand {
        SearchCommand::Continue
    }

    fn on_step(&mut self, _state: &SearchState<T>, _statistics: &BnbSolverStatistics) {}

    fn on_lower_bound_computed(
        &mut self,
        _state: &SearchState<T>,
        _lower_bound: T,
        _estimated_remaining: T,
        _statistics: &BnbSolverStatistics,
    ) {
    }

    fn on_prune(
        &mut self,
        _state: &SearchState<T>,
        _reason: PruneReason,
        _statistics: &BnbSolverStatistics,
    ) {
    }

    fn on_decisions_enqueued(
        &mut self,
        _state: &SearchState<T>,
        _count: usize,
        _statistics: &BnbSolverStatistics,
    ) {
    }

    fn on_descend(
        &mut self,
        _state: &SearchState<T>,
        _decision: Decision<T>,
        _statistics: &BnbSolverStatistics,
    ) {
    }

    fn on_backtrack(&mut self, _state: &SearchState<T>, _statistics: &BnbSolverStatistics) {}

    /// Called for every strictly improving solution.
    fn on_solution_found(&mut self, _solution: &Solution<T>, _statistics: &BnbSolverStatistics) {}
}

impl<T> std::fmt::Debug for dyn TreeSearchMonitor<T>
where
    T: SolverNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "TreeSearchMonitor({})", self.name())
    }
}

impl<T> std::fmt::Display for dyn TreeSearchMonitor<T>
where
    T: SolverNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "TreeSearchMonitor({})", self.name())
    }
}
