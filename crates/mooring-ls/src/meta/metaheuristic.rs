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

//! The interface between the engine and an acceptance policy.
//!
//! The engine owns the genotype and the schedules; a metaheuristic only sees
//! decoded schedules and answers questions about them. Besides accepting or
//! rejecting single candidates, it decides what happens when an operator
//! sweep is exhausted without an accepted move, see [`LocalOptimumAction`].

use crate::{eval::AssignmentEvaluator, memory::Schedule};
use mooring_model::model::Model;
use mooring_search::{monitor::search_monitor::SearchCommand, num::SolverNumeric};

/// Local optima without a new best schedule before the non-monotone
/// policies give up.
pub const DEFAULT_STAGNATION_LIMIT: u64 = 100;

/// What the engine does after a sweep ends without an accepted candidate.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LocalOptimumAction {
    /// Report a local optimum.
    Stop,
    /// Re-prepare the operator and sweep the same incumbent again.
    Restart,
    /// Move to the best candidate admitted through
    /// [`Metaheuristic::admits_as_fallback`] during the sweep, then continue.
    /// Stops like [`Self::Stop`] when there is none.
    AcceptFallback,
    /// End the search with the given reason.
    Terminate(String),
}

impl std::fmt::Display for LocalOptimumAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Stop => write!(f, "Stop"),
            Self::Restart => write!(f, "Restart"),
            Self::AcceptFallback => write!(f, "AcceptFallback"),
            Self::Terminate(reason) => write!(f, "Terminate({})", reason),
        }
    }
}

pub trait Metaheuristic<T>: Send + Sync
where
    T: SolverNumeric,
{
    /// Scores assignments when the decoder has to choose a berth.
    type Evaluator: AssignmentEvaluator<T>;

    fn name(&self) -> &str;

    fn evaluator(&self) -> &Self::Evaluator;

    fn on_start(&mut self, model: &Model<T>, initial_solution: &Schedule<T>);

    fn search_command(
        &mut self,
        _iteration: u64,
        _model: &Model<T>,
        _best_solution: &Schedule<T>,
    ) -> SearchCommand {
        SearchCommand::Continue
    }

    fn should_accept(
        &mut self,
        model: &Model<T>,
        current: &Schedule<T>,
        candidate: &Schedule<T>,
        best: &Schedule<T>,
    ) -> bool;

    fn on_accept(&mut self, _model: &Model<T>, _new_current: &Schedule<T>) {}

    fn on_reject(&mut self, _model: &Model<T>, _rejected_candidate: &Schedule<T>) {}

    fn on_new_best(&mut self, _model: &Model<T>, _new_best: &Schedule<T>) {}

    /// Whether a rejected candidate may be kept as the sweep's fallback.
    fn admits_as_fallback(
        &mut self,
        _model: &Model<T>,
        _candidate: &Schedule<T>,
        _best: &Schedule<T>,
    ) -> bool {
        false
    }

    fn on_local_optimum(
        &mut self,
        model: &Model<T>,
        current: &Schedule<T>,
        best: &Schedule<T>,
    ) -> LocalOptimumAction;
}

impl<T, E> std::fmt::Debug for dyn Metaheuristic<T, Evaluator = E>
where
    T: SolverNumeric,
    E: AssignmentEvaluator<T>,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Metaheuristic({})", self.name())
    }
}

impl<T, E> std::fmt::Display for dyn Metaheuristic<T, Evaluator = E>
where
    T: SolverNumeric,
    E: AssignmentEvaluator<T>,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_display() {
        assert_eq!(LocalOptimumAction::Stop.to_string(), "Stop");
        assert_eq!(
            LocalOptimumAction::Terminate("temperature floor reached".to_string()).to_string(),
            "Terminate(temperature floor reached)"
        );
    }
}
