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

//! First-improvement hill climbing.
//!
//! A candidate is accepted iff its objective is strictly lower than the
//! current one. The first sweep that finds no such candidate ends the search
//! with a local optimum, so the incumbent objective never increases.

use crate::{
    eval::WeightedFlowTimeEvaluator,
    memory::Schedule,
    meta::metaheuristic::{LocalOptimumAction, Metaheuristic},
};
use mooring_model::model::Model;
use mooring_search::num::SolverNumeric;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GreedyDescent {
    evaluator: WeightedFlowTimeEvaluator,
}

impl GreedyDescent {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }
}

impl<T> Metaheuristic<T> for GreedyDescent
where
    T: SolverNumeric,
{
    type Evaluator = WeightedFlowTimeEvaluator;

    fn name(&self) -> &str {
        "GreedyDescent"
    }

    fn evaluator(&self) -> &Self::Evaluator {
        &self.evaluator
    }

    fn on_start(&mut self, _model: &Model<T>, _initial_solution: &Schedule<T>) {}

    #[inline]
    fn should_accept(
        &mut self,
        _model: &Model<T>,
        current: &Schedule<T>,
        candidate: &Schedule<T>,
        _best: &Schedule<T>,
    ) -> bool {
        candidate.objective_value() < current.objective_value()
    }

    fn on_local_optimum(
        &mut self,
        _model: &Model<T>,
        _current: &Schedule<T>,
        _best: &Schedule<T>,
    ) -> LocalOptimumAction {
        LocalOptimumAction::Stop
    }
}
