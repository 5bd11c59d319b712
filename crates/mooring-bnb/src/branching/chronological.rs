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

//! Exhaustive chronological branching.
//!
//! Walks `(vessel, berth)` pairs in row-major order and yields every pair
//! that survives [`Decision::try_new`]. Decisions are produced lazily, so the
//! builder holds no scratch memory.

use crate::{
    berth_availability::BerthAvailability,
    branching::decision::{Decision, DecisionBuilder},
    eval::evaluator::ObjectiveEvaluator,
    state::SearchState,
};
use mooring_model::{
    index::{BerthIndex, VesselIndex},
    model::Model,
};
use mooring_search::num::SolverNumeric;
use std::iter::FusedIterator;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ChronologicalExhaustiveBuilder;

impl ChronologicalExhaustiveBuilder {
    #[inline]
    pub fn new() -> Self {
        Self
    }
}

impl<T, E> DecisionBuilder<T, E> for ChronologicalExhaustiveBuilder
where
    T: SolverNumeric,
    E: ObjectiveEvaluator<T>,
{
    type DecisionIterator<'a>
        = ExhaustiveIter<'a, T, E>
    where
        T: 'a,
        E: 'a,
        Self: 'a;

    fn name(&self) -> &str {
        "ChronologicalExhaustiveBuilder"
    }

    fn next_decision<'a>(
        &'a mut self,
        evaluator: &'a mut E,
        model: &'a Model<T>,
        berth_availability: &'a BerthAvailability<T>,
        state: &'a SearchState<T>,
    ) -> Self::DecisionIterator<'a> {
        ExhaustiveIter {
            current_vessel: 0,
            current_berth: 0,
            model,
            state,
            berth_availability,
            evaluator,
        }
    }
}

pub struct ExhaustiveIter<'a, T, E>
where
    T: SolverNumeric,
{
    current_vessel: usize,
    current_berth: usize,
    model: &'a Model<T>,
    state: &'a SearchState<T>,
    berth_availability: &'a BerthAvailability<T>,
    evaluator: &'a mut E,
}

impl<T, E> Iterator for ExhaustiveIter<'_, T, E>
where
    T: SolverNumeric,
    E: ObjectiveEvaluator<T>,
{
    type Item = Decision<T>;

    fn next(&mut self) -> Option<Self::Item> {
        let num_vessels = self.model.num_vessels();
        let num_berths = self.model.num_berths();
        if num_berths == 0 {
            return None;
        }

        while self.current_vessel < num_vessels {
            let vessel_index = VesselIndex::new(self.current_vessel);
            let berth_index = BerthIndex::new(self.current_berth);

            self.current_berth += 1;
            if self.current_berth == num_berths {
                self.current_berth = 0;
                self.current_vessel += 1;
            }

            if self.state.is_vessel_assigned(vessel_index) {
                continue;
            }

            if let Some(decision) = Decision::try_new(
                vessel_index,
                berth_index,
                self.model,
                self.berth_availability,
                self.state,
                self.evaluator,
            ) {
                return Some(decision);
            }
        }
        None
    }
}

impl<T, E> FusedIterator for ExhaustiveIter<'_, T, E>
where
    T: SolverNumeric,
    E: ObjectiveEvaluator<T>,
{
}
