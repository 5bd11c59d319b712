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
    berth_availability::BerthAvailability,
    branching::decision::{Decision, DecisionBuilder, RankedDecisionIter, collect_ranked},
    eval::evaluator::ObjectiveEvaluator,
    state::SearchState,
};
use mooring_model::model::Model;
use mooring_search::num::SolverNumeric;
use std::cmp::Reverse;

/// Longest-processing-time branching.
///
/// Places the bulky handlings first so that short ones can fill the gaps
/// left around them.
#[derive(Debug, Clone)]
pub struct LptHeuristicBuilder<T> {
    ranked: Vec<(Reverse<T>, Decision<T>)>,
}

impl<T> Default for LptHeuristicBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> LptHeuristicBuilder<T> {
    #[inline]
    pub fn new() -> Self {
        Self { ranked: Vec::new() }
    }

    #[inline]
    pub fn preallocated(num_berths: usize, num_vessels: usize) -> Self {
        Self {
            ranked: Vec::with_capacity(num_berths.saturating_mul(num_vessels)),
        }
    }
}

impl<T, E> DecisionBuilder<T, E> for LptHeuristicBuilder<T>
where
    T: SolverNumeric,
    E: ObjectiveEvaluator<T>,
{
    type DecisionIterator<'a>
        = RankedDecisionIter<'a, Reverse<T>, T>
    where
        T: 'a,
        E: 'a,
        Self: 'a;

    fn name(&self) -> &str {
        "LptHeuristicBuilder"
    }

    fn next_decision<'a>(
        &'a mut self,
        evaluator: &'a mut E,
        model: &'a Model<T>,
        berth_availability: &'a BerthAvailability<T>,
        state: &'a SearchState<T>,
    ) -> Self::DecisionIterator<'a> {
        collect_ranked(
            &mut self.ranked,
            evaluator,
            model,
            berth_availability,
            state,
            |model, decision| {
                Reverse(
                    model
                        .vessel_processing_time(decision.vessel_index(), decision.berth_index())
                        .into_option()
                        .unwrap_or_else(T::zero),
                )
            },
        );
        RankedDecisionIter::new(&self.ranked)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::branching::test_support::{model, root_order};

    #[test]
    fn test_longest_handling_first() {
        let model = model();
        let mut builder = LptHeuristicBuilder::new();
        assert_eq!(root_order(&mut builder, &model), vec![(0, 0), (2, 1), (2, 0), (1, 0), (0, 1)]);
    }
}
