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

//! Regret-based branching.
//!
//! The regret of a vessel is the cost gap between its best and second-best
//! placement. A vessel with a large regret loses the most when its best
//! option is taken away, so it is branched on first. Vessels with a single
//! feasible placement have regret `T::MAX`.

use crate::{
    berth_availability::BerthAvailability,
    branching::decision::{Decision, DecisionBuilder, RankedDecisionIter, collect_ranked},
    eval::evaluator::ObjectiveEvaluator,
    state::SearchState,
};
use mooring_model::{index::VesselIndex, model::Model};
use mooring_search::num::SolverNumeric;
use std::cmp::Reverse;

#[derive(Debug, Clone)]
pub struct RegretHeuristicBuilder<T> {
    /// All options, grouped by vessel and sorted by cost within a group.
    options: Vec<((VesselIndex, T), Decision<T>)>,
    ranked: Vec<((Reverse<T>, T), Decision<T>)>,
}

impl<T> Default for RegretHeuristicBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> RegretHeuristicBuilder<T> {
    #[inline]
    pub fn new() -> Self {
        Self {
            options: Vec::new(),
            ranked: Vec::new(),
        }
    }

    #[inline]
    pub fn preallocated(num_berths: usize, num_vessels: usize) -> Self {
        let capacity = num_berths.saturating_mul(num_vessels);
        Self {
            options: Vec::with_capacity(capacity),
            ranked: Vec::with_capacity(capacity),
        }
    }
}

impl<T, E> DecisionBuilder<T, E> for RegretHeuristicBuilder<T>
where
    T: SolverNumeric,
    E: ObjectiveEvaluator<T>,
{
    type DecisionIterator<'a>
        = RankedDecisionIter<'a, (Reverse<T>, T), T>
    where
        T: 'a,
        E: 'a,
        Self: 'a;

    fn name(&self) -> &str {
        "RegretHeuristicBuilder"
    }

    fn next_decision<'a>(
        &'a mut self,
        evaluator: &'a mut E,
        model: &'a Model<T>,
        berth_availability: &'a BerthAvailability<T>,
        state: &'a SearchState<T>,
    ) -> Self::DecisionIterator<'a> {
        collect_ranked(
            &mut self.options,
            evaluator,
            model,
            berth_availability,
            state,
            |_, decision| (decision.vessel_index(), decision.cost_delta()),
        );

        self.ranked.clear();
        for group in self
            .options
            .chunk_by(|(a, _), (b, _)| a.0 == b.0)
        {
            let regret = match group {
                [(best, _), (second, _), ..] => second.1.saturating_sub_val(best.1),
                _ => T::max_value(),
            };
            self.ranked.extend(
                group
                    .iter()
                    .map(|&(_, decision)| ((Reverse(regret), decision.cost_delta()), decision)),
            );
        }
        self.ranked.sort_unstable();

        RankedDecisionIter::new(&self.ranked)
    }
}
