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

//! Slack-based branching.
//!
//! The slack of a vessel is its latest departure minus the earliest finish
//! it can still reach from the current node. Vessels with the least slack
//! are closest to becoming unplaceable and are branched on first. All
//! placements of a vessel share its slack.

use crate::{
    berth_availability::BerthAvailability,
    branching::decision::{Decision, DecisionBuilder, RankedDecisionIter, collect_ranked},
    eval::evaluator::ObjectiveEvaluator,
    state::SearchState,
};
use mooring_model::{index::VesselIndex, model::Model};
use mooring_search::num::SolverNumeric;

#[derive(Debug, Clone)]
pub struct SlackHeuristicBuilder<T> {
    options: Vec<(VesselIndex, Decision<T>)>,
    ranked: Vec<(T, Decision<T>)>,
}

impl<T> Default for SlackHeuristicBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> SlackHeuristicBuilder<T> {
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

#[inline]
fn finish_time<T>(model: &Model<T>, decision: &Decision<T>) -> T
where
    T: SolverNumeric,
{
    let processing = model
        .vessel_processing_time(decision.vessel_index(), decision.berth_index())
        .into_option()
        .unwrap_or_else(T::zero);
    decision.start_time().saturating_add_val(processing)
}

impl<T, E> DecisionBuilder<T, E> for SlackHeuristicBuilder<T>
where
    T: SolverNumeric,
    E: ObjectiveEvaluator<T>,
{
    type DecisionIterator<'a>
        = RankedDecisionIter<'a, T, T>
    where
        T: 'a,
        E: 'a,
        Self: 'a;

    fn name(&self) -> &str {
        "SlackHeuristicBuilder"
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
            |_, decision| decision.vessel_index(),
        );

        self.ranked.clear();
        for group in self.options.chunk_by(|(a, _), (b, _)| a == b) {
            let vessel_index = group[0].0;
            let earliest_finish = group
                .iter()
                .map(|(_, decision)| finish_time(model, decision))
                .min()
                .unwrap_or_else(T::max_value);
            let slack = model
                .vessel_latest_departure_time(vessel_index)
                .saturating_sub_val(earliest_finish);
            self.ranked
                .extend(group.iter().map(|&(_, decision)| (slack, decision)));
        }
        self.ranked.sort_unstable();

        RankedDecisionIter::new(&self.ranked)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::branching::test_support::{model, root_order};

    #[test]
    fn test_tightest_vessel_first() {
        // slack: v0 = 100 - 9, v1 = 30 - 6, v2 = 20 - 10
        let model = model();
        let mut builder = SlackHeuristicBuilder::new();
        assert_eq!(
            root_order(&mut builder, &model),
            vec![(2, 0), (2, 1), (1, 0), (0, 0), (0, 1)]
        );
    }
}
