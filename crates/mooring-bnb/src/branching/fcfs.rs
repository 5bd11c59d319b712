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

/// First-come-first-served branching.
///
/// Orders every feasible `(vessel, berth)` decision by the vessel's arrival
/// time, then by start time, then by the decision's cost. Placing each vessel
/// as early as it can keeps the later arrivals placeable, since decisions
/// along a branch never go back in time.
#[derive(Debug, Clone)]
pub struct FcfsHeuristicBuilder<T> {
    ranked: Vec<((T, T, T), Decision<T>)>,
}

impl<T> Default for FcfsHeuristicBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> FcfsHeuristicBuilder<T> {
    #[inline]
    pub fn new() -> Self {
        Self { ranked: Vec::new() }
    }

    /// Room for `num_berths * num_vessels` candidates.
    #[inline]
    pub fn preallocated(num_berths: usize, num_vessels: usize) -> Self {
        Self {
            ranked: Vec::with_capacity(num_berths.saturating_mul(num_vessels)),
        }
    }
}

impl<T, E> DecisionBuilder<T, E> for FcfsHeuristicBuilder<T>
where
    T: SolverNumeric,
    E: ObjectiveEvaluator<T>,
{
    type DecisionIterator<'a>
        = RankedDecisionIter<'a, (T, T, T), T>
    where
        T: 'a,
        E: 'a,
        Self: 'a;

    fn name(&self) -> &str {
        "FcfsHeuristicBuilder"
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
                (
                    model.vessel_arrival_time(decision.vessel_index()),
                    decision.start_time(),
                    decision.cost_delta(),
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
    use mooring_core::math::interval::ClosedOpenInterval;
    use mooring_model::{
        index::{BerthIndex, VesselIndex},
        model::ModelBuilder,
        time::ProcessingTime,
    };

    #[test]
    fn test_arrival_then_cost() {
        let model = model();
        let mut builder = FcfsHeuristicBuilder::new();
        assert_eq!(
            root_order(&mut builder, &model),
            vec![(1, 0), (2, 0), (2, 1), (0, 1), (0, 0)]
        );
    }

    #[test]
    fn test_earlier_start_beats_cheaper_finish() {
        // Berth 0 is closed until 10 but fast, berth 1 is open but slow.
        let (v, b) = (VesselIndex::new, BerthIndex::new);
        let mut builder = ModelBuilder::<i64>::new(2, 1);
        builder
            .set_vessel_processing_time(v(0), b(0), ProcessingTime::some(2))
            .set_vessel_processing_time(v(0), b(1), ProcessingTime::some(20))
            .add_berth_closing_time(b(0), ClosedOpenInterval::new(0, 10));
        let model = builder.build();

        let mut builder = FcfsHeuristicBuilder::new();
        assert_eq!(root_order(&mut builder, &model), vec![(0, 1), (0, 0)]);
    }

    #[test]
    fn test_buffer_is_reused_between_calls() {
        let model = model();
        let mut builder = FcfsHeuristicBuilder::preallocated(2, 3);
        let first = root_order(&mut builder, &model);
        let second = root_order(&mut builder, &model);
        assert_eq!(first, second);
        assert_eq!(second.len(), 5);
    }
}
