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

//! Weighted flow time lower bound.
//!
//! Every unassigned vessel contributes `w · earliest_finish`, where the
//! earliest finish respects the berth's available windows, its release time
//! and the vessel's deadline. Vessels with exactly one feasible berth are
//! grouped per berth: such a group has to be serviced one after the other,
//! so it contributes at least the single-machine WSPT sequence starting at
//! the group's earliest possible start.

use crate::{
    berth_availability::BerthAvailability,
    eval::{
        bounds::{VesselBound, collect_vessel_bounds, parallel_wspt_bound},
        evaluator::ObjectiveEvaluator,
    },
    state::SearchState,
};
use fixedbitset::FixedBitSet;
use mooring_model::{model::Model, solution::weighted_cost};
use mooring_search::num::SolverNumeric;

#[derive(Debug, Clone)]
pub struct WeightedFlowTimeEvaluator<T> {
    vessels: Vec<VesselBound<T>>,
    open_berths: FixedBitSet,
    group: Vec<(T, T)>,
}

impl<T> Default for WeightedFlowTimeEvaluator<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> WeightedFlowTimeEvaluator<T> {
    #[inline]
    pub fn new() -> Self {
        Self {
            vessels: Vec::new(),
            open_berths: FixedBitSet::new(),
            group: Vec::new(),
        }
    }

    #[inline]
    pub fn preallocated(num_berths: usize, num_vessels: usize) -> Self {
        Self {
            vessels: Vec::with_capacity(num_vessels),
            open_berths: FixedBitSet::with_capacity(num_berths),
            group: Vec::with_capacity(num_vessels),
        }
    }
}

impl<T> ObjectiveEvaluator<T> for WeightedFlowTimeEvaluator<T>
where
    T: SolverNumeric,
{
    fn name(&self) -> &str {
        "WeightedFlowTimeEvaluator"
    }

    fn estimate_remaining_cost(
        &mut self,
        model: &Model<T>,
        berth_availability: &BerthAvailability<T>,
        state: &SearchState<T>,
    ) -> Option<T> {
        if !collect_vessel_bounds(
            model,
            berth_availability,
            state,
            &mut self.open_berths,
            &mut self.vessels,
        ) {
            return None;
        }

        let mut total = T::zero();
        for entry in self.vessels.iter().filter(|e| e.feasible_berths > 1) {
            total = total.saturating_add_val(weighted_cost(entry.weight, entry.earliest_finish));
        }

        // Single-berth vessels, grouped by berth.
        self.vessels
            .sort_unstable_by_key(|e| (e.feasible_berths != 1, e.best_berth));
        let singles = self
            .vessels
            .partition_point(|e| e.feasible_berths == 1);

        let mut cursor = 0;
        while cursor < singles {
            let berth = self.vessels[cursor].best_berth;
            let end = cursor
                + self.vessels[cursor..singles]
                    .iter()
                    .take_while(|e| e.best_berth == berth)
                    .count();
            let members = &self.vessels[cursor..end];

            let mut independent = T::zero();
            let mut release = T::max_value();
            self.group.clear();
            for entry in members {
                independent = independent
                    .saturating_add_val(weighted_cost(entry.weight, entry.earliest_finish));
                let processing = entry.shortest_processing;
                release = release.min(entry.earliest_finish.saturating_sub_val(processing));
                self.group.push((processing, entry.weight));
            }
            let sequenced = parallel_wspt_bound(&mut self.group, release, 1);

            total = total.saturating_add_val(independent.max(sequenced));
            cursor = end;
        }

        Some(total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mooring_model::{
        index::{BerthIndex, VesselIndex},
        model::ModelBuilder,
        time::ProcessingTime,
    };

    fn v(i: usize) -> VesselIndex {
        VesselIndex::new(i)
    }

    fn b(i: usize) -> BerthIndex {
        BerthIndex::new(i)
    }

    #[test]
    fn test_assignment_cost_and_deadline() {
        let mut builder = ModelBuilder::<i64>::new(1, 1);
        builder
            .set_vessel_processing_time(v(0), b(0), ProcessingTime::some(4))
            .set_vessel_weight(v(0), 3)
            .set_vessel_latest_departure_time(v(0), 10);
        let model = builder.build();
        let mut eval = WeightedFlowTimeEvaluator::new();
        assert_eq!(eval.evaluate_vessel_assignment(&model, v(0), b(0), 2), Some(18));
        assert_eq!(eval.evaluate_vessel_assignment(&model, v(0), b(0), 6), Some(30));
        assert_eq!(eval.evaluate_vessel_assignment(&model, v(0), b(0), 7), None);
    }

    #[test]
    fn test_single_berth_group_is_sequenced() {
        // Two vessels that can only use berth 0, both arriving at 0 with p = 10.
        let mut builder = ModelBuilder::<i64>::new(2, 2);
        builder
            .set_vessel_processing_time(v(0), b(0), ProcessingTime::some(10))
            .set_vessel_processing_time(v(1), b(0), ProcessingTime::some(10));
        let model = builder.build();

        let mut availability = BerthAvailability::new();
        assert!(availability.initialize(&model, &[]));
        let state = SearchState::new(2, 2);

        let mut eval = WeightedFlowTimeEvaluator::new();
        // Independent: 10 + 10 = 20; sequenced: 10 + 20 = 30.
        assert_eq!(eval.estimate_remaining_cost(&model, &availability, &state), Some(30));
        assert_eq!(eval.lower_bound(&model, &availability, &state), Some(30));
    }

    #[test]
    fn test_flexible_vessels_use_earliest_finish() {
        let mut builder = ModelBuilder::<i64>::new(2, 2);
        for vessel in 0..2 {
            for berth in 0..2 {
                builder.set_vessel_processing_time(v(vessel), b(berth), ProcessingTime::some(5));
            }
        }
        builder.set_vessel_arrival_time(v(1), 3);
        let model = builder.build();

        let mut availability = BerthAvailability::new();
        assert!(availability.initialize(&model, &[]));
        let state = SearchState::new(2, 2);

        let mut eval = WeightedFlowTimeEvaluator::preallocated(2, 2);
        assert_eq!(eval.estimate_remaining_cost(&model, &availability, &state), Some(5 + 8));
    }

    #[test]
    fn test_unplaceable_vessel_is_infeasible() {
        let mut builder = ModelBuilder::<i64>::new(1, 1);
        builder.set_vessel_latest_departure_time(v(0), 100);
        let model = builder.build();
        let mut availability = BerthAvailability::new();
        assert!(availability.initialize(&model, &[]));
        let state = SearchState::new(1, 1);
        let mut eval = WeightedFlowTimeEvaluator::new();
        assert_eq!(eval.estimate_remaining_cost(&model, &availability, &state), None);
    }
}
