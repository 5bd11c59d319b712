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

//! Hybrid lower bound.
//!
//! Takes the larger of two admissible bounds:
//!
//! - the per-vessel bound `Σ w · earliest_finish`, which sees maintenance
//!   windows, berth release times and deadlines but ignores congestion;
//! - the capacity bound, which ignores windows but charges for congestion by
//!   sequencing the remaining vessels in WSPT order over the fastest feasible
//!   berth of each vessel, spread over all berths.
//!
//! The maximum of two lower bounds is a lower bound.

use crate::{
    berth_availability::BerthAvailability,
    eval::{
        bounds::{VesselBound, collect_vessel_bounds, parallel_wspt_bound, per_vessel_bound},
        evaluator::ObjectiveEvaluator,
    },
    state::SearchState,
};
use fixedbitset::FixedBitSet;
use mooring_model::model::Model;
use mooring_search::num::SolverNumeric;

#[derive(Debug, Clone)]
pub struct HybridEvaluator<T> {
    vessels: Vec<VesselBound<T>>,
    open_berths: FixedBitSet,
    jobs: Vec<(T, T)>,
}

impl<T> Default for HybridEvaluator<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> HybridEvaluator<T> {
    #[inline]
    pub fn new() -> Self {
        Self {
            vessels: Vec::new(),
            open_berths: FixedBitSet::new(),
            jobs: Vec::new(),
        }
    }

    #[inline]
    pub fn preallocated(num_berths: usize, num_vessels: usize) -> Self {
        Self {
            vessels: Vec::with_capacity(num_vessels),
            open_berths: FixedBitSet::with_capacity(num_berths),
            jobs: Vec::with_capacity(num_vessels),
        }
    }
}

impl<T> ObjectiveEvaluator<T> for HybridEvaluator<T>
where
    T: SolverNumeric,
{
    fn name(&self) -> &str {
        "HybridEvaluator"
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
        if self.vessels.is_empty() {
            return Some(T::zero());
        }

        let independent = per_vessel_bound(&self.vessels);

        self.jobs.clear();
        let mut release = T::max_value();
        for entry in &self.vessels {
            self.jobs.push((entry.shortest_processing, entry.weight));
            release = release.min(model.vessel_arrival_time(entry.vessel_index));
        }
        let earliest_berth = state
            .berth_free_times()
            .iter()
            .copied()
            .min()
            .unwrap_or_else(T::zero);
        let release = release.max(earliest_berth).max(state.last_decision_time());
        let capacity = parallel_wspt_bound(&mut self.jobs, release, model.num_berths());

        Some(independent.max(capacity))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mooring_core::math::interval::ClosedOpenInterval;
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

    fn uniform(num_vessels: usize, p: i64) -> Model<i64> {
        let mut builder = ModelBuilder::<i64>::new(1, num_vessels);
        for vessel in 0..num_vessels {
            builder.set_vessel_processing_time(v(vessel), b(0), ProcessingTime::some(p));
        }
        builder.build()
    }

    #[test]
    fn test_congestion_dominates_on_crowded_berth() {
        let model = uniform(3, 10);
        let mut availability = BerthAvailability::new();
        assert!(availability.initialize(&model, &[]));
        let state = SearchState::new(1, 3);

        // per-vessel: 3 * 10 = 30; capacity: 10 + 20 + 30 = 60
        let mut eval = HybridEvaluator::new();
        assert_eq!(eval.estimate_remaining_cost(&model, &availability, &state), Some(60));
    }

    #[test]
    fn test_windows_dominate_when_berth_is_closed() {
        let mut builder = ModelBuilder::<i64>::new(1, 1);
        builder
            .set_vessel_processing_time(v(0), b(0), ProcessingTime::some(10))
            .add_berth_closing_time(b(0), ClosedOpenInterval::new(0, 50));
        let model = builder.build();
        let mut availability = BerthAvailability::new();
        assert!(availability.initialize(&model, &[]));
        let state = SearchState::new(1, 1);

        let mut eval = HybridEvaluator::preallocated(1, 1);
        assert_eq!(eval.estimate_remaining_cost(&model, &availability, &state), Some(60));
    }

    #[test]
    fn test_bound_never_exceeds_known_optimum() {
        // Optimum on one berth: 10 + 20 + 30 = 60, any order.
        let model = uniform(3, 10);
        let mut availability = BerthAvailability::new();
        assert!(availability.initialize(&model, &[]));
        let mut state = SearchState::new(1, 3);
        state.assign_vessel(v(0), b(0), 0);
        state.set_berth_free_time(b(0), 10);
        state.set_last_decision(0, v(0), b(0));
        state.set_current_objective(10);

        let mut eval = HybridEvaluator::new();
        let bound = eval.lower_bound(&model, &availability, &state).unwrap();
        assert!(bound <= 60);
        assert_eq!(bound, 60);
    }
}
