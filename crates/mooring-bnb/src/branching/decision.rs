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

//! Decisions and the `DecisionBuilder` trait.
//!
//! A `Decision` is one branch of the tree: "service vessel `v` at berth `b`
//! starting at `start_time`", priced with the objective increment it causes.
//!
//! Decisions are semi-active: the start time is always the earliest instant
//! at or after `max(arrival, berth release)` where the vessel fits into an
//! available window of the berth. Every schedule can be left-shifted into
//! such a form without increasing its weighted completion time, so this loses
//! no optimal solutions.
//!
//! [`Decision::try_new`] additionally breaks two symmetries:
//!
//! - Chronological order. Decisions along a branch never go back in time,
//!   and two decisions on different berths with the same start are taken in
//!   vessel-index order.
//! - Identical berths. If berth `b` mirrors berth `b - 1` (same windows, same
//!   processing times) and both are released at the same time, only `b - 1`
//!   is tried.

use crate::{
    berth_availability::BerthAvailability, eval::evaluator::ObjectiveEvaluator, state::SearchState,
};
use mooring_model::{
    index::{BerthIndex, VesselIndex},
    model::Model,
};
use mooring_search::num::SolverNumeric;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Decision<T> {
    start_time: T,
    cost_delta: T,
    vessel_index: VesselIndex,
    berth_index: BerthIndex,
}

impl<T> Decision<T>
where
    T: Copy,
{
    #[inline]
    pub fn new(
        vessel_index: VesselIndex,
        berth_index: BerthIndex,
        start_time: T,
        cost_delta: T,
    ) -> Self {
        Self {
            start_time,
            cost_delta,
            vessel_index,
            berth_index,
        }
    }

    #[inline]
    pub fn vessel_index(&self) -> VesselIndex {
        self.vessel_index
    }

    #[inline]
    pub fn berth_index(&self) -> BerthIndex {
        self.berth_index
    }

    #[inline]
    pub fn start_time(&self) -> T {
        self.start_time
    }

    /// Weighted completion time this decision adds to the objective.
    #[inline]
    pub fn cost_delta(&self) -> T {
        self.cost_delta
    }
}

impl<T> Decision<T>
where
    T: SolverNumeric,
{
    /// Builds the semi-active decision for `(vessel_index, berth_index)` in
    /// `state`, or `None` if the vessel is already placed, forbidden on the
    /// berth, cannot fit before its deadline, or the decision is a symmetric
    /// duplicate.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds for `model`.
    pub fn try_new<E>(
        vessel_index: VesselIndex,
        berth_index: BerthIndex,
        model: &Model<T>,
        berth_availability: &BerthAvailability<T>,
        state: &SearchState<T>,
        evaluator: &mut E,
    ) -> Option<Self>
    where
        E: ObjectiveEvaluator<T>,
    {
        if state.is_vessel_assigned(vessel_index) {
            return None;
        }

        let processing_time = model
            .vessel_processing_time(vessel_index, berth_index)
            .into_option()?;
        let berth_free = state.berth_free_time(berth_index);
        let ready = model.vessel_arrival_time(vessel_index).max(berth_free);
        let start_time =
            berth_availability.earliest_availability(berth_index, ready, processing_time)?;

        let last_time = state.last_decision_time();
        if start_time < last_time {
            return None;
        }
        if start_time == last_time
            && vessel_index < state.last_decision_vessel()
            && berth_index != state.last_decision_berth()
        {
            return None;
        }

        if berth_index.get() > 0 && berth_availability.mirrors_previous(berth_index) {
            let previous = BerthIndex::new(berth_index.get() - 1);
            if state.berth_free_time(previous) == berth_free {
                return None;
            }
        }

        let cost_delta =
            evaluator.evaluate_vessel_assignment(model, vessel_index, berth_index, start_time)?;

        Some(Self::new(vessel_index, berth_index, start_time, cost_delta))
    }
}

impl<T: Ord> Ord for Decision<T> {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.vessel_index
            .cmp(&other.vessel_index)
            .then(self.berth_index.cmp(&other.berth_index))
            .then(self.start_time.cmp(&other.start_time))
            .then(self.cost_delta.cmp(&other.cost_delta))
    }
}

impl<T: Ord> PartialOrd for Decision<T> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> std::fmt::Display for Decision<T>
where
    T: std::fmt::Display,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Decision(vessel: {}, berth: {}, start_time: {}, cost_delta: {})",
            self.vessel_index, self.berth_index, self.start_time, self.cost_delta
        )
    }
}

/// Produces the children of a search node.
///
/// Implementations yield the candidate decisions of `state` best-first; the
/// engine explores them in exactly that order. The iterator may borrow the
/// builder's scratch buffers.
pub trait DecisionBuilder<T, E>
where
    T: SolverNumeric,
    E: ObjectiveEvaluator<T>,
{
    type DecisionIterator<'a>: Iterator<Item = Decision<T>> + 'a
    where
        T: 'a,
        E: 'a,
        Self: 'a;

    fn name(&self) -> &str;

    fn next_decision<'a>(
        &'a mut self,
        evaluator: &'a mut E,
        model: &'a Model<T>,
        berth_availability: &'a BerthAvailability<T>,
        state: &'a SearchState<T>,
    ) -> Self::DecisionIterator<'a>;
}

/// Iterator over a builder's sorted `(key, decision)` buffer.
#[derive(Debug, Clone)]
pub struct RankedDecisionIter<'a, K, T> {
    iter: std::slice::Iter<'a, (K, Decision<T>)>,
}

impl<'a, K, T> RankedDecisionIter<'a, K, T> {
    #[inline]
    pub fn new(ranked: &'a [(K, Decision<T>)]) -> Self {
        Self {
            iter: ranked.iter(),
        }
    }
}

impl<K, T> Iterator for RankedDecisionIter<'_, K, T>
where
    T: Copy,
{
    type Item = Decision<T>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.iter.next().map(|(_, decision)| *decision)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.iter.size_hint()
    }
}

impl<K, T> ExactSizeIterator for RankedDecisionIter<'_, K, T> where T: Copy {}

impl<K, T> std::iter::FusedIterator for RankedDecisionIter<'_, K, T> where T: Copy {}

/// Collects every valid decision of `state` into `out` keyed by `key` and
/// sorts it; ties fall back to the decision order.
pub(crate) fn collect_ranked<T, E, K, F>(
    out: &mut Vec<(K, Decision<T>)>,
    evaluator: &mut E,
    model: &Model<T>,
    berth_availability: &BerthAvailability<T>,
    state: &SearchState<T>,
    mut key: F,
) where
    T: SolverNumeric,
    E: ObjectiveEvaluator<T>,
    K: Ord,
    F: FnMut(&Model<T>, &Decision<T>) -> K,
{
    out.clear();
    for vessel_index in state.unassigned_vessels() {
        for b in 0..model.num_berths() {
            let berth_index = BerthIndex::new(b);
            if let Some(decision) = Decision::try_new(
                vessel_index,
                berth_index,
                model,
                berth_availability,
                state,
                evaluator,
            ) {
                let rank = key(model, &decision);
                out.push((rank, decision));
            }
        }
    }
    out.sort_unstable();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eval::wtft::WeightedFlowTimeEvaluator;
    use mooring_core::math::interval::ClosedOpenInterval;
    use mooring_model::{model::ModelBuilder, time::ProcessingTime};

    fn v(i: usize) -> VesselIndex {
        VesselIndex::new(i)
    }

    fn b(i: usize) -> BerthIndex {
        BerthIndex::new(i)
    }

    fn model(closing_on_second: bool) -> Model<i64> {
        let mut builder = ModelBuilder::<i64>::new(2, 2);
        for vessel in 0..2 {
            for berth in 0..2 {
                builder.set_vessel_processing_time(v(vessel), b(berth), ProcessingTime::some(10));
            }
        }
        builder
            .set_vessel_arrival_time(v(1), 4)
            .set_vessel_weight(v(1), 2);
        if closing_on_second {
            builder.add_berth_closing_time(b(1), ClosedOpenInterval::new(0, 6));
        }
        builder.build()
    }

    fn setup(model: &Model<i64>) -> (BerthAvailability<i64>, SearchState<i64>) {
        let mut availability = BerthAvailability::new();
        assert!(availability.initialize(model, &[]));
        let state = SearchState::new(model.num_berths(), model.num_vessels());
        (availability, state)
    }

    #[test]
    fn test_semi_active_start_and_cost() {
        let model = model(true);
        let (availability, state) = setup(&model);
        let mut eval = WeightedFlowTimeEvaluator::new();

        let d = Decision::try_new(v(1), b(0), &model, &availability, &state, &mut eval).unwrap();
        assert_eq!(d.start_time(), 4);
        assert_eq!(d.cost_delta(), 2 * 14);

        let d = Decision::try_new(v(1), b(1), &model, &availability, &state, &mut eval).unwrap();
        assert_eq!(d.start_time(), 6);
        assert_eq!(d.cost_delta(), 2 * 16);
    }

    #[test]
    fn test_identical_berth_is_skipped_while_released_together() {
        let model = model(false);
        let (availability, mut state) = setup(&model);
        let mut eval = WeightedFlowTimeEvaluator::new();

        assert!(Decision::try_new(v(0), b(0), &model, &availability, &state, &mut eval).is_some());
        assert!(Decision::try_new(v(0), b(1), &model, &availability, &state, &mut eval).is_none());

        state.set_berth_free_time(b(0), 10);
        assert!(Decision::try_new(v(1), b(1), &model, &availability, &state, &mut eval).is_some());
    }

    #[test]
    fn test_no_going_back_in_time() {
        let model = model(true);
        let (availability, mut state) = setup(&model);
        let mut eval = WeightedFlowTimeEvaluator::new();

        state.set_last_decision(5, v(1), b(1));
        assert!(Decision::try_new(v(0), b(0), &model, &availability, &state, &mut eval).is_none());
    }

    #[test]
    fn test_equal_start_on_other_berth_follows_vessel_order() {
        let model = model(true);
        let (availability, mut state) = setup(&model);
        let mut eval = WeightedFlowTimeEvaluator::new();

        state.set_last_decision(0, v(1), b(1));
        assert!(Decision::try_new(v(0), b(0), &model, &availability, &state, &mut eval).is_none());
        state.set_last_decision(0, v(1), b(0));
        assert!(Decision::try_new(v(0), b(0), &model, &availability, &state, &mut eval).is_some());
    }

    #[test]
    fn test_deadline_and_forbidden_pairs_are_rejected() {
        let mut builder = ModelBuilder::<i64>::new(2, 1);
        builder
            .set_vessel_processing_time(v(0), b(0), ProcessingTime::some(10))
            .set_vessel_latest_departure_time(v(0), 9);
        let model = builder.build();
        let (availability, state) = setup(&model);
        let mut eval = WeightedFlowTimeEvaluator::new();
        assert!(Decision::try_new(v(0), b(0), &model, &availability, &state, &mut eval).is_none());
        assert!(Decision::try_new(v(0), b(1), &model, &availability, &state, &mut eval).is_none());
    }

    #[test]
    fn test_ordering_and_display() {
        let a = Decision::new(v(0), b(1), 5i64, 3);
        let c = Decision::new(v(1), b(0), 0i64, 0);
        assert!(a < c);
        assert_eq!(
            a.to_string(),
            "Decision(vessel: VesselIndex(0), berth: BerthIndex(1), start_time: 5, cost_delta: 3)"
        );
    }
}
