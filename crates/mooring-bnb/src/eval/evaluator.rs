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

//! The `ObjectiveEvaluator` trait.
//!
//! An evaluator prices single decisions and bounds the cost of completing a
//! partial schedule. The engine prunes a node when
//! `current_objective + estimate_remaining_cost >= incumbent`, so
//! `estimate_remaining_cost` must never exceed the cheapest completion the
//! node's subtree contains. Returning `None` declares the node infeasible.

use crate::{berth_availability::BerthAvailability, state::SearchState};
use mooring_model::{
    index::{BerthIndex, VesselIndex},
    model::Model,
    solution::weighted_cost,
};
use mooring_search::num::SolverNumeric;

pub trait ObjectiveEvaluator<T>
where
    T: SolverNumeric,
{
    fn name(&self) -> &str;

    /// Weighted completion time of servicing `vessel_index` at `berth_index`
    /// from `start_time`, or `None` if the pair is forbidden or the vessel
    /// would miss its deadline.
    fn evaluate_vessel_assignment(
        &mut self,
        model: &Model<T>,
        vessel_index: VesselIndex,
        berth_index: BerthIndex,
        start_time: T,
    ) -> Option<T> {
        let processing_time = model
            .vessel_processing_time(vessel_index, berth_index)
            .into_option()?;
        let finish = start_time.checked_add_val(processing_time)?;
        if finish > model.vessel_latest_departure_time(vessel_index) {
            return None;
        }
        Some(weighted_cost(model.vessel_weight(vessel_index), finish))
    }

    /// Admissible estimate of the cost still to be added by the unassigned
    /// vessels of `state`, or `None` if they cannot all be placed.
    fn estimate_remaining_cost(
        &mut self,
        model: &Model<T>,
        berth_availability: &BerthAvailability<T>,
        state: &SearchState<T>,
    ) -> Option<T>;

    /// `g + h`: the objective so far plus the remaining estimate.
    fn lower_bound(
        &mut self,
        model: &Model<T>,
        berth_availability: &BerthAvailability<T>,
        state: &SearchState<T>,
    ) -> Option<T> {
        let remaining = self.estimate_remaining_cost(model, berth_availability, state)?;
        Some(state.current_objective().saturating_add_val(remaining))
    }
}

impl<T> std::fmt::Debug for dyn ObjectiveEvaluator<T>
where
    T: SolverNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ObjectiveEvaluator({})", self.name())
    }
}
