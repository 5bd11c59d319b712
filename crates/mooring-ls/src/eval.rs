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

//! Assignment evaluation for the decoder.
//!
//! An evaluation carries two numbers: the `score` the decoder minimizes when
//! it has to pick a berth, and the `objective_delta` it adds to the schedule.
//! Plain evaluators use the weighted completion time for both; guided
//! evaluators add penalties to the score only, so the reported objective
//! stays the true cost.

use mooring_model::{
    index::{BerthIndex, VesselIndex},
    model::Model,
    solution::weighted_cost,
};
use mooring_search::num::SolverNumeric;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Evaluation<T> {
    /// Lower is better.
    pub score: T,
    pub objective_delta: T,
}

impl<T> Evaluation<T> {
    #[inline]
    pub fn new(score: T, objective_delta: T) -> Self {
        Self {
            score,
            objective_delta,
        }
    }
}

impl<T> std::fmt::Display for Evaluation<T>
where
    T: std::fmt::Display,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Evaluation(score: {}, objective_delta: {})",
            self.score, self.objective_delta
        )
    }
}

pub trait AssignmentEvaluator<T>
where
    T: SolverNumeric,
{
    fn name(&self) -> &str;

    /// Evaluates servicing `vessel_index` at `berth_index` from `start_time`.
    /// Returns `None` for forbidden pairs and deadline misses.
    fn evaluate(
        &self,
        model: &Model<T>,
        vessel_index: VesselIndex,
        berth_index: BerthIndex,
        start_time: T,
    ) -> Option<Evaluation<T>>;
}

impl<T> std::fmt::Debug for dyn AssignmentEvaluator<T>
where
    T: SolverNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "AssignmentEvaluator({})", self.name())
    }
}

/// Score and objective are both `w · (start + p)`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct WeightedFlowTimeEvaluator;

impl WeightedFlowTimeEvaluator {
    #[inline]
    pub fn new() -> Self {
        Self
    }
}

impl std::fmt::Display for WeightedFlowTimeEvaluator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "WeightedFlowTimeEvaluator")
    }
}

impl<T> AssignmentEvaluator<T> for WeightedFlowTimeEvaluator
where
    T: SolverNumeric,
{
    fn name(&self) -> &str {
        "WeightedFlowTimeEvaluator"
    }

    #[inline]
    fn evaluate(
        &self,
        model: &Model<T>,
        vessel_index: VesselIndex,
        berth_index: BerthIndex,
        start_time: T,
    ) -> Option<Evaluation<T>> {
        let processing_time = model
            .vessel_processing_time(vessel_index, berth_index)
            .into_option()?;
        let finish = start_time.checked_add_val(processing_time)?;
        if finish > model.vessel_latest_departure_time(vessel_index) {
            return None;
        }
        let cost = weighted_cost(model.vessel_weight(vessel_index), finish);
        Some(Evaluation::new(cost, cost))
    }
}
