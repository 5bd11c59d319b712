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

//! Branching strategies.
//!
//! A decision builder lists the children of a node, best-first. All builders
//! share the decision pipeline of [`decision::Decision::try_new`]
//! (semi-active start times, deadline checks, symmetry breaking) and differ
//! only in the order they return:
//!
//! - `chronological`: row-major by vessel, then berth; lazy.
//! - `fcfs`: earliest arrival first, cheaper decision on ties.
//! - `regret`: largest gap between a vessel's best and second-best option
//!   first; vessels with a single option go first of all.
//! - `slack`: tightest `deadline - earliest finish` per vessel first.
//! - `edf`: tightest `deadline - finish` per decision first.
//! - `wspt`: smallest weighted completion time first.
//! - `spt` / `lpt`: shortest / longest processing time first.
//!
//! Remaining ties are broken by the decision order (vessel, berth, start,
//! cost), so every builder is deterministic.

pub mod chronological;
pub mod decision;
pub mod edf;
pub mod fcfs;
pub mod lpt;
pub mod regret;
pub mod slack;
pub mod spt;
pub mod wspt;

#[cfg(test)]
pub(crate) mod test_support {
    use crate::{
        berth_availability::BerthAvailability,
        branching::decision::{Decision, DecisionBuilder},
        eval::wtft::WeightedFlowTimeEvaluator,
        state::SearchState,
    };
    use mooring_model::{
        index::{BerthIndex, VesselIndex},
        model::{Model, ModelBuilder},
        time::ProcessingTime,
    };

    /// Three vessels, two berths.
    ///
    /// | vessel | arrival | deadline | weight | p(b0) | p(b1) |
    /// |--------|---------|----------|--------|-------|-------|
    /// | 0      | 5       | 100      | 1      | 10    | 4     |
    /// | 1      | 0       | 30       | 3      | 6     | -     |
    /// | 2      | 2       | 20       | 2      | 8     | 9     |
    pub fn model() -> Model<i64> {
        let (v, b) = (VesselIndex::new, BerthIndex::new);
        let mut builder = ModelBuilder::<i64>::new(2, 3);
        builder
            .set_vessel_arrival_time(v(0), 5)
            .set_vessel_latest_departure_time(v(0), 100)
            .set_vessel_processing_time(v(0), b(0), ProcessingTime::some(10))
            .set_vessel_processing_time(v(0), b(1), ProcessingTime::some(4))
            .set_vessel_latest_departure_time(v(1), 30)
            .set_vessel_weight(v(1), 3)
            .set_vessel_processing_time(v(1), b(0), ProcessingTime::some(6))
            .set_vessel_arrival_time(v(2), 2)
            .set_vessel_latest_departure_time(v(2), 20)
            .set_vessel_weight(v(2), 2)
            .set_vessel_processing_time(v(2), b(0), ProcessingTime::some(8))
            .set_vessel_processing_time(v(2), b(1), ProcessingTime::some(9));
        builder.build()
    }

    /// `(vessel, berth)` pairs produced at the root, in order.
    pub fn root_order<B>(builder: &mut B, model: &Model<i64>) -> Vec<(usize, usize)>
    where
        B: DecisionBuilder<i64, WeightedFlowTimeEvaluator<i64>>,
    {
        let mut availability = BerthAvailability::new();
        assert!(availability.initialize(model, &[]));
        let state = SearchState::new(model.num_berths(), model.num_vessels());
        let mut evaluator = WeightedFlowTimeEvaluator::new();
        builder
            .next_decision(&mut evaluator, model, &availability, &state)
            .map(|d: Decision<i64>| (d.vessel_index().get(), d.berth_index().get()))
            .collect()
    }
}
