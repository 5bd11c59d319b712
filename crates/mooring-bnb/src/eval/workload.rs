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

//! Workload lower bound.
//!
//! Relaxes maintenance windows and treats every berth as a copy of the
//! fastest one. All remaining vessels are released together at
//! `max(earliest berth release, earliest arrival, last decision time)` and
//! the bound is that of sequencing them in WSPT order on a single machine
//! `num_berths` times as fast.
//!
//! Only berths a vessel can still reach count towards its fastest one, and a
//! node is reported infeasible when some vessel has none left.

use crate::{
    berth_availability::BerthAvailability,
    eval::{
        bounds::{collect_open_berths, earliest_finish, parallel_wspt_bound},
        evaluator::ObjectiveEvaluator,
    },
    state::SearchState,
};
use fixedbitset::FixedBitSet;
use mooring_model::{index::BerthIndex, model::Model};
use mooring_search::num::SolverNumeric;

#[derive(Debug, Clone)]
pub struct WorkloadEvaluator<T> {
    jobs: Vec<(T, T)>,
    open_berths: FixedBitSet,
}

impl<T> Default for WorkloadEvaluator<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> WorkloadEvaluator<T> {
    #[inline]
    pub fn new() -> Self {
        Self {
            jobs: Vec::new(),
            open_berths: FixedBitSet::new(),
        }
    }

    #[inline]
    pub fn preallocated(num_berths: usize, num_vessels: usize) -> Self {
        Self {
            jobs: Vec::with_capacity(num_vessels),
            open_berths: FixedBitSet::with_capacity(num_berths),
        }
    }
}

impl<T> ObjectiveEvaluator<T> for WorkloadEvaluator<T>
where
    T: SolverNumeric,
{
    fn name(&self) -> &str {
        "WorkloadEvaluator"
    }

    fn estimate_remaining_cost(
        &mut self,
        model: &Model<T>,
        berth_availability: &BerthAvailability<T>,
        state: &SearchState<T>,
    ) -> Option<T> {
        self.jobs.clear();
        collect_open_berths(model, berth_availability, state, &mut self.open_berths);

        let last = state.last_decision_time();
        let mut release = T::max_value();
        for vessel_index in state.unassigned_vessels() {
            let arrival = model.vessel_arrival_time(vessel_index);

            let mut fastest: Option<T> = None;
            for b in 0..model.num_berths() {
                let berth_index = BerthIndex::new(b);
                let Some(processing) = model
                    .vessel_processing_time(vessel_index, berth_index)
                    .into_option()
                else {
                    continue;
                };
                let reachable = earliest_finish(
                    model,
                    berth_availability,
                    state,
                    &self.open_berths,
                    vessel_index,
                    berth_index,
                )
                .is_some();
                if reachable {
                    fastest = Some(fastest.map_or(processing, |p| p.min(processing)));
                }
            }

            self.jobs
                .push((fastest?, model.vessel_weight(vessel_index)));
            release = release.min(arrival);
        }

        if self.jobs.is_empty() {
            return Some(T::zero());
        }

        let earliest_berth = state
            .berth_free_times()
            .iter()
            .copied()
            .min()
            .unwrap_or_else(T::zero);
        let release = release.max(earliest_berth).max(last);

        Some(parallel_wspt_bound(
            &mut self.jobs,
            release,
            model.num_berths(),
        ))
    }
}
