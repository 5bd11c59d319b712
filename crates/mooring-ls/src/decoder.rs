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

//! Decoding a genotype into a schedule.
//!
//! `GreedyDecoder` walks the priority queue once. Every vessel is appended to
//! the timeline of its preferred berth at the earliest start that respects the
//! vessel's arrival, the berth's release time, its opening windows and the
//! vessel's deadline. If the preferred berth cannot take the vessel, every
//! other berth is tried and the one with the lowest evaluator score wins
//! (ties: earlier finish, then earlier start, then lower berth index).

use crate::{
    eval::{AssignmentEvaluator, Evaluation},
    memory::Schedule,
    queue::VesselPriorityQueue,
};
use mooring_core::algorithm::earliest_fit;
use mooring_model::{
    index::{BerthIndex, VesselIndex},
    model::Model,
};
use mooring_search::num::SolverNumeric;

pub trait Decoder<T, E>
where
    T: SolverNumeric,
    E: AssignmentEvaluator<T>,
{
    fn name(&self) -> &str;

    /// Fills `schedule` from `queue` and `preferred_berths`. Returns `false`
    /// if some vessel fits nowhere; `schedule` is then unspecified.
    fn decode(
        &mut self,
        model: &Model<T>,
        queue: &VesselPriorityQueue,
        preferred_berths: &[BerthIndex],
        evaluator: &E,
        schedule: &mut Schedule<T>,
    ) -> bool;
}

#[derive(Debug, Clone, Default)]
pub struct GreedyDecoder<T> {
    berth_free_times: Vec<T>,
}

/// A feasible placement of one vessel.
#[derive(Debug, Clone, Copy)]
struct Placement<T> {
    berth_index: BerthIndex,
    start: T,
    finish: T,
    evaluation: Evaluation<T>,
}

impl<T> Placement<T>
where
    T: SolverNumeric,
{
    #[inline]
    fn is_better_than(&self, other: &Self) -> bool {
        (self.evaluation.score, self.finish, self.start, self.berth_index)
            < (other.evaluation.score, other.finish, other.start, other.berth_index)
    }
}

impl<T> GreedyDecoder<T>
where
    T: SolverNumeric,
{
    #[inline]
    pub fn new() -> Self {
        Self {
            berth_free_times: Vec::new(),
        }
    }

    #[inline]
    pub fn preallocated(num_berths: usize) -> Self {
        Self {
            berth_free_times: Vec::with_capacity(num_berths),
        }
    }

    fn place<E>(
        &self,
        model: &Model<T>,
        evaluator: &E,
        vessel_index: VesselIndex,
        berth_index: BerthIndex,
    ) -> Option<Placement<T>>
    where
        E: AssignmentEvaluator<T>,
    {
        let processing_time = model
            .vessel_processing_time(vessel_index, berth_index)
            .into_option()?;
        let ready = model
            .vessel_arrival_time(vessel_index)
            .max(self.berth_free_times[berth_index.get()]);
        let start = earliest_fit(
            model.berth_opening_times(berth_index),
            ready,
            processing_time,
        )?;
        let finish = start.checked_add_val(processing_time)?;
        if finish > model.vessel_latest_departure_time(vessel_index) {
            return None;
        }
        let evaluation = evaluator.evaluate(model, vessel_index, berth_index, start)?;
        Some(Placement {
            berth_index,
            start,
            finish,
            evaluation,
        })
    }

    fn best_alternative<E>(
        &self,
        model: &Model<T>,
        evaluator: &E,
        vessel_index: VesselIndex,
        skip: Option<BerthIndex>,
    ) -> Option<Placement<T>>
    where
        E: AssignmentEvaluator<T>,
    {
        let mut best: Option<Placement<T>> = None;
        for b in 0..model.num_berths() {
            let berth_index = BerthIndex::new(b);
            if Some(berth_index) == skip {
                continue;
            }
            let Some(placement) = self.place(model, evaluator, vessel_index, berth_index) else {
                continue;
            };
            if best.is_none_or(|current| placement.is_better_than(&current)) {
                best = Some(placement);
            }
        }
        best
    }
}

impl<T, E> Decoder<T, E> for GreedyDecoder<T>
where
    T: SolverNumeric,
    E: AssignmentEvaluator<T>,
{
    fn name(&self) -> &str {
        "GreedyDecoder"
    }

    fn decode(
        &mut self,
        model: &Model<T>,
        queue: &VesselPriorityQueue,
        preferred_berths: &[BerthIndex],
        evaluator: &E,
        schedule: &mut Schedule<T>,
    ) -> bool {
        debug_assert_eq!(queue.len(), model.num_vessels());
        debug_assert_eq!(preferred_berths.len(), model.num_vessels());

        self.berth_free_times.clear();
        self.berth_free_times
            .resize(model.num_berths(), T::min_value());
        schedule.reset(model.num_vessels());

        let mut objective = T::zero();
        for &vessel_index in queue {
            let preferred = preferred_berths
                .get(vessel_index.get())
                .copied()
                .filter(|b| b.get() < model.num_berths());

            let placement = match preferred
                .and_then(|b| self.place(model, evaluator, vessel_index, b))
            {
                Some(placement) => placement,
                None => match self.best_alternative(model, evaluator, vessel_index, preferred) {
                    Some(placement) => placement,
                    None => return false,
                },
            };

            self.berth_free_times[placement.berth_index.get()] = placement.finish;
            schedule.assign(vessel_index, placement.berth_index, placement.start);
            objective = objective.saturating_add_val(placement.evaluation.objective_delta);
        }

        schedule.set_objective_value(objective);
        true
    }
}
