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

//! Guided local search.
//!
//! Features are `(vessel, berth)` assignments. Each feature carries a penalty
//! counter, and candidates are compared on the augmented objective
//! `objective + lambda * sum(penalty(v, berth(v)))`. At a local optimum the
//! features of the current schedule with maximal utility
//! `cost / (1 + penalty)` get their counter raised, where `cost` is the
//! vessel's weighted completion time; the sweep then restarts under the new
//! penalties. The decoder sees the same penalties through
//! [`GuidedEvaluator`] when it has to choose a berth.
//!
//! Penalties steer only; every reported objective is the true one.

use crate::{
    eval::{AssignmentEvaluator, Evaluation, WeightedFlowTimeEvaluator},
    memory::Schedule,
    meta::metaheuristic::{DEFAULT_STAGNATION_LIMIT, LocalOptimumAction, Metaheuristic},
};
use mooring_model::{
    index::{BerthIndex, VesselIndex},
    model::Model,
    solution::{Solution, weighted_cost},
};
use mooring_search::num::SolverNumeric;

/// Utilities closer than this count as equal.
const UTILITY_EPSILON: f64 = 1e-9;

/// Penalty counters in row-major `(vessel, berth)` order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct PenaltyMatrix {
    data: Vec<u32>,
    num_berths: usize,
}

impl PenaltyMatrix {
    fn new(num_vessels: usize, num_berths: usize) -> Self {
        Self {
            data: vec![0; num_vessels * num_berths],
            num_berths,
        }
    }

    /// Resizes to the given shape and zeroes every counter.
    fn reset(&mut self, num_vessels: usize, num_berths: usize) {
        self.data.clear();
        self.data.resize(num_vessels * num_berths, 0);
        self.num_berths = num_berths;
    }

    /// `None` for pairs outside the matrix.
    #[inline]
    fn index(&self, vessel_index: VesselIndex, berth_index: BerthIndex) -> Option<usize> {
        let berth = berth_index.get();
        if berth >= self.num_berths {
            return None;
        }
        let index = vessel_index.get() * self.num_berths + berth;
        (index < self.data.len()).then_some(index)
    }

    /// Zero for pairs outside the matrix.
    #[inline]
    fn get(&self, vessel_index: VesselIndex, berth_index: BerthIndex) -> u32 {
        self.index(vessel_index, berth_index)
            .map_or(0, |index| self.data[index])
    }

    fn increment(&mut self, vessel_index: VesselIndex, berth_index: BerthIndex) {
        if let Some(index) = self.index(vessel_index, berth_index) {
            self.data[index] = self.data[index].saturating_add(1);
        }
    }
}

/// [`WeightedFlowTimeEvaluator`] plus `lambda * penalty(v, b)` on the score.
#[derive(Debug, Clone, PartialEq)]
pub struct GuidedEvaluator {
    inner: WeightedFlowTimeEvaluator,
    penalties: PenaltyMatrix,
    lambda: f64,
}

impl GuidedEvaluator {
    fn new(num_vessels: usize, num_berths: usize, lambda: f64) -> Self {
        Self {
            inner: WeightedFlowTimeEvaluator::new(),
            penalties: PenaltyMatrix::new(num_vessels, num_berths),
            lambda,
        }
    }

    #[inline]
    pub fn lambda(&self) -> f64 {
        self.lambda
    }

    #[inline]
    pub fn penalty(&self, vessel_index: VesselIndex, berth_index: BerthIndex) -> u32 {
        self.penalties.get(vessel_index, berth_index)
    }
}

impl<T> AssignmentEvaluator<T> for GuidedEvaluator
where
    T: SolverNumeric,
{
    fn name(&self) -> &str {
        "GuidedEvaluator"
    }

    fn evaluate(
        &self,
        model: &Model<T>,
        vessel_index: VesselIndex,
        berth_index: BerthIndex,
        start_time: T,
    ) -> Option<Evaluation<T>> {
        let evaluation = self
            .inner
            .evaluate(model, vessel_index, berth_index, start_time)?;
        let count = self.penalties.get(vessel_index, berth_index);
        if count == 0 || self.lambda == 0.0 {
            return Some(evaluation);
        }
        let penalty = T::from_f64((self.lambda * f64::from(count)).round()).unwrap_or(T::max_value());
        Some(Evaluation::new(
            evaluation.score.saturating_add_val(penalty),
            evaluation.objective_delta,
        ))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GuidedLocalSearch {
    evaluator: GuidedEvaluator,
    stagnation_limit: u64,
    stagnation: u64,
    current_augmented: f64,
}

impl GuidedLocalSearch {
    pub const REFERENCE_LAMBDA_RATIO: f64 = 0.1;

    /// # Panics
    ///
    /// Panics if `lambda` is negative or not finite.
    pub fn new(lambda: f64, stagnation_limit: u64) -> Self {
        Self::preallocated(lambda, stagnation_limit, 0, 0)
    }

    /// # Panics
    ///
    /// Panics if `lambda` is negative or not finite.
    pub fn preallocated(
        lambda: f64,
        stagnation_limit: u64,
        num_vessels: usize,
        num_berths: usize,
    ) -> Self {
        assert!(
            lambda.is_finite() && lambda >= 0.0,
            "called `GuidedLocalSearch::new` with invalid lambda: {}",
            lambda
        );
        Self {
            evaluator: GuidedEvaluator::new(num_vessels, num_berths, lambda),
            stagnation_limit,
            stagnation: 0,
            current_augmented: f64::INFINITY,
        }
    }

    /// `lambda = 0.1 * objective / num_vessels` of the reference solution and
    /// the default stagnation limit.
    pub fn from_reference<T>(model: &Model<T>, reference: &Solution<T>) -> Self
    where
        T: SolverNumeric,
    {
        let objective = reference.objective_value().to_f64().unwrap_or(0.0).max(0.0);
        let lambda = Self::REFERENCE_LAMBDA_RATIO * objective / model.num_vessels().max(1) as f64;
        Self::preallocated(
            lambda,
            DEFAULT_STAGNATION_LIMIT,
            model.num_vessels(),
            model.num_berths(),
        )
    }

    #[inline]
    pub fn lambda(&self) -> f64 {
        self.evaluator.lambda
    }

    fn augmented_objective<T>(&self, schedule: &Schedule<T>) -> f64
    where
        T: SolverNumeric,
    {
        let Some(objective) = schedule.objective_value().to_f64() else {
            return f64::INFINITY;
        };
        let penalties: u64 = schedule
            .berths()
            .iter()
            .enumerate()
            .map(|(v, &b)| u64::from(self.evaluator.penalties.get(VesselIndex::new(v), b)))
            .sum();
        objective + self.evaluator.lambda * penalties as f64
    }

    /// Raises the counters of the maximal-utility features of `current`.
    fn penalize<T>(&mut self, model: &Model<T>, current: &Schedule<T>)
    where
        T: SolverNumeric,
    {
        let mut max_utility = f64::NEG_INFINITY;
        let mut features: Vec<(VesselIndex, BerthIndex)> = Vec::new();
        for (v, &berth_index) in current.berths().iter().enumerate() {
            let vessel_index = VesselIndex::new(v);
            let Some(processing_time) = model
                .vessel_processing_time(vessel_index, berth_index)
                .into_option()
            else {
                continue;
            };
            let finish = current
                .start_time_for_vessel(vessel_index)
                .saturating_add_val(processing_time);
            let Some(cost) = weighted_cost(model.vessel_weight(vessel_index), finish).to_f64()
            else {
                continue;
            };
            let utility =
                cost / (1.0 + f64::from(self.evaluator.penalties.get(vessel_index, berth_index)));

            if utility > max_utility + UTILITY_EPSILON {
                max_utility = utility;
                features.clear();
                features.push((vessel_index, berth_index));
            } else if (utility - max_utility).abs() <= UTILITY_EPSILON {
                features.push((vessel_index, berth_index));
            }
        }
        for (vessel_index, berth_index) in features {
            self.evaluator.penalties.increment(vessel_index, berth_index);
        }
    }
}

impl<T> Metaheuristic<T> for GuidedLocalSearch
where
    T: SolverNumeric,
{
    type Evaluator = GuidedEvaluator;

    fn name(&self) -> &str {
        "GuidedLocalSearch"
    }

    fn evaluator(&self) -> &Self::Evaluator {
        &self.evaluator
    }

    fn on_start(&mut self, model: &Model<T>, initial_solution: &Schedule<T>) {
        self.evaluator
            .penalties
            .reset(model.num_vessels(), model.num_berths());
        self.stagnation = 0;
        self.current_augmented = self.augmented_objective(initial_solution);
    }

    fn should_accept(
        &mut self,
        _model: &Model<T>,
        _current: &Schedule<T>,
        candidate: &Schedule<T>,
        _best: &Schedule<T>,
    ) -> bool {
        self.augmented_objective(candidate) < self.current_augmented - UTILITY_EPSILON
    }

    fn on_accept(&mut self, _model: &Model<T>, new_current: &Schedule<T>) {
        self.current_augmented = self.augmented_objective(new_current);
    }

    fn on_new_best(&mut self, _model: &Model<T>, _new_best: &Schedule<T>) {
        self.stagnation = 0;
    }

    fn on_local_optimum(
        &mut self,
        model: &Model<T>,
        current: &Schedule<T>,
        _best: &Schedule<T>,
    ) -> LocalOptimumAction {
        self.stagnation += 1;
        if self.stagnation >= self.stagnation_limit {
            return LocalOptimumAction::Terminate("stagnation limit reached".to_string());
        }
        self.penalize(model, current);
        self.current_augmented = self.augmented_objective(current);
        LocalOptimumAction::Restart
    }
}
