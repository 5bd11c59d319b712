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

//! Simulated annealing.
//!
//! Improving candidates are always accepted. A candidate that is worse by
//! `delta` is accepted with probability `exp(-delta / temperature)`. The
//! cooling schedule advances once per examined candidate; once it reports
//! frozen, only strict improvements pass and the next exhausted sweep ends
//! the search.

use crate::{
    eval::WeightedFlowTimeEvaluator,
    memory::Schedule,
    meta::metaheuristic::{LocalOptimumAction, Metaheuristic},
};
use mooring_model::{model::Model, solution::Solution};
use mooring_search::num::SolverNumeric;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

pub trait CoolingSchedule: Send + Sync + std::fmt::Debug {
    /// Restores the initial temperature.
    fn on_start(&mut self);

    fn update(&mut self);

    fn current(&self) -> f64;

    fn is_frozen(&self) -> bool;
}

/// `temperature *= alpha` per update.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeometricCooling {
    initial: f64,
    current: f64,
    alpha: f64,
    min_temp: f64,
}

impl GeometricCooling {
    /// # Panics
    ///
    /// Panics if `alpha` is not in `(0, 1)` or `min_temp` is not positive.
    pub fn new(initial: f64, alpha: f64, min_temp: f64) -> Self {
        assert!(
            alpha > 0.0 && alpha < 1.0,
            "called `GeometricCooling::new` with alpha outside (0, 1): {}",
            alpha
        );
        assert!(
            min_temp > 0.0,
            "called `GeometricCooling::new` with a non-positive minimum temperature: {}",
            min_temp
        );
        Self {
            initial,
            current: initial,
            alpha,
            min_temp,
        }
    }

    #[inline]
    pub fn alpha(&self) -> f64 {
        self.alpha
    }
}

impl CoolingSchedule for GeometricCooling {
    #[inline]
    fn on_start(&mut self) {
        self.current = self.initial;
    }

    #[inline]
    fn update(&mut self) {
        self.current *= self.alpha;
    }

    #[inline]
    fn current(&self) -> f64 {
        self.current
    }

    #[inline]
    fn is_frozen(&self) -> bool {
        self.current <= self.min_temp
    }
}

/// `temperature -= decrement` per update, floored at `min_temp`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearCooling {
    initial: f64,
    current: f64,
    decrement: f64,
    min_temp: f64,
}

impl LinearCooling {
    /// # Panics
    ///
    /// Panics if `decrement` is not positive or `min_temp` is negative.
    pub fn new(initial: f64, decrement: f64, min_temp: f64) -> Self {
        assert!(
            decrement > 0.0,
            "called `LinearCooling::new` with a non-positive decrement: {}",
            decrement
        );
        assert!(
            min_temp >= 0.0,
            "called `LinearCooling::new` with a negative minimum temperature: {}",
            min_temp
        );
        Self {
            initial,
            current: initial,
            decrement,
            min_temp,
        }
    }

    #[inline]
    pub fn decrement(&self) -> f64 {
        self.decrement
    }
}

impl CoolingSchedule for LinearCooling {
    #[inline]
    fn on_start(&mut self) {
        self.current = self.initial;
    }

    #[inline]
    fn update(&mut self) {
        self.current = (self.current - self.decrement).max(self.min_temp);
    }

    #[inline]
    fn current(&self) -> f64 {
        self.current
    }

    #[inline]
    fn is_frozen(&self) -> bool {
        self.current <= self.min_temp
    }
}

/// Below this the acceptance probability underflows anyway.
const TEMPERATURE_EPSILON: f64 = 1e-9;

#[derive(Debug, Clone)]
pub struct SimulatedAnnealing<R, C> {
    cooling_schedule: C,
    rng: R,
    evaluator: WeightedFlowTimeEvaluator,
}

impl<R, C> SimulatedAnnealing<R, C>
where
    R: Rng,
    C: CoolingSchedule,
{
    #[inline]
    pub fn new(cooling_schedule: C, rng: R) -> Self {
        Self {
            cooling_schedule,
            rng,
            evaluator: WeightedFlowTimeEvaluator::new(),
        }
    }

    #[inline]
    pub fn cooling_schedule(&self) -> &C {
        &self.cooling_schedule
    }
}

impl SimulatedAnnealing<ChaCha8Rng, GeometricCooling> {
    pub const REFERENCE_TEMPERATURE_RATIO: f64 = 0.05;
    pub const REFERENCE_ALPHA: f64 = 0.995;
    pub const REFERENCE_MIN_TEMPERATURE: f64 = 1e-2;

    /// Geometric cooling starting at 5% of the reference objective (at
    /// least 1), `alpha = 0.995`, frozen below `0.01`.
    pub fn from_reference_solution<T>(reference: &Solution<T>, seed: u64) -> Self
    where
        T: SolverNumeric,
    {
        let objective = reference.objective_value().to_f64().unwrap_or(0.0).abs();
        let initial = (objective * Self::REFERENCE_TEMPERATURE_RATIO).max(1.0);
        Self::new(
            GeometricCooling::new(
                initial,
                Self::REFERENCE_ALPHA,
                Self::REFERENCE_MIN_TEMPERATURE,
            ),
            ChaCha8Rng::seed_from_u64(seed),
        )
    }
}

impl<T, R, C> Metaheuristic<T> for SimulatedAnnealing<R, C>
where
    T: SolverNumeric,
    R: Rng + Send + Sync,
    C: CoolingSchedule,
{
    type Evaluator = WeightedFlowTimeEvaluator;

    fn name(&self) -> &str {
        "SimulatedAnnealing"
    }

    fn evaluator(&self) -> &Self::Evaluator {
        &self.evaluator
    }

    fn on_start(&mut self, _model: &Model<T>, _initial_solution: &Schedule<T>) {
        self.cooling_schedule.on_start();
    }

    fn should_accept(
        &mut self,
        _model: &Model<T>,
        current: &Schedule<T>,
        candidate: &Schedule<T>,
        _best: &Schedule<T>,
    ) -> bool {
        let temperature = self.cooling_schedule.current();
        let frozen = self.cooling_schedule.is_frozen();
        self.cooling_schedule.update();

        if candidate.objective_value() < current.objective_value() {
            return true;
        }
        if frozen || temperature <= TEMPERATURE_EPSILON {
            return false;
        }
        let (Some(candidate_cost), Some(current_cost)) = (
            candidate.objective_value().to_f64(),
            current.objective_value().to_f64(),
        ) else {
            return false;
        };
        let probability = (-(candidate_cost - current_cost) / temperature).exp();
        if !probability.is_finite() {
            return false;
        }
        self.rng.random_bool(probability.clamp(0.0, 1.0))
    }

    fn on_local_optimum(
        &mut self,
        _model: &Model<T>,
        _current: &Schedule<T>,
        _best: &Schedule<T>,
    ) -> LocalOptimumAction {
        if self.cooling_schedule.is_frozen() {
            LocalOptimumAction::Terminate("temperature floor reached".to_string())
        } else {
            LocalOptimumAction::Restart
        }
    }
}
