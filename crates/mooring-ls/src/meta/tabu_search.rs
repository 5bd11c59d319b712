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

//! Tabu search.
//!
//! Visited schedules are remembered by signature for `tenure` accepted
//! moves. A tabu candidate is accepted only if it beats the best schedule
//! found so far (aspiration). When a sweep finds no improving candidate the
//! engine moves to the best candidate of that sweep that was not tabu, even
//! if it is worse than the current schedule. The search ends after
//! `stagnation_limit` such sweeps without a new best schedule.

use crate::{
    eval::WeightedFlowTimeEvaluator,
    memory::Schedule,
    meta::metaheuristic::{DEFAULT_STAGNATION_LIMIT, LocalOptimumAction, Metaheuristic},
};
use mooring_model::model::Model;
use mooring_search::num::SolverNumeric;
use rustc_hash::{FxHashSet, FxHasher};
use std::{
    collections::VecDeque,
    hash::{Hash, Hasher},
};

#[derive(Debug, Clone)]
pub struct TabuSearch {
    evaluator: WeightedFlowTimeEvaluator,
    tenure: usize,
    stagnation_limit: u64,
    stagnation: u64,
    tabu_queue: VecDeque<u64>,
    tabu_set: FxHashSet<u64>,
}

impl TabuSearch {
    /// # Panics
    ///
    /// Panics if `tenure` is zero.
    pub fn new(tenure: usize) -> Self {
        Self::with_stagnation_limit(tenure, DEFAULT_STAGNATION_LIMIT)
    }

    /// # Panics
    ///
    /// Panics if `tenure` is zero.
    pub fn with_stagnation_limit(tenure: usize, stagnation_limit: u64) -> Self {
        assert!(tenure > 0, "called `TabuSearch::new` with zero tenure");
        let mut tabu_set = FxHashSet::default();
        tabu_set.reserve(tenure);
        Self {
            evaluator: WeightedFlowTimeEvaluator::new(),
            tenure,
            stagnation_limit,
            stagnation: 0,
            tabu_queue: VecDeque::with_capacity(tenure),
            tabu_set,
        }
    }

    /// Tenure `round(sqrt(num_vessels))`, at least 1.
    pub fn from_model<T>(model: &Model<T>) -> Self
    where
        T: SolverNumeric,
    {
        let tenure = (model.num_vessels() as f64).sqrt().round() as usize;
        Self::new(tenure.max(1))
    }

    #[inline]
    pub fn tenure(&self) -> usize {
        self.tenure
    }

    #[inline]
    pub fn stagnation_limit(&self) -> u64 {
        self.stagnation_limit
    }

    fn signature<T>(schedule: &Schedule<T>) -> u64
    where
        T: SolverNumeric,
    {
        let mut hasher = FxHasher::default();
        schedule.berths().hash(&mut hasher);
        schedule.start_times().hash(&mut hasher);
        hasher.finish()
    }

    fn is_tabu<T>(&self, schedule: &Schedule<T>) -> bool
    where
        T: SolverNumeric,
    {
        self.tabu_set.contains(&Self::signature(schedule))
    }

    fn make_tabu(&mut self, signature: u64) {
        if !self.tabu_set.insert(signature) {
            return;
        }
        self.tabu_queue.push_back(signature);
        if self.tabu_queue.len() > self.tenure
            && let Some(oldest) = self.tabu_queue.pop_front()
        {
            self.tabu_set.remove(&oldest);
        }
    }
}

impl<T> Metaheuristic<T> for TabuSearch
where
    T: SolverNumeric,
{
    type Evaluator = WeightedFlowTimeEvaluator;

    fn name(&self) -> &str {
        "TabuSearch"
    }

    fn evaluator(&self) -> &Self::Evaluator {
        &self.evaluator
    }

    fn on_start(&mut self, _model: &Model<T>, initial_solution: &Schedule<T>) {
        self.tabu_queue.clear();
        self.tabu_set.clear();
        self.stagnation = 0;
        self.make_tabu(Self::signature(initial_solution));
    }

    fn should_accept(
        &mut self,
        _model: &Model<T>,
        current: &Schedule<T>,
        candidate: &Schedule<T>,
        best: &Schedule<T>,
    ) -> bool {
        if self.is_tabu(candidate) {
            candidate.objective_value() < best.objective_value()
        } else {
            candidate.objective_value() < current.objective_value()
        }
    }

    fn on_accept(&mut self, _model: &Model<T>, new_current: &Schedule<T>) {
        self.make_tabu(Self::signature(new_current));
    }

    fn on_new_best(&mut self, _model: &Model<T>, _new_best: &Schedule<T>) {
        self.stagnation = 0;
    }

    fn admits_as_fallback(
        &mut self,
        _model: &Model<T>,
        candidate: &Schedule<T>,
        best: &Schedule<T>,
    ) -> bool {
        !self.is_tabu(candidate) || candidate.objective_value() < best.objective_value()
    }

    fn on_local_optimum(
        &mut self,
        _model: &Model<T>,
        _current: &Schedule<T>,
        _best: &Schedule<T>,
    ) -> LocalOptimumAction {
        self.stagnation += 1;
        if self.stagnation >= self.stagnation_limit {
            LocalOptimumAction::Terminate("stagnation limit reached".to_string())
        } else {
            LocalOptimumAction::AcceptFallback
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mooring_model::{index::BerthIndex, model::ModelBuilder, solution::Solution};

    fn schedule(objective: i64, start: i64) -> Schedule<i64> {
        Schedule::from(&Solution::new(objective, vec![BerthIndex::new(0)], vec![start]))
    }

    fn model() -> Model<i64> {
        ModelBuilder::<i64>::new(1, 1).build()
    }

    #[test]
    #[should_panic(expected = "called `TabuSearch::new` with zero tenure")]
    fn test_zero_tenure_panics() {
        let _ = TabuSearch::new(0);
    }

    #[test]
    fn test_tenure_from_model() {
        assert_eq!(TabuSearch::from_model(&ModelBuilder::<i64>::new(1, 16).build()).tenure(), 4);
        assert_eq!(TabuSearch::from_model(&ModelBuilder::<i64>::new(1, 0).build()).tenure(), 1);
    }

    #[test]
    fn test_tabu_candidates_need_aspiration() {
        let model = model();
        let mut tabu = TabuSearch::new(3);
        let start = schedule(100, 0);
        tabu.on_start(&model, &start);

        let current = schedule(120, 5);
        let best = schedule(100, 0);
        // The initial schedule is tabu and does not beat the best.
        assert!(!tabu.should_accept(&model, &current, &start, &best));
        assert!(!tabu.admits_as_fallback(&model, &start, &best));
        // Non-tabu improvement.
        assert!(tabu.should_accept(&model, &current, &schedule(110, 3), &best));
        assert!(tabu.admits_as_fallback(&model, &schedule(130, 3), &best));

        // A tabu schedule better than the best aspirates.
        let breakthrough = schedule(90, 1);
        tabu.on_accept(&model, &breakthrough);
        assert!(tabu.should_accept(&model, &current, &breakthrough, &best));
    }

    #[test]
    fn test_tenure_expires_oldest_first() {
        let model = model();
        let mut tabu = TabuSearch::new(2);
        tabu.on_start(&model, &schedule(10, 0));
        tabu.on_accept(&model, &schedule(10, 1));
        tabu.on_accept(&model, &schedule(10, 2));
        assert!(!tabu.is_tabu(&schedule(10, 0)));
        assert!(tabu.is_tabu(&schedule(10, 1)));
        assert!(tabu.is_tabu(&schedule(10, 2)));
        assert_eq!(tabu.tabu_queue.len(), 2);
    }

    #[test]
    fn test_stagnation_terminates() {
        let model = model();
        let s = schedule(10, 0);
        let mut tabu = TabuSearch::with_stagnation_limit(1, 2);
        tabu.on_start(&model, &s);
        assert_eq!(tabu.on_local_optimum(&model, &s, &s), LocalOptimumAction::AcceptFallback);
        tabu.on_new_best(&model, &s);
        assert_eq!(tabu.on_local_optimum(&model, &s, &s), LocalOptimumAction::AcceptFallback);
        assert_eq!(
            tabu.on_local_optimum(&model, &s, &s),
            LocalOptimumAction::Terminate("stagnation limit reached".to_string())
        );
    }
}
