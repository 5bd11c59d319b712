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

//! Operators that own and schedule other operators.
//!
//! Compounds take their children by value; after construction the children
//! are reachable only through the compound. Children are prepared lazily,
//! the first time the compound asks them for a move after its own `prepare`.
//! A child that reports exhaustion is not asked again until the next
//! `prepare` or `reset`.

use crate::{
    memory::Schedule, mutator::Mutator, neighborhood::neighborhoods::Neighborhoods,
    operator::LocalSearchOperator, queue::VesselPriorityQueue,
};
use mooring_model::model::Model;
use mooring_search::num::SolverNumeric;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::cmp::Ordering;

pub type BoxedOperator<T, N> = Box<dyn LocalSearchOperator<T, N>>;

/// Per-child bookkeeping shared by all compounds.
#[derive(Debug, Clone, Default)]
struct ChildState {
    prepared: Vec<bool>,
    exhausted: Vec<bool>,
}

impl ChildState {
    fn new(len: usize) -> Self {
        Self {
            prepared: vec![false; len],
            exhausted: vec![false; len],
        }
    }

    fn clear(&mut self) {
        self.prepared.fill(false);
        self.exhausted.fill(false);
    }

    #[inline]
    fn is_available(&self, index: usize) -> bool {
        !self.exhausted[index]
    }

    fn num_available(&self) -> usize {
        self.exhausted.iter().filter(|&&done| !done).count()
    }

    /// Asks child `index` for a move, preparing it first if needed. Marks the
    /// child exhausted when it has none.
    fn advance<T, N>(
        &mut self,
        operators: &mut [BoxedOperator<T, N>],
        index: usize,
        model: &Model<T>,
        schedule: &Schedule<T>,
        mutator: &mut Mutator<'_>,
        neighborhoods: &N,
    ) -> bool
    where
        T: SolverNumeric,
        N: Neighborhoods,
    {
        let operator = &mut operators[index];
        if !self.prepared[index] {
            operator.prepare(model, schedule, mutator.queue(), neighborhoods);
            self.prepared[index] = true;
        }
        if operator.next_neighbor(model, schedule, mutator, neighborhoods) {
            return true;
        }
        self.exhausted[index] = true;
        false
    }
}

/// Cycles through the children in fixed order, one move each, skipping
/// exhausted children until all of them are exhausted.
pub struct RoundRobinCompoundOperator<T, N>
where
    T: SolverNumeric,
    N: Neighborhoods,
{
    operators: Vec<BoxedOperator<T, N>>,
    state: ChildState,
    next: usize,
}

impl<T, N> RoundRobinCompoundOperator<T, N>
where
    T: SolverNumeric,
    N: Neighborhoods,
{
    pub fn new(operators: Vec<BoxedOperator<T, N>>) -> Self {
        let len = operators.len();
        Self {
            operators,
            state: ChildState::new(len),
            next: 0,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.operators.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.operators.is_empty()
    }
}

impl<T, N> std::fmt::Debug for RoundRobinCompoundOperator<T, N>
where
    T: SolverNumeric,
    N: Neighborhoods,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoundRobinCompoundOperator")
            .field("operators", &self.operators)
            .field("next", &self.next)
            .finish()
    }
}

impl<T, N> LocalSearchOperator<T, N> for RoundRobinCompoundOperator<T, N>
where
    T: SolverNumeric,
    N: Neighborhoods,
{
    fn name(&self) -> &str {
        "RoundRobinCompoundOperator"
    }

    fn prepare(
        &mut self,
        _model: &Model<T>,
        _schedule: &Schedule<T>,
        _queue: &VesselPriorityQueue,
        _neighborhoods: &N,
    ) {
        self.state.clear();
        self.next = 0;
    }

    fn next_neighbor(
        &mut self,
        model: &Model<T>,
        schedule: &Schedule<T>,
        mutator: &mut Mutator<'_>,
        neighborhoods: &N,
    ) -> bool {
        let len = self.operators.len();
        for _ in 0..len {
            let index = self.next;
            self.next = (self.next + 1) % len;
            if !self.state.is_available(index) {
                continue;
            }
            if self.state.advance(
                &mut self.operators,
                index,
                model,
                schedule,
                mutator,
                neighborhoods,
            ) {
                return true;
            }
        }
        false
    }

    fn reset(&mut self) {
        self.operators.iter_mut().for_each(|op| op.reset());
        self.state.exhausted.fill(false);
        self.next = 0;
    }
}

/// Picks a child uniformly at random among the non-exhausted ones for every
/// move.
pub struct RandomCompoundOperator<T, N, R>
where
    T: SolverNumeric,
    N: Neighborhoods,
    R: Rng,
{
    operators: Vec<BoxedOperator<T, N>>,
    state: ChildState,
    rng: R,
}

impl<T, N, R> RandomCompoundOperator<T, N, R>
where
    T: SolverNumeric,
    N: Neighborhoods,
    R: Rng,
{
    pub fn new(operators: Vec<BoxedOperator<T, N>>, rng: R) -> Self {
        let len = operators.len();
        Self {
            operators,
            state: ChildState::new(len),
            rng,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.operators.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.operators.is_empty()
    }
}

impl<T, N> RandomCompoundOperator<T, N, ChaCha8Rng>
where
    T: SolverNumeric,
    N: Neighborhoods,
{
    pub fn with_seed(operators: Vec<BoxedOperator<T, N>>, seed: u64) -> Self {
        Self::new(operators, ChaCha8Rng::seed_from_u64(seed))
    }
}

impl<T, N, R> std::fmt::Debug for RandomCompoundOperator<T, N, R>
where
    T: SolverNumeric,
    N: Neighborhoods,
    R: Rng,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RandomCompoundOperator")
            .field("operators", &self.operators)
            .finish_non_exhaustive()
    }
}

impl<T, N, R> LocalSearchOperator<T, N> for RandomCompoundOperator<T, N, R>
where
    T: SolverNumeric,
    N: Neighborhoods,
    R: Rng,
{
    fn name(&self) -> &str {
        "RandomCompoundOperator"
    }

    fn prepare(
        &mut self,
        _model: &Model<T>,
        _schedule: &Schedule<T>,
        _queue: &VesselPriorityQueue,
        _neighborhoods: &N,
    ) {
        self.state.clear();
    }

    fn next_neighbor(
        &mut self,
        model: &Model<T>,
        schedule: &Schedule<T>,
        mutator: &mut Mutator<'_>,
        neighborhoods: &N,
    ) -> bool {
        loop {
            let available = self.state.num_available();
            if available == 0 {
                return false;
            }
            let pick = self.rng.random_range(0..available);
            let Some(index) = (0..self.operators.len())
                .filter(|&i| self.state.is_available(i))
                .nth(pick)
            else {
                return false;
            };
            if self.state.advance(
                &mut self.operators,
                index,
                model,
                schedule,
                mutator,
                neighborhoods,
            ) {
                return true;
            }
        }
    }

    fn reset(&mut self) {
        self.operators.iter_mut().for_each(|op| op.reset());
        self.state.exhausted.fill(false);
    }
}

/// UCB1 statistics with exponential recency weighting.
#[derive(Debug, Clone, Default)]
struct BanditStats {
    total_samples: usize,
    samples: Vec<usize>,
    average_rewards: Vec<f64>,
    max_reward: f64,
}

impl BanditStats {
    fn new(len: usize) -> Self {
        Self {
            total_samples: 0,
            samples: vec![0; len],
            average_rewards: vec![0.0; len],
            // Rewards are normalized by the largest one seen; starting at 1
            // keeps the first division finite.
            max_reward: 1.0,
        }
    }

    /// Untried arms score infinity so every arm is sampled once.
    fn score(&self, arm: usize, exploration: f64) -> f64 {
        let n = self.samples[arm];
        if n == 0 {
            return f64::INFINITY;
        }
        let exploitation = self.average_rewards[arm] / self.max_reward;
        let bonus = exploration * ((2.0 * (1.0 + self.total_samples as f64).ln()) / n as f64).sqrt();
        exploitation + bonus
    }

    fn record_sample(&mut self, arm: usize) {
        self.total_samples += 1;
        self.samples[arm] += 1;
    }

    fn record_reward(&mut self, arm: usize, reward: f64, memory: f64) {
        self.max_reward = self.max_reward.max(reward);
        let average = &mut self.average_rewards[arm];
        *average += memory * (reward - *average);
    }
}

/// Orders its children by UCB1 score at every `prepare` and draws moves
/// from the best-ranked child that still has some.
///
/// The reward of a child is the objective improvement of the incumbent it
/// produced; `memory` is the weight of the newest reward in the running
/// average, `exploration` scales the UCB1 bonus.
pub struct MultiArmedBanditCompoundOperator<T, N>
where
    T: SolverNumeric,
    N: Neighborhoods,
{
    operators: Vec<BoxedOperator<T, N>>,
    state: ChildState,
    stats: BanditStats,
    ranking: Vec<usize>,
    rank: usize,
    memory: f64,
    exploration: f64,
    last_arm: Option<usize>,
    last_objective: Option<T>,
}

impl<T, N> MultiArmedBanditCompoundOperator<T, N>
where
    T: SolverNumeric,
    N: Neighborhoods,
{
    pub const DEFAULT_MEMORY: f64 = 0.2;
    pub const DEFAULT_EXPLORATION: f64 = std::f64::consts::SQRT_2;

    /// # Panics
    ///
    /// Panics if `memory` is outside `(0, 1]` or `exploration` is negative.
    pub fn new(operators: Vec<BoxedOperator<T, N>>, memory: f64, exploration: f64) -> Self {
        assert!(
            memory > 0.0 && memory <= 1.0,
            "called `MultiArmedBanditCompoundOperator::new` with memory coefficient outside (0, 1]: {}",
            memory
        );
        assert!(
            exploration >= 0.0,
            "called `MultiArmedBanditCompoundOperator::new` with negative exploration coefficient: {}",
            exploration
        );
        let len = operators.len();
        Self {
            operators,
            state: ChildState::new(len),
            stats: BanditStats::new(len),
            ranking: (0..len).collect(),
            rank: 0,
            memory,
            exploration,
            last_arm: None,
            last_objective: None,
        }
    }

    #[inline]
    pub fn with_defaults(operators: Vec<BoxedOperator<T, N>>) -> Self {
        Self::new(operators, Self::DEFAULT_MEMORY, Self::DEFAULT_EXPLORATION)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.operators.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.operators.is_empty()
    }

    fn rerank(&mut self) {
        let (stats, exploration) = (&self.stats, self.exploration);
        self.ranking.sort_by(|&a, &b| {
            stats
                .score(b, exploration)
                .partial_cmp(&stats.score(a, exploration))
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.cmp(&b))
        });
    }
}

impl<T, N> std::fmt::Debug for MultiArmedBanditCompoundOperator<T, N>
where
    T: SolverNumeric,
    N: Neighborhoods,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MultiArmedBanditCompoundOperator")
            .field("operators", &self.operators)
            .field("ranking", &self.ranking)
            .field("memory", &self.memory)
            .field("exploration", &self.exploration)
            .finish()
    }
}

impl<T, N> LocalSearchOperator<T, N> for MultiArmedBanditCompoundOperator<T, N>
where
    T: SolverNumeric,
    N: Neighborhoods,
{
    fn name(&self) -> &str {
        "MultiArmedBanditCompoundOperator"
    }

    fn prepare(
        &mut self,
        _model: &Model<T>,
        schedule: &Schedule<T>,
        _queue: &VesselPriorityQueue,
        _neighborhoods: &N,
    ) {
        let objective = schedule.objective_value();
        if let (Some(arm), Some(previous)) = (self.last_arm, self.last_objective) {
            let reward = (previous.to_f64().unwrap_or(0.0) - objective.to_f64().unwrap_or(0.0))
                .max(0.0);
            self.stats.record_reward(arm, reward, self.memory);
        }
        self.last_objective = Some(objective);
        self.last_arm = None;

        self.rerank();
        self.rank = 0;
        self.state.clear();
    }

    fn next_neighbor(
        &mut self,
        model: &Model<T>,
        schedule: &Schedule<T>,
        mutator: &mut Mutator<'_>,
        neighborhoods: &N,
    ) -> bool {
        while let Some(&arm) = self.ranking.get(self.rank) {
            if self.state.is_available(arm)
                && self.state.advance(
                    &mut self.operators,
                    arm,
                    model,
                    schedule,
                    mutator,
                    neighborhoods,
                )
            {
                self.stats.record_sample(arm);
                self.last_arm = Some(arm);
                return true;
            }
            self.rank += 1;
        }
        false
    }

    fn reset(&mut self) {
        self.operators.iter_mut().for_each(|op| op.reset());
        self.state.exhausted.fill(false);
        self.rank = 0;
    }
}
