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

//! Behaviour checked against exhaustive enumeration on tiny instances.

use mooring_api::{
    BnbConfig, BnbTerminationReason, DecisionBuilderKind, EvaluatorKind, FixedAssignment,
    LocalSearchTerminationReason, LsConfig, MetaheuristicKind, Model, ModelBuilder, MooringError,
    NeighborhoodKind, Operator, Solution, bnb, ls,
};
use mooring_bnb::{fixed::FixedAssignment as InnerFixedAssignment, stats::BnbSolverStatistics};
use mooring_ls::{
    decoder::GreedyDecoder,
    engine::LocalSearchEngine,
    memory::Schedule,
    meta::greedy_descent::GreedyDescent,
    monitor::local_search_monitor::LocalSearchMonitor,
    neighborhood::neighborhoods::FullNeighborhoods,
    operator::{
        compound::{BoxedOperator, RoundRobinCompoundOperator},
        shift::ShiftOperator,
        swap::SwapOperator,
        two_opt::TwoOptOperator,
    },
    stats::LocalSearchStatistics,
};
use mooring_model::feasibility::check_solution;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::time::Duration;

const SEEDS: u64 = 40;

/// Up to three vessels and three berths with random processing times,
/// forbidden pairs, deadlines, weights and closed periods.
fn random_model(seed: u64) -> Model {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let num_berths = rng.random_range(1..=3);
    let num_vessels = rng.random_range(1..=3);
    let mut builder = ModelBuilder::new(num_berths, num_vessels);

    for vessel in 1..=num_vessels {
        let arrival = rng.random_range(0..=20);
        builder.set_arrival_time(vessel, arrival).unwrap();
        builder.set_weight(vessel, rng.random_range(1..=5)).unwrap();
        if rng.random_bool(0.5) {
            builder
                .set_latest_departure_time(vessel, arrival + rng.random_range(5..=60))
                .unwrap();
        }
        for berth in 1..=num_berths {
            if rng.random_bool(0.2) {
                builder.forbid_assignment(vessel, berth).unwrap();
            } else {
                builder
                    .set_processing_time(vessel, berth, rng.random_range(1..=20))
                    .unwrap();
            }
        }
    }
    for berth in 1..=num_berths {
        if rng.random_bool(0.3) {
            let start = rng.random_range(0..=30);
            let end = start + rng.random_range(1..=15);
            builder.add_closing_time(berth, start, end).unwrap();
        }
    }
    builder.build().unwrap()
}

fn permutations(n: usize) -> Vec<Vec<usize>> {
    if n == 0 {
        return vec![Vec::new()];
    }
    let mut out = Vec::new();
    for perm in permutations(n - 1) {
        for pos in 0..=perm.len() {
            let mut extended = perm.clone();
            extended.insert(pos, n - 1);
            out.push(extended);
        }
    }
    out
}

fn earliest_fit(windows: &[(i64, i64)], ready: i64, duration: i64) -> Option<i64> {
    windows.iter().find_map(|&(start, end)| {
        let start = start.max(ready);
        start
            .checked_add(duration)
            .is_some_and(|finish| finish <= end)
            .then_some(start)
    })
}

/// Places the vessels in `order`, each at the earliest feasible start on
/// its berth. `order` and `berths` are 0-based and 1-based respectively.
fn simulate(model: &Model, berths: &[usize], order: &[usize]) -> Option<i64> {
    let mut free = vec![i64::MIN; model.num_berths()];
    let mut objective = 0;
    for &v in order {
        let vessel = v + 1;
        let berth = berths[v];
        let duration = model.processing_time(vessel, berth).unwrap()?;
        let ready = model.arrival_time(vessel).unwrap().max(free[berth - 1]);
        let start = earliest_fit(&model.opening_times(berth).unwrap(), ready, duration)?;
        let finish = start + duration;
        if finish > model.latest_departure_time(vessel).unwrap() {
            return None;
        }
        free[berth - 1] = finish;
        objective += model.weight(vessel).unwrap() * finish;
    }
    Some(objective)
}

/// The optimal objective over every berth assignment and processing order,
/// or `None` if no feasible schedule exists.
fn brute_force(model: &Model) -> Option<i64> {
    let (num_vessels, num_berths) = (model.num_vessels(), model.num_berths());
    let orders = permutations(num_vessels);
    let mut berths = vec![1; num_vessels];
    let mut best: Option<i64> = None;
    for code in 0..num_berths.pow(num_vessels as u32) {
        let mut rest = code;
        for slot in berths.iter_mut() {
            *slot = rest % num_berths + 1;
            rest /= num_berths;
        }
        for order in &orders {
            if let Some(objective) = simulate(model, &berths, order) {
                best = Some(best.map_or(objective, |b| b.min(objective)));
            }
        }
    }
    best
}

fn assert_feasible(model: &Model, solution: &Solution) {
    let inner = solution.to_internal(model).unwrap();
    assert_eq!(check_solution(model.inner(), &inner), Ok(()), "{}", solution);
    assert_eq!(inner.objective_value(), solution.objective_value());
}

#[test]
fn bnb_agrees_with_exhaustive_enumeration() {
    for seed in 0..SEEDS {
        let model = random_model(seed);
        let expected = brute_force(&model);
        for builder in DecisionBuilderKind::ALL {
            for evaluator in EvaluatorKind::ALL {
                let outcome = bnb::solve(&model, &BnbConfig::new(builder, evaluator)).unwrap();
                let context = format!("seed {seed}, {builder} + {evaluator}");
                assert_eq!(outcome.has_solution(), expected.is_some(), "{context}");
                match expected {
                    Some(optimum) => {
                        assert_eq!(
                            outcome.termination_reason(),
                            BnbTerminationReason::OptimalityProven,
                            "{context}"
                        );
                        assert_eq!(outcome.objective_value(), Some(optimum), "{context}");
                        assert_feasible(&model, outcome.solution().unwrap());
                    }
                    None => assert_eq!(
                        outcome.termination_reason(),
                        BnbTerminationReason::InfeasibilityProven,
                        "{context}"
                    ),
                }
            }
        }
    }
}

#[test]
fn fixed_assignments_are_honoured() {
    for seed in 0..SEEDS {
        let model = random_model(seed);
        let Some(optimum) = brute_force(&model) else {
            continue;
        };
        let reference = bnb::solve(&model, &BnbConfig::default()).unwrap();
        let reference = reference.solution().unwrap();

        for vessel in 1..=model.num_vessels() {
            let fixed = FixedAssignment::new(
                vessel,
                reference.berth(vessel).unwrap(),
                reference.start_time(vessel).unwrap(),
            );
            let config = BnbConfig::default().with_fixed(vec![fixed]);
            let outcome = bnb::solve(&model, &config).unwrap();
            let solution = outcome.solution().expect("a fixed slice of a feasible schedule");

            assert_eq!(solution.berth(vessel), Ok(fixed.berth), "seed {seed}");
            assert_eq!(solution.start_time(vessel), Ok(fixed.start_time), "seed {seed}");
            assert_feasible(&model, solution);
            assert!(optimum <= solution.objective_value());
            assert!(solution.objective_value() <= reference.objective_value());
        }
    }
}

#[test]
fn warm_starts_are_never_made_worse() {
    for seed in 0..SEEDS {
        let model = random_model(seed);
        let first = BnbConfig::new(DecisionBuilderKind::Lpt, EvaluatorKind::Workload)
            .with_solution_limit(1);
        let Some(warm) = bnb::solve(&model, &first).unwrap().solution().cloned() else {
            continue;
        };

        for limit in [0, 1] {
            let config = BnbConfig::default()
                .with_solution_limit(limit)
                .with_initial_solution(warm.clone());
            let outcome = bnb::solve(&model, &config).unwrap();
            let objective = outcome.objective_value().expect("the warm start is feasible");
            assert!(objective <= warm.objective_value(), "seed {seed}, limit {limit}");
        }
    }
}

#[test]
fn infeasible_warm_start_is_ignored() {
    let mut builder = ModelBuilder::new(1, 2);
    for vessel in 1..=2 {
        builder.set_processing_time(vessel, 1, 10).unwrap();
    }
    let model = builder.build().unwrap();
    let overlapping = Solution::new(0, vec![1, 1], vec![0, 0]).unwrap();
    let config = BnbConfig::default().with_initial_solution(overlapping);
    let outcome = bnb::solve(&model, &config).unwrap();
    assert_eq!(outcome.objective_value(), Some(30));
}

/// Records the objective of every accepted schedule.
#[derive(Debug, Default)]
struct AcceptedObjectives(Vec<i64>);

impl LocalSearchMonitor<i64> for AcceptedObjectives {
    fn name(&self) -> &str {
        "AcceptedObjectives"
    }

    fn on_enter_search(
        &mut self,
        _model: &mooring_model::model::Model<i64>,
        initial_solution: &Schedule<i64>,
        _statistics: &LocalSearchStatistics,
    ) {
        self.0.push(initial_solution.objective_value());
    }

    fn on_solution_accepted(&mut self, solution: &Schedule<i64>, _statistics: &LocalSearchStatistics) {
        self.0.push(solution.objective_value());
    }
}

#[test]
fn greedy_descent_never_accepts_a_worse_schedule() {
    for seed in 0..SEEDS {
        let model = random_model(seed);
        let first = BnbConfig::new(DecisionBuilderKind::Lpt, EvaluatorKind::Hybrid)
            .with_solution_limit(1);
        let Some(initial) = bnb::solve(&model, &first).unwrap().solution().cloned() else {
            continue;
        };
        let inner_initial = initial.to_internal(&model).unwrap();

        let children: Vec<BoxedOperator<i64, FullNeighborhoods>> = vec![
            Box::new(TwoOptOperator::new()),
            Box::new(SwapOperator::new()),
            Box::new(ShiftOperator::new()),
        ];
        let mut operator = RoundRobinCompoundOperator::new(children);
        let mut monitor = AcceptedObjectives::default();
        let outcome = LocalSearchEngine::new().run(
            model.inner(),
            &mut GreedyDecoder::new(),
            &FullNeighborhoods::new(model.num_vessels()),
            &mut operator,
            &mut GreedyDescent::new(),
            &mut monitor,
            &inner_initial,
        );

        assert!(
            monitor.0.windows(2).all(|pair| pair[1] < pair[0]),
            "seed {seed}: {:?}",
            monitor.0
        );
        assert!(outcome.solution().objective_value() <= inner_initial.objective_value());
        assert_eq!(
            outcome.termination_reason(),
            LocalSearchTerminationReason::LocalOptimum
        );
    }
}

#[test]
fn local_search_returns_feasible_schedules_no_worse_than_the_start() {
    let metaheuristics = [
        MetaheuristicKind::GreedyDescent,
        MetaheuristicKind::simulated_annealing(3),
        MetaheuristicKind::tabu_search(),
        MetaheuristicKind::guided_local_search(),
    ];
    for seed in 0..SEEDS {
        let model = random_model(seed);
        let Some(optimum) = brute_force(&model) else {
            continue;
        };
        let first = BnbConfig::new(DecisionBuilderKind::Lpt, EvaluatorKind::Hybrid)
            .with_solution_limit(1);
        let initial = bnb::solve(&model, &first).unwrap().solution().cloned().unwrap();

        for metaheuristic in metaheuristics {
            for neighborhood in [NeighborhoodKind::Full, NeighborhoodKind::StaticTopology] {
                let operator = Operator::round_robin(vec![
                    Operator::two_opt(),
                    Operator::swap(),
                    Operator::shift(),
                    Operator::scramble(seed),
                ]);
                let config = LsConfig::new(neighborhood, metaheuristic, operator)
                    .with_solution_limit(5_000);
                let outcome = ls::solve(&model, &initial, &config).unwrap();
                let solution = outcome.solution();
                assert_feasible(&model, solution);
                assert!(solution.objective_value() <= initial.objective_value());
                assert!(optimum <= solution.objective_value());
            }
        }
    }
}

#[test]
fn fixed_assignment_survives_the_index_round_trip() {
    let indices = [1, 2, 3, 17, 1_000, usize::MAX];
    for &vessel in &indices {
        for &berth in &indices {
            for start_time in [0, 42, -7, i64::MAX] {
                let external = FixedAssignment::new(vessel, berth, start_time);
                let internal = InnerFixedAssignment::try_from(external).unwrap();
                assert_eq!(internal.vessel_index.get(), vessel - 1);
                assert_eq!(internal.berth_index.get(), berth - 1);
                assert_eq!(FixedAssignment::from(internal), external);
            }
        }
    }
}

#[test]
fn single_vessel_single_berth() {
    let mut builder = ModelBuilder::new(1, 1);
    builder
        .set_processing_time(1, 1, 10)
        .unwrap()
        .set_arrival_time(1, 0)
        .unwrap()
        .set_latest_departure_time(1, 1000)
        .unwrap()
        .set_weight(1, 1)
        .unwrap();
    let model = builder.build().unwrap();

    let outcome = bnb::solve(&model, &BnbConfig::default()).unwrap();
    assert_eq!(
        outcome.termination_reason(),
        BnbTerminationReason::OptimalityProven
    );
    let solution = outcome.solution().unwrap();
    let start = solution.start_time(1).unwrap();
    assert_eq!(solution.berth(1), Ok(1));
    assert!((0..=990).contains(&start));
    assert_eq!(solution.objective_value(), start + 10);
}

#[test]
fn fixed_vessel_keeps_its_slot_and_the_other_vessel_moves() {
    let mut builder = ModelBuilder::new(2, 2);
    for vessel in 1..=2 {
        builder.set_latest_departure_time(vessel, 100).unwrap();
        for berth in 1..=2 {
            builder.set_processing_time(vessel, berth, 10).unwrap();
        }
    }
    let model = builder.build().unwrap();

    let config = BnbConfig::default().with_fixed(vec![FixedAssignment::new(1, 2, 0)]);
    let outcome = bnb::solve(&model, &config).unwrap();
    let solution = outcome.solution().unwrap();
    assert_eq!(solution.berth(1), Ok(2));
    assert_eq!(solution.start_time(1), Ok(0));
    assert_eq!(solution.berth(2), Ok(1));
    assert_feasible(&model, solution);
}

#[test]
fn repeated_solves_are_identical() {
    fn without_time(mut stats: BnbSolverStatistics) -> BnbSolverStatistics {
        stats.time_total = Duration::ZERO;
        stats
    }

    let mut solver = mooring_api::BnbSolver::new();
    for seed in 0..SEEDS {
        let model = random_model(seed);
        let config = BnbConfig::new(DecisionBuilderKind::Regret, EvaluatorKind::Hybrid);
        let first = solver.solve(&model, &config).unwrap();
        let second = solver.solve(&model, &config).unwrap();
        assert_eq!(first.solution(), second.solution(), "seed {seed}");
        assert_eq!(first.termination(), second.termination());
        assert_eq!(
            without_time(first.statistics().clone()),
            without_time(second.statistics().clone())
        );
    }
}

#[test]
fn unknown_strategy_names_are_rejected() {
    assert!(matches!(
        BnbConfig::from_names("depth_first", "hybrid"),
        Err(MooringError::InvalidArgument(_))
    ));
    assert!(matches!(
        BnbConfig::from_names("edf", "lagrangian"),
        Err(MooringError::InvalidArgument(_))
    ));
    assert!(matches!(
        "annealing_2".parse::<MetaheuristicKind>(),
        Err(MooringError::InvalidArgument(_))
    ));
    assert!(matches!(
        "everything".parse::<NeighborhoodKind>(),
        Err(MooringError::InvalidArgument(_))
    ));
    assert!(matches!(
        "three_opt".parse::<Operator>(),
        Err(MooringError::InvalidArgument(_))
    ));
}
