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

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use mooring_bnb::{
    bnb::BnbSolver, branching::edf::EdfHeuristicBuilder, eval::hybrid::HybridEvaluator,
    monitor::solution::SolutionLimitMonitor,
};
use mooring_ls::{
    decoder::{Decoder, GreedyDecoder},
    eval::WeightedFlowTimeEvaluator,
    memory::SearchMemory,
};
use mooring_model::{
    index::{BerthIndex, VesselIndex},
    model::{Model, ModelBuilder},
    solution::Solution,
    time::ProcessingTime,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::hint::black_box;

const SIZES: [(usize, usize); 4] = [(2, 10), (3, 20), (5, 40), (10, 100)];

/// Random instance with loose deadlines so that every queue decodes.
fn generate(num_berths: usize, num_vessels: usize, seed: u64) -> Model<i64> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut builder = ModelBuilder::<i64>::new(num_berths, num_vessels);
    for v in 0..num_vessels {
        let vessel = VesselIndex::new(v);
        builder
            .set_vessel_arrival_time(vessel, rng.random_range(0..10 * num_vessels as i64))
            .set_vessel_weight(vessel, rng.random_range(1..=5));
        for b in 0..num_berths {
            let berth = BerthIndex::new(b);
            if b == 0 || rng.random_bool(0.8) {
                builder.set_vessel_processing_time(
                    vessel,
                    berth,
                    ProcessingTime::some(rng.random_range(5..=30)),
                );
            }
        }
    }
    builder.build()
}

fn find_feasible_solution(model: &Model<i64>) -> Solution<i64> {
    let (nb, nv) = (model.num_berths(), model.num_vessels());
    let mut solver = BnbSolver::preallocated(nb, nv);
    let mut builder = EdfHeuristicBuilder::preallocated(nb, nv);
    let mut evaluator = HybridEvaluator::preallocated(nb, nv);
    let outcome = solver.solve(model, &mut builder, &mut evaluator, SolutionLimitMonitor::new(1));
    outcome
        .result()
        .solution()
        .cloned()
        .expect("generated instances are feasible")
}

fn bench_decoder(c: &mut Criterion) {
    let mut group = c.benchmark_group("decoder");
    for (seed, &(nb, nv)) in SIZES.iter().enumerate() {
        let model = generate(nb, nv, seed as u64);
        let initial = find_feasible_solution(&model);

        let mut memory = SearchMemory::<i64>::preallocated(nv);
        memory.initialize(&initial);
        let mut decoder = GreedyDecoder::preallocated(nb);
        let evaluator = WeightedFlowTimeEvaluator::new();

        group.throughput(Throughput::Elements(nv as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{nb}x{nv}")),
            &model,
            |b, model| {
                b.iter(|| {
                    let (queue, preferred, schedule) = memory.evaluation_target();
                    let ok = decoder.decode(
                        black_box(model),
                        black_box(queue),
                        black_box(preferred),
                        &evaluator,
                        schedule,
                    );
                    assert!(ok, "decoding the incumbent genotype cannot fail");
                })
            },
        );
    }
    group.finish();
}

fn bench_bnb_first_solution(c: &mut Criterion) {
    let mut group = c.benchmark_group("bnb_first_solution");
    for (seed, &(nb, nv)) in SIZES.iter().enumerate() {
        let model = generate(nb, nv, seed as u64);
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{nb}x{nv}")),
            &model,
            |b, model| b.iter(|| find_feasible_solution(black_box(model))),
        );
    }
    group.finish();
}

criterion_group!(benches, bench_decoder, bench_bnb_first_solution);
criterion_main!(benches);
