use automata_engine::{prelude::*, random};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

fn determinization(c: &mut Criterion) {
    let mut group = c.benchmark_group("determinize");
    for size in [4, 8, 12] {
        fastrand::seed(size as u64);
        let nfa = random::generate_random_nfa(2, size, 0.3, 0.05);
        group.bench_with_input(BenchmarkId::from_parameter(size), &nfa, |b, nfa| {
            b.iter(|| black_box(nfa.determinize().unwrap()))
        });
    }
    group.finish();
}

fn minimization(c: &mut Criterion) {
    fastrand::seed(3);
    let dfa = random::generate_random_nfa(3, 10, 0.2, 0.0)
        .determinize()
        .unwrap();
    c.bench_function("minimize", |b| b.iter(|| black_box(dfa.minimize().unwrap())));
}

fn simulation(c: &mut Criterion) {
    let anbn = GraphBuilder::pushdown()
        .with_accepting([2])
        .with_operations([
            (0, Operation::replace('a', 'Z', "AZ"), 0),
            (0, Operation::replace('a', 'A', "AA"), 0),
            (0, Operation::replace(EPSILON, 'Z', "Z"), 1),
            (0, Operation::replace(EPSILON, 'A', "A"), 1),
            (1, Operation::replace('b', 'A', ""), 1),
            (1, Operation::replace(EPSILON, 'Z', ""), 2),
        ])
        .into_graph(0);
    let config = SimulationConfig::default().with_initial_stack("Z");
    let word = format!("{}{}", "a".repeat(30), "b".repeat(30));
    c.bench_function("simulate anbn", |b| {
        b.iter(|| black_box(anbn.simulate(word.as_str(), &config).unwrap()))
    });
}

criterion_group!(benches, determinization, minimization, simulation);
criterion_main!(benches);
