use config_injector::*;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

// ===== Micro Benchmarks =====

fn bench_singleton_hit(c: &mut Criterion) {
    let mut defs = DefinitionMap::new();
    defs.add_value("answer", 42u64);
    let container = defs.build();

    c.bench_function("singleton_hit_u64", |b| {
        b.iter(|| {
            let v = container.get::<u64>("answer").unwrap();
            black_box(v);
        })
    });
}

fn bench_singleton_cold(c: &mut Criterion) {
    struct ExpensiveToCreate {
        data: Vec<u64>,
    }

    c.bench_function("singleton_cold_expensive", |b| {
        b.iter_batched(
            || {
                let mut defs = DefinitionMap::new();
                defs.add_singleton(
                    "expensive",
                    Factory::new(|_, _, _| {
                        Ok(ExpensiveToCreate {
                            data: (0..1000).collect(),
                        })
                    }),
                );
                defs.build()
            },
            |container| {
                let v = container.get::<ExpensiveToCreate>("expensive").unwrap();
                black_box(v.data.len());
            },
            criterion::BatchSize::SmallInput,
        )
    });
}

fn bench_scoped_vs_transient(c: &mut Criterion) {
    struct Service {
        data: [u8; 64],
    }

    let mut group = c.benchmark_group("scoped_vs_transient");

    let mut defs = DefinitionMap::new();
    defs.add_scoped("scoped", Factory::new(|_, _, _| Ok(Service { data: [0; 64] })))
        .add_transient("transient", Factory::new(|_, _, _| Ok(Service { data: [0; 64] })));
    let container = defs.build();
    let scope = container.create_scope();

    group.bench_function("scoped_hit", |b| {
        b.iter(|| {
            let v = scope.get::<Service>("scoped").unwrap();
            black_box(&v.data);
        })
    });

    group.bench_function("transient", |b| {
        b.iter(|| {
            let v = scope.get::<Service>("transient").unwrap();
            black_box(&v.data);
        })
    });

    group.finish();
}

// Transient chain of `depth` links on top of one value singleton.
fn chain(depth: usize) -> Container {
    let mut defs = DefinitionMap::new();
    defs.add_value("n0", 0u64);
    for i in 1..=depth {
        let prev = format!("n{}", i - 1);
        let key = prev.clone();
        defs.add_transient(
            format!("n{}", i),
            Factory::new(move |deps, _, _| Ok(*deps.get::<u64>(&key)? + 1)).depends_on([prev]),
        );
    }
    defs.build()
}

fn bench_dependency_depth(c: &mut Criterion) {
    let mut group = c.benchmark_group("dependency_depth");

    for depth in [1usize, 4, 16, 64] {
        let container = chain(depth);
        let top = format!("n{}", depth);
        group.bench_with_input(BenchmarkId::from_parameter(depth), &depth, |b, _| {
            b.iter(|| {
                let v = container.get::<u64>(&top).unwrap();
                black_box(*v);
            })
        });
    }

    group.finish();
}

fn bench_scope_lifecycle(c: &mut Criterion) {
    let mut defs = DefinitionMap::new();
    defs.add_scoped("request", Factory::new(|_, _, _| Ok(0u64)));
    let container = defs.build();

    c.bench_function("create_scope_and_resolve", |b| {
        b.iter(|| {
            let scope = container.create_scope();
            black_box(scope.get::<u64>("request").unwrap());
        })
    });
}

fn bench_validation(c: &mut Criterion) {
    let mut group = c.benchmark_group("validate_config_singletons");

    for count in [10usize, 100] {
        let mut defs = DefinitionMap::new();
        for i in 0..count {
            if i % 2 == 0 {
                defs.add_value(format!("v{}", i), i as u64);
            } else {
                defs.add(
                    format!("v{}", i),
                    Definition::value(i as u64).with_shape(Shape::schema(
                        Predicate::matching::<u64, _>("odd", |n| n % 2 == 1),
                    )),
                );
            }
        }
        let container = defs.build();
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, _| {
            b.iter(|| black_box(container.safe_validate_config_singletons().is_ok()))
        });
    }

    group.finish();
}

fn bench_chain(c: &mut Criterion) {
    let container = chain(32);
    c.bench_function("chain_empty_over_32", |b| {
        b.iter(|| black_box(container.chain(DefinitionMap::new())))
    });
}

criterion_group!(
    micro_benches,
    bench_singleton_hit,
    bench_singleton_cold,
    bench_scoped_vs_transient,
    bench_scope_lifecycle
);

criterion_group!(
    scaling_benches,
    bench_dependency_depth,
    bench_validation,
    bench_chain
);

criterion_main!(micro_benches, scaling_benches);
