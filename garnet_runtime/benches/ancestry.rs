//! Ancestor Chain Benchmarks
//!
//! Measures the class-graph operations whose cost grows with chain length.
//!
//! # Benchmark Categories
//!
//! 1. **Inclusion**: splicing fresh modules and re-including present ones
//! 2. **Ancestors**: walking deep chains with many proxies
//! 3. **Method Enumeration**: visibility-filtered name collection
//! 4. **Singletons**: materialization and cloning

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use garnet_runtime::{ClassId, MethodBody, MethodFilter, ObjectSpace, Value, Visibility};

// =============================================================================
// Benchmark Helpers
// =============================================================================

/// A class `depth` levels below `Object`, each level including one module
/// that defines `methods` methods.
fn build_chain(space: &mut ObjectSpace, depth: usize, methods: usize) -> ClassId {
    let mut class = space.boot().object;
    for level in 0..depth {
        class = space.define_class(class).unwrap();
        let module = space.new_module();
        for i in 0..methods {
            let name = format!("m{}_{}", level, i);
            let visibility = if i % 4 == 0 {
                Visibility::Private
            } else {
                Visibility::Public
            };
            space
                .define_method(module, &name, MethodBody::native(0), visibility)
                .unwrap();
        }
        space.include_module(class, module).unwrap();
    }
    class
}

// =============================================================================
// Inclusion Benchmarks
// =============================================================================

fn bench_include(c: &mut Criterion) {
    let mut group = c.benchmark_group("include");

    group.bench_function("fresh_module", |b| {
        let mut space = ObjectSpace::new();
        let class = build_chain(&mut space, 8, 0);
        b.iter(|| {
            let module = space.new_module();
            black_box(space.include_module(class, module).unwrap())
        });
    });

    for depth in [4, 16, 64] {
        group.bench_with_input(BenchmarkId::new("already_present", depth), &depth, |b, &depth| {
            let mut space = ObjectSpace::new();
            let class = build_chain(&mut space, depth, 0);
            let module = space.new_module();
            space.include_module(class, module).unwrap();
            b.iter(|| black_box(space.include_module(class, module).unwrap()));
        });
    }

    group.finish();
}

// =============================================================================
// Ancestor Benchmarks
// =============================================================================

fn bench_ancestors(c: &mut Criterion) {
    let mut group = c.benchmark_group("ancestors");

    for depth in [4, 16, 64] {
        let mut space = ObjectSpace::new();
        let class = build_chain(&mut space, depth, 0);
        group.bench_with_input(BenchmarkId::new("depth", depth), &class, |b, &class| {
            b.iter(|| black_box(space.ancestors(class)));
        });
    }

    group.finish();
}

// =============================================================================
// Method Enumeration Benchmarks
// =============================================================================

fn bench_method_names(c: &mut Criterion) {
    let mut group = c.benchmark_group("method_names");
    let mut space = ObjectSpace::new();
    let class = build_chain(&mut space, 16, 8);

    for filter in [MethodFilter::PublicOnly, MethodFilter::AllButPrivate] {
        group.bench_function(format!("{:?}", filter), |b| {
            b.iter(|| black_box(space.method_names(class, true, filter)));
        });
    }

    group.finish();
}

// =============================================================================
// Singleton Benchmarks
// =============================================================================

fn bench_singletons(c: &mut Criterion) {
    let mut group = c.benchmark_group("singleton");

    group.bench_function("materialize", |b| {
        let mut space = ObjectSpace::new();
        let object = space.boot().object;
        b.iter(|| {
            let obj = Value::Object(space.allocate(object).unwrap());
            black_box(space.singleton_class_of(&obj).unwrap())
        });
    });

    group.bench_function("clone_object", |b| {
        let mut space = ObjectSpace::new();
        let object = space.boot().object;
        let obj = Value::Object(space.allocate(object).unwrap());
        for i in 0..16 {
            space
                .define_singleton_method(&obj, &format!("s{}", i), MethodBody::native(0))
                .unwrap();
        }
        b.iter(|| black_box(space.clone_object(&obj).unwrap()));
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_include,
    bench_ancestors,
    bench_method_names,
    bench_singletons
);
criterion_main!(benches);
