//! Benchmarks for forest fitting and a small cross-validated search
//!
//! Run with: cargo bench --bench forest_benchmark

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

use wellcast::forest::{MaxFeatures, RandomForestConfig};
use wellcast::pipeline::{
    randomized_search, FeatureMatrix, HyperparameterGrid, Scoring, SearchConfig,
};

/// Generate a synthetic well matrix where the target depends on the first
/// three features and the rest are noise
fn generate_wells(n_rows: usize, n_features: usize, seed: u64) -> (FeatureMatrix, Vec<f64>) {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let names: Vec<String> = (0..n_features).map(|i| format!("feature_{}", i)).collect();
    let rows: Vec<Vec<f64>> = (0..n_rows)
        .map(|_| (0..n_features).map(|_| rng.gen::<f64>() * 100.0).collect())
        .collect();
    let targets = rows
        .iter()
        .map(|r| {
            let signal: f64 = r.iter().take(3).sum();
            500.0 + 4.0 * signal + rng.gen::<f64>() * 20.0
        })
        .collect();
    (FeatureMatrix::new(names, rows).unwrap(), targets)
}

fn benchmark_fit_by_rows(c: &mut Criterion) {
    let mut group = c.benchmark_group("forest_fit_by_rows");
    group.sample_size(10);

    for n_rows in [500, 2_000, 8_000] {
        let (x, y) = generate_wells(n_rows, 20, 42);
        group.throughput(Throughput::Elements(n_rows as u64));
        group.bench_with_input(BenchmarkId::from_parameter(n_rows), &(x, y), |b, (x, y)| {
            let config = RandomForestConfig::new(50).unwrap().with_seed(42);
            b.iter(|| {
                config
                    .fit(black_box(x.rows()), black_box(y), x.names())
                    .unwrap()
            });
        });
    }

    group.finish();
}

fn benchmark_fit_by_max_features(c: &mut Criterion) {
    let mut group = c.benchmark_group("forest_fit_by_max_features");
    group.sample_size(10);
    let (x, y) = generate_wells(2_000, 40, 7);

    for (label, strategy) in [
        ("auto", MaxFeatures::Auto),
        ("sqrt", MaxFeatures::Sqrt),
        ("log2", MaxFeatures::Log2),
    ] {
        group.bench_function(label, |b| {
            let config = RandomForestConfig::new(50)
                .unwrap()
                .with_max_features(strategy)
                .with_seed(42);
            b.iter(|| config.fit(x.rows(), &y, x.names()).unwrap());
        });
    }

    group.finish();
}

fn benchmark_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("randomized_search");
    group.sample_size(10);
    let (x, y) = generate_wells(1_000, 10, 3);
    let grid = HyperparameterGrid {
        n_estimators: vec![20, 40],
        ..HyperparameterGrid::default()
    };

    for workers in [1, 4] {
        let config = SearchConfig {
            n_iter: 8,
            cv: 3,
            scoring: Scoring::R2,
            workers,
            shuffle_folds: false,
        };
        group.bench_with_input(BenchmarkId::new("workers", workers), &config, |b, config| {
            b.iter(|| {
                let mut rng = ChaCha8Rng::seed_from_u64(42);
                randomized_search(&grid, config, &x, &y, &mut rng).unwrap()
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_fit_by_rows,
    benchmark_fit_by_max_features,
    benchmark_search,
);
criterion_main!(benches);
