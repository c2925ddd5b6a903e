//! Benchmarks for the Agora clustering pipeline
//!
//! Measures performance of:
//! - Vote matrix construction
//! - Power-iteration PCA
//! - k-means partitioning
//! - The full analysis pass

use agora_cluster::{analyze_opinions, kmeans, pca, AnalysisOptions};
use agora_model::{Opinion, Statement, VoteMatrix, VoteValue};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Synthetic vote set: `participants` voters over `statements` statements,
/// with a deterministic mix of agree/disagree/pass and ~20% missing.
fn synthetic_votes(participants: usize, statements: usize) -> (Vec<Statement>, Vec<Opinion>) {
    let mut rng = StdRng::seed_from_u64(99);
    let statements: Vec<Statement> = (0..statements)
        .map(|s| Statement::new(format!("s{s}"), "author", format!("statement {s}"), 0))
        .collect();

    let mut opinions = Vec::new();
    for p in 0..participants {
        for (s, stmt) in statements.iter().enumerate() {
            if rng.gen_bool(0.2) {
                continue; // missing
            }
            let value = match rng.gen_range(0..3) {
                0 => VoteValue::Agree,
                1 => VoteValue::Disagree,
                _ => VoteValue::Pass,
            };
            opinions.push(Opinion::new(
                format!("o{p}-{s}"),
                stmt.id.clone(),
                format!("p{p:04}"),
                value,
                (p * statements + s) as u64,
            ));
        }
    }
    (statements, opinions)
}

fn bench_matrix_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("vote_matrix_build");

    for &participants in &[10usize, 50, 200] {
        let (statements, opinions) = synthetic_votes(participants, 20);
        group.throughput(Throughput::Elements(opinions.len() as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(participants),
            &participants,
            |b, _| {
                b.iter(|| VoteMatrix::build(black_box(&statements), black_box(&opinions), 2))
            },
        );
    }
    group.finish();
}

fn bench_pca(c: &mut Criterion) {
    let mut group = c.benchmark_group("pca_reduce");

    for &participants in &[10usize, 50, 200] {
        let (statements, opinions) = synthetic_votes(participants, 20);
        let matrix = VoteMatrix::build(&statements, &opinions, 2);
        group.bench_with_input(
            BenchmarkId::from_parameter(participants),
            &participants,
            |b, _| {
                b.iter(|| {
                    let mut rng = StdRng::seed_from_u64(7);
                    pca::reduce(
                        black_box(&matrix),
                        2,
                        pca::MAX_PCA_ITERATIONS,
                        pca::PCA_TOLERANCE,
                        &mut rng,
                    )
                })
            },
        );
    }
    group.finish();
}

fn bench_kmeans(c: &mut Criterion) {
    let mut group = c.benchmark_group("kmeans_cluster");

    for &points in &[10usize, 100, 1000] {
        let mut rng = StdRng::seed_from_u64(13);
        let data: Vec<Vec<f64>> = (0..points)
            .map(|_| vec![rng.gen_range(-5.0..5.0), rng.gen_range(-5.0..5.0)])
            .collect();
        group.throughput(Throughput::Elements(points as u64));
        group.bench_with_input(BenchmarkId::from_parameter(points), &points, |b, _| {
            b.iter(|| {
                let mut rng = StdRng::seed_from_u64(17);
                kmeans::cluster(
                    black_box(&data),
                    3,
                    kmeans::MAX_KMEANS_ITERATIONS,
                    &mut rng,
                )
            })
        });
    }
    group.finish();
}

fn bench_full_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("analyze_opinions");

    for &participants in &[10usize, 50, 200] {
        let (statements, opinions) = synthetic_votes(participants, 20);
        let options = AnalysisOptions::default();
        group.bench_with_input(
            BenchmarkId::from_parameter(participants),
            &participants,
            |b, _| {
                b.iter(|| {
                    let mut rng = StdRng::seed_from_u64(23);
                    analyze_opinions(
                        black_box(&statements),
                        black_box(&opinions),
                        &options,
                        &mut rng,
                    )
                })
            },
        );
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_matrix_build,
    bench_pca,
    bench_kmeans,
    bench_full_pipeline
);
criterion_main!(benches);
