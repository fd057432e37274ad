//! Scoring throughput: per-row kernels and whole-frame passes.

mod common;

use common::criterion_config::default_criterion;

use scorekit::data::adapt;
use scorekit::testing::{mixed_pca, multiclass_naive_bayes, random_frame};
use scorekit::{Model, Scorer, ScoringConfig};

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

fn bench_kernels(c: &mut Criterion) {
    let models: [(&str, Model); 2] = [
        ("naive_bayes", multiclass_naive_bayes().into()),
        ("pca", mixed_pca().into()),
    ];
    let n_rows = 10_000usize;

    let mut group = c.benchmark_group("component/score0");
    group.throughput(Throughput::Elements(n_rows as u64));

    for (label, model) in &models {
        let frame = random_frame(model.meta(), "bench", n_rows, 42, 0.05);
        let adapted = adapt(&frame, model.meta()).expect("bench frame matches schema");
        let mut row = vec![0.0; model.n_features()];
        let mut scratch = vec![0.0; model.scratch_len()];
        let mut preds = vec![0.0; model.n_outputs()];

        group.bench_function(*label, |b| {
            b.iter(|| {
                for r in 0..n_rows {
                    adapted.gather_row(r, &mut row);
                    model.score0(black_box(&row), &mut scratch, &mut preds);
                }
                black_box(&preds);
            });
        });
    }
    group.finish();
}

fn bench_pass_threads(c: &mut Criterion) {
    let model: Model = multiclass_naive_bayes().into();
    let n_rows = 100_000usize;
    let frame = random_frame(model.meta(), "bench", n_rows, 7, 0.05);

    let mut group = c.benchmark_group("component/pass/threads");
    group.throughput(Throughput::Elements(n_rows as u64));

    for n_threads in [1usize, 2, 4, 8] {
        let config = ScoringConfig::builder().n_threads(n_threads).build().expect("valid config");
        group.bench_with_input(BenchmarkId::new("naive_bayes", n_threads), &config, |b, config| {
            b.iter(|| black_box(model.score(black_box(&frame), config).expect("scoring succeeds")));
        });
    }
    group.finish();
}

criterion_group! {
    name = benches;
    config = default_criterion();
    targets = bench_kernels, bench_pass_threads
}
criterion_main!(benches);
