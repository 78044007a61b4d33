use criterion::{black_box, criterion_group, criterion_main, Criterion};

use placement_core::model::{Category, CategoryCounts, RequiredThresholds};
use placement_core::readiness::{evaluate_readiness, overall_progress, ReadinessEvaluation};

fn make_counts(values: [u32; 6]) -> CategoryCounts {
    Category::ALL.iter().copied().zip(values).collect()
}

fn bench_evaluate(c: &mut Criterion) {
    let mut group = c.benchmark_group("evaluate_readiness");
    let required = RequiredThresholds::uniform(10);

    group.bench_function("ready", |b| {
        let current = make_counts([12; 6]);
        b.iter(|| evaluate_readiness(black_box(&current), black_box(&required)))
    });

    group.bench_function("partial", |b| {
        let current = make_counts([10, 5, 0, 0, 0, 0]);
        b.iter(|| evaluate_readiness(black_box(&current), black_box(&required)))
    });

    group.bench_function("overall_progress", |b| {
        let current = make_counts([3, 7, 1, 0, 9, 4]);
        b.iter(|| overall_progress(black_box(&current), black_box(&required)))
    });

    group.finish();
}

fn bench_full_evaluation(c: &mut Criterion) {
    let mut group = c.benchmark_group("readiness_evaluation");
    let required = RequiredThresholds::uniform(5);

    group.bench_function("single_bank", |b| {
        let current = make_counts([1, 2, 3, 4, 5, 6]);
        b.iter(|| ReadinessEvaluation::new(black_box(current), black_box(required)))
    });

    group.bench_function("json_summary", |b| {
        let json = r#"{"questions": {"vocabulary": 10, "grammar": "5", "reading": -2, "total": 15},
                       "required_for_exam": {"vocabulary": 10, "grammar": 10, "reading": 5,
                                             "listening": 5, "speaking": 5, "writing": 5},
                       "is_ready_for_exam": false}"#;
        b.iter(|| {
            let summary: placement_core::BankSummary = serde_json::from_str(black_box(json)).unwrap();
            summary.evaluate()
        })
    });

    group.finish();
}

criterion_group!(benches, bench_evaluate, bench_full_evaluation);
criterion_main!(benches);
