//! Benchmarks for window assembly and autoregressive forecasting.

use chrono::{Duration, NaiveDate};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use demandcast::core::{FeatureVector, RawStep, SequenceTensor, Window};
use demandcast::features::FeatureAssembler;
use demandcast::models::{FnModel, ForecastEngine, InferenceContext};
use demandcast::transform::{make_windows, sliding_windows, IdentityScaler};
use demandcast::Result;

fn mean_model(t: &SequenceTensor) -> Result<Vec<Vec<f64>>> {
    let (_, steps, _) = t.shape();
    let sum: f64 = (0..steps).filter_map(|i| t.step(i)).map(|s| s[0]).sum();
    Ok(vec![vec![sum / steps as f64]])
}

fn generate_steps(n: usize) -> Vec<RawStep> {
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    (0..n)
        .map(|i| RawStep {
            branchcode: "GC02".to_string(),
            materialcode: "SKU_C".to_string(),
            stock_on_hand: 100.0 + (i as f64 * 0.3).sin() * 20.0,
            intransit_qty: 15.0,
            pending_po_qty: 5.0,
            lead_time_days: 7,
            date: (start + Duration::days(i as i64))
                .format("%Y-%m-%d")
                .to_string(),
        })
        .collect()
}

fn bench_assembly(c: &mut Criterion) {
    let assembler = FeatureAssembler::default();
    let steps = generate_steps(60);

    c.bench_function("assemble_window_60", |b| {
        b.iter(|| assembler.assemble_window(black_box(&steps), 60))
    });
}

fn bench_forecast_horizon(c: &mut Criterion) {
    let mut group = c.benchmark_group("forecast_multi");
    let context = InferenceContext::builder()
        .model(FnModel::new("mean", (60, FeatureVector::LEN), mean_model))
        .feature_scaler(IdentityScaler)
        .target_scaler(IdentityScaler)
        .build()
        .unwrap();
    let window = FeatureAssembler::default()
        .assemble_window(&generate_steps(60), 60)
        .unwrap();
    let engine = ForecastEngine::new(&context);

    for horizon in [1, 7, 30, 90].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(horizon), horizon, |b, &h| {
            b.iter(|| engine.forecast_multi(black_box(&window), h))
        });
    }

    group.finish();
}

fn bench_sliding_windows(c: &mut Criterion) {
    let mut group = c.benchmark_group("sliding_windows");

    for size in [1_000, 10_000, 100_000].iter() {
        let series: Vec<f64> = (0..*size).map(|i| (i as f64 * 0.1).sin()).collect();

        group.bench_with_input(BenchmarkId::new("lazy", size), size, |b, _| {
            b.iter(|| sliding_windows(black_box(&series), 60).map(|w| w[0]).sum::<f64>())
        });

        group.bench_with_input(BenchmarkId::new("collected", size), size, |b, _| {
            b.iter(|| make_windows(black_box(&series), 60))
        });

        group.bench_with_input(BenchmarkId::new("univariate", size), size, |b, _| {
            b.iter(|| {
                sliding_windows(black_box(&series), 60)
                    .filter_map(|w| Window::from_series(w, 60).ok())
                    .count()
            })
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_assembly,
    bench_forecast_horizon,
    bench_sliding_windows
);
criterion_main!(benches);
