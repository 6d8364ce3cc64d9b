//! Quickstart example demonstrating basic usage of demandcast.
//!
//! A stand-in model replaces the trained network so the example runs
//! without model files.
//!
//! Run with: RUST_LOG=demandcast=debug cargo run --example quickstart

use chrono::{Duration, NaiveDate};
use demandcast::prelude::*;
use demandcast::transform::{make_windows, MinMaxScaler};
use rand::Rng;
use tracing_subscriber::EnvFilter;

/// Weighted average of recent stock levels, standing in for the BiLSTM.
fn recency_weighted(t: &SequenceTensor) -> Result<Vec<Vec<f64>>> {
    let (_, steps, _) = t.shape();
    let (mut num, mut den) = (0.0, 0.0);
    for i in 0..steps {
        let w = (i + 1) as f64;
        num += w * t.step(i).map_or(0.0, |s| s[0]);
        den += w;
    }
    Ok(vec![vec![0.1 * num / den]])
}

fn random_history(branch: &str, material: &str, days: usize) -> Vec<RawStep> {
    let mut rng = rand::thread_rng();
    let end = NaiveDate::from_ymd_opt(2024, 10, 20).unwrap();
    (0..days)
        .map(|i| RawStep {
            branchcode: branch.to_string(),
            materialcode: material.to_string(),
            stock_on_hand: rng.gen_range(50.0..200.0),
            intransit_qty: rng.gen_range(0.0..50.0),
            pending_po_qty: rng.gen_range(0.0..30.0),
            lead_time_days: rng.gen_range(1..15),
            date: (end - Duration::days((days - 1 - i) as i64))
                .format("%Y-%m-%d")
                .to_string(),
        })
        .collect()
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== demandcast Quickstart ===\n");

    // 1. Configuration (defaults: 60-step windows, GC01-GC05, SKU_A-SKU_E)
    let config = ForecastConfig::default();
    println!("Window size: {}", config.window_size);

    // 2. Artifacts: a stand-in model and fitted scalers
    let target = MinMaxScaler::fit(&[vec![0.0], vec![500.0]], (0.0, 1.0))?;
    let context = InferenceContext::builder()
        .model(
            FnModel::new(
                "recency-weighted",
                (config.window_size, FeatureVector::LEN),
                recency_weighted,
            )
            .with_parameter_count(0),
        )
        .feature_scaler(IdentityScaler)
        .target_scaler(target)
        .build()?;
    let forecaster = SalesForecaster::from_config(&config, context)?;
    println!("Status: {:?}", forecaster.status());

    // 3. Single prediction
    println!("\n--- Single prediction ---");
    let request = ForecastRequest {
        branchcode: "GC01".to_string(),
        materialcode: "SKU_A".to_string(),
        historical_data: random_history("GC01", "SKU_A", config.window_size),
    };
    let prediction = forecaster.predict(&request)?;
    println!(
        "{} / {} after {}: {:.2}",
        prediction.branchcode,
        prediction.materialcode,
        prediction.prediction_date,
        prediction.predicted_sales
    );

    // 4. Multi-step forecast
    println!("\n--- Autoregressive forecast (7 steps) ---");
    let horizon = forecaster.predict_horizon(&request, 7)?;
    for (i, value) in horizon.values().iter().enumerate() {
        println!("  h={}: {:.2}", i + 1, value);
    }

    // 5. Batch with one bad request
    println!("\n--- Batch ---");
    let requests = vec![
        request.clone(),
        ForecastRequest {
            branchcode: "GC04".to_string(),
            materialcode: "SKU_D".to_string(),
            historical_data: random_history("GC04", "SKU_D", config.window_size),
        },
        ForecastRequest {
            branchcode: "GC09".to_string(),
            materialcode: "SKU_A".to_string(),
            historical_data: random_history("GC09", "SKU_A", config.window_size),
        },
    ];
    let batch = forecaster.predict_batch(&requests)?;
    println!(
        "{}",
        serde_json::to_string_pretty(&batch).unwrap_or_default()
    );

    // 6. Model metadata
    println!("\n--- Model info ---");
    let info = forecaster.model_info()?;
    println!("Model: {}", info.model_name);
    println!("Sequence length: {}", info.sequence_length);
    println!("Features ({}): {:?}", info.n_features, info.features);

    // 7. Offline windowing of a target series
    println!("\n--- Training windows ---");
    let sales: Vec<f64> = (0..10).map(|i| 10.0 * (i + 1) as f64).collect();
    let windows = make_windows(&sales, 3);
    println!("{} windows of 3 from {} values", windows.len(), sales.len());
    println!("First: {:?}", windows[0]);

    Ok(())
}
