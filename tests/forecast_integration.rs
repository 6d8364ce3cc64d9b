//! End-to-end tests: configuration → features → window → engine.

use std::fs;

use approx::assert_relative_eq;
use demandcast::config::ForecastConfig;
use demandcast::core::{FeatureVector, RawStep, SequenceTensor, Window};
use demandcast::models::{FnModel, ForecastEngine, InferenceContext};
use demandcast::service::{BatchOutcome, ForecastRequest, SalesForecaster};
use demandcast::transform::{
    make_windows, univariate_windows, IdentityScaler, MinMaxScaler, ScalerArtifact,
};
use demandcast::{ForecastError, Result};

fn mean_model(t: &SequenceTensor) -> Result<Vec<Vec<f64>>> {
    let (_, steps, _) = t.shape();
    let sum: f64 = (0..steps).filter_map(|i| t.step(i)).map(|s| s[0]).sum();
    Ok(vec![vec![sum / steps as f64]])
}

fn mean_context(shape: (usize, usize)) -> InferenceContext {
    InferenceContext::builder()
        .model(FnModel::new("mean", shape, mean_model))
        .feature_scaler(IdentityScaler)
        .target_scaler(IdentityScaler)
        .build()
        .unwrap()
}

/// Sixty days of history ending the day before `2024-03-15`.
fn history(branch: &str, material: &str) -> Vec<RawStep> {
    let start = chrono::NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
    (0..60)
        .map(|i| {
            let date = start - chrono::Duration::days(60 - i);
            RawStep {
                branchcode: branch.to_string(),
                materialcode: material.to_string(),
                stock_on_hand: 500.0 + 2.0 * i as f64,
                intransit_qty: 100.0,
                pending_po_qty: 50.0,
                lead_time_days: 7,
                date: date.format("%Y-%m-%d").to_string(),
            }
        })
        .collect()
}

#[test]
fn univariate_scenario_matches_reference_values() {
    let series = [10.0, 20.0, 30.0, 40.0];
    assert_eq!(
        make_windows(&series, 3),
        vec![vec![10.0, 20.0, 30.0]],
        "the final full window is not emitted"
    );
    let windows = univariate_windows(&series, 3)
        .collect::<Result<Vec<Window>>>()
        .unwrap();
    assert_eq!(windows[0].primary(), vec![10.0, 20.0, 30.0]);

    // The two windows of the scenario, [10,20,30] and [20,30,40].
    let first = Window::from_series(&series[0..3], 3).unwrap();
    let second = Window::from_series(&series[1..4], 3).unwrap();

    let ctx = mean_context((3, 1));
    let engine = ForecastEngine::new(&ctx);

    assert_relative_eq!(engine.forecast_one(&first).unwrap(), 20.0, epsilon = 1e-12);
    assert_relative_eq!(engine.forecast_one(&second).unwrap(), 30.0, epsilon = 1e-12);

    let multi = engine.forecast_multi(&first, 2).unwrap();
    assert_eq!(multi.horizon(), 2);
    assert_relative_eq!(multi.values()[0], 20.0, epsilon = 1e-12);
    assert_relative_eq!(multi.values()[1], (20.0 + 30.0 + 20.0) / 3.0, epsilon = 1e-12);
}

#[test]
fn full_pipeline_with_default_configuration() {
    let config = ForecastConfig::default();
    let context = mean_context((config.window_size, FeatureVector::LEN));
    let forecaster = SalesForecaster::from_config(&config, context).unwrap();

    let request = ForecastRequest {
        branchcode: "GC01".to_string(),
        materialcode: "SKU_A".to_string(),
        historical_data: history("GC01", "SKU_A"),
    };
    let prediction = forecaster.predict(&request).unwrap();

    // mean of 500, 502, ..., 618
    assert_relative_eq!(prediction.predicted_sales, 559.0, epsilon = 1e-9);
    assert_eq!(prediction.prediction_date, "2024-03-14");

    let horizon = forecaster.predict_horizon(&request, 4).unwrap();
    assert_eq!(horizon.horizon(), 4);
    assert_relative_eq!(horizon.values()[0], prediction.predicted_sales, epsilon = 1e-12);
}

#[test]
fn request_json_drives_a_batch() {
    let config = ForecastConfig::default();
    let forecaster = SalesForecaster::from_config(
        &config,
        mean_context((config.window_size, FeatureVector::LEN)),
    )
    .unwrap();

    let mut requests = Vec::new();
    for (branch, sku) in [("GC01", "SKU_A"), ("GC02", "SKU_B"), ("ZZ99", "SKU_A")] {
        let json = serde_json::json!({
            "branchcode": branch,
            "materialcode": sku,
            "historical_data": history(branch, sku),
        });
        requests.push(serde_json::from_value::<ForecastRequest>(json).unwrap());
    }

    let batch = forecaster.predict_batch(&requests).unwrap();
    assert!(batch.predictions[0].is_ok());
    assert!(batch.predictions[1].is_ok());
    assert!(matches!(
        &batch.predictions[2],
        BatchOutcome::Failed { branchcode, .. } if branchcode == "ZZ99"
    ));
}

#[test]
fn artifacts_and_configuration_load_from_disk() {
    let dir = tempfile::tempdir().unwrap();

    // Full-width feature scaler; stock_on_hand spans [0, 1000].
    let lows = vec![0.0, 0.0, 0.0, 0.0, -1.0, -1.0, -1.0, -1.0, 0.0, 0.0, 0.0];
    let highs = vec![1000.0, 200.0, 100.0, 14.0, 1.0, 1.0, 1.0, 1.0, 1.0, 4.0, 4.0];
    let feature = MinMaxScaler::new((0.0, 1.0), lows, highs).unwrap();
    ScalerArtifact::from(feature)
        .save(dir.path().join("feature_scaler.json"))
        .unwrap();
    let target = MinMaxScaler::new((0.0, 1.0), vec![0.0], vec![2000.0]).unwrap();
    ScalerArtifact::from(target)
        .save(dir.path().join("target_scaler.json"))
        .unwrap();

    let config_path = dir.path().join("forecast.toml");
    fs::write(
        &config_path,
        r#"
window_size = 60

[artifacts]
feature_scaler = "feature_scaler.json"
target_scaler = "target_scaler.json"
"#,
    )
    .unwrap();

    let config = ForecastConfig::load(&config_path).unwrap();
    let context = InferenceContext::builder()
        .model(FnModel::new("mean", (60, FeatureVector::LEN), mean_model))
        .load_scalers(&config.artifacts)
        .unwrap()
        .build()
        .unwrap();
    let forecaster = SalesForecaster::from_config(&config, context).unwrap();
    assert_eq!(forecaster.status().status, "healthy");

    let request = ForecastRequest {
        branchcode: "GC03".to_string(),
        materialcode: "SKU_C".to_string(),
        historical_data: history("GC03", "SKU_C"),
    };
    // scaled mean stock 559 / 1000 -> 0.559 -> 1118 in target units
    let p = forecaster.predict(&request).unwrap();
    assert_relative_eq!(p.predicted_sales, 1118.0, epsilon = 1e-6);
}

#[test]
fn error_kinds_surface_unchanged() {
    let config = ForecastConfig::default();
    let forecaster = SalesForecaster::from_config(
        &config,
        mean_context((config.window_size, FeatureVector::LEN)),
    )
    .unwrap();

    let mut data = history("GC01", "SKU_A");
    data[10].date = "2024-02-30".to_string();
    let request = ForecastRequest {
        branchcode: "GC01".to_string(),
        materialcode: "SKU_A".to_string(),
        historical_data: data,
    };
    let err = forecaster.predict(&request).unwrap_err();
    assert!(matches!(err, ForecastError::Validation(_)));
    assert_eq!(err.status_code(), 400);

    let mut data = history("GC01", "SKU_A");
    data.pop();
    let request = ForecastRequest {
        historical_data: data,
        ..request
    };
    assert_eq!(
        forecaster.predict(&request).unwrap_err(),
        ForecastError::WindowSize {
            expected: 60,
            got: 59
        }
    );
}
