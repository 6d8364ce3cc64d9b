//! Forecast result structure for holding predictions.

use serde::{Deserialize, Serialize};

/// Predicted target values in original (unscaled) units.
///
/// Every value is non-negative; the engine floors model output at zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ForecastResult {
    /// One step ahead.
    Single(f64),
    /// Several steps ahead, nearest first.
    Multi(Vec<f64>),
}

impl ForecastResult {
    /// Number of forecast steps.
    pub fn horizon(&self) -> usize {
        match self {
            ForecastResult::Single(_) => 1,
            ForecastResult::Multi(values) => values.len(),
        }
    }

    /// The first predicted value, if any.
    pub fn first(&self) -> Option<f64> {
        match self {
            ForecastResult::Single(v) => Some(*v),
            ForecastResult::Multi(values) => values.first().copied(),
        }
    }

    /// All predicted values, nearest first.
    pub fn values(&self) -> &[f64] {
        match self {
            ForecastResult::Single(v) => std::slice::from_ref(v),
            ForecastResult::Multi(values) => values,
        }
    }

    /// Consume into a vector of values.
    pub fn into_values(self) -> Vec<f64> {
        match self {
            ForecastResult::Single(v) => vec![v],
            ForecastResult::Multi(values) => values,
        }
    }
}
