//! Column-wise scalers used around the sequence model.
//!
//! The feature scaler normalizes each input column before the model sees it;
//! the target scaler maps the model's scaled output back to sales units.
//! Fitted parameters are persisted as JSON artifacts.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ForecastError, Result};

/// An invertible column-wise transform over a 2-D row matrix.
pub trait Scaler {
    /// Number of columns the scaler was fitted on, or `None` if it accepts any width.
    fn n_features(&self) -> Option<usize>;

    /// Forward transform.
    fn transform(&self, rows: &[Vec<f64>]) -> Result<Vec<Vec<f64>>>;

    /// Inverse transform.
    fn inverse_transform(&self, rows: &[Vec<f64>]) -> Result<Vec<Vec<f64>>>;

    /// Scaler name for logging.
    fn name(&self) -> &str;
}

fn check_width(rows: &[Vec<f64>], n_features: usize) -> Result<()> {
    if let Some(bad) = rows.iter().find(|r| r.len() != n_features) {
        return Err(ForecastError::ShapeMismatch {
            expected: (rows.len(), n_features),
            got: (rows.len(), bad.len()),
        });
    }
    Ok(())
}

/// x' = (x - center) / scale, column by column.
fn affine_forward(rows: &[Vec<f64>], center: &[f64], scale: &[f64]) -> Vec<Vec<f64>> {
    rows.iter()
        .map(|row| {
            row.iter()
                .zip(center.iter().zip(scale))
                .map(|(&x, (&c, &s))| (x - c) / s)
                .collect()
        })
        .collect()
}

/// x = x' * scale + center, column by column.
fn affine_inverse(rows: &[Vec<f64>], center: &[f64], scale: &[f64]) -> Vec<Vec<f64>> {
    rows.iter()
        .map(|row| {
            row.iter()
                .zip(center.iter().zip(scale))
                .map(|(&x, (&c, &s))| x * s + c)
                .collect()
        })
        .collect()
}

/// Replace a degenerate (near-zero) spread with 1.0.
fn non_degenerate(spread: f64) -> f64 {
    if spread.abs() < 1e-10 {
        1.0
    } else {
        spread
    }
}

fn columns(rows: &[Vec<f64>]) -> Result<usize> {
    let first = rows
        .first()
        .ok_or_else(|| ForecastError::Validation("cannot fit a scaler on empty data".into()))?;
    if first.is_empty() {
        return Err(ForecastError::Validation(
            "cannot fit a scaler on zero columns".into(),
        ));
    }
    check_width(rows, first.len())?;
    Ok(first.len())
}

/// Min-max scaling of each column into `feature_range`.
///
/// x' = (x - data_min) / (data_max - data_min) * (hi - lo) + lo
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MinMaxScaler {
    pub feature_range: (f64, f64),
    pub data_min: Vec<f64>,
    pub data_max: Vec<f64>,
}

impl MinMaxScaler {
    /// Create from fitted parameters.
    pub fn new(feature_range: (f64, f64), data_min: Vec<f64>, data_max: Vec<f64>) -> Result<Self> {
        if data_min.len() != data_max.len() || data_min.is_empty() {
            return Err(ForecastError::Config(format!(
                "min-max scaler needs matching non-empty bounds, got {} and {}",
                data_min.len(),
                data_max.len()
            )));
        }
        if !(feature_range.0.is_finite() && feature_range.1.is_finite())
            || feature_range.0 >= feature_range.1
        {
            return Err(ForecastError::Config(format!(
                "invalid feature range {:?}",
                feature_range
            )));
        }
        for (j, (&min, &max)) in data_min.iter().zip(&data_max).enumerate() {
            if !(min.is_finite() && max.is_finite()) || min > max {
                return Err(ForecastError::Config(format!(
                    "invalid min-max bounds for column {j}: [{min}, {max}]"
                )));
            }
        }
        Ok(Self {
            feature_range,
            data_min,
            data_max,
        })
    }

    /// Fit column bounds on `rows`.
    pub fn fit(rows: &[Vec<f64>], feature_range: (f64, f64)) -> Result<Self> {
        let n = columns(rows)?;
        let mut data_min = vec![f64::INFINITY; n];
        let mut data_max = vec![f64::NEG_INFINITY; n];
        for row in rows {
            for (j, &x) in row.iter().enumerate() {
                data_min[j] = data_min[j].min(x);
                data_max[j] = data_max[j].max(x);
            }
        }
        Self::new(feature_range, data_min, data_max)
    }

    /// Equivalent (center, scale) per column.
    fn params(&self) -> (Vec<f64>, Vec<f64>) {
        let (lo, hi) = self.feature_range;
        let width = hi - lo;
        self.data_min
            .iter()
            .zip(&self.data_max)
            .map(|(&min, &max)| {
                let scale = non_degenerate(max - min) / width;
                (min - lo * scale, scale)
            })
            .unzip()
    }
}

impl Scaler for MinMaxScaler {
    fn n_features(&self) -> Option<usize> {
        Some(self.data_min.len())
    }

    fn transform(&self, rows: &[Vec<f64>]) -> Result<Vec<Vec<f64>>> {
        check_width(rows, self.data_min.len())?;
        let (center, scale) = self.params();
        Ok(affine_forward(rows, &center, &scale))
    }

    fn inverse_transform(&self, rows: &[Vec<f64>]) -> Result<Vec<Vec<f64>>> {
        check_width(rows, self.data_min.len())?;
        let (center, scale) = self.params();
        Ok(affine_inverse(rows, &center, &scale))
    }

    fn name(&self) -> &str {
        "MinMaxScaler"
    }
}

/// Standardization of each column to zero mean and unit variance.
///
/// x' = (x - mean) / scale, where scale is the population standard deviation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

impl StandardScaler {
    /// Create from fitted parameters.
    pub fn new(mean: Vec<f64>, scale: Vec<f64>) -> Result<Self> {
        if mean.len() != scale.len() || mean.is_empty() {
            return Err(ForecastError::Config(format!(
                "standard scaler needs matching non-empty parameters, got {} and {}",
                mean.len(),
                scale.len()
            )));
        }
        if let Some(j) = mean.iter().position(|m| !m.is_finite()) {
            return Err(ForecastError::Config(format!(
                "non-finite mean {} for column {j}",
                mean[j]
            )));
        }
        if let Some(j) = scale.iter().position(|s| !s.is_finite() || *s < 0.0) {
            return Err(ForecastError::Config(format!(
                "invalid scale {} for column {j}",
                scale[j]
            )));
        }
        let scale = scale.into_iter().map(non_degenerate).collect();
        Ok(Self { mean, scale })
    }

    /// Fit column means and standard deviations on `rows`.
    pub fn fit(rows: &[Vec<f64>]) -> Result<Self> {
        let n = columns(rows)?;
        let count = rows.len() as f64;

        let mut mean = vec![0.0; n];
        for row in rows {
            for (j, &x) in row.iter().enumerate() {
                mean[j] += x;
            }
        }
        mean.iter_mut().for_each(|m| *m /= count);

        let mut var = vec![0.0; n];
        for row in rows {
            for (j, &x) in row.iter().enumerate() {
                var[j] += (x - mean[j]).powi(2);
            }
        }
        let scale = var.iter().map(|v| (v / count).sqrt()).collect();

        Self::new(mean, scale)
    }
}

impl Scaler for StandardScaler {
    fn n_features(&self) -> Option<usize> {
        Some(self.mean.len())
    }

    fn transform(&self, rows: &[Vec<f64>]) -> Result<Vec<Vec<f64>>> {
        check_width(rows, self.mean.len())?;
        Ok(affine_forward(rows, &self.mean, &self.scale))
    }

    fn inverse_transform(&self, rows: &[Vec<f64>]) -> Result<Vec<Vec<f64>>> {
        check_width(rows, self.mean.len())?;
        Ok(affine_inverse(rows, &self.mean, &self.scale))
    }

    fn name(&self) -> &str {
        "StandardScaler"
    }
}

/// Pass-through scaler.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct IdentityScaler;

impl Scaler for IdentityScaler {
    fn n_features(&self) -> Option<usize> {
        None
    }

    fn transform(&self, rows: &[Vec<f64>]) -> Result<Vec<Vec<f64>>> {
        Ok(rows.to_vec())
    }

    fn inverse_transform(&self, rows: &[Vec<f64>]) -> Result<Vec<Vec<f64>>> {
        Ok(rows.to_vec())
    }

    fn name(&self) -> &str {
        "IdentityScaler"
    }
}

/// A scaler as stored on disk, tagged by kind.
///
/// ```json
/// {"kind": "min_max", "feature_range": [0.0, 1.0], "data_min": [0.0], "data_max": [10.0]}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScalerArtifact {
    MinMax(MinMaxScaler),
    Standard(StandardScaler),
    Identity,
}

impl ScalerArtifact {
    /// Load a scaler artifact from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| {
            ForecastError::Config(format!("cannot read scaler {}: {e}", path.display()))
        })?;
        Self::from_json(&text)
            .map_err(|e| ForecastError::Config(format!("{}: {e}", path.display())))
    }

    /// Parse a scaler artifact from JSON text.
    pub fn from_json(text: &str) -> Result<Self> {
        let artifact: Self = serde_json::from_str(text)
            .map_err(|e| ForecastError::Config(format!("invalid scaler artifact: {e}")))?;
        artifact.validated()
    }

    /// Write the artifact as pretty JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let text = serde_json::to_string_pretty(self)
            .map_err(|e| ForecastError::Config(format!("cannot encode scaler: {e}")))?;
        fs::write(path, text).map_err(|e| {
            ForecastError::Config(format!("cannot write scaler {}: {e}", path.display()))
        })
    }

    // Deserialization bypasses the constructors, so re-run their checks.
    fn validated(self) -> Result<Self> {
        match self {
            ScalerArtifact::MinMax(s) => Ok(ScalerArtifact::MinMax(MinMaxScaler::new(
                s.feature_range,
                s.data_min,
                s.data_max,
            )?)),
            ScalerArtifact::Standard(s) => Ok(ScalerArtifact::Standard(StandardScaler::new(
                s.mean, s.scale,
            )?)),
            ScalerArtifact::Identity => Ok(ScalerArtifact::Identity),
        }
    }

    fn inner(&self) -> &dyn Scaler {
        match self {
            ScalerArtifact::MinMax(s) => s,
            ScalerArtifact::Standard(s) => s,
            ScalerArtifact::Identity => &IdentityScaler,
        }
    }
}

impl Scaler for ScalerArtifact {
    fn n_features(&self) -> Option<usize> {
        self.inner().n_features()
    }

    fn transform(&self, rows: &[Vec<f64>]) -> Result<Vec<Vec<f64>>> {
        self.inner().transform(rows)
    }

    fn inverse_transform(&self, rows: &[Vec<f64>]) -> Result<Vec<Vec<f64>>> {
        self.inner().inverse_transform(rows)
    }

    fn name(&self) -> &str {
        self.inner().name()
    }
}

impl From<MinMaxScaler> for ScalerArtifact {
    fn from(s: MinMaxScaler) -> Self {
        ScalerArtifact::MinMax(s)
    }
}

impl From<StandardScaler> for ScalerArtifact {
    fn from(s: StandardScaler) -> Self {
        ScalerArtifact::Standard(s)
    }
}
