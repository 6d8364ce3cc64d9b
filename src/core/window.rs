//! Fixed-length model input windows and the tensor handed to the model.

use crate::core::FeatureVector;
use crate::error::{ForecastError, Result};

/// An ordered run of exactly `window_size` feature rows, oldest first.
///
/// Every row has the same width. A window is never padded or truncated;
/// construction fails instead.
#[derive(Debug, Clone, PartialEq)]
pub struct Window {
    rows: Vec<Vec<f64>>,
    feature_count: usize,
}

impl Window {
    /// Build a window from raw numeric rows.
    ///
    /// The length is checked first: [`ForecastError::WindowSize`] unless
    /// `rows.len() == window_size`. A zero `window_size`, zero-width rows and
    /// non-finite cells are [`ForecastError::Validation`]; rows that differ in
    /// width are [`ForecastError::ShapeMismatch`].
    pub fn from_rows(rows: Vec<Vec<f64>>, window_size: usize) -> Result<Self> {
        if rows.len() != window_size {
            return Err(ForecastError::WindowSize {
                expected: window_size,
                got: rows.len(),
            });
        }
        if window_size == 0 {
            return Err(ForecastError::Validation(
                "window size must be positive".to_string(),
            ));
        }

        let feature_count = rows[0].len();
        if feature_count == 0 {
            return Err(ForecastError::Validation(
                "window rows must contain at least one feature".to_string(),
            ));
        }
        if let Some(bad) = rows.iter().find(|r| r.len() != feature_count) {
            return Err(ForecastError::ShapeMismatch {
                expected: (window_size, feature_count),
                got: (window_size, bad.len()),
            });
        }
        for (i, row) in rows.iter().enumerate() {
            if let Some(j) = row.iter().position(|x| !x.is_finite()) {
                return Err(ForecastError::Validation(format!(
                    "non-finite value {} at step {i}, feature {j}",
                    row[j]
                )));
            }
        }

        Ok(Self {
            rows,
            feature_count,
        })
    }

    /// Build a window from assembled feature vectors.
    pub fn from_features(vectors: &[FeatureVector], window_size: usize) -> Result<Self> {
        let rows = vectors.iter().map(|v| v.to_row().to_vec()).collect();
        Self::from_rows(rows, window_size)
    }

    /// Build a univariate window (one feature per step) from a series slice.
    pub fn from_series(series: &[f64], window_size: usize) -> Result<Self> {
        let rows = series.iter().map(|&x| vec![x]).collect();
        Self::from_rows(rows, window_size)
    }

    /// Number of time steps.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Always false for a constructed window.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of features per time step.
    pub fn feature_count(&self) -> usize {
        self.feature_count
    }

    /// (time steps, features)
    pub fn shape(&self) -> (usize, usize) {
        (self.rows.len(), self.feature_count)
    }

    /// Rows, oldest first.
    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    /// Values of the first feature channel, oldest first.
    pub fn primary(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r[0]).collect()
    }

    /// Slide forward by one step, appending a synthetic row that carries
    /// `value` in the first channel and zeros everywhere else.
    ///
    /// Exogenous channels (calendar, categorical, stock fields) are not
    /// regenerated for future steps.
    pub fn advance(&mut self, value: f64) {
        let mut next = vec![0.0; self.feature_count];
        next[0] = value;
        self.rows.remove(0);
        self.rows.push(next);
    }
}

/// Row-major `(1, steps, features)` tensor fed to a sequence model.
#[derive(Debug, Clone, PartialEq)]
pub struct SequenceTensor {
    steps: usize,
    features: usize,
    data: Vec<f64>,
}

impl SequenceTensor {
    /// Flatten a `(steps, features)` matrix into a single-batch tensor.
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self> {
        let steps = rows.len();
        let features = rows.first().map(|r| r.len()).unwrap_or(0);
        let mut data = Vec::with_capacity(steps * features);
        for row in rows {
            if row.len() != features {
                return Err(ForecastError::ShapeMismatch {
                    expected: (steps, features),
                    got: (steps, row.len()),
                });
            }
            data.extend_from_slice(row);
        }
        Ok(Self {
            steps,
            features,
            data,
        })
    }

    /// (batch, steps, features); batch is always 1.
    pub fn shape(&self) -> (usize, usize, usize) {
        (1, self.steps, self.features)
    }

    /// Values of one time step.
    pub fn step(&self, index: usize) -> Option<&[f64]> {
        if index >= self.steps {
            return None;
        }
        let start = index * self.features;
        Some(&self.data[start..start + self.features])
    }

    /// Flat row-major data.
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }
}
