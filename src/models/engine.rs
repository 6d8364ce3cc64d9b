//! Single-step and autoregressive multi-step forecasting.

use tracing::debug;

use crate::core::{ForecastResult, SequenceTensor, Window};
use crate::error::{ForecastError, Result};
use crate::models::{InferenceContext, SequenceModel};
use crate::transform::Scaler;

/// Runs the scale → infer → unscale → clamp pipeline over an
/// [`InferenceContext`].
///
/// The engine holds no state of its own between calls.
#[derive(Debug, Clone, Copy)]
pub struct ForecastEngine<'a> {
    context: &'a InferenceContext,
}

struct Artifacts<'a> {
    model: &'a (dyn SequenceModel + Send + Sync),
    feature_scaler: &'a (dyn Scaler + Send + Sync),
    target_scaler: &'a (dyn Scaler + Send + Sync),
}

impl<'a> ForecastEngine<'a> {
    pub fn new(context: &'a InferenceContext) -> Self {
        Self { context }
    }

    fn artifacts(&self) -> Result<Artifacts<'a>> {
        Ok(Artifacts {
            model: self.context.model()?,
            feature_scaler: self.context.feature_scaler()?,
            target_scaler: self.context.target_scaler()?,
        })
    }

    /// Predict the next value from `window`, in original units, floored at zero.
    pub fn forecast_one(&self, window: &Window) -> Result<f64> {
        let artifacts = self.artifacts()?;
        Self::step(&artifacts, window)
    }

    /// Single-step forecast wrapped as a [`ForecastResult`].
    pub fn forecast_single(&self, window: &Window) -> Result<ForecastResult> {
        self.forecast_one(window).map(ForecastResult::Single)
    }

    /// Predict `steps` values autoregressively.
    ///
    /// After each step the oldest row is dropped and a row carrying the
    /// prediction in the first channel, zeros elsewhere, is appended. The
    /// exogenous channels are not regenerated for future steps, so accuracy
    /// degrades with the horizon.
    pub fn forecast_multi(&self, window: &Window, steps: usize) -> Result<ForecastResult> {
        let artifacts = self.artifacts()?;
        if steps == 0 {
            return Err(ForecastError::Validation(
                "forecast horizon must be at least 1".to_string(),
            ));
        }

        let mut current = window.clone();
        let mut predictions = Vec::with_capacity(steps);
        for step in 0..steps {
            let p = Self::step(&artifacts, &current)?;
            debug!(step, prediction = p, "autoregressive step");
            predictions.push(p);
            current.advance(p);
        }

        Ok(ForecastResult::Multi(predictions))
    }

    /// `Single` for a horizon of one, `Multi` otherwise.
    pub fn forecast(&self, window: &Window, steps: usize) -> Result<ForecastResult> {
        if steps == 1 {
            self.forecast_single(window)
        } else {
            self.forecast_multi(window, steps)
        }
    }

    fn step(artifacts: &Artifacts<'_>, window: &Window) -> Result<f64> {
        let expected = artifacts.model.input_shape();
        if window.shape() != expected {
            return Err(ForecastError::ShapeMismatch {
                expected,
                got: window.shape(),
            });
        }

        let scaled = artifacts.feature_scaler.transform(window.rows())?;
        let tensor = SequenceTensor::from_rows(&scaled)?;
        let output = artifacts.model.predict(&tensor)?;
        let raw = finite(first_element(&output)?, "model")?;

        let unscaled = artifacts.target_scaler.inverse_transform(&[vec![raw]])?;
        let value = finite(first_element(&unscaled)?, "target scaler")?;

        // Sales quantities are physical and cannot be negative.
        Ok(value.max(0.0))
    }
}

fn finite(value: f64, stage: &str) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ForecastError::Validation(format!(
            "{stage} produced non-finite output {value}"
        )))
    }
}

fn first_element(matrix: &[Vec<f64>]) -> Result<f64> {
    matrix
        .first()
        .and_then(|row| row.first())
        .copied()
        .ok_or_else(|| ForecastError::ShapeMismatch {
            expected: (1, 1),
            got: (matrix.len(), matrix.first().map_or(0, |r| r.len())),
        })
}
