//! Request-level forecasting: validation, single and batch prediction,
//! model metadata and health.
//!
//! Any transport (HTTP, CLI, queue consumer) can wrap [`SalesForecaster`];
//! the request and response types serialize with serde and errors carry a
//! [`ForecastError::status_code`] hint.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::ForecastConfig;
use crate::core::{FeatureVector, ForecastResult, RawStep, Window};
use crate::error::{ForecastError, Result};
use crate::features::FeatureAssembler;
use crate::models::{ForecastEngine, InferenceContext};

/// A forecast request: the most recent `window_size` observations for one
/// branch/material pair, oldest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastRequest {
    pub branchcode: String,
    pub materialcode: String,
    pub historical_data: Vec<RawStep>,
}

/// Single-step prediction for one request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesPrediction {
    pub predicted_sales: f64,
    pub branchcode: String,
    pub materialcode: String,
    /// Date of the last historical observation
    pub prediction_date: String,
}

/// Outcome of one request within a batch.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum BatchOutcome {
    Predicted(SalesPrediction),
    Failed {
        error: String,
        branchcode: String,
        materialcode: String,
    },
}

impl BatchOutcome {
    pub fn is_ok(&self) -> bool {
        matches!(self, BatchOutcome::Predicted(_))
    }
}

/// Batch response body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchResponse {
    pub predictions: Vec<BatchOutcome>,
}

/// Description of the loaded model and its input contract.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelInfo {
    pub model_name: String,
    pub sequence_length: usize,
    pub features: Vec<String>,
    pub n_features: usize,
    pub branches: Vec<String>,
    pub skus: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_parameters: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_layers: Option<usize>,
}

/// Health summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ServiceStatus {
    pub status: &'static str,
    pub model_loaded: bool,
    pub scalers_loaded: bool,
}

/// Forecasting facade over static configuration and loaded artifacts.
///
/// Immutable after construction; share it behind an `Arc` to serve
/// concurrent requests.
#[derive(Debug, Clone)]
pub struct SalesForecaster {
    window_size: usize,
    assembler: FeatureAssembler,
    context: InferenceContext,
}

impl SalesForecaster {
    pub fn new(
        window_size: usize,
        assembler: FeatureAssembler,
        context: InferenceContext,
    ) -> Self {
        Self {
            window_size,
            assembler,
            context,
        }
    }

    /// Build from configuration, checking the window size against the model.
    pub fn from_config(config: &ForecastConfig, context: InferenceContext) -> Result<Self> {
        config.validate()?;
        if let Ok(model) = context.model() {
            let expected = (config.window_size, FeatureVector::LEN);
            if model.input_shape() != expected {
                return Err(ForecastError::Config(format!(
                    "model {} expects input {:?}, configuration implies {:?}",
                    model.name(),
                    model.input_shape(),
                    expected
                )));
            }
        }
        Ok(Self::new(config.window_size, config.assembler()?, context))
    }

    pub fn window_size(&self) -> usize {
        self.window_size
    }

    pub fn assembler(&self) -> &FeatureAssembler {
        &self.assembler
    }

    pub fn context(&self) -> &InferenceContext {
        &self.context
    }

    /// Engine bound to this forecaster's artifacts.
    pub fn engine(&self) -> ForecastEngine<'_> {
        ForecastEngine::new(&self.context)
    }

    /// Validate the request and assemble its window.
    ///
    /// Missing artifacts are reported before any input problem.
    pub fn build_window(&self, request: &ForecastRequest) -> Result<Window> {
        self.context.ensure_ready()?;
        self.assembler
            .assemble_window(&request.historical_data, self.window_size)
    }

    /// Predict sales for the step after the request's last observation.
    pub fn predict(&self, request: &ForecastRequest) -> Result<SalesPrediction> {
        let window = self.build_window(request)?;
        let predicted_sales = self.engine().forecast_one(&window)?;
        debug!(
            branch = %request.branchcode,
            material = %request.materialcode,
            predicted_sales,
            "prediction"
        );

        let prediction_date = request
            .historical_data
            .last()
            .map(|s| s.date.clone())
            .unwrap_or_default();

        Ok(SalesPrediction {
            predicted_sales,
            branchcode: request.branchcode.clone(),
            materialcode: request.materialcode.clone(),
            prediction_date,
        })
    }

    /// Predict `steps` values autoregressively from the request's window.
    pub fn predict_horizon(
        &self,
        request: &ForecastRequest,
        steps: usize,
    ) -> Result<ForecastResult> {
        let window = self.build_window(request)?;
        self.engine().forecast_multi(&window, steps)
    }

    /// Predict every request independently.
    ///
    /// Fails as a whole only if artifacts are missing; otherwise each failed
    /// request becomes a [`BatchOutcome::Failed`] carrying its identifiers.
    pub fn predict_batch(&self, requests: &[ForecastRequest]) -> Result<BatchResponse> {
        self.context.ensure_ready()?;

        let predictions = requests
            .iter()
            .map(|request| match self.predict(request) {
                Ok(p) => BatchOutcome::Predicted(p),
                Err(e) => {
                    warn!(
                        branch = %request.branchcode,
                        material = %request.materialcode,
                        error = %e,
                        "batch item failed"
                    );
                    BatchOutcome::Failed {
                        error: e.to_string(),
                        branchcode: request.branchcode.clone(),
                        materialcode: request.materialcode.clone(),
                    }
                }
            })
            .collect();

        Ok(BatchResponse { predictions })
    }

    /// Metadata about the model and the feature contract.
    pub fn model_info(&self) -> Result<ModelInfo> {
        let model = self.context.model()?;
        let categories = self.assembler.categories();
        let features: Vec<String> = FeatureVector::feature_names()
            .into_iter()
            .map(String::from)
            .collect();

        Ok(ModelInfo {
            model_name: model.name().to_string(),
            sequence_length: self.window_size,
            n_features: features.len(),
            features,
            branches: categories.branches().into_iter().map(String::from).collect(),
            skus: categories.materials().into_iter().map(String::from).collect(),
            model_parameters: model.parameter_count(),
            model_layers: model.layer_count(),
        })
    }

    pub fn status(&self) -> ServiceStatus {
        let artifacts = self.context.status();
        ServiceStatus {
            status: if artifacts.is_ready() {
                "healthy"
            } else {
                "degraded"
            },
            model_loaded: artifacts.model_loaded,
            scalers_loaded: artifacts.scalers_loaded(),
        }
    }
}
