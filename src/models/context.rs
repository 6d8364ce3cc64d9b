//! Immutable inference context holding the loaded model and scalers.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use crate::config::ArtifactPaths;
use crate::error::{ForecastError, Result};
use crate::models::SequenceModel;
use crate::transform::{Scaler, ScalerArtifact};

/// Model shared between threads.
pub type SharedModel = Arc<dyn SequenceModel + Send + Sync>;

/// Scaler shared between threads.
pub type SharedScaler = Arc<dyn Scaler + Send + Sync>;

/// Which artifacts are loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ArtifactStatus {
    pub model_loaded: bool,
    pub feature_scaler_loaded: bool,
    pub target_scaler_loaded: bool,
}

impl ArtifactStatus {
    /// Both scalers are loaded.
    pub fn scalers_loaded(&self) -> bool {
        self.feature_scaler_loaded && self.target_scaler_loaded
    }

    /// Everything needed for a forecast is loaded.
    pub fn is_ready(&self) -> bool {
        self.model_loaded && self.scalers_loaded()
    }
}

/// Model and scalers, built once and then only read.
///
/// Any artifact may be absent; forecasts then fail with
/// [`ForecastError::ArtifactUnavailable`] before doing any work. Cloning is
/// cheap and shares the artifacts.
#[derive(Clone, Default)]
pub struct InferenceContext {
    model: Option<SharedModel>,
    feature_scaler: Option<SharedScaler>,
    target_scaler: Option<SharedScaler>,
}

impl InferenceContext {
    /// Start building a context.
    pub fn builder() -> InferenceContextBuilder {
        InferenceContextBuilder::default()
    }

    /// A context with nothing loaded.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The model, or `ArtifactUnavailable`.
    pub fn model(&self) -> Result<&(dyn SequenceModel + Send + Sync)> {
        self.model
            .as_deref()
            .ok_or_else(|| ForecastError::ArtifactUnavailable("model not loaded".to_string()))
    }

    /// The feature scaler, or `ArtifactUnavailable`.
    pub fn feature_scaler(&self) -> Result<&(dyn Scaler + Send + Sync)> {
        self.feature_scaler.as_deref().ok_or_else(|| {
            ForecastError::ArtifactUnavailable("feature scaler not loaded".to_string())
        })
    }

    /// The target scaler, or `ArtifactUnavailable`.
    pub fn target_scaler(&self) -> Result<&(dyn Scaler + Send + Sync)> {
        self.target_scaler.as_deref().ok_or_else(|| {
            ForecastError::ArtifactUnavailable("target scaler not loaded".to_string())
        })
    }

    /// Fail unless every artifact is loaded.
    pub fn ensure_ready(&self) -> Result<()> {
        self.model()?;
        self.feature_scaler()?;
        self.target_scaler()?;
        Ok(())
    }

    pub fn status(&self) -> ArtifactStatus {
        ArtifactStatus {
            model_loaded: self.model.is_some(),
            feature_scaler_loaded: self.feature_scaler.is_some(),
            target_scaler_loaded: self.target_scaler.is_some(),
        }
    }
}

impl fmt::Debug for InferenceContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InferenceContext")
            .field("model", &self.model.as_ref().map(|m| m.name().to_string()))
            .field(
                "feature_scaler",
                &self.feature_scaler.as_ref().map(|s| s.name().to_string()),
            )
            .field(
                "target_scaler",
                &self.target_scaler.as_ref().map(|s| s.name().to_string()),
            )
            .finish()
    }
}

/// Builder for [`InferenceContext`].
#[derive(Default)]
pub struct InferenceContextBuilder {
    model: Option<SharedModel>,
    feature_scaler: Option<SharedScaler>,
    target_scaler: Option<SharedScaler>,
}

impl InferenceContextBuilder {
    pub fn model<M>(mut self, model: M) -> Self
    where
        M: SequenceModel + Send + Sync + 'static,
    {
        self.model = Some(Arc::new(model));
        self
    }

    pub fn shared_model(mut self, model: SharedModel) -> Self {
        self.model = Some(model);
        self
    }

    pub fn feature_scaler<S>(mut self, scaler: S) -> Self
    where
        S: Scaler + Send + Sync + 'static,
    {
        self.feature_scaler = Some(Arc::new(scaler));
        self
    }

    pub fn target_scaler<S>(mut self, scaler: S) -> Self
    where
        S: Scaler + Send + Sync + 'static,
    {
        self.target_scaler = Some(Arc::new(scaler));
        self
    }

    /// Load whichever scaler artifacts `paths` names.
    pub fn load_scalers(mut self, paths: &ArtifactPaths) -> Result<Self> {
        if let Some(path) = &paths.feature_scaler {
            let scaler = ScalerArtifact::load(path)?;
            info!(path = %path.display(), kind = scaler.name(), "loaded feature scaler");
            self.feature_scaler = Some(Arc::new(scaler));
        }
        if let Some(path) = &paths.target_scaler {
            let scaler = ScalerArtifact::load(path)?;
            info!(path = %path.display(), kind = scaler.name(), "loaded target scaler");
            self.target_scaler = Some(Arc::new(scaler));
        }
        Ok(self)
    }

    /// Finish the context, checking that loaded artifacts agree on shape.
    pub fn build(self) -> Result<InferenceContext> {
        if let (Some(model), Some(scaler)) = (&self.model, &self.feature_scaler) {
            let (steps, features) = model.input_shape();
            if let Some(n) = scaler.n_features() {
                if n != features {
                    return Err(ForecastError::Config(format!(
                        "feature scaler fitted on {n} columns but model {} expects {features} \
                         (window {steps})",
                        model.name()
                    )));
                }
            }
        }
        if let Some(scaler) = &self.target_scaler {
            if let Some(n) = scaler.n_features() {
                if n != 1 {
                    return Err(ForecastError::Config(format!(
                        "target scaler must have one column, has {n}"
                    )));
                }
            }
        }

        Ok(InferenceContext {
            model: self.model,
            feature_scaler: self.feature_scaler,
            target_scaler: self.target_scaler,
        })
    }
}
