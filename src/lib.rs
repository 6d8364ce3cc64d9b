//! # demandcast
//!
//! Sales forecasting around a pre-trained sequence model (e.g. a BiLSTM
//! with attention) and its fitted feature/target scalers.
//!
//! The crate derives calendar and categorical features for each day of
//! inventory history, assembles fixed-length windows, and runs single-step
//! or autoregressive multi-step forecasts. The model and scalers are
//! supplied through the [`models::SequenceModel`] and [`transform::Scaler`]
//! traits and held in an immutable [`models::InferenceContext`].

pub mod config;
pub mod core;
pub mod error;
pub mod features;
pub mod models;
pub mod service;
pub mod transform;

pub use error::{CategoryKind, ForecastError, Result};

pub mod prelude {
    pub use crate::config::ForecastConfig;
    pub use crate::core::{FeatureVector, ForecastResult, RawStep, SequenceTensor, Window};
    pub use crate::error::{CategoryKind, ForecastError, Result};
    pub use crate::features::{CategoryMapping, FeatureAssembler, FestivalCalendar};
    pub use crate::models::{FnModel, ForecastEngine, InferenceContext, SequenceModel};
    pub use crate::service::{ForecastRequest, SalesForecaster, SalesPrediction};
    pub use crate::transform::{IdentityScaler, Scaler, ScalerArtifact};
}
