//! The sequence model interface, the inference context and the forecast engine.
//!
//! # Example
//!
//! ```
//! use demandcast::core::{SequenceTensor, Window};
//! use demandcast::models::{FnModel, ForecastEngine, InferenceContext};
//! use demandcast::transform::IdentityScaler;
//!
//! let model = FnModel::new("mean", (3, 1), |t: &SequenceTensor| {
//!     let v = t.as_slice();
//!     Ok(vec![vec![v.iter().sum::<f64>() / v.len() as f64]])
//! });
//! let context = InferenceContext::builder()
//!     .model(model)
//!     .feature_scaler(IdentityScaler)
//!     .target_scaler(IdentityScaler)
//!     .build()
//!     .unwrap();
//!
//! let window = Window::from_series(&[10.0, 20.0, 30.0], 3).unwrap();
//! let engine = ForecastEngine::new(&context);
//! assert_eq!(engine.forecast_one(&window).unwrap(), 20.0);
//! ```

pub mod context;
pub mod engine;
pub mod traits;

pub use context::{
    ArtifactStatus, InferenceContext, InferenceContextBuilder, SharedModel, SharedScaler,
};
pub use engine::ForecastEngine;
pub use traits::{BoxedModel, FnModel, SequenceModel};
