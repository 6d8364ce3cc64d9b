//! Core data structures: feature vectors, windows and forecast results.

mod feature_vector;
mod forecast;
mod window;

pub use feature_vector::{FeatureVector, RawStep, FEATURE_NAMES};
pub use forecast::ForecastResult;
pub use window::{SequenceTensor, Window};
