//! Error types for the demandcast library.

use std::fmt;
use thiserror::Error;

/// Result type alias for forecast operations.
pub type Result<T> = std::result::Result<T, ForecastError>;

/// Which closed-world table an identifier was looked up in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CategoryKind {
    Branch,
    Material,
}

impl fmt::Display for CategoryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CategoryKind::Branch => f.write_str("branch"),
            CategoryKind::Material => f.write_str("material"),
        }
    }
}

/// Errors that can occur while deriving features or forecasting.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ForecastError {
    /// Malformed date or numeric input.
    #[error("validation error: {0}")]
    Validation(String),

    /// Identifier outside the configured category table.
    #[error("unknown {kind} code: {identifier}")]
    UnknownCategory {
        kind: CategoryKind,
        identifier: String,
    },

    /// Wrong number of input time steps.
    #[error("window size mismatch: expected {expected} time steps, got {got}")]
    WindowSize { expected: usize, got: usize },

    /// Tensor shape does not match what the model or scaler expects.
    #[error("shape mismatch: expected {expected:?}, got {got:?}")]
    ShapeMismatch {
        expected: (usize, usize),
        got: (usize, usize),
    },

    /// Model or scaler has not been loaded.
    #[error("artifact unavailable: {0}")]
    ArtifactUnavailable(String),

    /// Configuration or artifact file could not be read or is invalid.
    #[error("configuration error: {0}")]
    Config(String),
}

impl ForecastError {
    /// Stable machine-readable name of the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            ForecastError::Validation(_) => "validation",
            ForecastError::UnknownCategory { .. } => "unknown_category",
            ForecastError::WindowSize { .. } => "window_size",
            ForecastError::ShapeMismatch { .. } => "shape_mismatch",
            ForecastError::ArtifactUnavailable(_) => "artifact_unavailable",
            ForecastError::Config(_) => "config",
        }
    }

    /// HTTP status a transport layer would typically map this error to.
    pub fn status_code(&self) -> u16 {
        match self {
            ForecastError::Validation(_)
            | ForecastError::UnknownCategory { .. }
            | ForecastError::WindowSize { .. } => 400,
            ForecastError::ArtifactUnavailable(_) => 503,
            ForecastError::ShapeMismatch { .. } | ForecastError::Config(_) => 500,
        }
    }

    /// True for errors caused by the caller's input rather than the deployment.
    pub fn is_input_error(&self) -> bool {
        self.status_code() == 400
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages_are_descriptive() {
        let err = ForecastError::Validation("invalid date: 2024-13-01".to_string());
        assert_eq!(err.to_string(), "validation error: invalid date: 2024-13-01");

        let err = ForecastError::UnknownCategory {
            kind: CategoryKind::Branch,
            identifier: "ZZ99".to_string(),
        };
        assert_eq!(err.to_string(), "unknown branch code: ZZ99");

        let err = ForecastError::WindowSize {
            expected: 60,
            got: 59,
        };
        assert_eq!(
            err.to_string(),
            "window size mismatch: expected 60 time steps, got 59"
        );

        let err = ForecastError::ShapeMismatch {
            expected: (60, 11),
            got: (60, 10),
        };
        assert_eq!(err.to_string(), "shape mismatch: expected (60, 11), got (60, 10)");

        let err = ForecastError::ArtifactUnavailable("model".to_string());
        assert_eq!(err.to_string(), "artifact unavailable: model");
    }

    #[test]
    fn status_codes_follow_error_class() {
        assert_eq!(ForecastError::Validation(String::new()).status_code(), 400);
        assert_eq!(
            ForecastError::WindowSize {
                expected: 3,
                got: 2
            }
            .status_code(),
            400
        );
        assert_eq!(
            ForecastError::ArtifactUnavailable("target scaler".into()).status_code(),
            503
        );
        assert_eq!(ForecastError::Config("bad".into()).status_code(), 500);
        assert!(ForecastError::UnknownCategory {
            kind: CategoryKind::Material,
            identifier: "X".into()
        }
        .is_input_error());
    }

    #[test]
    fn errors_are_clonable_and_comparable() {
        let err1 = ForecastError::WindowSize {
            expected: 3,
            got: 4,
        };
        let err2 = err1.clone();
        assert_eq!(err1, err2);
        assert_eq!(err1.kind(), "window_size");
    }
}
