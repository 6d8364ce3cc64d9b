//! Data transformations around the model: scaling and window decomposition.
//!
//! # Example
//!
//! ```
//! use demandcast::transform::{make_windows, MinMaxScaler, Scaler};
//!
//! let rows = vec![vec![0.0], vec![5.0], vec![10.0]];
//! let scaler = MinMaxScaler::fit(&rows, (0.0, 1.0)).unwrap();
//! let scaled = scaler.transform(&rows).unwrap();
//! assert_eq!(scaled[1][0], 0.5);
//!
//! let windows = make_windows(&[1, 2, 3, 4, 5], 3);
//! assert_eq!(windows, vec![vec![1, 2, 3], vec![2, 3, 4]]);
//! ```

pub mod scale;
pub mod window;

pub use scale::{IdentityScaler, MinMaxScaler, Scaler, ScalerArtifact, StandardScaler};
pub use window::{
    feature_windows, make_windows, sliding_windows, univariate_windows, SlidingWindows,
};
