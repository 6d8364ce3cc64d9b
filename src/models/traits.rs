//! SequenceModel trait defining the interface to a pre-trained network.

use std::fmt;

use crate::core::SequenceTensor;
use crate::error::Result;

/// A trained sequence-to-one regression model.
///
/// Takes a `(1, window_size, feature_count)` tensor of scaled features and
/// returns a `(1, k)` matrix of scaled outputs; the engine reads element
/// `(0, 0)`. Inference is treated as a deterministic pure function.
///
/// This trait is object-safe and can be used with `Box<dyn SequenceModel>`.
pub trait SequenceModel {
    /// Expected `(window_size, feature_count)` of the input.
    fn input_shape(&self) -> (usize, usize);

    /// Run inference on a single-batch tensor.
    fn predict(&self, input: &SequenceTensor) -> Result<Vec<Vec<f64>>>;

    /// Get the model name.
    fn name(&self) -> &str;

    /// Number of trainable parameters, if the backend reports it.
    fn parameter_count(&self) -> Option<usize> {
        None
    }

    /// Number of layers, if the backend reports it.
    fn layer_count(&self) -> Option<usize> {
        None
    }
}

/// Type alias for boxed model trait objects.
pub type BoxedModel = Box<dyn SequenceModel + Send + Sync>;

/// Adapter turning a closure into a [`SequenceModel`].
///
/// Any inference backend can be plugged in this way; it is also the
/// simplest way to stub a model in tests.
///
/// # Example
///
/// ```
/// use demandcast::core::SequenceTensor;
/// use demandcast::models::{FnModel, SequenceModel};
///
/// let model = FnModel::new("last", (3, 1), |t: &SequenceTensor| {
///     Ok(vec![vec![*t.as_slice().last().unwrap()]])
/// });
/// let input = SequenceTensor::from_rows(&[vec![1.0], vec![2.0], vec![3.0]]).unwrap();
/// assert_eq!(model.predict(&input).unwrap(), vec![vec![3.0]]);
/// ```
pub struct FnModel<F> {
    name: String,
    input_shape: (usize, usize),
    parameter_count: Option<usize>,
    layer_count: Option<usize>,
    func: F,
}

impl<F> FnModel<F>
where
    F: Fn(&SequenceTensor) -> Result<Vec<Vec<f64>>>,
{
    pub fn new(name: impl Into<String>, input_shape: (usize, usize), func: F) -> Self {
        Self {
            name: name.into(),
            input_shape,
            parameter_count: None,
            layer_count: None,
            func,
        }
    }

    /// Report a parameter count in model metadata.
    pub fn with_parameter_count(mut self, count: usize) -> Self {
        self.parameter_count = Some(count);
        self
    }

    /// Report a layer count in model metadata.
    pub fn with_layer_count(mut self, count: usize) -> Self {
        self.layer_count = Some(count);
        self
    }
}

impl<F> SequenceModel for FnModel<F>
where
    F: Fn(&SequenceTensor) -> Result<Vec<Vec<f64>>>,
{
    fn input_shape(&self) -> (usize, usize) {
        self.input_shape
    }

    fn predict(&self, input: &SequenceTensor) -> Result<Vec<Vec<f64>>> {
        (self.func)(input)
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn parameter_count(&self) -> Option<usize> {
        self.parameter_count
    }

    fn layer_count(&self) -> Option<usize> {
        self.layer_count
    }
}

impl<F> fmt::Debug for FnModel<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnModel")
            .field("name", &self.name)
            .field("input_shape", &self.input_shape)
            .finish()
    }
}
