//! Error types for moment loss computation.

use std::fmt;

/// Result type alias for loss operations.
pub type LossResult<T> = Result<T, LossError>;

/// Errors surfaced by the loss functions.
///
/// An empty category selection after negligibility masking is a defined
/// degenerate case (zero diagnostics), not an error. Division by a surviving
/// near-zero target element is accepted behavior and may yield infinite
/// relative diagnostics; the negligibility mask is the sole mitigation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LossError {
    /// Input and target tensors (or a weight vector) disagree in shape.
    ShapeMismatch {
        expected: Vec<usize>,
        got: Vec<usize>,
        context: String,
    },

    /// The covariance loss requires a model estimate; there is no
    /// zero-estimate fallback in that variant.
    MissingInput { context: String },
}

impl fmt::Display for LossError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LossError::ShapeMismatch {
                expected,
                got,
                context,
            } => {
                write!(
                    f,
                    "Shape mismatch in {}: expected {:?}, got {:?}",
                    context, expected, got
                )
            }
            LossError::MissingInput { context } => {
                write!(f, "Missing input: {} requires a model estimate", context)
            }
        }
    }
}

impl std::error::Error for LossError {}
