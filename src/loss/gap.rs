//! Gap extraction between model and target moment collections.

use ndarray::{Array1, Array2, Axis};

use super::diagnostics::GapDiagnostics;
use super::error::{LossError, LossResult};
use crate::moments::MomentCollection;

/// Computes the raw discrepancy tensor between a model estimate and a
/// target, shape (batch, coefficient), together with per-category
/// diagnostics.
///
/// An absent `input` signals a zero-estimate baseline: the gap is then the
/// negated target. When `sample_weights` are supplied they scale every
/// coefficient of the matching sample before diagnostics are computed.
///
/// # Errors
///
/// Returns [`LossError::ShapeMismatch`] when `input` and `target` tensors
/// disagree in shape, or when the weight vector length does not match the
/// batch axis.
pub fn compute_gap(
    input: Option<&MomentCollection>,
    target: &MomentCollection,
    sample_weights: Option<&Array1<f32>>,
) -> LossResult<(Array2<f32>, GapDiagnostics)> {
    let target_primary = target.primary();
    let mut gap = match input {
        Some(input) => {
            ensure_same_shape(input, target, "gap extraction")?;
            let input_primary = input.primary();
            &input_primary - &target_primary
        }
        None => target_primary.mapv(|v| -v),
    };

    if let Some(weights) = sample_weights {
        if weights.len() != gap.nrows() {
            return Err(LossError::ShapeMismatch {
                expected: vec![gap.nrows()],
                got: vec![weights.len()],
                context: "sample weights".into(),
            });
        }
        for (mut row, &weight) in gap.axis_iter_mut(Axis(0)).zip(weights.iter()) {
            row *= weight;
        }
    }

    let diagnostics = GapDiagnostics::from_gap(&gap, target);
    Ok((gap, diagnostics))
}

pub(crate) fn ensure_same_shape(
    input: &MomentCollection,
    target: &MomentCollection,
    context: &str,
) -> LossResult<()> {
    if input.shape() != target.shape() {
        let (b, k, c) = target.shape();
        let (gb, gk, gc) = input.shape();
        return Err(LossError::ShapeMismatch {
            expected: vec![b, k, c],
            got: vec![gb, gk, gc],
            context: context.into(),
        });
    }
    Ok(())
}
