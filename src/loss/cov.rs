//! Order-dependent covariance loss.
//!
//! First-order moments (`q == 1`) are compared after scaling the difference
//! by the target's own magnitude; second-order moments (`q == 2`) are
//! compared by plain difference. Coefficients with any other order
//! contribute nothing. Unlike the base loss, this variant has no
//! zero-estimate fallback: a model estimate is required.

use ndarray::{Array3, Axis, Zip};
use rayon::prelude::*;

use super::diagnostics::GapDiagnostics;
use super::error::{LossError, LossResult};
use super::gap::ensure_same_shape;
use super::LossOutput;
use crate::moments::MomentCollection;

/// Mean-squared covariance loss over the full (batch, coefficient,
/// component) gap tensor.
///
/// Diagnostics carry the maximum absolute gap per category only; the
/// relative-error maps stay empty in this variant.
///
/// # Errors
///
/// Returns [`LossError::MissingInput`] when `input` is absent and
/// [`LossError::ShapeMismatch`] when the tensors disagree in shape.
pub fn covariance_loss(
    input: Option<&MomentCollection>,
    target: &MomentCollection,
) -> LossResult<LossOutput> {
    let input = input.ok_or_else(|| LossError::MissingInput {
        context: "covariance loss".into(),
    })?;
    ensure_same_shape(input, target, "covariance loss")?;

    let mut gap = Array3::<f32>::zeros(target.values.dim());
    for (j, record) in target.descriptor.iter().enumerate() {
        let input_lane = input.values.index_axis(Axis(1), j);
        let target_lane = target.values.index_axis(Axis(1), j);
        let mut gap_lane = gap.index_axis_mut(Axis(1), j);
        match record.q {
            1 => Zip::from(&mut gap_lane)
                .and(&input_lane)
                .and(&target_lane)
                .for_each(|g, &i, &t| *g = t * (i - t)),
            2 => Zip::from(&mut gap_lane)
                .and(&input_lane)
                .and(&target_lane)
                .for_each(|g, &i, &t| *g = i - t),
            _ => {}
        }
    }

    let diagnostics = GapDiagnostics::max_gap_only(&gap, target);

    let slice = gap.as_slice().expect("ndarray uses contiguous layout");
    let loss = slice.par_iter().map(|g| g * g).sum::<f32>() / slice.len() as f32;

    Ok(LossOutput { loss, diagnostics })
}
