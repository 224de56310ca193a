//! Mean-squared reduction of the moment gap.

use ndarray::{Array1, Axis};
use rayon::prelude::*;

use super::error::{LossError, LossResult};
use super::gap::compute_gap;
use super::LossOutput;
use crate::moments::MomentCollection;

/// L2 loss on scattering moments.
///
/// Without `coeff_weights` this is the uniform mean of squared gaps over
/// every batch and coefficient entry. With `coeff_weights` it is the
/// weighted *sum* of squared gaps; any normalization is the caller's
/// responsibility, baked into the weights.
///
/// # Errors
///
/// Returns [`LossError::ShapeMismatch`] on input/target or weight-length
/// disagreement.
pub fn scattering_mse_loss(
    input: Option<&MomentCollection>,
    target: &MomentCollection,
    sample_weights: Option<&Array1<f32>>,
    coeff_weights: Option<&Array1<f32>>,
) -> LossResult<LossOutput> {
    let (gap, diagnostics) = compute_gap(input, target, sample_weights)?;

    let loss = match coeff_weights {
        None => {
            let slice = gap.as_slice().expect("ndarray uses contiguous layout");
            slice.par_iter().map(|g| g * g).sum::<f32>() / slice.len() as f32
        }
        Some(weights) => {
            if weights.len() != gap.ncols() {
                return Err(LossError::ShapeMismatch {
                    expected: vec![gap.ncols()],
                    got: vec![weights.len()],
                    context: "coefficient weights".into(),
                });
            }
            gap.axis_iter(Axis(0))
                .map(|row| {
                    row.iter()
                        .zip(weights.iter())
                        .map(|(g, w)| w * g * g)
                        .sum::<f32>()
                })
                .sum()
        }
    };

    Ok(LossOutput { loss, diagnostics })
}
