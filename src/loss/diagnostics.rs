//! Per-category diagnostics over a gap tensor.

use std::collections::BTreeMap;

use ndarray::{Array2, Array3, Axis};
use serde::Serialize;

use crate::moments::{DescriptorFilter, MomentCategory, MomentCollection};

/// Target coefficients whose batch-mean absolute value falls below this
/// threshold are excluded from relative-error diagnostics. Fixed policy
/// constant, in absolute target units.
pub const NEGLIGIBLE_TARGET_MEAN: f32 = 0.01;

/// Worst-case and relative gap per moment category.
///
/// Returned by value alongside every loss scalar; the caller decides whether
/// to retain or log it. Has no effect on the loss itself.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct GapDiagnostics {
    /// Maximum absolute gap per category.
    pub max_gap: BTreeMap<MomentCategory, f32>,
    /// Mean absolute gap over mean absolute target magnitude (a single
    /// ratio of means, not an averaged per-element ratio).
    pub mean_gap_pct: BTreeMap<MomentCategory, f32>,
    /// Maximum per-element |gap / target| ratio.
    pub max_gap_pct: BTreeMap<MomentCategory, f32>,
}

impl GapDiagnostics {
    /// Full diagnostics for a (batch, coefficient) gap against component 0
    /// of the target.
    pub(crate) fn from_gap(gap: &Array2<f32>, target: &MomentCollection) -> Self {
        let mut diagnostics = Self::default();
        let surviving = surviving_coefficients(target);
        let primary = target.primary();

        for c_type in target.descriptor.categories() {
            let mask = target.mask(&[DescriptorFilter::CType(c_type)]);
            let indices: Vec<usize> = mask
                .iter()
                .enumerate()
                .filter_map(|(j, keep)| (*keep && surviving[j]).then_some(j))
                .collect();

            if indices.is_empty() {
                diagnostics.max_gap.insert(c_type, 0.0);
                diagnostics.mean_gap_pct.insert(c_type, 0.0);
                diagnostics.max_gap_pct.insert(c_type, 0.0);
                continue;
            }

            let mut max_gap = 0.0f32;
            let mut gap_abs_sum = 0.0f32;
            let mut target_abs_sum = 0.0f32;
            let mut max_ratio = 0.0f32;
            for &j in &indices {
                for b in 0..gap.nrows() {
                    let g = gap[[b, j]];
                    let t = primary[[b, j]];
                    max_gap = max_gap.max(g.abs());
                    gap_abs_sum += g.abs();
                    target_abs_sum += t.abs();
                    max_ratio = max_ratio.max((g / t).abs());
                }
            }

            diagnostics.max_gap.insert(c_type, max_gap);
            // ratio of means over the same selection, so the counts cancel
            diagnostics
                .mean_gap_pct
                .insert(c_type, gap_abs_sum / target_abs_sum);
            diagnostics.max_gap_pct.insert(c_type, max_ratio);
        }

        diagnostics
    }

    /// Max-absolute-gap diagnostics only, over a full-shape gap tensor.
    /// The covariance loss does not track relative errors.
    pub(crate) fn max_gap_only(gap: &Array3<f32>, target: &MomentCollection) -> Self {
        let mut diagnostics = Self::default();

        for c_type in target.descriptor.categories() {
            let mask = target.mask(&[DescriptorFilter::CType(c_type)]);
            let max_gap = gap
                .axis_iter(Axis(1))
                .zip(mask.iter())
                .filter(|(_, keep)| **keep)
                .flat_map(|(lane, _)| lane.into_iter().map(|v| v.abs()))
                .fold(0.0f32, f32::max);
            diagnostics.max_gap.insert(c_type, max_gap);
        }

        diagnostics
    }
}

/// Coefficients that survive the negligibility mask.
fn surviving_coefficients(target: &MomentCollection) -> Vec<bool> {
    target
        .batch_mean_abs()
        .iter()
        .map(|mean| *mean >= NEGLIGIBLE_TARGET_MEAN)
        .collect()
}
