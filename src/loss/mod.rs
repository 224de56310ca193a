//! Discrepancy losses on scattering moments.
//!
//! Two reductions are provided:
//! - [`scattering_mse_loss`] - l2 norm on the component-0 gap, with optional
//!   per-sample and per-coefficient weighting
//! - [`covariance_loss`] - order-dependent gap over the full tensor
//!
//! Both return a [`LossOutput`] carrying the scalar together with
//! per-category [`GapDiagnostics`].

pub mod cov;
pub mod diagnostics;
pub mod error;
pub mod gap;
pub mod mse;

use serde::Serialize;

pub use cov::covariance_loss;
pub use diagnostics::{GapDiagnostics, NEGLIGIBLE_TARGET_MEAN};
pub use error::{LossError, LossResult};
pub use gap::compute_gap;
pub use mse::scattering_mse_loss;

/// Scalar loss plus the diagnostics computed alongside it.
#[derive(Clone, Debug, Serialize)]
pub struct LossOutput {
    /// Non-negative scalar fed to the optimizer.
    pub loss: f32,
    /// Per-category gap diagnostics, for reporting only.
    pub diagnostics: GapDiagnostics,
}
