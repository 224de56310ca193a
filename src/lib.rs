//! # Scattering Loss
//!
//! Discrepancy-based training losses between a model-produced set of
//! scattering-transform moments and a target set of such moments, used to
//! fit a generative model's statistics to empirical data.
//!
//! A [`MomentCollection`] pairs a `(batch, coefficient, component)` tensor
//! with an ordered categorical descriptor. The losses extract an
//! element-wise gap, reduce it to a scalar, and return per-category
//! worst-case and relative-error diagnostics alongside.
//!
//! ## Quick Start
//!
//! ```
//! use ndarray::Array3;
//! use scattering_loss::{
//!     scattering_mse_loss, CoeffDescriptor, MomentCategory, MomentCollection, MomentDescriptor,
//! };
//!
//! let descriptor = MomentDescriptor::new(vec![
//!     CoeffDescriptor { c_type: MomentCategory::Mean, q: 1 },
//!     CoeffDescriptor { c_type: MomentCategory::Envelope, q: 2 },
//! ]);
//! let target = MomentCollection::from_arrays(Array3::from_elem((4, 2, 1), 0.5), descriptor);
//!
//! // No model estimate yet: the zero-estimate baseline is used.
//! let output = scattering_mse_loss(None, &target, None, None).unwrap();
//! assert!((output.loss - 0.25).abs() < 1e-6);
//! println!("max gap: {:?}", output.diagnostics.max_gap);
//! ```
//!
//! ## Core Modules
//!
//! - [`moments`] - Described moment collections and typed descriptors
//! - [`loss`] - Gap extraction, diagnostics and the two scalar reducers
//! - [`config`] - Loss settings via TOML
//! - [`logging`] - JSON line-delimited logging of loss steps

pub mod config;
pub mod logging;
pub mod loss;
pub mod moments;

pub use config::{ConfigError, LossConfig, LossVariant};
pub use logging::{log_loss_step, log_moment_statistics, LossLogEntry, MomentLogEntry};
pub use loss::{
    compute_gap, covariance_loss, scattering_mse_loss, GapDiagnostics, LossError, LossOutput,
    LossResult, NEGLIGIBLE_TARGET_MEAN,
};
pub use moments::{
    CoeffDescriptor, DescriptorFilter, MomentCategory, MomentCollection, MomentDescriptor,
    MomentStatistics,
};
