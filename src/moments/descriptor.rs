//! Typed descriptor table for scattering moments.
//!
//! Each coefficient of a moment tensor carries a [`CoeffDescriptor`] naming
//! its moment family (`c_type`) and order (`q`). Queries are expressed as a
//! fixed set of attribute-equality constraints ([`DescriptorFilter`]) combined
//! with logical AND, rather than dynamic field lookup by string.

use std::collections::BTreeSet;
use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};

/// Family of a scattering moment, used to group coefficients for aggregate
/// diagnostics.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MomentCategory {
    /// First-order mean coefficients.
    Mean,
    /// Power-spectrum style second moments.
    Spectrum,
    /// Sparsity factors of wavelet envelopes.
    Sparsity,
    /// Phase-envelope cross correlations.
    PhaseEnvelope,
    /// Envelope-envelope correlations.
    Envelope,
}

impl Display for MomentCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MomentCategory::Mean => "mean",
            MomentCategory::Spectrum => "spectrum",
            MomentCategory::Sparsity => "sparsity",
            MomentCategory::PhaseEnvelope => "phase_envelope",
            MomentCategory::Envelope => "envelope",
        };
        write!(f, "{}", name)
    }
}

/// Descriptor record attached to a single coefficient.
///
/// `q` is the moment order: 1 for first-order (exponential-type) moments,
/// 2 for second-order (covariance-type) moments. Other values are legal and
/// simply fall outside the order-dependent loss paths.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CoeffDescriptor {
    pub c_type: MomentCategory,
    pub q: u8,
}

/// A single attribute-equality constraint on descriptor records.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DescriptorFilter {
    CType(MomentCategory),
    Q(u8),
}

impl DescriptorFilter {
    fn matches(&self, record: &CoeffDescriptor) -> bool {
        match self {
            DescriptorFilter::CType(c_type) => record.c_type == *c_type,
            DescriptorFilter::Q(q) => record.q == *q,
        }
    }
}

/// Ordered descriptor table parallel to the coefficient axis of a moment
/// tensor. Never mutated after construction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MomentDescriptor {
    records: Vec<CoeffDescriptor>,
}

impl MomentDescriptor {
    pub fn new(records: Vec<CoeffDescriptor>) -> Self {
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&CoeffDescriptor> {
        self.records.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CoeffDescriptor> {
        self.records.iter()
    }

    /// Returns the distinct categories present, in their natural order.
    pub fn categories(&self) -> BTreeSet<MomentCategory> {
        self.records.iter().map(|record| record.c_type).collect()
    }

    /// Returns a boolean mask over coefficients satisfying every filter.
    ///
    /// An empty filter list selects every coefficient.
    pub fn mask(&self, filters: &[DescriptorFilter]) -> Vec<bool> {
        self.records
            .iter()
            .map(|record| filters.iter().all(|filter| filter.matches(record)))
            .collect()
    }
}

impl FromIterator<CoeffDescriptor> for MomentDescriptor {
    fn from_iter<T: IntoIterator<Item = CoeffDescriptor>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
