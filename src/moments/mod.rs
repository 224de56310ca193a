//! Described moment collections and their categorical descriptors.
//!
//! A [`MomentCollection`] pairs a numeric moment tensor with an ordered
//! descriptor table so that losses and diagnostics can mask coefficients by
//! moment family or order without ever reordering the tensor itself.

pub mod collection;
pub mod descriptor;

pub use collection::{MomentCollection, MomentStatistics};
pub use descriptor::{CoeffDescriptor, DescriptorFilter, MomentCategory, MomentDescriptor};
