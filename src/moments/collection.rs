use ndarray::{Array1, Array3, ArrayView2, Axis};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::descriptor::{DescriptorFilter, MomentDescriptor};

/// A described collection of scattering moments.
///
/// `values` has shape `(batch, coefficient, component)`. Component 0 holds
/// the moment value compared in losses; further components may carry
/// auxiliary statistics (variance estimates and the like) and are ignored
/// here. The descriptor table runs parallel to the coefficient axis and is
/// immutable after construction.
///
/// # Examples
///
/// ```
/// use ndarray::Array3;
/// use scattering_loss::{CoeffDescriptor, MomentCategory, MomentCollection, MomentDescriptor};
///
/// let descriptor = MomentDescriptor::new(vec![
///     CoeffDescriptor { c_type: MomentCategory::Mean, q: 1 },
///     CoeffDescriptor { c_type: MomentCategory::Spectrum, q: 2 },
/// ]);
/// let values = Array3::from_elem((4, 2, 1), 0.5);
/// let collection = MomentCollection::from_arrays(values, descriptor);
/// assert_eq!(collection.shape(), (4, 2, 1));
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MomentCollection {
    /// Moment values as a 3D array: [batch, coefficient, component]
    pub values: Array3<f32>,
    /// Categorical descriptor parallel to the coefficient axis
    pub descriptor: MomentDescriptor,
}

impl MomentCollection {
    /// Creates a collection from an existing value tensor and descriptor.
    ///
    /// # Panics
    ///
    /// Panics if the descriptor length does not match the coefficient axis.
    pub fn from_arrays(values: Array3<f32>, descriptor: MomentDescriptor) -> Self {
        assert_eq!(
            values.dim().1,
            descriptor.len(),
            "descriptor length must match the coefficient axis"
        );
        Self { values, descriptor }
    }

    /// Creates a deterministic pseudo-random collection from a seed value.
    ///
    /// Uses a linear congruential generator so the same seed always produces
    /// the same collection. Values land in [0.1, 1.0], keeping every
    /// coefficient above the negligibility threshold used by diagnostics.
    ///
    /// # Examples
    ///
    /// ```
    /// use scattering_loss::{CoeffDescriptor, MomentCategory, MomentCollection, MomentDescriptor};
    ///
    /// let descriptor = MomentDescriptor::new(vec![
    ///     CoeffDescriptor { c_type: MomentCategory::Envelope, q: 2 },
    /// ]);
    /// let a = MomentCollection::from_seed(42, 8, 1, descriptor.clone());
    /// let b = MomentCollection::from_seed(42, 8, 1, descriptor);
    /// assert_eq!(a.values, b.values);
    /// ```
    pub fn from_seed(
        seed: u64,
        n_batch: usize,
        n_components: usize,
        descriptor: MomentDescriptor,
    ) -> Self {
        let state = if seed == 0 { 1 } else { seed };
        let mut values = Array3::zeros((n_batch, descriptor.len(), n_components));

        values
            .as_slice_mut()
            .expect("ndarray uses contiguous layout")
            .par_iter_mut()
            .enumerate()
            .for_each(|(idx, value)| {
                let next = lcg(idx as u64 + state);
                *value = normalized(next).mul_add(0.9, 0.1);
            });

        Self { values, descriptor }
    }

    pub fn shape(&self) -> (usize, usize, usize) {
        self.values.dim()
    }

    pub fn n_batch(&self) -> usize {
        self.values.dim().0
    }

    pub fn n_coeff(&self) -> usize {
        self.values.dim().1
    }

    pub fn n_components(&self) -> usize {
        self.values.dim().2
    }

    /// View of component 0, the moment value compared in losses.
    pub fn primary(&self) -> ArrayView2<'_, f32> {
        self.values.index_axis(Axis(2), 0)
    }

    /// Boolean mask over coefficients satisfying every filter (logical AND).
    pub fn mask(&self, filters: &[DescriptorFilter]) -> Vec<bool> {
        self.descriptor.mask(filters)
    }

    /// Subset of `values` along the coefficient axis.
    ///
    /// # Panics
    ///
    /// Panics if the mask length does not match the coefficient axis.
    pub fn select(&self, mask: &[bool]) -> Array3<f32> {
        assert_eq!(
            mask.len(),
            self.n_coeff(),
            "mask length must match the coefficient axis"
        );
        let indices: Vec<usize> = mask
            .iter()
            .enumerate()
            .filter_map(|(j, keep)| keep.then_some(j))
            .collect();
        self.values.select(Axis(1), &indices)
    }

    /// Per-coefficient batch mean of |component 0|.
    ///
    /// The negligibility mask used by loss diagnostics is defined on top of
    /// this quantity.
    pub fn batch_mean_abs(&self) -> Array1<f32> {
        let primary = self.primary();
        let n_batch = self.n_batch() as f32;
        Array1::from_iter(
            primary
                .axis_iter(Axis(1))
                .map(|column| column.iter().map(|v| v.abs()).sum::<f32>() / n_batch),
        )
    }

    /// Summary statistics over component 0, for log entries.
    pub fn statistics(&self) -> MomentStatistics {
        let primary = self.primary();
        let count = primary.len() as f32;

        let (sum, abs_sum) = if let Some(slice) = primary.as_slice() {
            slice
                .par_iter()
                .map(|v| (*v, v.abs()))
                .reduce(|| (0.0f32, 0.0f32), |a, b| (a.0 + b.0, a.1 + b.1))
        } else {
            primary
                .iter()
                .fold((0.0, 0.0), |acc, v| (acc.0 + v, acc.1 + v.abs()))
        };
        let mean = sum / count;
        let mean_abs = abs_sum / count;

        let variance_sum = if let Some(slice) = primary.as_slice() {
            slice
                .par_iter()
                .map(|value| {
                    let diff = *value - mean;
                    diff * diff
                })
                .sum::<f32>()
        } else {
            primary
                .iter()
                .map(|value| {
                    let diff = *value - mean;
                    diff * diff
                })
                .sum::<f32>()
        };

        MomentStatistics {
            mean,
            mean_abs,
            variance: variance_sum / count,
            n_batch: self.n_batch(),
            n_coeff: self.n_coeff(),
        }
    }
}

/// Summary statistics of a moment collection's primary component.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct MomentStatistics {
    pub mean: f32,
    pub mean_abs: f32,
    pub variance: f32,
    pub n_batch: usize,
    pub n_coeff: usize,
}

fn lcg(seed: u64) -> u64 {
    seed.wrapping_mul(1664525).wrapping_add(1013904223)
}

fn normalized(value: u64) -> f32 {
    let fraction = (value & 0xFFFF_FFFF) as f32 / (u32::MAX as f32);
    fraction.clamp(0.0, 1.0)
}
