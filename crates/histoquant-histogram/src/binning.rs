//! Binning rules mapping values onto bucket indices
//!
//! Each kind of value gets its own [`Binning`] implementation:
//!
//! - [`IndexBinning`]: values already are bucket indices
//! - [`UniformBinning`]: continuous values over a half-open domain `[min, max)`
//! - [`DiscreteBinning`]: one bucket per integer in `[min, min + bins)`
//! - [`BoolBinning`]: two buckets, `false` then `true`
//!
//! Values outside a binning's domain are rejected with `None`; the caller
//! decides what a rejection means.

use histoquant_core::{Error, Result};
use num_traits::{Float, NumCast, PrimInt};
use serde::{Deserialize, Serialize};

/// A rule assigning values to one of a fixed number of buckets
pub trait Binning {
    /// The kind of value being binned
    type Value: Copy + PartialEq;

    /// Total number of buckets; always at least one
    fn bins(&self) -> usize;

    /// Bucket for `value`, or `None` if the value falls outside the domain
    fn index_for(&self, value: Self::Value) -> Option<usize>;

    /// Check if `value` can be binned
    fn accepts(&self, value: Self::Value) -> bool {
        self.index_for(value).is_some()
    }
}

/// Binnings whose buckets cover a known span of values
pub trait BucketBounds: Binning {
    /// Smallest value mapped to bucket `index`
    fn bucket_min(&self, index: usize) -> Self::Value;

    /// Upper edge of bucket `index`
    ///
    /// Exclusive for continuous binnings, inclusive for discrete ones.
    fn bucket_max(&self, index: usize) -> Self::Value;
}

/// Identity binning over bucket indices `0..bins`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexBinning {
    bins: usize,
}

impl IndexBinning {
    pub fn new(bins: usize) -> Result<Self> {
        if bins == 0 {
            return Err(Error::zero_bins("index binning"));
        }
        Ok(Self { bins })
    }
}

impl Binning for IndexBinning {
    type Value = usize;

    fn bins(&self) -> usize {
        self.bins
    }

    #[inline]
    fn index_for(&self, value: usize) -> Option<usize> {
        (value < self.bins).then_some(value)
    }
}

impl BucketBounds for IndexBinning {
    fn bucket_min(&self, index: usize) -> usize {
        index
    }

    fn bucket_max(&self, index: usize) -> usize {
        index
    }
}

/// Parameters for [`UniformBinning`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UniformParams<F = f64> {
    pub min: F,
    pub max: F,
    pub bins: usize,
}

/// Equal-width buckets over the half-open domain `[min, max)`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UniformBinning<F: Float = f64> {
    min: F,
    max: F,
    step: F,
    bins: usize,
}

impl<F: Float> UniformBinning<F> {
    /// Create a binning with `bins` equal-width buckets
    pub fn new(min: F, max: F, bins: usize) -> Result<Self> {
        if bins == 0 {
            return Err(Error::zero_bins("uniform binning"));
        }
        if !min.is_finite() || !max.is_finite() {
            return Err(Error::InvalidParameter(
                "uniform binning domain must be finite".to_string(),
            ));
        }
        if min >= max {
            return Err(Error::InvalidParameter(
                "uniform binning requires min < max".to_string(),
            ));
        }
        let count = <F as NumCast>::from(bins).ok_or_else(|| {
            Error::InvalidParameter(format!("{bins} bins not representable"))
        })?;
        Ok(Self {
            min,
            max,
            step: (max - min) / count,
            bins,
        })
    }

    /// Create a binning from serialized parameters
    pub fn from_params(params: UniformParams<F>) -> Result<Self> {
        Self::new(params.min, params.max, params.bins)
    }

    pub fn params(&self) -> UniformParams<F> {
        UniformParams {
            min: self.min,
            max: self.max,
            bins: self.bins,
        }
    }

    pub fn min(&self) -> F {
        self.min
    }

    pub fn max(&self) -> F {
        self.max
    }

    /// Width of each bucket
    pub fn step(&self) -> F {
        self.step
    }

    /// Center of bucket `index`
    pub fn bucket_mid(&self, index: usize) -> F {
        let half = <F as NumCast>::from(0.5).unwrap_or_else(F::zero);
        self.bucket_min(index) + self.step * half
    }
}

impl<F: Float> Binning for UniformBinning<F> {
    type Value = F;

    fn bins(&self) -> usize {
        self.bins
    }

    fn index_for(&self, value: F) -> Option<usize> {
        // NaN fails both comparisons
        if !(value >= self.min && value < self.max) {
            return None;
        }
        let index = ((value - self.min) / self.step).to_usize()?;
        // Rounding can push values just below max onto the edge
        Some(index.min(self.bins - 1))
    }
}

impl<F: Float> BucketBounds for UniformBinning<F> {
    fn bucket_min(&self, index: usize) -> F {
        match <F as NumCast>::from(index) {
            Some(i) => self.min + self.step * i,
            None => self.max,
        }
    }

    fn bucket_max(&self, index: usize) -> F {
        if index + 1 >= self.bins {
            self.max
        } else {
            self.bucket_min(index) + self.step
        }
    }
}

/// Parameters for [`DiscreteBinning`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscreteParams<I = i64> {
    pub min: I,
    pub bins: usize,
}

/// One bucket per integer value in `[min, min + bins)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiscreteBinning<I: PrimInt = i64> {
    min: I,
    last: I,
    bins: usize,
}

impl<I: PrimInt> DiscreteBinning<I> {
    pub fn new(min: I, bins: usize) -> Result<Self> {
        if bins == 0 {
            return Err(Error::zero_bins("discrete binning"));
        }
        let last = <I as NumCast>::from(bins - 1)
            .and_then(|span| min.checked_add(&span))
            .ok_or_else(|| {
                Error::InvalidParameter(format!(
                    "discrete binning of {bins} values does not fit the value type"
                ))
            })?;
        Ok(Self { min, last, bins })
    }

    pub fn from_params(params: DiscreteParams<I>) -> Result<Self> {
        Self::new(params.min, params.bins)
    }

    pub fn params(&self) -> DiscreteParams<I> {
        DiscreteParams {
            min: self.min,
            bins: self.bins,
        }
    }

    pub fn min(&self) -> I {
        self.min
    }

    /// Largest accepted value
    pub fn max(&self) -> I {
        self.last
    }
}

impl<I: PrimInt> Binning for DiscreteBinning<I> {
    type Value = I;

    fn bins(&self) -> usize {
        self.bins
    }

    fn index_for(&self, value: I) -> Option<usize> {
        if value < self.min || value > self.last {
            return None;
        }
        value.checked_sub(&self.min)?.to_usize()
    }
}

impl<I: PrimInt> BucketBounds for DiscreteBinning<I> {
    fn bucket_min(&self, index: usize) -> I {
        <I as NumCast>::from(index)
            .and_then(|offset| self.min.checked_add(&offset))
            .map_or(self.last, |v| v.min(self.last))
    }

    fn bucket_max(&self, index: usize) -> I {
        self.bucket_min(index)
    }
}

/// Two buckets: `false` at index 0, `true` at index 1
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoolBinning;

impl Binning for BoolBinning {
    type Value = bool;

    fn bins(&self) -> usize {
        2
    }

    #[inline]
    fn index_for(&self, value: bool) -> Option<usize> {
        Some(value as usize)
    }
}

impl BucketBounds for BoolBinning {
    fn bucket_min(&self, index: usize) -> bool {
        index != 0
    }

    fn bucket_max(&self, index: usize) -> bool {
        index != 0
    }
}
