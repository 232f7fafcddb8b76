//! Bucketed histograms for quantile tracking
//!
//! This crate provides the storage and value-mapping side of the workspace:
//! a dense [`BucketCounts`] store implementing
//! [`BucketStore`](histoquant_core::BucketStore), the [`Binning`] rules that
//! map values onto bucket indices, and the O(bins) scan that defines where a
//! quantile sits.
//!
//! # Examples
//!
//! ```rust
//! use histoquant_histogram::{find_quantile_indexes, Binning, BucketCounts, UniformBinning};
//! use histoquant_core::QuantileFraction;
//!
//! let binning = UniformBinning::new(0.0, 1.0, 10).unwrap();
//! let mut store = BucketCounts::new(binning.bins()).unwrap();
//!
//! for v in [0.05, 0.15, 0.25, 0.35] {
//!     if let Some(i) = binning.index_for(v) {
//!         store.add_at(i).unwrap();
//!     }
//! }
//!
//! // Two samples on either side: the median falls between buckets 1 and 2
//! let range = find_quantile_indexes(&store, &QuantileFraction::median());
//! assert_eq!((range.lower, range.upper), (1, 2));
//! ```

pub mod binning;
pub mod scan;
pub mod store;

pub use binning::{
    Binning, BoolBinning, BucketBounds, DiscreteBinning, DiscreteParams, IndexBinning,
    UniformBinning, UniformParams,
};
pub use scan::{find_quantile, find_quantile_indexes};
pub use store::BucketCounts;

pub use histoquant_core::{Error, Result};
