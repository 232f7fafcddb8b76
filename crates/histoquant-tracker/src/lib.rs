//! Incremental quantile tracking over bucketed histograms
//!
//! A [`QuantileTracker`] owns a [`BucketCounts`](histoquant_histogram::BucketCounts)
//! store and a set of [`TrackedQuantile`]s. Each insert, remove or replace
//! updates the store and then nudges every quantile from where it was, so a
//! quantile that barely moves costs O(1) to maintain regardless of the
//! number of buckets.
//!
//! Quantiles are reported as bucket ranges. When samples split exactly at a
//! quantile, e.g. the median of an even population, the range spans from the
//! last bucket below the split to the first populated bucket above it.
//!
//! # Examples
//!
//! ```rust
//! use histoquant_tracker::TrackerBuilder;
//! use histoquant_histogram::UniformBinning;
//!
//! let mut tracker = TrackerBuilder::new()
//!     .quantile(1, 2)
//!     .percentiles([90])
//!     .build(UniformBinning::new(0.0, 100.0, 100).unwrap())
//!     .unwrap();
//!
//! for v in 0..100 {
//!     tracker.insert(v as f64 + 0.5);
//! }
//!
//! let median = tracker.quantiles()[0].range();
//! assert_eq!((median.lower, median.upper), (49, 50));
//!
//! // Swap a low sample for a high one: both quantiles move up
//! tracker.replace(99.9, 0.5);
//! assert_eq!(tracker.quantiles()[0].range().lower, 50);
//! ```

pub mod config;
pub mod tracked;
pub mod tracker;

pub use config::{TrackerBuilder, TrackerConfig};
pub use tracked::{AdjustOutcome, TrackedQuantile};
pub use tracker::{MissReason, Mutation, QuantileTracker};

pub use histoquant_core::{Error, QuantileFraction, QuantileRange, Result};
