//! Incrementally tracked quantiles over fixed bucketed histograms
//!
//! This crate re-exports the workspace:
//!
//! - [`core`]: quantile fractions, ranges, the bucket store trait and errors
//! - [`histogram`]: the dense bucket store, binnings and the reference scan
//! - [`tracker`]: the incremental [`QuantileTracker`](tracker::QuantileTracker)
//!
//! Most users only need the [`prelude`].
//!
//! ```rust
//! use histoquant::prelude::*;
//!
//! let mut tracker = QuantileTracker::with_bins(10, &[(1, 2)]).unwrap();
//! for v in [2, 2, 2, 6, 6, 6] {
//!     tracker.insert(v);
//! }
//! // Three samples either side: the median spans the empty buckets between
//! assert_eq!(tracker.quantiles()[0].range(), QuantileRange::new(2, 6));
//! ```

pub use histoquant_core as core;
pub use histoquant_histogram as histogram;
pub use histoquant_tracker as tracker;

pub use histoquant_core::{Error, Result};

pub mod prelude {
    pub use histoquant_core::{BucketStore, Count, QuantileFraction, QuantileRange};
    pub use histoquant_histogram::{
        find_quantile, find_quantile_indexes, Binning, BoolBinning, BucketBounds, BucketCounts,
        DiscreteBinning, IndexBinning, UniformBinning,
    };
    pub use histoquant_tracker::{
        AdjustOutcome, MissReason, Mutation, QuantileTracker, TrackedQuantile, TrackerBuilder,
        TrackerConfig,
    };
}
