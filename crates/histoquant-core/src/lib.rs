//! Core traits and types for histogram quantile tracking
//!
//! This crate holds the vocabulary shared by the rest of the workspace:
//!
//! - [`QuantileFraction`]: an exact rational `N/D` naming a quantile
//! - [`QuantileRange`]: where a quantile currently sits, possibly spanning a gap
//! - [`BucketStore`]: read access to a fixed array of bucket counts
//! - [`Error`] / [`Result`]: the unified error type
//!
//! # Example
//!
//! ```rust
//! use histoquant_core::{QuantileFraction, Error};
//!
//! let p99 = QuantileFraction::percentile(99).unwrap();
//! assert!(p99 > QuantileFraction::median());
//!
//! assert!(matches!(
//!     QuantileFraction::new(1, 1),
//!     Err(Error::InvalidQuantile { .. })
//! ));
//! ```

pub mod error;
pub mod fraction;
pub mod range;
pub mod traits;

pub use error::{Error, Result};
pub use fraction::QuantileFraction;
pub use range::QuantileRange;
pub use traits::{BucketStore, Count};
