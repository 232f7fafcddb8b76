//! Error types for histogram quantile tracking
//!
//! Provides a unified error type for all histoquant crates.

use thiserror::Error;

/// Core error type for histogram and quantile operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Quantile fraction outside the open interval (0, 1)
    #[error("Invalid quantile {numerator}/{denominator}: must satisfy 0 < numerator < denominator")]
    InvalidQuantile { numerator: i64, denominator: i64 },

    /// Bucket index outside the configured domain
    #[error("Bucket index {index} out of range for {bins} bins")]
    OutOfRange { index: usize, bins: usize },

    /// Attempt to remove a sample from a bucket holding none
    #[error("Bucket {index} is empty")]
    EmptyBucket { index: usize },

    /// Integer arithmetic exceeded the supported width
    #[error("Arithmetic overflow: {0}")]
    Overflow(String),

    /// Invalid parameter provided to a constructor
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create an error for a binning or store configured with no buckets
    pub fn zero_bins(context: &str) -> Self {
        Self::InvalidParameter(format!("{context} requires at least one bucket"))
    }

    /// Check that a bucket index lies inside `0..bins`
    pub fn check_index(index: usize, bins: usize) -> Result<()> {
        if index >= bins {
            return Err(Error::OutOfRange { index, bins });
        }
        Ok(())
    }
}
