//! Quantile locations

use num_traits::AsPrimitive;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Location of a quantile, either a single point or an exclusive gap
///
/// When the samples split exactly at the quantile, the location is the span
/// between the last sample below and the first sample above, which may
/// cover any number of empty buckets. `lower <= upper` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QuantileRange<T> {
    pub lower: T,
    pub upper: T,
}

impl<T> QuantileRange<T> {
    pub fn new(lower: T, upper: T) -> Self {
        Self { lower, upper }
    }
}

impl<T: Copy> QuantileRange<T> {
    /// A range collapsed onto one location
    pub fn point(value: T) -> Self {
        Self {
            lower: value,
            upper: value,
        }
    }
}

impl<T: PartialEq> QuantileRange<T> {
    /// Whether the quantile falls between two distinct locations
    pub fn is_range(&self) -> bool {
        self.lower != self.upper
    }

    /// Whether the quantile falls on a single location
    pub fn is_value(&self) -> bool {
        self.lower == self.upper
    }
}

impl<T: AsPrimitive<f64>> QuantileRange<T> {
    /// Midpoint of the range
    pub fn midpoint(&self) -> f64 {
        0.5 * (self.lower.as_() + self.upper.as_())
    }
}

impl<T: fmt::Display + PartialEq> fmt::Display for QuantileRange<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_value() {
            write!(f, "{}", self.lower)
        } else {
            write!(f, "{}:{}", self.lower, self.upper)
        }
    }
}
