//! Exact rational quantile fractions
//!
//! A [`QuantileFraction`] names the quantile being tracked as `N/D` with
//! `0 < N < D`. All comparisons go through cross-multiplication in 128-bit
//! arithmetic, so no rounding ever enters the bookkeeping and the products
//! `population * denominator` cannot overflow for 64-bit counts.

use crate::error::{Error, Result};
use crate::traits::Count;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// A quantile expressed as an exact fraction `numerator / denominator`
///
/// Equality and ordering compare the represented value, so `2/4 == 1/2`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(try_from = "RawFraction", into = "RawFraction")]
pub struct QuantileFraction {
    numerator: u64,
    denominator: u64,
}

/// Unvalidated wire shape used by serde
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct RawFraction {
    numerator: i64,
    denominator: i64,
}

impl QuantileFraction {
    /// The median, `1/2`
    pub const MEDIAN: Self = Self {
        numerator: 1,
        denominator: 2,
    };

    /// Create a new fraction, rejecting anything outside `(0, 1)`
    pub fn new(numerator: i64, denominator: i64) -> Result<Self> {
        if denominator <= 0 || numerator <= 0 || numerator >= denominator {
            return Err(Error::InvalidQuantile {
                numerator,
                denominator,
            });
        }
        Ok(Self {
            numerator: numerator as u64,
            denominator: denominator as u64,
        })
    }

    /// The median, `1/2`
    pub const fn median() -> Self {
        Self::MEDIAN
    }

    /// Percentile `p`, i.e. `p/100`
    pub fn percentile(p: i64) -> Result<Self> {
        Self::new(p, 100)
    }

    /// The three quartiles `1/4`, `1/2` and `3/4`
    pub fn quartiles() -> [Self; 3] {
        [
            Self {
                numerator: 1,
                denominator: 4,
            },
            Self::MEDIAN,
            Self {
                numerator: 3,
                denominator: 4,
            },
        ]
    }

    pub fn numerator(&self) -> u64 {
        self.numerator
    }

    pub fn denominator(&self) -> u64 {
        self.denominator
    }

    /// Approximate value as a float, for display and reporting only
    pub fn to_f64(&self) -> f64 {
        self.numerator as f64 / self.denominator as f64
    }

    /// `population * N`: samples at or below the quantile must reach this
    /// once scaled by the denominator.
    #[inline]
    pub fn lower_target(&self, population: Count) -> u128 {
        population as u128 * self.numerator as u128
    }

    /// `population * (D - N)`: samples at or above the quantile must reach
    /// this once scaled by the denominator.
    #[inline]
    pub fn upper_target(&self, population: Count) -> u128 {
        population as u128 * (self.denominator - self.numerator) as u128
    }

    /// `count * D`, the left-hand side of both threshold comparisons
    #[inline]
    pub fn scale(&self, count: Count) -> u128 {
        count as u128 * self.denominator as u128
    }

    /// Divide two fractions, `(a/b) / (c/d) = (a*d) / (b*c)`
    ///
    /// The quotient is not reduced. Fails with [`Error::Overflow`] when a
    /// product leaves the 64-bit range and with [`Error::InvalidQuantile`]
    /// when the quotient is not itself inside `(0, 1)`.
    pub fn checked_div(&self, other: &Self) -> Result<Self> {
        let numerator = self
            .numerator
            .checked_mul(other.denominator)
            .and_then(|n| i64::try_from(n).ok())
            .ok_or_else(|| Error::Overflow(format!("numerator of {self} / {other}")))?;
        let denominator = self
            .denominator
            .checked_mul(other.numerator)
            .and_then(|d| i64::try_from(d).ok())
            .ok_or_else(|| Error::Overflow(format!("denominator of {self} / {other}")))?;
        Self::new(numerator, denominator)
    }

    #[inline]
    fn cross(&self, other: &Self) -> (u128, u128) {
        (
            self.numerator as u128 * other.denominator as u128,
            other.numerator as u128 * self.denominator as u128,
        )
    }
}

impl PartialEq for QuantileFraction {
    fn eq(&self, other: &Self) -> bool {
        let (lhs, rhs) = self.cross(other);
        lhs == rhs
    }
}

impl Eq for QuantileFraction {}

impl PartialOrd for QuantileFraction {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QuantileFraction {
    fn cmp(&self, other: &Self) -> Ordering {
        let (lhs, rhs) = self.cross(other);
        lhs.cmp(&rhs)
    }
}

impl fmt::Display for QuantileFraction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.numerator, self.denominator)
    }
}

impl From<QuantileFraction> for f64 {
    fn from(q: QuantileFraction) -> Self {
        q.to_f64()
    }
}

impl TryFrom<(i64, i64)> for QuantileFraction {
    type Error = Error;

    fn try_from((numerator, denominator): (i64, i64)) -> Result<Self> {
        Self::new(numerator, denominator)
    }
}

impl TryFrom<RawFraction> for QuantileFraction {
    type Error = Error;

    fn try_from(raw: RawFraction) -> Result<Self> {
        Self::new(raw.numerator, raw.denominator)
    }
}

impl From<QuantileFraction> for RawFraction {
    fn from(q: QuantileFraction) -> Self {
        Self {
            numerator: q.numerator as i64,
            denominator: q.denominator as i64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    #[test]
    fn test_rejects_out_of_interval() {
        for (n, d) in [(1, 1), (0, 5), (5, 5), (6, 5), (-1, 2), (1, 0), (1, -2), (-1, -2)] {
            assert_eq!(
                QuantileFraction::new(n, d),
                Err(Error::InvalidQuantile {
                    numerator: n,
                    denominator: d
                }),
                "{n}/{d} should be rejected"
            );
        }
        assert!(QuantileFraction::new(1, 2).is_ok());
        assert!(QuantileFraction::new(99, 100).is_ok());
    }

    #[test]
    fn test_cross_multiplied_comparison() {
        let half = QuantileFraction::median();
        let two_quarters = QuantileFraction::new(2, 4).unwrap();
        let p90 = QuantileFraction::percentile(90).unwrap();

        assert_eq!(half, two_quarters);
        assert!(half < p90);
        assert!(QuantileFraction::new(1, 3).unwrap() < half);
        assert_eq!(half.cmp(&two_quarters), Ordering::Equal);

        let [q1, q2, q3] = QuantileFraction::quartiles();
        assert!(q1 < q2 && q2 < q3);
    }

    #[test]
    fn test_thresholds() {
        let p95 = QuantileFraction::percentile(95).unwrap();
        assert_eq!(p95.lower_target(20), 1900);
        assert_eq!(p95.upper_target(20), 100);
        assert_eq!(p95.scale(19), 1900);

        // Large populations stay exact
        let q = QuantileFraction::new(i64::MAX - 1, i64::MAX).unwrap();
        assert_eq!(
            q.lower_target(u64::MAX),
            u64::MAX as u128 * (i64::MAX - 1) as u128
        );
    }

    #[test]
    fn test_to_f64_and_display() {
        let q = QuantileFraction::new(3, 8).unwrap();
        assert_relative_eq!(q.to_f64(), 0.375);
        assert_relative_eq!(f64::from(q), 0.375);
        assert_eq!(q.to_string(), "3/8");
    }

    #[test]
    fn test_checked_div() {
        let quarter = QuantileFraction::new(1, 4).unwrap();
        let half = QuantileFraction::median();

        let q = quarter.checked_div(&half).unwrap();
        assert_eq!(q, half);
        assert_eq!(q.numerator(), 2);
        assert_eq!(q.denominator(), 4);

        assert!(matches!(
            half.checked_div(&quarter),
            Err(Error::InvalidQuantile { numerator: 4, denominator: 2 })
        ));

        let big = QuantileFraction::new(i64::MAX - 1, i64::MAX).unwrap();
        assert!(matches!(big.checked_div(&half), Err(Error::Overflow(_))));
    }

    #[test]
    fn test_serde_validates() {
        let q: QuantileFraction =
            serde_json::from_str(r#"{"numerator": 9, "denominator": 10}"#).unwrap();
        assert_eq!(q, QuantileFraction::new(9, 10).unwrap());
        assert_eq!(
            serde_json::to_string(&q).unwrap(),
            r#"{"numerator":9,"denominator":10}"#
        );

        let bad = serde_json::from_str::<QuantileFraction>(r#"{"numerator": 0, "denominator": 5}"#);
        assert!(bad.is_err());
    }

    proptest! {
        #[test]
        fn prop_ordering_matches_float(a in 1i64..1000, b in 1i64..1000, c in 1i64..1000, d in 1i64..1000) {
            let (n1, d1) = (a.min(b), a.max(b) + 1);
            let (n2, d2) = (c.min(d), c.max(d) + 1);
            let x = QuantileFraction::new(n1, d1).unwrap();
            let y = QuantileFraction::new(n2, d2).unwrap();
            // Exact comparison agrees with the integer cross product
            prop_assert_eq!(x.cmp(&y), (n1 * d2).cmp(&(n2 * d1)));
            prop_assert_eq!(x == y, n1 * d2 == n2 * d1);
        }
    }
}
