//! Tracker configuration and builder

use crate::tracker::{validate_ratios, QuantileTracker};
use histoquant_core::{QuantileFraction, Result};
use histoquant_histogram::Binning;
use serde::{Deserialize, Serialize};

/// Serializable description of which quantiles to track
///
/// Both lists are optional when deserializing. Fractions are validated
/// while loading, so a config with `{"numerator": 1, "denominator": 1}`
/// fails to parse; percentiles are validated on [`TrackerBuilder::build`].
///
/// ```rust
/// use histoquant_tracker::TrackerConfig;
///
/// let config: TrackerConfig = serde_json::from_str(
///     r#"{"quantiles": [{"numerator": 1, "denominator": 3}], "percentiles": [50, 99]}"#,
/// ).unwrap();
/// assert_eq!(config.len(), 3);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackerConfig {
    #[serde(default)]
    pub quantiles: Vec<QuantileFraction>,
    #[serde(default)]
    pub percentiles: Vec<i64>,
}

impl TrackerConfig {
    /// Number of quantiles the config asks for
    pub fn len(&self) -> usize {
        self.quantiles.len() + self.percentiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quantiles.is_empty() && self.percentiles.is_empty()
    }
}

/// Builder for [`QuantileTracker`]
///
/// Ratios are collected unchecked and validated together in
/// [`build`](Self::build); nothing is constructed if any of them is invalid.
#[derive(Debug, Clone, Default)]
pub struct TrackerBuilder {
    ratios: Vec<(i64, i64)>,
}

impl TrackerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Track the quantile `numerator / denominator`
    pub fn quantile(mut self, numerator: i64, denominator: i64) -> Self {
        self.ratios.push((numerator, denominator));
        self
    }

    /// Track an already validated fraction
    pub fn fraction(mut self, fraction: QuantileFraction) -> Self {
        self.ratios
            .push((fraction.numerator() as i64, fraction.denominator() as i64));
        self
    }

    /// Track every fraction in `fractions`
    pub fn quantiles<I>(self, fractions: I) -> Self
    where
        I: IntoIterator<Item = QuantileFraction>,
    {
        fractions.into_iter().fold(self, Self::fraction)
    }

    /// Track each percentile `p / 100`
    pub fn percentiles<I>(mut self, percentiles: I) -> Self
    where
        I: IntoIterator<Item = i64>,
    {
        self.ratios.extend(percentiles.into_iter().map(|p| (p, 100)));
        self
    }

    /// Add everything listed in `config`
    pub fn config(self, config: TrackerConfig) -> Self {
        self.quantiles(config.quantiles)
            .percentiles(config.percentiles)
    }

    /// Build an empty tracker over `binning`
    ///
    /// Quantiles are tracked in the order they were added.
    pub fn build<B: Binning>(self, binning: B) -> Result<QuantileTracker<B>> {
        let fractions = validate_ratios(&self.ratios)?;
        QuantileTracker::new(binning, &fractions)
    }
}
