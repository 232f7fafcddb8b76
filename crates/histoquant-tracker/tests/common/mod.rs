//! Shared utilities for integration tests

#![allow(dead_code)]

use histoquant_core::{BucketStore, QuantileFraction};
use histoquant_histogram::{find_quantile_indexes, Binning};
use histoquant_tracker::QuantileTracker;

/// Quantiles exercised by the stress tests, from the 1st to the 99th percentile
pub fn stress_ratios() -> Vec<(i64, i64)> {
    vec![
        (1, 100),
        (5, 100),
        (10, 100),
        (1, 4),
        (1, 2),
        (2, 4),
        (3, 4),
        (90, 100),
        (95, 100),
        (99, 100),
    ]
}

pub fn stress_fractions() -> Vec<QuantileFraction> {
    stress_ratios()
        .into_iter()
        .map(|(n, d)| QuantileFraction::new(n, d).unwrap())
        .collect()
}

/// Install a test subscriber once; respects `RUST_LOG`
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Check every tracked quantile against a full rescan of the store
pub fn assert_consistent<B: Binning>(tracker: &QuantileTracker<B>, context: &str) {
    let store = tracker.store();
    let bins = tracker.bins();

    assert_eq!(
        store.population(),
        store.sum_counts(),
        "population drifted from bucket sum ({context})"
    );

    for q in tracker.quantiles() {
        let range = q.range();
        assert!(
            range.lower <= range.upper && range.upper < bins,
            "quantile {} has bad range {} over {bins} bins ({context})",
            q.fraction(),
            range
        );
        assert_eq!(
            q.samples_lower(),
            store.count_below(range.upper),
            "samples below {} drifted for {} ({context})",
            range.upper,
            q.fraction()
        );
        assert_eq!(
            range,
            find_quantile_indexes(store, &q.fraction()),
            "quantile {} disagrees with rescan, last adjust {} ({context})",
            q.fraction(),
            q.last_adjust()
        );
    }
}
