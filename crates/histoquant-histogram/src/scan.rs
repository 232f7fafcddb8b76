//! Scan-based quantile lookup
//!
//! These functions walk the whole store from the lowest bucket and are the
//! ground truth the incremental tracker must agree with. They are O(bins)
//! per call.

use crate::binning::BucketBounds;
use histoquant_core::{BucketStore, QuantileFraction, QuantileRange};
use tracing::trace;

/// Find the bucket range holding quantile `q`
///
/// `lower` is the first bucket where the cumulative count reaches
/// `population * q`. If the cumulative count hits that target exactly, the
/// quantile sits in the gap after `lower` and `upper` is the next populated
/// bucket (or the last bucket if none follows). Otherwise `upper == lower`.
///
/// An empty store yields `(0, bins - 1)`. The store must have at least one
/// bucket.
pub fn find_quantile_indexes<S>(store: &S, q: &QuantileFraction) -> QuantileRange<usize>
where
    S: BucketStore + ?Sized,
{
    let bins = store.bins();
    let quota = q.lower_target(store.population());

    let mut index = 0;
    let mut leq = q.scale(store.count_at(0));
    while index + 1 < bins && leq < quota {
        index += 1;
        leq += q.scale(store.count_at(index));
    }

    let lower = index;
    if leq == quota {
        while index + 1 < bins {
            index += 1;
            if store.count_at(index) != 0 {
                break;
            }
        }
    }

    trace!("Scanned quantile {} to buckets {}:{}", q, lower, index);
    QuantileRange::new(lower, index)
}

/// Find the value bounds of quantile `q`
///
/// The bucket range from [`find_quantile_indexes`] is widened to the lower
/// edge of its first bucket and the upper edge of its last.
pub fn find_quantile<S, B>(store: &S, binning: &B, q: &QuantileFraction) -> QuantileRange<B::Value>
where
    S: BucketStore + ?Sized,
    B: BucketBounds,
{
    let indexes = find_quantile_indexes(store, q);
    QuantileRange::new(
        binning.bucket_min(indexes.lower),
        binning.bucket_max(indexes.upper),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binning::UniformBinning;
    use crate::store::BucketCounts;
    use approx::assert_relative_eq;

    fn median() -> QuantileFraction {
        QuantileFraction::median()
    }

    #[test]
    fn test_single_bucket_median() {
        let store = BucketCounts::from_counts(vec![1, 1, 3, 1, 1]).unwrap();
        assert_eq!(find_quantile_indexes(&store, &median()), QuantileRange::point(2));
    }

    #[test]
    fn test_split_median() {
        // 10 samples, one per bucket 0..9
        let mut counts = vec![0; 32];
        counts[..10].iter_mut().for_each(|c| *c = 1);
        let store = BucketCounts::from_counts(counts).unwrap();
        assert_eq!(find_quantile_indexes(&store, &median()), QuantileRange::new(4, 5));
    }

    #[test]
    fn test_empty_gap() {
        let store = BucketCounts::from_counts(vec![0, 0, 3, 0, 0, 0, 3, 0, 0, 0]).unwrap();
        assert_eq!(find_quantile_indexes(&store, &median()), QuantileRange::new(2, 6));

        // An odd population cannot split evenly
        let store = BucketCounts::from_counts(vec![0, 0, 3, 0, 0, 0, 4, 0, 0, 0]).unwrap();
        assert_eq!(find_quantile_indexes(&store, &median()), QuantileRange::point(6));
    }

    #[test]
    fn test_empty_store_spans_everything() {
        let store = BucketCounts::new(6).unwrap();
        assert_eq!(find_quantile_indexes(&store, &median()), QuantileRange::new(0, 5));
    }

    #[test]
    fn test_trailing_gap_reaches_last_bucket() {
        // Exact split on the last populated bucket with nothing after it
        let store = BucketCounts::from_counts(vec![0, 2, 0, 0]).unwrap();
        let p = QuantileFraction::new(1, 2).unwrap();
        assert_eq!(find_quantile_indexes(&store, &p), QuantileRange::point(1));

        let store = BucketCounts::from_counts(vec![1, 0, 0]).unwrap();
        let p99 = QuantileFraction::percentile(99).unwrap();
        assert_eq!(find_quantile_indexes(&store, &p99), QuantileRange::point(0));
    }

    #[test]
    fn test_find_quantile_values() {
        let binning = UniformBinning::new(0.0, 8.0, 4).unwrap();
        let store = BucketCounts::from_counts(vec![2, 0, 0, 2]).unwrap();
        let range = find_quantile(&store, &binning, &median());
        assert_relative_eq!(range.lower, 0.0);
        assert_relative_eq!(range.upper, 8.0);
        assert_relative_eq!(range.midpoint(), 4.0);
    }
}
