//! Per-quantile incremental state
//!
//! A [`TrackedQuantile`] remembers where its quantile sat after the last
//! mutation together with the number of samples strictly below that
//! location. After a single-sample change to the store, [`TrackedQuantile::adjust`]
//! walks outward from the previous location only as far as the quantile
//! actually moved, so steady-state traffic costs O(1) per quantile.

use histoquant_core::{BucketStore, Count, QuantileFraction, QuantileRange};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{instrument, trace};

/// How the most recent adjustment moved a quantile
///
/// Diagnostic only; no invariant depends on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AdjustOutcome {
    /// The quantile moved towards higher buckets
    SlideUp,
    /// The quantile moved towards lower buckets
    SlideDown,
    /// The quantile stayed put, possibly widening or narrowing its gap
    Stable,
    /// The last insert was rejected by the binning and not applied
    InsertMissed,
    /// The last remove was rejected or found an empty bucket
    RemoveMissed,
}

impl fmt::Display for AdjustOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::SlideUp => "slide-up",
            Self::SlideDown => "slide-down",
            Self::Stable => "stable",
            Self::InsertMissed => "insert-missed",
            Self::RemoveMissed => "remove-missed",
        };
        f.write_str(s)
    }
}

/// One quantile kept in sync with a bucket store
///
/// Invariants after every completed operation:
/// - `samples_lower` equals the number of samples in buckets strictly below
///   `range.upper`
/// - `range.lower <= range.upper < bins`
/// - `range` equals [`find_quantile_indexes`](histoquant_histogram::find_quantile_indexes)
///   over the same store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackedQuantile {
    fraction: QuantileFraction,
    range: QuantileRange<usize>,
    samples_lower: Count,
    last_adjust: AdjustOutcome,
}

impl TrackedQuantile {
    /// Start tracking `fraction` against `store`
    ///
    /// Runs one O(bins) [`recalculate`](Self::recalculate) from bucket 0.
    pub fn new<S>(fraction: QuantileFraction, store: &S) -> Self
    where
        S: BucketStore + ?Sized,
    {
        let mut q = Self {
            fraction,
            range: QuantileRange::point(0),
            samples_lower: 0,
            last_adjust: AdjustOutcome::Stable,
        };
        q.recalculate(store, 0);
        q
    }

    pub fn fraction(&self) -> QuantileFraction {
        self.fraction
    }

    /// Current bucket range of the quantile
    pub fn range(&self) -> QuantileRange<usize> {
        self.range
    }

    /// Samples strictly below `range().upper`
    pub fn samples_lower(&self) -> Count {
        self.samples_lower
    }

    pub fn last_adjust(&self) -> AdjustOutcome {
        self.last_adjust
    }

    /// Resynchronize from scratch, starting the search at bucket `hint`
    ///
    /// The hint is clamped into the store. The result does not depend on the
    /// hint; a hint close to the answer only shortens the walk.
    #[instrument(level = "debug", skip(self, store), fields(fraction = %self.fraction))]
    pub fn recalculate<S>(&mut self, store: &S, hint: usize)
    where
        S: BucketStore + ?Sized,
    {
        let hint = hint.min(store.bins().saturating_sub(1));
        self.range = QuantileRange::point(hint);
        self.samples_lower = store.count_below(hint);
        self.adjust(store);
    }

    /// Move the quantile to its correct location after a single mutation
    ///
    /// `samples_lower` must already account for the mutation; the tracker
    /// does this before calling. Only buckets between the old and new
    /// location are visited.
    pub fn adjust<S>(&mut self, store: &S) -> AdjustOutcome
    where
        S: BucketStore + ?Sized,
    {
        let bins = store.bins();
        let population = store.population();
        let q = self.fraction;
        let lte_target = q.lower_target(population);
        let gte_target = q.upper_target(population);

        // Collapse any gap onto its upper bound
        let mut bin = self.range.upper;
        let mut here = store.count_at(bin);
        let mut lte = self.samples_lower + here;
        let mut gte = population - self.samples_lower;
        let mut steps = 0usize;

        let outcome = if q.scale(lte) < lte_target {
            while bin + 1 < bins && q.scale(lte) < lte_target {
                self.samples_lower += here;
                bin += 1;
                here = store.count_at(bin);
                lte += here;
                steps += 1;
            }

            self.range.lower = bin;
            if q.scale(lte) == lte_target {
                // Exact split: the quantile spans the gap up to the next sample
                self.samples_lower += here;
                while bin + 1 < bins {
                    bin += 1;
                    steps += 1;
                    if store.count_at(bin) != 0 {
                        break;
                    }
                }
            }
            self.range.upper = bin;
            AdjustOutcome::SlideUp
        } else if q.scale(gte) < gte_target {
            while bin > 0 && q.scale(gte) < gte_target {
                bin -= 1;
                here = store.count_at(bin);
                self.samples_lower -= here;
                gte += here;
                steps += 1;
            }

            self.range.upper = bin;
            if q.scale(gte) == gte_target {
                while bin > 0 {
                    bin -= 1;
                    steps += 1;
                    if store.count_at(bin) != 0 {
                        break;
                    }
                }
            }
            self.range.lower = bin;
            AdjustOutcome::SlideDown
        } else {
            // Samples at or below and at or above `bin` are both satisfied.
            // Grow or shrink each edge across empty buckets independently.
            let (mut lower, mut upper) = (bin, bin);
            while lower > 0 {
                lte -= store.count_at(lower);
                if q.scale(lte) < lte_target {
                    break;
                }
                lower -= 1;
                steps += 1;
            }
            while upper + 1 < bins {
                let count = store.count_at(upper);
                gte -= count;
                if q.scale(gte) < gte_target {
                    break;
                }
                self.samples_lower += count;
                upper += 1;
                steps += 1;
            }
            self.range = QuantileRange::new(lower, upper);
            AdjustOutcome::Stable
        };

        trace!(
            "Adjusted {} {} over {} buckets to {}",
            q,
            outcome,
            steps,
            self.range
        );
        self.last_adjust = outcome;
        outcome
    }

    /// Account for one sample added at `index`
    #[inline]
    pub(crate) fn note_insert(&mut self, index: usize) {
        if index < self.range.upper {
            self.samples_lower += 1;
        }
    }

    /// Account for one sample taken from `index`
    #[inline]
    pub(crate) fn note_remove(&mut self, index: usize) {
        if index < self.range.upper {
            self.samples_lower -= 1;
        }
    }

    pub(crate) fn mark(&mut self, outcome: AdjustOutcome) {
        self.last_adjust = outcome;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use histoquant_histogram::{find_quantile_indexes, BucketCounts};

    fn store(counts: &[Count]) -> BucketCounts {
        BucketCounts::from_counts(counts.to_vec()).unwrap()
    }

    fn tracked(n: i64, d: i64, store: &BucketCounts) -> TrackedQuantile {
        TrackedQuantile::new(QuantileFraction::new(n, d).unwrap(), store)
    }

    #[test]
    fn test_empty_gap_median() {
        let s = store(&[0, 0, 3, 0, 0, 0, 3, 0, 0, 0]);
        let q = tracked(1, 2, &s);
        assert_eq!(q.range(), QuantileRange::new(2, 6));
        assert_eq!(q.samples_lower(), 3);
    }

    #[test]
    fn test_odd_population_lands_in_bucket() {
        let s = store(&[0, 0, 3, 0, 0, 0, 4, 0, 0, 0]);
        let q = tracked(1, 2, &s);
        assert_eq!(q.range(), QuantileRange::point(6));
        assert_eq!(q.samples_lower(), 3);
    }

    #[test]
    fn test_empty_store() {
        let s = BucketCounts::new(5).unwrap();
        let q = tracked(1, 4, &s);
        assert_eq!(q.range(), QuantileRange::new(0, 4));
        assert_eq!(q.samples_lower(), 0);
        assert_eq!(q.last_adjust(), AdjustOutcome::Stable);
    }

    #[test]
    fn test_single_bucket_store() {
        let s = store(&[5]);
        let q = tracked(1, 100, &s);
        assert_eq!(q.range(), QuantileRange::point(0));
        assert_eq!(q.samples_lower(), 0);
    }

    #[test]
    fn test_hint_does_not_change_result() {
        let s = store(&[2, 0, 1, 4, 0, 0, 3, 1, 0, 5]);
        for (n, d) in [(1, 2), (1, 10), (9, 10), (1, 4), (3, 4), (1, 3)] {
            let expected = find_quantile_indexes(&s, &QuantileFraction::new(n, d).unwrap());
            for hint in [0, 3, 5, 9, 100] {
                let mut q = tracked(n, d, &s);
                q.recalculate(&s, hint);
                assert_eq!(q.range(), expected, "{n}/{d} from hint {hint}");
                assert_eq!(q.samples_lower(), s.count_below(expected.upper));
            }
        }
    }

    fn move_sample(s: &mut BucketCounts, q: &mut TrackedQuantile, from: usize, to: usize) {
        s.move_sample(from, to).unwrap();
        q.note_insert(to);
        q.note_remove(from);
        q.adjust(s);
    }

    #[test]
    fn test_slide_directions() {
        let mut s = store(&[1, 1, 1, 0, 0, 0, 0, 0]);
        let mut q = tracked(1, 2, &s);
        assert_eq!(q.range(), QuantileRange::point(1));
        assert_eq!(q.samples_lower(), 1);

        // Moving the lowest sample to the top pulls the median up
        move_sample(&mut s, &mut q, 0, 7);
        assert_eq!(q.last_adjust(), AdjustOutcome::SlideUp);
        assert_eq!(q.range(), QuantileRange::point(2));
        assert_eq!(q.samples_lower(), 1);

        // Moving it back pushes the median down again
        move_sample(&mut s, &mut q, 7, 0);
        assert_eq!(q.last_adjust(), AdjustOutcome::SlideDown);
        assert_eq!(q.range(), QuantileRange::point(1));
        assert_eq!(q.samples_lower(), 1);
    }

    #[test]
    fn test_upper_percentile_slides_on_insert() {
        let mut s = store(&[1, 1, 1, 1, 1, 0, 0, 0]);
        let mut q = tracked(3, 4, &s);
        assert_eq!(q.range(), QuantileRange::point(3));

        s.add_at(7).unwrap();
        q.note_insert(7);
        q.adjust(&s);
        assert_eq!(q.last_adjust(), AdjustOutcome::SlideUp);
        assert_eq!(q.range(), QuantileRange::point(4));
        assert_eq!(q.range(), find_quantile_indexes(&s, &q.fraction()));
        assert_eq!(q.samples_lower(), s.count_below(q.range().upper));
    }

    #[test]
    fn test_stable_widens_into_gap() {
        // Median sits in bucket 2; adding one sample at 5 makes an exact split
        let mut s = store(&[0, 0, 1, 0, 0, 0]);
        let mut q = tracked(1, 2, &s);
        assert_eq!(q.range(), QuantileRange::point(2));

        s.add_at(5).unwrap();
        q.note_insert(5);
        q.adjust(&s);
        assert_eq!(q.range(), QuantileRange::new(2, 5));
        assert_eq!(q.samples_lower(), 1);
    }

    #[test]
    fn test_sample_inside_gap_collapses_it() {
        // Gap 1..4, then a sample lands inside the gap
        let mut s = store(&[0, 1, 0, 0, 1]);
        let mut q = tracked(1, 2, &s);
        assert_eq!(q.range(), QuantileRange::new(1, 4));

        s.add_at(2).unwrap();
        q.note_insert(2);
        q.adjust(&s);
        assert_eq!(q.range(), QuantileRange::point(2));
        assert_eq!(q.samples_lower(), 1);
    }

    #[test]
    fn test_outcome_display() {
        assert_eq!(AdjustOutcome::SlideUp.to_string(), "slide-up");
        assert_eq!(AdjustOutcome::RemoveMissed.to_string(), "remove-missed");
    }
}
