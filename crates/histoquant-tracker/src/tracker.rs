//! Histogram with incrementally tracked quantiles

use crate::tracked::{AdjustOutcome, TrackedQuantile};
use histoquant_core::{BucketStore, Count, Error, QuantileFraction, QuantileRange, Result};
use histoquant_histogram::{Binning, BucketBounds, BucketCounts, IndexBinning};
use tracing::{debug, instrument};

/// Why a mutation was not applied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MissReason {
    /// The binning rejected the value
    Rejected,
    /// The value's bucket held no samples to remove
    EmptyBucket,
    /// A bucket count or the population is already at its maximum
    Overflow,
}

/// Result of a single-sample mutation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mutation {
    /// The store changed and every quantile was adjusted
    Applied,
    /// The mutation had no net effect, e.g. a replace within one bucket
    Unchanged,
    /// Nothing changed; the reason is recorded for diagnostics
    Missed(MissReason),
}

impl Mutation {
    pub fn is_applied(&self) -> bool {
        matches!(self, Mutation::Applied)
    }

    pub fn is_missed(&self) -> bool {
        matches!(self, Mutation::Missed(_))
    }
}

/// A bucketed histogram that keeps a set of quantiles up to date
///
/// Every insert, remove or replace mutates the store first and then
/// adjusts each tracked quantile, visiting only the buckets the quantile
/// moves across. The tracker is single-writer: it holds no locks.
#[derive(Debug, Clone)]
pub struct QuantileTracker<B: Binning = IndexBinning> {
    binning: B,
    store: BucketCounts,
    quantiles: Vec<TrackedQuantile>,
    missed: u64,
}

impl QuantileTracker<IndexBinning> {
    /// Create a tracker over bucket indices `0..bins`
    ///
    /// Fails with [`Error::InvalidQuantile`] if any ratio is invalid, and
    /// with [`Error::InvalidParameter`] if `bins` is zero.
    pub fn with_bins(bins: usize, ratios: &[(i64, i64)]) -> Result<Self> {
        Self::from_ratios(IndexBinning::new(bins)?, ratios)
    }
}

impl<B: Binning> QuantileTracker<B> {
    /// Create an empty tracker for `binning` tracking each of `fractions`
    pub fn new(binning: B, fractions: &[QuantileFraction]) -> Result<Self> {
        let store = BucketCounts::new(binning.bins())?;
        let quantiles = fractions
            .iter()
            .map(|&q| TrackedQuantile::new(q, &store))
            .collect();
        debug!(
            "Created tracker with {} bins and {} quantiles",
            store.bins(),
            fractions.len()
        );
        Ok(Self {
            binning,
            store,
            quantiles,
            missed: 0,
        })
    }

    /// Create a tracker over existing counts, e.g. restored from a snapshot
    ///
    /// Fails with [`Error::InvalidParameter`] if the store and binning
    /// disagree on the number of buckets.
    pub fn with_store(
        binning: B,
        store: BucketCounts,
        fractions: &[QuantileFraction],
    ) -> Result<Self> {
        if store.bins() != binning.bins() {
            return Err(Error::InvalidParameter(format!(
                "store has {} buckets but binning has {}",
                store.bins(),
                binning.bins()
            )));
        }
        let quantiles = fractions
            .iter()
            .map(|&q| TrackedQuantile::new(q, &store))
            .collect();
        Ok(Self {
            binning,
            store,
            quantiles,
            missed: 0,
        })
    }

    /// Create a tracker from raw `(numerator, denominator)` pairs
    ///
    /// All pairs are validated before anything is built.
    pub fn from_ratios(binning: B, ratios: &[(i64, i64)]) -> Result<Self> {
        let fractions = validate_ratios(ratios)?;
        Self::new(binning, &fractions)
    }

    /// Start tracking more quantiles against the current contents
    ///
    /// Each new quantile is initialized with one O(bins) recalculation.
    pub fn add_quantiles(&mut self, fractions: &[QuantileFraction]) {
        self.quantiles.reserve(fractions.len());
        for &q in fractions {
            debug!("Tracking quantile {}", q);
            self.quantiles.push(TrackedQuantile::new(q, &self.store));
        }
    }

    /// Like [`add_quantiles`](Self::add_quantiles) for raw pairs; adds
    /// nothing if any pair is invalid
    pub fn add_ratios(&mut self, ratios: &[(i64, i64)]) -> Result<()> {
        let fractions = validate_ratios(ratios)?;
        self.add_quantiles(&fractions);
        Ok(())
    }

    /// Recount the population and resynchronize every quantile from scratch
    ///
    /// O(bins) per quantile. Mutations never call this; it exists to
    /// recover after external tampering or to verify the incremental path.
    #[instrument(level = "debug", skip(self), fields(quantiles = self.quantiles.len()))]
    pub fn recalculate(&mut self) {
        self.store.recount();
        for q in &mut self.quantiles {
            q.recalculate(&self.store, 0);
        }
    }

    /// Insert one sample
    pub fn insert(&mut self, value: B::Value) -> Mutation {
        match self.binning.index_for(value) {
            Some(index) => self.insert_index(index),
            None => self.miss(MissReason::Rejected, AdjustOutcome::InsertMissed),
        }
    }

    /// Remove one sample
    pub fn remove(&mut self, value: B::Value) -> Mutation {
        match self.binning.index_for(value) {
            Some(index) => self.remove_index(index),
            None => self.miss(MissReason::Rejected, AdjustOutcome::RemoveMissed),
        }
    }

    /// Replace `old_value` with `new_value`
    ///
    /// Equivalent to removing the old sample and inserting the new one, but
    /// each quantile is adjusted once with the combined delta. If either
    /// value is rejected by the binning (or the old bucket is empty) this
    /// degrades to a plain insert or remove of the other value.
    ///
    /// Replacing a value with itself never changes anything, including the
    /// miss counter, even when the binning rejects that value.
    pub fn replace(&mut self, new_value: B::Value, old_value: B::Value) -> Mutation {
        if new_value == old_value {
            return Mutation::Unchanged;
        }
        let new_index = match self.binning.index_for(new_value) {
            Some(index) => index,
            None => return self.remove(old_value),
        };
        let old_index = match self.binning.index_for(old_value) {
            Some(index) => index,
            None => return self.insert_index(new_index),
        };
        if new_index == old_index {
            return Mutation::Unchanged;
        }

        match self.store.move_sample(old_index, new_index) {
            Ok(()) => {}
            Err(Error::EmptyBucket { .. }) => return self.insert_index(new_index),
            Err(e) => {
                debug!("Replace {} -> {} failed: {}", old_index, new_index, e);
                return self.miss(miss_reason(&e), AdjustOutcome::InsertMissed);
            }
        }

        // The skip for samples landing on the same side of a quantile is
        // deliberately absent: it mishandles quantiles sitting on a gap.
        for q in &mut self.quantiles {
            q.note_insert(new_index);
            q.note_remove(old_index);
            q.adjust(&self.store);
        }
        Mutation::Applied
    }

    fn insert_index(&mut self, index: usize) -> Mutation {
        if let Err(e) = self.store.add_at(index) {
            debug!("Insert into bucket {} failed: {}", index, e);
            return self.miss(miss_reason(&e), AdjustOutcome::InsertMissed);
        }
        for q in &mut self.quantiles {
            q.note_insert(index);
            q.adjust(&self.store);
        }
        Mutation::Applied
    }

    fn remove_index(&mut self, index: usize) -> Mutation {
        if let Err(e) = self.store.sub_at(index) {
            debug!("Remove from bucket {} failed: {}", index, e);
            return self.miss(miss_reason(&e), AdjustOutcome::RemoveMissed);
        }
        for q in &mut self.quantiles {
            q.note_remove(index);
            q.adjust(&self.store);
        }
        Mutation::Applied
    }

    fn miss(&mut self, reason: MissReason, outcome: AdjustOutcome) -> Mutation {
        self.missed += 1;
        debug!("Mutation missed ({:?}), {} misses so far", reason, self.missed);
        for q in &mut self.quantiles {
            q.mark(outcome);
        }
        Mutation::Missed(reason)
    }

    pub fn binning(&self) -> &B {
        &self.binning
    }

    /// The underlying bucket store
    pub fn store(&self) -> &BucketCounts {
        &self.store
    }

    pub fn bins(&self) -> usize {
        self.store.bins()
    }

    /// Total number of samples
    pub fn population(&self) -> Count {
        self.store.population()
    }

    /// Count held by bucket `index`, or `None` outside the store
    pub fn count_at(&self, index: usize) -> Option<Count> {
        self.store.get(index)
    }

    pub fn counts(&self) -> &[Count] {
        self.store.counts()
    }

    pub fn quantiles(&self) -> &[TrackedQuantile] {
        &self.quantiles
    }

    pub fn quantile(&self, i: usize) -> Option<&TrackedQuantile> {
        self.quantiles.get(i)
    }

    /// Number of mutations that were not applied since construction
    pub fn missed(&self) -> u64 {
        self.missed
    }
}

impl<B: BucketBounds> QuantileTracker<B> {
    /// Value bounds of the `i`th tracked quantile
    pub fn quantile_values(&self, i: usize) -> Option<QuantileRange<B::Value>> {
        let range = self.quantiles.get(i)?.range();
        Some(QuantileRange::new(
            self.binning.bucket_min(range.lower),
            self.binning.bucket_max(range.upper),
        ))
    }
}

fn miss_reason(error: &Error) -> MissReason {
    match error {
        Error::EmptyBucket { .. } => MissReason::EmptyBucket,
        Error::Overflow(_) => MissReason::Overflow,
        _ => MissReason::Rejected,
    }
}

pub(crate) fn validate_ratios(ratios: &[(i64, i64)]) -> Result<Vec<QuantileFraction>> {
    ratios
        .iter()
        .map(|&(n, d)| QuantileFraction::new(n, d))
        .collect()
}
