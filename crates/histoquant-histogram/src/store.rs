//! Dense bucket storage

use histoquant_core::{BucketStore, Count, Error, Result};
use tracing::debug;

/// A fixed number of buckets with a running population total
///
/// The population is maintained alongside every mutation so reads are O(1);
/// [`BucketCounts::recount`] recomputes it from the buckets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BucketCounts {
    counts: Vec<Count>,
    population: Count,
}

impl BucketCounts {
    /// Create `bins` empty buckets
    pub fn new(bins: usize) -> Result<Self> {
        if bins == 0 {
            return Err(Error::zero_bins("bucket store"));
        }
        Ok(Self {
            counts: vec![0; bins],
            population: 0,
        })
    }

    /// Create a store holding the given counts
    pub fn from_counts(counts: Vec<Count>) -> Result<Self> {
        if counts.is_empty() {
            return Err(Error::zero_bins("bucket store"));
        }
        let mut population: Count = 0;
        for &c in &counts {
            population = population
                .checked_add(c)
                .ok_or_else(|| Error::Overflow("bucket population".to_string()))?;
        }
        Ok(Self { counts, population })
    }

    /// Get the counts as a slice
    pub fn counts(&self) -> &[Count] {
        &self.counts
    }

    /// Count at `index`, or `None` outside the store
    pub fn get(&self, index: usize) -> Option<Count> {
        self.counts.get(index).copied()
    }

    /// Check if the store holds no samples
    pub fn is_empty(&self) -> bool {
        self.population == 0
    }

    /// Add one sample to bucket `index`
    pub fn add_at(&mut self, index: usize) -> Result<()> {
        Error::check_index(index, self.counts.len())?;
        let population = self
            .population
            .checked_add(1)
            .ok_or_else(|| Error::Overflow("bucket population".to_string()))?;
        // Every bucket is bounded by the population, so this cannot overflow
        self.counts[index] += 1;
        self.population = population;
        Ok(())
    }

    /// Remove one sample from bucket `index`
    pub fn sub_at(&mut self, index: usize) -> Result<()> {
        Error::check_index(index, self.counts.len())?;
        let count = &mut self.counts[index];
        if *count == 0 {
            return Err(Error::EmptyBucket { index });
        }
        *count -= 1;
        self.population -= 1;
        Ok(())
    }

    /// Move one sample from bucket `from` to bucket `to`
    ///
    /// Either both buckets change or neither does. The population is
    /// unchanged.
    pub fn move_sample(&mut self, from: usize, to: usize) -> Result<()> {
        let bins = self.counts.len();
        Error::check_index(from, bins)?;
        Error::check_index(to, bins)?;
        if self.counts[from] == 0 {
            return Err(Error::EmptyBucket { index: from });
        }
        if from == to {
            return Ok(());
        }
        if self.counts[to] == Count::MAX {
            return Err(Error::Overflow(format!("count of bucket {to}")));
        }
        self.counts[from] -= 1;
        self.counts[to] += 1;
        Ok(())
    }

    /// Recompute the population from the buckets and return it
    pub fn recount(&mut self) -> Count {
        let total = self.sum_counts();
        if total != self.population {
            debug!(
                "Bucket population drifted: tracked {}, recounted {}",
                self.population, total
            );
        }
        self.population = total;
        total
    }

    /// Empty every bucket
    pub fn clear(&mut self) {
        self.counts.iter_mut().for_each(|c| *c = 0);
        self.population = 0;
    }

    /// Iterate over `(index, count)` for non-empty buckets
    pub fn occupied(&self) -> impl Iterator<Item = (usize, Count)> + '_ {
        self.counts
            .iter()
            .enumerate()
            .filter(|(_, c)| **c != 0)
            .map(|(i, c)| (i, *c))
    }
}

impl BucketStore for BucketCounts {
    #[inline]
    fn bins(&self) -> usize {
        self.counts.len()
    }

    #[inline]
    fn count_at(&self, index: usize) -> Count {
        self.counts[index]
    }

    #[inline]
    fn population(&self) -> Count {
        self.population
    }
}
