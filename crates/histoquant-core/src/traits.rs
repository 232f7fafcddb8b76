//! Core traits shared by stores and trackers

/// Sample count held by one bucket
pub type Count = u64;

/// Read access to a fixed array of bucket counts
///
/// Tracked quantiles receive the store as a parameter on every call rather
/// than holding on to it, so any implementation can be plugged in without
/// lifetime coupling.
pub trait BucketStore {
    /// Number of buckets; fixed for the lifetime of the store
    fn bins(&self) -> usize;

    /// Count held by bucket `index`
    ///
    /// Callers guarantee `index < self.bins()`.
    fn count_at(&self, index: usize) -> Count;

    /// Total number of samples across all buckets
    fn population(&self) -> Count;

    /// Samples held in buckets strictly below `index`
    ///
    /// This is an O(index) scan.
    fn count_below(&self, index: usize) -> Count {
        (0..index.min(self.bins())).map(|i| self.count_at(i)).sum()
    }

    /// Sum of every bucket, recomputed from scratch
    fn sum_counts(&self) -> Count {
        (0..self.bins()).map(|i| self.count_at(i)).sum()
    }
}

impl<S: BucketStore + ?Sized> BucketStore for &S {
    fn bins(&self) -> usize {
        (**self).bins()
    }

    fn count_at(&self, index: usize) -> Count {
        (**self).count_at(index)
    }

    fn population(&self) -> Count {
        (**self).population()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(Vec<Count>);

    impl BucketStore for Fixed {
        fn bins(&self) -> usize {
            self.0.len()
        }

        fn count_at(&self, index: usize) -> Count {
            self.0[index]
        }

        fn population(&self) -> Count {
            self.0.iter().sum()
        }
    }

    #[test]
    fn test_default_scans() {
        let store = Fixed(vec![1, 0, 4, 2]);
        assert_eq!(store.count_below(0), 0);
        assert_eq!(store.count_below(3), 5);
        assert_eq!(store.count_below(99), 7);
        assert_eq!(store.sum_counts(), store.population());

        let by_ref = &store;
        assert_eq!(by_ref.count_below(4), 7);
    }
}
