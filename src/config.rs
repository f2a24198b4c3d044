//! Tunable parameters for bucketing and sorting.

use crate::core::{DEFAULT_SMALL_RANGE_THRESHOLD, MAX_PREFIX_BITS, TARGET_BUCKET_LEN};

/// Errors reported when validating a [`SortConfig`].
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// At least one worker thread is required.
    #[error("thread count must be at least 1")]
    ZeroThreads,

    /// The finishing sort threshold must cover at least one key.
    #[error("small-range threshold must be at least 1")]
    ZeroThreshold,

    /// The bucketer cannot aim for empty buckets.
    #[error("target bucket length must be at least 1")]
    ZeroBucketTarget,

    /// Prefix bit cap outside of `1..=16`.
    #[error("prefix bit cap {bits} is outside 1..={max}", max = MAX_PREFIX_BITS)]
    PrefixBitsOutOfRange { bits: u32 },
}

/// Configuration shared by the bucketer, the scheduler and the block sorter.
///
/// # Examples
///
/// ```
/// use bitsort::SortConfig;
///
/// let config = SortConfig::default()
///     .with_threads(4)
///     .with_small_range_threshold(32);
///
/// assert!(config.validate().is_ok());
/// assert_eq!(config.threads(), 4);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SortConfig {
    threads: usize,
    small_range_threshold: usize,
    target_bucket_len: usize,
    max_prefix_bits: u32,
}

impl Default for SortConfig {
    fn default() -> Self {
        Self {
            threads: 1,
            small_range_threshold: DEFAULT_SMALL_RANGE_THRESHOLD,
            target_bucket_len: TARGET_BUCKET_LEN,
            max_prefix_bits: MAX_PREFIX_BITS,
        }
    }
}

impl SortConfig {
    /// Default configuration using one worker per available hardware thread.
    pub fn with_available_parallelism() -> Self {
        let threads = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        Self::default().with_threads(threads)
    }

    /// Number of worker threads; 1 selects the sequential path.
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }

    /// Range length at or below which the MSD partition hands over to the finishing sort.
    pub fn with_small_range_threshold(mut self, threshold: usize) -> Self {
        self.small_range_threshold = threshold;
        self
    }

    /// Number of keys the bucketer aims to place in each bucket.
    pub fn with_target_bucket_len(mut self, len: usize) -> Self {
        self.target_bucket_len = len;
        self
    }

    /// Cap on the number of high bits used to pick a bucket.
    pub fn with_max_prefix_bits(mut self, bits: u32) -> Self {
        self.max_prefix_bits = bits;
        self
    }

    pub fn threads(&self) -> usize {
        self.threads
    }

    pub fn small_range_threshold(&self) -> usize {
        self.small_range_threshold
    }

    pub fn target_bucket_len(&self) -> usize {
        self.target_bucket_len
    }

    pub fn max_prefix_bits(&self) -> u32 {
        self.max_prefix_bits
    }

    /// Checks every parameter for a usable value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.threads == 0 {
            return Err(ConfigError::ZeroThreads);
        }
        if self.small_range_threshold == 0 {
            return Err(ConfigError::ZeroThreshold);
        }
        if self.target_bucket_len == 0 {
            return Err(ConfigError::ZeroBucketTarget);
        }
        if self.max_prefix_bits == 0 || self.max_prefix_bits > MAX_PREFIX_BITS {
            return Err(ConfigError::PrefixBitsOutOfRange {
                bits: self.max_prefix_bits,
            });
        }
        Ok(())
    }
}
