//! Initial radix split of the input into ordered, non-empty blocks.
//!
//! The bucketer picks a number of high bits `B` from the input size and the
//! thread count, then runs a counting partition on those bits:
//!
//! 1. Count the keys per prefix.
//! 2. Prefix-sum the counts into starting offsets.
//! 3. Scatter every key into a fresh buffer at its prefix's next free slot.
//!
//! Empty prefixes are dropped; the remaining buckets become [`Block`]s in
//! ascending prefix order.

use crate::config::SortConfig;
use crate::core::{Block, Key, prefix_of};
use log::debug;

/// Chooses the number of prefix bits for `len` keys sorted by `threads` workers.
///
/// Uses the default target bucket length and bit cap. See [`bucket_bits_with`].
pub fn bucket_bits(len: usize, threads: usize) -> u32 {
    bucket_bits_with(len, &SortConfig::default().with_threads(threads))
}

/// Chooses the number of prefix bits for `len` keys under `config`.
///
/// The bucket count starts at `ceil(len / target_bucket_len)`, is clamped into
/// `[max(8T, 64), max(64T, 256)]`, rounded up to a power of two and converted
/// to its log2, capped at `max_prefix_bits`. Empty input uses one bit.
///
/// # Examples
///
/// ```
/// use bitsort::bucketer::bucket_bits;
///
/// assert_eq!(bucket_bits(0, 4), 1);
/// assert_eq!(bucket_bits(1_000, 1), 6); // 64 buckets
/// assert_eq!(bucket_bits(100_000_000, 1), 8); // clamped to 256 buckets
/// ```
pub fn bucket_bits_with(len: usize, config: &SortConfig) -> u32 {
    if len == 0 {
        return 1;
    }

    let threads = config.threads().max(1);
    let cap = config.max_prefix_bits();

    let by_size = len.div_ceil(config.target_bucket_len().max(1));
    let min_buckets = threads.saturating_mul(8).max(64);
    let max_buckets = threads.saturating_mul(64).max(256);

    let buckets = by_size.clamp(min_buckets, max_buckets);
    match buckets.checked_next_power_of_two() {
        Some(buckets) => buckets.trailing_zeros().min(cap),
        None => cap,
    }
}

/// Splits `data` into non-empty blocks keyed by their top `bits` bits.
///
/// The concatenation of the returned blocks is a permutation of `data`, and
/// block prefixes are strictly increasing.
pub fn partition(data: &[Key], bits: u32) -> Vec<Block> {
    let num_buckets = 1usize << bits;

    // 1. Count frequencies per prefix
    let mut counts = vec![0usize; num_buckets];
    data.iter().for_each(|&k| counts[prefix_of(k, bits)] += 1);

    // 2. Compute offsets (prefix sum)
    let mut starts = vec![0usize; num_buckets];
    let mut sum = 0;
    starts
        .iter_mut()
        .zip(counts.iter())
        .for_each(|(start, &count)| {
            *start = sum;
            sum += count;
        });

    // 3. Scatter into buffer
    let mut buffer = vec![0 as Key; data.len()];
    let mut cursors = starts.clone();
    data.iter().for_each(|&k| {
        let p = prefix_of(k, bits);
        buffer[cursors[p]] = k;
        cursors[p] += 1;
    });

    // 4. Cut non-empty buckets into owned blocks
    let blocks: Vec<Block> = counts
        .iter()
        .zip(starts.iter())
        .enumerate()
        .filter(|(_, (count, _))| **count > 0)
        .map(|(prefix, (&count, &start))| {
            Block::new(prefix, buffer[start..start + count].to_vec())
        })
        .collect();

    debug!(
        "partitioned {} keys on {} prefix bits into {} of {} buckets",
        data.len(),
        bits,
        blocks.len(),
        num_buckets
    );

    blocks
}
