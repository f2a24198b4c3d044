//! Block sorting algorithms (MSD radix partition and robin hood finishing sort).
//!
//! A block is sorted in two stages:
//! - **MSD Radix Partition**: Splits the range in place on one bit at a time,
//!   most significant first, starting at the highest bit where the block's
//!   minimum and maximum differ.
//! - **Robin Hood Sort**: Once a range is small enough, its keys are spread
//!   over an oversized scratch buffer by linear interpolation between the
//!   range's minimum and maximum, collisions are resolved by shifting, and the
//!   occupied slots are compacted back in order.
//!
//! The main entry point is [`sort_block`].

use crate::core::{Key, SCRATCH_DENOMINATOR, SCRATCH_NUMERATOR, min_max, start_bit};

/// Reusable workspace for the finishing sort.
///
/// One scratch buffer serves every small range of a block; it is cleared
/// and resized on each use and released when dropped.
#[derive(Debug, Default)]
pub struct Scratch {
    slots: Vec<Option<Key>>,
}

impl Scratch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of interpolation targets for a range of `n` keys: `ceil(5n / 2)`.
    #[inline]
    pub fn span_for(n: usize) -> usize {
        (SCRATCH_NUMERATOR * n).div_ceil(SCRATCH_DENOMINATOR)
    }

    /// Resets the buffer for `n` keys and returns the interpolation span.
    ///
    /// `n` extra slots trail the span. At most `n - 1` slots are occupied when
    /// a key is placed, so a displacement chain starting inside the span
    /// always finds an empty slot before the end of the buffer.
    fn prepare(&mut self, n: usize) -> usize {
        let span = Self::span_for(n);
        self.slots.clear();
        self.slots.resize(span + n, None);
        span
    }
}

/// Sorts `keys` in ascending order, in place.
///
/// Ranges of at most `threshold` keys are finished with [`robin_hood_sort`].
/// Constant and empty input is left untouched.
///
/// # Examples
///
/// ```
/// use bitsort::algo::sort_block;
///
/// let mut keys = vec![5, 3, 1, 4, 2];
/// sort_block(&mut keys, 16);
/// assert_eq!(keys, vec![1, 2, 3, 4, 5]);
/// ```
pub fn sort_block(keys: &mut [Key], threshold: usize) {
    if keys.len() <= 1 {
        return;
    }
    let Some(bit) = start_bit(keys) else {
        return;
    };
    let mut scratch = Scratch::new();
    msd_radix_sort(keys, bit, threshold, &mut scratch);
}

/// MSD radix partition step.
///
/// Partitions `keys` on `bit` so that keys with the bit cleared come first,
/// then recurses into both halves with `bit - 1`. The recursion depth is
/// bounded by the key width.
pub fn msd_radix_sort(keys: &mut [Key], bit: u32, threshold: usize, scratch: &mut Scratch) {
    if keys.len() <= 1 {
        return;
    }

    if keys.len() <= threshold {
        robin_hood_sort(keys, scratch);
        return;
    }

    let split = partition_on_bit(keys, 1 << bit);

    // bit 0 was the last one; both halves are constant now
    if bit == 0 {
        return;
    }

    let (zeros, ones) = keys.split_at_mut(split);
    msd_radix_sort(zeros, bit - 1, threshold, scratch);
    msd_radix_sort(ones, bit - 1, threshold, scratch);
}

/// Two-pointer in-place partition on `mask`.
///
/// Returns the split index: keys before it have the masked bit cleared, keys
/// at or after it have it set. `keys` must not be empty.
#[inline]
fn partition_on_bit(keys: &mut [Key], mask: Key) -> usize {
    let is_set = |k: Key| k & mask != 0;

    let mut i = 0;
    let mut j = keys.len() - 1;
    // until left and right meet
    while i < j {
        while i < j && !is_set(keys[i]) {
            i += 1;
        }
        while i < j && is_set(keys[j]) {
            j -= 1;
        }
        if i < j {
            keys.swap(i, j);
        }
    }

    // the boundary sits either at i or right after it
    if is_set(keys[i]) { i } else { i + 1 }
}

/// Robin hood distribution sort for small ranges.
///
/// Each key is aimed at the slot given by interpolating it between the
/// range's minimum and maximum. Occupied slots are walked past while they
/// hold smaller keys, and the remaining run is shifted one slot to the right
/// to make room. Compacting the occupied slots yields the sorted range.
///
/// Expected linear time for keys spread evenly over their range.
pub fn robin_hood_sort(keys: &mut [Key], scratch: &mut Scratch) {
    let n = keys.len();
    let Some((min, max)) = min_max(keys) else {
        return;
    };
    if min == max {
        return;
    }

    let span = scratch.prepare(n);
    let slots = &mut scratch.slots;
    let range = (max - min) as u128;
    let last = (span - 1) as u128;

    for &key in keys.iter() {
        let mut index = ((key - min) as u128 * last / range) as usize;
        let mut pending = Some(key);

        // skip past smaller keys already placed
        while let Some(placed) = slots[index] {
            if placed >= key {
                break;
            }
            index += 1;
        }
        // shift the rest of the run right until a hole is found
        while pending.is_some() {
            pending = std::mem::replace(&mut slots[index], pending);
            index += 1;
        }
    }

    let mut out = 0;
    for key in slots.iter().flatten() {
        keys[out] = *key;
        out += 1;
    }
    debug_assert_eq!(out, n);
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn check_sorted(mut input: Vec<Key>, threshold: usize) {
        let mut expected = input.clone();
        expected.sort_unstable();
        sort_block(&mut input, threshold);
        assert_eq!(input, expected);
    }

    #[test]
    fn test_partition_on_bit() {
        let mut keys = vec![0b110, 0b010, 0b100, 0b000, 0b111, 0b001];
        let split = partition_on_bit(&mut keys, 0b100);
        assert_eq!(split, 3);
        assert!(keys[..split].iter().all(|k| k & 0b100 == 0));
        assert!(keys[split..].iter().all(|k| k & 0b100 != 0));
    }

    #[test]
    fn test_partition_on_bit_one_sided() {
        let mut zeros = vec![1, 2, 3];
        assert_eq!(partition_on_bit(&mut zeros, 1 << 10), 3);

        let mut ones = vec![1 << 10, 1 << 10 | 1];
        assert_eq!(partition_on_bit(&mut ones, 1 << 10), 0);

        let mut single = vec![0];
        assert_eq!(partition_on_bit(&mut single, 1), 1);
    }

    #[test]
    fn test_sort_block_scenario() {
        check_sorted(vec![5, 3, 1, 4, 2], 16);
        check_sorted(vec![5, 3, 1, 4, 2], 1);
    }

    #[test]
    fn test_constant_block_untouched() {
        let mut keys = vec![7; 50];
        sort_block(&mut keys, 16);
        assert_eq!(keys, vec![7; 50]);
    }

    #[test]
    fn test_robin_hood_small_ranges() {
        let mut scratch = Scratch::new();

        let mut empty: Vec<Key> = vec![];
        robin_hood_sort(&mut empty, &mut scratch);
        assert!(empty.is_empty());

        let mut keys = vec![9, 0, 4, 4, 1, 9, 2];
        robin_hood_sort(&mut keys, &mut scratch);
        assert_eq!(keys, vec![0, 1, 2, 4, 4, 9, 9]);

        let mut extremes = vec![u64::MAX, 0, u64::MAX / 2, 1, u64::MAX - 1];
        robin_hood_sort(&mut extremes, &mut scratch);
        assert_eq!(extremes, vec![0, 1, u64::MAX / 2, u64::MAX - 1, u64::MAX]);
    }

    #[test]
    fn test_robin_hood_pileup_at_maximum() {
        // every key but one lands on the last interpolation slot
        let mut scratch = Scratch::new();
        let mut keys = vec![1_000; 31];
        keys.push(0);
        robin_hood_sort(&mut keys, &mut scratch);

        let mut expected = vec![0];
        expected.extend(std::iter::repeat_n(1_000, 31));
        assert_eq!(keys, expected);
    }

    #[test]
    fn test_robin_hood_descending() {
        let mut scratch = Scratch::new();
        let mut keys: Vec<Key> = (0..64).rev().collect();
        robin_hood_sort(&mut keys, &mut scratch);
        assert_eq!(keys, (0..64).collect::<Vec<Key>>());
    }

    #[test]
    fn test_scratch_span() {
        assert_eq!(Scratch::span_for(0), 0);
        assert_eq!(Scratch::span_for(1), 3);
        assert_eq!(Scratch::span_for(2), 5);
        assert_eq!(Scratch::span_for(16), 40);
    }

    #[test]
    fn test_sort_block_thresholds() {
        let mut rng = StdRng::seed_from_u64(42);
        for threshold in [1, 2, 16, 32, 1024] {
            let input: Vec<Key> = (0..5_000).map(|_| rng.random()).collect();
            check_sorted(input, threshold);
        }
    }

    #[test]
    fn test_sort_block_narrow_and_duplicate_keys() {
        let mut rng = StdRng::seed_from_u64(7);
        let narrow: Vec<Key> = (0..5_000).map(|_| rng.random_range(0..10)).collect();
        check_sorted(narrow, 16);

        let high: Vec<Key> = (0..5_000)
            .map(|_| u64::MAX - rng.random_range(0..1_000))
            .collect();
        check_sorted(high, 32);

        let two_values: Vec<Key> = (0..5_000)
            .map(|i| if i % 3 == 0 { 0 } else { u64::MAX })
            .collect();
        check_sorted(two_values, 16);
    }
}
