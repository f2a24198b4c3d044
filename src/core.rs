//! Core types and constants for bitsort.
//!
//! This module defines:
//! - [`Key`]: The element type being sorted.
//! - [`Block`]: An owned run of keys sharing one high-bit prefix.
//! - Bit helpers shared by the bucketer and the block sorter.

/// The element type sorted by this crate.
pub type Key = u64;

/// Width of a [`Key`] in bits.
pub const KEY_BITS: u32 = Key::BITS;

/// Number of keys the bucketer aims to put into each bucket.
pub const TARGET_BUCKET_LEN: usize = 100_000;

/// Upper bound on the number of prefix bits (2^16 buckets).
pub const MAX_PREFIX_BITS: u32 = 16;

/// Ranges at or below this length are handed to the finishing sort.
pub const DEFAULT_SMALL_RANGE_THRESHOLD: usize = 16;

// Finishing sort scratch is sized ceil(5n / 2).
pub(crate) const SCRATCH_NUMERATOR: usize = 5;
pub(crate) const SCRATCH_DENOMINATOR: usize = 2;

/// Returns the top `bits` bits of `key`.
///
/// `bits == 0` maps every key to prefix 0.
#[inline(always)]
pub fn prefix_of(key: Key, bits: u32) -> usize {
    debug_assert!(bits <= MAX_PREFIX_BITS);
    if bits == 0 {
        0
    } else {
        (key >> (KEY_BITS - bits)) as usize
    }
}

/// Returns the highest bit position at which the minimum and maximum of `keys` differ.
///
/// Every bit above the returned position is identical across all keys, so
/// partitioning can start there. Returns `None` for empty or constant input.
///
/// # Examples
///
/// ```
/// use bitsort::core::start_bit;
///
/// assert_eq!(start_bit(&[4, 5, 6]), Some(1));
/// assert_eq!(start_bit(&[7, 7]), None);
/// ```
pub fn start_bit(keys: &[Key]) -> Option<u32> {
    let (min, max) = min_max(keys)?;
    let span = min ^ max;
    if span == 0 {
        None
    } else {
        Some(KEY_BITS - 1 - span.leading_zeros())
    }
}

/// Minimum and maximum of a range in one pass.
#[inline]
pub(crate) fn min_max(keys: &[Key]) -> Option<(Key, Key)> {
    let (&first, rest) = keys.split_first()?;
    Some(
        rest.iter()
            .fold((first, first), |(min, max), &k| (min.min(k), max.max(k))),
    )
}

/// A contiguous, independently owned run of keys.
///
/// Every key in a block shares the same top bits (its [`prefix`](Block::prefix)).
/// A block is created unordered by the bucketer and sorted in place exactly once.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Block {
    prefix: usize,
    keys: Vec<Key>,
}

impl Block {
    pub(crate) fn new(prefix: usize, keys: Vec<Key>) -> Self {
        Self { prefix, keys }
    }

    /// The high-bit prefix shared by every key in this block.
    pub fn prefix(&self) -> usize {
        self.prefix
    }

    /// The keys of this block in their current order.
    pub fn keys(&self) -> &[Key] {
        &self.keys
    }

    pub(crate) fn keys_mut(&mut self) -> &mut [Key] {
        &mut self.keys
    }

    /// Number of keys in the block.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Returns `true` if the block holds no keys.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Returns `true` if the keys are in ascending order.
    pub fn is_sorted(&self) -> bool {
        self.keys.is_sorted()
    }
}

impl<'a> IntoIterator for &'a Block {
    type Item = &'a Key;
    type IntoIter = std::slice::Iter<'a, Key>;

    fn into_iter(self) -> Self::IntoIter {
        self.keys.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_of() {
        assert_eq!(prefix_of(u64::MAX, 0), 0);
        assert_eq!(prefix_of(u64::MAX, 1), 1);
        assert_eq!(prefix_of(u64::MAX, 16), 0xFFFF);
        assert_eq!(prefix_of(0x8000_0000_0000_0000, 4), 8);
        assert_eq!(prefix_of(0x0FFF_FFFF_FFFF_FFFF, 4), 0);
    }

    #[test]
    fn test_start_bit() {
        assert_eq!(start_bit(&[]), None);
        assert_eq!(start_bit(&[42]), None);
        assert_eq!(start_bit(&[9, 9, 9]), None);
        assert_eq!(start_bit(&[0, 1]), Some(0));
        assert_eq!(start_bit(&[0, u64::MAX]), Some(63));
        // 0b1000 ^ 0b1011 = 0b0011
        assert_eq!(start_bit(&[0b1011, 0b1000, 0b1010]), Some(1));
    }

    #[test]
    fn test_block_accessors() {
        let block = Block::new(3, vec![3, 1, 2]);
        assert_eq!(block.prefix(), 3);
        assert_eq!(block.len(), 3);
        assert!(!block.is_empty());
        assert!(!block.is_sorted());
        assert_eq!(block.into_iter().copied().collect::<Vec<_>>(), vec![3, 1, 2]);
    }
}
