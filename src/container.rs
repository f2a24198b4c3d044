//! Partitioned container and the ordered view over its blocks.

use std::iter::FusedIterator;

use crate::bucketer::{bucket_bits_with, partition};
use crate::config::{ConfigError, SortConfig};
use crate::core::{Block, Key};

/// Owns the input split into ordered, non-empty [`Block`]s.
///
/// Block prefixes are strictly increasing in storage order, so once every
/// block is sorted the [`view`](Container::view) yields the whole input in
/// ascending order. Before sorting, the view is partitioned but not ordered.
///
/// # Examples
///
/// ```
/// use bitsort::{Container, sort};
///
/// let mut container = Container::new(&[5, 3, 1, 4, 2], 1);
/// sort(&mut container, 1);
///
/// let sorted: Vec<u64> = container.view().copied().collect();
/// assert_eq!(sorted, vec![1, 2, 3, 4, 5]);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Container {
    blocks: Vec<Block>,
    len: usize,
    prefix_bits: u32,
}

impl Container {
    /// Partitions a copy of `data` into blocks sized for `threads` workers.
    ///
    /// # Panics
    ///
    /// Panics if `threads` is 0.
    pub fn new(data: &[Key], threads: usize) -> Self {
        assert!(threads >= 1, "thread count must be at least 1");
        Self::build(data, &SortConfig::default().with_threads(threads))
    }

    /// Partitions a copy of `data` using the bucketing parameters in `config`.
    pub fn with_config(data: &[Key], config: &SortConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(data, config))
    }

    pub(crate) fn build(data: &[Key], config: &SortConfig) -> Self {
        let prefix_bits = bucket_bits_with(data.len(), config);
        Self {
            blocks: partition(data, prefix_bits),
            len: data.len(),
            prefix_bits,
        }
    }

    /// The blocks in ascending prefix order.
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub(crate) fn blocks_mut(&mut self) -> &mut [Block] {
        &mut self.blocks
    }

    pub fn num_blocks(&self) -> usize {
        self.blocks.len()
    }

    /// Total number of keys across all blocks.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of high bits used to assign keys to blocks.
    pub fn prefix_bits(&self) -> u32 {
        self.prefix_bits
    }

    /// Returns `true` once every block is in ascending order.
    pub fn is_sorted(&self) -> bool {
        self.blocks.iter().all(Block::is_sorted)
    }

    /// Lazy view over the concatenation of all blocks.
    ///
    /// The view borrows the container and can be cloned to restart traversal.
    pub fn view(&self) -> View<'_> {
        View {
            blocks: self.blocks.iter(),
            current: Default::default(),
            remaining: self.len,
        }
    }

    /// Concatenates the blocks into a single vector.
    pub fn into_vec(self) -> Vec<Key> {
        let mut out = Vec::with_capacity(self.len);
        self.blocks
            .iter()
            .for_each(|block| out.extend_from_slice(block.keys()));
        out
    }
}

impl<'a> IntoIterator for &'a Container {
    type Item = &'a Key;
    type IntoIter = View<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.view()
    }
}

/// Forward iterator over the keys of a [`Container`] in block order.
#[derive(Clone, Debug)]
pub struct View<'a> {
    blocks: std::slice::Iter<'a, Block>,
    current: std::slice::Iter<'a, Key>,
    remaining: usize,
}

impl<'a> Iterator for View<'a> {
    type Item = &'a Key;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(key) = self.current.next() {
                self.remaining -= 1;
                return Some(key);
            }
            self.current = self.blocks.next()?.keys().iter();
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for View<'_> {}

impl FusedIterator for View<'_> {}
