//! Configured entry points tying bucketing and sorting together.

use crate::config::{ConfigError, SortConfig};
use crate::container::Container;
use crate::core::Key;
use crate::scheduler::sort_with;

/// A validated [`SortConfig`] bundled with the partition and sort steps.
///
/// # Examples
///
/// ```
/// use bitsort::{SortConfig, Sorter};
///
/// let sorter = Sorter::new(SortConfig::default().with_threads(2)).unwrap();
/// let sorted = sorter.sort_keys(&[9, 4, 7, 1]);
///
/// assert_eq!(sorted, vec![1, 4, 7, 9]);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Sorter {
    config: SortConfig,
}

impl Sorter {
    pub fn new(config: SortConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &SortConfig {
        &self.config
    }

    /// Copies `data` into a partitioned, not yet sorted [`Container`].
    pub fn partition(&self, data: &[Key]) -> Container {
        Container::build(data, &self.config)
    }

    /// Sorts every block of `container` in place.
    pub fn sort(&self, container: &mut Container) {
        sort_with(container, &self.config);
    }

    /// Partitions, sorts and collects `data` into a new ascending vector.
    pub fn sort_keys(&self, data: &[Key]) -> Vec<Key> {
        let mut container = self.partition(data);
        self.sort(&mut container);
        container.into_vec()
    }
}

/// Returns the keys of `data` in ascending order, sorted by `threads` workers.
///
/// # Panics
///
/// Panics if `threads` is 0.
///
/// # Examples
///
/// ```
/// use bitsort::sort_keys;
///
/// assert_eq!(sort_keys(&[3, 1, 2], 4), vec![1, 2, 3]);
/// ```
pub fn sort_keys(data: &[Key], threads: usize) -> Vec<Key> {
    assert!(threads >= 1, "thread count must be at least 1");
    Sorter {
        config: SortConfig::default().with_threads(threads),
    }
    .sort_keys(data)
}
