//! # Bitsort
//!
//! `bitsort` sorts large in-memory collections of `u64` keys in ascending order, spreading
//! the work over a fixed number of worker threads and exploiting the binary structure of
//! the keys instead of comparisons.
//!
//! ## How It Works
//!
//! 1. **Bucketing**: A counting partition on the top `B` bits splits the input into
//!    ordered, non-empty [`Block`]s. `B` is chosen so that there are roughly 100,000 keys
//!    per block, between 8 and 64 blocks per thread, and never more than 2^16 blocks.
//! 2. **Scheduling**: Workers share one atomic cursor over the blocks and repeatedly claim
//!    the next unsorted block, so uneven buckets do not leave threads idle.
//! 3. **Block Sorting**: Each block is split in place one bit at a time, starting at the
//!    highest bit where its minimum and maximum differ (MSD radix partition). Small ranges
//!    are finished with a robin hood distribution sort.
//! 4. **Viewing**: Because block prefixes ascend, the concatenation of the sorted blocks is
//!    the sorted input. [`Container::view`] walks it without copying.
//!
//! ## Usage
//!
//! ```rust
//! use bitsort::{Container, sort};
//!
//! let data = vec![42, 7, u64::MAX, 0, 7];
//!
//! let mut container = Container::new(&data, 4);
//! sort(&mut container, 4);
//!
//! let sorted: Vec<u64> = container.view().copied().collect();
//! assert_eq!(sorted, vec![0, 7, 7, 42, u64::MAX]);
//! ```
//!
//! ### Tuning
//!
//! ```rust
//! use bitsort::{SortConfig, Sorter};
//!
//! let config = SortConfig::with_available_parallelism().with_small_range_threshold(32);
//! let sorter = Sorter::new(config).expect("valid config");
//!
//! assert_eq!(sorter.sort_keys(&[3, 2, 1]), vec![1, 2, 3]);
//! ```
//!
//! ## Performance Characteristics
//!
//! - **Bucketing**: O(N) time, one counting pass and one scatter pass, O(N) extra memory.
//! - **Block Sorting**: at most 64 partition levels per key, with expected linear time
//!   finishing on small ranges.
//! - **Threads**: Spawned per sort call and joined before it returns.

pub mod algo;
pub mod bucketer;
pub mod config;
pub mod container;
pub mod core;
pub mod scheduler;
pub mod sorter;

pub use crate::config::{ConfigError, SortConfig};
pub use crate::container::{Container, View};
pub use crate::core::{Block, Key};
pub use crate::scheduler::sort;
pub use crate::sorter::{Sorter, sort_keys};

pub mod prelude {
    pub use crate::config::{ConfigError, SortConfig};
    pub use crate::container::{Container, View};
    pub use crate::core::{Block, Key};
    pub use crate::scheduler::sort;
    pub use crate::sorter::{Sorter, sort_keys};
}
