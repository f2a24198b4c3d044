//! Distribution of blocks over worker threads.
//!
//! One thread sorts the blocks in storage order. More threads share a single
//! atomic cursor over block indices: each worker claims the next index,
//! sorts that block, and repeats until the cursor runs past the end. Workers
//! that finish large blocks early pick up the remaining small ones.

use std::marker::PhantomData;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;

use cuneiform::cuneiform;
use log::{debug, trace, warn};

use crate::algo::sort_block;
use crate::config::SortConfig;
use crate::container::Container;
use crate::core::Block;

/// Sorts every block of `container` in place using `threads` workers.
///
/// `threads == 1` runs on the calling thread; more threads spawn a
/// fixed set of scoped workers that are joined before returning.
///
/// # Panics
///
/// Panics if `threads` is 0, or if a worker panics.
pub fn sort(container: &mut Container, threads: usize) {
    assert!(threads >= 1, "thread count must be at least 1");
    sort_with(container, &SortConfig::default().with_threads(threads));
}

/// Sorts every block of `container` with the threads and threshold in `config`.
pub(crate) fn sort_with(container: &mut Container, config: &SortConfig) {
    let threshold = config.small_range_threshold();
    let blocks = container.blocks_mut();
    if config.threads() <= 1 {
        sort_sequential(blocks, threshold);
    } else {
        sort_parallel(blocks, config.threads(), threshold);
    }
}

fn sort_sequential(blocks: &mut [Block], threshold: usize) {
    blocks
        .iter_mut()
        .filter(|block| block.len() > 1)
        .for_each(|block| sort_block(block.keys_mut(), threshold));
    debug!("sorted {} blocks sequentially", blocks.len());
}

fn sort_parallel(blocks: &mut [Block], threads: usize, threshold: usize) {
    let queue = BlockQueue::new(blocks);
    let workers = threads.min(queue.len());
    if workers == 0 {
        return;
    }

    thread::scope(|s| {
        for id in 0..workers {
            let queue = &queue;
            let spawned = thread::Builder::new()
                .name(format!("bitsort-worker-{id}"))
                .spawn_scoped(s, move || drain(queue, id, threshold));

            if let Err(err) = spawned {
                warn!("failed to spawn worker {id}: {err}; sorting remaining blocks on the caller");
                drain(queue, id, threshold);
                break;
            }
        }
    });

    debug!("sorted {} blocks on {} workers", queue.len(), workers);
}

/// Claims and sorts blocks until none remain; returns how many were claimed.
fn drain(queue: &BlockQueue<'_>, id: usize, threshold: usize) -> usize {
    let mut claimed = 0;
    while let Some(block) = queue.claim() {
        claimed += 1;
        // single keys are already in order
        if block.len() > 1 {
            sort_block(block.keys_mut(), threshold);
        }
    }
    trace!("worker {id} sorted {claimed} blocks");
    claimed
}

// Cache-aligned work cursor.
#[cuneiform]
struct WorkCursor {
    next: AtomicUsize,
}

/// Hands out exclusive references to the blocks of a slice, each exactly once.
struct BlockQueue<'a> {
    base: *mut Block,
    len: usize,
    cursor: WorkCursor,
    _blocks: PhantomData<&'a mut [Block]>,
}

// SAFETY: every block is handed to at most one thread (see `claim`), and
// `Block` is `Send`.
unsafe impl Sync for BlockQueue<'_> {}

impl<'a> BlockQueue<'a> {
    fn new(blocks: &'a mut [Block]) -> Self {
        Self {
            base: blocks.as_mut_ptr(),
            len: blocks.len(),
            cursor: WorkCursor {
                next: AtomicUsize::new(0),
            },
            _blocks: PhantomData,
        }
    }

    fn len(&self) -> usize {
        self.len
    }

    /// Claims the next unclaimed block, or `None` once all have been handed out.
    ///
    /// Relaxed ordering suffices: the cursor only has to hand out distinct
    /// indices. Block contents are published to the caller by the scope join.
    fn claim(&self) -> Option<&'a mut Block> {
        let index = self.cursor.next.fetch_add(1, Ordering::Relaxed);
        if index >= self.len {
            return None;
        }
        // SAFETY: `index < len` keeps the pointer inside the slice borrowed for
        // `'a`, and `fetch_add` returns each index once, so no two claims alias.
        Some(unsafe { &mut *self.base.add(index) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn random_keys(len: usize, seed: u64) -> Vec<u64> {
        let mut rng = StdRng::seed_from_u64(seed);
        (0..len).map(|_| rng.random()).collect()
    }

    #[test]
    fn test_queue_claims_each_block_once() {
        let mut blocks: Vec<Block> = (0..100).map(|p| Block::new(p, vec![p as u64])).collect();
        let queue = BlockQueue::new(&mut blocks);

        let total = AtomicUsize::new(0);
        thread::scope(|s| {
            for _ in 0..8 {
                s.spawn(|| {
                    while let Some(block) = queue.claim() {
                        // mark the block so a double claim would be visible
                        block.keys_mut()[0] += 1_000;
                        total.fetch_add(1, Ordering::Relaxed);
                    }
                });
            }
        });

        assert_eq!(total.load(Ordering::Relaxed), 100);
        assert!(queue.claim().is_none());
        assert!(
            blocks
                .iter()
                .all(|b| b.keys()[0] == b.prefix() as u64 + 1_000)
        );
    }

    #[test]
    fn test_drain_counts_claims() {
        let mut blocks = vec![
            Block::new(0, vec![3, 2, 1]),
            Block::new(1, vec![]),
            Block::new(2, vec![9]),
        ];
        let queue = BlockQueue::new(&mut blocks);
        assert_eq!(drain(&queue, 0, 16), 3);
        assert_eq!(drain(&queue, 1, 16), 0);
        assert_eq!(blocks[0].keys(), &[1, 2, 3]);
    }

    #[test]
    fn test_sequential_and_parallel_agree() {
        let data = random_keys(50_000, 42);

        let mut sequential = Container::new(&data, 1);
        sort(&mut sequential, 1);

        for threads in [2, 3, 8, 64] {
            let mut parallel = Container::new(&data, 1);
            sort(&mut parallel, threads);
            assert_eq!(parallel, sequential);
        }
        assert!(sequential.is_sorted());
    }

    #[test]
    fn test_more_threads_than_blocks() {
        let mut container = Container::new(&[3, 1, 2], 1);
        assert_eq!(container.num_blocks(), 1);
        sort(&mut container, 16);
        assert_eq!(container.into_vec(), vec![1, 2, 3]);
    }

    #[test]
    fn test_sort_with_config_threshold() {
        let data = random_keys(10_000, 3);
        let mut expected = data.clone();
        expected.sort_unstable();

        for threshold in [1, 32, 4096] {
            let config = SortConfig::default()
                .with_threads(4)
                .with_small_range_threshold(threshold);
            let mut container = Container::with_config(&data, &config).unwrap();
            sort_with(&mut container, &config);
            assert_eq!(container.into_vec(), expected);
        }
    }

    #[test]
    #[should_panic(expected = "thread count must be at least 1")]
    fn test_zero_threads_panics() {
        let mut container = Container::new(&[1, 2], 1);
        sort(&mut container, 0);
    }
}
