//! The pool of search workers: creation, hard reset, search-start
//! initialisation, counter aggregation and teardown.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, error, info};

use crate::config::{ContemptConfig, PoolConfig};
use crate::error::PoolError;
use crate::search::SearchPosition;
use crate::search::control::{SearchLimits, SearchProgress};
use crate::search::worker::Worker;

/// Owns every worker as one contiguous arena.
///
/// Workers refer to each other only by index; peer state is reached through
/// the pool, never through a worker. The worker count is fixed at creation.
pub struct ThreadPool<P> {
    workers: Vec<Worker<P>>,
}

impl<P: SearchPosition> ThreadPool<P> {
    /// Create a pool of `threads` workers.
    ///
    /// Every worker's accumulator stack is checked for 64-byte alignment. A
    /// misaligned frame means the allocator broke its contract and later
    /// vector loads would be undefined behaviour, so the process exits.
    pub fn new(threads: usize) -> Result<Self, PoolError> {
        if threads == 0 {
            return Err(PoolError::NoWorkers);
        }

        let workers: Vec<Worker<P>> = (0..threads).map(|i| Worker::new(i, threads)).collect();

        for worker in &workers {
            if let Some(slot) = worker.misaligned_accumulator() {
                error!(
                    worker = worker.index(),
                    slot, "unable to align accumulator stack on a 64-byte boundary"
                );
                std::process::exit(1);
            }
        }

        debug!(workers = threads, "thread pool created");
        Ok(Self { workers })
    }

    /// Create a pool sized by `config`.
    pub fn with_config(config: &PoolConfig) -> Result<Self, PoolError> {
        Self::new(config.threads)
    }

    /// Hard reset between games: clear every worker's move-ordering tables
    /// and evaluation caches so a new game searches deterministically.
    ///
    /// Not for use between moves of one game; ordering data learned earlier
    /// in the game is meant to carry over.
    pub fn reset(&mut self) {
        for worker in &mut self.workers {
            worker.clear_tables();
        }
        debug!(workers = self.workers.len(), "thread pool reset");
    }

    /// Initialise every worker for a search from `position`.
    ///
    /// Installs the shared limits and progress record, the contempt for the
    /// side to move, zeroed counters and height, a private copy of the
    /// position bound to the worker's own accumulator stack, and stale
    /// accumulator frames. Must finish before any worker starts searching.
    pub fn begin_search(
        &mut self,
        position: &P,
        limits: Arc<SearchLimits>,
        progress: Arc<SearchProgress>,
        contempt: &ContemptConfig,
    ) {
        let side = position.side_to_move();
        let score = contempt.score_for(side);

        for worker in &mut self.workers {
            worker.begin_search(position, Arc::clone(&limits), Arc::clone(&progress), score);
        }
        debug!(workers = self.workers.len(), %side, contempt = ?score, "search initialised");
    }

    /// Run `search` on every worker, one scoped thread each, and return once
    /// all of them have finished.
    ///
    /// Worker 0 runs on the calling thread.
    pub fn execute<F>(&mut self, search: F)
    where
        F: Fn(&mut Worker<P>) + Sync,
    {
        let Some((main, helpers)) = self.workers.split_first_mut() else {
            return;
        };

        std::thread::scope(|s| {
            let search = &search;
            for helper in helpers {
                s.spawn(move || search(helper));
            }
            search(main);
        });
    }
}

impl<P> ThreadPool<P> {
    /// Number of workers.
    #[inline]
    pub fn len(&self) -> usize {
        self.workers.len()
    }

    /// Always `false`: a pool has at least one worker.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.workers.is_empty()
    }

    pub fn worker(&self, index: usize) -> Option<&Worker<P>> {
        self.workers.get(index)
    }

    pub fn worker_mut(&mut self, index: usize) -> Option<&mut Worker<P>> {
        self.workers.get_mut(index)
    }

    pub fn workers(&self) -> &[Worker<P>] {
        &self.workers
    }

    /// Mutable access to the workers. A slice, so the count cannot change.
    pub fn workers_mut(&mut self) -> &mut [Worker<P>] {
        &mut self.workers
    }

    /// Every worker other than `index`.
    pub fn peers(&self, index: usize) -> impl Iterator<Item = &Worker<P>> + '_ {
        self.workers.iter().filter(move |w| w.index() != index)
    }

    /// Nodes visited by all workers in the last search.
    ///
    /// Takes `&self`, so no worker can be mutating its counter meanwhile.
    pub fn total_nodes(&self) -> u64 {
        self.workers
            .iter()
            .fold(0u64, |sum, w| sum.wrapping_add(w.nodes()))
    }

    /// Tablebase hits across all workers in the last search.
    pub fn total_tbhits(&self) -> u64 {
        self.workers
            .iter()
            .fold(0u64, |sum, w| sum.wrapping_add(w.tbhits()))
    }
}

impl<P> Drop for ThreadPool<P> {
    fn drop(&mut self) {
        // Worker drops release the aligned accumulator buffers.
        info!(workers = self.workers.len(), "thread pool destroyed");
    }
}

impl<P> fmt::Debug for ThreadPool<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ThreadPool")
            .field("workers", &self.workers.len())
            .field("total_nodes", &self.total_nodes())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use plystack_core::{Color, Move, S};

    use super::ThreadPool;
    use crate::config::{ContemptConfig, PoolConfig};
    use crate::error::PoolError;
    use crate::search::SearchPosition;
    use crate::search::control::{SearchLimits, SearchProgress};

    #[derive(Clone, Debug, PartialEq)]
    struct Root {
        side: Color,
    }

    impl SearchPosition for Root {
        fn side_to_move(&self) -> Color {
            self.side
        }
    }

    fn start(pool: &mut ThreadPool<Root>, side: Color, contempt: ContemptConfig) {
        let root = Root { side };
        pool.begin_search(
            &root,
            Arc::new(SearchLimits::default()),
            Arc::new(SearchProgress::new()),
            &contempt,
        );
    }

    #[test]
    fn zero_workers_is_rejected() {
        assert_eq!(ThreadPool::<Root>::new(0).unwrap_err(), PoolError::NoWorkers);
    }

    #[test]
    fn workers_know_their_index_and_peer_count() {
        let pool: ThreadPool<Root> = ThreadPool::new(3).unwrap();
        assert_eq!(pool.len(), 3);
        assert!(!pool.is_empty());
        for (i, worker) in pool.workers().iter().enumerate() {
            assert_eq!(worker.index(), i);
            assert_eq!(worker.pool_size(), 3);
        }
        let peers: Vec<usize> = pool.peers(1).map(|w| w.index()).collect();
        assert_eq!(peers, vec![0, 2]);
    }

    #[test]
    fn with_config_uses_thread_count() {
        let config = PoolConfig {
            threads: 2,
            ..PoolConfig::default()
        };
        let pool: ThreadPool<Root> = ThreadPool::with_config(&config).unwrap();
        assert_eq!(pool.len(), 2);
    }

    #[test]
    fn reset_is_idempotent() {
        let mut pool: ThreadPool<Root> = ThreadPool::new(2).unwrap();
        for worker in pool.workers_mut() {
            worker.killers.store(3, Move::new(1, 2));
            worker.history.update(Color::White, Move::new(1, 2), 40);
            worker.eval_cache.store(0xFFFF_0000_0000_0003, 17);
        }
        assert!(pool.workers().iter().all(|w| !w.tables_are_clear()));

        pool.reset();
        assert!(pool.workers().iter().all(|w| w.tables_are_clear()));
        pool.reset();
        assert!(pool.workers().iter().all(|w| w.tables_are_clear()));
    }

    #[test]
    fn begin_search_keeps_ordering_tables() {
        let mut pool: ThreadPool<Root> = ThreadPool::new(1).unwrap();
        let killer = Move::new(8, 16);
        pool.workers_mut()[0].killers.store(0, killer);

        start(&mut pool, Color::White, ContemptConfig::default());
        assert!(pool.workers()[0].killers.is_killer(0, killer));
    }

    #[test]
    fn contempt_follows_side_to_move() {
        let mut pool: ThreadPool<Root> = ThreadPool::new(2).unwrap();
        let config = ContemptConfig::new(20, 5);

        start(&mut pool, Color::White, config);
        for worker in pool.workers() {
            assert_eq!(worker.contempt(), S(25, 20));
        }

        start(&mut pool, Color::Black, config);
        for worker in pool.workers() {
            assert_eq!(worker.contempt(), -S(25, 20));
        }
    }

    #[test]
    fn aggregates_sum_worker_counters() {
        let mut pool: ThreadPool<Root> = ThreadPool::new(4).unwrap();
        start(&mut pool, Color::White, ContemptConfig::default());

        for (worker, nodes) in pool.workers_mut().iter_mut().zip([10, 0, 7, 3]) {
            for _ in 0..nodes {
                worker.add_node();
            }
        }
        pool.workers_mut()[2].add_tbhit();
        pool.workers_mut()[3].add_tbhit();

        assert_eq!(pool.total_nodes(), 20);
        assert_eq!(pool.total_tbhits(), 2);
    }
}
