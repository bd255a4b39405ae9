//! Integration tests for worker-pool lifecycle across search episodes.
//!
//! Each test drives the pool the way a controlling process does: create,
//! begin a search, let the workers run on their own threads, then read the
//! aggregates once they have all joined.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use plystack_core::{CACHE_LINE, Color, Move};
use plystack_engine::{
    ContemptConfig, SearchLimits, SearchPosition, SearchProgress, STACK_OFFSET, ThreadPool, Worker,
};

#[derive(Clone, Debug, PartialEq)]
struct Root {
    side: Color,
}

impl SearchPosition for Root {
    fn side_to_move(&self) -> Color {
        self.side
    }
}

const ROOT: Root = Root {
    side: Color::White,
};

fn begin(pool: &mut ThreadPool<Root>, limits: SearchLimits) -> Arc<SearchProgress> {
    let progress = Arc::new(SearchProgress::new());
    pool.begin_search(
        &ROOT,
        Arc::new(limits),
        Arc::clone(&progress),
        &ContemptConfig::new(20, 5),
    );
    progress
}

/// A stand-in for real search: walk `depth` plies, counting nodes and
/// touching every per-ply structure.
fn walk(worker: &mut Worker<Root>, depth: usize) {
    for ply in 0..depth {
        worker.set_height(ply);
        worker.add_node();
        worker.eval_stack[ply as isize] = ply as i32;
        worker.move_stack[ply as isize] = Move::new(ply as u8, ply as u8 + 1);
        worker.accumulator_mut().computed = true;
        worker.push_accumulator();
        if ply % 4 == 0 {
            worker.add_tbhit();
        }
    }
    for _ in 0..depth {
        worker.pop_accumulator();
    }
}

#[test]
fn accumulator_frames_are_cache_line_aligned() {
    let pool: ThreadPool<Root> = ThreadPool::new(3).unwrap();
    for worker in pool.workers() {
        for acc in worker.accumulators().frames() {
            assert_eq!(acc.values_ptr() as usize % CACHE_LINE, 0);
        }
    }
}

#[test]
fn every_worker_runs_exactly_once() {
    let mut pool: ThreadPool<Root> = ThreadPool::new(4).unwrap();
    begin(&mut pool, SearchLimits::default());

    let visits: Vec<AtomicUsize> = (0..4).map(|_| AtomicUsize::new(0)).collect();
    pool.execute(|worker| {
        visits[worker.index()].fetch_add(1, Ordering::Relaxed);
    });

    assert!(visits.iter().all(|v| v.load(Ordering::Relaxed) == 1));
}

#[test]
fn totals_are_exact_after_parallel_episode() {
    let mut pool: ThreadPool<Root> = ThreadPool::new(4).unwrap();
    begin(&mut pool, SearchLimits::default());

    pool.execute(|worker| walk(worker, 10 + worker.index() * 5));

    // 10 + 15 + 20 + 25 nodes; tbhits at plies 0, 4, 8, ...
    assert_eq!(pool.total_nodes(), 70);
    assert_eq!(pool.total_tbhits(), 3 + 4 + 5 + 7);
}

#[test]
fn begin_search_wipes_previous_episode() {
    let mut pool: ThreadPool<Root> = ThreadPool::new(3).unwrap();
    begin(&mut pool, SearchLimits::default());
    pool.execute(|worker| walk(worker, 12));
    assert!(pool.total_nodes() > 0);

    let progress = begin(&mut pool, SearchLimits::default());

    assert_eq!(pool.total_nodes(), 0);
    assert_eq!(pool.total_tbhits(), 0);
    for worker in pool.workers() {
        assert_eq!(worker.height(), 0);
        assert_eq!(worker.accumulator_ply(), 0);
        assert_eq!(worker.position(), Some(&ROOT));
        assert!(worker.accumulators().frames().iter().all(|acc| !acc.computed));
        assert!(std::ptr::eq(worker.progress().unwrap(), &*progress));
    }
}

#[test]
fn lookback_reaches_padding_frames() {
    let mut pool: ThreadPool<Root> = ThreadPool::new(1).unwrap();
    begin(&mut pool, SearchLimits::default());

    let worker = &mut pool.workers_mut()[0];
    let lowest = -(STACK_OFFSET as isize);
    worker.eval_stack[lowest] = -1;
    worker.eval_stack[0] = 1;
    assert_eq!(worker.eval_stack[lowest], -1);
    assert_eq!(worker.eval_stack.get(lowest - 1), None);
    assert!(worker.move_stack[-1].is_null());
}

#[test]
fn node_limit_stops_all_workers() {
    let mut pool: ThreadPool<Root> = ThreadPool::new(3).unwrap();
    let progress = begin(
        &mut pool,
        SearchLimits {
            nodes: Some(200),
            ..SearchLimits::default()
        },
    );

    pool.execute(|worker| {
        while !worker.should_stop() {
            worker.add_node();
        }
    });

    assert!(progress.is_stopped());
    // Whoever hit the limit first stopped the rest.
    assert!(pool.workers().iter().any(|w| w.nodes() == 200));
    assert!(pool.workers().iter().all(|w| w.nodes() <= 200));
}

#[test]
fn second_player_gets_negated_contempt() {
    let mut pool: ThreadPool<Root> = ThreadPool::new(2).unwrap();
    let black = Root { side: Color::Black };
    pool.begin_search(
        &black,
        Arc::new(SearchLimits::default()),
        Arc::new(SearchProgress::new()),
        &ContemptConfig::new(20, 5),
    );

    for worker in pool.workers() {
        assert_eq!(worker.contempt().mg(), -25);
        assert_eq!(worker.contempt().eg(), -20);
    }
}
