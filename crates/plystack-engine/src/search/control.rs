//! Search parameters shared by every worker during one search episode.
//!
//! The controlling process builds these before the episode and hands them to
//! [`ThreadPool::begin_search`](crate::ThreadPool::begin_search) in `Arc`s.
//! Workers only read them; the progress record's stop flag and iteration
//! results are atomics so the controller may update them from outside.

use std::sync::atomic::{AtomicBool, AtomicU8, AtomicU16, Ordering};
use std::time::{Duration, Instant};

use plystack_core::Move;

use crate::search::stack::MAX_PLY;

/// Nodes between clock checks in [`SearchProgress::should_stop`].
const CLOCK_CHECK_INTERVAL: u64 = 1024;

/// What the controlling process asked the search to respect.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchLimits {
    /// Stop after completing this depth.
    pub depth: Option<u8>,
    /// Stop once a single worker has visited this many nodes.
    pub nodes: Option<u64>,
    /// Stop after this much wall time.
    pub movetime: Option<Duration>,
    /// Ignore every limit and search until stopped.
    pub infinite: bool,
}

impl SearchLimits {
    /// Depth iterative deepening may reach.
    pub fn max_depth(&self) -> u8 {
        match self.depth {
            Some(depth) if !self.infinite => depth.min(MAX_PLY as u8),
            _ => MAX_PLY as u8,
        }
    }
}

/// Shared progress of a search episode.
#[derive(Debug)]
pub struct SearchProgress {
    stopped: AtomicBool,
    start: Instant,
    completed_depth: AtomicU8,
    best_move: AtomicU16,
}

impl SearchProgress {
    /// Fresh record; the clock starts now.
    pub fn new() -> Self {
        Self {
            stopped: AtomicBool::new(false),
            start: Instant::now(),
            completed_depth: AtomicU8::new(0),
            best_move: AtomicU16::new(Move::NULL.raw()),
        }
    }

    /// Ask every worker to stop at its next check.
    pub fn stop(&self) {
        self.stopped.store(true, Ordering::Release);
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::Relaxed)
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Whether a worker that has visited `nodes` nodes should abort.
    ///
    /// The clock is only read every [`CLOCK_CHECK_INTERVAL`] nodes. When a
    /// limit fires the stop flag is set so the other workers follow.
    pub fn should_stop(&self, limits: &SearchLimits, nodes: u64) -> bool {
        if self.is_stopped() {
            return true;
        }
        if limits.infinite {
            return false;
        }

        let node_limit_hit = limits.nodes.is_some_and(|max| nodes >= max);
        let time_limit_hit = nodes % CLOCK_CHECK_INTERVAL == 0
            && limits.movetime.is_some_and(|max| self.elapsed() >= max);

        if node_limit_hit || time_limit_hit {
            self.stop();
            return true;
        }
        false
    }

    /// Publish the result of a finished iteration. Shallower results than
    /// the one already recorded are ignored.
    pub fn record_iteration(&self, depth: u8, best_move: Move) {
        if self.completed_depth.fetch_max(depth, Ordering::AcqRel) < depth {
            self.best_move.store(best_move.raw(), Ordering::Release);
        }
    }

    pub fn completed_depth(&self) -> u8 {
        self.completed_depth.load(Ordering::Acquire)
    }

    pub fn best_move(&self) -> Move {
        Move::from_raw(self.best_move.load(Ordering::Acquire))
    }
}

impl Default for SearchProgress {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use plystack_core::Move;

    use super::{SearchLimits, SearchProgress};
    use crate::search::stack::MAX_PLY;

    #[test]
    fn max_depth_defaults_to_stack_depth() {
        assert_eq!(SearchLimits::default().max_depth(), MAX_PLY as u8);
        let limits = SearchLimits {
            depth: Some(9),
            ..SearchLimits::default()
        };
        assert_eq!(limits.max_depth(), 9);
        let limits = SearchLimits {
            depth: Some(9),
            infinite: true,
            ..SearchLimits::default()
        };
        assert_eq!(limits.max_depth(), MAX_PLY as u8);
    }

    #[test]
    fn node_limit_sets_stop_flag() {
        let progress = SearchProgress::new();
        let limits = SearchLimits {
            nodes: Some(500),
            ..SearchLimits::default()
        };
        assert!(!progress.should_stop(&limits, 499));
        assert!(progress.should_stop(&limits, 500));
        assert!(progress.is_stopped());
        assert!(progress.should_stop(&limits, 0));
    }

    #[test]
    fn zero_movetime_stops_on_clock_check() {
        let progress = SearchProgress::new();
        let limits = SearchLimits {
            movetime: Some(Duration::ZERO),
            ..SearchLimits::default()
        };
        assert!(!progress.should_stop(&limits, 1));
        assert!(progress.should_stop(&limits, 1024));
    }

    #[test]
    fn infinite_ignores_limits_but_not_stop() {
        let progress = SearchProgress::new();
        let limits = SearchLimits {
            nodes: Some(1),
            infinite: true,
            ..SearchLimits::default()
        };
        assert!(!progress.should_stop(&limits, 10_000));
        progress.stop();
        assert!(progress.should_stop(&limits, 10_000));
    }

    #[test]
    fn deeper_iterations_win() {
        let progress = SearchProgress::new();
        progress.record_iteration(3, Move::new(1, 2));
        progress.record_iteration(2, Move::new(3, 4));
        assert_eq!(progress.completed_depth(), 3);
        assert_eq!(progress.best_move(), Move::new(1, 2));
        progress.record_iteration(4, Move::new(5, 6));
        assert_eq!(progress.best_move(), Move::new(5, 6));
    }
}
