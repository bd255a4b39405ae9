//! One search thread's private state.

use std::sync::Arc;

use plystack_core::{AlignedBuf, Move, Score};

use crate::eval::accumulator::Accumulator;
use crate::eval::cache::{EvalCache, PawnKingCache};
use crate::search::SearchPosition;
use crate::search::control::{SearchLimits, SearchProgress};
use crate::search::heuristics::{
    CaptureHistoryTable, ContinuationTable, CounterMoveTable, HistoryTable, KillerTable,
};
use crate::search::stack::{FrameStack, STACK_OFFSET, STACK_SIZE};

/// Accumulator frames live in a 64-byte aligned buffer.
pub type AccumulatorStack = FrameStack<Accumulator, AlignedBuf<Accumulator>>;

/// State owned by exactly one search thread.
///
/// Only the pool creates workers. During a search episode a worker is
/// borrowed mutably by a single thread; the stacks and tables below are
/// public so search code can use them directly.
pub struct Worker<P> {
    index: usize,
    pool_size: usize,
    position: Option<P>,

    /// Static evaluation per ply.
    pub eval_stack: FrameStack<i32>,
    /// Move played to reach each ply.
    pub move_stack: FrameStack<Move>,
    /// Kind of the piece that made that move.
    pub piece_stack: FrameStack<u8>,
    accumulators: AccumulatorStack,
    accumulator_ply: isize,

    pub killers: KillerTable,
    pub counter_moves: CounterMoveTable,
    pub history: HistoryTable,
    pub capture_history: CaptureHistoryTable,
    pub continuation: ContinuationTable,
    pub eval_cache: EvalCache,
    pub pawn_king_cache: PawnKingCache,

    nodes: u64,
    tbhits: u64,
    height: usize,
    contempt: Score,

    limits: Option<Arc<SearchLimits>>,
    progress: Option<Arc<SearchProgress>>,
}

impl<P: SearchPosition> Worker<P> {
    pub(crate) fn new(index: usize, pool_size: usize) -> Self {
        let accumulators = FrameStack::from_buffer(
            AlignedBuf::new_with(STACK_SIZE, Accumulator::default),
            STACK_OFFSET,
        );

        Self {
            index,
            pool_size,
            position: None,
            eval_stack: FrameStack::boxed(STACK_SIZE, STACK_OFFSET),
            move_stack: FrameStack::boxed(STACK_SIZE, STACK_OFFSET),
            piece_stack: FrameStack::boxed(STACK_SIZE, STACK_OFFSET),
            accumulators,
            accumulator_ply: 0,
            killers: KillerTable::new(),
            counter_moves: CounterMoveTable::new(),
            history: HistoryTable::new(),
            capture_history: CaptureHistoryTable::new(),
            continuation: ContinuationTable::new(),
            eval_cache: EvalCache::new(),
            pawn_king_cache: PawnKingCache::new(),
            nodes: 0,
            tbhits: 0,
            height: 0,
            contempt: Score::ZERO,
            limits: None,
            progress: None,
        }
    }

    /// Physical slot of the first accumulator frame whose activations are
    /// not 64-byte aligned.
    pub(crate) fn misaligned_accumulator(&self) -> Option<usize> {
        self.accumulators.frames().iter().position(|acc| !acc.is_aligned())
    }

    /// Zero the move-ordering tables and evaluation caches.
    pub(crate) fn clear_tables(&mut self) {
        self.killers.clear();
        self.counter_moves.clear();
        self.history.clear();
        self.capture_history.clear();
        self.continuation.clear();
        self.eval_cache.clear();
        self.pawn_king_cache.clear();
    }

    /// Whether every table `clear_tables` touches is zeroed.
    pub fn tables_are_clear(&self) -> bool {
        self.killers.is_clear()
            && self.counter_moves.is_clear()
            && self.history.is_clear()
            && self.capture_history.is_clear()
            && self.continuation.is_clear()
            && self.eval_cache.is_clear()
            && self.pawn_king_cache.is_clear()
    }

    /// Prepare for a new search episode from `position`.
    pub(crate) fn begin_search(
        &mut self,
        position: &P,
        limits: Arc<SearchLimits>,
        progress: Arc<SearchProgress>,
        contempt: Score,
    ) {
        self.limits = Some(limits);
        self.progress = Some(progress);
        self.contempt = contempt;

        self.height = 0;
        self.nodes = 0;
        self.tbhits = 0;

        self.position = Some(position.clone());

        // Evaluation now writes into this worker's own frames, from ply 0.
        self.accumulator_ply = 0;
        for acc in self.accumulators.frames_mut() {
            acc.invalidate();
        }
    }
}

impl<P> Worker<P> {
    /// Stable index of this worker within its pool.
    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Number of workers in the pool, this one included.
    #[inline]
    pub fn pool_size(&self) -> usize {
        self.pool_size
    }

    /// The main worker reports progress; helpers only search.
    #[inline]
    pub fn is_main(&self) -> bool {
        self.index == 0
    }

    /// This worker's copy of the root position, once a search has begun.
    pub fn position(&self) -> Option<&P> {
        self.position.as_ref()
    }

    pub fn position_mut(&mut self) -> Option<&mut P> {
        self.position.as_mut()
    }

    #[inline]
    pub fn nodes(&self) -> u64 {
        self.nodes
    }

    #[inline]
    pub fn tbhits(&self) -> u64 {
        self.tbhits
    }

    /// Count a visited node; returns the new total.
    #[inline]
    pub fn add_node(&mut self) -> u64 {
        self.nodes = self.nodes.wrapping_add(1);
        self.nodes
    }

    /// Count a tablebase hit.
    #[inline]
    pub fn add_tbhit(&mut self) {
        self.tbhits = self.tbhits.wrapping_add(1);
    }

    /// Current distance from the root.
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn set_height(&mut self, height: usize) {
        self.height = height;
    }

    /// Contempt for this search, in the first player's frame.
    #[inline]
    pub fn contempt(&self) -> Score {
        self.contempt
    }

    pub fn limits(&self) -> Option<&SearchLimits> {
        self.limits.as_deref()
    }

    pub fn progress(&self) -> Option<&SearchProgress> {
        self.progress.as_deref()
    }

    /// Whether this worker should abandon the current search.
    ///
    /// A worker with no search installed is always told to stop.
    pub fn should_stop(&self) -> bool {
        match (self.progress(), self.limits()) {
            (Some(progress), Some(limits)) => progress.should_stop(limits, self.nodes),
            _ => true,
        }
    }

    /// The whole accumulator stack.
    pub fn accumulators(&self) -> &AccumulatorStack {
        &self.accumulators
    }

    /// Ply of the accumulator the position currently evaluates against.
    #[inline]
    pub fn accumulator_ply(&self) -> isize {
        self.accumulator_ply
    }

    /// The current accumulator frame.
    #[inline]
    pub fn accumulator(&self) -> &Accumulator {
        &self.accumulators[self.accumulator_ply]
    }

    #[inline]
    pub fn accumulator_mut(&mut self) -> &mut Accumulator {
        &mut self.accumulators[self.accumulator_ply]
    }

    /// Advance to the next ply's accumulator, marked stale.
    ///
    /// # Panics
    ///
    /// If the stack is already at its deepest ply.
    pub fn push_accumulator(&mut self) -> &mut Accumulator {
        self.accumulator_ply += 1;
        let acc = &mut self.accumulators[self.accumulator_ply];
        acc.invalidate();
        acc
    }

    /// Return to the previous ply's accumulator.
    pub fn pop_accumulator(&mut self) {
        debug_assert!(self.accumulator_ply > 0, "accumulator stack underflow");
        self.accumulator_ply -= 1;
    }
}
