//! Move-ordering tables kept per worker across the searches of one game.
//!
//! Every table has a `clear` used by the pool's hard reset. Nothing here is
//! cleared between moves of the same game.

use plystack_core::{Color, Move};

use crate::search::stack::MAX_PLY;

/// Piece kinds, pawn through king.
pub const PIECE_KINDS: usize = 6;

/// Piece kinds that can be captured (no king).
pub const CAPTURABLE_KINDS: usize = 5;

/// Plies of continuation history (counter move and follow-up).
pub const CONTINUATION_PLIES: usize = 2;

const SQUARES: usize = 64;

/// Bound on the magnitude of every history score.
pub const HISTORY_MAX: i32 = 16_384;

/// Apply a gravity update: `bonus` is scaled down as the entry approaches
/// [`HISTORY_MAX`], so the entry stays inside `-HISTORY_MAX..=HISTORY_MAX`.
#[inline]
fn apply_gravity(entry: &mut i16, bonus: i32) {
    let bonus = bonus.clamp(-HISTORY_MAX, HISTORY_MAX);
    let current = i32::from(*entry);
    let next = current + bonus - current * bonus.abs() / HISTORY_MAX;
    *entry = next.clamp(-HISTORY_MAX, HISTORY_MAX) as i16;
}

/// Two killer moves per ply: quiet moves that caused beta cutoffs.
pub struct KillerTable {
    slots: [[Move; 2]; MAX_PLY + 1],
}

impl KillerTable {
    pub fn new() -> Self {
        Self {
            slots: [[Move::NULL; 2]; MAX_PLY + 1],
        }
    }

    /// Record a killer at `ply`, demoting the previous first killer unless
    /// `mv` already holds that slot.
    pub fn store(&mut self, ply: usize, mv: Move) {
        let Some(slot) = self.slots.get_mut(ply) else {
            return;
        };
        if slot[0] != mv {
            slot[1] = slot[0];
            slot[0] = mv;
        }
    }

    pub fn killers(&self, ply: usize) -> [Move; 2] {
        self.slots.get(ply).copied().unwrap_or([Move::NULL; 2])
    }

    pub fn is_killer(&self, ply: usize, mv: Move) -> bool {
        !mv.is_null() && self.killers(ply).contains(&mv)
    }

    pub fn clear(&mut self) {
        self.slots = [[Move::NULL; 2]; MAX_PLY + 1];
    }

    pub fn is_clear(&self) -> bool {
        self.slots.iter().flatten().all(|mv| mv.is_null())
    }
}

impl Default for KillerTable {
    fn default() -> Self {
        Self::new()
    }
}

/// Refutation of the previous move, indexed `[color][piece][to]` of the
/// move being answered.
pub struct CounterMoveTable {
    moves: Box<[Move]>,
}

impl CounterMoveTable {
    pub fn new() -> Self {
        Self {
            moves: vec![Move::NULL; Color::COUNT * PIECE_KINDS * SQUARES].into_boxed_slice(),
        }
    }

    #[inline]
    fn index(color: Color, piece: usize, to: usize) -> usize {
        (color.index() * PIECE_KINDS + piece) * SQUARES + to
    }

    pub fn store(&mut self, color: Color, piece: usize, to: usize, reply: Move) {
        self.moves[Self::index(color, piece, to)] = reply;
    }

    pub fn get(&self, color: Color, piece: usize, to: usize) -> Move {
        self.moves[Self::index(color, piece, to)]
    }

    pub fn clear(&mut self) {
        self.moves.fill(Move::NULL);
    }

    pub fn is_clear(&self) -> bool {
        self.moves.iter().all(|mv| mv.is_null())
    }
}

impl Default for CounterMoveTable {
    fn default() -> Self {
        Self::new()
    }
}

/// Butterfly history for quiet moves, indexed `[color][from][to]`.
pub struct HistoryTable {
    scores: Box<[i16]>,
}

impl HistoryTable {
    pub fn new() -> Self {
        Self {
            scores: vec![0; Color::COUNT * SQUARES * SQUARES].into_boxed_slice(),
        }
    }

    #[inline]
    fn index(color: Color, mv: Move) -> usize {
        (color.index() * SQUARES + mv.from()) * SQUARES + mv.to()
    }

    /// Reward (positive `bonus`) or penalise a quiet move.
    pub fn update(&mut self, color: Color, mv: Move, bonus: i32) {
        apply_gravity(&mut self.scores[Self::index(color, mv)], bonus);
    }

    pub fn get(&self, color: Color, mv: Move) -> i32 {
        i32::from(self.scores[Self::index(color, mv)])
    }

    pub fn clear(&mut self) {
        self.scores.fill(0);
    }

    pub fn is_clear(&self) -> bool {
        self.scores.iter().all(|&s| s == 0)
    }
}

impl Default for HistoryTable {
    fn default() -> Self {
        Self::new()
    }
}

/// History for captures, indexed `[piece][to][captured]`.
pub struct CaptureHistoryTable {
    scores: Box<[i16]>,
}

impl CaptureHistoryTable {
    pub fn new() -> Self {
        Self {
            scores: vec![0; PIECE_KINDS * SQUARES * CAPTURABLE_KINDS].into_boxed_slice(),
        }
    }

    #[inline]
    fn index(piece: usize, to: usize, captured: usize) -> usize {
        (piece * SQUARES + to) * CAPTURABLE_KINDS + captured
    }

    pub fn update(&mut self, piece: usize, to: usize, captured: usize, bonus: i32) {
        apply_gravity(&mut self.scores[Self::index(piece, to, captured)], bonus);
    }

    pub fn get(&self, piece: usize, to: usize, captured: usize) -> i32 {
        i32::from(self.scores[Self::index(piece, to, captured)])
    }

    pub fn clear(&mut self) {
        self.scores.fill(0);
    }

    pub fn is_clear(&self) -> bool {
        self.scores.iter().all(|&s| s == 0)
    }
}

impl Default for CaptureHistoryTable {
    fn default() -> Self {
        Self::new()
    }
}

/// Continuation history: how well `(piece, to)` does after an earlier move
/// `(prev_piece, prev_to)` played `plies_ago` plies before it (1 or 2).
pub struct ContinuationTable {
    scores: Box<[i16]>,
}

impl ContinuationTable {
    const PER_PLY: usize = PIECE_KINDS * SQUARES * PIECE_KINDS * SQUARES;

    pub fn new() -> Self {
        Self {
            scores: vec![0; CONTINUATION_PLIES * Self::PER_PLY].into_boxed_slice(),
        }
    }

    #[inline]
    fn index(plies_ago: usize, prev_piece: usize, prev_to: usize, piece: usize, to: usize) -> usize {
        debug_assert!((1..=CONTINUATION_PLIES).contains(&plies_ago));
        let prev = (plies_ago - 1) * PIECE_KINDS * SQUARES + prev_piece * SQUARES + prev_to;
        prev * PIECE_KINDS * SQUARES + piece * SQUARES + to
    }

    pub fn update(
        &mut self,
        plies_ago: usize,
        (prev_piece, prev_to): (usize, usize),
        (piece, to): (usize, usize),
        bonus: i32,
    ) {
        let idx = Self::index(plies_ago, prev_piece, prev_to, piece, to);
        apply_gravity(&mut self.scores[idx], bonus);
    }

    pub fn get(
        &self,
        plies_ago: usize,
        (prev_piece, prev_to): (usize, usize),
        (piece, to): (usize, usize),
    ) -> i32 {
        i32::from(self.scores[Self::index(plies_ago, prev_piece, prev_to, piece, to)])
    }

    pub fn clear(&mut self) {
        self.scores.fill(0);
    }

    pub fn is_clear(&self) -> bool {
        self.scores.iter().all(|&s| s == 0)
    }
}

impl Default for ContinuationTable {
    fn default() -> Self {
        Self::new()
    }
}
