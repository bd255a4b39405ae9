//! Worker state, its frame stacks and tables, and the pool that owns them.

pub mod control;
pub mod heuristics;
pub mod pool;
pub mod stack;
pub mod worker;

use plystack_core::Color;

/// The parts of a position representation the pool needs.
///
/// Workers keep a private clone of the root position; everything else about
/// the position (move making, hashing, evaluation inputs) is up to the
/// implementor.
pub trait SearchPosition: Clone + Send {
    /// The player on move.
    fn side_to_move(&self) -> Color;
}
