//! Leaf types shared by the plystack engine: colors, moves, packed scores,
//! 64-byte aligned storage, and read-only file mappings.

mod aligned;
mod chess_move;
mod color;
mod error;
pub mod mapped;
mod score;

pub use aligned::{AlignedBuf, CACHE_LINE, live_aligned_allocations};
pub use chess_move::Move;
pub use color::Color;
pub use error::MapError;
pub use mapped::{MappedFile, MappedRegion, map_file, unmap};
pub use score::{S, Score};
