//! Per-worker search state for parallel search: lookback frame stacks,
//! move-ordering and evaluation memoization tables, and the pool that
//! creates, resets, initialises and aggregates them.

pub mod config;
pub mod error;
pub mod eval;
pub mod search;

pub use config::{ContemptConfig, PoolConfig};
pub use error::PoolError;
pub use eval::accumulator::{Accumulator, HIDDEN};
pub use search::control::{SearchLimits, SearchProgress};
pub use search::pool::ThreadPool;
pub use search::stack::{FrameStack, MAX_PLY, STACK_OFFSET, STACK_SIZE};
pub use search::worker::Worker;
pub use search::SearchPosition;
