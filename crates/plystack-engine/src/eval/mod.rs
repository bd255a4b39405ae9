//! Evaluation state owned by each worker: the accumulator frames and the
//! memoization caches. The evaluation math itself lives elsewhere.

pub mod accumulator;
pub mod cache;
