//! Pool creation and destruction are one aligned allocation and one free per
//! worker. Kept in its own test binary because the allocation counter is
//! process-wide.

use plystack_core::{Color, live_aligned_allocations};
use plystack_engine::{SearchPosition, ThreadPool};

#[derive(Clone)]
struct Root;

impl SearchPosition for Root {
    fn side_to_move(&self) -> Color {
        Color::White
    }
}

#[test]
fn create_and_destroy_are_symmetric() {
    let baseline = live_aligned_allocations();

    for threads in 1..=6 {
        let pool: ThreadPool<Root> = ThreadPool::new(threads).unwrap();
        assert_eq!(live_aligned_allocations(), baseline + threads);
        drop(pool);
        assert_eq!(live_aligned_allocations(), baseline);
    }
}
