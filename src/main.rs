use std::sync::Arc;

use anyhow::{Context, Result};
use plystack_core::{Color, Move, map_file, unmap};
use plystack_engine::{
    ContemptConfig, PoolConfig, SearchLimits, SearchPosition, SearchProgress, ThreadPool, Worker,
};
use tracing::info;

/// Root position handed to the pool by the driver.
#[derive(Clone, Debug)]
struct Root {
    side: Color,
    key: u64,
}

impl SearchPosition for Root {
    fn side_to_move(&self) -> Color {
        self.side
    }
}

/// Synthetic iterative deepening: visits a node per ply per iteration and
/// exercises the frame stacks and tables the way a real search would.
fn synthetic_search(worker: &mut Worker<Root>) {
    let Some(key) = worker.position().map(|root| root.key) else {
        return;
    };
    let Some(max_depth) = worker.limits().map(SearchLimits::max_depth) else {
        return;
    };

    for depth in 1..=max_depth {
        for ply in 0..usize::from(depth) {
            if worker.should_stop() {
                return;
            }
            worker.set_height(ply);
            let nodes = worker.add_node();
            let node_key = key ^ nodes.rotate_left(17);

            let eval = match worker.eval_cache.probe(node_key) {
                Some(eval) => eval,
                None => {
                    let eval = (node_key % 200) as i16 - 100;
                    worker.eval_cache.store(node_key, eval);
                    eval
                }
            };
            worker.eval_stack[ply as isize] = i32::from(eval);
        }

        let best = Move::new(depth % 64, (depth + 8) % 64);
        worker.killers.store(0, best);
        if worker.is_main()
            && let Some(progress) = worker.progress()
        {
            progress.record_iteration(depth, best);
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let mut args = std::env::args().skip(1);
    let mut config = PoolConfig {
        contempt: ContemptConfig::new(10, 5),
        ..PoolConfig::default()
    };
    if let Some(threads) = args.next() {
        config.threads = threads
            .parse()
            .with_context(|| format!("invalid thread count: {threads}"))?;
    }
    let table = args.next().and_then(|path| map_file(path));

    let mut pool: ThreadPool<Root> =
        ThreadPool::with_config(&config).context("cannot build thread pool")?;
    info!(workers = pool.len(), "plystack starting");

    if let Some(table) = &table {
        info!(path = %table.path().display(), bytes = table.len(), "auxiliary table mapped");
    }

    let root = Root {
        side: Color::White,
        key: 0x9D39_247E_3377_6D41,
    };
    let limits = Arc::new(SearchLimits {
        depth: Some(12),
        nodes: Some(50_000),
        ..SearchLimits::default()
    });

    for game in 0..2 {
        pool.reset();
        let progress = Arc::new(SearchProgress::new());
        pool.begin_search(&root, Arc::clone(&limits), Arc::clone(&progress), &config.contempt);
        pool.execute(synthetic_search);

        info!(
            game,
            nodes = pool.total_nodes(),
            tbhits = pool.total_tbhits(),
            depth = progress.completed_depth(),
            best = ?progress.best_move(),
            elapsed = ?progress.elapsed(),
            "search finished"
        );
    }

    unmap(table);
    Ok(())
}
