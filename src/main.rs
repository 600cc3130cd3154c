use std::io::Write;
use std::thread;
use std::time::Duration;

use clap::Parser;
use log::{debug, info};

use sortviz::algos::Algorithm;
use sortviz::cli::Args;
use sortviz::core::playback::{Playback, PlaybackState};
use sortviz::core::stats::Stats;
use sortviz::utils::{self, ArraySupplier, RandomSupplier};

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // 0 (default) = warn, 1 (-v) = info, 2 (-vv) = debug, 3+ (-vvv) = trace
    let default_level = match args.verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    if args.list {
        print_algorithms();
        return Ok(());
    }

    let supplier: Box<dyn ArraySupplier> = match args.seed {
        Some(seed) => {
            debug!("seeded array generator: {seed}");
            Box::new(RandomSupplier::seeded(seed))
        }
        None => Box::new(RandomSupplier::new()),
    };

    if args.dump {
        return dump_steps(args.algo, args.size, supplier);
    }

    play(args.algo, args.size, args.speed, supplier)
}

fn print_algorithms() {
    println!("{:<10} {:<15} {:>10} {:>10} {:>10} {:>8}", "key", "name", "best", "average", "worst", "space");
    for algo in Algorithm::ALL {
        let m = algo.meta();
        println!(
            "{:<10} {:<15} {:>10} {:>10} {:>10} {:>8}",
            algo.key(),
            m.name,
            m.complexity.best,
            m.complexity.average,
            m.complexity.worst,
            m.complexity.space,
        );
    }
}

/// Emit the full step sequence as JSON lines, then a stats summary.
fn dump_steps(algo: Algorithm, size: usize, mut supplier: Box<dyn ArraySupplier>) -> anyhow::Result<()> {
    let input = supplier.supply(utils::clamp_size(size));
    info!("dumping {} steps for {} elements", algo.meta().name, input.len());
    println!("{}", serde_json::to_string(&input)?);

    let mut stats = Stats::default();
    for step in algo.stream(input) {
        stats.record(&step);
        println!("{}", serde_json::to_string(&step)?);
    }
    println!("{}", serde_json::to_string(&stats)?);
    Ok(())
}

/// Drive a playback run to completion, redrawing a frame per poll.
fn play(algo: Algorithm, size: usize, speed: u32, supplier: Box<dyn ArraySupplier>) -> anyhow::Result<()> {
    let mut playback = Playback::new(algo, size, speed, supplier);
    println!("{} / {} elements / speed {}", algo.meta().name, playback.size(), playback.speed());
    playback.run();

    loop {
        let view = playback.render_state();
        print!("\r{}  comparisons {:>6}  swaps {:>6}  writes {:>6}  {:>7}ms ",
            bar_row(&view.array),
            view.stats.comparisons,
            view.stats.swaps,
            view.stats.writes,
            view.stats.elapsed_ms,
        );
        std::io::stdout().flush()?;
        if view.state == PlaybackState::Completed {
            println!();
            println!("{}", serde_json::to_string(&view.stats)?);
            return Ok(());
        }
        thread::sleep(Duration::from_millis(50));
    }
}

/// Compact one-line rendering: each element becomes a block glyph scaled
/// by value.
fn bar_row(array: &[u32]) -> String {
    const BLOCKS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];
    let max = array.iter().copied().max().unwrap_or(1).max(1);
    array
        .iter()
        .map(|&v| BLOCKS[((v * 7) / max) as usize])
        .collect()
}
