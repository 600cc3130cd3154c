use clap::Parser;

use crate::algos::Algorithm;
use crate::utils::{SIZE_DEFAULT, SPEED_DEFAULT};

// Build version with target info
const VERSION_INFO: &str = const_format::concatcp!(
    env!("CARGO_PKG_VERSION"), "\n",
    "Target: ", std::env::consts::ARCH, "-", std::env::consts::OS
);

/// Sorting algorithm visualizer
#[derive(Parser, Debug)]
#[command(author, version = VERSION_INFO, about, long_about = None)]
pub struct Args {
    /// Algorithm to run
    #[arg(value_enum, default_value = "bubble")]
    pub algo: Algorithm,

    /// Number of elements to sort (clamped to 5..=150)
    #[arg(short = 'n', long = "size", value_name = "N", default_value_t = SIZE_DEFAULT)]
    pub size: usize,

    /// Playback speed (clamped to 1..=150; higher is faster)
    #[arg(short = 's', long = "speed", value_name = "SPEED", default_value_t = SPEED_DEFAULT)]
    pub speed: u32,

    /// Seed for the array generator (random when omitted)
    #[arg(long = "seed", value_name = "SEED")]
    pub seed: Option<u64>,

    /// Dump the full step sequence as JSON lines instead of playing
    #[arg(short = 'd', long = "dump")]
    pub dump: bool,

    /// List available algorithms and exit
    #[arg(short = 'L', long = "list")]
    pub list: bool,

    /// Increase logging verbosity (default: warn, -v: info, -vv: debug, -vvv+: trace)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbosity: u8,
}
