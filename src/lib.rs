//! SORTVIZ - Sorting algorithm visualization engine library
//!
//! Re-exports all modules for use by binary targets.

// Core engine (step transport, stats, playback)
pub mod core;

// App modules
pub mod algos;
pub mod cli;
pub mod step;
pub mod utils;

// Re-export commonly used types from core
pub use core::playback::{Highlights, Playback, PlaybackState, RenderState};
pub use core::producer::{SinkClosed, StepPoll, StepSink, StepStream};
pub use core::stats::Stats;

// Re-export the event model and registry
pub use algos::{AlgoMeta, Algorithm, Complexity};
pub use step::Step;
pub use utils::{ArraySupplier, RandomSupplier};
