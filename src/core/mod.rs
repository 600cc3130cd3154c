//! Core engine modules - step transport, run statistics, playback.
//!
//! These modules form the playback engine, independent of any frontend.

pub mod playback;
pub mod producer;
pub mod stats;

// Re-exports for convenience
pub use playback::{Highlights, Playback, PlaybackState, RenderState};
pub use producer::{SinkClosed, StepPoll, StepSink, StepStream};
pub use stats::Stats;
