//! Run statistics derived purely from applied steps.

use serde::Serialize;

use crate::step::Step;

/// Counters for the current (or most recent) run.
///
/// `elapsed_ms` accumulates only while the run is `Running` and not
/// paused; it is sampled by the playback ticker, not by `record`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Stats {
    pub comparisons: u64,
    pub swaps: u64,
    pub writes: u64,
    pub elapsed_ms: u64,
}

impl Stats {
    /// Advance counters for one applied step.
    ///
    /// A swap touches two cells, so it counts as two writes; a pivot or
    /// sorted marker changes nothing.
    pub fn record(&mut self, step: &Step) {
        match step {
            Step::Compare { .. } => self.comparisons += 1,
            Step::Swap { .. } => {
                self.swaps += 1;
                self.writes += 2;
            }
            Step::Overwrite { .. } => self.writes += 1,
            Step::Pivot { .. } | Step::MarkSorted { .. } => {}
        }
    }

    /// Counters derived from a full step sequence, for cross-checking a
    /// live run against its emitted steps.
    pub fn from_steps<'a>(steps: impl IntoIterator<Item = &'a Step>) -> Self {
        let mut stats = Self::default();
        for step in steps {
            stats.record(step);
        }
        stats
    }
}
