//! Step event model: the vocabulary of atomic operations a sort reports.
//!
//! A producer never touches the visible array directly. It describes every
//! elementary operation as a `Step`, and the playback controller replays
//! those steps one at a time. Applying the full sequence in order to a copy
//! of the producer's input reconstructs every intermediate array state.
//!
//! This is a closed set: the controller matches exhaustively, so adding a
//! new step kind requires updating its apply logic.

use serde::{Deserialize, Serialize};

/// One atomic operation of a sorting run.
///
/// Indices always refer to positions in the array being visualized at the
/// moment the step is applied. A step carrying an out-of-bounds index is a
/// producer defect, not a recoverable condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Step {
    /// Two positions were inspected. No mutation.
    Compare { i: usize, j: usize },
    /// The values at two positions were exchanged.
    Swap { i: usize, j: usize },
    /// Position `i` was set to `value`. A single overwrite is not
    /// necessarily a permutation; the full sequence preserves the multiset.
    Overwrite { i: usize, value: u32 },
    /// Marks the current partition pivot. Advisory, non-mutating.
    Pivot { index: usize },
    /// Marks an index as permanently in its final position.
    MarkSorted { index: usize },
}

impl Step {
    /// Apply the mutation this step describes to `a`.
    ///
    /// `Compare`, `Pivot` and `MarkSorted` are inspection-only and leave
    /// the array untouched. This is the single definition of step mutation
    /// semantics, shared by the playback controller and by replay tests.
    pub fn apply_to(&self, a: &mut [u32]) {
        match *self {
            Step::Swap { i, j } => a.swap(i, j),
            Step::Overwrite { i, value } => a[i] = value,
            Step::Compare { .. } | Step::Pivot { .. } | Step::MarkSorted { .. } => {}
        }
    }

    /// True for step kinds that change the array.
    pub fn is_mutation(&self) -> bool {
        matches!(self, Step::Swap { .. } | Step::Overwrite { .. })
    }
}
