//! Insertion sort producer.
//!
//! For each new element the sorted prefix is scanned backward. Every
//! scanned pair emits a compare; a scanned element greater than the key is
//! shifted one slot right with an overwrite. The scan stops at the first
//! comparison that needs no shift. The key itself is written only when its
//! resting slot holds a different value, so an element already in place
//! costs one compare and zero writes. Global order is only guaranteed at
//! the very end, so sortedness is reported in one ascending bulk.

use crate::core::producer::{SinkClosed, StepSink};

pub(crate) fn run(mut a: Vec<u32>, sink: &StepSink) -> Result<(), SinkClosed> {
    for i in 1..a.len() {
        let key = a[i];
        // j is the slot being filled; the scanned element sits at j - 1.
        let mut j = i;
        while j > 0 {
            sink.compare(j - 1, j)?;
            if a[j - 1] > key {
                a[j] = a[j - 1];
                sink.overwrite(j, a[j])?;
                j -= 1;
            } else {
                break;
            }
        }
        if a[j] != key {
            a[j] = key;
            sink.overwrite(j, key)?;
        }
    }
    for i in 0..a.len() {
        sink.mark_sorted(i)?;
    }
    Ok(())
}
