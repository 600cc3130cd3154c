//! Quick sort producer.
//!
//! Iterative with an explicit work stack of inclusive `(lo, hi)` ranges.
//! The last element of a range is the pivot; a single left-to-right
//! partition pass compares every candidate against it and swaps low-side
//! elements into place. After the pivot lands, the larger child partition
//! is pushed first and the smaller last, so the LIFO stack always works on
//! the smaller side next and its depth stays O(log n) — the standard
//! tail-elimination trick. Singleton ranges are marked sorted directly.

use log::trace;

use crate::core::producer::{SinkClosed, StepSink};

pub(crate) fn run(a: Vec<u32>, sink: &StepSink) -> Result<(), SinkClosed> {
    run_tracking_depth(a, sink).map(|_| ())
}

/// Same as [`run`], returning the peak work-stack depth so tests can pin
/// the logarithmic bound.
pub(crate) fn run_tracking_depth(
    mut a: Vec<u32>,
    sink: &StepSink,
) -> Result<usize, SinkClosed> {
    let n = a.len();
    let mut stack: Vec<(usize, usize)> = Vec::new();
    if n > 0 {
        stack.push((0, n - 1));
    }
    let mut peak = stack.len();

    while let Some((lo, hi)) = stack.pop() {
        if lo == hi {
            sink.mark_sorted(lo)?;
            continue;
        }

        let pivot = a[hi];
        let mut i = lo;
        sink.pivot(hi)?;
        for j in lo..hi {
            sink.compare(j, hi)?;
            if a[j] <= pivot {
                if i != j {
                    a.swap(i, j);
                    sink.swap(i, j)?;
                }
                i += 1;
            }
        }
        if i != hi {
            a.swap(i, hi);
            sink.swap(i, hi)?;
        }
        sink.mark_sorted(i)?;

        // Child ranges, skipping empty ones (singletons are pushed and
        // marked when popped). Sizes may be negative when a side
        // collapses, so the comparison runs on signed values.
        let left_size = i as i64 - 1 - lo as i64;
        let right_size = hi as i64 - (i as i64 + 1);
        let left = (i > lo).then(|| (lo, i - 1));
        let right = (i < hi).then(|| (i + 1, hi));
        if left_size > right_size {
            stack.extend(left);
            stack.extend(right);
        } else {
            stack.extend(right);
            stack.extend(left);
        }
        peak = peak.max(stack.len());
    }

    trace!("quick sort peak stack depth: {peak}");
    Ok(peak)
}
