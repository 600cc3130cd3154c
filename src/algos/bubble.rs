//! Bubble sort producer.
//!
//! Each pass scans adjacent pairs left to right, emitting a compare per
//! pair and a swap when the pair is out of order. After a pass the
//! rightmost unfixed index is final and gets marked. A swap-free pass
//! means the whole array is already ordered (valid for bubble sort's pass
//! structure specifically), so the remaining indices are marked low to
//! high and the producer stops early.

use crate::core::producer::{SinkClosed, StepSink};

pub(crate) fn run(mut a: Vec<u32>, sink: &StepSink) -> Result<(), SinkClosed> {
    let n = a.len();
    for i in 0..n {
        let mut swapped = false;
        for j in 0..n - 1 - i {
            sink.compare(j, j + 1)?;
            if a[j] > a[j + 1] {
                a.swap(j, j + 1);
                sink.swap(j, j + 1)?;
                swapped = true;
            }
        }
        sink.mark_sorted(n - 1 - i)?;
        if !swapped {
            for k in 0..n - 1 - i {
                sink.mark_sorted(k)?;
            }
            break;
        }
    }
    Ok(())
}
