//! Merge sort producer.
//!
//! Classic top-down recursion over inclusive ranges with one scratch
//! buffer. Merging compares the two run heads (absolute indices) and
//! stages into scratch; the copy-back emits an overwrite for every index
//! of the merged range, changed or not, because each placement is a real
//! write of the algorithm. There is no meaningful "permanently fixed"
//! index mid-sort, so sortedness is reported in one ascending bulk at the
//! very end.

use crate::core::producer::{SinkClosed, StepSink};

pub(crate) fn run(mut a: Vec<u32>, sink: &StepSink) -> Result<(), SinkClosed> {
    let n = a.len();
    let mut tmp = a.clone();
    if n > 0 {
        sort(&mut a, &mut tmp, 0, n - 1, sink)?;
    }
    for i in 0..n {
        sink.mark_sorted(i)?;
    }
    Ok(())
}

fn sort(
    a: &mut [u32],
    tmp: &mut [u32],
    lo: usize,
    hi: usize,
    sink: &StepSink,
) -> Result<(), SinkClosed> {
    if lo >= hi {
        return Ok(());
    }
    let mid = (lo + hi) / 2;
    sort(a, tmp, lo, mid, sink)?;
    sort(a, tmp, mid + 1, hi, sink)?;
    merge(a, tmp, lo, mid, hi, sink)
}

fn merge(
    a: &mut [u32],
    tmp: &mut [u32],
    lo: usize,
    mid: usize,
    hi: usize,
    sink: &StepSink,
) -> Result<(), SinkClosed> {
    let (mut i, mut j, mut k) = (lo, mid + 1, lo);
    while i <= mid && j <= hi {
        sink.compare(i, j)?;
        if a[i] <= a[j] {
            tmp[k] = a[i];
            i += 1;
        } else {
            tmp[k] = a[j];
            j += 1;
        }
        k += 1;
    }
    while i <= mid {
        tmp[k] = a[i];
        i += 1;
        k += 1;
    }
    while j <= hi {
        tmp[k] = a[j];
        j += 1;
        k += 1;
    }
    for t in lo..=hi {
        a[t] = tmp[t];
        sink.overwrite(t, a[t])?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::algos::testkit::{replay, steps_of};
    use crate::algos::Algorithm;
    use crate::step::Step;

    #[test]
    fn test_reference_trace_2_1() {
        let steps = steps_of(Algorithm::Merge, &[2, 1]);
        assert_eq!(
            steps,
            vec![
                Step::Compare { i: 0, j: 1 },
                Step::Overwrite { i: 0, value: 1 },
                Step::Overwrite { i: 1, value: 2 },
                Step::MarkSorted { index: 0 },
                Step::MarkSorted { index: 1 },
            ]
        );
        assert_eq!(replay(&[2, 1], &steps), vec![1, 2]);
    }

    #[test]
    fn test_copy_back_overwrites_whole_range() {
        // Merging [1,2] emits overwrites even though nothing moves.
        let steps = steps_of(Algorithm::Merge, &[1, 2]);
        assert_eq!(
            steps,
            vec![
                Step::Compare { i: 0, j: 1 },
                Step::Overwrite { i: 0, value: 1 },
                Step::Overwrite { i: 1, value: 2 },
                Step::MarkSorted { index: 0 },
                Step::MarkSorted { index: 1 },
            ]
        );
    }

    #[test]
    fn test_equal_heads_prefer_left_run() {
        // Stability tie-break: a[i] <= a[j] takes the left head.
        let input = vec![3, 1, 3, 2];
        let steps = steps_of(Algorithm::Merge, &input);
        assert_eq!(replay(&input, &steps), vec![1, 2, 3, 3]);
    }

    #[test]
    fn test_four_elements_merge_bottom_up_order() {
        let input = vec![4, 3, 2, 1];
        let steps = steps_of(Algorithm::Merge, &input);
        // First merge touches (0,1), second (2,3), final one (0..=3).
        let first_overwrite = steps
            .iter()
            .position(|s| matches!(s, Step::Overwrite { .. }))
            .unwrap();
        assert_eq!(steps[first_overwrite], Step::Overwrite { i: 0, value: 3 });
        assert_eq!(replay(&input, &steps), vec![1, 2, 3, 4]);
    }
}
