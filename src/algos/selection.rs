//! Selection sort producer.
//!
//! Each round scans the unsorted remainder for the minimum, comparing the
//! running candidate against every scanned element. Only a strict
//! improvement moves the candidate, and the move itself emits nothing.
//! One swap places the minimum when it is not already in position; the
//! round's index is marked sorted either way.

use crate::core::producer::{SinkClosed, StepSink};

pub(crate) fn run(mut a: Vec<u32>, sink: &StepSink) -> Result<(), SinkClosed> {
    let n = a.len();
    for i in 0..n {
        let mut min = i;
        for j in i + 1..n {
            sink.compare(min, j)?;
            if a[j] < a[min] {
                min = j;
            }
        }
        if min != i {
            a.swap(i, min);
            sink.swap(i, min)?;
        }
        sink.mark_sorted(i)?;
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
        let steps = steps_of(Algorithm::Selection, &[2, 1]);
        assert_eq!(
            steps,
            vec![
                Step::Compare { i: 0, j: 1 }, // minimum moves to index 1
                Step::Swap { i: 0, j: 1 },    // [1,2]
                Step::MarkSorted { index: 0 },
                Step::MarkSorted { index: 1 },
            ]
        );
        assert_eq!(replay(&[2, 1], &steps), vec![1, 2]);
    }

    #[test]
    fn test_compare_tracks_running_minimum() {
        let steps = steps_of(Algorithm::Selection, &[3, 1, 2]);
        assert_eq!(
            steps,
            vec![
                Step::Compare { i: 0, j: 1 }, // candidate 0 vs 1 -> min = 1
                Step::Compare { i: 1, j: 2 }, // candidate is now index 1
                Step::Swap { i: 0, j: 1 },
                Step::MarkSorted { index: 0 }, // [1,3,2]
                Step::Compare { i: 1, j: 2 },
                Step::Swap { i: 1, j: 2 },
                Step::MarkSorted { index: 1 },
                Step::MarkSorted { index: 2 },
            ]
        );
    }

    #[test]
    fn test_no_swap_when_minimum_in_place() {
        let steps = steps_of(Algorithm::Selection, &[1, 2]);
        assert_eq!(
            steps,
            vec![
                Step::Compare { i: 0, j: 1 },
                Step::MarkSorted { index: 0 },
                Step::MarkSorted { index: 1 },
            ]
        );
    }

    #[test]
    fn test_ties_keep_earlier_candidate() {
        // Equal values must not move the candidate (strict improvement only),
        // so [2,2,1] compares against index 0 until 1 wins.
        let steps = steps_of(Algorithm::Selection, &[2, 2, 1]);
        assert_eq!(steps[0], Step::Compare { i: 0, j: 1 });
        assert_eq!(steps[1], Step::Compare { i: 0, j: 2 });
        assert_eq!(steps[2], Step::Swap { i: 0, j: 2 });
    }
}
