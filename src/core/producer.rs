//! Step production over a bounded queue.
//!
//! Step generation is lazy and pull-based: a producer runs on its own
//! named thread and writes steps into a bounded
//! crossbeam channel; the consumer side is [`StepStream`], a plain
//! single-use iterator. The channel capacity of 1 keeps the producer at
//! most one step ahead of playback, so generation stays effectively lazy.
//!
//! Cancellation is cooperative and silent: dropping the stream disconnects
//! the channel, the producer's next send fails with [`SinkClosed`], and the
//! algorithm unwinds via `?` without reporting an error.

use std::thread;
use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, bounded};
use log::trace;

use crate::step::Step;

/// Producer stays at most this many steps ahead of the consumer.
const STEP_QUEUE_CAP: usize = 1;

/// The consumer went away; the producer should unwind.
///
/// Not an error condition. Algorithms propagate it with `?` and the
/// producer thread exits quietly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SinkClosed;

/// Write half handed to an algorithm: one emit helper per step kind.
pub struct StepSink {
    tx: Sender<Step>,
}

impl StepSink {
    fn send(&self, step: Step) -> Result<(), SinkClosed> {
        self.tx.send(step).map_err(|_| SinkClosed)
    }

    pub fn compare(&self, i: usize, j: usize) -> Result<(), SinkClosed> {
        self.send(Step::Compare { i, j })
    }

    pub fn swap(&self, i: usize, j: usize) -> Result<(), SinkClosed> {
        self.send(Step::Swap { i, j })
    }

    pub fn overwrite(&self, i: usize, value: u32) -> Result<(), SinkClosed> {
        self.send(Step::Overwrite { i, value })
    }

    pub fn pivot(&self, index: usize) -> Result<(), SinkClosed> {
        self.send(Step::Pivot { index })
    }

    pub fn mark_sorted(&self, index: usize) -> Result<(), SinkClosed> {
        self.send(Step::MarkSorted { index })
    }
}

/// Outcome of a bounded wait for the next step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepPoll {
    Step(Step),
    /// The sequence ended; terminal, the producer thread is reaped.
    Exhausted,
    /// Nothing arrived within the timeout; the sequence is still live.
    TimedOut,
}

/// Pull side of a producer: a finite, ordered, non-restartable step
/// sequence. Exactly one exists per run; it is never reused.
///
/// Dropping the stream mid-sequence cancels the producer thread and joins
/// it, so no thread outlives the run that spawned it.
pub struct StepStream {
    rx: Option<Receiver<Step>>,
    handle: Option<thread::JoinHandle<()>>,
}

impl StepStream {
    /// Spawn `f` on a named producer thread feeding a bounded channel.
    ///
    /// `f` receives the write half and returns `Err(SinkClosed)` when the
    /// consumer disconnected early; both outcomes just end the thread.
    pub fn spawn<F>(name: &str, f: F) -> Self
    where
        F: FnOnce(&StepSink) -> Result<(), SinkClosed> + Send + 'static,
    {
        let (tx, rx) = bounded::<Step>(STEP_QUEUE_CAP);
        let thread_name = format!("sortviz-producer-{name}");
        let handle = thread::Builder::new()
            .name(thread_name.clone())
            .spawn(move || {
                let sink = StepSink { tx };
                match f(&sink) {
                    Ok(()) => trace!("{thread_name}: sequence exhausted"),
                    Err(SinkClosed) => trace!("{thread_name}: consumer gone, unwinding"),
                }
            })
            .expect("failed to spawn producer thread");

        Self {
            rx: Some(rx),
            handle: Some(handle),
        }
    }

    /// Wait up to `timeout` for the next step.
    ///
    /// Unlike the blocking [`Iterator`] path this never parks the caller
    /// longer than `timeout`, so a cancellation flag can be re-checked
    /// between polls.
    pub fn poll_next(&mut self, timeout: Duration) -> StepPoll {
        let Some(rx) = self.rx.as_ref() else {
            return StepPoll::Exhausted;
        };
        match rx.recv_timeout(timeout) {
            Ok(step) => StepPoll::Step(step),
            Err(RecvTimeoutError::Timeout) => StepPoll::TimedOut,
            Err(RecvTimeoutError::Disconnected) => {
                self.rx = None;
                self.join_producer();
                StepPoll::Exhausted
            }
        }
    }

    fn join_producer(&mut self) {
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Iterator for StepStream {
    type Item = Step;

    fn next(&mut self) -> Option<Step> {
        let rx = self.rx.as_ref()?;
        match rx.recv() {
            Ok(step) => Some(step),
            Err(_) => {
                // Producer finished and dropped its sender. Reap the thread
                // now so exhaustion leaves nothing running.
                self.rx = None;
                self.join_producer();
                None
            }
        }
    }
}

impl Drop for StepStream {
    fn drop(&mut self) {
        // Disconnect first: a producer blocked on a full channel wakes up
        // with a send error and exits, making the join below prompt.
        self.rx = None;
        self.join_producer();
    }
}

/// Run a producer body synchronously and collect everything it emits.
/// Test-only: real playback always goes through [`StepStream::spawn`].
#[cfg(test)]
pub(crate) fn collect_steps<F>(f: F) -> Vec<Step>
where
    F: FnOnce(&StepSink) -> Result<(), SinkClosed>,
{
    let (tx, rx) = crossbeam_channel::unbounded::<Step>();
    let sink = StepSink { tx };
    f(&sink).expect("unbounded sink cannot close");
    drop(sink);
    rx.try_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stream_yields_in_order_then_exhausts() {
        let mut stream = StepStream::spawn("test", |sink| {
            sink.compare(0, 1)?;
            sink.swap(0, 1)?;
            sink.mark_sorted(0)
        });

        assert_eq!(stream.next(), Some(Step::Compare { i: 0, j: 1 }));
        assert_eq!(stream.next(), Some(Step::Swap { i: 0, j: 1 }));
        assert_eq!(stream.next(), Some(Step::MarkSorted { index: 0 }));
        assert_eq!(stream.next(), None);
        // Exhaustion is terminal
        assert_eq!(stream.next(), None);
    }

    #[test]
    fn test_dropping_stream_cancels_producer() {
        // Producer wants to emit far more than the queue holds; dropping
        // the stream early must still let it unwind (drop joins).
        let mut stream = StepStream::spawn("cancel", |sink| {
            for i in 0..1_000_000 {
                sink.mark_sorted(i)?;
            }
            Ok(())
        });
        assert!(stream.next().is_some());
        drop(stream); // must not hang
    }

    #[test]
    fn test_poll_next_bounds_the_wait() {
        // A producer that takes a while to emit: the poll returns TimedOut
        // instead of parking the caller, then delivers the step and the
        // terminal Exhausted.
        let mut stream = StepStream::spawn("poll", |sink| {
            thread::sleep(Duration::from_millis(60));
            sink.mark_sorted(0)
        });
        assert_eq!(stream.poll_next(Duration::from_millis(5)), StepPoll::TimedOut);

        let step = loop {
            match stream.poll_next(Duration::from_millis(25)) {
                StepPoll::Step(step) => break step,
                StepPoll::TimedOut => continue,
                StepPoll::Exhausted => panic!("exhausted before emitting"),
            }
        };
        assert_eq!(step, Step::MarkSorted { index: 0 });
        assert_eq!(stream.poll_next(Duration::from_millis(25)), StepPoll::Exhausted);
        // Exhaustion is terminal here too
        assert_eq!(stream.poll_next(Duration::from_millis(1)), StepPoll::Exhausted);
    }

    #[test]
    fn test_empty_sequence() {
        let mut stream = StepStream::spawn("empty", |_| Ok(()));
        assert_eq!(stream.next(), None);
    }
}
