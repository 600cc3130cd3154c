//! Playback controller: drives a step producer under pause/resume/abort
//! and speed control.
//!
//! **Architecture**: `Playback` owns the only producer instance for the
//! current run and all derived run state (visible array, highlights,
//! stats, state machine). The render collaborator never gets callbacks; it
//! pulls read-only snapshots via the accessors whenever it wants a frame.
//!
//! # Pull loop
//!
//! One long-lived thread per run. Per iteration: check abort, poll while
//! paused (re-checking abort each wake), pull one step, apply it, sleep
//! the speed-derived delay, clear transient highlights. Every wait — the
//! pause poll, the step wait, the inter-step delay — re-checks the abort
//! flag at least every `PAUSE_POLL`, so `reset`/`new_array` never wait
//! longer than that to reclaim the loop.
//!
//! # Cancellation
//!
//! Level-triggered: a single `AtomicBool` observed at every loop boundary.
//! Unwinding on abort is silent; it is an expected control path, not an
//! error. No panics or unwind tricks cross the suspension points.
//!
//! # Consistency
//!
//! The pull loop is the single writer of array, highlights and counters;
//! readers only ever clone behind the locks. Every mutating step replaces
//! the visible array wholesale, so a reader can never observe a
//! half-applied step.

use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, RwLock};
use std::thread;
use std::time::{Duration, Instant};

use log::{debug, info, trace};
use serde::Serialize;

use crate::algos::Algorithm;
use crate::core::producer::{StepPoll, StepStream};
use crate::core::stats::Stats;
use crate::step::Step;
use crate::utils::{self, ArraySupplier};

/// How often the paused pull loop and the abort-aware sleep wake up.
const PAUSE_POLL: Duration = Duration::from_millis(25);

/// Sampling interval of the elapsed-time ticker.
const TICK_INTERVAL: Duration = Duration::from_millis(16);

/// Lifecycle of the playback engine.
///
/// `Aborted` and `Completed` are terminal for a run; the next `run()`
/// reinitializes to `Running` without an explicit transition through
/// `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaybackState {
    Idle,
    Running,
    Paused,
    Completed,
    Aborted,
}

/// Index sets the render collaborator maps to visual emphasis.
///
/// `comparing` and `swapping` are transient (cleared between steps);
/// `pivot` persists until replaced or the run ends; `sorted` only grows
/// within a run.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct Highlights {
    pub comparing: Vec<usize>,
    pub swapping: Vec<usize>,
    pub pivot: Option<usize>,
    pub sorted: std::collections::BTreeSet<usize>,
}

/// Everything a renderer needs for one display frame, pulled as one
/// consistent bundle.
#[derive(Debug, Clone, Serialize)]
pub struct RenderState {
    pub array: Vec<u32>,
    pub stats: Stats,
    pub highlights: Highlights,
    pub state: PlaybackState,
}

/// Active-time stopwatch. `offset` accumulates completed running spans;
/// `resumed_at` is set only while the clock is advancing.
#[derive(Debug, Default)]
struct RunTimer {
    offset: Duration,
    resumed_at: Option<Instant>,
}

impl RunTimer {
    fn freeze(&mut self) -> Duration {
        if let Some(at) = self.resumed_at.take() {
            self.offset += at.elapsed();
        }
        self.offset
    }

    fn current(&self) -> Duration {
        match self.resumed_at {
            Some(at) => self.offset + at.elapsed(),
            None => self.offset,
        }
    }
}

/// State shared between the controller, the pull loop and the ticker.
struct Shared {
    array: RwLock<Vec<u32>>,
    snapshot: RwLock<Vec<u32>>,
    counts: RwLock<Stats>,
    highlights: RwLock<Highlights>,
    state: RwLock<PlaybackState>,
    timer: Mutex<RunTimer>,
    elapsed_ms: AtomicU64,
    abort: AtomicBool,
    speed: AtomicU32,
    ticker_alive: AtomicBool,
}

impl Shared {
    fn new(array: Vec<u32>, speed: u32) -> Self {
        let snapshot = array.clone();
        Self {
            array: RwLock::new(array),
            snapshot: RwLock::new(snapshot),
            counts: RwLock::new(Stats::default()),
            highlights: RwLock::new(Highlights::default()),
            state: RwLock::new(PlaybackState::Idle),
            timer: Mutex::new(RunTimer::default()),
            elapsed_ms: AtomicU64::new(0),
            abort: AtomicBool::new(false),
            speed: AtomicU32::new(speed),
            ticker_alive: AtomicBool::new(false),
        }
    }

    fn state(&self) -> PlaybackState {
        *self.state.read().unwrap_or_else(|e| e.into_inner())
    }

    fn set_state(&self, next: PlaybackState) {
        *self.state.write().unwrap_or_else(|e| e.into_inner()) = next;
    }

    fn aborted(&self) -> bool {
        self.abort.load(Ordering::Relaxed)
    }

    /// Apply one step: stats, highlights, and array (replaced wholesale
    /// for mutating steps so readers only see fully-applied states).
    fn apply(&self, step: &Step) {
        self.counts
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .record(step);

        {
            let mut hl = self.highlights.write().unwrap_or_else(|e| e.into_inner());
            match *step {
                Step::Compare { i, j } => hl.comparing = vec![i, j],
                Step::Swap { i, j } => hl.swapping = vec![i, j],
                Step::Pivot { index } => hl.pivot = Some(index),
                Step::MarkSorted { index } => {
                    hl.sorted.insert(index);
                }
                Step::Overwrite { .. } => {}
            }
        }

        if step.is_mutation() {
            let mut next = self.array.read().unwrap_or_else(|e| e.into_inner()).clone();
            step.apply_to(&mut next);
            *self.array.write().unwrap_or_else(|e| e.into_inner()) = next;
        }
    }

    /// Drop the transient emphasis so the next compare/swap repopulates it.
    fn clear_transient(&self) {
        let mut hl = self.highlights.write().unwrap_or_else(|e| e.into_inner());
        hl.comparing.clear();
        hl.swapping.clear();
    }

    /// Producer exhausted normally: settle highlights, freeze the clock,
    /// mark every index sorted, and complete the run.
    fn finalize(&self) {
        {
            let len = self.array.read().unwrap_or_else(|e| e.into_inner()).len();
            let mut hl = self.highlights.write().unwrap_or_else(|e| e.into_inner());
            hl.comparing.clear();
            hl.swapping.clear();
            hl.pivot = None;
            hl.sorted = (0..len).collect();
        }
        let frozen = self
            .timer
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .freeze();
        self.elapsed_ms
            .store(frozen.as_millis() as u64, Ordering::Relaxed);
        self.set_state(PlaybackState::Completed);
        info!("run completed after {}ms of active time", frozen.as_millis());
    }

    /// Reset counters, highlights and stopwatch for a fresh run.
    fn clear_run_outputs(&self) {
        *self.counts.write().unwrap_or_else(|e| e.into_inner()) = Stats::default();
        *self.highlights.write().unwrap_or_else(|e| e.into_inner()) = Highlights::default();
        *self.timer.lock().unwrap_or_else(|e| e.into_inner()) = RunTimer::default();
        self.elapsed_ms.store(0, Ordering::Relaxed);
    }

    /// Sleep up to `total`, waking at least every `PAUSE_POLL` to observe
    /// the abort flag. Returns false when aborted.
    fn sleep_unless_aborted(&self, total: Duration) -> bool {
        let deadline = Instant::now() + total;
        loop {
            if self.aborted() {
                return false;
            }
            let now = Instant::now();
            if now >= deadline {
                return true;
            }
            thread::sleep((deadline - now).min(PAUSE_POLL));
        }
    }
}

/// The cooperative pull loop: one iteration per step.
fn pull_loop(shared: Arc<Shared>, mut steps: StepStream) {
    loop {
        if shared.aborted() {
            trace!("pull loop: abort observed at loop entry");
            return;
        }

        while shared.state() == PlaybackState::Paused {
            if shared.aborted() {
                trace!("pull loop: abort observed while paused");
                return;
            }
            thread::sleep(PAUSE_POLL);
        }

        let step = loop {
            if shared.aborted() {
                return;
            }
            match steps.poll_next(PAUSE_POLL) {
                StepPoll::Step(step) => break step,
                StepPoll::Exhausted => {
                    shared.finalize();
                    return;
                }
                StepPoll::TimedOut => {}
            }
        };

        shared.apply(&step);

        let delay = utils::delay_from_speed(shared.speed.load(Ordering::Relaxed));
        if !shared.sleep_unless_aborted(delay) {
            return;
        }

        shared.clear_transient();
    }
}

/// Elapsed-time sampler: writes `offset + (now - resumed_at)` into the
/// shared counter while the run is active, freezes while paused, and
/// exits as soon as the run leaves `Running`/`Paused`.
fn ticker_loop(shared: Arc<Shared>) {
    loop {
        match shared.state() {
            PlaybackState::Running | PlaybackState::Paused => {
                let current = shared
                    .timer
                    .lock()
                    .unwrap_or_else(|e| e.into_inner())
                    .current();
                shared
                    .elapsed_ms
                    .store(current.as_millis() as u64, Ordering::Relaxed);
            }
            _ => break,
        }
        thread::sleep(TICK_INTERVAL);
    }
    shared.ticker_alive.store(false, Ordering::Release);
    trace!("ticker stopped");
}

/// Playback engine for sorting visualizations.
///
/// Owns the visible array, the snapshot used by [`reset`](Self::reset),
/// run statistics, highlight sets and the playback state machine. Exactly
/// one run is ever active; a producer is instantiated per run and never
/// reused.
pub struct Playback {
    shared: Arc<Shared>,
    algo: Algorithm,
    size: usize,
    supplier: Box<dyn ArraySupplier>,
    pull: Option<thread::JoinHandle<()>>,
    ticker: Option<thread::JoinHandle<()>>,
}

impl Playback {
    /// Engine with a freshly supplied array of `size` elements (clamped).
    pub fn new(algo: Algorithm, size: usize, speed: u32, mut supplier: Box<dyn ArraySupplier>) -> Self {
        let size = utils::clamp_size(size);
        let array = supplier.supply(size);
        info!("playback engine ready: {} over {} elements", algo.meta().name, size);
        Self {
            shared: Arc::new(Shared::new(array, utils::clamp_speed(speed))),
            algo,
            size,
            supplier,
            pull: None,
            ticker: None,
        }
    }

    // === Public operations ===

    /// Start a run of the selected algorithm over the current array.
    ///
    /// No-op while a run is active (running or paused). Captures the reset
    /// snapshot, zeroes stats and highlights, instantiates the producer
    /// from a private copy of the visible array, and spawns the pull loop
    /// and (if needed) the ticker.
    pub fn run(&mut self) {
        match self.shared.state() {
            PlaybackState::Running | PlaybackState::Paused => {
                debug!("run() ignored: a run is already active");
                return;
            }
            _ => {}
        }
        self.reap();

        let shared = &self.shared;
        shared.abort.store(false, Ordering::Relaxed);

        let input = shared.array.read().unwrap_or_else(|e| e.into_inner()).clone();
        *shared.snapshot.write().unwrap_or_else(|e| e.into_inner()) = input.clone();
        shared.clear_run_outputs();
        {
            let mut timer = shared.timer.lock().unwrap_or_else(|e| e.into_inner());
            timer.resumed_at = Some(Instant::now());
        }
        shared.set_state(PlaybackState::Running);
        info!("run started: {} over {} elements", self.algo.meta().name, input.len());

        let steps = self.algo.stream(input);
        let loop_shared = Arc::clone(shared);
        self.pull = Some(
            thread::Builder::new()
                .name("sortviz-playback".into())
                .spawn(move || pull_loop(loop_shared, steps))
                .expect("failed to spawn playback thread"),
        );
        self.start_ticker();
    }

    /// Pause a running run; folds the active span into the stopwatch.
    /// Effective only while `Running`.
    ///
    /// Guard and transition happen under one state write guard: the pull
    /// loop may complete the run concurrently, and a check-then-set gap
    /// would let a late pause overwrite `Completed` with `Paused`.
    pub fn pause(&mut self) {
        let mut st = self.shared.state.write().unwrap_or_else(|e| e.into_inner());
        if *st != PlaybackState::Running {
            return;
        }
        let frozen = self
            .shared
            .timer
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .freeze();
        self.shared
            .elapsed_ms
            .store(frozen.as_millis() as u64, Ordering::Relaxed);
        *st = PlaybackState::Paused;
        debug!("paused at {}ms active", frozen.as_millis());
    }

    /// Resume a paused run. Effective only while `Paused`; same
    /// single-guard shape as [`pause`](Self::pause).
    pub fn resume(&mut self) {
        let mut st = self.shared.state.write().unwrap_or_else(|e| e.into_inner());
        if *st != PlaybackState::Paused {
            return;
        }
        self.shared
            .timer
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .resumed_at = Some(Instant::now());
        *st = PlaybackState::Running;
        debug!("resumed");
    }

    /// Abort any in-flight run, restore the array to the snapshot captured
    /// at run start, zero stats and highlights, and settle in `Idle`.
    pub fn reset(&mut self) {
        self.stop_run();
        let snapshot = self
            .shared
            .snapshot
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone();
        *self.shared.array.write().unwrap_or_else(|e| e.into_inner()) = snapshot;
        self.shared.clear_run_outputs();
        self.shared.set_state(PlaybackState::Idle);
        info!("reset to run-start snapshot");
    }

    /// Same abort/clear behavior as [`reset`](Self::reset), then installs
    /// a freshly supplied array of `n` (clamped) elements as both the
    /// visible array and the new snapshot.
    pub fn new_array(&mut self, n: usize) {
        self.stop_run();
        self.size = utils::clamp_size(n);
        let next = self.supplier.supply(self.size);
        *self.shared.array.write().unwrap_or_else(|e| e.into_inner()) = next.clone();
        *self.shared.snapshot.write().unwrap_or_else(|e| e.into_inner()) = next;
        self.shared.clear_run_outputs();
        self.shared.set_state(PlaybackState::Idle);
        info!("new array of {} elements", self.size);
    }

    /// Set playback speed (clamped). Read live by the pull loop, so it
    /// affects the very next inter-step delay.
    pub fn set_speed(&mut self, v: u32) {
        self.shared
            .speed
            .store(utils::clamp_speed(v), Ordering::Relaxed);
    }

    /// Set the array size (clamped). While no run is active this
    /// regenerates the array immediately; during a run it only takes
    /// effect at the next `new_array`.
    pub fn set_size(&mut self, n: usize) {
        self.size = utils::clamp_size(n);
        match self.shared.state() {
            PlaybackState::Running | PlaybackState::Paused => {
                debug!("set_size({}) deferred: run active", self.size);
            }
            _ => self.new_array(self.size),
        }
    }

    /// Select the algorithm for the next run. The active run, if any,
    /// keeps its producer; the external control surface is expected to
    /// reject mid-run switches anyway.
    pub fn set_algorithm(&mut self, algo: Algorithm) {
        self.algo = algo;
    }

    // === Read surface for the render collaborator ===

    pub fn state(&self) -> PlaybackState {
        self.shared.state()
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algo
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn speed(&self) -> u32 {
        self.shared.speed.load(Ordering::Relaxed)
    }

    /// Current visible array (always a fully-consistent state).
    pub fn array(&self) -> Vec<u32> {
        self.shared.array.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Array state captured at the start of the current run (or installed
    /// by the last `new_array`).
    pub fn snapshot(&self) -> Vec<u32> {
        self.shared
            .snapshot
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Counters plus the active-time stopwatch.
    pub fn stats(&self) -> Stats {
        let mut stats = *self.shared.counts.read().unwrap_or_else(|e| e.into_inner());
        stats.elapsed_ms = self.shared.elapsed_ms.load(Ordering::Relaxed);
        stats
    }

    pub fn highlights(&self) -> Highlights {
        self.shared
            .highlights
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// One consistent bundle for a display frame.
    pub fn render_state(&self) -> RenderState {
        RenderState {
            array: self.array(),
            stats: self.stats(),
            highlights: self.highlights(),
            state: self.state(),
        }
    }

    // === Internals ===

    /// Signal abort, mark the run `Aborted`, and join both threads. The
    /// pull loop observes the flag within `PAUSE_POLL`; the ticker exits
    /// once the state leaves `Running`/`Paused`.
    fn stop_run(&mut self) {
        self.shared.abort.store(true, Ordering::Relaxed);
        {
            let mut st = self.shared.state.write().unwrap_or_else(|e| e.into_inner());
            if matches!(*st, PlaybackState::Running | PlaybackState::Paused) {
                *st = PlaybackState::Aborted;
            }
        }
        self.reap();
    }

    /// Join any finished or aborting worker threads.
    fn reap(&mut self) {
        if let Some(handle) = self.pull.take() {
            let _ = handle.join();
        }
        if let Some(handle) = self.ticker.take() {
            let _ = handle.join();
        }
    }

    /// Spawn the elapsed-time sampler; no-op while one is already alive.
    fn start_ticker(&mut self) {
        if self.shared.ticker_alive.swap(true, Ordering::AcqRel) {
            return;
        }
        let shared = Arc::clone(&self.shared);
        self.ticker = Some(
            thread::Builder::new()
                .name("sortviz-ticker".into())
                .spawn(move || ticker_loop(shared))
                .expect("failed to spawn ticker thread"),
        );
    }
}

impl Drop for Playback {
    fn drop(&mut self) {
        // No worker outlives the engine.
        self.stop_run();
    }
}
