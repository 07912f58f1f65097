//! The transmission engine.
//!
//! One background worker task executes the rate-controlled emission loop:
//! produce, publish, persist, count, evaluate, delay. All control calls
//! (`start`, `stop`, `set_rate`) come from other tasks and are
//! non-blocking; shared run state lives in atomics and the cancellation
//! signal is a watch channel the worker races against its inter-tick
//! sleep. The worker never blocks on the caller; the caller only waits on
//! the worker to observe the terminal Idle transition.

mod stop;

pub use stop::StopLimits;

use crate::events::{EventBus, EventReceiver, EventSender, SentRecord, StopReason};
use crate::sink::FileSink;
use crate::source::{BoxedSource, Corpus, ReplaySource, SyntheticSource};
use crate::template::TemplateSet;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::watch;
use tokio::time::Instant;
use tracing::{debug, info, warn};

/// Engine errors.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Transmission already running")]
    AlreadyRunning,
    #[error("Invalid rate: {0} msg/sec (must be positive and finite)")]
    InvalidRate(f64),
}

/// Engine lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineState {
    Idle,
    Running,
}

/// Everything a run needs, captured immutably at `start()`.
#[derive(Debug, Clone)]
pub struct RunPlan {
    templates: TemplateSet,
    corpus: Option<Corpus>,
    limits: StopLimits,
    out_dir: Option<PathBuf>,
}

impl RunPlan {
    /// A synthetic run over a template snapshot, no limits, no sink.
    pub fn new(templates: TemplateSet) -> Self {
        Self {
            templates,
            corpus: None,
            limits: StopLimits::none(),
            out_dir: None,
        }
    }

    /// Replay from a corpus instead of generating. `None` keeps synthetic
    /// mode, so an empty operator selection falls through cleanly.
    pub fn with_corpus(mut self, corpus: Option<Corpus>) -> Self {
        self.corpus = corpus;
        self
    }

    /// Apply stop limits.
    pub fn with_limits(mut self, limits: StopLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Persist each emitted message under this directory.
    pub fn with_out_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.out_dir = Some(dir.into());
        self
    }

    fn into_source(self) -> (BoxedSource, StopLimits, Option<FileSink>) {
        let sink = self.out_dir.map(FileSink::new);
        let source: BoxedSource = match self.corpus {
            Some(corpus) => Box::new(ReplaySource::new(corpus)),
            None => Box::new(SyntheticSource::new(self.templates)),
        };
        (source, self.limits, sink)
    }
}

/// Snapshot of the engine's run state for counter displays.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RunStatus {
    pub running: bool,
    pub emitted: u64,
    pub rate_hz: f64,
}

/// The transmission engine. One instance owns at most one worker loop;
/// starting while running is rejected rather than spawning a second loop.
pub struct Transmitter {
    events: EventBus,
    running: Arc<AtomicBool>,
    emitted: Arc<AtomicU64>,
    rate_bits: Arc<AtomicU64>,
    stop_tx: watch::Sender<bool>,
    state_tx: watch::Sender<EngineState>,
}

impl Transmitter {
    /// Create an idle engine with the default rate of 1 msg/sec.
    pub fn new() -> Self {
        let (stop_tx, _) = watch::channel(false);
        let (state_tx, _) = watch::channel(EngineState::Idle);
        Self {
            events: EventBus::new(),
            running: Arc::new(AtomicBool::new(false)),
            emitted: Arc::new(AtomicU64::new(0)),
            rate_bits: Arc::new(AtomicU64::new(1.0_f64.to_bits())),
            stop_tx,
            state_tx,
        }
    }

    /// Subscribe to transmission events.
    pub fn subscribe(&self) -> EventReceiver {
        self.events.subscribe()
    }

    /// Current run state snapshot.
    pub fn status(&self) -> RunStatus {
        RunStatus {
            running: self.running.load(Ordering::SeqCst),
            emitted: self.emitted.load(Ordering::SeqCst),
            rate_hz: self.rate_hz(),
        }
    }

    /// Whether a run is in progress.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// The configured emission rate.
    pub fn rate_hz(&self) -> f64 {
        f64::from_bits(self.rate_bits.load(Ordering::SeqCst))
    }

    /// Change the emission rate. Takes effect on the worker's next
    /// scheduled wait, never retroactively. Valid while Running or Idle.
    pub fn set_rate(&self, rate_hz: f64) -> Result<(), EngineError> {
        if !rate_hz.is_finite() || rate_hz <= 0.0 {
            return Err(EngineError::InvalidRate(rate_hz));
        }
        self.rate_bits.store(rate_hz.to_bits(), Ordering::SeqCst);
        Ok(())
    }

    /// Start a run. Rejected while one is already in progress.
    pub fn start(&self, plan: RunPlan) -> Result<(), EngineError> {
        self.running
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .map_err(|_| EngineError::AlreadyRunning)?;

        self.emitted.store(0, Ordering::SeqCst);
        self.stop_tx.send_replace(false);
        self.state_tx.send_replace(EngineState::Running);

        let (source, limits, sink) = plan.into_source();
        let worker = Worker {
            source,
            limits,
            sink,
            events: self.events.sender(),
            running: self.running.clone(),
            emitted: self.emitted.clone(),
            rate_bits: self.rate_bits.clone(),
            stop_rx: self.stop_tx.subscribe(),
            state_tx: self.state_tx.clone(),
        };

        self.events.sender().started(self.rate_hz());
        info!(rate_hz = self.rate_hz(), "Transmission started");
        tokio::spawn(worker.run());
        Ok(())
    }

    /// Request cancellation. Idempotent; a no-op while Idle. The worker
    /// observes the signal at the top of its next iteration, at latest
    /// after the current inter-tick delay elapses.
    pub fn stop(&self) {
        if self.running.load(Ordering::SeqCst) {
            self.stop_tx.send_replace(true);
        }
    }

    /// Wait for the engine to reach Idle. Returns immediately when no run
    /// is in progress.
    ///
    /// The running flag is the truth; the state channel only wakes
    /// waiters, so a stale notification from a prior run cannot end the
    /// wait early.
    pub async fn wait_until_idle(&self) {
        let mut state_rx = self.state_tx.subscribe();
        while self.running.load(Ordering::SeqCst) {
            if state_rx.changed().await.is_err() {
                return;
            }
        }
    }
}

impl Default for Transmitter {
    fn default() -> Self {
        Self::new()
    }
}

/// State moved into the spawned loop at `start()`.
struct Worker {
    source: BoxedSource,
    limits: StopLimits,
    sink: Option<FileSink>,
    events: EventSender,
    running: Arc<AtomicBool>,
    emitted: Arc<AtomicU64>,
    rate_bits: Arc<AtomicU64>,
    stop_rx: watch::Receiver<bool>,
    state_tx: watch::Sender<EngineState>,
}

impl Worker {
    async fn run(mut self) {
        let started = Instant::now();

        let reason = loop {
            if *self.stop_rx.borrow() {
                break StopReason::Manual;
            }

            match self.source.next() {
                Ok(text) => {
                    let seq = self.emitted.fetch_add(1, Ordering::SeqCst) + 1;
                    self.events.sent(SentRecord {
                        seq,
                        timestamp: Utc::now(),
                        text: text.clone(),
                    });

                    if let Some(sink) = &self.sink {
                        match sink.persist(&text) {
                            Ok(path) => debug!(path = %path.display(), "Message persisted"),
                            Err(e) => {
                                warn!("Failed to persist message: {e}");
                                self.events.persist_failed(e.to_string());
                            }
                        }
                    }

                    if let Some(reason) = self.limits.trigger(seq, started.elapsed()) {
                        break reason;
                    }
                }
                Err(e) => {
                    // Skipped tick: not counted, not a stop trigger, and the
                    // inter-tick delay below still applies.
                    warn!("Source read failed: {e}");
                    self.events.source_failed(e.to_string());
                }
            }

            // Rate is re-read before every wait so external changes apply
            // to the next delay.
            let rate_hz = f64::from_bits(self.rate_bits.load(Ordering::SeqCst));
            let delay = Duration::from_secs_f64(1.0 / rate_hz);
            tokio::select! {
                _ = tokio::time::sleep(delay) => {}
                _ = self.stop_rx.changed() => break StopReason::Manual,
            }
        };

        let emitted = self.emitted.load(Ordering::SeqCst);
        info!(?reason, emitted, "Transmission stopped");
        self.events.stopped(reason, emitted);
        // The flag gates `start()` and must be clear before waiters are
        // woken, or a start() racing wait_until_idle() gets rejected.
        self.running.store(false, Ordering::SeqCst);
        self.state_tx.send_replace(EngineState::Idle);
    }
}
