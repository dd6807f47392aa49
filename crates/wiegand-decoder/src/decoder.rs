//! Wiegand decoder task.
//!
//! [`WiegandDecoder::spawn`] attaches to an edge source, then runs a single
//! task that owns the [`FrameAccumulator`], both line watchdogs and the
//! sink. Pin events, watchdog expiries and cancellation all go through one
//! `select!` loop, so the accumulator sees exactly one event at a time no
//! matter how the two lines' notifications race.
//!
//! # Architecture
//!
//! ```text
//! ┌───────────┐ PinEvent ┌────────────────────────────┐ Codeword ┌──────┐
//! │ EdgeSource│─────────►│ decoder task               │─────────►│ Sink │
//! └───────────┘          │  FrameAccumulator          │          └──────┘
//!                        │  WatchdogPair (deadlines)  │
//! ┌───────────┐ cancel   │                            │
//! │ Handle    │─────────►│                            │
//! └───────────┘          └────────────────────────────┘
//! ```
//!
//! # Examples
//!
//! ```no_run
//! use wiegand_decoder::{ChannelSink, DecoderConfig, WiegandDecoder};
//! use wiegand_hardware::mock::MockGpio;
//!
//! #[tokio::main]
//! async fn main() -> wiegand_decoder::Result<()> {
//!     let (gpio, _reader) = MockGpio::new();
//!     let (sink, mut codewords) = ChannelSink::new();
//!
//!     let mut decoder = WiegandDecoder::spawn(gpio, DecoderConfig::default(), sink).await?;
//!
//!     if let Some(codeword) = codewords.recv().await {
//!         println!("bits={} code={}", codeword.bit_count(), codeword.bit_string());
//!     }
//!
//!     decoder.cancel().await;
//!     Ok(())
//! }
//! ```

use crate::accumulator::{FrameAccumulator, Transition};
use crate::config::DecoderConfig;
use crate::error::Result;
use crate::sink::CodewordSink;
use crate::watchdog::{WatchdogPair, expiry};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info, trace, warn};
use wiegand_core::{EventKind, Line, LineEvent};
use wiegand_hardware::{AnyEdgeSource, EdgeSource, PinEvent};

/// Counters reported when a decoder stops.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecoderStats {
    /// Completed frames handed to the sink.
    pub frames_emitted: u64,

    /// Edges seen on either line.
    pub edges_seen: u64,

    /// Timeouts that arrived with no frame open.
    pub stale_timeouts: u64,

    /// Bits of incomplete frames dropped at shutdown.
    pub discarded_bits: u64,

    /// Watchdog expiries replayed from event timestamps because the task
    /// fell behind the source.
    pub late_timeouts: u64,
}

/// Entry point for running a decoder.
pub struct WiegandDecoder;

impl WiegandDecoder {
    /// Attach to `source` and start decoding.
    ///
    /// Both pins are watched for falling edges before the task starts. Each
    /// completed frame is passed to `sink` from inside the decoder task.
    /// Must be called from within a Tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the source
    /// refuses either pin. No task is spawned in that case.
    pub async fn spawn<S, K>(source: S, config: DecoderConfig, sink: K) -> Result<DecoderHandle>
    where
        S: Into<AnyEdgeSource>,
        K: CodewordSink + 'static,
    {
        config.validate()?;

        let mut source = source.into();
        source.watch_falling_edges(config.zero_pin).await?;
        if let Err(e) = source.watch_falling_edges(config.one_pin).await {
            let _ = source.unwatch(config.zero_pin).await;
            return Err(e.into());
        }

        let (cancel_tx, cancel_rx) = oneshot::channel();
        let task = DecoderTask {
            config,
            accumulator: FrameAccumulator::new(),
            watchdogs: WatchdogPair::new(config.bit_timeout),
            sink: Box::new(sink),
            stats: DecoderStats::default(),
        };

        info!(
            zero_pin = config.zero_pin,
            one_pin = config.one_pin,
            bit_timeout_ms = config.bit_timeout.as_millis() as u64,
            "Wiegand decoder attached"
        );

        Ok(DecoderHandle {
            config,
            cancel_tx: Some(cancel_tx),
            task: Some(tokio::spawn(task.run(source, cancel_rx))),
        })
    }
}

/// Handle to a running decoder.
///
/// Dropping the handle also stops the decoder; [`cancel`](Self::cancel)
/// additionally waits for teardown and returns the final counters.
#[derive(Debug)]
pub struct DecoderHandle {
    config: DecoderConfig,
    cancel_tx: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<DecoderStats>>,
}

impl DecoderHandle {
    /// Configuration the decoder was started with.
    pub fn config(&self) -> &DecoderConfig {
        &self.config
    }

    /// Whether the decoder task is still running.
    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Stop decoding, disarm both watchdogs and detach from the source.
    ///
    /// An incomplete frame is discarded, never emitted. Returns the final
    /// counters on the first call and `None` on every later call.
    pub async fn cancel(&mut self) -> Option<DecoderStats> {
        let task = self.task.take()?;
        if let Some(cancel_tx) = self.cancel_tx.take() {
            // Err means the task already stopped on its own.
            let _ = cancel_tx.send(());
        }

        match task.await {
            Ok(stats) => Some(stats),
            Err(e) => {
                warn!(error = %e, "decoder task did not shut down cleanly");
                None
            }
        }
    }
}

struct DecoderTask {
    config: DecoderConfig,
    accumulator: FrameAccumulator,
    watchdogs: WatchdogPair,
    sink: Box<dyn CodewordSink>,
    stats: DecoderStats,
}

impl DecoderTask {
    async fn run(
        mut self,
        mut source: AnyEdgeSource,
        mut cancel_rx: oneshot::Receiver<()>,
    ) -> DecoderStats {
        loop {
            let zero_deadline = self.watchdogs.line(Line::Zero).deadline();
            let one_deadline = self.watchdogs.line(Line::One).deadline();

            tokio::select! {
                biased;

                _ = &mut cancel_rx => {
                    debug!("decoder cancelled");
                    break;
                }
                event = source.next_event() => match event {
                    Ok(event) => self.on_pin_event(event),
                    Err(e) => {
                        warn!(error = %e, "edge source closed, stopping decoder");
                        break;
                    }
                },
                at = expiry(zero_deadline) => self.on_watchdog(Line::Zero, at),
                at = expiry(one_deadline) => self.on_watchdog(Line::One, at),
            }
        }

        self.teardown(&mut source).await;
        self.stats
    }

    fn on_pin_event(&mut self, event: PinEvent) {
        let Some(line) = self.config.line_for_pin(event.pin) else {
            trace!(pin = event.pin, "event on unmapped pin");
            return;
        };

        // Deadlines that passed before this event happened fire first, even
        // if the task is only now draining a backlog.
        self.expire_before(event.timestamp);
        self.on_line_event(
            LineEvent {
                line,
                kind: event.kind,
            },
            event.timestamp,
        );
    }

    fn expire_before(&mut self, instant: Instant) {
        while let Some((line, deadline)) = self.watchdogs.earliest_before(instant) {
            self.stats.late_timeouts += 1;
            self.on_watchdog(line, deadline);
        }
    }

    fn on_watchdog(&mut self, line: Line, at: Instant) {
        self.watchdogs.line_mut(line).fired(at);
        self.on_line_event(LineEvent::timeout(line), at);
    }

    fn on_line_event(&mut self, event: LineEvent, at: Instant) {
        if event.kind == EventKind::Edge {
            self.stats.edges_seen += 1;
        }

        match self.accumulator.handle(event) {
            Transition::FrameStarted => {
                self.watchdogs.arm_both(at);
                debug!(line = %event.line, "frame started");
            }
            Transition::BitAppended => self.watchdogs.line_mut(event.line).feed(at),
            Transition::TimeoutNoted => {}
            Transition::Ignored => {
                self.stats.stale_timeouts += 1;
                trace!(line = %event.line, "stale timeout ignored");
            }
            Transition::FrameCompleted(codeword) => {
                self.watchdogs.disarm_both();
                self.stats.frames_emitted += 1;
                info!(
                    bits = codeword.bit_count(),
                    code = %codeword.bit_string(),
                    "frame completed"
                );
                self.sink.on_codeword(codeword);
            }
        }
    }

    async fn teardown(&mut self, source: &mut AnyEdgeSource) {
        let discarded = self.accumulator.reset();
        if discarded > 0 {
            debug!(bits = discarded, "discarding incomplete frame");
            self.stats.discarded_bits += discarded as u64;
        }
        self.watchdogs.disarm_both();

        for pin in [self.config.zero_pin, self.config.one_pin] {
            if let Err(e) = source.unwatch(pin).await {
                debug!(pin, error = %e, "unwatch failed during teardown");
            }
        }
    }
}
