//! The monitoring loop.
//!
//! A [`MonitorSession`] owns one transport for its whole life. Running it
//! walks the state machine:
//!
//! ```text
//! Idle ─► Connecting ─┬─► Active ─► Stopping ─► Idle
//!                     └─► Idle  (open failed)
//! ```
//!
//! While `Active` every iteration does, in order:
//!
//! 1. check the cancellation token and the duration bound;
//! 2. try to read one frame;
//! 3. build, de-duplicate and deliver the card record;
//! 4. sleep for the idle interval (the only suspension point besides the
//!    frame gap), waking early on cancellation.
//!
//! The transport is closed on every path out of `Active`.

use std::fmt;
use std::time::Duration;

use cardwatch_core::{DecodedText, RawFrame, SessionId};
use cardwatch_protocol::CardInfo;
use cardwatch_transport::{Capture, FrameReader, Transport};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, trace, warn};

use crate::config::MonitorConfig;
use crate::error::{MonitorError, Result};
use crate::sink::CardSink;
use crate::state_machine::{MonitorState, StateMachine};

/// Why a session left the `Active` state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum StopReason {
    /// The cancellation token fired.
    Cancelled,

    /// The configured duration elapsed.
    DurationExpired,

    /// The transport failed in a way polling cannot recover from.
    TransportLost { message: String },
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StopReason::Cancelled => write!(f, "cancelled"),
            StopReason::DurationExpired => write!(f, "duration expired"),
            StopReason::TransportLost { message } => write!(f, "transport lost: {}", message),
        }
    }
}

/// Summary returned when a session ends.
#[derive(Debug, Clone, Serialize)]
pub struct MonitorReport {
    pub session_id: SessionId,
    pub port: String,
    pub reason: StopReason,
    pub started_at: DateTime<Utc>,
    pub elapsed: Duration,

    /// Records delivered to the sink.
    pub reads: u64,

    /// Frames dropped as repeats of the previous record.
    pub suppressed: u64,

    /// Captures too short to become frames.
    pub short_captures: u64,

    /// The most recently delivered record.
    pub last_card: Option<CardInfo>,

    /// States visited, in order.
    pub states: Vec<MonitorState>,
}

impl fmt::Display for MonitorReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Session {} on {} stopped: {}", self.session_id, self.port, self.reason)?;
        writeln!(f, "Total reads: {}", self.reads)?;
        if self.suppressed > 0 {
            writeln!(f, "Suppressed repeats: {}", self.suppressed)?;
        }
        write!(f, "Elapsed: {:.1}s", self.elapsed.as_secs_f64())
    }
}

/// One monitoring run over an exclusively owned transport.
///
/// A session is single-shot: [`run`](Self::run) consumes it.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use cardwatch_monitor::{MonitorConfig, MonitorSession, StopReason};
/// use cardwatch_protocol::CardInfo;
/// use cardwatch_transport::MockTransport;
///
/// #[tokio::main(flavor = "current_thread", start_paused = true)]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let (transport, handle) = MockTransport::new();
///     handle.present_card("CAB9EAF2");
///
///     let config = MonitorConfig::default().with_duration(Duration::from_secs(1));
///     let mut decimals = Vec::new();
///     let report = MonitorSession::new(transport, config)
///         .run(&mut |card: &CardInfo| decimals.push(card.decimal.clone()))
///         .await?;
///
///     assert_eq!(report.reason, StopReason::DurationExpired);
///     assert_eq!(decimals, vec!["3401181938".to_string()]);
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct MonitorSession<T: Transport> {
    id: SessionId,
    config: MonitorConfig,
    transport: T,
    reader: FrameReader,
    machine: StateMachine,
    cancel: CancellationToken,
    reads: u64,
    suppressed: u64,
    short_captures: u64,
    last_text: Option<DecodedText>,
    last_card: Option<CardInfo>,
}

impl<T: Transport> MonitorSession<T> {
    pub fn new(transport: T, config: MonitorConfig) -> Self {
        Self {
            id: SessionId::new(),
            reader: config.frame_reader(),
            config,
            transport,
            machine: StateMachine::new(),
            cancel: CancellationToken::new(),
            reads: 0,
            suppressed: 0,
            short_captures: 0,
            last_text: None,
            last_card: None,
        }
    }

    /// Stop this session when `token` is cancelled.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// Token that stops this session when cancelled.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn state(&self) -> MonitorState {
        *self.machine.current_state()
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    /// Open the transport, poll until stopped, then close it.
    ///
    /// # Errors
    ///
    /// - `MonitorError::Config` if the configuration is invalid; nothing is
    ///   opened.
    /// - `MonitorError::Connect` if the transport cannot be opened; the
    ///   session returns to `Idle` without retrying.
    ///
    /// Read failures during polling are not errors: they are logged, or end
    /// the session with [`StopReason::TransportLost`].
    pub async fn run<S: CardSink>(mut self, sink: &mut S) -> Result<MonitorReport> {
        self.config.validate()?;

        self.machine.transition_to(MonitorState::Connecting)?;
        info!(session = %self.id, port = self.transport.name(), "Connecting");

        if let Err(e) = self.transport.open().await {
            error!(session = %self.id, port = self.transport.name(), error = %e, "Failed to open transport");
            self.machine.transition_to(MonitorState::Idle)?;
            return Err(MonitorError::Connect(e));
        }

        self.machine.transition_to(MonitorState::Active)?;
        let started_at = Utc::now();
        let started = Instant::now();
        info!(
            session = %self.id,
            port = self.transport.name(),
            dedup = ?self.config.dedup,
            duration_secs = ?self.config.duration_secs,
            "Monitoring started"
        );

        let reason = self.poll(sink, started).await;

        let stopping = self.machine.transition_to(MonitorState::Stopping);
        if let Err(e) = self.transport.close().await {
            warn!(session = %self.id, port = self.transport.name(), error = %e, "Failed to close transport");
        }
        stopping?;
        self.machine.transition_to(MonitorState::Idle)?;

        info!(
            session = %self.id,
            port = self.transport.name(),
            reason = %reason,
            reads = self.reads,
            "Monitoring stopped"
        );

        Ok(MonitorReport {
            session_id: self.id,
            port: self.transport.name().to_string(),
            reason,
            started_at,
            elapsed: started.elapsed(),
            reads: self.reads,
            suppressed: self.suppressed,
            short_captures: self.short_captures,
            last_card: self.last_card,
            states: self.machine.path(),
        })
    }

    async fn poll<S: CardSink>(&mut self, sink: &mut S, started: Instant) -> StopReason {
        let duration = self.config.duration();
        let idle = self.config.idle_interval();

        loop {
            if self.cancel.is_cancelled() {
                return StopReason::Cancelled;
            }
            if duration.is_some_and(|limit| started.elapsed() >= limit) {
                return StopReason::DurationExpired;
            }

            match self.reader.read_capture(&mut self.transport).await {
                Ok(Capture::Frame(frame)) => self.deliver(frame, sink),
                Ok(Capture::Short { .. }) => self.short_captures += 1,
                Ok(Capture::Idle) => {}
                Err(e) if e.is_fatal() => {
                    error!(session = %self.id, port = self.transport.name(), error = %e, "Transport lost");
                    return StopReason::TransportLost {
                        message: e.to_string(),
                    };
                }
                Err(e) if e.is_transient() => {
                    trace!(session = %self.id, error = %e, "Transport not ready");
                }
                Err(e) => {
                    warn!(session = %self.id, port = self.transport.name(), error = %e, "Read failed");
                }
            }

            tokio::select! {
                _ = self.cancel.cancelled() => return StopReason::Cancelled,
                _ = tokio::time::sleep(idle) => {}
            }
        }
    }

    fn deliver<S: CardSink>(&mut self, frame: RawFrame, sink: &mut S) {
        if self.config.dedup.is_enabled() {
            let text = frame.decode();
            if self.last_text.as_ref() == Some(&text) {
                self.suppressed += 1;
                debug!(session = %self.id, text = %text, "Suppressing repeated card");
                return;
            }
        }

        self.reads += 1;
        let card = CardInfo::builder(frame).sequence(self.reads).build();
        info!(
            session = %self.id,
            sequence = card.sequence,
            variant = %card.variant,
            text = %card.text,
            decimal = %card.decimal,
            "Card read"
        );

        sink.deliver(&card);
        self.last_text = Some(card.text.clone());
        self.last_card = Some(card);
    }
}
