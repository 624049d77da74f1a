//! Frame reassembly from a polled transport.
//!
//! Readers deliver one card presentation as a short burst that may arrive
//! split over several reads. The [`FrameReader`] drains whatever is
//! pending, waits a short gap, and keeps going while more bytes show up:
//!
//! ```text
//! pending? ──0──► Idle
//!    │
//!    ▼
//! read_available ─► accumulate ─► sleep(gap) ─► pending? ──>0──┐
//!    ▲                                            │            │
//!    └────────────────────────────────────────────┼────────────┘
//!                                                 0
//!                                                 ▼
//!                               len < 8 ? Short : Frame(RawFrame)
//! ```
//!
//! Every call starts from an empty accumulator; nothing carries over
//! between calls.

use std::time::Duration;

use bytes::BytesMut;
use cardwatch_core::RawFrame;
use cardwatch_core::constants::{DEFAULT_FRAME_GAP_MS, DEFAULT_MAX_FRAME_BYTES, MIN_FRAME_LENGTH};
use tracing::{debug, warn};

use crate::error::Result;
use crate::traits::Transport;

/// Outcome of one reassembly attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Capture {
    /// Nothing was pending.
    Idle,

    /// Bytes arrived but too few to be a frame; they were discarded.
    Short { length: usize },

    /// A complete frame.
    Frame(RawFrame),
}

impl Capture {
    pub fn into_frame(self) -> Option<RawFrame> {
        match self {
            Capture::Frame(frame) => Some(frame),
            Capture::Idle | Capture::Short { .. } => None,
        }
    }
}

/// Coalesces pending transport bytes into frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameReader {
    gap: Duration,
    max_frame_bytes: usize,
}

impl FrameReader {
    /// Create a reader that waits `gap` between drains and stops
    /// coalescing at `max_frame_bytes`.
    ///
    /// The cap is raised to [`MIN_FRAME_LENGTH`] if set lower, so a full
    /// frame always fits.
    pub fn new(gap: Duration, max_frame_bytes: usize) -> Self {
        Self {
            gap,
            max_frame_bytes: max_frame_bytes.max(MIN_FRAME_LENGTH),
        }
    }

    pub fn gap(&self) -> Duration {
        self.gap
    }

    pub fn max_frame_bytes(&self) -> usize {
        self.max_frame_bytes
    }

    /// Try to read one frame.
    ///
    /// Returns `Ok(None)` when nothing was pending or the capture was
    /// shorter than [`MIN_FRAME_LENGTH`].
    ///
    /// # Errors
    ///
    /// Propagates the transport error of any failed poll or read; the
    /// partial accumulator is dropped.
    pub async fn try_read_frame<T: Transport>(&self, transport: &mut T) -> Result<Option<RawFrame>> {
        Ok(self.read_capture(transport).await?.into_frame())
    }

    /// Like [`try_read_frame`](Self::try_read_frame), but tells an idle
    /// transport apart from a discarded short capture.
    pub async fn read_capture<T: Transport>(&self, transport: &mut T) -> Result<Capture> {
        let mut pending = transport.pending_count().await?;
        if pending == 0 {
            return Ok(Capture::Idle);
        }

        let mut buffer = BytesMut::with_capacity(pending.min(self.max_frame_bytes));
        while pending > 0 {
            let room = self.max_frame_bytes - buffer.len();
            let chunk = transport.read_available(room).await?;
            buffer.extend_from_slice(&chunk);

            // Anything past the cap is left on the transport for the next capture.
            if buffer.len() >= self.max_frame_bytes {
                warn!(
                    port = transport.name(),
                    limit = self.max_frame_bytes,
                    "Frame reached size limit, cutting it short"
                );
                break;
            }

            tokio::time::sleep(self.gap).await;
            pending = transport.pending_count().await?;
        }

        let length = buffer.len();
        match RawFrame::new(buffer.freeze()) {
            Ok(frame) => Ok(Capture::Frame(frame)),
            Err(_) => {
                debug!(port = transport.name(), length, "Discarding short capture");
                Ok(Capture::Short { length })
            }
        }
    }
}

impl Default for FrameReader {
    fn default() -> Self {
        Self::new(
            Duration::from_millis(DEFAULT_FRAME_GAP_MS),
            DEFAULT_MAX_FRAME_BYTES,
        )
    }
}
