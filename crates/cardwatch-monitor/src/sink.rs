//! Result sinks.
//!
//! A sink receives every delivered [`CardInfo`] in arrival order. Delivery
//! is synchronous and must not block: a sink that forwards elsewhere should
//! hand the record off and return.

use cardwatch_protocol::CardInfo;
use tokio::sync::mpsc;
use tracing::warn;

/// Receiver of delivered card records.
///
/// Any `FnMut(&CardInfo)` closure is a sink:
///
/// ```
/// use cardwatch_monitor::CardSink;
/// use cardwatch_protocol::CardInfo;
///
/// let mut seen = Vec::new();
/// let mut sink = |card: &CardInfo| seen.push(card.decimal.clone());
/// # fn takes_sink(_: &mut impl CardSink) {}
/// # takes_sink(&mut sink);
/// ```
pub trait CardSink {
    fn deliver(&mut self, card: &CardInfo);
}

impl<F> CardSink for F
where
    F: FnMut(&CardInfo),
{
    fn deliver(&mut self, card: &CardInfo) {
        self(card)
    }
}

/// Forwards records into a tokio channel.
///
/// Uses `try_send`, so a full or closed channel drops the record instead
/// of stalling the monitor. Dropped records are counted and logged.
#[derive(Debug)]
pub struct ChannelSink {
    tx: mpsc::Sender<CardInfo>,
    dropped: u64,
}

impl ChannelSink {
    pub fn new(tx: mpsc::Sender<CardInfo>) -> Self {
        Self { tx, dropped: 0 }
    }

    /// Create a sink and the receiver it feeds.
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<CardInfo>) {
        let (tx, rx) = mpsc::channel(capacity);
        (Self::new(tx), rx)
    }

    /// Number of records that could not be forwarded.
    pub fn dropped(&self) -> u64 {
        self.dropped
    }
}

impl CardSink for ChannelSink {
    fn deliver(&mut self, card: &CardInfo) {
        match self.tx.try_send(card.clone()) {
            Ok(()) => {}
            Err(mpsc::error::TrySendError::Full(card)) => {
                self.dropped += 1;
                warn!(sequence = card.sequence, "Card channel full, dropping record");
            }
            Err(mpsc::error::TrySendError::Closed(card)) => {
                self.dropped += 1;
                warn!(sequence = card.sequence, "Card channel closed, dropping record");
            }
        }
    }
}
