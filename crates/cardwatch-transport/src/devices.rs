//! Enum wrapper for transport dispatch.
//!
//! Native `async fn` in traits is not object-safe, so `Box<dyn Transport>`
//! is not available. [`AnyTransport`] gives the binary one concrete type
//! to hand to a monitoring session whichever backend was selected.
//!
//! # Examples
//!
//! ```
//! use cardwatch_transport::{AnyTransport, MockTransport, Transport};
//!
//! let (mock, _handle) = MockTransport::new();
//! let transport = AnyTransport::Mock(mock);
//! assert_eq!(transport.name(), "mock");
//! ```

use bytes::Bytes;
use tracing::{error, info, warn};

use crate::error::Result;
use crate::mock::MockTransport;
#[cfg(feature = "serial")]
use crate::serial::SerialTransport;
use crate::traits::Transport;

/// Any supported transport backend.
#[derive(Debug)]
#[non_exhaustive]
pub enum AnyTransport {
    /// In-memory transport for development and testing.
    Mock(MockTransport),

    /// Local serial port.
    #[cfg(feature = "serial")]
    Serial(SerialTransport),
}

impl Transport for AnyTransport {
    fn name(&self) -> &str {
        match self {
            Self::Mock(transport) => transport.name(),
            #[cfg(feature = "serial")]
            Self::Serial(transport) => transport.name(),
        }
    }

    fn is_open(&self) -> bool {
        match self {
            Self::Mock(transport) => transport.is_open(),
            #[cfg(feature = "serial")]
            Self::Serial(transport) => transport.is_open(),
        }
    }

    async fn open(&mut self) -> Result<()> {
        match self {
            Self::Mock(transport) => transport.open().await,
            #[cfg(feature = "serial")]
            Self::Serial(transport) => transport.open().await,
        }
    }

    async fn pending_count(&mut self) -> Result<usize> {
        match self {
            Self::Mock(transport) => transport.pending_count().await,
            #[cfg(feature = "serial")]
            Self::Serial(transport) => transport.pending_count().await,
        }
    }

    async fn read_available(&mut self, limit: usize) -> Result<Bytes> {
        match self {
            Self::Mock(transport) => transport.read_available(limit).await,
            #[cfg(feature = "serial")]
            Self::Serial(transport) => transport.read_available(limit).await,
        }
    }

    async fn close(&mut self) -> Result<()> {
        match self {
            Self::Mock(transport) => transport.close().await,
            #[cfg(feature = "serial")]
            Self::Serial(transport) => transport.close().await,
        }
    }
}

impl From<MockTransport> for AnyTransport {
    fn from(transport: MockTransport) -> Self {
        Self::Mock(transport)
    }
}

#[cfg(feature = "serial")]
impl From<SerialTransport> for AnyTransport {
    fn from(transport: SerialTransport) -> Self {
        Self::Serial(transport)
    }
}

/// Check that a transport can be opened, then close it again.
///
/// Leaves the transport closed whatever the outcome.
///
/// # Errors
///
/// Returns the open error if the transport cannot be opened.
pub async fn probe<T: Transport>(transport: &mut T) -> Result<()> {
    match transport.open().await {
        Ok(()) => {
            info!(port = transport.name(), "Connection test passed");
            if let Err(e) = transport.close().await {
                warn!(port = transport.name(), error = %e, "Failed to close after connection test");
            }
            Ok(())
        }
        Err(e) => {
            error!(port = transport.name(), error = %e, "Connection test failed");
            Err(e)
        }
    }
}
