//! Error types for transport operations.
//!
//! Read errors fall into three groups that the monitor treats differently:
//!
//! - **transient** ([`TransportError::is_transient`]): the device simply had
//!   nothing ready. Expected during idle polling and never reported above
//!   `trace`.
//! - **fatal** ([`TransportError::is_fatal`]): the device is gone. The
//!   monitor stops.
//! - everything else: logged and ignored, polling continues.

use std::io;

/// Result type alias for transport operations.
pub type Result<T> = std::result::Result<T, TransportError>;

/// Driver messages that only mean "not ready yet" on some platforms.
const NOT_READY_MARKERS: [&str; 2] = ["ClearCommError", "PermissionError"];

/// Errors that can occur while talking to a card reader.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The transport could not be opened (device busy, absent, no access).
    #[error("Failed to open {port}: {message}")]
    OpenFailed { port: String, message: String },

    /// An operation needing an open transport was called on a closed one.
    #[error("Transport is not open")]
    NotConnected,

    /// The device went away while open.
    #[error("Device disconnected: {port}")]
    Disconnected { port: String },

    /// The device had nothing ready; retry on the next poll.
    #[error("Device not ready: {message}")]
    NotReady { message: String },

    /// A read failed for any other reason.
    #[error("Read failed: {message}")]
    ReadFailed { message: String },

    /// Invalid transport settings.
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl TransportError {
    pub fn open_failed(port: impl Into<String>, message: impl Into<String>) -> Self {
        Self::OpenFailed {
            port: port.into(),
            message: message.into(),
        }
    }

    pub fn disconnected(port: impl Into<String>) -> Self {
        Self::Disconnected { port: port.into() }
    }

    pub fn not_ready(message: impl Into<String>) -> Self {
        Self::NotReady {
            message: message.into(),
        }
    }

    pub fn read_failed(message: impl Into<String>) -> Self {
        Self::ReadFailed {
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Classify an I/O error raised while reading from `port`.
    pub fn from_read(port: &str, error: io::Error) -> Self {
        match error.kind() {
            io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock | io::ErrorKind::Interrupted => {
                Self::not_ready(error.to_string())
            }
            io::ErrorKind::BrokenPipe
            | io::ErrorKind::NotConnected
            | io::ErrorKind::NotFound
            | io::ErrorKind::UnexpectedEof => Self::disconnected(port),
            _ => {
                let message = error.to_string();
                if NOT_READY_MARKERS.iter().any(|m| message.contains(m)) {
                    Self::not_ready(message)
                } else {
                    Self::read_failed(message)
                }
            }
        }
    }

    /// Nothing was ready; the next poll may succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::NotReady { .. } => true,
            Self::Io(error) => matches!(
                error.kind(),
                io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock | io::ErrorKind::Interrupted
            ),
            _ => false,
        }
    }

    /// The transport cannot deliver any more data.
    pub fn is_fatal(&self) -> bool {
        match self {
            Self::Disconnected { .. } | Self::NotConnected => true,
            Self::Io(error) => matches!(
                error.kind(),
                io::ErrorKind::BrokenPipe | io::ErrorKind::NotConnected
            ),
            _ => false,
        }
    }
}
