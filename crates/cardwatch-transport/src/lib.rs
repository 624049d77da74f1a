//! Transport layer for contactless card readers.
//!
//! This crate owns everything between the device and a complete frame:
//!
//! - the [`Transport`] trait, a minimal open / poll / read / close surface;
//! - the [`FrameReader`], which coalesces bursts of pending bytes into
//!   [`RawFrame`](cardwatch_core::RawFrame)s and drops short captures;
//! - backends: [`MockTransport`] for tests and demos, and
//!   `SerialTransport` (feature `serial`, on by default);
//! - [`AnyTransport`] for enum dispatch, and [`probe`] for a quick
//!   open/close connection test.
//!
//! # Reading frames
//!
//! ```
//! use cardwatch_transport::{FrameReader, MockTransport, Transport};
//!
//! #[tokio::main]
//! async fn main() -> cardwatch_transport::Result<()> {
//!     let (mut transport, handle) = MockTransport::new();
//!     transport.open().await?;
//!
//!     handle.present_card("10000000146");
//!     let frame = FrameReader::default().try_read_frame(&mut transport).await?;
//!     assert_eq!(frame.map(|f| f.len()), Some(13));
//!
//!     transport.close().await
//! }
//! ```
//!
//! # Error Handling
//!
//! All operations return [`Result<T>`] with a [`TransportError`]. Use
//! [`TransportError::is_transient`] and [`TransportError::is_fatal`] to
//! decide whether a failed poll should be ignored, logged, or end the
//! session.

pub mod devices;
pub mod error;
pub mod frame_reader;
pub mod mock;
#[cfg(feature = "serial")]
pub mod serial;
pub mod traits;
pub mod types;

pub use devices::{AnyTransport, probe};
pub use error::{Result, TransportError};
pub use frame_reader::{Capture, FrameReader};
pub use mock::{MockTransport, MockTransportHandle};
#[cfg(feature = "serial")]
pub use serial::SerialTransport;
pub use traits::Transport;
pub use types::{DEFAULT_PORT, PortSettings};
