//! Mock transport for testing and development.
//!
//! Simulates a card reader without hardware; bytes are fed in
//! programmatically through a handle.

pub mod scripted;

pub use scripted::{MockTransport, MockTransportHandle};
