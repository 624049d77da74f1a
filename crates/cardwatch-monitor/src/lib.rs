//! Card monitoring sessions.
//!
//! This crate runs the monitor loop: it owns a transport, pulls frames
//! through the [`FrameReader`](cardwatch_transport::FrameReader), turns
//! them into [`CardInfo`](cardwatch_protocol::CardInfo) records and hands
//! them to a [`CardSink`], until cancelled, out of time, or the device is
//! lost.
//!
//! - [`MonitorSession`]: the loop itself, returning a [`MonitorReport`].
//! - [`StateMachine`]: guards the Idle → Connecting → Active → Stopping
//!   lifecycle.
//! - [`MonitorConfig`]: session settings, loadable from TOML.
//! - [`CardSink`] and [`ChannelSink`]: result delivery.

pub mod config;
pub mod error;
pub mod session;
pub mod sink;
pub mod state_machine;

pub use config::{DedupPolicy, MonitorConfig};
pub use error::{MonitorError, Result};
pub use session::{MonitorReport, MonitorSession, StopReason};
pub use sink::{CardSink, ChannelSink};
pub use state_machine::{MonitorState, StateMachine, StateTransition};

pub use tokio_util::sync::CancellationToken;
