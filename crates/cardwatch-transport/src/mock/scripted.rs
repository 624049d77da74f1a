//! Scripted in-memory transport.
//!
//! The transport and its handle share one buffer. Tests (and the demo
//! mode of the binary) push bytes through the handle; the transport hands
//! them out through the normal [`Transport`] surface.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use bytes::{Bytes, BytesMut};
use tracing::debug;

use crate::error::{Result, TransportError};
use crate::traits::Transport;

const DEFAULT_NAME: &str = "mock";

#[derive(Debug, Default)]
struct State {
    open: bool,
    unplugged: bool,
    buffer: BytesMut,
    read_errors: VecDeque<TransportError>,
    open_error: Option<TransportError>,
    open_count: usize,
    close_count: usize,
    read_calls: usize,
}

fn lock(state: &Mutex<State>) -> MutexGuard<'_, State> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// In-memory transport driven by a [`MockTransportHandle`].
///
/// # Examples
///
/// ```
/// use cardwatch_transport::{FrameReader, MockTransport, Transport};
///
/// #[tokio::main]
/// async fn main() -> cardwatch_transport::Result<()> {
///     let (mut transport, handle) = MockTransport::new();
///     transport.open().await?;
///
///     handle.present_card("CAB9EAF2");
///
///     let frame = FrameReader::default().try_read_frame(&mut transport).await?;
///     assert_eq!(frame.unwrap().as_bytes(), b"CAB9EAF2\r\n");
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct MockTransport {
    name: String,
    chunk_size: Option<usize>,
    state: Arc<Mutex<State>>,
}

impl MockTransport {
    pub fn new() -> (Self, MockTransportHandle) {
        Self::with_name(DEFAULT_NAME)
    }

    pub fn with_name(name: impl Into<String>) -> (Self, MockTransportHandle) {
        let state = Arc::new(Mutex::new(State::default()));
        let transport = Self {
            name: name.into(),
            chunk_size: None,
            state: Arc::clone(&state),
        };
        (transport, MockTransportHandle { state })
    }

    /// Hand out at most `chunk_size` bytes per read, like a slow link.
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = Some(chunk_size.max(1));
        self
    }

    fn check_readable(&self, state: &mut State) -> Result<()> {
        if !state.open {
            return Err(TransportError::NotConnected);
        }
        if state.unplugged {
            return Err(TransportError::disconnected(&self.name));
        }
        match state.read_errors.pop_front() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

impl Transport for MockTransport {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_open(&self) -> bool {
        lock(&self.state).open
    }

    async fn open(&mut self) -> Result<()> {
        let mut state = lock(&self.state);
        if let Some(error) = state.open_error.take() {
            return Err(error);
        }
        state.open = true;
        state.open_count += 1;
        debug!(port = %self.name, "Mock transport opened");
        Ok(())
    }

    async fn pending_count(&mut self) -> Result<usize> {
        let mut state = lock(&self.state);
        self.check_readable(&mut state)?;
        Ok(state.buffer.len())
    }

    async fn read_available(&mut self, limit: usize) -> Result<Bytes> {
        let mut state = lock(&self.state);
        self.check_readable(&mut state)?;
        state.read_calls += 1;

        let available = state.buffer.len().min(limit);
        let take = match self.chunk_size {
            Some(size) => size.min(available),
            None => available,
        };
        Ok(state.buffer.split_to(take).freeze())
    }

    async fn close(&mut self) -> Result<()> {
        let mut state = lock(&self.state);
        if state.open {
            state.open = false;
            state.close_count += 1;
            debug!(port = %self.name, "Mock transport closed");
        }
        Ok(())
    }
}

/// Control side of a [`MockTransport`].
#[derive(Debug, Clone)]
pub struct MockTransportHandle {
    state: Arc<Mutex<State>>,
}

impl MockTransportHandle {
    /// Queue raw bytes as if the device had sent them.
    pub fn push_bytes(&self, bytes: &[u8]) {
        lock(&self.state).buffer.extend_from_slice(bytes);
    }

    /// Queue a card presentation: the text followed by CR LF.
    pub fn present_card(&self, text: &str) {
        let mut state = lock(&self.state);
        state.buffer.extend_from_slice(text.as_bytes());
        state.buffer.extend_from_slice(b"\r\n");
    }

    /// Fail the next poll or read with `error`.
    pub fn inject_read_error(&self, error: TransportError) {
        lock(&self.state).read_errors.push_back(error);
    }

    /// Fail the next `open` with `error`.
    pub fn fail_next_open(&self, error: TransportError) {
        lock(&self.state).open_error = Some(error);
    }

    /// Simulate the device being pulled: every later read is fatal.
    pub fn unplug(&self) {
        lock(&self.state).unplugged = true;
    }

    /// Drop any bytes not yet read.
    pub fn clear(&self) {
        lock(&self.state).buffer.clear();
    }

    pub fn pending(&self) -> usize {
        lock(&self.state).buffer.len()
    }

    pub fn is_open(&self) -> bool {
        lock(&self.state).open
    }

    pub fn open_count(&self) -> usize {
        lock(&self.state).open_count
    }

    pub fn close_count(&self) -> usize {
        lock(&self.state).close_count
    }

    pub fn read_calls(&self) -> usize {
        lock(&self.state).read_calls
    }
}
