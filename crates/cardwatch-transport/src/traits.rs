//! Transport trait definition.
//!
//! A transport is the poll/read/close surface of a card reader. The core
//! never assumes a concrete link (serial, USB HID, socket); it only asks
//! how many bytes are waiting and takes them.
//!
//! Methods use native `async fn` (Edition 2024 RPITIT). The trait is
//! therefore not object-safe; use generics or the
//! [`AnyTransport`](crate::devices::AnyTransport) enum for dispatch.

#![allow(async_fn_in_trait)]

use bytes::Bytes;

use crate::error::Result;

/// Byte source owned by exactly one monitoring session.
///
/// Implementations only need `Send`: a session moves its transport into
/// whatever task runs it but never shares it.
///
/// # Examples
///
/// ```
/// use cardwatch_transport::{Transport, Result};
///
/// async fn drain<T: Transport>(transport: &mut T) -> Result<Vec<u8>> {
///     let mut out = Vec::new();
///     while transport.pending_count().await? > 0 {
///         out.extend_from_slice(&transport.read_available(usize::MAX).await?);
///     }
///     Ok(out)
/// }
/// ```
pub trait Transport: Send {
    /// Human-readable endpoint name, used in logs and errors.
    fn name(&self) -> &str;

    fn is_open(&self) -> bool;

    /// Open the endpoint.
    ///
    /// # Errors
    ///
    /// Returns `TransportError::OpenFailed` if the device is busy, absent or
    /// not accessible.
    async fn open(&mut self) -> Result<()>;

    /// Number of bytes that can be read right now without waiting.
    async fn pending_count(&mut self) -> Result<usize>;

    /// Take up to `limit` of the bytes currently pending. Bytes beyond
    /// `limit` stay pending for the next read. May return an empty buffer.
    async fn read_available(&mut self, limit: usize) -> Result<Bytes>;

    /// Close the endpoint. Closing an already closed transport is a no-op.
    async fn close(&mut self) -> Result<()>;
}
