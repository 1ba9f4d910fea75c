//! Transport layer for the terminal protocol
//!
//! Owns the TCP connection; the codec in `attrust-core` never touches a
//! socket. The protocol is strictly one request in flight per connection —
//! responses carry no correlation id, so a reply can only belong to the
//! most recent request. `&mut self` on every method enforces that.

pub mod error;
pub mod tcp;

pub use error::{Error, Result};
pub use tcp::TcpTransport;

use std::time::Duration;

use async_trait::async_trait;
use bytes::BytesMut;

/// Transport contract the device layer depends on
#[async_trait]
pub trait Transport: Send + Sync {
    /// Connect to the device
    async fn connect(&mut self) -> Result<()>;

    /// Disconnect from the device
    async fn disconnect(&mut self) -> Result<()>;

    /// Check if connected
    fn is_connected(&self) -> bool;

    /// Send raw bytes
    async fn send(&mut self, data: &[u8]) -> Result<()>;

    /// Receive raw bytes, accumulating reads until at least `min_len`
    /// bytes are buffered or the deadline lapses
    ///
    /// Responses have no length prefix and may arrive fragmented across
    /// TCP segments; the caller supplies the addressed command's declared
    /// minimum so a partial frame is never handed upward.
    async fn receive_at_least(&mut self, min_len: usize, timeout: Duration) -> Result<BytesMut>;

    /// Get remote address
    fn remote_addr(&self) -> String;
}
