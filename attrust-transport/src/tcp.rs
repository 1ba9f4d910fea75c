//! TCP transport

use std::net::SocketAddr;
use std::time::Duration;

use async_trait::async_trait;
use bytes::BytesMut;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::{Instant, timeout};
use tracing::{debug, trace, warn};

use attrust_core::constants::MIN_FRAME_LEN;

use crate::{Transport, error::*};

/// TCP transport for the terminals
///
/// The devices hold one persistent connection per client and answer
/// strictly in request order.
pub struct TcpTransport {
    addr: String,
    port: u16,
    socket_addr: Option<SocketAddr>,
    stream: Option<TcpStream>,
    connect_timeout: Duration,
}

impl TcpTransport {
    /// Create new TCP transport
    pub fn new(addr: impl Into<String>, port: u16) -> Self {
        Self {
            addr: addr.into(),
            port,
            socket_addr: None,
            stream: None,
            connect_timeout: Duration::from_secs(5),
        }
    }

    /// Set connection timeout
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Resolve address to SocketAddr
    async fn resolve_addr(&mut self) -> Result<SocketAddr> {
        if let Some(addr) = self.socket_addr {
            return Ok(addr);
        }

        let addr_str = format!("{}:{}", self.addr, self.port);

        let addrs: Vec<SocketAddr> = tokio::net::lookup_host(&addr_str)
            .await
            .map_err(|e| Error::InvalidAddress(format!("{}: {}", addr_str, e)))?
            .collect();

        let addr = addrs
            .first()
            .ok_or_else(|| Error::InvalidAddress(format!("No addresses found for {}", addr_str)))?;

        self.socket_addr = Some(*addr);
        Ok(*addr)
    }
}

#[async_trait]
impl Transport for TcpTransport {
    async fn connect(&mut self) -> Result<()> {
        if self.is_connected() {
            return Err(Error::AlreadyConnected);
        }

        let addr = self.resolve_addr().await?;

        debug!("Connecting to {}...", addr);

        let stream = timeout(self.connect_timeout, TcpStream::connect(addr))
            .await
            .map_err(|_| Error::ConnectionTimeout)?
            .map_err(Error::Io)?;

        // Disable Nagle's algorithm for low latency
        stream.set_nodelay(true)?;

        debug!("Connected to {}", addr);

        self.stream = Some(stream);
        Ok(())
    }

    async fn disconnect(&mut self) -> Result<()> {
        if let Some(mut stream) = self.stream.take() {
            debug!("Disconnecting from {}...", self.remote_addr());

            // Graceful shutdown
            let _ = stream.shutdown().await;
        }

        self.socket_addr = None;
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.stream.is_some()
    }

    async fn send(&mut self, data: &[u8]) -> Result<()> {
        let stream = self.stream.as_mut().ok_or(Error::NotConnected)?;

        trace!("Sending {} bytes: {:02X?}", data.len(), &data[..data.len().min(16)]);

        stream.write_all(data).await?;
        stream.flush().await?;

        Ok(())
    }

    async fn receive_at_least(&mut self, min_len: usize, timeout_dur: Duration) -> Result<BytesMut> {
        let stream = self.stream.as_mut().ok_or(Error::NotConnected)?;

        // A response frame is never smaller than the fixed framing
        let target = min_len.max(MIN_FRAME_LEN);
        let deadline = Instant::now() + timeout_dur;

        let mut buf = BytesMut::with_capacity(target.max(1024));

        // Responses carry no length prefix and can arrive split across
        // segments: keep reading until the declared minimum is buffered.
        while buf.len() < target {
            let remaining = deadline
                .checked_duration_since(Instant::now())
                .ok_or(Error::ReadTimeout {
                    buffered: buf.len(),
                    needed: target,
                })?;

            let n = match timeout(remaining, stream.read_buf(&mut buf)).await {
                Ok(read) => read.map_err(Error::Io)?,
                Err(_) => {
                    return Err(Error::ReadTimeout {
                        buffered: buf.len(),
                        needed: target,
                    });
                }
            };

            if n == 0 {
                return Err(Error::ConnectionClosed);
            }
        }

        trace!("Received {} bytes: {:02X?}", buf.len(), &buf[..buf.len().min(16)]);

        Ok(buf)
    }

    fn remote_addr(&self) -> String {
        self.socket_addr
            .map(|addr| addr.to_string())
            .unwrap_or_else(|| format!("{}:{}", self.addr, self.port))
    }
}

impl Drop for TcpTransport {
    fn drop(&mut self) {
        if self.is_connected() {
            warn!("TCP transport dropped while still connected");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::net::TcpListener;

    #[tokio::test]
    async fn test_tcp_transport_create() {
        let transport = TcpTransport::new("192.168.1.201", 5010);
        assert!(!transport.is_connected());
    }

    #[tokio::test]
    async fn test_tcp_transport_invalid_address() {
        let mut transport = TcpTransport::new("invalid..address", 5010)
            .with_connect_timeout(Duration::from_millis(100));

        let result = transport.connect().await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_send_without_connect() {
        let mut transport = TcpTransport::new("127.0.0.1", 5010);
        let result = transport.send(&[0xA5]).await;
        assert!(matches!(result, Err(Error::NotConnected)));
    }

    #[tokio::test]
    async fn test_receive_assembles_fragmented_frame() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        // Peer dribbles a 14-byte frame in three segments
        let server = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let frame: &[u8] = &[
                0xA5, 0x05, 0x00, 0x00, 0x00, 0x38, 0x19, 0x03, 0x0F, 0x0C, 0x22, 0x38, 0x32,
                0x87,
            ];
            for chunk in frame.chunks(5) {
                socket.write_all(chunk).await.unwrap();
                socket.flush().await.unwrap();
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
            socket
        });

        let mut transport = TcpTransport::new(addr.ip().to_string(), addr.port());
        transport.connect().await.unwrap();

        let buf = transport
            .receive_at_least(14, Duration::from_secs(2))
            .await
            .unwrap();

        assert_eq!(buf.len(), 14);
        assert_eq!(buf[0], 0xA5);

        let _ = server.await;
        transport.disconnect().await.unwrap();
    }

    #[tokio::test]
    async fn test_receive_times_out_on_partial_frame() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let server = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            // Only half a frame, then silence
            socket.write_all(&[0xA5, 0x05, 0x00, 0x00]).await.unwrap();
            socket.flush().await.unwrap();
            tokio::time::sleep(Duration::from_secs(5)).await;
            socket
        });

        let mut transport = TcpTransport::new(addr.ip().to_string(), addr.port());
        transport.connect().await.unwrap();

        let result = transport
            .receive_at_least(14, Duration::from_millis(200))
            .await;

        assert!(matches!(
            result,
            Err(Error::ReadTimeout { needed: 14, .. })
        ));

        server.abort();
        transport.disconnect().await.unwrap();
    }
}
