//! Error types for the high-level device API

use attrust_core::Command;

/// Result type alias for device operations
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Protocol-level failure (framing, checksum, decoding)
    #[error(transparent)]
    Protocol(#[from] attrust_core::Error),

    /// Transport-level failure (connect, send, receive, timeout)
    #[error(transparent)]
    Transport(#[from] attrust_transport::Error),

    /// Value failed validation before encoding
    #[error(transparent)]
    Types(#[from] attrust_types::Error),

    /// Device rejected the command with a non-zero status byte
    #[error("Device rejected {command}: status {status}")]
    DeviceNak {
        command: Command,
        status: u8,
    },

    /// Not connected to a device
    #[error("Not connected - call connect() first")]
    NotConnected,

    /// Response decoded but carried values we cannot use
    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),
}
