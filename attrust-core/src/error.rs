//! Error types for attrust-core

use crate::command::Command;

/// Result type alias for core protocol operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core protocol errors
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Frame is too short to carry the fixed framing
    #[error("Frame too short: expected at least {expected} bytes, got {actual} bytes")]
    FrameTooShort {
        expected: usize,
        actual: usize,
    },

    /// Leading byte is not the header sentinel
    #[error("Bad frame header: expected 0xA5, got 0x{byte:02X}")]
    BadHeader {
        byte: u8,
    },

    /// Checksum verification failed (only raised under strict validation)
    #[error("Checksum mismatch: computed 0x{computed:04X}, received 0x{received:04X}")]
    ChecksumMismatch {
        computed: u16,
        received: u16,
    },

    /// Unknown command code
    #[error("Unknown command code: 0x{0:02X}")]
    UnknownCommand(u8),

    /// Response shorter than the command's declared minimum
    #[error("Incomplete response for {command}: expected at least {expected} bytes, got {actual}")]
    IncompleteResponse {
        command: Command,
        expected: usize,
        actual: usize,
    },

    /// Payload too large to frame
    #[error("Payload too large: {size} bytes (max: {max} bytes)")]
    PayloadTooLarge {
        size: usize,
        max: usize,
    },
}

impl Error {
    /// Check if error is recoverable (retrying the command might succeed)
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::FrameTooShort { .. }
                | Self::BadHeader { .. }
                | Self::ChecksumMismatch { .. }
                | Self::IncompleteResponse { .. }
        )
    }
}
