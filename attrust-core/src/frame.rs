//! Wire frame structure and encoding/decoding

use bytes::{BufMut, Bytes, BytesMut};
use std::fmt;
use tracing::{debug, trace};

use crate::{
    checksum,
    command::Command,
    constants::{CHECKSUM_LEN, FRAME_HEADER, MIN_FRAME_LEN, PAYLOAD_OFFSET},
    error::{Error, Result},
};

/// How to treat the trailing checksum of a received frame
///
/// Deployed terminals are known to emit frames whose checksum does not
/// recompute, so the default is to tolerate a mismatch and leave rejection
/// to callers that opt in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChecksumPolicy {
    /// Accept the frame regardless of the received checksum
    #[default]
    Tolerate,

    /// Reject frames whose checksum does not recompute
    Enforce,
}

/// Protocol wire frame
///
/// # Frame Structure
///
/// ```text
/// ┌─────────────┬─────────────┬─────────────┬─────────────┬─────────────┐
/// │   Header    │  DeviceID   │   Command   │   Payload   │  Checksum   │
/// │   1 byte    │   4 bytes   │   1 byte    │   N bytes   │   2 bytes   │
/// │   (0xA5)    │  (LE u32)   │    (u8)     │   (bytes)   │  (LE u16)   │
/// └─────────────┴─────────────┴─────────────┴─────────────┴─────────────┘
/// ```
///
/// The checksum covers every byte after the header sentinel (device id,
/// command, payload). There is no length prefix; a frame's extent follows
/// from the fixed framing plus the command-defined payload length.
///
/// # Examples
///
/// ```
/// use attrust_core::{Command, Frame};
///
/// let frame = Frame::new(5, Command::GetClock);
/// let encoded = frame.encode();
/// assert_eq!(&encoded[..], &[0xA5, 0x05, 0x00, 0x00, 0x00, 0x38, 0xE9, 0xD2]);
///
/// let decoded = Frame::decode(&encoded).unwrap();
/// assert_eq!(decoded.command, Command::GetClock);
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct Frame {
    /// Device identifier (caller-configured, constant per connection)
    pub device_id: u32,

    /// Command code
    pub command: Command,

    /// Frame payload (command-specific data)
    pub payload: Bytes,
}

impl Frame {
    /// Fixed framing overhead in bytes
    pub const FRAMING_LEN: usize = MIN_FRAME_LEN;

    /// Maximum payload size
    pub const MAX_PAYLOAD_SIZE: usize = crate::MAX_FRAME_SIZE - Self::FRAMING_LEN;

    /// Create a new frame with empty payload
    pub fn new(device_id: u32, command: Command) -> Self {
        Self {
            device_id,
            command,
            payload: Bytes::new(),
        }
    }

    /// Create a frame with payload
    ///
    /// # Examples
    ///
    /// ```
    /// use attrust_core::{Command, Frame};
    ///
    /// let frame = Frame::with_payload(5, Command::SetTimezone, vec![0xFE]);
    /// assert_eq!(frame.payload.len(), 1);
    /// ```
    pub fn with_payload(device_id: u32, command: Command, payload: impl Into<Bytes>) -> Self {
        Self {
            device_id,
            command,
            payload: payload.into(),
        }
    }

    /// Calculate the checksum for this frame
    pub fn checksum(&self) -> u16 {
        checksum::frame_checksum(self.device_id, self.command.code(), &self.payload)
    }

    /// Encode the frame to wire bytes
    pub fn encode(&self) -> BytesMut {
        let total_size = Self::FRAMING_LEN + self.payload.len();
        let mut buf = BytesMut::with_capacity(total_size);

        buf.put_u8(FRAME_HEADER);
        buf.put_u32_le(self.device_id);
        buf.put_u8(self.command.code());
        buf.put_slice(&self.payload);
        buf.put_u16_le(self.checksum());

        trace!(frame = %hex::encode(&buf), "Encoded frame");

        buf
    }

    /// Decode a frame, tolerating checksum mismatches
    pub fn decode(raw: &[u8]) -> Result<Self> {
        Self::decode_with(raw, ChecksumPolicy::Tolerate)
    }

    /// Decode a frame under an explicit checksum policy
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The buffer is shorter than the fixed framing (8 bytes)
    /// - The header sentinel is wrong
    /// - The command code is unknown
    /// - The checksum does not recompute and `policy` is [`ChecksumPolicy::Enforce`]
    pub fn decode_with(raw: &[u8], policy: ChecksumPolicy) -> Result<Self> {
        let view = split(raw)?;

        if !view.checksum_matches() {
            match policy {
                ChecksumPolicy::Enforce => {
                    return Err(Error::ChecksumMismatch {
                        computed: view.computed_checksum(),
                        received: view.checksum,
                    });
                }
                ChecksumPolicy::Tolerate => {
                    debug!(
                        computed = format!("0x{:04X}", view.computed_checksum()),
                        received = format!("0x{:04X}", view.checksum),
                        "Tolerating checksum mismatch"
                    );
                }
            }
        }

        Ok(Self {
            device_id: view.device_id,
            command: Command::try_from(view.command)?,
            payload: Bytes::copy_from_slice(view.payload),
        })
    }

    /// Get total encoded size
    pub fn size(&self) -> usize {
        Self::FRAMING_LEN + self.payload.len()
    }
}

impl fmt::Debug for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Frame")
            .field("device_id", &self.device_id)
            .field("command", &self.command)
            .field("checksum", &format!("0x{:04X}", self.checksum()))
            .field("payload_len", &self.payload.len())
            .finish()
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Frame[{}](device={}, len={})",
            self.command,
            self.device_id,
            self.payload.len()
        )
    }
}

/// Borrowed view of a raw frame's regions
///
/// Produced by [`split`]: framing is validated (length, header sentinel)
/// but the payload is not yet interpreted and the checksum not yet checked.
#[derive(Debug, Clone, Copy)]
pub struct FrameView<'a> {
    /// Device identifier from bytes 1..5
    pub device_id: u32,

    /// Raw command code (may be unknown to the catalog)
    pub command: u8,

    /// Payload region
    pub payload: &'a [u8],

    /// Received trailing checksum
    pub checksum: u16,
}

impl FrameView<'_> {
    /// Recompute the checksum over the covered region
    pub fn computed_checksum(&self) -> u16 {
        checksum::frame_checksum(self.device_id, self.command, self.payload)
    }

    /// Whether the received checksum recomputes
    pub fn checksum_matches(&self) -> bool {
        self.computed_checksum() == self.checksum
    }
}

/// Split a raw buffer into frame regions
///
/// Validates the minimum length and the header sentinel only.
pub fn split(raw: &[u8]) -> Result<FrameView<'_>> {
    if raw.len() < MIN_FRAME_LEN {
        return Err(Error::FrameTooShort {
            expected: MIN_FRAME_LEN,
            actual: raw.len(),
        });
    }

    if raw[0] != FRAME_HEADER {
        return Err(Error::BadHeader { byte: raw[0] });
    }

    let device_id = u32::from_le_bytes([raw[1], raw[2], raw[3], raw[4]]);
    let command = raw[5];
    let payload = &raw[PAYLOAD_OFFSET..raw.len() - CHECKSUM_LEN];
    let checksum = u16::from_le_bytes([raw[raw.len() - 2], raw[raw.len() - 1]]);

    Ok(FrameView {
        device_id,
        command,
        payload,
        checksum,
    })
}
