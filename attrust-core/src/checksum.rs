//! Frame checksum algorithm
//!
//! The terminals use a 16-bit CRC with the bit-reversed polynomial 0xA001
//! and initial register 0xFFFF (no final XOR). The checksum covers every
//! frame byte except the leading header sentinel, and is emitted on the
//! wire low byte first.

use tracing::trace;

/// Reflected CRC-16 polynomial
const POLY: u16 = 0xA001;

/// Calculate the CRC-16 of a byte sequence
///
/// # Algorithm
///
/// ```text
/// 1. register = 0xFFFF
/// 2. For each byte: register ^= byte, then 8 times:
///    if the low bit is set, register = (register >> 1) ^ 0xA001
///    otherwise            register =  register >> 1
/// 3. Return the final register
/// ```
///
/// # Examples
///
/// ```
/// use attrust_core::checksum;
///
/// assert_eq!(checksum::compute(&[]), 0xFFFF);
/// assert_eq!(checksum::compute(b"123456789"), 0x4B37);
/// ```
pub fn compute(data: &[u8]) -> u16 {
    let mut crc: u16 = 0xFFFF;

    for byte in data {
        crc ^= *byte as u16;
        for _ in 0..8 {
            if crc & 0x0001 != 0 {
                crc = (crc >> 1) ^ POLY;
            } else {
                crc >>= 1;
            }
        }
    }

    crc
}

/// Calculate the checksum for a frame body
///
/// Builds the checksummed region (device id, command, payload — everything
/// after the header sentinel) and runs [`compute`] over it.
pub fn frame_checksum(device_id: u32, command: u8, payload: &[u8]) -> u16 {
    let mut buf = Vec::with_capacity(5 + payload.len());
    buf.extend_from_slice(&device_id.to_le_bytes());
    buf.push(command);
    buf.extend_from_slice(payload);

    let checksum = compute(&buf);

    trace!(
        device_id = device_id,
        command = format!("0x{:02X}", command),
        payload_len = payload.len(),
        checksum = format!("0x{:04X}", checksum),
        "Calculated checksum"
    );

    checksum
}

/// Verify a received checksum against a recomputation
pub fn verify(device_id: u32, command: u8, payload: &[u8], expected: u16) -> bool {
    frame_checksum(device_id, command, payload) == expected
}
