//! # attrust-core
//!
//! Core protocol implementation for AT-series biometric access terminals.
//!
//! This crate provides the low-level protocol primitives:
//! - Frame structure and encoding/decoding
//! - Checksum calculation
//! - Command definitions and the per-command response catalog
//! - Lenient field decoders
//! - Response decoding into structured values
//!
//! Everything here is a pure, synchronous transform over byte buffers;
//! sockets live in `attrust-transport`.

pub mod catalog;
pub mod checksum;
pub mod command;
pub mod constants;
pub mod error;
pub mod field;
pub mod frame;
pub mod response;

pub use catalog::{CommandSpec, FieldKind, FieldSpec, RecordLayout, ResponseLayout};
pub use command::Command;
pub use error::{Error, Result};
pub use frame::{ChecksumPolicy, Frame, FrameView};
pub use response::{DecodedResponse, FieldMap, Value};

/// Protocol version information
pub const PROTOCOL_VERSION: &str = "1.0";

/// Default device port
pub const DEFAULT_PORT: u16 = 5010;

/// Maximum frame size (64KB)
pub const MAX_FRAME_SIZE: usize = 65535;
