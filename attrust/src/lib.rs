//! # attrust
//!
//! Client library for AT-series biometric access terminals.
//!
//! ## Features
//!
//! - Type-safe protocol implementation (closed command set, typed records)
//! - Async/await API using Tokio
//! - Lenient decoding matching deployed firmware variants
//! - Optional strict checksum validation
//!
//! ## Quick Start
//!
//! ```no_run
//! use attrust::Device;
//!
//! #[tokio::main]
//! async fn main() -> attrust::Result<()> {
//!     // Connect to the terminal
//!     let mut device = Device::new("192.168.1.201", 5010);
//!     device.connect().await?;
//!
//!     // Read its clock
//!     let clock = device.get_clock().await?;
//!     println!("Device time: {}", clock);
//!
//!     // Pull the attendance log
//!     for record in device.download_all_records().await? {
//!         println!("{}", record);
//!     }
//!
//!     device.disconnect().await?;
//!     Ok(())
//! }
//! ```

pub mod device;
pub mod error;

// Re-exports
pub use device::Device;
pub use error::{Error, Result};

// Re-export types
pub use attrust_core::{ChecksumPolicy, Command, DecodedResponse, Frame};
pub use attrust_types::{
    AdvancedConfig, AttendanceRecord, BasicConfig, BellSlot, DaylightSaving, DeviceDateTime,
    NetConfig, RecordCounts, StaffRecord,
};
