//! Type definitions for attrust
//!
//! Plain value types exchanged with the terminals. No protocol knowledge
//! lives here; wire layouts belong to `attrust-core`.

pub mod config;
pub mod datetime;
pub mod error;
pub mod net;
pub mod record;
pub mod schedule;

pub use config::{AdvancedConfig, BasicConfig};
pub use datetime::DeviceDateTime;
pub use error::{Error, Result};
pub use net::NetConfig;
pub use record::{AttendanceRecord, RecordCounts, StaffRecord};
pub use schedule::{BellSlot, DaylightSaving};
