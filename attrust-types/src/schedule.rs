//! Bell and daylight-saving schedules

use std::fmt;

/// One bell slot: the terminal rings at the given time when enabled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BellSlot {
    pub hour: u8,
    pub minute: u8,
    pub enabled: bool,
}

impl BellSlot {
    pub const WIRE_LEN: usize = 3;

    pub fn to_wire(&self) -> [u8; Self::WIRE_LEN] {
        [self.hour, self.minute, self.enabled as u8]
    }
}

impl fmt::Display for BellSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02} ({})",
            self.hour,
            self.minute,
            if self.enabled { "on" } else { "off" }
        )
    }
}

/// Daylight-saving rule: month/day/hour boundaries, no year
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DaylightSaving {
    pub enabled: bool,
    pub start_month: u8,
    pub start_day: u8,
    pub start_hour: u8,
    pub end_month: u8,
    pub end_day: u8,
    pub end_hour: u8,
}

impl DaylightSaving {
    pub const WIRE_LEN: usize = 7;

    pub fn to_wire(&self) -> [u8; Self::WIRE_LEN] {
        [
            self.enabled as u8,
            self.start_month,
            self.start_day,
            self.start_hour,
            self.end_month,
            self.end_day,
            self.end_hour,
        ]
    }
}
