//! Device configuration blocks

/// Basic configuration block (display, sound, attendance mode)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BasicConfig {
    /// Minutes of inactivity before the display sleeps, 0 = never
    pub sleep_minutes: u8,
    pub volume: u8,
    pub language: u8,
    pub datetime_format: u8,
    pub attendance_state: u8,
    pub anti_passback: bool,
    pub firmware_lock: bool,
    pub wiegand_format: u8,
}

impl BasicConfig {
    pub const WIRE_LEN: usize = 8;

    pub fn to_wire(&self) -> [u8; Self::WIRE_LEN] {
        [
            self.sleep_minutes,
            self.volume,
            self.language,
            self.datetime_format,
            self.attendance_state,
            self.anti_passback as u8,
            self.firmware_lock as u8,
            self.wiegand_format,
        ]
    }
}

/// Advanced configuration block (matching, relays, event options)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AdvancedConfig {
    pub fp_precision: u8,

    /// Minutes within which a repeated punch by the same user is dropped
    pub repeat_punch_interval: u8,
    pub door_relay_seconds: u8,
    pub alarm_relay_seconds: u8,
    pub verify_mode: u8,

    /// Daily clock drift correction in seconds, signed
    pub clock_adjust: i8,
    pub realtime_events: bool,
    pub work_code: bool,
}

impl AdvancedConfig {
    pub const WIRE_LEN: usize = 8;

    pub fn to_wire(&self) -> [u8; Self::WIRE_LEN] {
        [
            self.fp_precision,
            self.repeat_punch_interval,
            self.door_relay_seconds,
            self.alarm_relay_seconds,
            self.verify_mode,
            self.clock_adjust as u8,
            self.realtime_events as u8,
            self.work_code as u8,
        ]
    }
}
