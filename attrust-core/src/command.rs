//! Protocol command definitions

use std::fmt;

use crate::error::{Error, Result};

/// Protocol command codes
///
/// The closed set of commands the terminals understand. Request and
/// response payload layouts for each command live in [`crate::catalog`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Command {
    // Identity
    GetSerialNumber = 0x24,
    GetDeviceId = 0x74,
    SetDeviceId = 0x75,

    // Configuration
    GetBasicConfig = 0x30,
    SetBasicConfig = 0x31,
    GetAdvancedConfig = 0x32,
    SetAdvancedConfig = 0x33,

    // Keep-alive
    Ping = 0x36,
    SetPingInterval = 0x37,

    // Clock
    GetClock = 0x38,
    SetClock = 0x39,

    // Network parameters
    GetNetConfig = 0x3A,
    SetNetConfig = 0x3B,

    // Attendance records
    GetRecordCount = 0x3C,
    ClearRecords = 0x3D,
    DeleteRecord = 0x3E,
    DownloadAllRecords = 0x40,
    DownloadNewRecords = 0x41,

    // Staff roster
    DownloadStaff = 0x42,
    UploadStaff = 0x43,
    DeleteUser = 0x44,

    // Enrollment
    EnrollFingerprint = 0x45,
    EnrollCard = 0x46,

    // Schedules
    GetBellSchedule = 0x48,
    SetBellSchedule = 0x49,
    GetTimezone = 0x4A,
    SetTimezone = 0x4B,
    GetDaylightSaving = 0x4C,
    SetDaylightSaving = 0x4D,

    // Device control
    OpenDoor = 0x5E,
    Reboot = 0x5F,
    FactoryReset = 0x60,
}

impl Command {
    /// Every command code, in wire-code order
    pub const ALL: &'static [Command] = &[
        Self::GetSerialNumber,
        Self::GetBasicConfig,
        Self::SetBasicConfig,
        Self::GetAdvancedConfig,
        Self::SetAdvancedConfig,
        Self::Ping,
        Self::SetPingInterval,
        Self::GetClock,
        Self::SetClock,
        Self::GetNetConfig,
        Self::SetNetConfig,
        Self::GetRecordCount,
        Self::ClearRecords,
        Self::DeleteRecord,
        Self::DownloadAllRecords,
        Self::DownloadNewRecords,
        Self::DownloadStaff,
        Self::UploadStaff,
        Self::DeleteUser,
        Self::EnrollFingerprint,
        Self::EnrollCard,
        Self::GetBellSchedule,
        Self::SetBellSchedule,
        Self::GetTimezone,
        Self::SetTimezone,
        Self::GetDaylightSaving,
        Self::SetDaylightSaving,
        Self::OpenDoor,
        Self::Reboot,
        Self::FactoryReset,
        Self::GetDeviceId,
        Self::SetDeviceId,
    ];

    /// Wire code for this command
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Whether the device sends any reply at all
    ///
    /// `Reboot` drops the connection instead of answering.
    pub fn expects_reply(self) -> bool {
        !matches!(self, Self::Reboot)
    }

    /// Get command name
    pub fn name(self) -> &'static str {
        match self {
            Self::GetSerialNumber => "CMD_GET_SERIAL",
            Self::GetDeviceId => "CMD_GET_DEVICE_ID",
            Self::SetDeviceId => "CMD_SET_DEVICE_ID",
            Self::GetBasicConfig => "CMD_GET_BASIC_CONFIG",
            Self::SetBasicConfig => "CMD_SET_BASIC_CONFIG",
            Self::GetAdvancedConfig => "CMD_GET_ADV_CONFIG",
            Self::SetAdvancedConfig => "CMD_SET_ADV_CONFIG",
            Self::Ping => "CMD_PING",
            Self::SetPingInterval => "CMD_SET_PING_INTERVAL",
            Self::GetClock => "CMD_GET_CLOCK",
            Self::SetClock => "CMD_SET_CLOCK",
            Self::GetNetConfig => "CMD_GET_NET_CONFIG",
            Self::SetNetConfig => "CMD_SET_NET_CONFIG",
            Self::GetRecordCount => "CMD_GET_RECORD_COUNT",
            Self::ClearRecords => "CMD_CLEAR_RECORDS",
            Self::DeleteRecord => "CMD_DELETE_RECORD",
            Self::DownloadAllRecords => "CMD_DOWNLOAD_ALL_RECORDS",
            Self::DownloadNewRecords => "CMD_DOWNLOAD_NEW_RECORDS",
            Self::DownloadStaff => "CMD_DOWNLOAD_STAFF",
            Self::UploadStaff => "CMD_UPLOAD_STAFF",
            Self::DeleteUser => "CMD_DELETE_USER",
            Self::EnrollFingerprint => "CMD_ENROLL_FINGERPRINT",
            Self::EnrollCard => "CMD_ENROLL_CARD",
            Self::GetBellSchedule => "CMD_GET_BELL_SCHEDULE",
            Self::SetBellSchedule => "CMD_SET_BELL_SCHEDULE",
            Self::GetTimezone => "CMD_GET_TIMEZONE",
            Self::SetTimezone => "CMD_SET_TIMEZONE",
            Self::GetDaylightSaving => "CMD_GET_DST",
            Self::SetDaylightSaving => "CMD_SET_DST",
            Self::OpenDoor => "CMD_OPEN_DOOR",
            Self::Reboot => "CMD_REBOOT",
            Self::FactoryReset => "CMD_FACTORY_RESET",
        }
    }
}

impl From<Command> for u8 {
    fn from(cmd: Command) -> u8 {
        cmd as u8
    }
}

impl TryFrom<u8> for Command {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0x24 => Ok(Self::GetSerialNumber),
            0x30 => Ok(Self::GetBasicConfig),
            0x31 => Ok(Self::SetBasicConfig),
            0x32 => Ok(Self::GetAdvancedConfig),
            0x33 => Ok(Self::SetAdvancedConfig),
            0x36 => Ok(Self::Ping),
            0x37 => Ok(Self::SetPingInterval),
            0x38 => Ok(Self::GetClock),
            0x39 => Ok(Self::SetClock),
            0x3A => Ok(Self::GetNetConfig),
            0x3B => Ok(Self::SetNetConfig),
            0x3C => Ok(Self::GetRecordCount),
            0x3D => Ok(Self::ClearRecords),
            0x3E => Ok(Self::DeleteRecord),
            0x40 => Ok(Self::DownloadAllRecords),
            0x41 => Ok(Self::DownloadNewRecords),
            0x42 => Ok(Self::DownloadStaff),
            0x43 => Ok(Self::UploadStaff),
            0x44 => Ok(Self::DeleteUser),
            0x45 => Ok(Self::EnrollFingerprint),
            0x46 => Ok(Self::EnrollCard),
            0x48 => Ok(Self::GetBellSchedule),
            0x49 => Ok(Self::SetBellSchedule),
            0x4A => Ok(Self::GetTimezone),
            0x4B => Ok(Self::SetTimezone),
            0x4C => Ok(Self::GetDaylightSaving),
            0x4D => Ok(Self::SetDaylightSaving),
            0x5E => Ok(Self::OpenDoor),
            0x5F => Ok(Self::Reboot),
            0x60 => Ok(Self::FactoryReset),
            0x74 => Ok(Self::GetDeviceId),
            0x75 => Ok(Self::SetDeviceId),
            _ => Err(Error::UnknownCommand(value)),
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(0x{:02X})", self.name(), *self as u8)
    }
}
