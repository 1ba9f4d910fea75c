//! Static per-command response layouts
//!
//! One declarative table drives all response decoding: each command maps to
//! a minimum well-formed response length and either a flat field list or a
//! repeating fixed-width record descriptor. The table is data, not logic —
//! [`crate::response::decode`] is the single pipeline that interprets it.

use crate::command::Command;
use crate::constants::{
    ATTENDANCE_RECORD_LEN, BELL_SLOT_LEN, FRAMING_LEN, STAFF_RECORD_LEN,
};

/// Decoder applied to a single field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Unsigned byte
    U8,

    /// Little-endian u16
    U16Le,

    /// Little-endian u32
    U32Le,

    /// Two's-complement byte
    SignedByte,

    /// Year byte (2000 + value)
    BcdYear,

    /// Byte interpreted as a boolean (non-zero = true)
    Flag,

    /// Four octets formatted as a dotted quad
    Ip,

    /// NUL-padded fixed-width string
    Ascii { width: usize },
}

impl FieldKind {
    /// Width of the field on the wire
    pub fn width(self) -> usize {
        match self {
            Self::U8 | Self::SignedByte | Self::BcdYear | Self::Flag => 1,
            Self::U16Le => 2,
            Self::U32Le => 4,
            Self::Ip => 4,
            Self::Ascii { width } => width,
        }
    }
}

/// One named field at a fixed payload offset
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub offset: usize,
    pub kind: FieldKind,
}

/// Descriptor for a repeating fixed-width record region
#[derive(Debug, Clone, Copy)]
pub struct RecordLayout {
    /// Width of one record
    pub record_width: usize,

    /// Offset of the first record, relative to the payload region
    pub first_record_offset: usize,

    /// Field list, offsets relative to the record start
    pub fields: &'static [FieldSpec],
}

/// Shape of a command's response payload
#[derive(Debug, Clone, Copy)]
pub enum ResponseLayout {
    /// No payload expected (the device may not answer at all)
    Empty,

    /// Named fields at fixed offsets
    Flat(&'static [FieldSpec]),

    /// Repeating fixed-width records until the buffer is exhausted
    Records(RecordLayout),
}

/// Static descriptor of a command's response
#[derive(Debug, Clone, Copy)]
pub struct CommandSpec {
    pub command: Command,

    /// Minimum raw response length (framing included) for the response to
    /// be well-formed enough to decode
    pub min_response_len: usize,

    pub response: ResponseLayout,
}

const fn field(name: &'static str, offset: usize, kind: FieldKind) -> FieldSpec {
    FieldSpec { name, offset, kind }
}

/// Set-style commands answer with one lenient status byte.
static ACK_FIELDS: &[FieldSpec] = &[field("ack", 0, FieldKind::U8)];

static CLOCK_FIELDS: &[FieldSpec] = &[
    field("year", 0, FieldKind::BcdYear),
    field("month", 1, FieldKind::U8),
    field("day", 2, FieldKind::U8),
    field("hour", 3, FieldKind::U8),
    field("minute", 4, FieldKind::U8),
    field("second", 5, FieldKind::U8),
];

static BASIC_CONFIG_FIELDS: &[FieldSpec] = &[
    field("sleep_minutes", 0, FieldKind::U8),
    field("volume", 1, FieldKind::U8),
    field("language", 2, FieldKind::U8),
    field("datetime_format", 3, FieldKind::U8),
    field("attendance_state", 4, FieldKind::U8),
    field("anti_passback", 5, FieldKind::Flag),
    field("firmware_lock", 6, FieldKind::Flag),
    field("wiegand_format", 7, FieldKind::U8),
];

static ADVANCED_CONFIG_FIELDS: &[FieldSpec] = &[
    field("fp_precision", 0, FieldKind::U8),
    field("repeat_punch_interval", 1, FieldKind::U8),
    field("door_relay_seconds", 2, FieldKind::U8),
    field("alarm_relay_seconds", 3, FieldKind::U8),
    field("verify_mode", 4, FieldKind::U8),
    field("clock_adjust", 5, FieldKind::SignedByte),
    field("realtime_events", 6, FieldKind::Flag),
    field("work_code", 7, FieldKind::Flag),
];

static NET_CONFIG_FIELDS: &[FieldSpec] = &[
    field("ip", 0, FieldKind::Ip),
    field("netmask", 4, FieldKind::Ip),
    field("gateway", 8, FieldKind::Ip),
    field("port", 12, FieldKind::U16Le),
    field("dhcp", 14, FieldKind::Flag),
];

static RECORD_COUNT_FIELDS: &[FieldSpec] = &[
    field("total", 0, FieldKind::U32Le),
    field("unread", 4, FieldKind::U32Le),
];

static SERIAL_FIELDS: &[FieldSpec] =
    &[field("serial_number", 0, FieldKind::Ascii { width: 16 })];

static DEVICE_ID_FIELDS: &[FieldSpec] = &[field("device_id", 0, FieldKind::U32Le)];

static CARD_FIELDS: &[FieldSpec] = &[field("card_number", 0, FieldKind::U32Le)];

static TIMEZONE_FIELDS: &[FieldSpec] =
    &[field("utc_offset_quarters", 0, FieldKind::SignedByte)];

static DST_FIELDS: &[FieldSpec] = &[
    field("enabled", 0, FieldKind::Flag),
    field("start_month", 1, FieldKind::U8),
    field("start_day", 2, FieldKind::U8),
    field("start_hour", 3, FieldKind::U8),
    field("end_month", 4, FieldKind::U8),
    field("end_day", 5, FieldKind::U8),
    field("end_hour", 6, FieldKind::U8),
];

/// Attendance record stream: 16 bytes per record, u16 LE user id at 0,
/// bytes 2-5 reserved, date/time one byte each at 6-11, status at 12.
static ATTENDANCE_RECORD_FIELDS: &[FieldSpec] = &[
    field("user_id", 0, FieldKind::U16Le),
    field("year", 6, FieldKind::BcdYear),
    field("month", 7, FieldKind::U8),
    field("day", 8, FieldKind::U8),
    field("hour", 9, FieldKind::U8),
    field("minute", 10, FieldKind::U8),
    field("second", 11, FieldKind::U8),
    field("status", 12, FieldKind::U8),
];

static STAFF_RECORD_FIELDS: &[FieldSpec] = &[
    field("user_id", 0, FieldKind::U16Le),
    field("card_number", 2, FieldKind::U32Le),
    field("admin_level", 6, FieldKind::U8),
    field("fingerprint_count", 7, FieldKind::U8),
    field("name", 8, FieldKind::Ascii { width: 8 }),
];

static BELL_SLOT_FIELDS: &[FieldSpec] = &[
    field("hour", 0, FieldKind::U8),
    field("minute", 1, FieldKind::U8),
    field("enabled", 2, FieldKind::Flag),
];

/// Look up the response descriptor for a command
///
/// Total over the closed [`Command`] set; unknown codes are rejected
/// earlier, at `Command::try_from`.
pub fn spec(command: Command) -> CommandSpec {
    let (min_response_len, response) = match command {
        Command::GetClock => (FRAMING_LEN + 6, ResponseLayout::Flat(CLOCK_FIELDS)),
        Command::GetBasicConfig => (FRAMING_LEN + 8, ResponseLayout::Flat(BASIC_CONFIG_FIELDS)),
        Command::GetAdvancedConfig => {
            (FRAMING_LEN + 8, ResponseLayout::Flat(ADVANCED_CONFIG_FIELDS))
        }
        Command::GetNetConfig => (FRAMING_LEN + 15, ResponseLayout::Flat(NET_CONFIG_FIELDS)),
        Command::GetRecordCount => (FRAMING_LEN + 8, ResponseLayout::Flat(RECORD_COUNT_FIELDS)),
        Command::GetSerialNumber => (FRAMING_LEN, ResponseLayout::Flat(SERIAL_FIELDS)),
        Command::GetDeviceId => (FRAMING_LEN + 4, ResponseLayout::Flat(DEVICE_ID_FIELDS)),
        Command::EnrollCard => (FRAMING_LEN + 4, ResponseLayout::Flat(CARD_FIELDS)),
        Command::GetTimezone => (FRAMING_LEN + 1, ResponseLayout::Flat(TIMEZONE_FIELDS)),
        Command::GetDaylightSaving => (FRAMING_LEN + 7, ResponseLayout::Flat(DST_FIELDS)),

        Command::DownloadAllRecords | Command::DownloadNewRecords => (
            FRAMING_LEN,
            ResponseLayout::Records(RecordLayout {
                record_width: ATTENDANCE_RECORD_LEN,
                first_record_offset: 0,
                fields: ATTENDANCE_RECORD_FIELDS,
            }),
        ),
        Command::DownloadStaff => (
            FRAMING_LEN,
            ResponseLayout::Records(RecordLayout {
                record_width: STAFF_RECORD_LEN,
                first_record_offset: 0,
                fields: STAFF_RECORD_FIELDS,
            }),
        ),
        Command::GetBellSchedule => (
            FRAMING_LEN,
            ResponseLayout::Records(RecordLayout {
                record_width: BELL_SLOT_LEN,
                first_record_offset: 0,
                fields: BELL_SLOT_FIELDS,
            }),
        ),

        // The device drops the connection instead of replying
        Command::Reboot => (0, ResponseLayout::Empty),

        Command::SetClock
        | Command::SetBasicConfig
        | Command::SetAdvancedConfig
        | Command::SetNetConfig
        | Command::SetDeviceId
        | Command::SetTimezone
        | Command::SetBellSchedule
        | Command::SetDaylightSaving
        | Command::SetPingInterval
        | Command::ClearRecords
        | Command::DeleteRecord
        | Command::UploadStaff
        | Command::DeleteUser
        | Command::EnrollFingerprint
        | Command::Ping
        | Command::OpenDoor
        | Command::FactoryReset => (FRAMING_LEN, ResponseLayout::Flat(ACK_FIELDS)),
    };

    CommandSpec {
        command,
        min_response_len,
        response,
    }
}
