//! Catalog-driven response decoding
//!
//! Given a command and the raw response frame, locates the payload region,
//! applies the catalog's field decoders, and for record-stream responses
//! slices consecutive fixed-width records until the buffer is exhausted.

use std::collections::BTreeMap;
use std::fmt;
use std::net::Ipv4Addr;

use tracing::trace;

use crate::{
    catalog::{self, FieldKind, FieldSpec, ResponseLayout},
    command::Command,
    constants::{CHECKSUM_LEN, PAYLOAD_OFFSET},
    error::{Error, Result},
    field,
};

/// A decoded field value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Int(i64),
    Text(String),
    Bool(bool),
    Ip(Ipv4Addr),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            Self::Text(v) => write!(f, "{v}"),
            Self::Bool(v) => write!(f, "{v}"),
            Self::Ip(v) => write!(f, "{v}"),
        }
    }
}

/// Named decoded fields with lenient accessors
///
/// Missing fields read as the type's default, mirroring the wire-level
/// leniency policy: callers probe for optional fields without error
/// plumbing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldMap(BTreeMap<&'static str, Value>);

impl FieldMap {
    fn insert(&mut self, name: &'static str, value: Value) {
        self.0.insert(name, value);
    }

    /// Raw access to a field
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// Integer field, 0 if absent or of another type
    pub fn int(&self, name: &str) -> i64 {
        match self.0.get(name) {
            Some(Value::Int(v)) => *v,
            _ => 0,
        }
    }

    /// Text field, empty if absent or of another type
    pub fn text(&self, name: &str) -> &str {
        match self.0.get(name) {
            Some(Value::Text(v)) => v.as_str(),
            _ => "",
        }
    }

    /// Boolean field, false if absent or of another type
    pub fn flag(&self, name: &str) -> bool {
        matches!(self.0.get(name), Some(Value::Bool(true)))
    }

    /// IP field, 0.0.0.0 if absent or of another type
    pub fn ip(&self, name: &str) -> Ipv4Addr {
        match self.0.get(name) {
            Some(Value::Ip(v)) => *v,
            _ => Ipv4Addr::UNSPECIFIED,
        }
    }

    /// Iterate fields in name order
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &Value)> {
        self.0.iter().map(|(k, v)| (*k, v))
    }

    /// Number of decoded fields
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no fields were decoded
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A fully decoded response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedResponse {
    command: Command,
    fields: FieldMap,
    records: Vec<FieldMap>,
}

impl DecodedResponse {
    fn empty(command: Command) -> Self {
        Self {
            command,
            fields: FieldMap::default(),
            records: Vec::new(),
        }
    }

    /// Command this response answers
    pub fn command(&self) -> Command {
        self.command
    }

    /// Flat fields of the response
    pub fn fields(&self) -> &FieldMap {
        &self.fields
    }

    /// Decoded records, in arrival order
    ///
    /// Arrival order is the device's internal storage order; the codec
    /// preserves it without further interpretation.
    pub fn records(&self) -> &[FieldMap] {
        &self.records
    }

    /// Integer field, 0 if absent
    pub fn int(&self, name: &str) -> i64 {
        self.fields.int(name)
    }

    /// Text field, empty if absent
    pub fn text(&self, name: &str) -> &str {
        self.fields.text(name)
    }

    /// Boolean field, false if absent
    pub fn flag(&self, name: &str) -> bool {
        self.fields.flag(name)
    }

    /// IP field, 0.0.0.0 if absent
    pub fn ip(&self, name: &str) -> Ipv4Addr {
        self.fields.ip(name)
    }
}

fn decode_field(payload: &[u8], spec: &FieldSpec) -> Value {
    match spec.kind {
        FieldKind::U8 => Value::Int(field::u8_at(payload, spec.offset) as i64),
        FieldKind::U16Le => Value::Int(field::u16_le(payload, spec.offset) as i64),
        FieldKind::U32Le => Value::Int(field::u32_le(payload, spec.offset) as i64),
        FieldKind::SignedByte => Value::Int(field::signed_byte(payload, spec.offset) as i64),
        FieldKind::BcdYear => Value::Int(field::bcd_year(payload, spec.offset) as i64),
        FieldKind::Flag => Value::Bool(field::u8_at(payload, spec.offset) != 0),
        FieldKind::Ip => Value::Ip(field::dotted_ip(payload, spec.offset)),
        FieldKind::Ascii { width } => Value::Text(field::fixed_ascii(
            payload,
            spec.offset,
            spec.offset + width,
        )),
    }
}

fn decode_fields(payload: &[u8], specs: &[FieldSpec]) -> FieldMap {
    let mut map = FieldMap::default();
    for spec in specs {
        map.insert(spec.name, decode_field(payload, spec));
    }
    map
}

/// Payload region of a raw frame: everything between the fixed front
/// framing and the trailing checksum. Empty for truncated buffers.
fn payload_region(raw: &[u8]) -> &[u8] {
    let end = raw.len().saturating_sub(CHECKSUM_LEN);
    if end <= PAYLOAD_OFFSET {
        &[]
    } else {
        &raw[PAYLOAD_OFFSET..end]
    }
}

/// Decode a raw response frame for a command
///
/// The raw buffer is the complete frame as received (framing included).
/// Header and checksum validation are the frame codec's concern
/// ([`crate::frame`]); this pipeline only checks the command's declared
/// minimum length, then applies the catalog layout leniently.
///
/// # Errors
///
/// [`Error::IncompleteResponse`] when the buffer is shorter than the
/// command's declared minimum — "treat as no data", not a hard fault.
pub fn decode(command: Command, raw: &[u8]) -> Result<DecodedResponse> {
    let spec = catalog::spec(command);

    if raw.len() < spec.min_response_len {
        return Err(Error::IncompleteResponse {
            command,
            expected: spec.min_response_len,
            actual: raw.len(),
        });
    }

    let payload = payload_region(raw);

    let decoded = match spec.response {
        ResponseLayout::Empty => DecodedResponse::empty(command),
        ResponseLayout::Flat(fields) => DecodedResponse {
            command,
            fields: decode_fields(payload, fields),
            records: Vec::new(),
        },
        ResponseLayout::Records(layout) => {
            let region = payload.get(layout.first_record_offset..).unwrap_or(&[]);
            let count = region.len() / layout.record_width;

            let mut records = Vec::with_capacity(count);
            for i in 0..count {
                let start = i * layout.record_width;
                let slice = &region[start..start + layout.record_width];
                records.push(decode_fields(slice, layout.fields));
            }

            DecodedResponse {
                command,
                fields: FieldMap::default(),
                records,
            }
        }
    };

    trace!(
        command = %command,
        raw_len = raw.len(),
        fields = decoded.fields.len(),
        records = decoded.records.len(),
        "Decoded response"
    );

    Ok(decoded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::Frame;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn raw_response(command: Command, payload: &[u8]) -> Vec<u8> {
        Frame::with_payload(5, command, payload.to_vec())
            .encode()
            .to_vec()
    }

    #[test]
    fn test_clock_response() {
        // 2025-03-15 12:34:56
        let raw = raw_response(Command::GetClock, &[0x19, 0x03, 0x0F, 0x0C, 0x22, 0x38]);
        let decoded = decode(Command::GetClock, &raw).unwrap();

        assert_eq!(decoded.int("year"), 2025);
        assert_eq!(decoded.int("month"), 3);
        assert_eq!(decoded.int("day"), 15);
        assert_eq!(decoded.int("hour"), 12);
        assert_eq!(decoded.int("minute"), 34);
        assert_eq!(decoded.int("second"), 56);
    }

    #[test]
    fn test_incomplete_response() {
        // Clock response needs 6 payload bytes; send 3
        let raw = raw_response(Command::GetClock, &[0x19, 0x03, 0x0F]);
        let result = decode(Command::GetClock, &raw);

        assert!(matches!(
            result,
            Err(Error::IncompleteResponse {
                command: Command::GetClock,
                expected: 14,
                actual: 11,
            })
        ));
    }

    #[test]
    fn test_net_config_response() {
        let mut payload = vec![192, 168, 1, 100, 255, 255, 255, 0, 192, 168, 1, 1];
        payload.extend_from_slice(&5010u16.to_le_bytes());
        payload.push(1); // dhcp on

        let raw = raw_response(Command::GetNetConfig, &payload);
        let decoded = decode(Command::GetNetConfig, &raw).unwrap();

        assert_eq!(decoded.ip("ip").to_string(), "192.168.1.100");
        assert_eq!(decoded.ip("netmask").to_string(), "255.255.255.0");
        assert_eq!(decoded.ip("gateway").to_string(), "192.168.1.1");
        assert_eq!(decoded.int("port"), 5010);
        assert!(decoded.flag("dhcp"));
    }

    #[test]
    fn test_serial_number_response() {
        let raw = raw_response(Command::GetSerialNumber, b"AT5-00123456\x00\x00\x00\x00");
        let decoded = decode(Command::GetSerialNumber, &raw).unwrap();

        assert_eq!(decoded.text("serial_number"), "AT5-00123456");
    }

    #[test]
    fn test_serial_number_shorter_than_field_width() {
        // Bare frame: the 16-byte ASCII field is entirely absent and
        // decodes to the empty string, not an error.
        let raw = raw_response(Command::GetSerialNumber, b"");
        let decoded = decode(Command::GetSerialNumber, &raw).unwrap();

        assert_eq!(decoded.text("serial_number"), "");
    }

    #[test]
    fn test_record_stream_two_records() {
        let mut payload = Vec::new();
        // user 20, 2025-03-15 07:36:58, check-out
        payload.extend_from_slice(&[
            0x14, 0x00, 0, 0, 0, 0, 0x19, 0x03, 0x0F, 0x07, 0x24, 0x3A, 0x01, 0, 0, 0,
        ]);
        // user 65, 2025-03-15 08:15:23, check-in
        payload.extend_from_slice(&[
            0x41, 0x00, 0, 0, 0, 0, 0x19, 0x03, 0x0F, 0x08, 0x0F, 0x17, 0x00, 0, 0, 0,
        ]);

        let raw = raw_response(Command::DownloadAllRecords, &payload);
        let decoded = decode(Command::DownloadAllRecords, &raw).unwrap();

        assert_eq!(decoded.records().len(), 2);

        let first = &decoded.records()[0];
        assert_eq!(first.int("user_id"), 20);
        assert_eq!(first.int("year"), 2025);
        assert_eq!(first.int("hour"), 7);
        assert_eq!(first.int("status"), 1);

        let second = &decoded.records()[1];
        assert_eq!(second.int("user_id"), 65);
        assert_eq!(second.int("minute"), 15);
        assert_eq!(second.int("status"), 0);
    }

    #[test]
    fn test_record_stream_empty() {
        let raw = raw_response(Command::DownloadNewRecords, &[]);
        let decoded = decode(Command::DownloadNewRecords, &raw).unwrap();

        assert!(decoded.records().is_empty());
    }

    #[test]
    fn test_record_stream_ignores_trailing_partial_record() {
        // 16 full bytes + 5 stray bytes: one record, remainder dropped
        let mut payload = vec![0u8; 16];
        payload[0] = 9;
        payload.extend_from_slice(&[1, 2, 3, 4, 5]);

        let raw = raw_response(Command::DownloadAllRecords, &payload);
        let decoded = decode(Command::DownloadAllRecords, &raw).unwrap();

        assert_eq!(decoded.records().len(), 1);
        assert_eq!(decoded.records()[0].int("user_id"), 9);
    }

    #[test]
    fn test_bell_schedule_stream() {
        let raw = raw_response(Command::GetBellSchedule, &[7, 30, 1, 12, 0, 0, 17, 45, 1]);
        let decoded = decode(Command::GetBellSchedule, &raw).unwrap();

        assert_eq!(decoded.records().len(), 3);
        assert_eq!(decoded.records()[0].int("hour"), 7);
        assert!(decoded.records()[0].flag("enabled"));
        assert!(!decoded.records()[1].flag("enabled"));
        assert_eq!(decoded.records()[2].int("minute"), 45);
    }

    #[test]
    fn test_staff_roster_stream() {
        let mut rec = vec![0u8; 16];
        rec[0..2].copy_from_slice(&100u16.to_le_bytes());
        rec[2..6].copy_from_slice(&0xAABBCCDDu32.to_le_bytes());
        rec[6] = 2; // admin
        rec[7] = 3; // three fingerprints
        rec[8..12].copy_from_slice(b"LOBO");

        let raw = raw_response(Command::DownloadStaff, &rec);
        let decoded = decode(Command::DownloadStaff, &raw).unwrap();

        let staff = &decoded.records()[0];
        assert_eq!(staff.int("user_id"), 100);
        assert_eq!(staff.int("card_number"), 0xAABBCCDD);
        assert_eq!(staff.int("admin_level"), 2);
        assert_eq!(staff.text("name"), "LOBO");
    }

    #[test]
    fn test_ack_response_defaults_to_zero() {
        // Bare 8-byte frame: the ack byte is absent and reads as 0
        let raw = raw_response(Command::SetClock, &[]);
        let decoded = decode(Command::SetClock, &raw).unwrap();

        assert_eq!(decoded.int("ack"), 0);
    }

    #[test]
    fn test_ack_response_nonzero() {
        let raw = raw_response(Command::SetClock, &[4]);
        let decoded = decode(Command::SetClock, &raw).unwrap();

        assert_eq!(decoded.int("ack"), 4);
    }

    #[test]
    fn test_timezone_signed() {
        let raw = raw_response(Command::GetTimezone, &[0xFE]);
        let decoded = decode(Command::GetTimezone, &raw).unwrap();

        assert_eq!(decoded.int("utc_offset_quarters"), -2);
    }

    #[test]
    fn test_lenient_missing_field() {
        let decoded = decode(
            Command::GetClock,
            &raw_response(Command::GetClock, &[0x19, 0x03, 0x0F, 0x0C, 0x22, 0x38]),
        )
        .unwrap();

        assert_eq!(decoded.int("no_such_field"), 0);
        assert_eq!(decoded.text("no_such_field"), "");
        assert!(!decoded.flag("no_such_field"));
        assert_eq!(decoded.ip("no_such_field"), Ipv4Addr::UNSPECIFIED);
    }

    proptest! {
        #[test]
        fn prop_record_count_matches_floor(extra in 0usize..200) {
            // Stream bound: count == floor((len - framing) / 16) and the
            // decoder never reads past the buffer.
            let payload = vec![0xA7u8; extra];
            let raw = raw_response(Command::DownloadAllRecords, &payload);
            let decoded = decode(Command::DownloadAllRecords, &raw).unwrap();

            prop_assert_eq!(decoded.records().len(), (raw.len() - 8) / 16);
        }

        #[test]
        fn prop_flat_decode_never_fails_above_minimum(
            payload in proptest::collection::vec(any::<u8>(), 8..64),
        ) {
            let raw = raw_response(Command::GetBasicConfig, &payload);
            prop_assert!(decode(Command::GetBasicConfig, &raw).is_ok());
        }
    }
}
