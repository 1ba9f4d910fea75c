//! High-level device interface

use std::time::Duration;

use bytes::{BufMut, Bytes, BytesMut};
use tracing::{debug, info, trace, warn};

use attrust_core::{
    ChecksumPolicy, Command, DecodedResponse, FieldMap, Frame, catalog,
    constants::DEFAULT_DEVICE_ID, frame, response,
};
use attrust_transport::{TcpTransport, Transport};
use attrust_types::{
    AdvancedConfig, AttendanceRecord, BasicConfig, BellSlot, DaylightSaving, DeviceDateTime,
    NetConfig, RecordCounts, StaffRecord,
};

use crate::error::{Error, Result};

/// AT-series terminal
///
/// High-level interface: one async method per protocol command, each a
/// composition of encode, send, receive and decode. Methods take
/// `&mut self`, which keeps the protocol's one-request-in-flight rule a
/// compile-time property.
///
/// # Examples
///
/// ```no_run
/// use attrust::Device;
///
/// #[tokio::main]
/// async fn main() -> attrust::Result<()> {
///     let mut device = Device::new("192.168.1.201", 5010).with_device_id(5);
///
///     device.connect().await?;
///     let counts = device.get_record_count().await?;
///     println!("{} stored, {} unread", counts.total, counts.unread);
///     device.disconnect().await?;
///     Ok(())
/// }
/// ```
pub struct Device {
    transport: Box<dyn Transport>,
    device_id: u32,
    timeout: Duration,
    checksum_policy: ChecksumPolicy,
}

impl Device {
    /// Create a new device handle (TCP transport)
    pub fn new(ip: impl Into<String>, port: u16) -> Self {
        Self::with_transport(Box::new(TcpTransport::new(ip, port)))
    }

    /// Create a device handle over a caller-supplied transport
    pub fn with_transport(transport: Box<dyn Transport>) -> Self {
        Self {
            transport,
            device_id: DEFAULT_DEVICE_ID,
            timeout: Duration::from_secs(5),
            checksum_policy: ChecksumPolicy::default(),
        }
    }

    /// Set the device identifier sent in every frame (default: 5)
    pub fn with_device_id(mut self, device_id: u32) -> Self {
        self.device_id = device_id;
        self
    }

    /// Set command timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Reject responses whose checksum does not recompute
    ///
    /// Off by default: deployed terminals are known to emit frames with
    /// stale checksums and the protocol does not require rejection.
    pub fn with_strict_checksums(mut self) -> Self {
        self.checksum_policy = ChecksumPolicy::Enforce;
        self
    }

    /// Device identifier used for this connection
    pub fn device_id(&self) -> u32 {
        self.device_id
    }

    /// Check if connected
    pub fn is_connected(&self) -> bool {
        self.transport.is_connected()
    }

    /// Connect to the device
    ///
    /// The protocol has no handshake: the connection is usable as soon
    /// as the socket is open.
    pub async fn connect(&mut self) -> Result<()> {
        info!("Connecting to {}...", self.transport.remote_addr());
        self.transport.connect().await?;
        info!("Connected (device_id={})", self.device_id);
        Ok(())
    }

    /// Disconnect from the device
    pub async fn disconnect(&mut self) -> Result<()> {
        if !self.is_connected() {
            return Ok(());
        }

        info!("Disconnecting from {}...", self.transport.remote_addr());
        self.transport.disconnect().await?;
        info!("Disconnected");
        Ok(())
    }

    // Clock

    /// Read the device clock
    pub async fn get_clock(&mut self) -> Result<DeviceDateTime> {
        debug!("Reading device clock...");
        let decoded = self.exchange(Command::GetClock, Bytes::new()).await?;
        Ok(datetime_from_fields(decoded.fields()))
    }

    /// Set the device clock
    pub async fn set_clock(&mut self, clock: &DeviceDateTime) -> Result<()> {
        debug!("Setting device clock to {}...", clock);
        self.command_ack(Command::SetClock, Bytes::copy_from_slice(&clock.to_wire()))
            .await
    }

    // Configuration

    /// Read the basic configuration block
    pub async fn get_basic_config(&mut self) -> Result<BasicConfig> {
        let decoded = self.exchange(Command::GetBasicConfig, Bytes::new()).await?;
        Ok(BasicConfig {
            sleep_minutes: decoded.int("sleep_minutes") as u8,
            volume: decoded.int("volume") as u8,
            language: decoded.int("language") as u8,
            datetime_format: decoded.int("datetime_format") as u8,
            attendance_state: decoded.int("attendance_state") as u8,
            anti_passback: decoded.flag("anti_passback"),
            firmware_lock: decoded.flag("firmware_lock"),
            wiegand_format: decoded.int("wiegand_format") as u8,
        })
    }

    /// Write the basic configuration block
    pub async fn set_basic_config(&mut self, config: &BasicConfig) -> Result<()> {
        self.command_ack(
            Command::SetBasicConfig,
            Bytes::copy_from_slice(&config.to_wire()),
        )
        .await
    }

    /// Read the advanced configuration block
    pub async fn get_advanced_config(&mut self) -> Result<AdvancedConfig> {
        let decoded = self
            .exchange(Command::GetAdvancedConfig, Bytes::new())
            .await?;
        Ok(AdvancedConfig {
            fp_precision: decoded.int("fp_precision") as u8,
            repeat_punch_interval: decoded.int("repeat_punch_interval") as u8,
            door_relay_seconds: decoded.int("door_relay_seconds") as u8,
            alarm_relay_seconds: decoded.int("alarm_relay_seconds") as u8,
            verify_mode: decoded.int("verify_mode") as u8,
            clock_adjust: decoded.int("clock_adjust") as i8,
            realtime_events: decoded.flag("realtime_events"),
            work_code: decoded.flag("work_code"),
        })
    }

    /// Write the advanced configuration block
    pub async fn set_advanced_config(&mut self, config: &AdvancedConfig) -> Result<()> {
        self.command_ack(
            Command::SetAdvancedConfig,
            Bytes::copy_from_slice(&config.to_wire()),
        )
        .await
    }

    // Identity

    /// Read the device serial number
    pub async fn get_serial_number(&mut self) -> Result<String> {
        let decoded = self.exchange(Command::GetSerialNumber, Bytes::new()).await?;
        Ok(decoded.text("serial_number").to_string())
    }

    /// Read the device identifier stored in the terminal
    pub async fn get_device_id(&mut self) -> Result<u32> {
        let decoded = self.exchange(Command::GetDeviceId, Bytes::new()).await?;
        Ok(decoded.int("device_id") as u32)
    }

    /// Assign a new device identifier
    ///
    /// Takes effect on the device immediately; this handle keeps using
    /// its configured identifier until rebuilt.
    pub async fn set_device_id(&mut self, device_id: u32) -> Result<()> {
        let mut payload = BytesMut::with_capacity(4);
        payload.put_u32_le(device_id);
        self.command_ack(Command::SetDeviceId, payload.freeze()).await
    }

    // Network

    /// Read the TCP/IP parameter block
    pub async fn get_net_config(&mut self) -> Result<NetConfig> {
        let decoded = self.exchange(Command::GetNetConfig, Bytes::new()).await?;
        Ok(NetConfig {
            ip: decoded.ip("ip"),
            netmask: decoded.ip("netmask"),
            gateway: decoded.ip("gateway"),
            port: decoded.int("port") as u16,
            dhcp: decoded.flag("dhcp"),
        })
    }

    /// Write the TCP/IP parameter block
    pub async fn set_net_config(&mut self, config: &NetConfig) -> Result<()> {
        self.command_ack(
            Command::SetNetConfig,
            Bytes::copy_from_slice(&config.to_wire()),
        )
        .await
    }

    // Attendance records

    /// Stored/unread record totals
    pub async fn get_record_count(&mut self) -> Result<RecordCounts> {
        let decoded = self.exchange(Command::GetRecordCount, Bytes::new()).await?;
        Ok(RecordCounts {
            total: decoded.int("total") as u32,
            unread: decoded.int("unread") as u32,
        })
    }

    /// Download every stored attendance record
    pub async fn download_all_records(&mut self) -> Result<Vec<AttendanceRecord>> {
        debug!("Downloading all attendance records...");
        let decoded = self
            .exchange(Command::DownloadAllRecords, Bytes::new())
            .await?;
        Ok(attendance_from_response(&decoded))
    }

    /// Download records not yet marked as read
    pub async fn download_new_records(&mut self) -> Result<Vec<AttendanceRecord>> {
        debug!("Downloading new attendance records...");
        let decoded = self
            .exchange(Command::DownloadNewRecords, Bytes::new())
            .await?;
        Ok(attendance_from_response(&decoded))
    }

    /// Erase all stored attendance records
    pub async fn clear_records(&mut self) -> Result<()> {
        warn!("Clearing attendance records...");
        self.command_ack(Command::ClearRecords, Bytes::new()).await
    }

    /// Delete one record by storage index
    pub async fn delete_record(&mut self, index: u32) -> Result<()> {
        let mut payload = BytesMut::with_capacity(4);
        payload.put_u32_le(index);
        self.command_ack(Command::DeleteRecord, payload.freeze()).await
    }

    // Staff roster

    /// Download the staff roster
    pub async fn download_staff(&mut self) -> Result<Vec<StaffRecord>> {
        debug!("Downloading staff roster...");
        let decoded = self.exchange(Command::DownloadStaff, Bytes::new()).await?;
        Ok(decoded
            .records()
            .iter()
            .map(|fields| StaffRecord {
                user_id: fields.int("user_id") as u16,
                card_number: fields.int("card_number") as u32,
                admin_level: fields.int("admin_level") as u8,
                fingerprint_count: fields.int("fingerprint_count") as u8,
                name: fields.text("name").to_string(),
            })
            .collect())
    }

    /// Upload one roster entry
    pub async fn upload_staff(&mut self, staff: &StaffRecord) -> Result<()> {
        debug!("Uploading staff entry {}...", staff);
        self.command_ack(Command::UploadStaff, Bytes::copy_from_slice(&staff.to_wire()))
            .await
    }

    /// Delete an enrolled user
    pub async fn delete_user(&mut self, user_id: u16) -> Result<()> {
        let mut payload = BytesMut::with_capacity(2);
        payload.put_u16_le(user_id);
        self.command_ack(Command::DeleteUser, payload.freeze()).await
    }

    // Enrollment

    /// Start fingerprint enrollment for a user and finger index
    ///
    /// The terminal runs the capture dialog itself; template data never
    /// crosses this protocol.
    pub async fn enroll_fingerprint(&mut self, user_id: u16, finger: u8) -> Result<()> {
        let mut payload = BytesMut::with_capacity(3);
        payload.put_u16_le(user_id);
        payload.put_u8(finger);
        self.command_ack(Command::EnrollFingerprint, payload.freeze())
            .await
    }

    /// Enroll a proximity card for a user, returning the card number
    /// the terminal captured
    pub async fn enroll_card(&mut self, user_id: u16) -> Result<u32> {
        let mut payload = BytesMut::with_capacity(2);
        payload.put_u16_le(user_id);
        let decoded = self.exchange(Command::EnrollCard, payload.freeze()).await?;
        Ok(decoded.int("card_number") as u32)
    }

    // Schedules

    /// Read the bell schedule
    pub async fn get_bell_schedule(&mut self) -> Result<Vec<BellSlot>> {
        let decoded = self.exchange(Command::GetBellSchedule, Bytes::new()).await?;
        Ok(decoded
            .records()
            .iter()
            .map(|fields| BellSlot {
                hour: fields.int("hour") as u8,
                minute: fields.int("minute") as u8,
                enabled: fields.flag("enabled"),
            })
            .collect())
    }

    /// Write the bell schedule
    pub async fn set_bell_schedule(&mut self, slots: &[BellSlot]) -> Result<()> {
        let mut payload = BytesMut::with_capacity(slots.len() * BellSlot::WIRE_LEN);
        for slot in slots {
            payload.put_slice(&slot.to_wire());
        }
        self.command_ack(Command::SetBellSchedule, payload.freeze())
            .await
    }

    /// Read the UTC offset, in quarter hours
    pub async fn get_timezone(&mut self) -> Result<i8> {
        let decoded = self.exchange(Command::GetTimezone, Bytes::new()).await?;
        Ok(decoded.int("utc_offset_quarters") as i8)
    }

    /// Set the UTC offset, in quarter hours
    pub async fn set_timezone(&mut self, utc_offset_quarters: i8) -> Result<()> {
        self.command_ack(
            Command::SetTimezone,
            Bytes::copy_from_slice(&[utc_offset_quarters as u8]),
        )
        .await
    }

    /// Read the daylight-saving rule
    pub async fn get_daylight_saving(&mut self) -> Result<DaylightSaving> {
        let decoded = self
            .exchange(Command::GetDaylightSaving, Bytes::new())
            .await?;
        Ok(DaylightSaving {
            enabled: decoded.flag("enabled"),
            start_month: decoded.int("start_month") as u8,
            start_day: decoded.int("start_day") as u8,
            start_hour: decoded.int("start_hour") as u8,
            end_month: decoded.int("end_month") as u8,
            end_day: decoded.int("end_day") as u8,
            end_hour: decoded.int("end_hour") as u8,
        })
    }

    /// Write the daylight-saving rule
    pub async fn set_daylight_saving(&mut self, rule: &DaylightSaving) -> Result<()> {
        self.command_ack(
            Command::SetDaylightSaving,
            Bytes::copy_from_slice(&rule.to_wire()),
        )
        .await
    }

    // Device control

    /// Release the door relay
    pub async fn open_door(&mut self) -> Result<()> {
        debug!("Opening door...");
        self.command_ack(Command::OpenDoor, Bytes::new()).await
    }

    /// Keep-alive probe
    pub async fn ping(&mut self) -> Result<()> {
        self.command_ack(Command::Ping, Bytes::new()).await
    }

    /// Configure the device-initiated ping interval, in minutes (0 = off)
    pub async fn set_ping_interval(&mut self, minutes: u8) -> Result<()> {
        self.command_ack(Command::SetPingInterval, Bytes::copy_from_slice(&[minutes]))
            .await
    }

    /// Reboot the device
    ///
    /// Fire-and-forget: the device drops the connection instead of
    /// replying, so this also closes the transport.
    pub async fn reboot(&mut self) -> Result<()> {
        self.ensure_connected()?;
        warn!("Rebooting device...");

        let frame = Frame::new(self.device_id, Command::Reboot);
        self.transport.send(&frame.encode()).await?;
        self.transport.disconnect().await?;
        Ok(())
    }

    /// Restore factory defaults
    pub async fn factory_reset(&mut self) -> Result<()> {
        warn!("Factory-resetting device...");
        self.command_ack(Command::FactoryReset, Bytes::new()).await
    }

    // Helper methods

    fn ensure_connected(&self) -> Result<()> {
        if !self.is_connected() {
            return Err(Error::NotConnected);
        }
        Ok(())
    }

    /// One full command round trip: encode, send, receive at least the
    /// command's declared minimum, validate framing, decode per catalog.
    async fn exchange(&mut self, command: Command, payload: Bytes) -> Result<DecodedResponse> {
        self.ensure_connected()?;

        let request = Frame::with_payload(self.device_id, command, payload);
        trace!("Sending: {:?}", request);
        self.transport.send(&request.encode()).await?;

        let spec = catalog::spec(command);
        let raw = self
            .transport
            .receive_at_least(spec.min_response_len, self.timeout)
            .await?;

        let view = frame::split(&raw)?;
        if view.device_id != self.device_id {
            debug!(
                ours = self.device_id,
                theirs = view.device_id,
                "Response device id differs"
            );
        }
        if self.checksum_policy == ChecksumPolicy::Enforce && !view.checksum_matches() {
            return Err(attrust_core::Error::ChecksumMismatch {
                computed: view.computed_checksum(),
                received: view.checksum,
            }
            .into());
        }

        let decoded = response::decode(command, &raw)?;
        trace!("Received: {:?}", decoded);
        Ok(decoded)
    }

    /// Round trip for set-style commands: non-zero status byte is a NAK
    async fn command_ack(&mut self, command: Command, payload: Bytes) -> Result<()> {
        let decoded = self.exchange(command, payload).await?;

        let status = decoded.int("ack") as u8;
        if status != 0 {
            return Err(Error::DeviceNak { command, status });
        }
        Ok(())
    }
}

/// Attendance timestamps come off the wire unvalidated; the device owns
/// them and the download must not drop records with odd values.
fn datetime_from_fields(fields: &FieldMap) -> DeviceDateTime {
    DeviceDateTime {
        year: fields.int("year") as u16,
        month: fields.int("month") as u8,
        day: fields.int("day") as u8,
        hour: fields.int("hour") as u8,
        minute: fields.int("minute") as u8,
        second: fields.int("second") as u8,
    }
}

fn attendance_from_response(decoded: &DecodedResponse) -> Vec<AttendanceRecord> {
    decoded
        .records()
        .iter()
        .map(|fields| AttendanceRecord {
            user_id: fields.int("user_id") as u16,
            timestamp: datetime_from_fields(fields),
            status: fields.int("status") as u8,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use pretty_assertions::assert_eq;

    /// In-memory transport: canned responses out, sent frames captured.
    struct MockTransport {
        connected: bool,
        responses: VecDeque<Vec<u8>>,
        sent: Arc<Mutex<Vec<Vec<u8>>>>,
    }

    impl MockTransport {
        fn new(responses: Vec<Vec<u8>>) -> (Self, Arc<Mutex<Vec<Vec<u8>>>>) {
            let sent = Arc::new(Mutex::new(Vec::new()));
            (
                Self {
                    connected: false,
                    responses: responses.into(),
                    sent: Arc::clone(&sent),
                },
                sent,
            )
        }
    }

    #[async_trait]
    impl Transport for MockTransport {
        async fn connect(&mut self) -> attrust_transport::Result<()> {
            self.connected = true;
            Ok(())
        }

        async fn disconnect(&mut self) -> attrust_transport::Result<()> {
            self.connected = false;
            Ok(())
        }

        fn is_connected(&self) -> bool {
            self.connected
        }

        async fn send(&mut self, data: &[u8]) -> attrust_transport::Result<()> {
            self.sent.lock().unwrap().push(data.to_vec());
            Ok(())
        }

        async fn receive_at_least(
            &mut self,
            min_len: usize,
            _timeout: Duration,
        ) -> attrust_transport::Result<BytesMut> {
            match self.responses.pop_front() {
                Some(bytes) => Ok(BytesMut::from(&bytes[..])),
                None => Err(attrust_transport::Error::ReadTimeout {
                    buffered: 0,
                    needed: min_len,
                }),
            }
        }

        fn remote_addr(&self) -> String {
            "mock".to_string()
        }
    }

    fn mock_device(responses: Vec<Vec<u8>>) -> (Device, Arc<Mutex<Vec<Vec<u8>>>>) {
        let (transport, sent) = MockTransport::new(responses);
        (Device::with_transport(Box::new(transport)), sent)
    }

    fn response_frame(command: Command, payload: &[u8]) -> Vec<u8> {
        Frame::with_payload(5, command, payload.to_vec())
            .encode()
            .to_vec()
    }

    #[test]
    fn test_device_create() {
        let (device, _) = mock_device(vec![]);
        assert!(!device.is_connected());
        assert_eq!(device.device_id(), 5);
    }

    #[tokio::test]
    async fn test_not_connected_rejected() {
        let (mut device, _) = mock_device(vec![]);
        let result = device.get_clock().await;
        assert!(matches!(result, Err(Error::NotConnected)));
    }

    #[tokio::test]
    async fn test_get_clock() {
        // Golden frame: device 5, 2025-03-15 12:34:56
        let canned = vec![
            0xA5, 0x05, 0x00, 0x00, 0x00, 0x38, 0x19, 0x03, 0x0F, 0x0C, 0x22, 0x38, 0x32, 0x87,
        ];
        let (mut device, sent) = mock_device(vec![canned]);
        device.connect().await.unwrap();

        let clock = device.get_clock().await.unwrap();
        assert_eq!(clock, DeviceDateTime::new(2025, 3, 15, 12, 34, 56).unwrap());

        // Request frame is the documented empty-payload clock read
        let sent = sent.lock().unwrap();
        assert_eq!(
            sent[0],
            vec![0xA5, 0x05, 0x00, 0x00, 0x00, 0x38, 0xE9, 0xD2]
        );
    }

    #[tokio::test]
    async fn test_set_clock_round_trip() {
        let (mut device, sent) = mock_device(vec![response_frame(Command::SetClock, &[0])]);
        device.connect().await.unwrap();

        let clock = DeviceDateTime::new(2025, 3, 15, 12, 34, 56).unwrap();
        device.set_clock(&clock).await.unwrap();

        let sent = sent.lock().unwrap();
        // Payload carries the six clock bytes
        assert_eq!(&sent[0][6..12], &[0x19, 0x03, 0x0F, 0x0C, 0x22, 0x38]);
    }

    #[tokio::test]
    async fn test_device_nak() {
        let (mut device, _) = mock_device(vec![response_frame(Command::SetClock, &[4])]);
        device.connect().await.unwrap();

        let clock = DeviceDateTime::new(2025, 1, 1, 0, 0, 0).unwrap();
        let result = device.set_clock(&clock).await;

        assert!(matches!(
            result,
            Err(Error::DeviceNak {
                command: Command::SetClock,
                status: 4
            })
        ));
    }

    #[tokio::test]
    async fn test_ack_absent_is_success() {
        // Bare 8-byte frame: lenient decode reads ack as 0
        let (mut device, _) = mock_device(vec![response_frame(Command::OpenDoor, &[])]);
        device.connect().await.unwrap();

        device.open_door().await.unwrap();
    }

    #[tokio::test]
    async fn test_download_all_records() {
        let mut payload = Vec::new();
        payload.extend_from_slice(&[
            0x14, 0x00, 0, 0, 0, 0, 0x19, 0x03, 0x0F, 0x07, 0x24, 0x3A, 0x01, 0, 0, 0,
        ]);
        payload.extend_from_slice(&[
            0x41, 0x00, 0, 0, 0, 0, 0x19, 0x03, 0x0F, 0x08, 0x0F, 0x17, 0x00, 0, 0, 0,
        ]);
        let (mut device, _) =
            mock_device(vec![response_frame(Command::DownloadAllRecords, &payload)]);
        device.connect().await.unwrap();

        let records = device.download_all_records().await.unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].user_id, 20);
        assert_eq!(
            records[0].timestamp,
            DeviceDateTime::new(2025, 3, 15, 7, 36, 58).unwrap()
        );
        assert_eq!(records[0].status, 1);
        assert_eq!(records[1].user_id, 65);
        assert_eq!(records[1].status, 0);
    }

    #[tokio::test]
    async fn test_download_records_empty() {
        let (mut device, _) =
            mock_device(vec![response_frame(Command::DownloadNewRecords, &[])]);
        device.connect().await.unwrap();

        let records = device.download_new_records().await.unwrap();
        assert!(records.is_empty());
    }

    #[tokio::test]
    async fn test_get_net_config() {
        let mut payload = vec![192, 168, 1, 100, 255, 255, 255, 0, 192, 168, 1, 1];
        payload.extend_from_slice(&5010u16.to_le_bytes());
        payload.push(0);

        let (mut device, _) = mock_device(vec![response_frame(Command::GetNetConfig, &payload)]);
        device.connect().await.unwrap();

        let config = device.get_net_config().await.unwrap();
        assert_eq!(config.ip.to_string(), "192.168.1.100");
        assert_eq!(config.port, 5010);
        assert!(!config.dhcp);
    }

    #[tokio::test]
    async fn test_get_serial_number() {
        let (mut device, _) = mock_device(vec![response_frame(
            Command::GetSerialNumber,
            b"AT5-00123456\x00\x00\x00\x00",
        )]);
        device.connect().await.unwrap();

        assert_eq!(device.get_serial_number().await.unwrap(), "AT5-00123456");
    }

    #[tokio::test]
    async fn test_get_record_count() {
        let mut payload = Vec::new();
        payload.extend_from_slice(&1234u32.to_le_bytes());
        payload.extend_from_slice(&17u32.to_le_bytes());

        let (mut device, _) = mock_device(vec![response_frame(Command::GetRecordCount, &payload)]);
        device.connect().await.unwrap();

        let counts = device.get_record_count().await.unwrap();
        assert_eq!(counts.total, 1234);
        assert_eq!(counts.unread, 17);
    }

    #[tokio::test]
    async fn test_get_timezone_negative() {
        let (mut device, _) = mock_device(vec![response_frame(Command::GetTimezone, &[0xFE])]);
        device.connect().await.unwrap();

        assert_eq!(device.get_timezone().await.unwrap(), -2);
    }

    #[tokio::test]
    async fn test_bell_schedule_round_trip() {
        let (mut device, sent) = mock_device(vec![
            response_frame(Command::GetBellSchedule, &[7, 30, 1, 12, 0, 0]),
            response_frame(Command::SetBellSchedule, &[0]),
        ]);
        device.connect().await.unwrap();

        let schedule = device.get_bell_schedule().await.unwrap();
        assert_eq!(schedule.len(), 2);
        assert_eq!(schedule[0].hour, 7);
        assert!(schedule[0].enabled);
        assert!(!schedule[1].enabled);

        device.set_bell_schedule(&schedule).await.unwrap();
        let sent = sent.lock().unwrap();
        assert_eq!(&sent[1][6..12], &[7, 30, 1, 12, 0, 0]);
    }

    #[tokio::test]
    async fn test_strict_checksum_rejects_corrupt_frame() {
        let mut canned = response_frame(Command::GetClock, &[0x19, 0x03, 0x0F, 0x0C, 0x22, 0x38]);
        let n = canned.len();
        canned[n - 1] ^= 0xFF;

        let (transport, _) = MockTransport::new(vec![canned]);
        let mut device = Device::with_transport(Box::new(transport)).with_strict_checksums();
        device.connect().await.unwrap();

        let result = device.get_clock().await;
        assert!(matches!(
            result,
            Err(Error::Protocol(attrust_core::Error::ChecksumMismatch { .. }))
        ));
    }

    #[tokio::test]
    async fn test_tolerant_mode_accepts_corrupt_checksum() {
        let mut canned = response_frame(Command::GetClock, &[0x19, 0x03, 0x0F, 0x0C, 0x22, 0x38]);
        let n = canned.len();
        canned[n - 1] ^= 0xFF;

        let (mut device, _) = mock_device(vec![canned]);
        device.connect().await.unwrap();

        let clock = device.get_clock().await.unwrap();
        assert_eq!(clock.year, 2025);
    }

    #[tokio::test]
    async fn test_incomplete_response_surfaces() {
        // 11 bytes < GetClock's declared minimum of 14
        let short = response_frame(Command::GetClock, &[0x19, 0x03, 0x0F]);
        let (mut device, _) = mock_device(vec![short]);
        device.connect().await.unwrap();

        let result = device.get_clock().await;
        assert!(matches!(
            result,
            Err(Error::Protocol(attrust_core::Error::IncompleteResponse { .. }))
        ));
    }

    #[tokio::test]
    async fn test_reboot_sends_and_disconnects() {
        let (mut device, sent) = mock_device(vec![]);
        device.connect().await.unwrap();

        device.reboot().await.unwrap();

        assert!(!device.is_connected());
        let sent = sent.lock().unwrap();
        assert_eq!(sent[0][5], Command::Reboot.code());
    }

    #[tokio::test]
    async fn test_upload_staff_payload() {
        let (mut device, sent) = mock_device(vec![response_frame(Command::UploadStaff, &[0])]);
        device.connect().await.unwrap();

        let staff = StaffRecord {
            user_id: 100,
            card_number: 0,
            admin_level: 0,
            fingerprint_count: 1,
            name: "ANA".to_string(),
        };
        device.upload_staff(&staff).await.unwrap();

        let sent = sent.lock().unwrap();
        assert_eq!(sent[0].len(), 8 + StaffRecord::WIRE_LEN);
        assert_eq!(&sent[0][6..8], &100u16.to_le_bytes());
        assert_eq!(&sent[0][14..17], b"ANA");
    }
}
