//! Attendance and staff records

use std::fmt;

use crate::datetime::DeviceDateTime;

/// One attendance punch downloaded from a terminal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttendanceRecord {
    /// Enrolled user the punch belongs to
    pub user_id: u16,

    /// Device-local time of the punch
    pub timestamp: DeviceDateTime,

    /// Punch status code (see `attrust_core::constants::punch`)
    pub status: u8,
}

impl fmt::Display for AttendanceRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "user {} at {} (status {})",
            self.user_id, self.timestamp, self.status
        )
    }
}

/// Stored/unread record totals reported by the device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RecordCounts {
    /// Records currently stored
    pub total: u32,

    /// Records not yet downloaded
    pub unread: u32,
}

/// One roster entry in a staff download
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaffRecord {
    pub user_id: u16,

    /// Proximity card number, 0 when no card is assigned
    pub card_number: u32,

    /// 0 = normal user, higher values are admin tiers
    pub admin_level: u8,

    /// Enrolled fingerprint templates
    pub fingerprint_count: u8,

    /// Display name, at most 8 single-byte characters on the wire
    pub name: String,
}

impl StaffRecord {
    /// Wire width of one roster entry
    pub const WIRE_LEN: usize = 16;

    /// Encode for upload: u16 LE user id, u32 LE card number, admin
    /// level, fingerprint count, then the name NUL-padded to 8 bytes
    /// (truncated if longer).
    pub fn to_wire(&self) -> [u8; Self::WIRE_LEN] {
        let mut buf = [0u8; Self::WIRE_LEN];
        buf[0..2].copy_from_slice(&self.user_id.to_le_bytes());
        buf[2..6].copy_from_slice(&self.card_number.to_le_bytes());
        buf[6] = self.admin_level;
        buf[7] = self.fingerprint_count;

        for (dst, ch) in buf[8..16].iter_mut().zip(self.name.bytes()) {
            *dst = ch;
        }

        buf
    }
}

impl fmt::Display for StaffRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{} {}", self.user_id, self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_staff_to_wire() {
        let staff = StaffRecord {
            user_id: 100,
            card_number: 0xAABBCCDD,
            admin_level: 2,
            fingerprint_count: 3,
            name: "LOBO".to_string(),
        };

        let wire = staff.to_wire();
        assert_eq!(&wire[0..2], &100u16.to_le_bytes());
        assert_eq!(&wire[2..6], &0xAABBCCDDu32.to_le_bytes());
        assert_eq!(wire[6], 2);
        assert_eq!(wire[7], 3);
        assert_eq!(&wire[8..12], b"LOBO");
        assert_eq!(&wire[12..16], &[0, 0, 0, 0]);
    }

    #[test]
    fn test_staff_name_truncated() {
        let staff = StaffRecord {
            user_id: 1,
            card_number: 0,
            admin_level: 0,
            fingerprint_count: 0,
            name: "A VERY LONG NAME".to_string(),
        };

        assert_eq!(&staff.to_wire()[8..16], b"A VERY L");
    }

    #[test]
    fn test_attendance_display() {
        let record = AttendanceRecord {
            user_id: 20,
            timestamp: DeviceDateTime::new(2025, 3, 15, 7, 36, 58).unwrap(),
            status: 1,
        };

        assert_eq!(record.to_string(), "user 20 at 2025-03-15 07:36:58 (status 1)");
    }
}
