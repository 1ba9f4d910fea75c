//! Device clock representation
//!
//! The terminals store time as six bytes: a year offset from 2000 and one
//! byte each for month, day, hour, minute, second. Only 2000-2099 is
//! representable on the wire.

use std::fmt;

use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};

use crate::error::{Error, Result};

/// A date/time as the device represents it
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DeviceDateTime {
    pub year: u16,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

impl DeviceDateTime {
    /// Create a validated date/time
    ///
    /// # Errors
    ///
    /// Returns a validation error for years outside 2000-2099 or
    /// out-of-range calendar/clock components.
    pub fn new(year: u16, month: u8, day: u8, hour: u8, minute: u8, second: u8) -> Result<Self> {
        if !(2000..=2099).contains(&year) {
            return Err(Error::Validation(format!(
                "year {year} not representable (2000-2099)"
            )));
        }
        if NaiveDate::from_ymd_opt(year as i32, month as u32, day as u32).is_none() {
            return Err(Error::Validation(format!(
                "invalid calendar date {year}-{month:02}-{day:02}"
            )));
        }
        if hour > 23 || minute > 59 || second > 59 {
            return Err(Error::Validation(format!(
                "invalid time {hour:02}:{minute:02}:{second:02}"
            )));
        }

        Ok(Self {
            year,
            month,
            day,
            hour,
            minute,
            second,
        })
    }

    /// Wire encoding: year offset then month/day/hour/minute/second
    pub fn to_wire(&self) -> [u8; 6] {
        [
            self.year.saturating_sub(2000) as u8,
            self.month,
            self.day,
            self.hour,
            self.minute,
            self.second,
        ]
    }

    /// Convert to a chrono timestamp
    ///
    /// `None` when the device reported an impossible date (the wire
    /// format cannot rule those out).
    pub fn to_naive(&self) -> Option<NaiveDateTime> {
        NaiveDate::from_ymd_opt(self.year as i32, self.month as u32, self.day as u32)?
            .and_hms_opt(self.hour as u32, self.minute as u32, self.second as u32)
    }

    /// Build from a chrono timestamp
    ///
    /// # Errors
    ///
    /// Validation error when the timestamp falls outside 2000-2099.
    pub fn from_naive(dt: NaiveDateTime) -> Result<Self> {
        let year = dt.year();
        if !(2000..=2099).contains(&year) {
            return Err(Error::Validation(format!(
                "year {year} not representable (2000-2099)"
            )));
        }

        Ok(Self {
            year: year as u16,
            month: dt.month() as u8,
            day: dt.day() as u8,
            hour: dt.hour() as u8,
            minute: dt.minute() as u8,
            second: dt.second() as u8,
        })
    }
}

impl fmt::Display for DeviceDateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
            self.year, self.month, self.day, self.hour, self.minute, self.second
        )
    }
}
