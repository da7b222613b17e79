//! Civil UTC timestamps to Julian Day (UT).
//!
//! Uses the proleptic Gregorian calendar throughout (no switch to the Julian
//! calendar before 1582) and ignores leap seconds; UT is taken equal to UTC.

use chrono::{DateTime, Datelike, NaiveDate, Timelike, Utc};
use serde::{Deserialize, Serialize};
use swisseph::swe::julday;

use crate::error::ChartError;

/// Julian Day of the J2000.0 epoch (2000-01-01 12:00).
pub const J2000_JD: f64 = 2_451_545.0;

/// Days per Julian century.
pub const DAYS_PER_CENTURY: f64 = 36_525.0;

// GREG_CAL
const GREGORIAN_CALENDAR: i32 = 1;

/// A UTC calendar timestamp.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UtcTimestamp {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
    pub second: f64,
}

impl UtcTimestamp {
    pub fn new(year: i32, month: u32, day: u32, hour: u32, minute: u32, second: f64) -> Self {
        Self {
            year,
            month,
            day,
            hour,
            minute,
            second,
        }
    }

    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        Self {
            year: dt.year(),
            month: dt.month(),
            day: dt.day(),
            hour: dt.hour(),
            minute: dt.minute(),
            second: dt.second() as f64 + dt.nanosecond() as f64 / 1e9,
        }
    }

    fn validate(&self) -> Result<(), ChartError> {
        if !(1..=12).contains(&self.month) {
            return Err(ChartError::InvalidTimestamp(format!(
                "month {} out of range 1..=12",
                self.month
            )));
        }
        if NaiveDate::from_ymd_opt(self.year, self.month, self.day).is_none() {
            return Err(ChartError::InvalidTimestamp(format!(
                "day {} does not exist in {:04}-{:02}",
                self.day, self.year, self.month
            )));
        }
        if self.hour > 23 {
            return Err(ChartError::InvalidTimestamp(format!(
                "hour {} out of range 0..=23",
                self.hour
            )));
        }
        if self.minute > 59 {
            return Err(ChartError::InvalidTimestamp(format!(
                "minute {} out of range 0..=59",
                self.minute
            )));
        }
        if !self.second.is_finite() || !(0.0..60.0).contains(&self.second) {
            return Err(ChartError::InvalidTimestamp(format!(
                "second {} out of range [0, 60)",
                self.second
            )));
        }
        Ok(())
    }
}

/// A moment on the continuous Julian Day scale (UT).
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JulianDay(f64);

impl JulianDay {
    pub const J2000: JulianDay = JulianDay(J2000_JD);

    /// Convert a UTC calendar timestamp. Fails with `InvalidTimestamp` when a
    /// component is outside its canonical range.
    pub fn from_utc(ts: &UtcTimestamp) -> Result<Self, ChartError> {
        ts.validate()?;
        Ok(Self::from_valid(ts))
    }

    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        // chrono values are always in range
        Self::from_valid(&UtcTimestamp::from_datetime(dt))
    }

    fn from_valid(ts: &UtcTimestamp) -> Self {
        let hour_decimal = ts.hour as f64 + ts.minute as f64 / 60.0 + ts.second / 3_600.0;
        JulianDay(julday(
            ts.year,
            ts.month as i32,
            ts.day as i32,
            hour_decimal,
            GREGORIAN_CALENDAR,
        ))
    }

    pub fn value(self) -> f64 {
        self.0
    }

    /// Julian centuries of UT since J2000.0.
    pub fn centuries_since_j2000(self) -> f64 {
        (self.0 - J2000_JD) / DAYS_PER_CENTURY
    }
}
