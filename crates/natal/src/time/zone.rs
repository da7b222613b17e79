//! Local birth time to UTC.
//!
//! Every birth place is assumed to share one fixed civil offset (by default
//! Japan Standard Time). This is a known approximation: the locality's real
//! zone and any historical daylight saving rules are not consulted.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, Offset, TimeZone, Utc};

use crate::error::ChartError;

pub const DEFAULT_ZONE_LABEL: &str = "Asia/Tokyo";
pub const DEFAULT_UTC_OFFSET_MINUTES: i32 = 9 * 60;

#[derive(Debug, Clone)]
pub struct FixedZone {
    label: String,
    offset: FixedOffset,
}

impl FixedZone {
    pub fn new(label: impl Into<String>, utc_offset_minutes: i32) -> Result<Self, ChartError> {
        let offset = FixedOffset::east_opt(utc_offset_minutes * 60).ok_or_else(|| {
            ChartError::InvalidTimestamp(format!(
                "UTC offset of {utc_offset_minutes} minutes is out of range"
            ))
        })?;
        Ok(Self {
            label: label.into(),
            offset,
        })
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn utc_offset_minutes(&self) -> i32 {
        self.offset.local_minus_utc() / 60
    }

    /// Interpret a local wall-clock date and time in this zone.
    pub fn to_utc(&self, date: NaiveDate, time: NaiveTime) -> Result<DateTime<Utc>, ChartError> {
        let local = date.and_time(time);
        self.offset
            .from_local_datetime(&local)
            .single()
            .map(|dt| dt.with_timezone(&Utc))
            .ok_or_else(|| {
                ChartError::InvalidTimestamp(format!("{local} is not representable in {}", self.label))
            })
    }
}

impl Default for FixedZone {
    fn default() -> Self {
        Self {
            label: DEFAULT_ZONE_LABEL.to_string(),
            offset: FixedOffset::east_opt(DEFAULT_UTC_OFFSET_MINUTES * 60)
                .unwrap_or_else(|| Utc.fix()),
        }
    }
}
