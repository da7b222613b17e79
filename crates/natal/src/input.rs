//! Free-form message parsing.
//!
//! Birth data arrives as `"YYYY-MM-DD HH:MM, <region>, <locality>"`. Anything
//! that is not the greeting is parsed as birth data and classified on failure.

use chrono::{NaiveDate, NaiveTime};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{ChartError, InputErrorKind};

/// Greeting that asks for usage instructions instead of a chart.
pub const GREETING: &str = "こんにちは";

lazy_static::lazy_static! {
    static ref DATE_RE: Regex = Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}$").expect("Invalid regex");
    static ref TIME_RE: Regex = Regex::new(r"^[0-9]{2}:[0-9]{2}$").expect("Invalid regex");
}

/// Birth date, local wall-clock time and place names, as sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BirthInput {
    pub date: NaiveDate,
    pub time: NaiveTime,
    /// Prefecture or state, e.g. `東京都`
    pub region: String,
    /// City or ward, e.g. `港区`
    pub locality: String,
}

/// A classified incoming message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    Greeting,
    Birth(BirthInput),
}

/// Classify a message: the greeting, or birth data.
pub fn parse_message(text: &str) -> Result<Message, ChartError> {
    if is_greeting(text) {
        return Ok(Message::Greeting);
    }
    parse_birth_input(text).map(Message::Birth)
}

pub fn is_greeting(text: &str) -> bool {
    text.trim().to_lowercase() == GREETING
}

/// Parse `"<date> <time>, <region>, <locality>"`.
///
/// A wrong number of fields, or a first field that is not exactly a date and a
/// time, is `WrongShape`. A date or time that does not match `YYYY-MM-DD` /
/// `HH:MM` or names an impossible value is `InvalidDateTime`.
pub fn parse_birth_input(text: &str) -> Result<BirthInput, ChartError> {
    let fields: Vec<&str> = text.trim().split(',').map(str::trim).collect();
    let [moment, region, locality] = fields.as_slice() else {
        return Err(ChartError::malformed(
            InputErrorKind::WrongShape,
            format!("expected 3 comma-separated fields, got {}", fields.len()),
        ));
    };
    if region.is_empty() || locality.is_empty() {
        return Err(ChartError::malformed(
            InputErrorKind::WrongShape,
            "region and locality must not be empty",
        ));
    }

    let parts: Vec<&str> = moment.split_whitespace().collect();
    let [date, time] = parts.as_slice() else {
        return Err(ChartError::malformed(
            InputErrorKind::WrongShape,
            format!("expected \"<date> <time>\", got {moment:?}"),
        ));
    };

    Ok(BirthInput {
        date: parse_date(date)?,
        time: parse_time(time)?,
        region: region.to_string(),
        locality: locality.to_string(),
    })
}

fn parse_date(text: &str) -> Result<NaiveDate, ChartError> {
    if !DATE_RE.is_match(text) {
        return Err(ChartError::malformed(
            InputErrorKind::InvalidDateTime,
            format!("date {text:?} is not YYYY-MM-DD"),
        ));
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d").map_err(|e| {
        ChartError::malformed(
            InputErrorKind::InvalidDateTime,
            format!("date {text:?}: {e}"),
        )
    })
}

fn parse_time(text: &str) -> Result<NaiveTime, ChartError> {
    if !TIME_RE.is_match(text) {
        return Err(ChartError::malformed(
            InputErrorKind::InvalidDateTime,
            format!("time {text:?} is not HH:MM"),
        ));
    }
    NaiveTime::parse_from_str(text, "%H:%M").map_err(|e| {
        ChartError::malformed(
            InputErrorKind::InvalidDateTime,
            format!("time {text:?}: {e}"),
        )
    })
}
