use std::fmt;
use thiserror::Error;

use crate::ephemeris::ChartPoint;

/// How a malformed message failed to parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputErrorKind {
    /// Wrong number of comma-separated fields, or a missing date/time pair.
    WrongShape,
    /// Fields are present but the date or time is not a valid `YYYY-MM-DD HH:MM`.
    InvalidDateTime,
}

impl fmt::Display for InputErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputErrorKind::WrongShape => write!(f, "wrong shape"),
            InputErrorKind::InvalidDateTime => write!(f, "wrong date/time syntax"),
        }
    }
}

/// Errors that can occur while turning a message into a natal chart
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ChartError {
    #[error("Malformed input ({kind}): {detail}")]
    MalformedInput { kind: InputErrorKind, detail: String },
    #[error("No coordinates found for {locality}, {region}")]
    GeocodeNotFound { region: String, locality: String },
    #[error("Geocoding service unavailable: {0}")]
    GeocoderUnavailable(String),
    #[error("Coordinate out of range: lat={lat}, lon={lon}")]
    InvalidCoordinate { lat: f64, lon: f64 },
    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),
    #[error("Ephemeris unavailable: {0}")]
    EphemerisUnavailable(String),
    #[error("Calculation failed: {0}")]
    CalculationError(String),
    #[error("Chart is incomplete: missing {missing:?}, duplicated {duplicated:?}")]
    IncompleteChart {
        missing: Vec<ChartPoint>,
        duplicated: Vec<ChartPoint>,
    },
}

impl ChartError {
    pub fn malformed(kind: InputErrorKind, detail: impl Into<String>) -> Self {
        ChartError::MalformedInput {
            kind,
            detail: detail.into(),
        }
    }

    /// True when the person who sent the message can fix the problem by
    /// resending different input.
    pub fn is_user_correctable(&self) -> bool {
        matches!(
            self,
            ChartError::MalformedInput { .. } | ChartError::GeocodeNotFound { .. }
        )
    }

    /// Parse failure classification, if this is a `MalformedInput`.
    pub fn input_kind(&self) -> Option<InputErrorKind> {
        match self {
            ChartError::MalformedInput { kind, .. } => Some(*kind),
            _ => None,
        }
    }
}
