use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ChartError;

/// Geographic location coordinates (east longitude positive)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoCoordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoCoordinate {
    /// Creates a validated coordinate.
    ///
    /// Returns `Err(ChartError::InvalidCoordinate)` if either value is not finite
    /// or is out of range.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, ChartError> {
        let coordinate = Self {
            latitude,
            longitude,
        };
        coordinate.validate()?;
        Ok(coordinate)
    }

    pub fn validate(&self) -> Result<(), ChartError> {
        let lat_ok = self.latitude.is_finite() && (-90.0..=90.0).contains(&self.latitude);
        let lon_ok = self.longitude.is_finite() && (-180.0..=180.0).contains(&self.longitude);
        if lat_ok && lon_ok {
            Ok(())
        } else {
            Err(ChartError::InvalidCoordinate {
                lat: self.latitude,
                lon: self.longitude,
            })
        }
    }
}

/// The ten classical bodies plus the two angles of a natal chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartPoint {
    Sun,
    Moon,
    Mercury,
    Venus,
    Mars,
    Jupiter,
    Saturn,
    Uranus,
    Neptune,
    Pluto,
    #[serde(rename = "asc")]
    Ascendant,
    #[serde(rename = "mc")]
    Midheaven,
}

impl ChartPoint {
    pub const BODIES: [ChartPoint; 10] = [
        ChartPoint::Sun,
        ChartPoint::Moon,
        ChartPoint::Mercury,
        ChartPoint::Venus,
        ChartPoint::Mars,
        ChartPoint::Jupiter,
        ChartPoint::Saturn,
        ChartPoint::Uranus,
        ChartPoint::Neptune,
        ChartPoint::Pluto,
    ];

    pub const ANGLES: [ChartPoint; 2] = [ChartPoint::Ascendant, ChartPoint::Midheaven];

    /// Chart order: bodies first, then Ascendant and Midheaven.
    pub const ALL: [ChartPoint; 12] = [
        ChartPoint::Sun,
        ChartPoint::Moon,
        ChartPoint::Mercury,
        ChartPoint::Venus,
        ChartPoint::Mars,
        ChartPoint::Jupiter,
        ChartPoint::Saturn,
        ChartPoint::Uranus,
        ChartPoint::Neptune,
        ChartPoint::Pluto,
        ChartPoint::Ascendant,
        ChartPoint::Midheaven,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn is_angle(self) -> bool {
        matches!(self, ChartPoint::Ascendant | ChartPoint::Midheaven)
    }

    /// Short identifier, matching the serde name.
    pub fn id(self) -> &'static str {
        match self {
            ChartPoint::Sun => "sun",
            ChartPoint::Moon => "moon",
            ChartPoint::Mercury => "mercury",
            ChartPoint::Venus => "venus",
            ChartPoint::Mars => "mars",
            ChartPoint::Jupiter => "jupiter",
            ChartPoint::Saturn => "saturn",
            ChartPoint::Uranus => "uranus",
            ChartPoint::Neptune => "neptune",
            ChartPoint::Pluto => "pluto",
            ChartPoint::Ascendant => "asc",
            ChartPoint::Midheaven => "mc",
        }
    }

    /// Label used in prompts and replies.
    pub fn label(self) -> &'static str {
        match self {
            ChartPoint::Sun => "Sun",
            ChartPoint::Moon => "Moon",
            ChartPoint::Mercury => "Mercury",
            ChartPoint::Venus => "Venus",
            ChartPoint::Mars => "Mars",
            ChartPoint::Jupiter => "Jupiter",
            ChartPoint::Saturn => "Saturn",
            ChartPoint::Uranus => "Uranus",
            ChartPoint::Neptune => "Neptune",
            ChartPoint::Pluto => "Pluto",
            ChartPoint::Ascendant => "ASC",
            ChartPoint::Midheaven => "MC",
        }
    }
}

impl fmt::Display for ChartPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Position of one chart point
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CelestialPosition {
    pub point: ChartPoint,
    /// Apparent ecliptic longitude of date, degrees in [0, 360)
    pub longitude: f64,
    /// Ecliptic latitude in degrees (None for angles)
    pub latitude: Option<f64>,
    /// Speed in longitude, degrees per day (None for angles)
    pub speed: Option<f64>,
}

impl CelestialPosition {
    pub fn is_retrograde(&self) -> bool {
        self.speed.map(|s| s < 0.0).unwrap_or(false)
    }
}

/// House division method. Only Placidus is supported; different systems give
/// different cusps for the same moment and place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HouseSystem {
    Placidus,
}

impl HouseSystem {
    pub fn name(self) -> &'static str {
        match self {
            HouseSystem::Placidus => "placidus",
        }
    }
}

/// House cusps and angles
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HousePositions {
    pub system: HouseSystem,
    /// Cusps of houses 1..=12, degrees
    pub cusps: [f64; 12],
    pub ascendant: f64,
    pub midheaven: f64,
}

/// Everything an ephemeris provider computes for one moment and place
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawPositions {
    pub bodies: Vec<CelestialPosition>,
    pub houses: HousePositions,
}
