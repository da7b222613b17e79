//! Tropical zodiac signs.
//!
//! Each sign covers a closed-open 30 degree band of ecliptic longitude,
//! starting with Aries at 0 degrees.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZodiacSign {
    Aries,
    Taurus,
    Gemini,
    Cancer,
    Leo,
    Virgo,
    Libra,
    Scorpio,
    Sagittarius,
    Capricorn,
    Aquarius,
    Pisces,
}

impl ZodiacSign {
    pub const ALL: [ZodiacSign; 12] = [
        ZodiacSign::Aries,
        ZodiacSign::Taurus,
        ZodiacSign::Gemini,
        ZodiacSign::Cancer,
        ZodiacSign::Leo,
        ZodiacSign::Virgo,
        ZodiacSign::Libra,
        ZodiacSign::Scorpio,
        ZodiacSign::Sagittarius,
        ZodiacSign::Capricorn,
        ZodiacSign::Aquarius,
        ZodiacSign::Pisces,
    ];

    /// Classify an ecliptic longitude. Any real value is accepted and
    /// normalized first, so `from_longitude(l) == from_longitude(l + 360.0 * k)`.
    pub fn from_longitude(longitude: f64) -> ZodiacSign {
        Self::ALL[sign_index(longitude)]
    }

    /// Position in zodiac order, 0 (Aries) through 11 (Pisces).
    pub fn index(self) -> usize {
        self as usize
    }

    /// Longitude where the sign begins.
    pub fn start_longitude(self) -> f64 {
        self.index() as f64 * 30.0
    }

    pub fn name(self) -> &'static str {
        match self {
            ZodiacSign::Aries => "Aries",
            ZodiacSign::Taurus => "Taurus",
            ZodiacSign::Gemini => "Gemini",
            ZodiacSign::Cancer => "Cancer",
            ZodiacSign::Leo => "Leo",
            ZodiacSign::Virgo => "Virgo",
            ZodiacSign::Libra => "Libra",
            ZodiacSign::Scorpio => "Scorpio",
            ZodiacSign::Sagittarius => "Sagittarius",
            ZodiacSign::Capricorn => "Capricorn",
            ZodiacSign::Aquarius => "Aquarius",
            ZodiacSign::Pisces => "Pisces",
        }
    }

    /// Japanese display name used in replies and prompts.
    pub fn display_name(self) -> &'static str {
        match self {
            ZodiacSign::Aries => "牡羊座",
            ZodiacSign::Taurus => "牡牛座",
            ZodiacSign::Gemini => "双子座",
            ZodiacSign::Cancer => "蟹座",
            ZodiacSign::Leo => "獅子座",
            ZodiacSign::Virgo => "乙女座",
            ZodiacSign::Libra => "天秤座",
            ZodiacSign::Scorpio => "蠍座",
            ZodiacSign::Sagittarius => "射手座",
            ZodiacSign::Capricorn => "山羊座",
            ZodiacSign::Aquarius => "水瓶座",
            ZodiacSign::Pisces => "魚座",
        }
    }
}

impl fmt::Display for ZodiacSign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Floor-modulo 360, result in [0, 360).
pub fn normalize_degrees(degrees: f64) -> f64 {
    let r = degrees.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs
    if r >= 360.0 {
        0.0
    } else {
        r
    }
}

/// Sign index (0-11) from longitude
pub fn sign_index(longitude: f64) -> usize {
    let normalized = normalize_degrees(longitude);
    ((normalized / 30.0).floor() as usize) % 12
}

/// Degrees past the start of the sign, in [0, 30).
pub fn degree_in_sign(longitude: f64) -> f64 {
    let normalized = normalize_degrees(longitude);
    normalized - (sign_index(normalized) as f64) * 30.0
}
