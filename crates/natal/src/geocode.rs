//! Place name to coordinate lookup.
//!
//! The pipeline only depends on the `Geocoder` trait. `Gazetteer` is the
//! bundled implementation: a fixed table of places read from TOML.

use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

use crate::ephemeris::GeoCoordinate;
use crate::error::ChartError;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeocodeError {
    #[error("No match for {locality}, {region}")]
    NotFound { region: String, locality: String },
    #[error("Geocoder unavailable: {0}")]
    Unavailable(String),
}

impl From<GeocodeError> for ChartError {
    fn from(err: GeocodeError) -> Self {
        match err {
            GeocodeError::NotFound { region, locality } => {
                ChartError::GeocodeNotFound { region, locality }
            }
            GeocodeError::Unavailable(detail) => ChartError::GeocoderUnavailable(detail),
        }
    }
}

/// Resolves (locality, region) to a coordinate. A not-found answer is final
/// for the request; callers never retry it.
#[async_trait]
pub trait Geocoder: Send + Sync {
    fn name(&self) -> &str;

    async fn locate(&self, locality: &str, region: &str) -> Result<GeoCoordinate, GeocodeError>;
}

#[derive(Debug, Deserialize)]
struct GazetteerToml {
    #[serde(default)]
    places: Vec<PlaceToml>,
}

#[derive(Debug, Deserialize)]
struct PlaceToml {
    region: String,
    locality: String,
    latitude: f64,
    longitude: f64,
}

/// In-memory place table keyed by trimmed (region, locality).
#[derive(Debug, Clone, Default)]
pub struct Gazetteer {
    places: HashMap<(String, String), GeoCoordinate>,
}

impl Gazetteer {
    pub fn load(path: &Path) -> Result<Self, GeocodeError> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            GeocodeError::Unavailable(format!("failed to read {}: {e}", path.display()))
        })?;
        let gazetteer = Self::from_toml_str(&text)?;
        log::info!(
            "Loaded gazetteer with {} places from {}",
            gazetteer.len(),
            path.display()
        );
        Ok(gazetteer)
    }

    pub fn from_toml_str(text: &str) -> Result<Self, GeocodeError> {
        let parsed: GazetteerToml = toml::from_str(text)
            .map_err(|e| GeocodeError::Unavailable(format!("invalid gazetteer: {e}")))?;

        let mut gazetteer = Self::default();
        for place in parsed.places {
            let coordinate = GeoCoordinate::new(place.latitude, place.longitude).map_err(|e| {
                GeocodeError::Unavailable(format!(
                    "{}, {}: {e}",
                    place.locality, place.region
                ))
            })?;
            gazetteer.insert(&place.region, &place.locality, coordinate);
        }
        Ok(gazetteer)
    }

    pub fn insert(&mut self, region: &str, locality: &str, coordinate: GeoCoordinate) {
        self.places.insert(key(region, locality), coordinate);
    }

    pub fn get(&self, region: &str, locality: &str) -> Option<GeoCoordinate> {
        self.places.get(&key(region, locality)).copied()
    }

    pub fn len(&self) -> usize {
        self.places.len()
    }

    pub fn is_empty(&self) -> bool {
        self.places.is_empty()
    }
}

fn key(region: &str, locality: &str) -> (String, String) {
    (region.trim().to_string(), locality.trim().to_string())
}

#[async_trait]
impl Geocoder for Gazetteer {
    fn name(&self) -> &str {
        "gazetteer"
    }

    async fn locate(&self, locality: &str, region: &str) -> Result<GeoCoordinate, GeocodeError> {
        self.get(region, locality).ok_or_else(|| GeocodeError::NotFound {
            region: region.trim().to_string(),
            locality: locality.trim().to_string(),
        })
    }
}
