//! Natal chart assembly.
//!
//! A `NatalChart` always holds all twelve chart points exactly once, in
//! `ChartPoint::ALL` order. There is no way to build one partially; the
//! assembler fails instead.

use serde::Serialize;

use crate::ephemeris::{CelestialPosition, ChartPoint, GeoCoordinate, HouseSystem, RawPositions};
use crate::error::ChartError;
use crate::time::JulianDay;
use crate::zodiac::{degree_in_sign, normalize_degrees, ZodiacSign};

/// One chart point with its sign annotation
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChartEntry {
    pub position: CelestialPosition,
    pub sign: ZodiacSign,
    /// Degrees past the start of `sign`, [0, 30)
    pub degree_in_sign: f64,
}

impl ChartEntry {
    fn new(position: CelestialPosition) -> Self {
        Self {
            position,
            sign: ZodiacSign::from_longitude(position.longitude),
            degree_in_sign: degree_in_sign(position.longitude),
        }
    }

    pub fn point(&self) -> ChartPoint {
        self.position.point
    }

    pub fn longitude(&self) -> f64 {
        self.position.longitude
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NatalChart {
    moment: JulianDay,
    location: GeoCoordinate,
    house_system: HouseSystem,
    entries: Vec<ChartEntry>,
    cusps: [f64; 12],
}

impl NatalChart {
    /// Combine raw ephemeris output into a finished chart.
    ///
    /// Fails with `IncompleteChart` unless every body appears exactly once, and
    /// with `CalculationError` if any longitude is not finite.
    pub fn assemble(
        raw: RawPositions,
        moment: JulianDay,
        location: GeoCoordinate,
    ) -> Result<Self, ChartError> {
        let mut slots: [Option<CelestialPosition>; 12] = [None; 12];
        let mut duplicated = Vec::new();

        let houses = raw.houses;
        let angles = [
            angle_position(ChartPoint::Ascendant, houses.ascendant),
            angle_position(ChartPoint::Midheaven, houses.midheaven),
        ];

        for position in raw.bodies.into_iter().chain(angles) {
            if !position.longitude.is_finite() {
                return Err(ChartError::CalculationError(format!(
                    "longitude of {} is not finite",
                    position.point.id()
                )));
            }
            let slot = &mut slots[position.point.index()];
            if slot.is_some() {
                duplicated.push(position.point);
                continue;
            }
            *slot = Some(CelestialPosition {
                longitude: normalize_degrees(position.longitude),
                ..position
            });
        }

        let missing: Vec<ChartPoint> = ChartPoint::ALL
            .iter()
            .copied()
            .filter(|p| slots[p.index()].is_none())
            .collect();
        if !missing.is_empty() || !duplicated.is_empty() {
            return Err(ChartError::IncompleteChart {
                missing,
                duplicated,
            });
        }

        if houses.cusps.iter().any(|c| !c.is_finite()) {
            return Err(ChartError::CalculationError(
                "house cusp is not finite".to_string(),
            ));
        }

        Ok(Self {
            moment,
            location,
            house_system: houses.system,
            entries: slots.iter().flatten().copied().map(ChartEntry::new).collect(),
            cusps: houses.cusps.map(normalize_degrees),
        })
    }

    pub fn moment(&self) -> JulianDay {
        self.moment
    }

    pub fn location(&self) -> GeoCoordinate {
        self.location
    }

    pub fn house_system(&self) -> HouseSystem {
        self.house_system
    }

    /// All entries, bodies first, then Ascendant and Midheaven.
    pub fn entries(&self) -> &[ChartEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, point: ChartPoint) -> &ChartEntry {
        &self.entries[point.index()]
    }

    pub fn sign_of(&self, point: ChartPoint) -> ZodiacSign {
        self.get(point).sign
    }

    /// Cusps of houses 1..=12.
    pub fn cusps(&self) -> &[f64; 12] {
        &self.cusps
    }

    /// House (1-12) containing the point.
    pub fn house_of(&self, point: ChartPoint) -> usize {
        house_for_longitude(&self.cusps, self.get(point).longitude())
    }
}

fn angle_position(point: ChartPoint, longitude: f64) -> CelestialPosition {
    CelestialPosition {
        point,
        longitude,
        latitude: None,
        speed: None,
    }
}

/// House number (1-12) whose cusp-to-next-cusp arc contains `longitude`.
pub fn house_for_longitude(cusps: &[f64; 12], longitude: f64) -> usize {
    let arc = |from: f64, to: f64| (to - from).rem_euclid(360.0);
    (0..12)
        .find(|&i| arc(cusps[i], longitude) < arc(cusps[i], cusps[(i + 1) % 12]))
        .map(|i| i + 1)
        .unwrap_or(1)
}
