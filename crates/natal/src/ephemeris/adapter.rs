use std::env;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use lazy_static::lazy_static;
use swisseph::swe::{calc_ut, houses_ex};
use swisseph::{AscMc, Cusp};

use crate::ephemeris::houses::check_placidus_latitude;
use crate::ephemeris::types::{
    CelestialPosition, ChartPoint, GeoCoordinate, HousePositions, HouseSystem, RawPositions,
};
use crate::error::ChartError;
use crate::time::JulianDay;
use crate::zodiac::normalize_degrees;

/// Environment variable that overrides the ephemeris data location.
pub const EPHEMERIS_PATH_ENV: &str = "NATAL_EPHEMERIS_PATH";

/// Default install location of the Swiss Ephemeris data files.
pub const DEFAULT_EPHEMERIS_PATH: &str = "/usr/local/share/swisseph";

// Read by the C library when it first opens its data files
const SWISS_EPHE_PATH_ENV: &str = "SE_EPHE_PATH";

// FLG_SWIEPH | FLG_SPEED
const CALC_FLAGS: i32 = 2 | 256;

const PLANET_IDS: &[(ChartPoint, i32)] = &[
    (ChartPoint::Sun, 0),
    (ChartPoint::Moon, 1),
    (ChartPoint::Mercury, 2),
    (ChartPoint::Venus, 3),
    (ChartPoint::Mars, 4),
    (ChartPoint::Jupiter, 5),
    (ChartPoint::Saturn, 6),
    (ChartPoint::Uranus, 7),
    (ChartPoint::Neptune, 8),
    (ChartPoint::Pluto, 9),
];

const HOUSE_SYSTEMS: &[(HouseSystem, u8)] = &[(HouseSystem::Placidus, b'P')];

lazy_static! {
    // The C library keeps global state; one calculation at a time
    static ref SWISS_LOCK: Mutex<()> = Mutex::new(());
}

/// Narrow seam around the numerical engine: (moment, place) -> positions.
///
/// Implementations must be deterministic for identical input and must fail
/// rather than return partial data.
pub trait EphemerisProvider: Send + Sync {
    fn name(&self) -> &str;

    fn house_system(&self) -> HouseSystem {
        HouseSystem::Placidus
    }

    fn calc_positions(
        &self,
        moment: JulianDay,
        location: &GeoCoordinate,
    ) -> Result<RawPositions, ChartError>;
}

/// Swiss Ephemeris backed provider: apparent tropical positions, speeds and
/// Placidus houses.
#[derive(Debug, Clone)]
pub struct SwissEphemeris {
    ephemeris_path: PathBuf,
}

impl SwissEphemeris {
    /// Use the data files at an explicit path, `NATAL_EPHEMERIS_PATH`, or the
    /// default install location, in that order.
    pub fn new(ephemeris_path: Option<PathBuf>) -> Result<Self, ChartError> {
        let path = ephemeris_path.unwrap_or_else(|| {
            env::var(EPHEMERIS_PATH_ENV)
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_EPHEMERIS_PATH))
        });

        if !path.exists() {
            return Err(ChartError::EphemerisUnavailable(format!(
                "ephemeris path does not exist: {}. Install the Swiss Ephemeris data files or set {}",
                path.display(),
                EPHEMERIS_PATH_ENV
            )));
        }

        env::set_var(SWISS_EPHE_PATH_ENV, &path);
        log::debug!("Swiss Ephemeris data path: {}", path.display());

        Ok(Self {
            ephemeris_path: path,
        })
    }

    pub fn ephemeris_path(&self) -> &Path {
        &self.ephemeris_path
    }

    /// Position of a single body. Callers hold `SWISS_LOCK`.
    fn calc_body_position(
        &self,
        point: ChartPoint,
        moment: JulianDay,
    ) -> Result<CelestialPosition, ChartError> {
        let planet_code = PLANET_IDS
            .iter()
            .find(|(p, _)| *p == point)
            .map(|(_, code)| *code)
            .ok_or_else(|| {
                ChartError::CalculationError(format!("{} is not a body", point.id()))
            })?;

        let result = calc_ut(moment.value(), planet_code as u32, CALC_FLAGS as u32).map_err(|e| {
            ChartError::CalculationError(format!(
                "Swiss Ephemeris error for {} at JD {}: {}",
                point.id(),
                moment.value(),
                e
            ))
        })?;

        let out = result.out;
        let (longitude, latitude, speed) = (out[0], out[1], out[3]);
        if !(longitude.is_finite() && latitude.is_finite() && speed.is_finite()) {
            return Err(ChartError::CalculationError(format!(
                "non-finite position for {} at JD {}",
                point.id(),
                moment.value()
            )));
        }

        Ok(CelestialPosition {
            point,
            longitude: normalize_degrees(longitude),
            latitude: Some(latitude),
            speed: Some(speed),
        })
    }

    /// House cusps and angles. Callers hold `SWISS_LOCK`.
    fn calc_houses(
        &self,
        moment: JulianDay,
        location: &GeoCoordinate,
        system: HouseSystem,
    ) -> Result<HousePositions, ChartError> {
        let house_system_byte = HOUSE_SYSTEMS
            .iter()
            .find(|(s, _)| *s == system)
            .map(|(_, byte)| *byte)
            .ok_or_else(|| {
                ChartError::CalculationError(format!("unsupported house system {}", system.name()))
            })?;

        let (c, a) = houses_ex(
            moment.value(),
            CALC_FLAGS,
            location.latitude,
            location.longitude,
            house_system_byte as i32,
        );
        let cusps = Cusp::from_array(c);
        let ascmc = AscMc::from_array(a);

        let cusp_values = [
            cusps.first, cusps.second, cusps.third, cusps.fourth,
            cusps.fifth, cusps.sixth, cusps.seventh, cusps.eighth,
            cusps.ninth, cusps.tenth, cusps.eleventh, cusps.twelfth,
        ];
        let houses = HousePositions {
            system,
            cusps: cusp_values.map(normalize_degrees),
            ascendant: normalize_degrees(ascmc.ascendant),
            midheaven: normalize_degrees(ascmc.mc),
        };

        let finite = houses.cusps.iter().all(|c| c.is_finite())
            && houses.ascendant.is_finite()
            && houses.midheaven.is_finite();
        if !finite {
            return Err(ChartError::CalculationError(format!(
                "non-finite house cusps at JD {} ({}, {})",
                moment.value(),
                location.latitude,
                location.longitude
            )));
        }
        Ok(houses)
    }
}

impl EphemerisProvider for SwissEphemeris {
    fn name(&self) -> &str {
        "swisseph"
    }

    fn calc_positions(
        &self,
        moment: JulianDay,
        location: &GeoCoordinate,
    ) -> Result<RawPositions, ChartError> {
        location.validate()?;
        if !moment.value().is_finite() {
            return Err(ChartError::CalculationError(
                "moment is not a finite Julian Day".to_string(),
            ));
        }
        if self.house_system() == HouseSystem::Placidus {
            check_placidus_latitude(location.latitude, moment)?;
        }

        let _guard = SWISS_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let bodies = ChartPoint::BODIES
            .iter()
            .map(|&point| self.calc_body_position(point, moment))
            .collect::<Result<Vec<_>, _>>()?;
        let houses = self.calc_houses(moment, location, self.house_system())?;

        Ok(RawPositions { bodies, houses })
    }
}
