pub mod adapter;
pub mod houses;
pub mod types;

pub use adapter::{EphemerisProvider, SwissEphemeris, DEFAULT_EPHEMERIS_PATH, EPHEMERIS_PATH_ENV};
pub use types::{
    CelestialPosition, ChartPoint, GeoCoordinate, HousePositions, HouseSystem, RawPositions,
};
