pub mod chart;
pub mod ephemeris;
pub mod error;
pub mod geocode;
pub mod input;
pub mod interpret;
pub mod pipeline;
pub mod reply;
pub mod time;
pub mod zodiac;

pub use chart::{ChartEntry, NatalChart};
pub use ephemeris::{
    CelestialPosition, ChartPoint, EphemerisProvider, GeoCoordinate, HouseSystem,
    SwissEphemeris,
};
pub use error::{ChartError, InputErrorKind};
pub use geocode::{Gazetteer, GeocodeError, Geocoder};
pub use input::{parse_birth_input, parse_message, BirthInput, Message};
pub use interpret::{build_prompt, DisabledInterpreter, InterpretationError, Interpreter};
pub use pipeline::{Outcome, Pipeline};
pub use time::{FixedZone, JulianDay, UtcTimestamp};
pub use zodiac::ZodiacSign;
