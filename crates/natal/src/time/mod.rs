pub mod julian;
pub mod zone;

pub use julian::{JulianDay, UtcTimestamp, J2000_JD};
pub use zone::FixedZone;
