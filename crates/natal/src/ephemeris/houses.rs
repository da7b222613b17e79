//! Placidus applicability.
//!
//! Placidus divides the diurnal and nocturnal semi-arcs of ecliptic points
//! into thirds. Inside the polar circles part of the ecliptic never rises or
//! sets, so the division is undefined there. Swiss Ephemeris silently switches
//! to Porphyry in that case; the chart must fail instead.

use crate::error::ChartError;
use crate::time::JulianDay;

/// Mean obliquity of the ecliptic (IAU 1980), degrees.
pub fn mean_obliquity(moment: JulianDay) -> f64 {
    let t = moment.centuries_since_j2000();
    let arcsec = 84_381.448 - 46.815 * t - 0.000_59 * t * t + 0.001_813 * t * t * t;
    arcsec / 3_600.0
}

/// Reject latitudes where Placidus cusps do not exist.
pub fn check_placidus_latitude(latitude_deg: f64, moment: JulianDay) -> Result<(), ChartError> {
    let limit = 90.0 - mean_obliquity(moment);
    if !latitude_deg.is_finite() || latitude_deg.abs() >= limit {
        return Err(ChartError::CalculationError(format!(
            "Placidus houses are undefined at latitude {latitude_deg:.4} deg (polar circle at {limit:.4} deg)"
        )));
    }
    Ok(())
}
