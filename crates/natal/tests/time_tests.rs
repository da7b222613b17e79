use chrono::{Duration, TimeZone, Utc};
use natal::time::J2000_JD;
use natal::{ChartError, JulianDay, UtcTimestamp};

#[test]
fn test_j2000_epoch() {
    let jd = JulianDay::from_utc(&UtcTimestamp::new(2000, 1, 1, 12, 0, 0.0)).unwrap();
    assert!((jd.value() - J2000_JD).abs() < 1e-9);
}

#[test]
fn test_converter_is_monotonic() {
    let start = Utc.with_ymd_and_hms(1899, 12, 31, 0, 0, 0).unwrap();
    let mut previous = JulianDay::from_datetime(start);
    for step in 1..2000 {
        // Uneven steps cross month, leap-day and year boundaries
        let dt = start + Duration::minutes(step * 26_777);
        let jd = JulianDay::from_datetime(dt);
        assert!(jd > previous, "{dt} did not advance");
        previous = jd;
    }
}

#[test]
fn test_datetime_and_timestamp_agree() {
    let dt = Utc.with_ymd_and_hms(1990, 1, 1, 3, 30, 0).unwrap();
    let a = JulianDay::from_datetime(dt);
    let b = JulianDay::from_utc(&UtcTimestamp::from_datetime(dt)).unwrap();
    assert!((a.value() - b.value()).abs() < 1e-9);
    assert!((a.value() - 2_447_892.645_833).abs() < 1e-5);
}

#[test]
fn test_leap_day_handling() {
    let feb29 = JulianDay::from_utc(&UtcTimestamp::new(2000, 2, 29, 0, 0, 0.0)).unwrap();
    let mar1 = JulianDay::from_utc(&UtcTimestamp::new(2000, 3, 1, 0, 0, 0.0)).unwrap();
    assert!((mar1.value() - feb29.value() - 1.0).abs() < 1e-9);
    assert!(JulianDay::from_utc(&UtcTimestamp::new(1900, 2, 29, 0, 0, 0.0)).is_err());
}

#[test]
fn test_out_of_range_fields_are_invalid_timestamp() {
    let bad = [
        UtcTimestamp::new(1990, 13, 1, 0, 0, 0.0),
        UtcTimestamp::new(1990, 4, 31, 0, 0, 0.0),
        UtcTimestamp::new(1990, 1, 1, 25, 0, 0.0),
        UtcTimestamp::new(1990, 1, 1, 0, 60, 0.0),
        UtcTimestamp::new(1990, 1, 1, 0, 0, 61.0),
    ];
    for ts in bad {
        assert!(
            matches!(JulianDay::from_utc(&ts), Err(ChartError::InvalidTimestamp(_))),
            "{ts:?} accepted"
        );
    }
}
