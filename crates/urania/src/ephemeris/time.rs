//! Time scales and slowly varying earth-orientation quantities.
//!
//! UTC is used in place of UT1; the difference (under a second) is far below
//! the precision of chart work.

use chrono::{DateTime, TimeZone, Utc};

/// Julian Day of the Unix epoch.
pub const JD_UNIX_EPOCH: f64 = 2_440_587.5;
/// Julian Day of J2000.0.
pub const J2000: f64 = 2_451_545.0;
pub const SECONDS_PER_DAY: f64 = 86_400.0;
pub const DAYS_PER_CENTURY: f64 = 36_525.0;

/// Midnight UTC on January 1st of `year`.
pub fn utc_year_start(year: i32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, 1, 1, 0, 0, 0)
        .single()
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

/// Reduce an angle into [0, 360).
pub fn normalize_degrees(deg: f64) -> f64 {
    let r = deg.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs
    if r >= 360.0 {
        0.0
    } else {
        r
    }
}

/// Signed shortest difference `b - a`, in (-180, 180].
pub fn signed_delta(a: f64, b: f64) -> f64 {
    let d = normalize_degrees(b - a);
    if d > 180.0 {
        d - 360.0
    } else {
        d
    }
}

pub fn julian_day(instant: DateTime<Utc>) -> f64 {
    let secs = instant.timestamp() as f64 + f64::from(instant.timestamp_subsec_nanos()) * 1e-9;
    secs / SECONDS_PER_DAY + JD_UNIX_EPOCH
}

/// Julian centuries since J2000.0.
pub fn julian_centuries(jd: f64) -> f64 {
    (jd - J2000) / DAYS_PER_CENTURY
}

/// Mean obliquity of the ecliptic in degrees (IAU 1980 polynomial).
pub fn mean_obliquity(jd: f64) -> f64 {
    let t = julian_centuries(jd);
    let arcsec = 84_381.448 - 46.8150 * t - 0.000_59 * t * t + 0.001_813 * t * t * t;
    arcsec / 3600.0
}

/// Greenwich mean sidereal time in degrees.
pub fn gmst_degrees(jd: f64) -> f64 {
    let t = julian_centuries(jd);
    let theta = 280.460_618_37 + 360.985_647_366_29 * (jd - J2000) + 0.000_387_933 * t * t
        - t * t * t / 38_710_000.0;
    normalize_degrees(theta)
}

/// Local sidereal time, i.e. the right ascension of the midheaven (RAMC),
/// in degrees. `east_longitude` is positive east of Greenwich.
pub fn local_sidereal_degrees(jd: f64, east_longitude: f64) -> f64 {
    normalize_degrees(gmst_degrees(jd) + east_longitude)
}
