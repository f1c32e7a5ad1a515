//! Chart angles and the spherical helpers shared by the house systems.
//!
//! Everything works in degrees; `ramc` is the local sidereal time expressed
//! as the right ascension of the midheaven.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::ephemeris::time::{
    julian_day, local_sidereal_degrees, mean_obliquity, normalize_degrees, signed_delta,
};
use crate::ephemeris::types::GeoLocation;

pub(crate) fn sin_d(x: f64) -> f64 {
    x.to_radians().sin()
}

pub(crate) fn cos_d(x: f64) -> f64 {
    x.to_radians().cos()
}

pub(crate) fn tan_d(x: f64) -> f64 {
    x.to_radians().tan()
}

fn atan2_d(y: f64, x: f64) -> f64 {
    normalize_degrees(y.atan2(x).to_degrees())
}

/// Forward arc from `a` to `b`, in [0, 360).
pub fn arc_forward(a: f64, b: f64) -> f64 {
    normalize_degrees(b - a)
}

/// Sidereal inputs every house system is a pure function of.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HouseFrame {
    /// Right ascension of the midheaven (local sidereal time), degrees
    pub ramc: f64,
    /// Geographic latitude, degrees north
    pub latitude: f64,
    /// Obliquity of the ecliptic, degrees
    pub obliquity: f64,
}

impl HouseFrame {
    pub fn new(ramc: f64, latitude: f64, obliquity: f64) -> Self {
        Self {
            ramc: normalize_degrees(ramc),
            latitude,
            obliquity,
        }
    }

    /// Frame for an instant and place on Earth.
    pub fn at(instant: DateTime<Utc>, location: GeoLocation) -> Self {
        let jd = julian_day(instant);
        Self::new(
            local_sidereal_degrees(jd, location.lon),
            location.lat,
            mean_obliquity(jd),
        )
    }

    pub fn ascendant(&self) -> f64 {
        oblique_point(self.ramc + 90.0, self.latitude, self.obliquity)
    }

    pub fn midheaven(&self) -> f64 {
        ecliptic_from_ra(self.ramc, self.obliquity)
    }

    /// Latitude beyond which part of the ecliptic never rises.
    pub fn polar_limit(&self) -> f64 {
        90.0 - self.obliquity
    }

    pub fn is_polar(&self) -> bool {
        self.latitude.abs() > self.polar_limit()
    }
}

/// Ecliptic longitude of the ecliptic point with right ascension `ra`.
pub fn ecliptic_from_ra(ra: f64, obliquity: f64) -> f64 {
    atan2_d(sin_d(ra), cos_d(ra) * cos_d(obliquity))
}

/// Declination of the ecliptic point with right ascension `ra`.
pub fn declination_from_ra(ra: f64, obliquity: f64) -> f64 {
    (sin_d(ra) * tan_d(obliquity)).atan().to_degrees()
}

/// Declination of the ecliptic point at `longitude`.
pub fn declination_from_longitude(longitude: f64, obliquity: f64) -> f64 {
    (sin_d(obliquity) * sin_d(longitude)).asin().to_degrees()
}

/// Ecliptic point whose oblique ascension under a pole of height `pole`
/// equals `oa`. With `oa = ramc + 90` and the geographic latitude as pole this
/// is the Ascendant; with pole 0 it reduces to [`ecliptic_from_ra`].
pub fn oblique_point(oa: f64, pole: f64, obliquity: f64) -> f64 {
    atan2_d(
        sin_d(oa),
        cos_d(oa) * cos_d(obliquity) - tan_d(pole) * sin_d(obliquity),
    )
}

/// Ascensional difference `asin(tan(lat) tan(dec))`, or `None` when the
/// point is circumpolar at this latitude.
pub fn ascensional_difference(declination: f64, latitude: f64) -> Option<f64> {
    let x = tan_d(latitude) * tan_d(declination);
    if !x.is_finite() || x.abs() > 1.0 {
        return None;
    }
    Some(x.asin().to_degrees())
}

/// Diurnal semi-arc in degrees, `None` for circumpolar points.
pub fn diurnal_semi_arc(declination: f64, latitude: f64) -> Option<f64> {
    ascensional_difference(declination, latitude).map(|ad| 90.0 + ad)
}

/// The four chart angles, in ecliptic longitude.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AngleLongitudes {
    pub ascendant: f64,
    pub midheaven: f64,
    pub descendant: f64,
    pub imum_coeli: f64,
    /// Degrees per day
    pub ascendant_speed: f64,
    /// Degrees per day
    pub midheaven_speed: f64,
}

/// Step used to differentiate the angles, in seconds.
const ANGLE_SPEED_STEP_SECS: i64 = 60;

impl AngleLongitudes {
    pub fn at(instant: DateTime<Utc>, location: GeoLocation) -> Self {
        let frame = HouseFrame::at(instant, location);
        let step = Duration::seconds(ANGLE_SPEED_STEP_SECS);
        let before = HouseFrame::at(instant - step, location);
        let after = HouseFrame::at(instant + step, location);
        let span_days = 2.0 * ANGLE_SPEED_STEP_SECS as f64 / 86_400.0;

        let asc = frame.ascendant();
        let mc = frame.midheaven();
        Self {
            ascendant: asc,
            midheaven: mc,
            descendant: normalize_degrees(asc + 180.0),
            imum_coeli: normalize_degrees(mc + 180.0),
            ascendant_speed: signed_delta(before.ascendant(), after.ascendant()) / span_days,
            midheaven_speed: signed_delta(before.midheaven(), after.midheaven()) / span_days,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const EPS: f64 = 23.4393;

    #[test]
    fn test_equator_at_ramc_zero() {
        let frame = HouseFrame::new(0.0, 0.0, EPS);
        assert!(frame.midheaven().abs() < 1e-9);
        assert!((frame.ascendant() - 90.0).abs() < 1e-9);
    }

    #[test]
    fn test_ascendant_rises_east_of_midheaven() {
        for ramc in (0..360).step_by(15) {
            for lat in [-60.0, -35.0, 0.0, 40.7, 60.0] {
                let frame = HouseFrame::new(ramc as f64, lat, EPS);
                let arc = arc_forward(frame.midheaven(), frame.ascendant());
                assert!(arc > 0.0 && arc < 180.0, "ramc {} lat {} arc {}", ramc, lat, arc);
            }
        }
    }

    #[test]
    fn test_oblique_point_with_zero_pole_is_ra_projection() {
        for ra in [10.0, 100.0, 200.0, 300.0] {
            let a = oblique_point(ra, 0.0, EPS);
            let b = ecliptic_from_ra(ra, EPS);
            assert!((a - b).abs() < 1e-9);
        }
    }

    #[test]
    fn test_declination_consistency() {
        let lon = 75.0;
        let dec = declination_from_longitude(lon, EPS);
        // RA of the same point
        let ra = normalize_degrees(
            (sin_d(lon) * cos_d(EPS)).atan2(cos_d(lon)).to_degrees(),
        );
        assert!((declination_from_ra(ra, EPS) - dec).abs() < 1e-9);
    }

    #[test]
    fn test_circumpolar_semi_arc_is_none() {
        assert!(diurnal_semi_arc(23.0, 80.0).is_none());
        assert!((diurnal_semi_arc(0.0, 45.0).unwrap() - 90.0).abs() < 1e-12);
    }

    #[test]
    fn test_angle_speeds_are_positive() {
        let instant = Utc.with_ymd_and_hms(1990, 4, 15, 18, 30, 0).unwrap();
        let angles = AngleLongitudes::at(instant, GeoLocation { lat: 40.7128, lon: -74.006 });
        assert!(angles.midheaven_speed > 300.0);
        assert!(angles.ascendant_speed > 0.0);
        assert!((arc_forward(angles.ascendant, angles.descendant) - 180.0).abs() < 1e-9);
    }
}
