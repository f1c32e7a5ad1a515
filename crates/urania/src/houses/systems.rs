//! House system strategies.
//!
//! Each system is a stateless function of [`HouseFrame`] returning twelve
//! cusp longitudes starting at cusp 1. Systems are looked up in a static
//! strategy table keyed by [`HouseSystem`]. A system that cannot produce an
//! ordered set of cusps reports a [`HouseSystemFailure`] and the calculator
//! substitutes Equal houses.

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::ephemeris::time::normalize_degrees;
use crate::error::ChartError;
use crate::houses::angles::{
    arc_forward, ascensional_difference, declination_from_longitude, declination_from_ra,
    diurnal_semi_arc, ecliptic_from_ra, oblique_point, tan_d, cos_d, sin_d, HouseFrame,
};

/// Convergence tolerance for iterative systems, degrees.
pub const CONVERGENCE_TOLERANCE: f64 = 1e-6;
/// Iteration bound for iterative systems.
pub const MAX_ITERATIONS: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HouseSystem {
    Placidus,
    Koch,
    Equal,
    WholeSign,
    Campanus,
    Regiomontanus,
    Porphyry,
    Topocentric,
    Alcabitius,
    Meridian,
    Morinus,
}

impl HouseSystem {
    pub fn name(&self) -> &'static str {
        strategy(*self).name
    }

    /// Systems built on semi-arcs, undefined inside the polar circles.
    pub fn is_time_based(&self) -> bool {
        matches!(
            self,
            HouseSystem::Placidus | HouseSystem::Koch | HouseSystem::Topocentric | HouseSystem::Alcabitius
        )
    }

    pub fn all() -> Vec<HouseSystem> {
        HOUSE_SYSTEMS.iter().map(|s| s.system).collect()
    }
}

impl Default for HouseSystem {
    fn default() -> Self {
        HouseSystem::Placidus
    }
}

impl fmt::Display for HouseSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for HouseSystem {
    type Err = ChartError;

    /// Accepts the snake_case name, case-insensitively, with `-` or ` ` in
    /// place of `_`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_lowercase().replace(['-', ' '], "_");
        HOUSE_SYSTEMS
            .iter()
            .find(|entry| entry.name == key)
            .map(|entry| entry.system)
            .ok_or_else(|| {
                ChartError::invalid_config(format!(
                    "Invalid house system: {}. Valid systems: {:?}",
                    s,
                    HOUSE_SYSTEMS.iter().map(|e| e.name).collect::<Vec<_>>()
                ))
            })
    }
}

/// Why a house system could not produce cusps.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HouseSystemFailure {
    #[error("latitude {latitude:.4} is beyond the polar limit {limit:.4}")]
    PolarLatitude { latitude: f64, limit: f64 },
    #[error("cusp {cusp} is circumpolar at this latitude")]
    Circumpolar { cusp: u8 },
    #[error("cusp {cusp} did not converge within {iterations} iterations")]
    NoConvergence { cusp: u8, iterations: usize },
    #[error("cusps are not ordered around the ecliptic")]
    Unordered,
}

/// Record of a substituted house system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HouseFallback {
    pub requested: HouseSystem,
    pub reason: HouseSystemFailure,
}

type CuspFn = fn(&HouseFrame) -> Result<[f64; 12], HouseSystemFailure>;

struct Strategy {
    system: HouseSystem,
    name: &'static str,
    compute: CuspFn,
}

const HOUSE_SYSTEMS: &[Strategy] = &[
    Strategy { system: HouseSystem::Placidus, name: "placidus", compute: placidus },
    Strategy { system: HouseSystem::Koch, name: "koch", compute: koch },
    Strategy { system: HouseSystem::Equal, name: "equal", compute: equal },
    Strategy { system: HouseSystem::WholeSign, name: "whole_sign", compute: whole_sign },
    Strategy { system: HouseSystem::Campanus, name: "campanus", compute: campanus },
    Strategy { system: HouseSystem::Regiomontanus, name: "regiomontanus", compute: regiomontanus },
    Strategy { system: HouseSystem::Porphyry, name: "porphyry", compute: porphyry },
    Strategy { system: HouseSystem::Topocentric, name: "topocentric", compute: topocentric },
    Strategy { system: HouseSystem::Alcabitius, name: "alcabitius", compute: alcabitius },
    Strategy { system: HouseSystem::Meridian, name: "meridian", compute: meridian },
    Strategy { system: HouseSystem::Morinus, name: "morinus", compute: morinus },
];

fn strategy(system: HouseSystem) -> &'static Strategy {
    // Every variant has an entry; Equal is the first always-valid fallback.
    HOUSE_SYSTEMS
        .iter()
        .find(|s| s.system == system)
        .unwrap_or(&HOUSE_SYSTEMS[2])
}

/// Cusps, angles and the system that actually produced them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HouseComputation {
    pub cusps: [f64; 12],
    pub ascendant: f64,
    pub midheaven: f64,
    pub system_used: HouseSystem,
    pub fallback: Option<HouseFallback>,
}

impl HouseComputation {
    pub fn fallback_occurred(&self) -> bool {
        self.fallback.is_some()
    }
}

/// Dispatches to the selected house system, falling back to Equal.
#[derive(Debug, Clone, Copy, Default)]
pub struct HouseSystemCalculator;

impl HouseSystemCalculator {
    pub fn new() -> Self {
        Self
    }

    /// Run one system without fallback.
    pub fn try_compute(
        &self,
        system: HouseSystem,
        frame: &HouseFrame,
    ) -> Result<[f64; 12], HouseSystemFailure> {
        if system.is_time_based() && frame.is_polar() {
            return Err(HouseSystemFailure::PolarLatitude {
                latitude: frame.latitude,
                limit: frame.polar_limit(),
            });
        }
        let cusps = (strategy(system).compute)(frame)?;
        if !is_ordered(&cusps) {
            return Err(HouseSystemFailure::Unordered);
        }
        Ok(cusps)
    }

    /// Cusps for `system`, or Equal houses with the failure recorded.
    /// Cusps are always defined.
    pub fn compute(&self, system: HouseSystem, frame: &HouseFrame) -> HouseComputation {
        let (cusps, system_used, fallback) = match self.try_compute(system, frame) {
            Ok(cusps) => (cusps, system, None),
            Err(reason) => {
                warn!(
                    "House system {} failed at latitude {:.4} ({}); using equal houses",
                    system, frame.latitude, reason
                );
                (
                    equal_from(frame.ascendant()),
                    HouseSystem::Equal,
                    Some(HouseFallback {
                        requested: system,
                        reason,
                    }),
                )
            }
        };
        debug!("House cusps ({}): {:?}", system_used, cusps);
        HouseComputation {
            cusps,
            ascendant: frame.ascendant(),
            midheaven: frame.midheaven(),
            system_used,
            fallback,
        }
    }
}

/// Cusps must advance around the circle exactly once with no empty house.
pub fn is_ordered(cusps: &[f64; 12]) -> bool {
    if cusps.iter().any(|c| !c.is_finite()) {
        return false;
    }
    let mut total = 0.0;
    for i in 0..12 {
        let arc = arc_forward(cusps[i], cusps[(i + 1) % 12]);
        if arc <= 0.0 {
            return false;
        }
        total += arc;
    }
    (total - 360.0).abs() < 1e-6
}

/// Build a full cusp set from cusps 10, 11, 12, 1, 2, 3; the rest are
/// their opposites.
fn from_eastern_half(mc: f64, c11: f64, c12: f64, asc: f64, c2: f64, c3: f64) -> [f64; 12] {
    let mut cusps = [0.0; 12];
    cusps[9] = mc;
    cusps[10] = c11;
    cusps[11] = c12;
    cusps[0] = asc;
    cusps[1] = c2;
    cusps[2] = c3;
    for i in 0..6 {
        let src = [9, 10, 11, 0, 1, 2][i];
        let dst = [3, 4, 5, 6, 7, 8][i];
        cusps[dst] = normalize_degrees(cusps[src] + 180.0);
    }
    for c in cusps.iter_mut() {
        *c = normalize_degrees(*c);
    }
    cusps
}

fn equal_from(start: f64) -> [f64; 12] {
    let mut cusps = [0.0; 12];
    for (i, cusp) in cusps.iter_mut().enumerate() {
        *cusp = normalize_degrees(start + 30.0 * i as f64);
    }
    cusps
}

fn equal(frame: &HouseFrame) -> Result<[f64; 12], HouseSystemFailure> {
    Ok(equal_from(frame.ascendant()))
}

fn whole_sign(frame: &HouseFrame) -> Result<[f64; 12], HouseSystemFailure> {
    Ok(equal_from((frame.ascendant() / 30.0).floor() * 30.0))
}

/// Quadrant trisection between the angles.
fn porphyry(frame: &HouseFrame) -> Result<[f64; 12], HouseSystemFailure> {
    let (asc, mc) = (frame.ascendant(), frame.midheaven());
    let ic = normalize_degrees(mc + 180.0);
    let upper = arc_forward(mc, asc);
    let lower = arc_forward(asc, ic);
    Ok(from_eastern_half(
        mc,
        mc + upper / 3.0,
        mc + 2.0 * upper / 3.0,
        asc,
        asc + lower / 3.0,
        asc + 2.0 * lower / 3.0,
    ))
}

/// One Placidus cusp: the ecliptic point that has covered `fraction` of its
/// own semi-arc. Above the horizon the arc is measured from the MC towards
/// the east; below it from the IC back towards the east.
fn placidus_cusp(frame: &HouseFrame, cusp: u8, fraction: f64, above: bool) -> Result<f64, HouseSystemFailure> {
    let (ramc, lat, eps) = (frame.ramc, frame.latitude, frame.obliquity);
    let ra_for = |semi_arc: f64| {
        if above {
            ramc + fraction * semi_arc
        } else {
            ramc + 180.0 - fraction * (180.0 - semi_arc)
        }
    };

    let mut ra = ra_for(90.0);
    for _ in 0..MAX_ITERATIONS {
        let dec = declination_from_ra(ra, eps);
        let dsa = diurnal_semi_arc(dec, lat).ok_or(HouseSystemFailure::Circumpolar { cusp })?;
        let next = ra_for(dsa);
        let delta = (next - ra).abs();
        ra = next;
        if delta < CONVERGENCE_TOLERANCE {
            return Ok(ecliptic_from_ra(ra, eps));
        }
    }
    Err(HouseSystemFailure::NoConvergence {
        cusp,
        iterations: MAX_ITERATIONS,
    })
}

fn placidus(frame: &HouseFrame) -> Result<[f64; 12], HouseSystemFailure> {
    let c11 = placidus_cusp(frame, 11, 1.0 / 3.0, true)?;
    let c12 = placidus_cusp(frame, 12, 2.0 / 3.0, true)?;
    let c2 = placidus_cusp(frame, 2, 2.0 / 3.0, false)?;
    let c3 = placidus_cusp(frame, 3, 1.0 / 3.0, false)?;
    Ok(from_eastern_half(frame.midheaven(), c11, c12, frame.ascendant(), c2, c3))
}

/// Trisects the MC's own diurnal arc on the horizon of the birthplace.
fn koch(frame: &HouseFrame) -> Result<[f64; 12], HouseSystemFailure> {
    let (ramc, lat, eps) = (frame.ramc, frame.latitude, frame.obliquity);
    let mc_dec = declination_from_longitude(frame.midheaven(), eps);
    let ad = ascensional_difference(mc_dec, lat).ok_or(HouseSystemFailure::Circumpolar { cusp: 10 })?;
    let a = ad / 3.0;
    Ok(from_eastern_half(
        frame.midheaven(),
        oblique_point(ramc + 30.0 - 2.0 * a, lat, eps),
        oblique_point(ramc + 60.0 - a, lat, eps),
        frame.ascendant(),
        oblique_point(ramc + 120.0 + a, lat, eps),
        oblique_point(ramc + 150.0 + 2.0 * a, lat, eps),
    ))
}

/// Polich-Page: poles at one and two thirds of the latitude's tangent.
fn topocentric(frame: &HouseFrame) -> Result<[f64; 12], HouseSystemFailure> {
    let (ramc, lat, eps) = (frame.ramc, frame.latitude, frame.obliquity);
    let p1 = (tan_d(lat) / 3.0).atan().to_degrees();
    let p2 = (2.0 * tan_d(lat) / 3.0).atan().to_degrees();
    Ok(from_eastern_half(
        frame.midheaven(),
        oblique_point(ramc + 30.0, p1, eps),
        oblique_point(ramc + 60.0, p2, eps),
        frame.ascendant(),
        oblique_point(ramc + 120.0, p2, eps),
        oblique_point(ramc + 150.0, p1, eps),
    ))
}

/// Trisects the Ascendant's diurnal and nocturnal semi-arcs on the equator.
fn alcabitius(frame: &HouseFrame) -> Result<[f64; 12], HouseSystemFailure> {
    let (ramc, lat, eps) = (frame.ramc, frame.latitude, frame.obliquity);
    let asc_dec = declination_from_longitude(frame.ascendant(), eps);
    let dsa = diurnal_semi_arc(asc_dec, lat).ok_or(HouseSystemFailure::Circumpolar { cusp: 1 })?;
    let nsa = 180.0 - dsa;
    Ok(from_eastern_half(
        frame.midheaven(),
        ecliptic_from_ra(ramc + dsa / 3.0, eps),
        ecliptic_from_ra(ramc + 2.0 * dsa / 3.0, eps),
        frame.ascendant(),
        ecliptic_from_ra(ramc + dsa + nsa / 3.0, eps),
        ecliptic_from_ra(ramc + dsa + 2.0 * nsa / 3.0, eps),
    ))
}

/// Equal arcs of the celestial equator projected through the horizon's
/// north and south points.
fn regiomontanus(frame: &HouseFrame) -> Result<[f64; 12], HouseSystemFailure> {
    let (ramc, lat, eps) = (frame.ramc, frame.latitude, frame.obliquity);
    let cusp = |h: f64| {
        let pole = (tan_d(lat) * sin_d(h)).atan().to_degrees();
        oblique_point(ramc + h, pole, eps)
    };
    Ok(from_eastern_half(
        frame.midheaven(),
        cusp(30.0),
        cusp(60.0),
        frame.ascendant(),
        cusp(120.0),
        cusp(150.0),
    ))
}

/// Equal arcs of the prime vertical.
fn campanus(frame: &HouseFrame) -> Result<[f64; 12], HouseSystemFailure> {
    let (ramc, lat, eps) = (frame.ramc, frame.latitude, frame.obliquity);
    let cusp = |h: f64| {
        let offset = (cos_d(lat) * sin_d(h)).atan2(cos_d(h)).to_degrees();
        let pole = (sin_d(lat) * sin_d(h)).asin().to_degrees();
        oblique_point(ramc + offset, pole, eps)
    };
    Ok(from_eastern_half(
        frame.midheaven(),
        cusp(30.0),
        cusp(60.0),
        frame.ascendant(),
        cusp(120.0),
        cusp(150.0),
    ))
}

/// Axial rotation: equal equator arcs from the RAMC, projected through the
/// celestial poles. Cusp 1 is the equatorial ascendant.
fn meridian(frame: &HouseFrame) -> Result<[f64; 12], HouseSystemFailure> {
    let mut cusps = [0.0; 12];
    for (i, cusp) in cusps.iter_mut().enumerate() {
        *cusp = ecliptic_from_ra(frame.ramc + 90.0 + 30.0 * i as f64, frame.obliquity);
    }
    Ok(cusps)
}

/// Equal equator arcs projected through the ecliptic poles.
fn morinus(frame: &HouseFrame) -> Result<[f64; 12], HouseSystemFailure> {
    let eps = frame.obliquity;
    let mut cusps = [0.0; 12];
    for (i, cusp) in cusps.iter_mut().enumerate() {
        let x = frame.ramc + 90.0 + 30.0 * i as f64;
        *cusp = normalize_degrees((sin_d(x) * cos_d(eps)).atan2(cos_d(x)).to_degrees());
    }
    Ok(cusps)
}
