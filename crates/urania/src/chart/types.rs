//! The assembled chart value and its parts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::aspects::types::Aspect;
use crate::ephemeris::types::{BirthInput, Body};
use crate::houses::{HouseFallback, HouseSystem};
use crate::western::dignities::Dignity;
use crate::western::signs::{ZodiacPosition, ZodiacSign};

/// A body placed in sign and house.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CelestialBody {
    pub body: Body,
    /// [0, 360)
    pub longitude: f64,
    pub latitude: f64,
    /// Degrees per day
    pub speed: f64,
    /// AU
    pub distance: f64,
    #[serde(flatten)]
    pub position: ZodiacPosition,
    /// 1..=12
    pub house: u8,
    pub is_retrograde: bool,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub dignity: Option<Dignity>,
}

impl CelestialBody {
    pub fn sign(&self) -> ZodiacSign {
        self.position.sign
    }

    pub fn formatted_position(&self) -> String {
        self.position.formatted()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HouseCusp {
    /// 1..=12
    pub number: u8,
    pub longitude: f64,
    #[serde(flatten)]
    pub position: ZodiacPosition,
}

impl HouseCusp {
    pub fn sign(&self) -> ZodiacSign {
        self.position.sign
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartAngle {
    pub longitude: f64,
    #[serde(flatten)]
    pub position: ZodiacPosition,
    /// Degrees per day
    pub speed: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartAngles {
    pub ascendant: ChartAngle,
    pub midheaven: ChartAngle,
    pub descendant: ChartAngle,
    pub imum_coeli: ChartAngle,
}

/// Counts of the hard aspects to the Sun.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AspectSummary {
    pub squares: usize,
    pub oppositions: usize,
    pub total: usize,
}

/// Read-only Sun-centred projection of a chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolarSet {
    pub sun_sign: ZodiacSign,
    pub sun_house: u8,
    /// Degrees within the sign, [0, 30)
    pub sun_degree: f64,
    pub sun_position: String,
    pub fifth_house_sign: ZodiacSign,
    /// Squares and oppositions involving the Sun
    pub hard_aspects: Vec<Aspect>,
    pub aspect_summary: AspectSummary,
    /// `SunSign_FifthSign_Count`, e.g. `Aries_Leo_2`
    pub interpretation_key: String,
}

impl SolarSet {
    pub fn has_hard_aspects(&self) -> bool {
        !self.hard_aspects.is_empty()
    }
}

/// Immutable result of one calculation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartResult {
    pub(crate) input: BirthInput,
    pub(crate) bodies: Vec<CelestialBody>,
    pub(crate) cusps: Vec<HouseCusp>,
    pub(crate) angles: ChartAngles,
    pub(crate) aspects: Vec<Aspect>,
    pub(crate) solar_set: SolarSet,
    pub(crate) house_system_requested: HouseSystem,
    pub(crate) house_system_used: HouseSystem,
    pub(crate) fallback_occurred: bool,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub(crate) fallback: Option<HouseFallback>,
    pub(crate) ephemeris: String,
    pub(crate) calculated_at: DateTime<Utc>,
}

impl ChartResult {
    pub fn input(&self) -> &BirthInput {
        &self.input
    }

    /// Bodies in canonical order.
    pub fn bodies(&self) -> &[CelestialBody] {
        &self.bodies
    }

    pub fn body(&self, body: Body) -> Option<&CelestialBody> {
        self.bodies.iter().find(|b| b.body == body)
    }

    /// Twelve cusps, cusp 1 first.
    pub fn cusps(&self) -> &[HouseCusp] {
        &self.cusps
    }

    pub fn cusp(&self, number: u8) -> Option<&HouseCusp> {
        self.cusps.iter().find(|c| c.number == number)
    }

    pub fn cusp_longitudes(&self) -> Vec<f64> {
        self.cusps.iter().map(|c| c.longitude).collect()
    }

    pub fn angles(&self) -> &ChartAngles {
        &self.angles
    }

    pub fn aspects(&self) -> &[Aspect] {
        &self.aspects
    }

    pub fn solar_set(&self) -> &SolarSet {
        &self.solar_set
    }

    pub fn house_system_requested(&self) -> HouseSystem {
        self.house_system_requested
    }

    pub fn house_system_used(&self) -> HouseSystem {
        self.house_system_used
    }

    pub fn fallback_occurred(&self) -> bool {
        self.fallback_occurred
    }

    pub fn fallback(&self) -> Option<&HouseFallback> {
        self.fallback.as_ref()
    }

    /// Name of the ephemeris provider that supplied positions.
    pub fn ephemeris(&self) -> &str {
        &self.ephemeris
    }

    pub fn calculated_at(&self) -> DateTime<Utc> {
        self.calculated_at
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
