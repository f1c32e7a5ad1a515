use chrono::{DateTime, Utc};
use log::debug;

use crate::aspects::types::{Aspect, AspectPoint, AspectQuality, AspectType};
use crate::chart::types::{
    AspectSummary, CelestialBody, ChartAngles, ChartResult, HouseCusp, SolarSet,
};
use crate::ephemeris::types::{BirthInput, Body};
use crate::error::ChartError;
use crate::houses::{HouseFallback, HouseSystem};

/// Everything the pipeline produced, before validation.
#[derive(Debug, Clone)]
pub struct ChartParts {
    pub input: BirthInput,
    pub requested_bodies: Vec<Body>,
    pub bodies: Vec<CelestialBody>,
    pub cusps: Vec<HouseCusp>,
    pub angles: ChartAngles,
    pub aspects: Vec<Aspect>,
    pub house_system_requested: HouseSystem,
    pub house_system_used: HouseSystem,
    pub fallback: Option<HouseFallback>,
    pub ephemeris: String,
    pub calculated_at: DateTime<Utc>,
}

/// Aggregates computed parts into a [`ChartResult`].
///
/// Performs no astronomy: it only checks completeness and derives the
/// [`SolarSet`] from what it was given.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChartAssembler;

impl ChartAssembler {
    pub fn new() -> Self {
        Self
    }

    pub fn assemble(&self, parts: ChartParts) -> Result<ChartResult, ChartError> {
        let mut missing: Vec<String> = parts
            .requested_bodies
            .iter()
            .filter(|body| !parts.bodies.iter().any(|b| b.body == **body))
            .map(|body| body.name().to_string())
            .collect();
        for number in 1..=12u8 {
            let present = parts
                .cusps
                .get(number as usize - 1)
                .map(|c| c.number == number)
                .unwrap_or(false);
            if !present {
                missing.push(format!("cusp {}", number));
            }
        }
        if parts.cusps.len() > 12 {
            missing.push(format!("exactly 12 cusps (got {})", parts.cusps.len()));
        }
        if !missing.is_empty() {
            return Err(ChartError::IncompleteChart { missing });
        }

        let solar_set = solar_set(&parts.bodies, &parts.cusps, &parts.aspects)?;
        debug!("Solar set: {}", solar_set.interpretation_key);

        Ok(ChartResult {
            fallback_occurred: parts.fallback.is_some(),
            input: parts.input,
            bodies: parts.bodies,
            cusps: parts.cusps,
            angles: parts.angles,
            aspects: parts.aspects,
            solar_set,
            house_system_requested: parts.house_system_requested,
            house_system_used: parts.house_system_used,
            fallback: parts.fallback,
            ephemeris: parts.ephemeris,
            calculated_at: parts.calculated_at,
        })
    }
}

fn solar_set(
    bodies: &[CelestialBody],
    cusps: &[HouseCusp],
    aspects: &[Aspect],
) -> Result<SolarSet, ChartError> {
    let incomplete = |what: &str| ChartError::IncompleteChart {
        missing: vec![what.to_string()],
    };
    let sun = bodies
        .iter()
        .find(|b| b.body == Body::Sun)
        .ok_or_else(|| incomplete("Sun"))?;
    let fifth = cusps.get(4).ok_or_else(|| incomplete("cusp 5"))?;

    let sun_point = AspectPoint::Body(Body::Sun);
    let hard_aspects: Vec<Aspect> = aspects
        .iter()
        .filter(|a| a.involves(sun_point) && a.quality() == AspectQuality::Hard)
        .cloned()
        .collect();
    let count = |t: AspectType| hard_aspects.iter().filter(|a| a.aspect_type == t).count();
    let aspect_summary = AspectSummary {
        squares: count(AspectType::Square),
        oppositions: count(AspectType::Opposition),
        total: hard_aspects.len(),
    };

    Ok(SolarSet {
        sun_sign: sun.sign(),
        sun_house: sun.house,
        sun_degree: sun.position.degree_in_sign(),
        sun_position: format!("{} in house {}", sun.formatted_position(), sun.house),
        fifth_house_sign: fifth.sign(),
        interpretation_key: format!(
            "{}_{}_{}",
            sun.sign().name(),
            fifth.sign().name(),
            aspect_summary.total
        ),
        hard_aspects,
        aspect_summary,
    })
}
