//! The calculation pipeline for one chart request.
//!
//! `Received -> EphemerisResolved -> HousesComputed -> BodiesAssigned ->
//! AspectsComputed -> Assembled`, with rendering handled by the caller or
//! [`crate::chart::service::ChartService`]. Any stage may fail; a failure is
//! terminal and no partial result escapes.

use chrono::Utc;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::aspects::calculator::AspectDetector;
use crate::aspects::types::{AngleKind, AspectPoint, AspectPointPosition};
use crate::chart::assembler::{ChartAssembler, ChartParts};
use crate::chart::settings::ChartConfig;
use crate::chart::types::{CelestialBody, ChartAngle, ChartAngles, ChartResult, HouseCusp};
use crate::ephemeris::analytic::AnalyticEphemeris;
use crate::ephemeris::provider::EphemerisProvider;
use crate::ephemeris::time::normalize_degrees;
use crate::ephemeris::types::{BirthInput, Body, RawPosition};
use crate::error::ChartError;
use crate::houses::{AngleLongitudes, HouseAssigner, HouseFrame, HouseSystemCalculator};
use crate::western::dignities::DignityEvaluator;
use crate::western::signs::{is_retrograde, ZodiacPosition};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalculationStage {
    Received,
    EphemerisResolved,
    HousesComputed,
    BodiesAssigned,
    AspectsComputed,
    Assembled,
    Rendered,
    Completed,
}

/// Wall-clock budget checked between stages.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Deadline {
    started: Instant,
    budget: Option<Duration>,
}

impl Deadline {
    pub(crate) fn start(budget: Option<Duration>) -> Self {
        Self {
            started: Instant::now(),
            budget,
        }
    }

    pub(crate) fn check(&self, stage: CalculationStage) -> Result<(), ChartError> {
        debug!("Stage {:?} reached after {:?}", stage, self.started.elapsed());
        match self.budget {
            Some(budget) if self.started.elapsed() > budget => Err(ChartError::ComputationTimeout {
                stage,
                budget_ms: budget.as_millis(),
            }),
            _ => Ok(()),
        }
    }
}

/// Natal chart engine bound to one ephemeris provider.
///
/// Holds no per-request state; share it freely across threads.
#[derive(Clone)]
pub struct ChartEngine {
    provider: Arc<dyn EphemerisProvider>,
    houses: HouseSystemCalculator,
    dignities: DignityEvaluator,
    assembler: ChartAssembler,
}

impl ChartEngine {
    pub fn new(provider: Arc<dyn EphemerisProvider>) -> Self {
        Self {
            provider,
            houses: HouseSystemCalculator::new(),
            dignities: DignityEvaluator::new(),
            assembler: ChartAssembler::new(),
        }
    }

    pub fn provider(&self) -> &dyn EphemerisProvider {
        self.provider.as_ref()
    }

    /// Compute a complete chart or fail with the first terminal error.
    pub fn calculate(&self, input: &BirthInput, config: &ChartConfig) -> Result<ChartResult, ChartError> {
        self.calculate_within(input, config, &Deadline::start(config.time_budget))
    }

    pub(crate) fn calculate_within(
        &self,
        input: &BirthInput,
        config: &ChartConfig,
        deadline: &Deadline,
    ) -> Result<ChartResult, ChartError> {
        let result = self.run(input, config, deadline);
        match &result {
            Ok(chart) => info!(
                "Chart computed for {} ({}{})",
                input.instant(),
                chart.house_system_used(),
                if chart.fallback_occurred() { ", fallback" } else { "" }
            ),
            Err(err) => warn!("Chart calculation failed for {}: {}", input.instant(), err),
        }
        result
    }

    fn run(&self, input: &BirthInput, config: &ChartConfig, deadline: &Deadline) -> Result<ChartResult, ChartError> {
        config.validate()?;
        deadline.check(CalculationStage::Received)?;

        let requested = config.bodies();
        let raw = self.resolve_positions(input, &requested)?;
        deadline.check(CalculationStage::EphemerisResolved)?;

        let frame = HouseFrame::at(input.instant(), input.location());
        let houses = self.houses.compute(config.house_system, &frame);
        let angle_lons = AngleLongitudes::at(input.instant(), input.location());
        deadline.check(CalculationStage::HousesComputed)?;

        let assigner = HouseAssigner::new(&houses.cusps);
        let bodies: Vec<CelestialBody> = raw
            .iter()
            .map(|(body, pos)| {
                let longitude = normalize_degrees(pos.longitude);
                let position = ZodiacPosition::from_longitude(longitude);
                CelestialBody {
                    body: *body,
                    longitude,
                    latitude: pos.latitude,
                    speed: pos.speed,
                    distance: pos.distance,
                    position,
                    house: assigner.house_of(longitude),
                    is_retrograde: is_retrograde(pos.speed),
                    dignity: self.dignities.evaluate(*body, position.sign),
                }
            })
            .collect();
        let cusps: Vec<HouseCusp> = houses
            .cusps
            .iter()
            .enumerate()
            .map(|(i, lon)| HouseCusp {
                number: i as u8 + 1,
                longitude: *lon,
                position: ZodiacPosition::from_longitude(*lon),
            })
            .collect();
        deadline.check(CalculationStage::BodiesAssigned)?;

        let mut points: Vec<AspectPointPosition> = bodies
            .iter()
            .map(|b| AspectPointPosition {
                point: AspectPoint::Body(b.body),
                longitude: b.longitude,
                speed: b.speed,
            })
            .collect();
        if config.include_angles_in_aspects {
            points.push(AspectPointPosition {
                point: AspectPoint::Angle(AngleKind::Ascendant),
                longitude: angle_lons.ascendant,
                speed: angle_lons.ascendant_speed,
            });
            points.push(AspectPointPosition {
                point: AspectPoint::Angle(AngleKind::Midheaven),
                longitude: angle_lons.midheaven,
                speed: angle_lons.midheaven_speed,
            });
        }
        let aspects = AspectDetector::new(config.aspect_settings()).detect(&points);
        deadline.check(CalculationStage::AspectsComputed)?;

        let chart = self.assembler.assemble(ChartParts {
            input: input.clone(),
            requested_bodies: requested,
            bodies,
            cusps,
            angles: chart_angles(&angle_lons),
            aspects,
            house_system_requested: config.house_system,
            house_system_used: houses.system_used,
            fallback: houses.fallback,
            ephemeris: self.provider.name().to_string(),
            calculated_at: Utc::now(),
        })?;
        deadline.check(CalculationStage::Assembled)?;
        Ok(chart)
    }

    /// Raw positions in request order. The South Node is derived from
    /// whichever node precedes it and is never queried.
    fn resolve_positions(
        &self,
        input: &BirthInput,
        requested: &[Body],
    ) -> Result<Vec<(Body, RawPosition)>, ChartError> {
        let instant = input.instant();
        self.provider.check_range(instant)?;

        let mut resolved: Vec<(Body, RawPosition)> = Vec::with_capacity(requested.len());
        for body in requested {
            let pos = match body {
                Body::SouthNode => {
                    let node = resolved
                        .iter()
                        .find(|(b, _)| matches!(b, Body::MeanNode | Body::TrueNode))
                        .map(|(_, p)| *p)
                        .ok_or_else(|| ChartError::IncompleteChart {
                            missing: vec!["lunar node for South Node".to_string()],
                        })?;
                    RawPosition {
                        longitude: normalize_degrees(node.longitude + 180.0),
                        latitude: -node.latitude,
                        distance: node.distance,
                        speed: node.speed,
                    }
                }
                other => self.provider.position_at(instant, *other)?,
            };
            if !pos.longitude.is_finite() || !pos.speed.is_finite() {
                return Err(ChartError::Ephemeris(format!(
                    "{} returned a non-finite position for {}",
                    self.provider.name(),
                    body
                )));
            }
            resolved.push((*body, pos));
        }
        debug!("Resolved {} positions from {}", resolved.len(), self.provider.name());
        Ok(resolved)
    }
}

impl Default for ChartEngine {
    fn default() -> Self {
        Self::new(Arc::new(AnalyticEphemeris::new()))
    }
}

fn chart_angle(longitude: f64, speed: f64) -> ChartAngle {
    ChartAngle {
        longitude,
        position: ZodiacPosition::from_longitude(longitude),
        speed,
    }
}

fn chart_angles(lons: &AngleLongitudes) -> ChartAngles {
    ChartAngles {
        ascendant: chart_angle(lons.ascendant, lons.ascendant_speed),
        midheaven: chart_angle(lons.midheaven, lons.midheaven_speed),
        descendant: chart_angle(lons.descendant, lons.ascendant_speed),
        imum_coeli: chart_angle(lons.imum_coeli, lons.midheaven_speed),
    }
}

/// Calculate a chart with the built-in analytic ephemeris.
pub fn calculate_chart(input: &BirthInput, config: &ChartConfig) -> Result<ChartResult, ChartError> {
    ChartEngine::default().calculate(input, config)
}
