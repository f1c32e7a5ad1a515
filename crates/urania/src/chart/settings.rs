use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

use crate::aspects::types::{AspectSettings, AspectType};
use crate::ephemeris::types::Body;
use crate::error::ChartError;
use crate::houses::HouseSystem;

/// Largest orb an override may request, in degrees.
pub const MAX_ORB_OVERRIDE: f64 = 30.0;

lazy_static! {
    static ref LANGUAGE_TAG: Regex = Regex::new(r"^(?i)[a-z]{2}(-[a-z]{2})?$").expect("Invalid regex");
}

/// Which lunar node, if any, the chart carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeMode {
    None,
    Mean,
    True,
}

impl NodeMode {
    pub fn body(&self) -> Option<Body> {
        match self {
            NodeMode::None => None,
            NodeMode::Mean => Some(Body::MeanNode),
            NodeMode::True => Some(Body::TrueNode),
        }
    }
}

impl Default for NodeMode {
    fn default() -> Self {
        NodeMode::Mean
    }
}

/// Options for one chart calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    pub house_system: HouseSystem,
    pub include_chiron: bool,
    pub include_lilith: bool,
    pub include_nodes: NodeMode,
    /// Display-label table for collaborators; the engine only emits enum values
    pub language: String,
    pub max_orb_overrides: BTreeMap<AspectType, f64>,
    pub include_minor_aspects: bool,
    pub include_angles_in_aspects: bool,
    /// Wall-clock budget for the whole pipeline
    #[serde(with = "optional_millis")]
    pub time_budget: Option<Duration>,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            house_system: HouseSystem::Placidus,
            include_chiron: true,
            include_lilith: true,
            include_nodes: NodeMode::Mean,
            language: "en".to_string(),
            max_orb_overrides: BTreeMap::new(),
            include_minor_aspects: false,
            include_angles_in_aspects: false,
            time_budget: None,
        }
    }
}

impl ChartConfig {
    pub fn validate(&self) -> Result<(), ChartError> {
        if !LANGUAGE_TAG.is_match(&self.language) {
            return Err(ChartError::invalid_config(format!(
                "language must look like 'en' or 'pt-br', got '{}'",
                self.language
            )));
        }
        for (aspect_type, orb) in &self.max_orb_overrides {
            if !orb.is_finite() || *orb < 0.0 || *orb > MAX_ORB_OVERRIDE {
                return Err(ChartError::invalid_config(format!(
                    "orb override for {} must be within [0, {}], got {}",
                    aspect_type, MAX_ORB_OVERRIDE, orb
                )));
            }
        }
        if let Some(budget) = self.time_budget {
            if budget.is_zero() {
                return Err(ChartError::invalid_config("time budget must be positive"));
            }
        }
        Ok(())
    }

    /// Bodies requested by this configuration, in canonical order.
    pub fn bodies(&self) -> Vec<Body> {
        let mut bodies = Body::CLASSICAL.to_vec();
        if self.include_chiron {
            bodies.push(Body::Chiron);
        }
        if self.include_lilith {
            bodies.push(Body::Lilith);
        }
        if let Some(node) = self.include_nodes.body() {
            bodies.push(node);
            bodies.push(Body::SouthNode);
        }
        bodies
    }

    pub fn aspect_settings(&self) -> AspectSettings {
        AspectSettings {
            orb_overrides: self.max_orb_overrides.clone(),
            include_minor: self.include_minor_aspects,
        }
    }
}

mod optional_millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(d) => serializer.serialize_some(&(d.as_millis() as u64)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Duration>, D::Error> {
        Ok(Option::<u64>::deserialize(deserializer)?.map(Duration::from_millis))
    }
}
