use chrono::{DateTime, FixedOffset, LocalResult, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ChartError;

/// Celestial bodies the engine knows how to place.
///
/// Declaration order is the canonical chart order: it drives body listing,
/// aspect pair orientation and rendering order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Body {
    Sun,
    Moon,
    Mercury,
    Venus,
    Mars,
    Jupiter,
    Saturn,
    Uranus,
    Neptune,
    Pluto,
    Chiron,
    /// Mean lunar apogee (Black Moon Lilith)
    Lilith,
    MeanNode,
    TrueNode,
    /// Always derived from the selected node, never queried
    SouthNode,
}

impl Body {
    /// The ten bodies every chart carries.
    pub const CLASSICAL: [Body; 10] = [
        Body::Sun,
        Body::Moon,
        Body::Mercury,
        Body::Venus,
        Body::Mars,
        Body::Jupiter,
        Body::Saturn,
        Body::Uranus,
        Body::Neptune,
        Body::Pluto,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Body::Sun => "Sun",
            Body::Moon => "Moon",
            Body::Mercury => "Mercury",
            Body::Venus => "Venus",
            Body::Mars => "Mars",
            Body::Jupiter => "Jupiter",
            Body::Saturn => "Saturn",
            Body::Uranus => "Uranus",
            Body::Neptune => "Neptune",
            Body::Pluto => "Pluto",
            Body::Chiron => "Chiron",
            Body::Lilith => "Lilith",
            Body::MeanNode => "Mean Node",
            Body::TrueNode => "True Node",
            Body::SouthNode => "South Node",
        }
    }

    pub fn is_luminary(&self) -> bool {
        matches!(self, Body::Sun | Body::Moon)
    }

    /// Sensitive points rather than physical bodies.
    pub fn is_point(&self) -> bool {
        matches!(
            self,
            Body::Lilith | Body::MeanNode | Body::TrueNode | Body::SouthNode
        )
    }

    pub fn is_outer(&self) -> bool {
        matches!(
            self,
            Body::Uranus | Body::Neptune | Body::Pluto | Body::Chiron
        )
    }
}

impl fmt::Display for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Geographic location coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoLocation {
    /// Degrees north, [-90, 90]
    pub lat: f64,
    /// Degrees east, [-180, 180]
    pub lon: f64,
}

/// Raw ecliptic position as delivered by an ephemeris provider
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawPosition {
    /// Longitude in degrees (any range; normalized downstream)
    pub longitude: f64,
    /// Latitude in degrees
    pub latitude: f64,
    /// Distance in AU
    pub distance: f64,
    /// Speed in longitude (degrees per day)
    pub speed: f64,
}

/// Birth data entering the engine.
///
/// The instant is already resolved to UTC; the engine never consults a
/// timezone database.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BirthInput {
    instant: DateTime<Utc>,
    location: GeoLocation,
    label: Option<String>,
}

impl BirthInput {
    pub fn new(
        instant: DateTime<Utc>,
        latitude: f64,
        longitude: f64,
        label: Option<String>,
    ) -> Result<Self, ChartError> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(ChartError::invalid_input(format!(
                "latitude must be within [-90, 90], got {}",
                latitude
            )));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(ChartError::invalid_input(format!(
                "longitude must be within [-180, 180], got {}",
                longitude
            )));
        }
        Ok(Self {
            instant,
            location: GeoLocation {
                lat: latitude,
                lon: longitude,
            },
            label,
        })
    }

    /// Resolve a wall-clock time with an already known UTC offset.
    pub fn from_local(
        local: NaiveDateTime,
        offset: FixedOffset,
        latitude: f64,
        longitude: f64,
        label: Option<String>,
    ) -> Result<Self, ChartError> {
        let instant = match offset.from_local_datetime(&local) {
            LocalResult::Single(dt) => dt.with_timezone(&Utc),
            _ => {
                return Err(ChartError::invalid_input(format!(
                    "local time {} with offset {} does not resolve to a single instant",
                    local, offset
                )))
            }
        };
        Self::new(instant, latitude, longitude, label)
    }

    pub fn instant(&self) -> DateTime<Utc> {
        self.instant
    }

    pub fn location(&self) -> GeoLocation {
        self.location
    }

    pub fn latitude(&self) -> f64 {
        self.location.lat
    }

    pub fn longitude(&self) -> f64 {
        self.location.lon
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }
}
