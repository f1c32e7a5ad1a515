use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::ephemeris::types::Body;

/// Aspect types, in order of increasing exact angle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AspectType {
    Conjunction,
    Semisquare,
    Sextile,
    Square,
    Trine,
    Sesquiquadrate,
    Quincunx,
    Opposition,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AspectQuality {
    Hard,
    Soft,
    Neutral,
    Minor,
}

/// (type, name, exact angle, default orb, symbol)
const ASPECT_TABLE: &[(AspectType, &str, f64, f64, &str)] = &[
    (AspectType::Conjunction, "conjunction", 0.0, 8.0, "☌"),
    (AspectType::Semisquare, "semisquare", 45.0, 3.0, "∠"),
    (AspectType::Sextile, "sextile", 60.0, 6.0, "⚹"),
    (AspectType::Square, "square", 90.0, 7.0, "□"),
    (AspectType::Trine, "trine", 120.0, 8.0, "△"),
    (AspectType::Sesquiquadrate, "sesquiquadrate", 135.0, 3.0, "⚼"),
    (AspectType::Quincunx, "quincunx", 150.0, 3.0, "⚻"),
    (AspectType::Opposition, "opposition", 180.0, 8.0, "☍"),
];

impl AspectType {
    pub const ALL: [AspectType; 8] = [
        AspectType::Conjunction,
        AspectType::Semisquare,
        AspectType::Sextile,
        AspectType::Square,
        AspectType::Trine,
        AspectType::Sesquiquadrate,
        AspectType::Quincunx,
        AspectType::Opposition,
    ];

    fn entry(&self) -> &'static (AspectType, &'static str, f64, f64, &'static str) {
        &ASPECT_TABLE[*self as usize]
    }

    pub fn name(&self) -> &'static str {
        self.entry().1
    }

    pub fn angle(&self) -> f64 {
        self.entry().2
    }

    pub fn default_orb(&self) -> f64 {
        self.entry().3
    }

    pub fn symbol(&self) -> &'static str {
        self.entry().4
    }

    pub fn is_major(&self) -> bool {
        matches!(
            self,
            AspectType::Conjunction
                | AspectType::Sextile
                | AspectType::Square
                | AspectType::Trine
                | AspectType::Opposition
        )
    }

    pub fn quality(&self) -> AspectQuality {
        match self {
            AspectType::Square | AspectType::Opposition => AspectQuality::Hard,
            AspectType::Trine | AspectType::Sextile => AspectQuality::Soft,
            AspectType::Conjunction => AspectQuality::Neutral,
            _ => AspectQuality::Minor,
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        let key = name.trim().to_lowercase();
        ASPECT_TABLE
            .iter()
            .find(|(_, n, _, _, _)| *n == key)
            .map(|(t, _, _, _, _)| *t)
    }

    pub fn names() -> Vec<&'static str> {
        ASPECT_TABLE.iter().map(|(_, n, _, _, _)| *n).collect()
    }
}

impl fmt::Display for AspectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The two angles that may take part in aspect detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AngleKind {
    Ascendant,
    Midheaven,
}

/// Anything an aspect can connect. Bodies order before angles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AspectPoint {
    Body(Body),
    Angle(AngleKind),
}

impl AspectPoint {
    pub fn name(&self) -> &'static str {
        match self {
            AspectPoint::Body(body) => body.name(),
            AspectPoint::Angle(AngleKind::Ascendant) => "Ascendant",
            AspectPoint::Angle(AngleKind::Midheaven) => "Midheaven",
        }
    }

    pub fn body(&self) -> Option<Body> {
        match self {
            AspectPoint::Body(body) => Some(*body),
            AspectPoint::Angle(_) => None,
        }
    }

    fn is_sensitive_point(&self) -> bool {
        match self {
            AspectPoint::Body(body) => body.is_point(),
            AspectPoint::Angle(_) => true,
        }
    }
}

impl From<Body> for AspectPoint {
    fn from(body: Body) -> Self {
        AspectPoint::Body(body)
    }
}

/// Orb scaling class of a pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PairCategory {
    Luminary,
    Personal,
    Outer,
    Point,
}

impl PairCategory {
    /// Checked in order: point, luminary, outer, personal.
    pub fn of(a: AspectPoint, b: AspectPoint) -> Self {
        if a.is_sensitive_point() || b.is_sensitive_point() {
            return PairCategory::Point;
        }
        let (a, b) = match (a.body(), b.body()) {
            (Some(a), Some(b)) => (a, b),
            _ => return PairCategory::Point,
        };
        if a.is_luminary() || b.is_luminary() {
            PairCategory::Luminary
        } else if a.is_outer() && b.is_outer() {
            PairCategory::Outer
        } else {
            PairCategory::Personal
        }
    }

    pub fn factor(&self) -> f64 {
        match self {
            PairCategory::Luminary | PairCategory::Personal => 1.0,
            PairCategory::Outer => 0.75,
            PairCategory::Point => 0.5,
        }
    }
}

/// Position of one aspect participant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AspectPointPosition {
    pub point: AspectPoint,
    pub longitude: f64,
    /// Degrees per day
    pub speed: f64,
}

/// An aspect between an ordered pair (`first` sorts before `second`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Aspect {
    pub first: AspectPoint,
    pub second: AspectPoint,
    pub aspect_type: AspectType,
    pub category: PairCategory,
    /// Shortest angular distance, [0, 180]
    pub separation: f64,
    /// separation - exact angle
    pub orb: f64,
    /// Largest |orb| this pair was allowed
    pub max_orb: f64,
    pub is_applying: bool,
}

impl Aspect {
    pub fn quality(&self) -> AspectQuality {
        self.aspect_type.quality()
    }

    pub fn involves(&self, point: AspectPoint) -> bool {
        self.first == point || self.second == point
    }

    /// The participant that is not `point`, if `point` takes part.
    pub fn other(&self, point: AspectPoint) -> Option<AspectPoint> {
        if self.first == point {
            Some(self.second)
        } else if self.second == point {
            Some(self.first)
        } else {
            None
        }
    }
}

/// Settings for aspect calculations
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AspectSettings {
    /// Replaces the default base orb for a type
    pub orb_overrides: BTreeMap<AspectType, f64>,
    pub include_minor: bool,
}

impl AspectSettings {
    pub fn base_orb(&self, aspect_type: AspectType) -> f64 {
        self.orb_overrides
            .get(&aspect_type)
            .copied()
            .unwrap_or_else(|| aspect_type.default_orb())
    }

    pub fn max_orb(&self, aspect_type: AspectType, category: PairCategory) -> f64 {
        self.base_orb(aspect_type) * category.factor()
    }

    /// Enabled types in angle order.
    pub fn enabled_types(&self) -> impl Iterator<Item = AspectType> + '_ {
        AspectType::ALL
            .into_iter()
            .filter(move |t| self.include_minor || t.is_major())
    }
}
