//! Essential dignities for Western astrology.
//!
//! Domicile follows the traditional rulers plus the modern rulers of the
//! outer planets; detriment is the sign opposite a domicile and fall the sign
//! opposite the exaltation.

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::ephemeris::types::Body;
use crate::western::rulers::ruled_signs;
use crate::western::signs::ZodiacSign;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dignity {
    Domicile,
    Exaltation,
    Detriment,
    Fall,
}

impl Dignity {
    pub fn name(&self) -> &'static str {
        match self {
            Dignity::Domicile => "domicile",
            Dignity::Exaltation => "exaltation",
            Dignity::Detriment => "detriment",
            Dignity::Fall => "fall",
        }
    }
}

impl fmt::Display for Dignity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone)]
struct DignityTable {
    domicile: Vec<ZodiacSign>,
    exaltation: Option<(ZodiacSign, f64)>,
}

// Sign of exaltation and its exact degree
const EXALTATIONS: &[(Body, ZodiacSign, f64)] = &[
    (Body::Sun, ZodiacSign::Aries, 19.0),
    (Body::Moon, ZodiacSign::Taurus, 3.0),
    (Body::Mercury, ZodiacSign::Virgo, 15.0),
    (Body::Venus, ZodiacSign::Pisces, 27.0),
    (Body::Mars, ZodiacSign::Capricorn, 28.0),
    (Body::Jupiter, ZodiacSign::Cancer, 15.0),
    (Body::Saturn, ZodiacSign::Libra, 21.0),
    (Body::Pluto, ZodiacSign::Aries, 0.0),
];

lazy_static! {
    static ref DIGNITY_TABLES: HashMap<Body, DignityTable> = {
        let mut tables = HashMap::new();
        for body in Body::CLASSICAL {
            let exaltation = EXALTATIONS
                .iter()
                .find(|(b, _, _)| *b == body)
                .map(|(_, sign, degree)| (*sign, *degree));
            tables.insert(
                body,
                DignityTable {
                    domicile: ruled_signs(body),
                    exaltation,
                },
            );
        }
        tables
    };
}

/// Every dignity `body` holds in `sign`, strongest first.
pub fn dignities_in(body: Body, sign: ZodiacSign) -> Vec<Dignity> {
    let table = match DIGNITY_TABLES.get(&body) {
        Some(table) => table,
        None => return Vec::new(),
    };
    let mut result = Vec::new();
    if table.domicile.contains(&sign) {
        result.push(Dignity::Domicile);
    }
    if let Some((exalted, _)) = table.exaltation {
        if exalted == sign {
            result.push(Dignity::Exaltation);
        }
    }
    if table.domicile.iter().any(|s| s.opposite() == sign) {
        result.push(Dignity::Detriment);
    }
    if let Some((exalted, _)) = table.exaltation {
        if exalted.opposite() == sign {
            result.push(Dignity::Fall);
        }
    }
    result
}

/// Exact exaltation degree within its sign, if the body has one.
pub fn exaltation_degree(body: Body) -> Option<(ZodiacSign, f64)> {
    DIGNITY_TABLES.get(&body).and_then(|t| t.exaltation)
}

/// Labels a body's essential dignity from its sign.
#[derive(Debug, Clone, Copy, Default)]
pub struct DignityEvaluator;

impl DignityEvaluator {
    pub fn new() -> Self {
        Self
    }

    /// Single label: domicile, then exaltation, then detriment, then fall.
    pub fn evaluate(&self, body: Body, sign: ZodiacSign) -> Option<Dignity> {
        dignities_in(body, sign).into_iter().next()
    }
}
