//! Zodiac signs and the coordinate normalizer.
//!
//! Converts a raw ecliptic longitude into sign, degree, minute and second.
//! Seconds are rounded half-up; the result is clamped to 29°59'59" so a
//! longitude never rolls over into the following sign.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::ephemeris::time::normalize_degrees;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZodiacSign {
    Aries,
    Taurus,
    Gemini,
    Cancer,
    Leo,
    Virgo,
    Libra,
    Scorpio,
    Sagittarius,
    Capricorn,
    Aquarius,
    Pisces,
}

const SIGNS: [ZodiacSign; 12] = [
    ZodiacSign::Aries,
    ZodiacSign::Taurus,
    ZodiacSign::Gemini,
    ZodiacSign::Cancer,
    ZodiacSign::Leo,
    ZodiacSign::Virgo,
    ZodiacSign::Libra,
    ZodiacSign::Scorpio,
    ZodiacSign::Sagittarius,
    ZodiacSign::Capricorn,
    ZodiacSign::Aquarius,
    ZodiacSign::Pisces,
];

const SIGN_NAMES: [&str; 12] = [
    "Aries",
    "Taurus",
    "Gemini",
    "Cancer",
    "Leo",
    "Virgo",
    "Libra",
    "Scorpio",
    "Sagittarius",
    "Capricorn",
    "Aquarius",
    "Pisces",
];

impl ZodiacSign {
    pub const ALL: [ZodiacSign; 12] = SIGNS;

    /// Sign at `index`, wrapping modulo 12.
    pub fn from_index(index: usize) -> Self {
        SIGNS[index % 12]
    }

    pub fn from_longitude(longitude: f64) -> Self {
        Self::from_index(sign_index(longitude))
    }

    /// 0 = Aries .. 11 = Pisces
    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn name(&self) -> &'static str {
        SIGN_NAMES[self.index()]
    }

    /// Longitude where the sign begins.
    pub fn start_longitude(&self) -> f64 {
        self.index() as f64 * 30.0
    }

    pub fn opposite(&self) -> Self {
        Self::from_index(self.index() + 6)
    }
}

impl fmt::Display for ZodiacSign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// `floor(longitude / 30) mod 12`
pub fn sign_index(longitude: f64) -> usize {
    let lon = normalize_degrees(longitude);
    ((lon / 30.0).floor() as usize) % 12
}

/// Stationary bodies are not retrograde.
pub fn is_retrograde(speed: f64) -> bool {
    speed < 0.0
}

/// A longitude split into sign and integer degree/minute/second.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZodiacPosition {
    pub sign: ZodiacSign,
    pub degree: u8,
    pub minute: u8,
    pub second: u8,
}

const MAX_SECONDS_IN_SIGN: i64 = 30 * 3600 - 1;

impl ZodiacPosition {
    pub fn from_longitude(longitude: f64) -> Self {
        let lon = normalize_degrees(longitude);
        let index = sign_index(lon);
        let within = lon - index as f64 * 30.0;
        let total = ((within * 3600.0 + 0.5).floor() as i64).clamp(0, MAX_SECONDS_IN_SIGN);
        Self {
            sign: ZodiacSign::from_index(index),
            degree: (total / 3600) as u8,
            minute: ((total % 3600) / 60) as u8,
            second: (total % 60) as u8,
        }
    }

    /// Degrees within the sign, recombined from the integer parts.
    pub fn degree_in_sign(&self) -> f64 {
        self.degree as f64 + self.minute as f64 / 60.0 + self.second as f64 / 3600.0
    }

    /// Absolute longitude recombined from the integer parts.
    pub fn longitude(&self) -> f64 {
        self.sign.start_longitude() + self.degree_in_sign()
    }

    /// `15°32'45" Aries`
    pub fn formatted(&self) -> String {
        format!(
            "{}°{:02}'{:02}\" {}",
            self.degree,
            self.minute,
            self.second,
            self.sign.name()
        )
    }
}
