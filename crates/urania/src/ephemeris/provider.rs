use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

use crate::ephemeris::time::utc_year_start;
use crate::ephemeris::types::{Body, RawPosition};

/// Errors that can occur while resolving a body position
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EphemerisError {
    #[error("Instant {instant} is outside the supported range {min} .. {max}")]
    RangeExceeded {
        instant: DateTime<Utc>,
        min: DateTime<Utc>,
        max: DateTime<Utc>,
    },
    #[error("Body {body} is not available from this provider")]
    UnsupportedBody { body: Body },
    #[error("Ephemeris file not found at path: {path}. {message}")]
    FileNotFound { path: String, message: String },
    #[error("Failed to calculate position for {body} at {instant}: {message}")]
    CalculationFailed {
        body: Body,
        instant: DateTime<Utc>,
        message: String,
    },
}

/// Source of raw ecliptic positions.
///
/// Implementations must be safe for concurrent reads; the engine calls
/// `position_at` from many requests at once without locking.
pub trait EphemerisProvider: Send + Sync {
    /// Short identifier used in logs.
    fn name(&self) -> &str;

    /// Inclusive lower and exclusive upper bound of supported instants.
    fn supported_range(&self) -> (DateTime<Utc>, DateTime<Utc>);

    fn position_at(&self, instant: DateTime<Utc>, body: Body) -> Result<RawPosition, EphemerisError>;

    fn check_range(&self, instant: DateTime<Utc>) -> Result<(), EphemerisError> {
        let (min, max) = self.supported_range();
        if instant < min || instant >= max {
            return Err(EphemerisError::RangeExceeded { instant, min, max });
        }
        Ok(())
    }
}

impl<P: EphemerisProvider + ?Sized> EphemerisProvider for Arc<P> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn supported_range(&self) -> (DateTime<Utc>, DateTime<Utc>) {
        (**self).supported_range()
    }

    fn position_at(&self, instant: DateTime<Utc>, body: Body) -> Result<RawPosition, EphemerisError> {
        (**self).position_at(instant, body)
    }
}

/// Provider returning the same positions for every instant.
///
/// Useful wherever the engine must run without astronomical data, e.g. when
/// pinning aspects or house placements to known longitudes.
#[derive(Debug, Clone)]
pub struct FixedEphemeris {
    positions: HashMap<Body, RawPosition>,
    min: DateTime<Utc>,
    max: DateTime<Utc>,
}

impl FixedEphemeris {
    pub fn new() -> Self {
        Self {
            positions: HashMap::new(),
            min: utc_year_start(1800),
            max: utc_year_start(2200),
        }
    }

    /// Place a body at `longitude` moving `speed` degrees per day.
    pub fn with_body(mut self, body: Body, longitude: f64, speed: f64) -> Self {
        self.positions.insert(
            body,
            RawPosition {
                longitude,
                latitude: 0.0,
                distance: 1.0,
                speed,
            },
        );
        self
    }

    pub fn with_range(mut self, min: DateTime<Utc>, max: DateTime<Utc>) -> Self {
        self.min = min;
        self.max = max;
        self
    }
}

impl Default for FixedEphemeris {
    fn default() -> Self {
        Self::new()
    }
}

impl EphemerisProvider for FixedEphemeris {
    fn name(&self) -> &str {
        "fixed"
    }

    fn supported_range(&self) -> (DateTime<Utc>, DateTime<Utc>) {
        (self.min, self.max)
    }

    fn position_at(&self, instant: DateTime<Utc>, body: Body) -> Result<RawPosition, EphemerisError> {
        self.check_range(instant)?;
        self.positions
            .get(&body)
            .copied()
            .ok_or(EphemerisError::UnsupportedBody { body })
    }
}
