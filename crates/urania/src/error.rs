use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::chart::engine::CalculationStage;
use crate::ephemeris::EphemerisError;

/// Errors that terminate a chart calculation request.
///
/// A house-system convergence failure is not listed here: it is recorded on
/// the result as [`crate::houses::HouseFallback`] and the request continues.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ChartError {
    #[error("Invalid birth input: {message}")]
    InvalidBirthInput { message: String },
    #[error("Invalid chart configuration: {message}")]
    InvalidConfiguration { message: String },
    #[error("Ephemeris range exceeded: {instant} is outside {min} .. {max}")]
    EphemerisRangeExceeded {
        instant: DateTime<Utc>,
        min: DateTime<Utc>,
        max: DateTime<Utc>,
    },
    #[error("Ephemeris failure: {0}")]
    Ephemeris(String),
    #[error("Incomplete chart, missing: {missing:?}")]
    IncompleteChart { missing: Vec<String> },
    #[error("Computation exceeded its {budget_ms} ms budget at stage {stage:?}")]
    ComputationTimeout {
        stage: CalculationStage,
        budget_ms: u128,
    },
    #[error("Chart worker failed: {0}")]
    Internal(String),
}

impl ChartError {
    pub(crate) fn invalid_input(message: impl Into<String>) -> Self {
        ChartError::InvalidBirthInput {
            message: message.into(),
        }
    }

    pub(crate) fn invalid_config(message: impl Into<String>) -> Self {
        ChartError::InvalidConfiguration {
            message: message.into(),
        }
    }
}

impl From<EphemerisError> for ChartError {
    fn from(err: EphemerisError) -> Self {
        match err {
            EphemerisError::RangeExceeded { instant, min, max } => {
                ChartError::EphemerisRangeExceeded { instant, min, max }
            }
            other => ChartError::Ephemeris(other.to_string()),
        }
    }
}
