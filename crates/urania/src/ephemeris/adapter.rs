use chrono::{DateTime, Datelike, Timelike, Utc};
use std::env;
use std::path::PathBuf;
use log::debug;
use swisseph::swe::{calc_ut, julday, set_ephe_path};

use crate::ephemeris::provider::{EphemerisError, EphemerisProvider};
use crate::ephemeris::time::utc_year_start;
use crate::ephemeris::types::{Body, RawPosition};

// Swiss Ephemeris body numbers
const PLANET_IDS: &[(Body, i32)] = &[
    (Body::Sun, 0),
    (Body::Moon, 1),
    (Body::Mercury, 2),
    (Body::Venus, 3),
    (Body::Mars, 4),
    (Body::Jupiter, 5),
    (Body::Saturn, 6),
    (Body::Uranus, 7),
    (Body::Neptune, 8),
    (Body::Pluto, 9),
    (Body::MeanNode, 10),
    (Body::TrueNode, 11),
    (Body::Lilith, 12), // MEAN_APOG
    (Body::Chiron, 15),
];

/// FLG_SWIEPH | FLG_SPEED
const CALC_FLAGS: i32 = 2 | 256;

/// Swiss Ephemeris backed provider.
///
/// Range defaults to the span of the standard `sepl_18`/`semo_18` files.
pub struct SwissEphemerisAdapter {
    ephemeris_path: PathBuf,
    min: DateTime<Utc>,
    max: DateTime<Utc>,
}

impl SwissEphemerisAdapter {
    /// Create a new adapter with optional ephemeris path
    pub fn new(ephemeris_path: Option<PathBuf>) -> Result<Self, EphemerisError> {
        let path = ephemeris_path.unwrap_or_else(|| {
            env::var("SWISS_EPHEMERIS_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("/usr/local/share/swisseph"))
        });

        if !path.exists() {
            return Err(EphemerisError::FileNotFound {
                path: path.display().to_string(),
                message: "Ephemeris path does not exist. Please ensure Swiss Ephemeris data files are installed.".to_string(),
            });
        }

        set_ephe_path(&path.to_string_lossy());
        debug!("Swiss Ephemeris data path set to {}", path.display());

        Ok(Self {
            ephemeris_path: path,
            min: utc_year_start(1800),
            max: utc_year_start(2400),
        })
    }

    pub fn ephemeris_path(&self) -> &PathBuf {
        &self.ephemeris_path
    }
}

impl EphemerisProvider for SwissEphemerisAdapter {
    fn name(&self) -> &str {
        "swisseph"
    }

    fn supported_range(&self) -> (DateTime<Utc>, DateTime<Utc>) {
        (self.min, self.max)
    }

    fn position_at(&self, instant: DateTime<Utc>, body: Body) -> Result<RawPosition, EphemerisError> {
        self.check_range(instant)?;
        let code = PLANET_IDS
            .iter()
            .find(|(b, _)| *b == body)
            .map(|(_, code)| *code)
            .ok_or(EphemerisError::UnsupportedBody { body })?;

        let result = calc_ut(datetime_to_julian_day(instant), code as u32, CALC_FLAGS as u32)
            .map_err(|e| EphemerisError::CalculationFailed {
                body,
                instant,
                message: format!("Swiss Ephemeris error: {}", e),
            })?;

        let out = result.out;
        Ok(RawPosition {
            longitude: out[0],
            latitude: out[1],
            distance: out[2],
            speed: out[3],
        })
    }
}

/// Convert UTC datetime to Julian Day
fn datetime_to_julian_day(dt: DateTime<Utc>) -> f64 {
    let hour_decimal = dt.hour() as f64
        + dt.minute() as f64 / 60.0
        + (dt.second() as f64 + dt.nanosecond() as f64 * 1e-9) / 3600.0;
    // GREG_CAL = 1
    julday(dt.year(), dt.month() as i32, dt.day() as i32, hour_decimal, 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_data_directory_is_rejected() {
        let missing = PathBuf::from("/nonexistent/urania/ephe");
        match SwissEphemerisAdapter::new(Some(missing)) {
            Err(EphemerisError::FileNotFound { path, .. }) => assert!(path.contains("urania")),
            other => panic!("unexpected {:?}", other.map(|a| a.ephemeris_path().clone())),
        }
    }

    #[test]
    fn test_configured_data_directory_is_kept() {
        let dir = env::temp_dir();
        let adapter = SwissEphemerisAdapter::new(Some(dir.clone())).unwrap();
        assert_eq!(adapter.ephemeris_path(), &dir);
        assert_eq!(adapter.name(), "swisseph");
    }
}
