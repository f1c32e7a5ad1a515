//! Natal chart calculation: body positions, houses, aspects, dignities and a
//! deterministic SVG wheel.
//!
//! ```no_run
//! use chrono::{TimeZone, Utc};
//! use urania::{calculate_chart, BirthInput, ChartConfig};
//!
//! let instant = Utc.with_ymd_and_hms(1990, 4, 15, 18, 30, 0).unwrap();
//! let input = BirthInput::new(instant, 40.7128, -74.006, None).unwrap();
//! let chart = calculate_chart(&input, &ChartConfig::default()).unwrap();
//! println!("{}", chart.solar_set().interpretation_key);
//! ```

pub mod aspects;
pub mod chart;
pub mod ephemeris;
pub mod error;
pub mod houses;
pub mod rendering;
pub mod western;

pub use aspects::{Aspect, AspectDetector, AspectType};
pub use chart::{
    calculate_chart, CalculationStage, ChartArtifacts, ChartConfig, ChartEngine, ChartResult,
    ChartService, NodeMode, SolarSet,
};
pub use ephemeris::{AnalyticEphemeris, BirthInput, Body, EphemerisProvider, FixedEphemeris};
pub use error::ChartError;
pub use houses::{HouseSystem, HouseSystemCalculator};
pub use rendering::{ChartRenderer, RenderSettings, RenderedChart};
pub use western::{Dignity, ZodiacSign};
