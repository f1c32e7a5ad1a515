pub mod assembler;
pub mod engine;
pub mod service;
pub mod settings;
pub mod types;

pub use assembler::{ChartAssembler, ChartParts};
pub use engine::{calculate_chart, CalculationStage, ChartEngine};
pub use service::{ChartArtifacts, ChartService};
pub use settings::{ChartConfig, NodeMode, MAX_ORB_OVERRIDE};
pub use types::{
    AspectSummary, CelestialBody, ChartAngle, ChartAngles, ChartResult, HouseCusp, SolarSet,
};
