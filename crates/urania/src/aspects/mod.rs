pub mod calculator;
pub mod types;

pub use calculator::AspectDetector;
pub use types::{
    AngleKind, Aspect, AspectPoint, AspectPointPosition, AspectQuality, AspectSettings,
    AspectType, PairCategory,
};
