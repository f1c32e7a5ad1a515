pub mod angles;
pub mod assign;
pub mod systems;

pub use angles::{arc_forward, AngleLongitudes, HouseFrame};
pub use assign::HouseAssigner;
pub use systems::{
    HouseComputation, HouseFallback, HouseSystem, HouseSystemCalculator, HouseSystemFailure,
};
