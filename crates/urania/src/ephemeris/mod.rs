pub mod analytic;
pub mod provider;
pub mod time;
pub mod types;

#[cfg(feature = "swisseph")]
pub mod adapter;

#[cfg(feature = "swisseph")]
pub use adapter::SwissEphemerisAdapter;
pub use analytic::AnalyticEphemeris;
pub use provider::{EphemerisError, EphemerisProvider, FixedEphemeris};
pub use types::{BirthInput, Body, GeoLocation, RawPosition};
