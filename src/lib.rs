//! `skypane` - city weather lookup with a terminal view
//!
//! This library geocodes a city name, fetches its forecast from Open-Meteo,
//! and turns the result into unit-aware view-models plus an ambient backdrop
//! scene keyed to the current conditions.

pub mod ambient;
pub mod classify;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod orchestrator;
pub mod render;
pub mod report;
pub mod tui;
pub mod units;
pub mod weather;

// Re-export core types for public API
pub use ambient::{AmbientController, AmbientGroup, AmbientScene, AmbientSurface, GroupState};
pub use classify::{Classification, WeatherCategory};
pub use config::SkypaneConfig;
pub use error::{ErrorCode, SkypaneError};
pub use models::{CurrentConditions, DailySample, HourlySample, Location, WeatherSnapshot};
pub use orchestrator::{AppState, Completion, CurrentPair, DisplayState, FetchPhase, SearchTicket, WeatherOrchestrator};
pub use render::{ForecastViews, render};
pub use units::DisplayUnit;
pub use weather::{ForecastProvider, Geocoder, OpenMeteoClient};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, SkypaneError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
