//! Data models for skypane
//!
//! This module contains the core domain models organized by concern:
//! - Location: the geocoded place a forecast belongs to
//! - Snapshot: current conditions plus hourly and daily samples

pub mod location;
pub mod snapshot;

// Re-export all public types for convenient access
pub use location::Location;
pub use snapshot::{CurrentConditions, DailySample, HourlySample, WeatherSnapshot};
