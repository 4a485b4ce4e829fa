//! Weather collaborators
//!
//! The orchestrator only talks to these two traits; `open_meteo` provides the
//! HTTP implementation of both.

use async_trait::async_trait;

use crate::Result;
use crate::models::{Location, WeatherSnapshot};

pub mod open_meteo;

pub use open_meteo::OpenMeteoClient;

/// Resolves a free-text place name to candidate locations, best match first
#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn search(&self, name: &str) -> Result<Vec<Location>>;
}

/// Fetches current, hourly and daily conditions for a coordinate pair
#[async_trait]
pub trait ForecastProvider: Send + Sync {
    async fn forecast(&self, latitude: f64, longitude: f64) -> Result<WeatherSnapshot>;
}
