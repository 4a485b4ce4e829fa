//! Weather fetch orchestration
//!
//! `AppState` holds the session: the current (location, snapshot) pair, the
//! selected unit and the fetch phase. `WeatherOrchestrator` runs the two-step
//! geocode-then-forecast lookup against its collaborators.
//!
//! Searches may overlap. Each one takes a [`SearchTicket`] and only the
//! newest ticket's completion is applied, whatever order they finish in.

use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

use crate::classify::WeatherCategory;
use crate::error::ErrorCode;
use crate::models::{Location, WeatherSnapshot};
use crate::render::{self, ForecastViews};
use crate::units::DisplayUnit;
use crate::weather::{ForecastProvider, Geocoder, OpenMeteoClient};
use crate::{Result, SkypaneError};

/// The location and forecast of the last successful search
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurrentPair {
    pub location: Location,
    pub snapshot: WeatherSnapshot,
}

/// Orders searches; higher tickets were issued later
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SearchTicket(u64);

impl SearchTicket {
    #[must_use]
    pub fn sequence(self) -> u64 {
        self.0
    }
}

/// A finished lookup on its way back to the state owner
pub type LookupResult = (SearchTicket, Result<CurrentPair>);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchPhase {
    #[default]
    Idle,
    Loading,
    Shown,
    Failed,
}

/// What happened to a completed search
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Applied,
    /// A newer search was started; the result was dropped
    Stale,
}

/// What the result area should show
#[derive(Debug, Clone, PartialEq)]
pub enum DisplayState {
    Idle,
    Loading,
    Forecast(Box<ForecastViews>),
    Error(String),
}

/// Session state, owned by the UI loop or the one-shot caller
#[derive(Debug, Default)]
pub struct AppState {
    current: Option<CurrentPair>,
    unit: DisplayUnit,
    phase: FetchPhase,
    last_error: Option<String>,
    last_error_code: Option<ErrorCode>,
    issued: u64,
}

impl AppState {
    #[must_use]
    pub fn new(unit: DisplayUnit) -> Self {
        Self {
            unit,
            ..Self::default()
        }
    }

    /// Start a search and return its ticket
    pub fn begin_search(&mut self) -> SearchTicket {
        self.issued += 1;
        self.phase = FetchPhase::Loading;
        self.last_error = None;
        self.last_error_code = None;
        SearchTicket(self.issued)
    }

    /// Apply a lookup result if it belongs to the newest search
    ///
    /// On failure the stored pair is kept but no longer displayed.
    pub fn complete_search(&mut self, ticket: SearchTicket, result: Result<CurrentPair>) -> Completion {
        if ticket.0 != self.issued {
            warn!(
                "Discarding result of search #{} superseded by #{}",
                ticket.0, self.issued
            );
            return Completion::Stale;
        }

        match result {
            Ok(pair) => {
                debug!("Search #{} shows {}", ticket.0, pair.location.display_name());
                self.current = Some(pair);
                self.phase = FetchPhase::Shown;
            }
            Err(e) => {
                debug!("Search #{} failed: {}", ticket.0, e);
                self.last_error = Some(e.user_message());
                self.last_error_code = Some(e.code());
                self.phase = FetchPhase::Failed;
            }
        }

        Completion::Applied
    }

    /// Switch display unit; returns whether anything changed
    pub fn set_unit(&mut self, unit: DisplayUnit) -> bool {
        if self.unit == unit {
            return false;
        }
        self.unit = unit;
        true
    }

    #[must_use]
    pub fn unit(&self) -> DisplayUnit {
        self.unit
    }

    #[must_use]
    pub fn phase(&self) -> FetchPhase {
        self.phase
    }

    #[must_use]
    pub fn current(&self) -> Option<&CurrentPair> {
        self.current.as_ref()
    }

    #[must_use]
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    #[must_use]
    pub fn last_error_code(&self) -> Option<ErrorCode> {
        self.last_error_code
    }

    /// Category driving the backdrop, only while a forecast is shown
    #[must_use]
    pub fn ambient_category(&self) -> Option<WeatherCategory> {
        match (self.phase, &self.current) {
            (FetchPhase::Shown, Some(pair)) => Some(pair.snapshot.current.category()),
            _ => None,
        }
    }

    /// Render the result area from the stored pair and unit
    #[must_use]
    pub fn display(&self) -> DisplayState {
        match self.phase {
            FetchPhase::Idle => DisplayState::Idle,
            FetchPhase::Loading => DisplayState::Loading,
            FetchPhase::Shown => match &self.current {
                Some(pair) => DisplayState::Forecast(Box::new(render::render(
                    &pair.snapshot,
                    self.unit,
                    &pair.location,
                ))),
                None => DisplayState::Idle,
            },
            FetchPhase::Failed => {
                DisplayState::Error(self.last_error.clone().unwrap_or_default())
            }
        }
    }
}

/// Runs geocode-then-forecast lookups
#[derive(Clone)]
pub struct WeatherOrchestrator {
    geocoder: Arc<dyn Geocoder>,
    forecasts: Arc<dyn ForecastProvider>,
}

impl WeatherOrchestrator {
    pub fn new(geocoder: Arc<dyn Geocoder>, forecasts: Arc<dyn ForecastProvider>) -> Self {
        Self {
            geocoder,
            forecasts,
        }
    }

    /// Use one Open-Meteo client for both steps
    #[must_use]
    pub fn open_meteo(client: OpenMeteoClient) -> Self {
        let client = Arc::new(client);
        Self::new(client.clone(), client)
    }

    /// Resolve a city and fetch its forecast
    #[instrument(skip(self))]
    pub async fn lookup(&self, city: &str) -> Result<CurrentPair> {
        let city = city.trim();
        if city.is_empty() {
            return Err(SkypaneError::EmptyInput);
        }

        let start_time = Instant::now();

        let location = self
            .geocoder
            .search(city)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| {
                warn!("No location found for '{}'", city);
                SkypaneError::city_not_found(city)
            })?;

        debug!(
            "Resolved '{}' to {} ({})",
            city,
            location.display_name(),
            location.format_coordinates()
        );

        let snapshot = self
            .forecasts
            .forecast(location.latitude, location.longitude)
            .await?;

        info!(
            "Lookup for '{}' completed in {:.3}s",
            city,
            start_time.elapsed().as_secs_f64()
        );

        Ok(CurrentPair { location, snapshot })
    }

    /// Run a whole search against `state` inline
    pub async fn search(&self, state: &mut AppState, city: &str) -> Completion {
        let ticket = state.begin_search();
        let result = self.lookup(city).await;
        state.complete_search(ticket, result)
    }

    /// Run a lookup on the runtime and send its result back with the ticket
    pub fn spawn_lookup(
        &self,
        ticket: SearchTicket,
        city: String,
        results: UnboundedSender<LookupResult>,
    ) -> JoinHandle<()> {
        let orchestrator = self.clone();
        tokio::spawn(async move {
            let result = orchestrator.lookup(&city).await;
            if results.send((ticket, result)).is_err() {
                debug!("Result receiver dropped before search #{} finished", ticket.0);
            }
        })
    }
}
