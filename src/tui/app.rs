//! Terminal app state and event handling
//!
//! `UiApp` owns the session `AppState`. Searches run as spawned tasks whose
//! results come back over a channel and are applied on the next frame.

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, info};

use super::backdrop::Backdrop;
use super::input::Action;
use crate::SkypaneError;
use crate::ambient::AmbientController;
use crate::orchestrator::{AppState, Completion, LookupResult, WeatherOrchestrator};
use crate::units::DisplayUnit;

/// Result-area tabs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Current,
    Hourly,
    Daily,
}

impl Tab {
    pub const ALL: [Tab; 3] = [Tab::Current, Tab::Hourly, Tab::Daily];

    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Tab::Current => "Current",
            Tab::Hourly => "Hourly",
            Tab::Daily => "Daily",
        }
    }

    #[must_use]
    pub fn index(self) -> usize {
        self as usize
    }

    #[must_use]
    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    #[must_use]
    pub fn prev(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

pub struct UiApp {
    state: AppState,
    input: String,
    tab: Tab,
    orchestrator: WeatherOrchestrator,
    results_tx: UnboundedSender<LookupResult>,
    results_rx: UnboundedReceiver<LookupResult>,
    ambient: AmbientController<Backdrop>,
    mono: bool,
    quit: bool,
}

impl UiApp {
    #[must_use]
    pub fn new(
        orchestrator: WeatherOrchestrator,
        unit: DisplayUnit,
        ambient: AmbientController<Backdrop>,
        mono: bool,
    ) -> Self {
        let (results_tx, results_rx) = mpsc::unbounded_channel();
        Self {
            state: AppState::new(unit),
            input: String::new(),
            tab: Tab::default(),
            orchestrator,
            results_tx,
            results_rx,
            ambient,
            mono,
            quit: false,
        }
    }

    pub fn handle(&mut self, action: Action) {
        match action {
            Action::Insert(c) => self.input.push(c),
            Action::Backspace => {
                self.input.pop();
            }
            Action::Submit => self.submit(),
            Action::SetUnit(unit) => {
                if self.state.set_unit(unit) {
                    debug!("Display unit switched to {}", unit);
                }
            }
            Action::NextTab => self.tab = self.tab.next(),
            Action::PrevTab => self.tab = self.tab.prev(),
            Action::Quit => self.quit = true,
        }
    }

    /// Start a search for the current input
    fn submit(&mut self) {
        let ticket = self.state.begin_search();
        self.ambient.clear();

        let city = self.input.trim();
        if city.is_empty() {
            self.state.complete_search(ticket, Err(SkypaneError::EmptyInput));
            return;
        }

        info!("Searching for '{}' (#{})", city, ticket.sequence());
        self.orchestrator
            .spawn_lookup(ticket, city.to_string(), self.results_tx.clone());
    }

    /// Apply finished lookups; returns how many were applied
    pub fn drain_results(&mut self) -> usize {
        let mut applied = 0;
        while let Ok((ticket, result)) = self.results_rx.try_recv() {
            if self.state.complete_search(ticket, result) == Completion::Applied {
                applied += 1;
                self.sync_ambient();
            }
        }
        applied
    }

    fn sync_ambient(&mut self) {
        match self.state.ambient_category() {
            Some(category) => self.ambient.apply(category),
            None => self.ambient.clear(),
        }
    }

    /// Wait for the next lookup result and apply it
    #[cfg(test)]
    pub async fn wait_for_result(&mut self) -> Completion {
        let Some((ticket, result)) = self.results_rx.recv().await else {
            return Completion::Stale;
        };
        let completion = self.state.complete_search(ticket, result);
        if completion == Completion::Applied {
            self.sync_ambient();
        }
        completion
    }

    #[must_use]
    pub fn state(&self) -> &AppState {
        &self.state
    }

    #[must_use]
    pub fn input(&self) -> &str {
        &self.input
    }

    #[must_use]
    pub fn tab(&self) -> Tab {
        self.tab
    }

    #[must_use]
    pub fn mono(&self) -> bool {
        self.mono
    }

    #[must_use]
    pub fn should_quit(&self) -> bool {
        self.quit
    }

    #[must_use]
    pub fn backdrop(&self) -> Option<&Backdrop> {
        self.ambient.surface()
    }

    pub fn backdrop_mut(&mut self) -> Option<&mut Backdrop> {
        self.ambient.surface_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Result;
    use crate::ambient::AmbientGroup;
    use crate::models::{CurrentConditions, Location, WeatherSnapshot};
    use crate::orchestrator::{DisplayState, FetchPhase};
    use crate::weather::{ForecastProvider, Geocoder};
    use async_trait::async_trait;
    use std::sync::Arc;

    struct FixedWeather;

    #[async_trait]
    impl Geocoder for FixedWeather {
        async fn search(&self, name: &str) -> Result<Vec<Location>> {
            if name == "Nowhere" {
                return Ok(Vec::new());
            }
            Ok(vec![Location::new(name, "Iceland", 64.1355, -21.8954)])
        }
    }

    #[async_trait]
    impl ForecastProvider for FixedWeather {
        async fn forecast(&self, _latitude: f64, _longitude: f64) -> Result<WeatherSnapshot> {
            Ok(WeatherSnapshot::current_only(CurrentConditions {
                temperature: 2.0,
                apparent_temperature: -3.0,
                wind_speed: 30.0,
                code: 0,
                relative_humidity: None,
            }))
        }
    }

    fn app() -> UiApp {
        let weather = Arc::new(FixedWeather);
        UiApp::new(
            WeatherOrchestrator::new(weather.clone(), weather),
            DisplayUnit::Metric,
            AmbientController::new(Backdrop::new(false)),
            false,
        )
    }

    fn type_text(app: &mut UiApp, text: &str) {
        for c in text.chars() {
            app.handle(Action::Insert(c));
        }
    }

    #[test]
    fn test_tab_cycle() {
        assert_eq!(Tab::Current.next(), Tab::Hourly);
        assert_eq!(Tab::Daily.next(), Tab::Current);
        assert_eq!(Tab::Current.prev(), Tab::Daily);
    }

    #[test]
    fn test_input_editing() {
        let mut app = app();
        type_text(&mut app, "Rome");
        app.handle(Action::Backspace);
        assert_eq!(app.input(), "Rom");
        app.handle(Action::Quit);
        assert!(app.should_quit());
    }

    #[test]
    fn test_empty_submit_fails_without_lookup() {
        let mut app = app();
        type_text(&mut app, "  ");
        app.handle(Action::Submit);

        assert_eq!(app.state().phase(), FetchPhase::Failed);
        assert_eq!(app.drain_results(), 0);
        assert_eq!(
            app.state().display(),
            DisplayState::Error("Please enter a city name".to_string())
        );
    }

    #[tokio::test]
    async fn test_submit_shows_forecast_and_backdrop() {
        let mut app = app();
        type_text(&mut app, "Reykjavik");
        app.handle(Action::Submit);
        assert_eq!(app.state().phase(), FetchPhase::Loading);

        assert_eq!(app.wait_for_result().await, Completion::Applied);
        assert_eq!(app.state().phase(), FetchPhase::Shown);

        let backdrop = app.backdrop().unwrap();
        assert!(backdrop.state(AmbientGroup::SunRays).visible);
        assert!(backdrop.state(AmbientGroup::SunGlow).visible);
    }

    #[tokio::test]
    async fn test_failed_search_clears_backdrop() {
        let mut app = app();
        type_text(&mut app, "Reykjavik");
        app.handle(Action::Submit);
        app.wait_for_result().await;

        app.input.clear();
        type_text(&mut app, "Nowhere");
        app.handle(Action::Submit);
        assert!(!app.backdrop().unwrap().is_active());
        app.wait_for_result().await;

        assert_eq!(app.state().phase(), FetchPhase::Failed);
        assert!(!app.backdrop().unwrap().is_active());
    }

    #[tokio::test]
    async fn test_older_search_result_is_ignored() {
        let mut app = app();
        type_text(&mut app, "Nowhere");
        app.handle(Action::Submit);
        app.input.clear();
        type_text(&mut app, "Akureyri");
        app.handle(Action::Submit);

        let mut completions = vec![app.wait_for_result().await, app.wait_for_result().await];
        completions.sort_by_key(|c| *c == Completion::Stale);

        assert_eq!(completions, [Completion::Applied, Completion::Stale]);
        assert_eq!(app.state().phase(), FetchPhase::Shown);
        assert_eq!(app.state().current().unwrap().location.name, "Akureyri");
    }

    #[tokio::test]
    async fn test_unit_switch_rerenders() {
        let mut app = app();
        type_text(&mut app, "Reykjavik");
        app.handle(Action::Submit);
        app.wait_for_result().await;

        app.handle(Action::SetUnit(DisplayUnit::Imperial));

        let DisplayState::Forecast(views) = app.state().display() else {
            panic!("expected forecast");
        };
        assert_eq!(views.current.field("Temperature"), Some("36°F"));
    }
}
