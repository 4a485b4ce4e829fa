//! Forecast view-models
//!
//! `render` turns a stored snapshot into display-ready strings for the
//! current, hourly and daily views. It is a pure function of its inputs, so a
//! unit switch is just another call with the same snapshot.

use serde::Serialize;

use crate::classify::{self, WeatherCategory};
use crate::models::{CurrentConditions, DailySample, HourlySample, Location, WeatherSnapshot};
use crate::units::{self, DisplayUnit};

/// Hourly cards shown at most
pub const HOURLY_LIMIT: usize = 24;
/// Daily cards shown at most
pub const DAILY_LIMIT: usize = 7;

const HOURLY_UNAVAILABLE: &str = "Hourly data unavailable";
const HOURLY_EMPTY: &str = "No hourly data available";
const DAILY_UNAVAILABLE: &str = "Daily data unavailable";
const DAILY_EMPTY: &str = "No daily data available";

/// A label/value pair in a stat tile or card
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Field {
    pub label: &'static str,
    pub value: String,
}

impl Field {
    fn new(label: &'static str, value: impl Into<String>) -> Self {
        Self {
            label,
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurrentView {
    /// "Name, Country"
    pub heading: String,
    /// Long condition description
    pub condition: String,
    pub glyph: &'static str,
    pub category: WeatherCategory,
    pub fields: Vec<Field>,
}

impl CurrentView {
    /// Value of the field with the given label
    #[must_use]
    pub fn field(&self, label: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|field| field.label == label)
            .map(|field| field.value.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HourlyCard {
    /// Local hour, e.g. `"14:00"`
    pub time: String,
    pub glyph: &'static str,
    pub temperature: String,
    pub feels_like: Option<String>,
}

impl HourlyCard {
    #[must_use]
    pub fn fields(&self) -> Vec<Field> {
        let mut fields = vec![
            Field::new("Time", &self.time),
            Field::new("Temperature", &self.temperature),
        ];
        if let Some(feels_like) = &self.feels_like {
            fields.push(Field::new("Feels Like", feels_like));
        }
        fields
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyCard {
    /// Short weekday, e.g. `"Mon"`
    pub weekday: String,
    /// Day and month, e.g. `"17 Oct"`
    pub date: String,
    pub glyph: &'static str,
    pub description: &'static str,
    pub high: String,
    pub low: String,
    /// Apparent temperature range, when both ends were reported
    pub feels_like: Option<String>,
}

impl DailyCard {
    #[must_use]
    pub fn fields(&self) -> Vec<Field> {
        let mut fields = vec![
            Field::new("High", &self.high),
            Field::new("Low", &self.low),
        ];
        if let Some(feels_like) = &self.feels_like {
            fields.push(Field::new("Feels Like", feels_like));
        }
        fields
    }
}

/// Cards for a section, or the message shown in their place
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionView<T> {
    Cards(Vec<T>),
    Placeholder(&'static str),
}

impl<T> SectionView<T> {
    #[must_use]
    pub fn cards(&self) -> &[T] {
        match self {
            SectionView::Cards(cards) => cards,
            SectionView::Placeholder(_) => &[],
        }
    }

    #[must_use]
    pub fn placeholder(&self) -> Option<&'static str> {
        match self {
            SectionView::Cards(_) => None,
            SectionView::Placeholder(message) => Some(*message),
        }
    }
}

/// The three independent views of one forecast
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastViews {
    pub unit: DisplayUnit,
    pub current: CurrentView,
    pub hourly: SectionView<HourlyCard>,
    pub daily: SectionView<DailyCard>,
}

/// Build all views for a snapshot in the requested unit
#[must_use]
pub fn render(snapshot: &WeatherSnapshot, unit: DisplayUnit, location: &Location) -> ForecastViews {
    ForecastViews {
        unit,
        current: render_current(&snapshot.current, unit, location),
        hourly: render_section(
            snapshot.hourly.as_deref(),
            HOURLY_LIMIT,
            HOURLY_UNAVAILABLE,
            HOURLY_EMPTY,
            |sample| hourly_card(sample, unit),
        ),
        daily: render_section(
            snapshot.daily.as_deref(),
            DAILY_LIMIT,
            DAILY_UNAVAILABLE,
            DAILY_EMPTY,
            |sample| daily_card(sample, unit),
        ),
    }
}

fn render_current(current: &CurrentConditions, unit: DisplayUnit, location: &Location) -> CurrentView {
    let classification = classify::classify(current.code);

    let mut fields = vec![
        Field::new(
            "Temperature",
            units::format_temperature(current.temperature, unit),
        ),
        Field::new(
            "Feels Like",
            units::format_temperature(current.apparent_temperature, unit),
        ),
        Field::new(
            "Wind",
            format!(
                "{} {}",
                units::to_display_wind(current.wind_speed, unit),
                unit.speed_label()
            ),
        ),
        Field::new("Condition", classification.label),
    ];
    if let Some(humidity) = current.relative_humidity {
        fields.push(Field::new("Humidity", format!("{}%", humidity.round())));
    }

    CurrentView {
        heading: location.display_name(),
        condition: classification.description.to_string(),
        glyph: classification.glyph,
        category: classification.category,
        fields,
    }
}

fn render_section<S, T>(
    samples: Option<&[S]>,
    limit: usize,
    unavailable: &'static str,
    empty: &'static str,
    card: impl Fn(&S) -> T,
) -> SectionView<T> {
    match samples {
        None => SectionView::Placeholder(unavailable),
        Some([]) => SectionView::Placeholder(empty),
        Some(samples) => SectionView::Cards(samples.iter().take(limit).map(card).collect()),
    }
}

fn hourly_card(sample: &HourlySample, unit: DisplayUnit) -> HourlyCard {
    HourlyCard {
        time: sample.time.format("%H:00").to_string(),
        glyph: classify::glyph(sample.code),
        temperature: units::format_temperature(sample.temperature, unit),
        feels_like: sample
            .apparent_temperature
            .map(|apparent| units::format_temperature(apparent, unit)),
    }
}

fn daily_card(sample: &DailySample, unit: DisplayUnit) -> DailyCard {
    let feels_like = match (sample.apparent_min, sample.apparent_max) {
        (Some(min), Some(max)) => Some(format!(
            "{} to {}",
            units::format_temperature(min, unit),
            units::format_temperature(max, unit)
        )),
        _ => None,
    };

    DailyCard {
        weekday: sample.date.format("%a").to_string(),
        date: sample.date.format("%-d %b").to_string(),
        glyph: classify::glyph(sample.code),
        description: classify::describe(sample.code),
        high: units::format_temperature(sample.max_temp, unit),
        low: units::format_temperature(sample.min_temp, unit),
        feels_like,
    }
}
