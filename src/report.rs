//! Plain-text and JSON reports for the one-shot `lookup` command

use std::fmt::Write;

use serde::Serialize;

use crate::render::{DailyCard, ForecastViews, HourlyCard, SectionView};
use crate::{ErrorCode, Result, SkypaneError};

/// Which views a report includes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ViewSelection {
    Current,
    Hourly,
    Daily,
    #[default]
    All,
}

impl ViewSelection {
    fn current(self) -> bool {
        matches!(self, ViewSelection::Current | ViewSelection::All)
    }

    fn hourly(self) -> bool {
        matches!(self, ViewSelection::Hourly | ViewSelection::All)
    }

    fn daily(self) -> bool {
        matches!(self, ViewSelection::Daily | ViewSelection::All)
    }
}

/// Format views as human-readable text
#[must_use]
pub fn format_text(views: &ForecastViews, selection: ViewSelection) -> String {
    let mut output = String::new();

    if selection.current() {
        let current = &views.current;
        let _ = writeln!(output, "{}", current.heading);
        let _ = writeln!(output, "{} {}\n", current.glyph, current.condition);
        for field in &current.fields {
            let _ = writeln!(output, "  {:<12} {}", format!("{}:", field.label), field.value);
        }
        output.push('\n');
    }

    if selection.hourly() {
        output.push_str("Hourly Forecast:\n");
        push_section(&mut output, &views.hourly, format_hourly);
        output.push('\n');
    }

    if selection.daily() {
        output.push_str("Daily Forecast:\n");
        push_section(&mut output, &views.daily, format_daily);
        output.push('\n');
    }

    output.truncate(output.trim_end().len());
    output.push('\n');
    output
}

/// Format views as pretty-printed JSON
pub fn format_json(views: &ForecastViews, selection: ViewSelection) -> Result<String> {
    #[derive(Serialize)]
    struct Report<'a> {
        unit: crate::DisplayUnit,
        #[serde(skip_serializing_if = "Option::is_none")]
        current: Option<&'a crate::render::CurrentView>,
        #[serde(skip_serializing_if = "Option::is_none")]
        hourly: Option<&'a SectionView<HourlyCard>>,
        #[serde(skip_serializing_if = "Option::is_none")]
        daily: Option<&'a SectionView<DailyCard>>,
    }

    let report = Report {
        unit: views.unit,
        current: selection.current().then_some(&views.current),
        hourly: selection.hourly().then_some(&views.hourly),
        daily: selection.daily().then_some(&views.daily),
    };

    serde_json::to_string_pretty(&report)
        .map_err(|e| SkypaneError::malformed(format!("failed to encode report: {e}")))
}

/// Format a failed lookup as a JSON error object
pub fn format_json_error(code: ErrorCode, message: &str) -> Result<String> {
    #[derive(Serialize)]
    struct ErrorReport<'a> {
        error: ErrorCode,
        message: &'a str,
    }

    serde_json::to_string_pretty(&ErrorReport {
        error: code,
        message,
    })
    .map_err(|e| SkypaneError::malformed(format!("failed to encode report: {e}")))
}

fn push_section<T>(output: &mut String, section: &SectionView<T>, line: impl Fn(&T) -> String) {
    match section {
        SectionView::Cards(cards) => {
            for card in cards {
                output.push_str(&line(card));
                output.push('\n');
            }
        }
        SectionView::Placeholder(message) => {
            let _ = writeln!(output, "  {message}");
        }
    }
}

fn format_hourly(card: &HourlyCard) -> String {
    let mut line = format!("  {}  {}  {:>6}", card.time, card.glyph, card.temperature);
    if let Some(feels_like) = &card.feels_like {
        let _ = write!(line, "  (feels {feels_like})");
    }
    line
}

fn format_daily(card: &DailyCard) -> String {
    let mut line = format!(
        "  {} {:<6}  {}  {:<14} High {:>6}  Low {:>6}",
        card.weekday, card.date, card.glyph, card.description, card.high, card.low
    );
    if let Some(feels_like) = &card.feels_like {
        let _ = write!(line, "  Feels {feels_like}");
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CurrentConditions, DailySample, Location, WeatherSnapshot};
    use crate::render::render;
    use crate::units::DisplayUnit;
    use chrono::NaiveDate;

    fn views(unit: DisplayUnit) -> ForecastViews {
        let snapshot = WeatherSnapshot {
            current: CurrentConditions {
                temperature: 4.2,
                apparent_temperature: 1.0,
                wind_speed: 18.5,
                code: 71,
                relative_humidity: Some(87.0),
            },
            hourly: Some(Vec::new()),
            daily: Some(vec![DailySample {
                date: NaiveDate::from_ymd_opt(2024, 12, 24).unwrap(),
                max_temp: 5.0,
                min_temp: -1.0,
                apparent_max: None,
                apparent_min: None,
                code: 73,
            }]),
            timezone: None,
        };
        render(&snapshot, unit, &Location::new("Tromsø", "Norway", 69.6496, 18.957))
    }

    #[test]
    fn test_text_report_all_views() {
        let text = format_text(&views(DisplayUnit::Metric), ViewSelection::All);

        assert!(text.starts_with("Tromsø, Norway\n❄️ Light Snow\n"));
        assert!(text.contains("Temperature: 4°C"));
        assert!(text.contains("Wind:        18.5 km/h"));
        assert!(text.contains("Humidity:    87%"));
        assert!(text.contains("Hourly Forecast:\n  No hourly data available"));
        assert!(text.contains("Tue 24 Dec"));
        assert!(text.ends_with("Low   -1°C\n"));
    }

    #[test]
    fn test_text_report_single_view() {
        let text = format_text(&views(DisplayUnit::Imperial), ViewSelection::Current);
        assert!(text.contains("Temperature: 40°F"));
        assert!(!text.contains("Daily Forecast"));
    }

    #[test]
    fn test_json_report_skips_unselected_views() {
        let json = format_json(&views(DisplayUnit::Metric), ViewSelection::Daily).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["unit"], "metric");
        assert!(value.get("current").is_none());
        assert!(value.get("hourly").is_none());
        assert_eq!(value["daily"]["cards"][0]["high"], "5°C");
    }

    #[test]
    fn test_json_report_placeholder() {
        let json = format_json(&views(DisplayUnit::Metric), ViewSelection::Hourly).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["hourly"]["placeholder"], "No hourly data available");
    }

    #[test]
    fn test_json_error_report() {
        let json = format_json_error(
            ErrorCode::CityNotFound,
            "City \"Atlantis\" not found. Try another spelling or a major city.",
        )
        .unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["error"], "city_not_found");
        assert!(value["message"].as_str().unwrap().contains("Atlantis"));
    }
}
