//! Display unit conversion
//!
//! Forecast values are stored as the service returns them (Celsius, km/h) and
//! only converted here, at render time.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::SkypaneError;

const KPH_TO_MPH: f64 = 0.621_371;

/// Unit system used when displaying temperatures and wind speeds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DisplayUnit {
    #[default]
    Metric,
    Imperial,
}

impl DisplayUnit {
    #[must_use]
    pub fn temperature_label(self) -> &'static str {
        match self {
            DisplayUnit::Metric => "°C",
            DisplayUnit::Imperial => "°F",
        }
    }

    #[must_use]
    pub fn speed_label(self) -> &'static str {
        match self {
            DisplayUnit::Metric => "km/h",
            DisplayUnit::Imperial => "mph",
        }
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            DisplayUnit::Metric => "metric",
            DisplayUnit::Imperial => "imperial",
        }
    }
}

impl fmt::Display for DisplayUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DisplayUnit {
    type Err = SkypaneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "metric" | "celsius" | "c" => Ok(DisplayUnit::Metric),
            "imperial" | "fahrenheit" | "f" => Ok(DisplayUnit::Imperial),
            other => Err(SkypaneError::config(format!(
                "Invalid display unit '{other}'. Must be one of: metric, imperial"
            ))),
        }
    }
}

/// Round to the nearest integer, halves toward positive infinity.
fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

/// Convert a Celsius reading to a whole display temperature
#[must_use]
pub fn to_display_temperature(celsius: f64, unit: DisplayUnit) -> i64 {
    match unit {
        DisplayUnit::Metric => round_half_up(celsius),
        DisplayUnit::Imperial => round_half_up(celsius * 9.0 / 5.0 + 32.0),
    }
}

/// Convert a km/h reading to a display string with one decimal
///
/// The tenths digit rounds half up, so 0.25 shows as `"0.3"`.
#[must_use]
pub fn to_display_wind(kph: f64, unit: DisplayUnit) -> String {
    let speed = match unit {
        DisplayUnit::Metric => kph,
        DisplayUnit::Imperial => kph * KPH_TO_MPH,
    };
    format!("{:.1}", round_half_up(speed * 10.0) as f64 / 10.0)
}

/// Temperature with its unit suffix, e.g. `"21°C"`
#[must_use]
pub fn format_temperature(celsius: f64, unit: DisplayUnit) -> String {
    format!(
        "{}{}",
        to_display_temperature(celsius, unit),
        unit.temperature_label()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0.0, DisplayUnit::Metric, 0)]
    #[case(0.0, DisplayUnit::Imperial, 32)]
    #[case(100.0, DisplayUnit::Imperial, 212)]
    #[case(-40.0, DisplayUnit::Imperial, -40)]
    #[case(21.4, DisplayUnit::Metric, 21)]
    #[case(21.5, DisplayUnit::Metric, 22)]
    #[case(-2.5, DisplayUnit::Metric, -2)]
    #[case(37.0, DisplayUnit::Imperial, 99)]
    fn test_display_temperature(
        #[case] celsius: f64,
        #[case] unit: DisplayUnit,
        #[case] expected: i64,
    ) {
        assert_eq!(to_display_temperature(celsius, unit), expected);
    }

    #[rstest]
    #[case(10.0, DisplayUnit::Metric, "10.0")]
    #[case(10.0, DisplayUnit::Imperial, "6.2")]
    #[case(0.0, DisplayUnit::Imperial, "0.0")]
    #[case(12.34, DisplayUnit::Metric, "12.3")]
    #[case(0.25, DisplayUnit::Metric, "0.3")]
    #[case(2.25, DisplayUnit::Metric, "2.3")]
    fn test_display_wind(#[case] kph: f64, #[case] unit: DisplayUnit, #[case] expected: &str) {
        assert_eq!(to_display_wind(kph, unit), expected);
    }

    #[test]
    fn test_unit_labels() {
        assert_eq!(DisplayUnit::Metric.temperature_label(), "°C");
        assert_eq!(DisplayUnit::Imperial.temperature_label(), "°F");
        assert_eq!(DisplayUnit::Metric.speed_label(), "km/h");
        assert_eq!(DisplayUnit::Imperial.speed_label(), "mph");
        assert_eq!(format_temperature(0.0, DisplayUnit::Imperial), "32°F");
    }

    #[test]
    fn test_unit_parsing() {
        assert_eq!("metric".parse::<DisplayUnit>().unwrap(), DisplayUnit::Metric);
        assert_eq!("Fahrenheit".parse::<DisplayUnit>().unwrap(), DisplayUnit::Imperial);
        assert_eq!(" c ".parse::<DisplayUnit>().unwrap(), DisplayUnit::Metric);
        assert!("kelvin".parse::<DisplayUnit>().is_err());
        assert_eq!(DisplayUnit::default(), DisplayUnit::Metric);
    }
}
