//! WMO weather code classification
//!
//! Maps the integer codes returned by the forecast service to a long
//! description, a short label, a glyph and the animation category that drives
//! the ambient backdrop. See: https://open-meteo.com/en/docs#weathervariables

use serde::{Deserialize, Serialize};

/// Every code the lookup tables know about.
pub const SUPPORTED_CODES: [i32; 21] = [
    0, 1, 2, 3, 45, 48, 51, 53, 55, 61, 63, 65, 71, 73, 75, 80, 81, 82, 95, 96, 99,
];

const UNKNOWN: &str = "Unknown";

/// Display-only classification of a weather code, drives decorative effects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum WeatherCategory {
    Clear,
    PartlyCloudy,
    Overcast,
    Fog,
    Rain,
    Snow,
    Thunder,
    #[default]
    WindyDefault,
}

impl WeatherCategory {
    /// Short animation name, e.g. `"rainy"`
    #[must_use]
    pub fn animation_name(self) -> &'static str {
        match self {
            Self::Clear => "sunny",
            Self::PartlyCloudy => "cloudy",
            Self::Overcast => "overcast",
            Self::Fog => "foggy",
            Self::Rain => "rainy",
            Self::Snow => "snowy",
            Self::Thunder => "thunder",
            Self::WindyDefault => "windy",
        }
    }
}

/// Everything the display needs to know about one weather code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub code: i32,
    pub description: &'static str,
    pub label: &'static str,
    pub category: WeatherCategory,
    pub glyph: &'static str,
}

impl Classification {
    #[must_use]
    pub fn is_known(&self) -> bool {
        self.description != UNKNOWN
    }
}

#[must_use]
pub fn classify(code: i32) -> Classification {
    Classification {
        code,
        description: describe(code),
        label: short_label(code),
        category: category(code),
        glyph: glyph(code),
    }
}

/// Long, human-readable description
#[must_use]
pub fn describe(code: i32) -> &'static str {
    match code {
        0 => "Clear Sky",
        1 => "Mainly Clear",
        2 => "Partly Cloudy",
        3 => "Overcast",
        45 | 48 => "Foggy",
        51 | 53 | 55 => "Drizzle",
        61 => "Light Rain",
        63 => "Rain",
        65 => "Heavy Rain",
        71 => "Light Snow",
        73 => "Snow",
        75 => "Heavy Snow",
        80 | 81 => "Showers",
        82 => "Heavy Showers",
        95 => "Thunderstorm",
        96 | 99 => "Hail",
        _ => UNKNOWN,
    }
}

/// Short label for compact stat tiles
#[must_use]
pub fn short_label(code: i32) -> &'static str {
    match code {
        0 | 1 => "Clear",
        2 => "Cloudy",
        3 => "Overcast",
        45 | 48 => "Foggy",
        51 | 53 | 55 => "Drizzle",
        61 => "Light Rain",
        63 => "Rain",
        65 => "Heavy Rain",
        71 => "Light Snow",
        73 => "Snow",
        75 => "Heavy Snow",
        80 | 81 => "Showers",
        82 => "Heavy Showers",
        95 => "Thunder",
        96 | 99 => "Hail",
        _ => UNKNOWN,
    }
}

#[must_use]
pub fn category(code: i32) -> WeatherCategory {
    match code {
        0 | 1 => WeatherCategory::Clear,
        2 => WeatherCategory::PartlyCloudy,
        3 => WeatherCategory::Overcast,
        45 | 48 => WeatherCategory::Fog,
        51 | 53 | 55 | 61 | 63 | 65 | 80 | 81 | 82 => WeatherCategory::Rain,
        71 | 73 | 75 => WeatherCategory::Snow,
        95 | 96 | 99 => WeatherCategory::Thunder,
        _ => WeatherCategory::WindyDefault,
    }
}

#[must_use]
pub fn glyph(code: i32) -> &'static str {
    match category(code) {
        WeatherCategory::Clear => "☀️",
        WeatherCategory::PartlyCloudy => "⛅",
        WeatherCategory::Overcast => "☁️",
        WeatherCategory::Fog => "🌫️",
        WeatherCategory::Rain => "🌧️",
        WeatherCategory::Snow => "❄️",
        WeatherCategory::Thunder => "⛈️",
        WeatherCategory::WindyDefault => "🌤️",
    }
}
