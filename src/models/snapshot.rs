//! Weather snapshot model
//!
//! Values are kept exactly as the forecast service reported them: temperatures
//! in Celsius, wind speeds in km/h, times in the location's local time.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::classify::{self, WeatherCategory};

/// Conditions at the time of the request
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CurrentConditions {
    /// Air temperature at 2 m in Celsius
    pub temperature: f64,
    /// Perceived temperature in Celsius
    pub apparent_temperature: f64,
    /// Wind speed at 10 m in km/h
    pub wind_speed: f64,
    /// WMO weather code
    pub code: i32,
    /// Relative humidity in percent, when reported
    pub relative_humidity: Option<f64>,
}

impl CurrentConditions {
    #[must_use]
    pub fn category(&self) -> WeatherCategory {
        classify::category(self.code)
    }
}

/// One hourly forecast entry
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct HourlySample {
    /// Local time of the sample
    pub time: NaiveDateTime,
    /// Temperature in Celsius
    pub temperature: f64,
    /// Perceived temperature in Celsius, when reported
    pub apparent_temperature: Option<f64>,
    pub code: i32,
}

/// One daily forecast entry
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct DailySample {
    pub date: NaiveDate,
    /// Daily maximum in Celsius
    pub max_temp: f64,
    /// Daily minimum in Celsius
    pub min_temp: f64,
    pub apparent_max: Option<f64>,
    pub apparent_min: Option<f64>,
    pub code: i32,
}

/// Everything one forecast call produced
///
/// `None` for `hourly`/`daily` means the payload carried no such block;
/// an empty vector means the block was present without entries.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct WeatherSnapshot {
    pub current: CurrentConditions,
    pub hourly: Option<Vec<HourlySample>>,
    pub daily: Option<Vec<DailySample>>,
    /// IANA timezone the times are expressed in
    pub timezone: Option<String>,
}

impl WeatherSnapshot {
    /// Snapshot with only current conditions
    #[must_use]
    pub fn current_only(current: CurrentConditions) -> Self {
        Self {
            current,
            hourly: None,
            daily: None,
            timezone: None,
        }
    }

    #[must_use]
    pub fn hourly_len(&self) -> usize {
        self.hourly.as_ref().map_or(0, Vec::len)
    }

    #[must_use]
    pub fn daily_len(&self) -> usize {
        self.daily.as_ref().map_or(0, Vec::len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn current() -> CurrentConditions {
        CurrentConditions {
            temperature: 15.0,
            apparent_temperature: 13.2,
            wind_speed: 8.0,
            code: 61,
            relative_humidity: Some(71.0),
        }
    }

    #[test]
    fn test_current_category() {
        assert_eq!(current().category(), WeatherCategory::Rain);
    }

    #[test]
    fn test_section_lengths() {
        let mut snapshot = WeatherSnapshot::current_only(current());
        assert_eq!(snapshot.hourly_len(), 0);
        assert_eq!(snapshot.daily_len(), 0);

        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        snapshot.daily = Some(vec![DailySample {
            date,
            max_temp: 18.0,
            min_temp: 9.0,
            apparent_max: None,
            apparent_min: None,
            code: 2,
        }]);
        assert_eq!(snapshot.daily_len(), 1);
    }
}
