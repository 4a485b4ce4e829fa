//! Open-Meteo API client
//!
//! Geocoding and forecast requests against the key-less Open-Meteo endpoints,
//! plus the conversion of their JSON payloads into internal models.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::{debug, error, info, instrument, warn};

use super::{ForecastProvider, Geocoder};
use crate::config::ServiceConfig;
use crate::models::{CurrentConditions, DailySample, HourlySample, Location, WeatherSnapshot};
use crate::{Result, SkypaneError};

const CURRENT_FIELDS: &str =
    "temperature_2m,relative_humidity_2m,apparent_temperature,weather_code,wind_speed_10m";
const HOURLY_FIELDS: &str = "temperature_2m,apparent_temperature,weather_code";
const DAILY_FIELDS: &str = "weather_code,temperature_2m_max,temperature_2m_min,apparent_temperature_max,apparent_temperature_min";

const HOURLY_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M";
const DAILY_DATE_FORMAT: &str = "%Y-%m-%d";

/// HTTP client for the Open-Meteo geocoding and forecast APIs
#[derive(Debug, Clone)]
pub struct OpenMeteoClient {
    client: Client,
    geocoding_url: String,
    forecast_url: String,
}

impl OpenMeteoClient {
    /// Create a new client from service settings
    pub fn new(config: &ServiceConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds.into()))
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| SkypaneError::config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            geocoding_url: config.geocoding_url.trim_end_matches('/').to_string(),
            forecast_url: config.forecast_url.trim_end_matches('/').to_string(),
        })
    }

    /// Search for a place by name using the Open-Meteo geocoding API
    #[instrument(skip(self))]
    pub async fn geocode(&self, name: &str) -> Result<Vec<Location>> {
        info!("Geocoding location: '{}'", name);
        let start_time = Instant::now();

        let url = format!(
            "{}?name={}&count=1&language=en&format=json",
            self.geocoding_url,
            urlencoding::encode(name)
        );

        let response: wire::GeocodingResponse = self.get_json(&url).await?;

        let locations: Vec<Location> = response
            .results
            .unwrap_or_default()
            .into_iter()
            .map(Location::from)
            .collect();

        if locations.is_empty() {
            warn!("No results found for location '{}'", name);
        } else {
            info!(
                "Found {} geocoding results for '{}' in {:.3}s",
                locations.len(),
                name,
                start_time.elapsed().as_secs_f64()
            );
        }

        Ok(locations)
    }

    /// Fetch current, hourly and daily conditions for coordinates
    #[instrument(skip(self))]
    pub async fn get_forecast(&self, latitude: f64, longitude: f64) -> Result<WeatherSnapshot> {
        info!(
            "Getting forecast for coordinates: {:.4}, {:.4}",
            latitude, longitude
        );
        let start_time = Instant::now();

        let url = format!(
            "{}?latitude={}&longitude={}&current={}&hourly={}&daily={}&temperature_unit=celsius&wind_speed_unit=kmh&timezone=auto",
            self.forecast_url, latitude, longitude, CURRENT_FIELDS, HOURLY_FIELDS, DAILY_FIELDS
        );

        let response: wire::ForecastResponse = self.get_json(&url).await?;
        let snapshot = WeatherSnapshot::try_from(response).inspect_err(|e| {
            error!("Forecast payload rejected: {}", e);
        })?;

        info!(
            "Retrieved forecast with {} hourly and {} daily entries in {:.3}s",
            snapshot.hourly_len(),
            snapshot.daily_len(),
            start_time.elapsed().as_secs_f64()
        );

        Ok(snapshot)
    }

    /// GET a URL and decode its JSON body
    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        debug!("Open-Meteo request URL: {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .inspect_err(|e| warn!("Network error: {}", e))?;

        let status = response.status();
        if !status.is_success() {
            warn!("HTTP error: {}", status);
            return Err(SkypaneError::upstream(format!(
                "request failed with status: {} - {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown error")
            )));
        }

        let body = response.text().await?;

        serde_json::from_str(&body).map_err(|e| {
            error!("Failed to parse Open-Meteo response: {}", e);
            SkypaneError::malformed(format!("invalid JSON: {e}"))
        })
    }
}

#[async_trait]
impl Geocoder for OpenMeteoClient {
    async fn search(&self, name: &str) -> Result<Vec<Location>> {
        self.geocode(name).await
    }
}

#[async_trait]
impl ForecastProvider for OpenMeteoClient {
    async fn forecast(&self, latitude: f64, longitude: f64) -> Result<WeatherSnapshot> {
        self.get_forecast(latitude, longitude).await
    }
}

impl TryFrom<wire::ForecastResponse> for WeatherSnapshot {
    type Error = SkypaneError;

    fn try_from(response: wire::ForecastResponse) -> Result<Self> {
        let current = response
            .current
            .ok_or_else(|| SkypaneError::malformed("no current weather block"))?;

        let current = CurrentConditions {
            temperature: required("current.temperature_2m", current.temperature_2m)?,
            apparent_temperature: required(
                "current.apparent_temperature",
                current.apparent_temperature,
            )?,
            wind_speed: required("current.wind_speed_10m", current.wind_speed_10m)?,
            code: required("current.weather_code", current.weather_code)?,
            relative_humidity: current.relative_humidity_2m,
        };

        let hourly = response
            .hourly
            .map(|hourly| section_or_empty("hourly", convert_hourly(hourly)));
        let daily = response
            .daily
            .map(|daily| section_or_empty("daily", convert_daily(daily)));

        Ok(Self {
            current,
            hourly,
            daily,
            timezone: response.timezone,
        })
    }
}

/// A broken forecast section degrades to no entries instead of failing the lookup
fn section_or_empty<T>(section: &str, samples: Result<Vec<T>>) -> Vec<T> {
    samples.unwrap_or_else(|e| {
        warn!("Dropping {} forecast section: {}", section, e);
        Vec::new()
    })
}

fn required<T>(field: &str, value: Option<T>) -> Result<T> {
    value.ok_or_else(|| SkypaneError::malformed(format!("{field} missing")))
}

/// A value column that must line up with its `time` array
fn aligned<T>(field: &str, column: Option<Vec<T>>, len: usize) -> Result<Vec<T>> {
    let column = required(field, column)?;
    if column.len() != len {
        return Err(SkypaneError::malformed(format!(
            "{field} has {} values for {len} timestamps",
            column.len()
        )));
    }
    Ok(column)
}

/// Like [`aligned`], but an absent column is filled with `None`
fn optional_aligned<T>(
    field: &str,
    column: Option<Vec<Option<T>>>,
    len: usize,
) -> Result<Vec<Option<T>>> {
    match column {
        Some(values) => aligned(field, Some(values), len),
        None => Ok(std::iter::repeat_with(|| None).take(len).collect()),
    }
}

fn convert_hourly(hourly: wire::HourlyData) -> Result<Vec<HourlySample>> {
    let times = required("hourly.time", hourly.time)?;
    let len = times.len();
    let temperatures = aligned("hourly.temperature_2m", hourly.temperature_2m, len)?;
    let codes = aligned("hourly.weather_code", hourly.weather_code, len)?;
    let apparent = optional_aligned("hourly.apparent_temperature", hourly.apparent_temperature, len)?;

    let mut samples = Vec::with_capacity(len);
    for (((time, temperature), code), apparent_temperature) in
        times.iter().zip(temperatures).zip(codes).zip(apparent)
    {
        let time = NaiveDateTime::parse_from_str(time, HOURLY_TIME_FORMAT).map_err(|e| {
            SkypaneError::malformed(format!("invalid hourly timestamp '{time}': {e}"))
        })?;

        // Trailing hours past the model horizon come back as nulls
        let (Some(temperature), Some(code)) = (temperature, code) else {
            debug!("Skipping hourly sample at {} with null values", time);
            continue;
        };

        samples.push(HourlySample {
            time,
            temperature,
            apparent_temperature,
            code,
        });
    }

    Ok(samples)
}

fn convert_daily(daily: wire::DailyData) -> Result<Vec<DailySample>> {
    let dates = required("daily.time", daily.time)?;
    let len = dates.len();
    let maxima = aligned("daily.temperature_2m_max", daily.temperature_2m_max, len)?;
    let minima = aligned("daily.temperature_2m_min", daily.temperature_2m_min, len)?;
    let codes = aligned("daily.weather_code", daily.weather_code, len)?;
    let apparent_maxima =
        optional_aligned("daily.apparent_temperature_max", daily.apparent_temperature_max, len)?;
    let apparent_minima =
        optional_aligned("daily.apparent_temperature_min", daily.apparent_temperature_min, len)?;

    let mut samples = Vec::with_capacity(len);
    for (i, date) in dates.iter().enumerate() {
        let date = NaiveDate::parse_from_str(date, DAILY_DATE_FORMAT).map_err(|e| {
            SkypaneError::malformed(format!("invalid daily date '{date}': {e}"))
        })?;

        let (Some(max_temp), Some(min_temp), Some(code)) = (maxima[i], minima[i], codes[i]) else {
            debug!("Skipping daily sample for {} with null values", date);
            continue;
        };

        samples.push(DailySample {
            date,
            max_temp,
            min_temp,
            apparent_max: apparent_maxima[i],
            apparent_min: apparent_minima[i],
            code,
        });
    }

    Ok(samples)
}

/// `OpenMeteo` API response structures
pub(crate) mod wire {
    use serde::Deserialize;

    use crate::models::Location;
    use crate::models::location::UNKNOWN_COUNTRY;

    /// Geocoding response from `OpenMeteo`; `results` is omitted when nothing matched
    #[derive(Debug, Deserialize)]
    pub struct GeocodingResponse {
        pub results: Option<Vec<GeocodingResult>>,
    }

    #[derive(Debug, Deserialize)]
    pub struct GeocodingResult {
        pub name: String,
        pub latitude: f64,
        pub longitude: f64,
        pub country: Option<String>,
    }

    impl From<GeocodingResult> for Location {
        fn from(result: GeocodingResult) -> Self {
            Location {
                name: result.name,
                country: result.country.unwrap_or_else(|| UNKNOWN_COUNTRY.into()),
                latitude: result.latitude,
                longitude: result.longitude,
            }
        }
    }

    /// Forecast response from `OpenMeteo`
    #[derive(Debug, Deserialize)]
    pub struct ForecastResponse {
        pub timezone: Option<String>,
        pub current: Option<CurrentData>,
        pub hourly: Option<HourlyData>,
        pub daily: Option<DailyData>,
    }

    #[derive(Debug, Deserialize)]
    pub struct CurrentData {
        pub temperature_2m: Option<f64>,
        pub relative_humidity_2m: Option<f64>,
        pub apparent_temperature: Option<f64>,
        pub weather_code: Option<i32>,
        pub wind_speed_10m: Option<f64>,
    }

    #[derive(Debug, Deserialize)]
    pub struct HourlyData {
        pub time: Option<Vec<String>>,
        pub temperature_2m: Option<Vec<Option<f64>>>,
        pub apparent_temperature: Option<Vec<Option<f64>>>,
        pub weather_code: Option<Vec<Option<i32>>>,
    }

    #[derive(Debug, Deserialize)]
    pub struct DailyData {
        pub time: Option<Vec<String>>,
        pub weather_code: Option<Vec<Option<i32>>>,
        pub temperature_2m_max: Option<Vec<Option<f64>>>,
        pub temperature_2m_min: Option<Vec<Option<f64>>>,
        pub apparent_temperature_max: Option<Vec<Option<f64>>>,
        pub apparent_temperature_min: Option<Vec<Option<f64>>>,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(value: serde_json::Value) -> Result<WeatherSnapshot> {
        let response: wire::ForecastResponse = serde_json::from_value(value).unwrap();
        WeatherSnapshot::try_from(response)
    }

    fn current_block() -> serde_json::Value {
        json!({
            "time": "2024-03-01T12:00",
            "temperature_2m": 11.3,
            "relative_humidity_2m": 64,
            "apparent_temperature": 9.1,
            "weather_code": 3,
            "wind_speed_10m": 14.2
        })
    }

    #[test]
    fn test_full_payload_converts() {
        let snapshot = parse(json!({
            "timezone": "Europe/Berlin",
            "current": current_block(),
            "hourly": {
                "time": ["2024-03-01T00:00", "2024-03-01T01:00"],
                "temperature_2m": [5.1, 4.8],
                "apparent_temperature": [3.0, 2.7],
                "weather_code": [3, 61]
            },
            "daily": {
                "time": ["2024-03-01"],
                "weather_code": [61],
                "temperature_2m_max": [12.0],
                "temperature_2m_min": [3.5],
                "apparent_temperature_max": [10.2],
                "apparent_temperature_min": [0.4]
            }
        }))
        .unwrap();

        assert_eq!(snapshot.current.temperature, 11.3);
        assert_eq!(snapshot.current.relative_humidity, Some(64.0));
        assert_eq!(snapshot.timezone.as_deref(), Some("Europe/Berlin"));

        let hourly = snapshot.hourly.unwrap();
        assert_eq!(hourly.len(), 2);
        assert_eq!(hourly[1].code, 61);
        assert_eq!(hourly[1].apparent_temperature, Some(2.7));
        assert_eq!(hourly[1].time.format("%H:%M").to_string(), "01:00");

        let daily = snapshot.daily.unwrap();
        assert_eq!(daily[0].date, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        assert_eq!(daily[0].apparent_min, Some(0.4));
    }

    #[test]
    fn test_missing_current_is_malformed() {
        let err = parse(json!({ "timezone": "UTC" })).unwrap_err();
        assert!(matches!(err, SkypaneError::MalformedResponse { .. }));
    }

    #[test]
    fn test_missing_current_temperature_is_malformed() {
        let err = parse(json!({
            "current": { "apparent_temperature": 1.0, "weather_code": 0, "wind_speed_10m": 2.0 }
        }))
        .unwrap_err();
        assert!(err.to_string().contains("current.temperature_2m"));
    }

    #[test]
    fn test_missing_sections_stay_absent() {
        let snapshot = parse(json!({ "current": current_block() })).unwrap();
        assert!(snapshot.hourly.is_none());
        assert!(snapshot.daily.is_none());
    }

    #[test]
    fn test_misaligned_hourly_section_is_emptied() {
        let snapshot = parse(json!({
            "current": current_block(),
            "hourly": {
                "time": ["2024-03-01T00:00", "2024-03-01T01:00"],
                "temperature_2m": [5.1],
                "weather_code": [3, 3]
            }
        }))
        .unwrap();
        assert_eq!(snapshot.hourly, Some(Vec::new()));
    }

    #[test]
    fn test_misaligned_column_is_reported() {
        let err = aligned("hourly.temperature_2m", Some(vec![5.1]), 2).unwrap_err();
        assert!(err.to_string().contains("hourly.temperature_2m has 1 values for 2 timestamps"));
    }

    #[test]
    fn test_broken_sections_keep_current() {
        let snapshot = parse(json!({
            "current": current_block(),
            "hourly": {
                "time": ["2024-03-01T00:00"],
                "temperature_2m": [5.1]
            },
            "daily": {}
        }))
        .unwrap();

        assert_eq!(snapshot.current.temperature, 11.3);
        assert_eq!(snapshot.hourly, Some(Vec::new()));
        assert_eq!(snapshot.daily, Some(Vec::new()));
    }

    #[test]
    fn test_null_entries_are_skipped() {
        let snapshot = parse(json!({
            "current": current_block(),
            "hourly": {
                "time": ["2024-03-01T00:00", "2024-03-01T01:00"],
                "temperature_2m": [5.1, null],
                "weather_code": [3, null]
            }
        }))
        .unwrap();
        assert_eq!(snapshot.hourly_len(), 1);
        assert_eq!(snapshot.hourly.unwrap()[0].apparent_temperature, None);
    }

    #[test]
    fn test_bad_timestamp_empties_section() {
        let snapshot = parse(json!({
            "current": current_block(),
            "daily": {
                "time": ["first of march"],
                "weather_code": [0],
                "temperature_2m_max": [1.0],
                "temperature_2m_min": [0.0]
            }
        }))
        .unwrap();
        assert_eq!(snapshot.daily_len(), 0);
        assert!(snapshot.daily.is_some());
    }

    #[test]
    fn test_bad_timestamp_is_reported() {
        let err = convert_daily(wire::DailyData {
            time: Some(vec!["first of march".to_string()]),
            weather_code: Some(vec![Some(0)]),
            temperature_2m_max: Some(vec![Some(1.0)]),
            temperature_2m_min: Some(vec![Some(0.0)]),
            apparent_temperature_max: None,
            apparent_temperature_min: None,
        })
        .unwrap_err();
        assert!(matches!(err, SkypaneError::MalformedResponse { .. }));
    }

    #[test]
    fn test_geocoding_result_to_location() {
        let result: wire::GeocodingResult = serde_json::from_value(json!({
            "id": 2657896,
            "name": "Zürich",
            "latitude": 47.36667,
            "longitude": 8.55,
            "country": "Switzerland",
            "admin1": "Zurich"
        }))
        .unwrap();

        let location: Location = result.into();
        assert_eq!(location.name, "Zürich");
        assert_eq!(location.country, "Switzerland");
        assert_eq!(location.latitude, 47.36667);
    }

    #[test]
    fn test_geocoding_result_without_country() {
        let result: wire::GeocodingResult = serde_json::from_value(json!({
            "name": "Null Island",
            "latitude": 0.0,
            "longitude": 0.0
        }))
        .unwrap();

        let location: Location = result.into();
        assert_eq!(location.country, "Unknown");
    }
}
