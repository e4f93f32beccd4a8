//! Typed views of OpenWeatherMap JSON responses.
//!
//! These structs are the single translation boundary to the provider
//! schema: formatters consume them and never touch raw JSON. Fields whose
//! presence varies by response (`rain`, `snow`, `gust`, `uvi`, ...) are
//! `Option`s rather than untyped maps.

use serde::Deserialize;

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

/// One weather condition entry (`weather[]` in provider responses).
#[derive(Debug, Clone, Deserialize)]
pub struct Condition {
    pub id: i64,
    pub main: String,
    pub description: String,
    pub icon: String,
}

/// The `main` block of current/forecast responses.
#[derive(Debug, Clone, Deserialize)]
pub struct MainData {
    pub temp: f64,
    pub feels_like: f64,
    pub temp_min: f64,
    pub temp_max: f64,
    pub pressure: f64,
    pub humidity: f64,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Wind {
    pub speed: f64,
    pub deg: f64,
    pub gust: Option<f64>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Clouds {
    pub all: f64,
}

/// Rain or snow volume keyed by accumulation window.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Precipitation {
    #[serde(rename = "1h")]
    pub one_hour: Option<f64>,
    #[serde(rename = "3h")]
    pub three_hours: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Sys {
    pub country: String,
    pub sunrise: i64,
    pub sunset: i64,
}

/// `GET /data/2.5/weather`
#[derive(Debug, Clone, Deserialize)]
pub struct CurrentWeather {
    pub coord: Coordinates,
    pub weather: Vec<Condition>,
    pub main: MainData,
    pub visibility: Option<f64>,
    pub wind: Wind,
    pub clouds: Clouds,
    pub rain: Option<Precipitation>,
    pub snow: Option<Precipitation>,
    pub dt: i64,
    pub sys: Sys,
    /// Shift from UTC in seconds.
    pub timezone: i64,
    pub name: String,
}

/// One 3-hour slot of the 5-day forecast.
#[derive(Debug, Clone, Deserialize)]
pub struct ForecastSlot {
    pub dt: i64,
    pub main: MainData,
    pub weather: Vec<Condition>,
    pub clouds: Clouds,
    pub wind: Wind,
    /// Probability of precipitation in [0, 1].
    #[serde(default)]
    pub pop: f64,
    pub rain: Option<Precipitation>,
    pub snow: Option<Precipitation>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct City {
    pub name: String,
    pub coord: Coordinates,
    pub country: String,
    /// Shift from UTC in seconds.
    pub timezone: i64,
}

/// `GET /data/2.5/forecast`
#[derive(Debug, Clone, Deserialize)]
pub struct Forecast {
    pub cnt: u32,
    pub list: Vec<ForecastSlot>,
    pub city: City,
}

/// Pollutant concentrations in μg/m³.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct AirQualityComponents {
    pub co: f64,
    pub no: f64,
    pub no2: f64,
    pub o3: f64,
    pub so2: f64,
    pub pm2_5: f64,
    pub pm10: f64,
    pub nh3: f64,
}

/// The provider's discrete 1..=5 air quality index.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct AirQualityIndex {
    pub aqi: i64,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct AirQualitySample {
    pub dt: i64,
    pub main: AirQualityIndex,
    pub components: AirQualityComponents,
}

/// `GET /data/2.5/air_pollution[...]` (current, history, and forecast all
/// share this shape; they differ only in how many samples `list` holds).
#[derive(Debug, Clone, Deserialize)]
pub struct AirQuality {
    pub coord: Coordinates,
    pub list: Vec<AirQualitySample>,
}

/// One government-issued weather alert from the One Call bundle.
///
/// The provider does not guarantee `end >= start`; consumers must tolerate
/// a violation.
#[derive(Debug, Clone, Deserialize)]
pub struct Alert {
    pub sender_name: String,
    pub event: String,
    pub start: i64,
    pub end: i64,
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// `GET /data/3.0/onecall`, reduced to the fields the alert tool consumes.
#[derive(Debug, Clone, Deserialize)]
pub struct OneCall {
    pub lat: f64,
    pub lon: f64,
    pub timezone: String,
    pub timezone_offset: i64,
    #[serde(default)]
    pub alerts: Vec<Alert>,
}

/// One hourly observation from the timemachine endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct HistoricalPoint {
    pub dt: i64,
    pub temp: f64,
    pub feels_like: f64,
    pub pressure: f64,
    pub humidity: f64,
    pub uvi: Option<f64>,
    pub clouds: f64,
    pub wind_speed: f64,
    pub wind_deg: f64,
    pub weather: Vec<Condition>,
    pub rain: Option<Precipitation>,
    pub snow: Option<Precipitation>,
}

/// `GET /data/3.0/onecall/timemachine`
#[derive(Debug, Clone, Deserialize)]
pub struct Historical {
    pub lat: f64,
    pub lon: f64,
    pub timezone: String,
    pub timezone_offset: i64,
    pub data: Vec<HistoricalPoint>,
}

/// One match from the geocoding endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct GeocodeResult {
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    pub country: String,
    pub state: Option<String>,
}
