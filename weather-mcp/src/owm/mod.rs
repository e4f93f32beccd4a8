//! OpenWeatherMap client adapter.
//!
//! [`OwmClient`] owns one [`reqwest::Client`] and exposes one async method
//! per provider endpoint. All methods return typed [`models`] values; errors
//! follow the taxonomy in [`crate::error`]. No call is ever retried.

pub mod models;

use std::time::Duration;

use schemars::JsonSchema;
use serde::Deserialize;
use tracing::debug;

use crate::error::{Error, Result};
use models::{
    AirQuality, CurrentWeather, Forecast, GeocodeResult, Historical, OneCall,
};

const DATA_BASE: &str = "https://api.openweathermap.org/data/2.5";
const ONE_CALL_BASE: &str = "https://api.openweathermap.org/data/3.0";
const GEO_BASE: &str = "https://api.openweathermap.org/geo/1.0";
const TILE_BASE: &str = "https://tile.openweathermap.org/map";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Measurement system for temperature and wind speed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    Standard,
    #[default]
    Metric,
    Imperial,
}

impl Units {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Metric => "metric",
            Self::Imperial => "imperial",
        }
    }

    #[must_use]
    pub const fn temperature_suffix(self) -> &'static str {
        match self {
            Self::Standard => "K",
            Self::Metric => "°C",
            Self::Imperial => "°F",
        }
    }

    #[must_use]
    pub const fn wind_speed_suffix(self) -> &'static str {
        match self {
            Self::Standard | Self::Metric => "m/s",
            Self::Imperial => "mph",
        }
    }
}

/// Response language passed through to the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, JsonSchema)]
pub enum Language {
    #[serde(rename = "zh_cn")]
    ZhCn,
    #[default]
    #[serde(rename = "en")]
    En,
    #[serde(rename = "es")]
    Es,
    #[serde(rename = "fr")]
    Fr,
    #[serde(rename = "de")]
    De,
    #[serde(rename = "ja")]
    Ja,
    #[serde(rename = "ko")]
    Ko,
    #[serde(rename = "ru")]
    Ru,
}

impl Language {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ZhCn => "zh_cn",
            Self::En => "en",
            Self::Es => "es",
            Self::Fr => "fr",
            Self::De => "de",
            Self::Ja => "ja",
            Self::Ko => "ko",
            Self::Ru => "ru",
        }
    }
}

/// A location given as a city name, coordinates, or a zip code.
///
/// When more than one field is set, precedence is city, then coordinates,
/// then zip. An entirely empty query is rejected.
#[derive(Debug, Clone, Default)]
pub struct LocationQuery {
    pub city: Option<String>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub zip: Option<String>,
}

impl LocationQuery {
    /// Resolve to provider query parameters.
    pub fn to_params(&self) -> Result<Vec<(String, String)>> {
        if let Some(city) = &self.city {
            if !city.trim().is_empty() {
                return Ok(vec![("q".to_string(), city.clone())]);
            }
        }
        if let (Some(lat), Some(lon)) = (self.lat, self.lon) {
            validate_coordinates(lat, lon)?;
            return Ok(vec![
                ("lat".to_string(), lat.to_string()),
                ("lon".to_string(), lon.to_string()),
            ]);
        }
        if let Some(zip) = &self.zip {
            if !zip.trim().is_empty() {
                return Ok(vec![("zip".to_string(), zip.clone())]);
            }
        }
        Err(Error::InvalidQuery(
            "location requires a city name, lat/lon coordinates, or a zip code".to_string(),
        ))
    }
}

/// Reject coordinates outside the valid geographic range before any
/// network traffic happens.
pub fn validate_coordinates(lat: f64, lon: f64) -> Result<()> {
    if !(-90.0..=90.0).contains(&lat) {
        return Err(Error::InvalidQuery(format!(
            "latitude {lat} out of range [-90, 90]"
        )));
    }
    if !(-180.0..=180.0).contains(&lon) {
        return Err(Error::InvalidQuery(format!(
            "longitude {lon} out of range [-180, 180]"
        )));
    }
    Ok(())
}

/// Client configuration. Base URLs are overridable so tests can point at a
/// local mock server.
#[derive(Debug, Clone)]
pub struct OwmConfig {
    pub api_key: String,
    pub data_base: String,
    pub one_call_base: String,
    pub geo_base: String,
    pub tile_base: String,
}

impl OwmConfig {
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            data_base: DATA_BASE.to_string(),
            one_call_base: ONE_CALL_BASE.to_string(),
            geo_base: GEO_BASE.to_string(),
            tile_base: TILE_BASE.to_string(),
        }
    }
}

/// Error body the provider returns on non-2xx responses. `cod` arrives as
/// a number on some endpoints and a string on others.
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    cod: serde_json::Value,
    message: String,
}

pub struct OwmClient {
    http: reqwest::Client,
    config: OwmConfig,
}

impl OwmClient {
    pub fn new(config: OwmConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| Error::Network(e.to_string()))?;
        Ok(Self { http, config })
    }

    /// `GET /weather`
    pub async fn current_weather(
        &self,
        location: &LocationQuery,
        units: Units,
        lang: Language,
    ) -> Result<CurrentWeather> {
        let mut params = location.to_params()?;
        params.push(("units".to_string(), units.as_str().to_string()));
        params.push(("lang".to_string(), lang.as_str().to_string()));
        self.get_json(&self.config.data_base, "/weather", params).await
    }

    /// `GET /forecast` (3-hour slots, up to 5 days).
    pub async fn forecast(
        &self,
        location: &LocationQuery,
        units: Units,
        lang: Language,
        cnt: Option<u32>,
    ) -> Result<Forecast> {
        let mut params = location.to_params()?;
        params.push(("units".to_string(), units.as_str().to_string()));
        params.push(("lang".to_string(), lang.as_str().to_string()));
        if let Some(cnt) = cnt {
            params.push(("cnt".to_string(), cnt.to_string()));
        }
        self.get_json(&self.config.data_base, "/forecast", params).await
    }

    /// `GET /air_pollution`
    pub async fn air_quality(&self, lat: f64, lon: f64) -> Result<AirQuality> {
        validate_coordinates(lat, lon)?;
        let params = coord_params(lat, lon);
        self.get_json(&self.config.data_base, "/air_pollution", params)
            .await
    }

    /// `GET /air_pollution/history`
    pub async fn air_quality_history(
        &self,
        lat: f64,
        lon: f64,
        start: i64,
        end: i64,
    ) -> Result<AirQuality> {
        validate_coordinates(lat, lon)?;
        if end < start {
            return Err(Error::InvalidQuery(format!(
                "end timestamp {end} precedes start timestamp {start}"
            )));
        }
        let mut params = coord_params(lat, lon);
        params.push(("start".to_string(), start.to_string()));
        params.push(("end".to_string(), end.to_string()));
        self.get_json(&self.config.data_base, "/air_pollution/history", params)
            .await
    }

    /// `GET /air_pollution/forecast`
    pub async fn air_quality_forecast(&self, lat: f64, lon: f64) -> Result<AirQuality> {
        validate_coordinates(lat, lon)?;
        let params = coord_params(lat, lon);
        self.get_json(&self.config.data_base, "/air_pollution/forecast", params)
            .await
    }

    /// `GET /onecall`, excluding the named data blocks.
    pub async fn one_call(
        &self,
        lat: f64,
        lon: f64,
        exclude: &[&str],
        units: Units,
        lang: Language,
    ) -> Result<OneCall> {
        validate_coordinates(lat, lon)?;
        let mut params = coord_params(lat, lon);
        if !exclude.is_empty() {
            params.push(("exclude".to_string(), exclude.join(",")));
        }
        params.push(("units".to_string(), units.as_str().to_string()));
        params.push(("lang".to_string(), lang.as_str().to_string()));
        self.get_json(&self.config.one_call_base, "/onecall", params)
            .await
    }

    /// `GET /onecall/timemachine` for one historical timestamp.
    pub async fn historical_weather(
        &self,
        lat: f64,
        lon: f64,
        dt: i64,
        units: Units,
        lang: Language,
    ) -> Result<Historical> {
        validate_coordinates(lat, lon)?;
        let mut params = coord_params(lat, lon);
        params.push(("dt".to_string(), dt.to_string()));
        params.push(("units".to_string(), units.as_str().to_string()));
        params.push(("lang".to_string(), lang.as_str().to_string()));
        self.get_json(&self.config.one_call_base, "/onecall/timemachine", params)
            .await
    }

    /// `GET /direct`: resolve a place name to coordinates.
    pub async fn geocode(&self, query: &str, limit: Option<u32>) -> Result<Vec<GeocodeResult>> {
        if query.trim().is_empty() {
            return Err(Error::InvalidQuery("geocode query is empty".to_string()));
        }
        let params = vec![
            ("q".to_string(), query.to_string()),
            ("limit".to_string(), clamp_limit(limit).to_string()),
        ];
        self.get_json(&self.config.geo_base, "/direct", params).await
    }

    /// `GET /reverse`: resolve coordinates to place names.
    pub async fn reverse_geocode(
        &self,
        lat: f64,
        lon: f64,
        limit: Option<u32>,
    ) -> Result<Vec<GeocodeResult>> {
        validate_coordinates(lat, lon)?;
        let mut params = coord_params(lat, lon);
        params.push(("limit".to_string(), clamp_limit(limit).to_string()));
        self.get_json(&self.config.geo_base, "/reverse", params).await
    }

    /// URL of one rendered map tile. No request is made; tile URLs are
    /// handed to the client for fetching.
    #[must_use]
    pub fn tile_url(&self, layer: &str, zoom: u8, x: u32, y: u32) -> String {
        format!(
            "{}/{layer}/{zoom}/{x}/{y}.png?appid={}",
            self.config.tile_base, self.config.api_key
        )
    }

    /// Probe the API key with a minimal request. Used once at startup;
    /// any error means the key is unusable.
    pub async fn validate_api_key(&self) -> Result<()> {
        let query = LocationQuery {
            city: Some("London".to_string()),
            ..LocationQuery::default()
        };
        self.current_weather(&query, Units::Metric, Language::En)
            .await?;
        Ok(())
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        base: &str,
        path: &str,
        mut params: Vec<(String, String)>,
    ) -> Result<T> {
        params.push(("appid".to_string(), self.config.api_key.clone()));

        let url = format!("{base}{path}");
        debug!(%url, "provider request");

        let response = self
            .http
            .get(&url)
            .query(&params)
            .send()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let code = status.as_u16().to_string();
            return match response.json::<ApiErrorBody>().await {
                Ok(body) => Err(Error::UpstreamApi {
                    code: match body.cod {
                        serde_json::Value::String(s) => s,
                        other => other.to_string(),
                    },
                    message: body.message,
                }),
                Err(_) => Err(Error::UpstreamApi {
                    code,
                    message: format!("request to {path} failed"),
                }),
            };
        }

        response
            .json::<T>()
            .await
            .map_err(|e| Error::Network(format!("failed to decode response from {path}: {e}")))
    }
}

fn coord_params(lat: f64, lon: f64) -> Vec<(String, String)> {
    vec![
        ("lat".to_string(), lat.to_string()),
        ("lon".to_string(), lon.to_string()),
    ]
}

fn clamp_limit(limit: Option<u32>) -> u32 {
    limit.unwrap_or(5).clamp(1, 5)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client_for(server: &mockito::ServerGuard) -> OwmClient {
        let mut config = OwmConfig::new("test-key");
        config.data_base = server.url();
        config.one_call_base = server.url();
        config.geo_base = server.url();
        OwmClient::new(config).unwrap()
    }

    #[test]
    fn city_takes_precedence_over_coordinates() {
        let query = LocationQuery {
            city: Some("Oslo".to_string()),
            lat: Some(59.91),
            lon: Some(10.75),
            zip: None,
        };
        let params = query.to_params().unwrap();
        assert_eq!(params, vec![("q".to_string(), "Oslo".to_string())]);
    }

    #[test]
    fn coordinates_take_precedence_over_zip() {
        let query = LocationQuery {
            city: None,
            lat: Some(59.91),
            lon: Some(10.75),
            zip: Some("0150,NO".to_string()),
        };
        let params = query.to_params().unwrap();
        assert_eq!(params[0].0, "lat");
        assert_eq!(params[1].0, "lon");
    }

    #[test]
    fn empty_location_is_invalid() {
        let err = LocationQuery::default().to_params().unwrap_err();
        assert!(matches!(err, Error::InvalidQuery(_)));
    }

    #[test]
    fn out_of_range_latitude_is_invalid() {
        let query = LocationQuery {
            lat: Some(91.0),
            lon: Some(0.0),
            ..LocationQuery::default()
        };
        assert!(matches!(
            query.to_params().unwrap_err(),
            Error::InvalidQuery(_)
        ));
    }

    #[test]
    fn geocode_limit_is_clamped() {
        assert_eq!(clamp_limit(None), 5);
        assert_eq!(clamp_limit(Some(0)), 1);
        assert_eq!(clamp_limit(Some(3)), 3);
        assert_eq!(clamp_limit(Some(50)), 5);
    }

    #[tokio::test]
    async fn current_weather_parses_success_response() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/weather")
            .match_query(mockito::Matcher::UrlEncoded("q".into(), "London".into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{
                    "coord": {"lat": 51.5074, "lon": -0.1278},
                    "weather": [{"id": 800, "main": "Clear",
                                 "description": "clear sky", "icon": "01d"}],
                    "main": {"temp": 15.0, "feels_like": 14.2, "temp_min": 13.0,
                             "temp_max": 17.0, "pressure": 1015, "humidity": 70},
                    "visibility": 10000,
                    "wind": {"speed": 3.5, "deg": 220},
                    "clouds": {"all": 5},
                    "dt": 1700000000,
                    "sys": {"country": "GB", "sunrise": 1699990000, "sunset": 1700020000},
                    "timezone": 0,
                    "name": "London"
                }"#,
            )
            .create_async()
            .await;

        let client = client_for(&server);
        let query = LocationQuery {
            city: Some("London".to_string()),
            ..LocationQuery::default()
        };
        let weather = client
            .current_weather(&query, Units::Metric, Language::En)
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(weather.name, "London");
        assert!((weather.main.temp - 15.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn provider_error_body_maps_to_upstream_api() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/weather")
            .match_query(mockito::Matcher::Any)
            .with_status(401)
            .with_header("content-type", "application/json")
            .with_body(r#"{"cod": 401, "message": "Invalid API key"}"#)
            .create_async()
            .await;

        let client = client_for(&server);
        let query = LocationQuery {
            city: Some("London".to_string()),
            ..LocationQuery::default()
        };
        let err = client
            .current_weather(&query, Units::Metric, Language::En)
            .await
            .unwrap_err();

        match err {
            Error::UpstreamApi { code, message } => {
                assert_eq!(code, "401");
                assert_eq!(message, "Invalid API key");
            }
            other => panic!("expected UpstreamApi, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn backwards_history_window_is_invalid() {
        let config = OwmConfig::new("test-key");
        let client = OwmClient::new(config).unwrap();
        let err = client
            .air_quality_history(39.9, 116.4, 2000, 1000)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidQuery(_)));
    }

    #[test]
    fn tile_url_embeds_key_and_coordinates() {
        let client = OwmClient::new(OwmConfig::new("abc123")).unwrap();
        assert_eq!(
            client.tile_url("temp_new", 10, 511, 340),
            "https://tile.openweathermap.org/map/temp_new/10/511/340.png?appid=abc123"
        );
    }
}
