//! The weather tool surface.
//!
//! One struct per tool; each holds a shared [`ToolState`] and follows the
//! same shape: deserialize arguments, make the upstream call(s), render a
//! report. Domain failures never escape `call`: they come back as an
//! `is_error: true` text report so the protocol layer always sees a
//! well-formed response.

use std::sync::Arc;

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::Value;

use crate::error::Error;
use crate::geo;
use crate::message::{CallToolResult, Content};
use crate::owm::{Language, LocationQuery, OwmClient, Units, validate_coordinates};
use crate::report;
use crate::report::alerts::SeverityLexicon;
use crate::tool::{Tool, ToolRegistry, image_content, text_content};

const MAX_TILE_ZOOM: u8 = 18;

/// Shared dependencies of every weather tool.
#[derive(Clone)]
pub struct ToolState {
    pub client: Arc<OwmClient>,
    pub lexicon: Arc<SeverityLexicon>,
}

impl ToolState {
    #[must_use]
    pub fn new(client: OwmClient) -> Self {
        Self {
            client: Arc::new(client),
            lexicon: Arc::new(SeverityLexicon::builtin()),
        }
    }
}

/// Register every weather tool on the given registry.
pub fn register_all(registry: &mut ToolRegistry, state: &ToolState) {
    registry.register(CurrentWeatherTool(state.clone()));
    registry.register(ForecastTool(state.clone()));
    registry.register(AirQualityTool(state.clone()));
    registry.register(AirQualityForecastTool(state.clone()));
    registry.register(WeatherMapTool(state.clone()));
    registry.register(RegionMapTool(state.clone()));
    registry.register(MultiLayerMapTool(state.clone()));
    registry.register(WeatherAlertsTool(state.clone()));
    registry.register(HistoricalWeatherTool(state.clone()));
    registry.register(HistoricalComparisonTool(state.clone()));
    registry.register(GeocodeTool(state.clone()));
    registry.register(ReverseGeocodeTool(state.clone()));
}

fn parse_input<T: serde::de::DeserializeOwned>(args: Value) -> Result<T, Error> {
    serde_json::from_value(args).map_err(|e| Error::InvalidQuery(e.to_string()))
}

fn schema_of<T: JsonSchema>() -> Value {
    serde_json::to_value(schemars::schema_for!(T)).unwrap_or(Value::Null)
}

/// Convert a tool outcome into a call result, rendering failures as an
/// error report instead of propagating them.
fn report_or_error(outcome: Result<Vec<Content>, Error>) -> CallToolResult {
    match outcome {
        Ok(content) => CallToolResult {
            content,
            is_error: false,
        },
        Err(err) => CallToolResult {
            content: vec![text_content(format!("⚠️ {err}"))],
            is_error: true,
        },
    }
}

fn now_timestamp() -> i64 {
    chrono::Utc::now().timestamp()
}

fn validate_layer(layer: &str) -> Result<(), Error> {
    if report::maps::KNOWN_LAYERS.contains(&layer) {
        Ok(())
    } else {
        Err(Error::InvalidQuery(format!(
            "unknown map layer '{layer}'; expected one of: {}",
            report::maps::KNOWN_LAYERS.join(", ")
        )))
    }
}

fn validate_zoom(zoom: u8) -> Result<(), Error> {
    if zoom > MAX_TILE_ZOOM {
        return Err(Error::InvalidQuery(format!(
            "zoom {zoom} out of range [0, {MAX_TILE_ZOOM}]"
        )));
    }
    Ok(())
}

#[derive(Debug, Deserialize, JsonSchema)]
struct CurrentWeatherInput {
    /// City name, optionally with a country code ("London,GB").
    city: Option<String>,
    lat: Option<f64>,
    lon: Option<f64>,
    /// Zip or postal code with country ("94040,US").
    zip: Option<String>,
    units: Option<Units>,
    lang: Option<Language>,
}

impl CurrentWeatherInput {
    fn location(&self) -> LocationQuery {
        LocationQuery {
            city: self.city.clone(),
            lat: self.lat,
            lon: self.lon,
            zip: self.zip.clone(),
        }
    }
}

struct CurrentWeatherTool(ToolState);

#[async_trait]
impl Tool for CurrentWeatherTool {
    fn name(&self) -> &str {
        "get_current_weather"
    }

    fn description(&self) -> &str {
        "Get current weather conditions for a location given as a city name, coordinates, or zip code"
    }

    fn input_schema(&self) -> Value {
        schema_of::<CurrentWeatherInput>()
    }

    async fn call(&self, args: Value) -> eyre::Result<CallToolResult> {
        Ok(report_or_error(self.run(args).await))
    }
}

impl CurrentWeatherTool {
    async fn run(&self, args: Value) -> Result<Vec<Content>, Error> {
        let input: CurrentWeatherInput = parse_input(args)?;
        let units = input.units.unwrap_or_default();
        let weather = self
            .0
            .client
            .current_weather(
                &input.location(),
                units,
                input.lang.unwrap_or_default(),
            )
            .await?;
        Ok(vec![text_content(report::current::format_current_weather(
            &weather, units,
        ))])
    }
}

#[derive(Debug, Deserialize, JsonSchema)]
struct ForecastInput {
    city: Option<String>,
    lat: Option<f64>,
    lon: Option<f64>,
    zip: Option<String>,
    units: Option<Units>,
    lang: Option<Language>,
    /// Number of 3-hour slots to return (max 40).
    cnt: Option<u32>,
}

struct ForecastTool(ToolState);

#[async_trait]
impl Tool for ForecastTool {
    fn name(&self) -> &str {
        "get_weather_forecast"
    }

    fn description(&self) -> &str {
        "Get a 5-day weather forecast in 3-hour steps, with daily grouping and a summary"
    }

    fn input_schema(&self) -> Value {
        schema_of::<ForecastInput>()
    }

    async fn call(&self, args: Value) -> eyre::Result<CallToolResult> {
        Ok(report_or_error(self.run(args).await))
    }
}

impl ForecastTool {
    async fn run(&self, args: Value) -> Result<Vec<Content>, Error> {
        let input: ForecastInput = parse_input(args)?;
        let location = LocationQuery {
            city: input.city,
            lat: input.lat,
            lon: input.lon,
            zip: input.zip,
        };
        let units = input.units.unwrap_or_default();
        let forecast = self
            .0
            .client
            .forecast(
                &location,
                units,
                input.lang.unwrap_or_default(),
                input.cnt.map(|c| c.min(40)),
            )
            .await?;
        Ok(vec![text_content(report::forecast::format_forecast(
            &forecast, units,
        ))])
    }
}

#[derive(Debug, Deserialize, JsonSchema)]
struct AirQualityInput {
    lat: f64,
    lon: f64,
    /// Unix timestamp opening a historical window; requires `end`.
    start: Option<i64>,
    /// Unix timestamp closing a historical window; requires `start`.
    end: Option<i64>,
}

struct AirQualityTool(ToolState);

#[async_trait]
impl Tool for AirQualityTool {
    fn name(&self) -> &str {
        "get_air_quality"
    }

    fn description(&self) -> &str {
        "Get current air quality for coordinates, or historical air quality when start and end timestamps are given"
    }

    fn input_schema(&self) -> Value {
        schema_of::<AirQualityInput>()
    }

    async fn call(&self, args: Value) -> eyre::Result<CallToolResult> {
        Ok(report_or_error(self.run(args).await))
    }
}

impl AirQualityTool {
    async fn run(&self, args: Value) -> Result<Vec<Content>, Error> {
        let input: AirQualityInput = parse_input(args)?;
        let report = match (input.start, input.end) {
            (Some(start), Some(end)) => {
                let data = self
                    .0
                    .client
                    .air_quality_history(input.lat, input.lon, start, end)
                    .await?;
                report::air_quality::format_air_quality(&data, Some((start, end)))
            }
            (None, None) => {
                let data = self.0.client.air_quality(input.lat, input.lon).await?;
                report::air_quality::format_air_quality(&data, None)
            }
            _ => {
                return Err(Error::InvalidQuery(
                    "historical air quality requires both start and end timestamps".to_string(),
                ));
            }
        };
        Ok(vec![text_content(report)])
    }
}

#[derive(Debug, Deserialize, JsonSchema)]
struct AirQualityForecastInput {
    lat: f64,
    lon: f64,
}

struct AirQualityForecastTool(ToolState);

#[async_trait]
impl Tool for AirQualityForecastTool {
    fn name(&self) -> &str {
        "get_air_quality_forecast"
    }

    fn description(&self) -> &str {
        "Get the hourly air quality forecast for coordinates"
    }

    fn input_schema(&self) -> Value {
        schema_of::<AirQualityForecastInput>()
    }

    async fn call(&self, args: Value) -> eyre::Result<CallToolResult> {
        Ok(report_or_error(self.run(args).await))
    }
}

impl AirQualityForecastTool {
    async fn run(&self, args: Value) -> Result<Vec<Content>, Error> {
        let input: AirQualityForecastInput = parse_input(args)?;
        let data = self
            .0
            .client
            .air_quality_forecast(input.lat, input.lon)
            .await?;
        Ok(vec![text_content(
            report::air_quality::format_air_quality_forecast(&data),
        )])
    }
}

#[derive(Debug, Deserialize, JsonSchema)]
struct WeatherMapInput {
    /// Tile layer: clouds_new, precipitation_new, pressure_new, wind_new, or temp_new.
    layer: String,
    /// Zoom level, 0 to 18.
    z: u8,
    x: u32,
    y: u32,
}

struct WeatherMapTool(ToolState);

#[async_trait]
impl Tool for WeatherMapTool {
    fn name(&self) -> &str {
        "get_weather_map"
    }

    fn description(&self) -> &str {
        "Get a weather map tile by explicit tile coordinates"
    }

    fn input_schema(&self) -> Value {
        schema_of::<WeatherMapInput>()
    }

    async fn call(&self, args: Value) -> eyre::Result<CallToolResult> {
        Ok(report_or_error(self.run(args)))
    }
}

impl WeatherMapTool {
    fn run(&self, args: Value) -> Result<Vec<Content>, Error> {
        let input: WeatherMapInput = parse_input(args)?;
        validate_layer(&input.layer)?;
        validate_zoom(input.z)?;
        let n = 1u32 << input.z;
        if input.x >= n || input.y >= n {
            return Err(Error::InvalidQuery(format!(
                "tile ({}, {}) out of range for zoom {} (max {})",
                input.x,
                input.y,
                input.z,
                n - 1
            )));
        }

        let tile = geo::TileCoordinate {
            x: input.x,
            y: input.y,
            zoom: input.z,
        };
        let bounds = geo::tile_to_bounds(tile.x, tile.y, tile.zoom);
        let url = self.0.client.tile_url(&input.layer, input.z, input.x, input.y);

        Ok(vec![
            text_content(report::maps::format_tile_map(
                &input.layer,
                &tile,
                &bounds,
                &url,
            )),
            image_content(url, "image/png"),
        ])
    }
}

#[derive(Debug, Deserialize, JsonSchema)]
struct RegionMapInput {
    layer: String,
    lat: f64,
    lon: f64,
    /// Zoom level, 0 to 18. Defaults to 10.
    zoom: Option<u8>,
}

struct RegionMapTool(ToolState);

#[async_trait]
impl Tool for RegionMapTool {
    fn name(&self) -> &str {
        "get_region_weather_map"
    }

    fn description(&self) -> &str {
        "Get the weather map tile covering a geographic point"
    }

    fn input_schema(&self) -> Value {
        schema_of::<RegionMapInput>()
    }

    async fn call(&self, args: Value) -> eyre::Result<CallToolResult> {
        Ok(report_or_error(self.run(args)))
    }
}

impl RegionMapTool {
    fn run(&self, args: Value) -> Result<Vec<Content>, Error> {
        let input: RegionMapInput = parse_input(args)?;
        validate_layer(&input.layer)?;
        validate_coordinates(input.lat, input.lon)?;
        let zoom = input.zoom.unwrap_or(10);
        validate_zoom(zoom)?;

        let tile = geo::lat_lon_to_tile(input.lat, input.lon, zoom);
        let bounds = geo::tile_to_bounds(tile.x, tile.y, zoom);
        let url = self.0.client.tile_url(&input.layer, zoom, tile.x, tile.y);

        Ok(vec![
            text_content(report::maps::format_region_map(
                &input.layer,
                input.lat,
                input.lon,
                &tile,
                &bounds,
                &url,
            )),
            image_content(url, "image/png"),
        ])
    }
}

#[derive(Debug, Deserialize, JsonSchema)]
struct MultiLayerMapInput {
    /// Tile layers to combine over the same tile.
    layers: Vec<String>,
    lat: f64,
    lon: f64,
    zoom: Option<u8>,
}

struct MultiLayerMapTool(ToolState);

#[async_trait]
impl Tool for MultiLayerMapTool {
    fn name(&self) -> &str {
        "get_multi_layer_weather_map"
    }

    fn description(&self) -> &str {
        "Get several weather map layers covering the same geographic point"
    }

    fn input_schema(&self) -> Value {
        schema_of::<MultiLayerMapInput>()
    }

    async fn call(&self, args: Value) -> eyre::Result<CallToolResult> {
        Ok(report_or_error(self.run(args)))
    }
}

impl MultiLayerMapTool {
    fn run(&self, args: Value) -> Result<Vec<Content>, Error> {
        let input: MultiLayerMapInput = parse_input(args)?;
        if input.layers.is_empty() {
            return Err(Error::InvalidQuery("no map layers requested".to_string()));
        }
        for layer in &input.layers {
            validate_layer(layer)?;
        }
        validate_coordinates(input.lat, input.lon)?;
        let zoom = input.zoom.unwrap_or(10);
        validate_zoom(zoom)?;

        let tile = geo::lat_lon_to_tile(input.lat, input.lon, zoom);
        let layers: Vec<(String, String)> = input
            .layers
            .iter()
            .map(|layer| {
                (
                    layer.clone(),
                    self.0.client.tile_url(layer, zoom, tile.x, tile.y),
                )
            })
            .collect();

        let mut content = vec![text_content(report::maps::format_multi_layer(
            input.lat, input.lon, zoom, &layers,
        ))];
        for (_, url) in layers {
            content.push(image_content(url, "image/png"));
        }
        Ok(content)
    }
}

#[derive(Debug, Deserialize, JsonSchema)]
struct WeatherAlertsInput {
    lat: f64,
    lon: f64,
    lang: Option<Language>,
}

struct WeatherAlertsTool(ToolState);

#[async_trait]
impl Tool for WeatherAlertsTool {
    fn name(&self) -> &str {
        "get_weather_alerts"
    }

    fn description(&self) -> &str {
        "Get active government weather alerts for coordinates, ranked by severity"
    }

    fn input_schema(&self) -> Value {
        schema_of::<WeatherAlertsInput>()
    }

    async fn call(&self, args: Value) -> eyre::Result<CallToolResult> {
        Ok(report_or_error(self.run(args).await))
    }
}

impl WeatherAlertsTool {
    async fn run(&self, args: Value) -> Result<Vec<Content>, Error> {
        let input: WeatherAlertsInput = parse_input(args)?;
        let data = self
            .0
            .client
            .one_call(
                input.lat,
                input.lon,
                &["minutely", "hourly", "daily", "current"],
                Units::Metric,
                input.lang.unwrap_or_default(),
            )
            .await?;
        Ok(vec![text_content(report::alerts::format_weather_alerts(
            &data,
            input.lat,
            input.lon,
            now_timestamp(),
            &self.0.lexicon,
        ))])
    }
}

#[derive(Debug, Deserialize, JsonSchema)]
struct HistoricalWeatherInput {
    lat: f64,
    lon: f64,
    /// Unix timestamp of the day to look up.
    dt: i64,
    units: Option<Units>,
    lang: Option<Language>,
}

struct HistoricalWeatherTool(ToolState);

#[async_trait]
impl Tool for HistoricalWeatherTool {
    fn name(&self) -> &str {
        "get_historical_weather"
    }

    fn description(&self) -> &str {
        "Get historical weather observations for coordinates on a past date"
    }

    fn input_schema(&self) -> Value {
        schema_of::<HistoricalWeatherInput>()
    }

    async fn call(&self, args: Value) -> eyre::Result<CallToolResult> {
        Ok(report_or_error(self.run(args).await))
    }
}

impl HistoricalWeatherTool {
    async fn run(&self, args: Value) -> Result<Vec<Content>, Error> {
        let input: HistoricalWeatherInput = parse_input(args)?;
        let units = input.units.unwrap_or_default();
        let data = self
            .0
            .client
            .historical_weather(
                input.lat,
                input.lon,
                input.dt,
                units,
                input.lang.unwrap_or_default(),
            )
            .await?;
        Ok(vec![text_content(report::historical::format_historical(
            &data, input.dt, units,
        ))])
    }
}

#[derive(Debug, Deserialize, JsonSchema)]
struct HistoricalComparisonInput {
    lat: f64,
    lon: f64,
    /// Unix timestamps of the days to compare (2 to 5).
    timestamps: Vec<i64>,
    units: Option<Units>,
}

struct HistoricalComparisonTool(ToolState);

#[async_trait]
impl Tool for HistoricalComparisonTool {
    fn name(&self) -> &str {
        "compare_historical_weather"
    }

    fn description(&self) -> &str {
        "Compare historical weather across several past days at the same coordinates"
    }

    fn input_schema(&self) -> Value {
        schema_of::<HistoricalComparisonInput>()
    }

    async fn call(&self, args: Value) -> eyre::Result<CallToolResult> {
        Ok(report_or_error(self.run(args).await))
    }
}

impl HistoricalComparisonTool {
    async fn run(&self, args: Value) -> Result<Vec<Content>, Error> {
        let input: HistoricalComparisonInput = parse_input(args)?;
        if input.timestamps.len() < 2 || input.timestamps.len() > 5 {
            return Err(Error::InvalidQuery(format!(
                "comparison needs 2 to 5 timestamps, got {}",
                input.timestamps.len()
            )));
        }
        let units = input.units.unwrap_or_default();

        // One upstream call per day, in the caller's order.
        let mut days = Vec::with_capacity(input.timestamps.len());
        for &dt in &input.timestamps {
            let data = self
                .0
                .client
                .historical_weather(input.lat, input.lon, dt, units, Language::En)
                .await?;
            let label = report::format_date(dt, data.timezone_offset);
            days.push((label, data));
        }

        Ok(vec![text_content(
            report::historical::format_multi_day_comparison(&days, units),
        )])
    }
}

#[derive(Debug, Deserialize, JsonSchema)]
struct GeocodeInput {
    /// Place name to resolve ("Paris" or "Paris,FR").
    q: String,
    /// Maximum number of matches, 1 to 5.
    limit: Option<u32>,
}

struct GeocodeTool(ToolState);

#[async_trait]
impl Tool for GeocodeTool {
    fn name(&self) -> &str {
        "geocode"
    }

    fn description(&self) -> &str {
        "Resolve a place name to geographic coordinates"
    }

    fn input_schema(&self) -> Value {
        schema_of::<GeocodeInput>()
    }

    async fn call(&self, args: Value) -> eyre::Result<CallToolResult> {
        Ok(report_or_error(self.run(args).await))
    }
}

impl GeocodeTool {
    async fn run(&self, args: Value) -> Result<Vec<Content>, Error> {
        let input: GeocodeInput = parse_input(args)?;
        let results = self.0.client.geocode(&input.q, input.limit).await?;
        Ok(vec![text_content(
            report::geocode::format_geocode_results(&input.q, &results),
        )])
    }
}

#[derive(Debug, Deserialize, JsonSchema)]
struct ReverseGeocodeInput {
    lat: f64,
    lon: f64,
    limit: Option<u32>,
}

struct ReverseGeocodeTool(ToolState);

#[async_trait]
impl Tool for ReverseGeocodeTool {
    fn name(&self) -> &str {
        "reverse_geocode"
    }

    fn description(&self) -> &str {
        "Resolve geographic coordinates to nearby place names"
    }

    fn input_schema(&self) -> Value {
        schema_of::<ReverseGeocodeInput>()
    }

    async fn call(&self, args: Value) -> eyre::Result<CallToolResult> {
        Ok(report_or_error(self.run(args).await))
    }
}

impl ReverseGeocodeTool {
    async fn run(&self, args: Value) -> Result<Vec<Content>, Error> {
        let input: ReverseGeocodeInput = parse_input(args)?;
        let results = self
            .0
            .client
            .reverse_geocode(input.lat, input.lon, input.limit)
            .await?;
        Ok(vec![text_content(report::geocode::format_reverse_geocode(
            input.lat, input.lon, &results,
        ))])
    }
}
