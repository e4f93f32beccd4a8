//! Air quality reports: current, historical range, and forecast.

use std::fmt::Write;

use crate::owm::models::{AirQuality, AirQualityComponents};
use crate::stats::{self, Trend};

use super::format_datetime;

/// The provider's discrete index mapped to a human category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AqiCategory {
    Excellent,
    Good,
    Moderate,
    Poor,
    VeryPoor,
    Unknown,
}

impl AqiCategory {
    #[must_use]
    pub const fn from_index(aqi: i64) -> Self {
        match aqi {
            1 => Self::Excellent,
            2 => Self::Good,
            3 => Self::Moderate,
            4 => Self::Poor,
            5 => Self::VeryPoor,
            _ => Self::Unknown,
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Excellent => "excellent",
            Self::Good => "good",
            Self::Moderate => "moderate",
            Self::Poor => "poor",
            Self::VeryPoor => "very poor",
            Self::Unknown => "unknown",
        }
    }

    #[must_use]
    pub const fn marker(self) -> &'static str {
        match self {
            Self::Excellent => "🟢",
            Self::Good => "🟡",
            Self::Moderate => "🟠",
            Self::Poor => "🔴",
            Self::VeryPoor => "🟣",
            Self::Unknown => "⚪",
        }
    }

    const fn guidance(self) -> &'static str {
        match self {
            Self::Excellent => "Air quality is ideal for all outdoor activities.",
            Self::Good => "Air quality is acceptable for most people.",
            Self::Moderate => {
                "Sensitive groups should consider limiting prolonged outdoor exertion."
            }
            Self::Poor => "Everyone should reduce prolonged or heavy outdoor exertion.",
            Self::VeryPoor => "Avoid outdoor activity; keep windows closed.",
            Self::Unknown => "No health guidance available for this index value.",
        }
    }
}

/// WHO-derived screening thresholds in μg/m³ (CO uses the provider scale).
const POLLUTANT_THRESHOLDS: [(&str, f64); 6] = [
    ("PM2.5", 25.0),
    ("PM10", 50.0),
    ("O₃", 100.0),
    ("NO₂", 40.0),
    ("SO₂", 20.0),
    ("CO", 10_000.0),
];

/// The pollutant exceeding its threshold by the largest ratio, or `None`
/// when every pollutant is within bounds.
#[must_use]
pub fn primary_pollutant(components: &AirQualityComponents) -> Option<(&'static str, f64)> {
    let values = [
        components.pm2_5,
        components.pm10,
        components.o3,
        components.no2,
        components.so2,
        components.co,
    ];

    POLLUTANT_THRESHOLDS
        .iter()
        .zip(values)
        .filter(|((_, threshold), value)| value > threshold)
        .max_by(|((_, t1), v1), ((_, t2), v2)| {
            (v1 / t1)
                .partial_cmp(&(v2 / t2))
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .map(|((name, _), value)| (*name, value))
}

/// Render a current or historical-range air quality report.
///
/// With more than one sample the report adds aggregate statistics and a
/// first-to-last trend (higher index is worse).
#[must_use]
pub fn format_air_quality(data: &AirQuality, range: Option<(i64, i64)>) -> String {
    let mut out = String::new();

    let _ = writeln!(
        out,
        "🌍 Air Quality at {:.4}, {:.4}",
        data.coord.lat, data.coord.lon
    );
    if let Some((start, end)) = range {
        let _ = writeln!(
            out,
            "📅 Period: {} to {} (UTC)",
            format_datetime(start, 0),
            format_datetime(end, 0)
        );
    }
    out.push('\n');

    if data.list.is_empty() {
        out.push_str("No air quality data available for this location.\n");
        return out;
    }

    let latest = &data.list[data.list.len() - 1];
    let category = AqiCategory::from_index(latest.main.aqi);
    let _ = writeln!(
        out,
        "{} AQI: {} ({})",
        category.marker(),
        latest.main.aqi,
        category.label()
    );
    out.push_str(&components_block(&latest.components));

    if let Some((name, value)) = primary_pollutant(&latest.components) {
        let _ = writeln!(out, "⚠️ Primary pollutant: {name} at {value:.1} μg/m³");
    } else {
        out.push_str("✅ No pollutant exceeds its screening threshold.\n");
    }

    if data.list.len() > 1 {
        out.push('\n');
        out.push_str(&series_block(data));
    }

    out.push('\n');
    let _ = writeln!(out, "💡 {}", category.guidance());
    out
}

/// Render the hourly air quality forecast, showing the first few samples.
#[must_use]
pub fn format_air_quality_forecast(data: &AirQuality) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "🌍 Air Quality Forecast at {:.4}, {:.4}",
        data.coord.lat, data.coord.lon
    );
    out.push('\n');

    if data.list.is_empty() {
        out.push_str("No air quality forecast available for this location.\n");
        return out;
    }

    for sample in data.list.iter().take(5) {
        let category = AqiCategory::from_index(sample.main.aqi);
        let _ = writeln!(
            out,
            "{} {} — AQI {} ({}) | PM2.5 {:.1} | PM10 {:.1} | O₃ {:.1}",
            category.marker(),
            format_datetime(sample.dt, 0),
            sample.main.aqi,
            category.label(),
            sample.components.pm2_5,
            sample.components.pm10,
            sample.components.o3
        );
    }

    if data.list.len() > 1 {
        out.push('\n');
        out.push_str(&series_block(data));
    }
    out
}

fn components_block(components: &AirQualityComponents) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "  PM2.5: {:.1} μg/m³", components.pm2_5);
    let _ = writeln!(out, "  PM10: {:.1} μg/m³", components.pm10);
    let _ = writeln!(out, "  O₃: {:.1} μg/m³", components.o3);
    let _ = writeln!(out, "  NO₂: {:.1} μg/m³", components.no2);
    let _ = writeln!(out, "  SO₂: {:.1} μg/m³", components.so2);
    let _ = writeln!(out, "  CO: {:.1} μg/m³", components.co);
    out
}

fn series_block(data: &AirQuality) -> String {
    #[allow(clippy::cast_precision_loss)]
    let indices: Vec<f64> = data.list.iter().map(|s| s.main.aqi as f64).collect();
    let Some(summary) = stats::summarize(&indices) else {
        return String::new();
    };

    let mut out = String::new();
    let _ = writeln!(out, "📊 **{} samples**", data.list.len());
    let _ = writeln!(
        out,
        "  AQI: {:.0} to {:.0} (avg {:.1})",
        summary.min, summary.max, summary.mean
    );

    let pm25: Vec<f64> = data.list.iter().map(|s| s.components.pm2_5).collect();
    let pm10: Vec<f64> = data.list.iter().map(|s| s.components.pm10).collect();
    if let (Some(pm25), Some(pm10)) = (stats::summarize(&pm25), stats::summarize(&pm10)) {
        let _ = writeln!(
            out,
            "  Average PM2.5: {:.1} μg/m³, PM10: {:.1} μg/m³",
            pm25.mean, pm10.mean
        );
    }

    if let Some(trend) = Trend::classify(&indices) {
        let line = match trend {
            Trend::Improving => "📉 Trend: improving",
            Trend::Worsening => "📈 Trend: worsening",
            Trend::Stable => "➡️ Trend: stable",
        };
        let _ = writeln!(out, "  {line}");
    }

    out
}
