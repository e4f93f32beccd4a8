//! Historical weather reports, single day and multi-day comparison.

use std::collections::HashMap;
use std::fmt::Write;

use crate::owm::Units;
use crate::owm::models::Historical;
use crate::stats;

use super::{format_datetime, format_temperature, format_time, format_wind_speed};

const MAX_HOURLY_LINES: usize = 12;

/// Render the observations for one historical day.
#[must_use]
pub fn format_historical(data: &Historical, dt: i64, units: Units) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "🕰️ Historical Weather at {:.4}, {:.4}",
        data.lat, data.lon
    );
    let _ = writeln!(
        out,
        "📅 {} ({})",
        format_datetime(dt, data.timezone_offset),
        data.timezone
    );
    out.push('\n');

    if data.data.is_empty() {
        out.push_str("No historical data available for this date.\n");
        return out;
    }

    if data.data.len() > 1 {
        out.push_str(&stats_block(data, units));
        out.push('\n');
    }

    let _ = writeln!(out, "🕐 **Hourly observations**");
    for point in data.data.iter().take(MAX_HOURLY_LINES) {
        let conditions = point.weather.first().map_or("", |c| c.description.as_str());
        let _ = writeln!(
            out,
            "  {} — {} | {} | 💧{:.0}% | 🌬️{}",
            format_time(point.dt, data.timezone_offset),
            format_temperature(point.temp, units),
            conditions,
            point.humidity,
            format_wind_speed(point.wind_speed, units)
        );
    }
    if data.data.len() > MAX_HOURLY_LINES {
        let _ = writeln!(out, "  ... {} more", data.data.len() - MAX_HOURLY_LINES);
    }

    let analysis = analysis_lines(data, units);
    if !analysis.is_empty() {
        out.push('\n');
        let _ = writeln!(out, "🔍 **Analysis**");
        for line in analysis {
            let _ = writeln!(out, "  {line}");
        }
    }

    out
}

fn stats_block(data: &Historical, units: Units) -> String {
    let temps: Vec<f64> = data.data.iter().map(|p| p.temp).collect();
    let humidity: Vec<f64> = data.data.iter().map(|p| p.humidity).collect();
    let wind: Vec<f64> = data.data.iter().map(|p| p.wind_speed).collect();
    let pressure: Vec<f64> = data.data.iter().map(|p| p.pressure).collect();

    let mut out = String::new();
    let _ = writeln!(out, "📊 **Day summary** ({} observations)", data.data.len());
    if let Some(t) = stats::summarize(&temps) {
        let _ = writeln!(
            out,
            "  Temperature: {} to {} (avg {})",
            format_temperature(t.min, units),
            format_temperature(t.max, units),
            format_temperature(t.mean, units)
        );
    }
    if let Some(h) = stats::summarize(&humidity) {
        let _ = writeln!(out, "  Humidity: avg {:.0}%", h.mean);
    }
    if let Some(w) = stats::summarize(&wind) {
        let _ = writeln!(
            out,
            "  Wind: avg {}, peak {}",
            format_wind_speed(w.mean, units),
            format_wind_speed(w.max, units)
        );
    }
    if let Some(p) = stats::summarize(&pressure) {
        let _ = writeln!(out, "  Pressure: avg {:.0} hPa", p.mean);
    }
    if let Some(condition) = dominant_condition(data) {
        let _ = writeln!(out, "  Dominant conditions: {condition}");
    }
    out
}

fn dominant_condition(data: &Historical) -> Option<String> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for point in &data.data {
        if let Some(c) = point.weather.first() {
            *counts.entry(c.description.as_str()).or_insert(0) += 1;
        }
    }
    counts
        .into_iter()
        .max_by_key(|(_, count)| *count)
        .map(|(description, _)| description.to_string())
}

fn analysis_lines(data: &Historical, units: Units) -> Vec<String> {
    let temps: Vec<f64> = data.data.iter().map(|p| p.temp).collect();
    let humidity: Vec<f64> = data.data.iter().map(|p| p.humidity).collect();
    let mut lines = Vec::new();

    if let Some(t) = stats::summarize(&temps) {
        let range = t.max - t.min;
        if range > 15.0 {
            lines.push(format!(
                "Large diurnal swing of {}.",
                format_temperature(range, units)
            ));
        } else if range < 5.0 && data.data.len() > 1 {
            lines.push("Unusually steady temperatures through the day.".to_string());
        }
    }
    if let Some(h) = stats::summarize(&humidity) {
        if h.mean > 80.0 {
            lines.push("Humid conditions prevailed.".to_string());
        } else if h.mean < 30.0 {
            lines.push("Notably dry air through the day.".to_string());
        }
    }
    let max_wind = data.data.iter().map(|p| p.wind_speed).fold(0.0, f64::max);
    if max_wind > 10.0 {
        lines.push(format!(
            "Strong winds peaked at {}.",
            format_wind_speed(max_wind, units)
        ));
    }
    if let Some(p) = stats::summarize(&data.data.iter().map(|p| p.pressure).collect::<Vec<_>>()) {
        if p.mean < 1000.0 {
            lines.push("Low mean pressure suggests unsettled weather.".to_string());
        } else if p.mean > 1020.0 {
            lines.push("High mean pressure suggests settled weather.".to_string());
        }
    }

    lines
}

/// Compare several labelled days side by side.
#[must_use]
pub fn format_multi_day_comparison(days: &[(String, Historical)], units: Units) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "🕰️ Historical Comparison ({} days)", days.len());
    out.push('\n');

    if days.is_empty() {
        out.push_str("No historical data to compare.\n");
        return out;
    }

    let mut means: Vec<(usize, f64, f64)> = Vec::new();
    for (i, (label, day)) in days.iter().enumerate() {
        let temps: Vec<f64> = day.data.iter().map(|p| p.temp).collect();
        let humidity: Vec<f64> = day.data.iter().map(|p| p.humidity).collect();

        match (stats::summarize(&temps), stats::summarize(&humidity)) {
            (Some(t), Some(h)) => {
                let _ = writeln!(
                    out,
                    "📅 {label}: {} to {} (avg {}), humidity {:.0}%",
                    format_temperature(t.min, units),
                    format_temperature(t.max, units),
                    format_temperature(t.mean, units),
                    h.mean
                );
                means.push((i, t.mean, h.mean));
            }
            _ => {
                let _ = writeln!(out, "📅 {label}: no data");
            }
        }
    }

    if means.len() > 1 {
        out.push('\n');
        let hottest = means
            .iter()
            .max_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));
        let coldest = means
            .iter()
            .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));
        let most_humid = means
            .iter()
            .max_by(|a, b| a.2.partial_cmp(&b.2).unwrap_or(std::cmp::Ordering::Equal));

        if let (Some(hot), Some(cold)) = (hottest, coldest) {
            let _ = writeln!(
                out,
                "🔥 Warmest: {} (avg {})",
                days[hot.0].0,
                format_temperature(hot.1, units)
            );
            let _ = writeln!(
                out,
                "🧊 Coolest: {} (avg {})",
                days[cold.0].0,
                format_temperature(cold.1, units)
            );
        }
        if let Some(humid) = most_humid {
            let _ = writeln!(
                out,
                "💧 Most humid: {} (avg {:.0}%)",
                days[humid.0].0, humid.2
            );
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::owm::models::{Condition, HistoricalPoint};

    fn point(dt: i64, temp: f64, wind: f64) -> HistoricalPoint {
        HistoricalPoint {
            dt,
            temp,
            feels_like: temp,
            pressure: 1012.0,
            humidity: 60.0,
            uvi: None,
            clouds: 40.0,
            wind_speed: wind,
            wind_deg: 180.0,
            weather: vec![Condition {
                id: 801,
                main: "Clouds".to_string(),
                description: "few clouds".to_string(),
                icon: "02d".to_string(),
            }],
            rain: None,
            snow: None,
        }
    }

    fn day(points: Vec<HistoricalPoint>) -> Historical {
        Historical {
            lat: 48.8566,
            lon: 2.3522,
            timezone: "Europe/Paris".to_string(),
            timezone_offset: 3600,
            data: points,
        }
    }

    #[test]
    fn empty_day_reports_no_data() {
        let report = format_historical(&day(vec![]), 1_700_000_000, Units::Metric);
        assert!(report.contains("No historical data available"));
    }

    #[test]
    fn hourly_lines_are_capped() {
        let points = (0..24)
            .map(|i| point(1_700_000_000 + i * 3600, 10.0, 2.0))
            .collect();
        let report = format_historical(&day(points), 1_700_000_000, Units::Metric);
        assert!(report.contains("... 12 more"));
    }

    #[test]
    fn strong_wind_shows_in_analysis() {
        let points = vec![
            point(1_700_000_000, 10.0, 2.0),
            point(1_700_003_600, 11.0, 14.0),
        ];
        let report = format_historical(&day(points), 1_700_000_000, Units::Metric);
        assert!(report.contains("Strong winds peaked"));
    }

    #[test]
    fn comparison_identifies_extremes() {
        let warm = day(vec![point(1_700_000_000, 20.0, 2.0)]);
        let cold = day(vec![point(1_700_086_400, 5.0, 2.0)]);
        let report = format_multi_day_comparison(
            &[("2023-11-14".to_string(), warm), ("2023-11-15".to_string(), cold)],
            Units::Metric,
        );
        assert!(report.contains("🔥 Warmest: 2023-11-14"));
        assert!(report.contains("🧊 Coolest: 2023-11-15"));
    }

    #[test]
    fn comparison_with_no_days() {
        let report = format_multi_day_comparison(&[], Units::Metric);
        assert!(report.contains("No historical data to compare"));
    }
}
