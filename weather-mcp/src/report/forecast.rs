//! 5-day / 3-hour forecast report.

use std::fmt::Write;

use crate::owm::Units;
use crate::owm::models::{Forecast, ForecastSlot};
use crate::stats;

use super::{format_date, format_temperature, format_time, format_wind_speed};

/// Render a forecast as per-day sections followed by an overall summary.
///
/// Slots are grouped by local calendar date in the order the provider
/// returned them.
#[must_use]
pub fn format_forecast(forecast: &Forecast, units: Units) -> String {
    if forecast.list.is_empty() {
        return format!(
            "🌍 **{}, {}** — Forecast\n\nNo forecast data available.\n",
            forecast.city.name, forecast.city.country
        );
    }

    let tz = forecast.city.timezone;
    let mut out = String::new();
    let _ = writeln!(
        out,
        "🌍 **{}, {}** — {}-slot Forecast",
        forecast.city.name, forecast.city.country, forecast.cnt
    );

    for (date, slots) in group_by_date(&forecast.list, tz) {
        out.push('\n');
        let _ = writeln!(out, "📅 **{date}**");
        for slot in slots {
            let conditions = slot
                .weather
                .first()
                .map_or("", |c| c.description.as_str());
            let _ = writeln!(
                out,
                "  {} — {} | {} | 💧{:.0}% | ☔{:.0}% | 🌬️{}",
                format_time(slot.dt, tz),
                format_temperature(slot.main.temp, units),
                conditions,
                slot.main.humidity,
                slot.pop * 100.0,
                format_wind_speed(slot.wind.speed, units)
            );
        }
    }

    out.push('\n');
    out.push_str(&summary_block(&forecast.list, units));
    out
}

fn group_by_date(slots: &[ForecastSlot], tz: i64) -> Vec<(String, Vec<&ForecastSlot>)> {
    let mut groups: Vec<(String, Vec<&ForecastSlot>)> = Vec::new();
    for slot in slots {
        let date = format_date(slot.dt, tz);
        match groups.last_mut() {
            Some((last, members)) if *last == date => members.push(slot),
            _ => groups.push((date, vec![slot])),
        }
    }
    groups
}

fn summary_block(slots: &[ForecastSlot], units: Units) -> String {
    let temps: Vec<f64> = slots.iter().map(|s| s.main.temp).collect();
    let humidity: Vec<f64> = slots.iter().map(|s| s.main.humidity).collect();
    let Some(temp_summary) = stats::summarize(&temps) else {
        return String::new();
    };
    let humidity_mean = stats::summarize(&humidity).map_or(0.0, |s| s.mean);
    let max_pop = slots.iter().map(|s| s.pop).fold(0.0, f64::max);
    let max_wind = slots.iter().map(|s| s.wind.speed).fold(0.0, f64::max);

    let mut out = String::new();
    let _ = writeln!(out, "📊 **Summary**");
    let _ = writeln!(
        out,
        "  Temperature: {} to {} (avg {})",
        format_temperature(temp_summary.min, units),
        format_temperature(temp_summary.max, units),
        format_temperature(temp_summary.mean, units)
    );
    let _ = writeln!(out, "  Average humidity: {humidity_mean:.0}%");
    let _ = writeln!(out, "  Peak precipitation chance: {:.0}%", max_pop * 100.0);
    let _ = writeln!(out, "  Peak wind: {}", format_wind_speed(max_wind, units));

    let mut advice = Vec::new();
    if max_pop > 0.7 {
        advice.push("☔ High chance of precipitation; carry rain gear.");
    }
    if max_wind > 10.0 {
        advice.push("🌬️ Strong winds expected; secure loose items outdoors.");
    }
    if temp_summary.max - temp_summary.min > 15.0 {
        advice.push("🌡️ Large temperature swings; dress in layers.");
    }
    if humidity_mean > 80.0 {
        advice.push("💧 Humid conditions throughout the period.");
    } else if humidity_mean < 30.0 {
        advice.push("🏜️ Dry air expected; stay hydrated.");
    }

    if !advice.is_empty() {
        out.push('\n');
        let _ = writeln!(out, "💡 **Advice**");
        for line in advice {
            let _ = writeln!(out, "  {line}");
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::owm::models::{City, Clouds, Condition, Coordinates, MainData, Wind};

    fn slot(dt: i64, temp: f64, pop: f64) -> ForecastSlot {
        ForecastSlot {
            dt,
            main: MainData {
                temp,
                feels_like: temp,
                temp_min: temp - 1.0,
                temp_max: temp + 1.0,
                pressure: 1012.0,
                humidity: 65.0,
            },
            weather: vec![Condition {
                id: 500,
                main: "Rain".to_string(),
                description: "light rain".to_string(),
                icon: "10d".to_string(),
            }],
            clouds: Clouds { all: 75.0 },
            wind: Wind {
                speed: 4.0,
                deg: 180.0,
                gust: None,
            },
            pop,
            rain: None,
            snow: None,
        }
    }

    fn sample(slots: Vec<ForecastSlot>) -> Forecast {
        Forecast {
            cnt: u32::try_from(slots.len()).unwrap(),
            list: slots,
            city: City {
                name: "Bergen".to_string(),
                coord: Coordinates {
                    lat: 60.39,
                    lon: 5.32,
                },
                country: "NO".to_string(),
                timezone: 3600,
            },
        }
    }

    #[test]
    fn slots_group_by_local_date() {
        // Three slots spanning a local midnight (+1h offset).
        let forecast = sample(vec![
            slot(1_700_000_000, 8.0, 0.1),
            slot(1_700_010_800, 7.0, 0.2),
            slot(1_700_060_000, 6.0, 0.3),
        ]);
        let report = format_forecast(&forecast, Units::Metric);

        let day_headers = report.matches("📅").count();
        assert_eq!(day_headers, 2);
        assert!(report.contains("**Bergen, NO**"));
    }

    #[test]
    fn empty_forecast_reports_no_data() {
        let report = format_forecast(&sample(vec![]), Units::Metric);
        assert!(report.contains("No forecast data available"));
    }

    #[test]
    fn high_precipitation_triggers_advice() {
        let forecast = sample(vec![slot(1_700_000_000, 8.0, 0.9)]);
        let report = format_forecast(&forecast, Units::Metric);
        assert!(report.contains("carry rain gear"));
    }
}
