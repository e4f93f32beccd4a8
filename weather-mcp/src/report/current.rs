//! Current conditions report.

use std::fmt::Write;

use crate::owm::Units;
use crate::owm::models::CurrentWeather;

use super::{format_datetime, format_temperature, format_time, format_wind_speed, wind_direction};

/// Render a current weather observation as a Markdown report.
#[must_use]
pub fn format_current_weather(weather: &CurrentWeather, units: Units) -> String {
    let mut out = String::new();

    let _ = writeln!(
        out,
        "🌍 **{}, {}** — Current Weather",
        weather.name, weather.sys.country
    );
    out.push('\n');

    let conditions = weather
        .weather
        .iter()
        .map(|c| c.description.as_str())
        .collect::<Vec<_>>()
        .join(", ");

    let _ = writeln!(
        out,
        "🌡️ Temperature: {} (feels like {})",
        format_temperature(weather.main.temp, units),
        format_temperature(weather.main.feels_like, units)
    );
    let _ = writeln!(
        out,
        "📊 Range: {} to {}",
        format_temperature(weather.main.temp_min, units),
        format_temperature(weather.main.temp_max, units)
    );
    let _ = writeln!(out, "☁️ Conditions: {conditions}");
    let _ = writeln!(out, "💧 Humidity: {:.0}%", weather.main.humidity);
    let _ = writeln!(
        out,
        "🌬️ Wind: {} from {} ({:.0}°)",
        format_wind_speed(weather.wind.speed, units),
        wind_direction(weather.wind.deg),
        weather.wind.deg
    );
    let _ = writeln!(out, "📏 Pressure: {:.0} hPa", weather.main.pressure);

    if let Some(visibility) = weather.visibility {
        let _ = writeln!(out, "👁️ Visibility: {:.1} km", visibility / 1000.0);
    }
    let _ = writeln!(out, "☁️ Cloud cover: {:.0}%", weather.clouds.all);

    if let Some(volume) = weather.rain.and_then(|r| r.one_hour.or(r.three_hours)) {
        let _ = writeln!(out, "🌧️ Rain: {volume:.1} mm");
    }
    if let Some(volume) = weather.snow.and_then(|s| s.one_hour.or(s.three_hours)) {
        let _ = writeln!(out, "❄️ Snow: {volume:.1} mm");
    }

    out.push('\n');
    let _ = writeln!(
        out,
        "🌅 Sunrise: {}  🌇 Sunset: {}",
        format_time(weather.sys.sunrise, weather.timezone),
        format_time(weather.sys.sunset, weather.timezone)
    );
    let _ = writeln!(
        out,
        "📍 Coordinates: {:.4}, {:.4}",
        weather.coord.lat, weather.coord.lon
    );
    let _ = writeln!(
        out,
        "🕐 Updated: {}",
        format_datetime(weather.dt, weather.timezone)
    );

    out
}
