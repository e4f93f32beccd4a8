//! Human-readable report rendering.
//!
//! Each submodule turns one family of typed provider responses into the
//! Markdown-flavoured text a chat client displays. Rendering is pure: the
//! same response always produces the same report.

pub mod air_quality;
pub mod alerts;
pub mod current;
pub mod forecast;
pub mod geocode;
pub mod historical;
pub mod maps;

use chrono::{DateTime, FixedOffset, Offset, Utc};

use crate::owm::Units;

/// Render a temperature with the unit suffix, rounded to one decimal.
pub(crate) fn format_temperature(value: f64, units: Units) -> String {
    format!("{value:.1}{}", units.temperature_suffix())
}

pub(crate) fn format_wind_speed(value: f64, units: Units) -> String {
    format!("{value:.1} {}", units.wind_speed_suffix())
}

/// Local civil time for a UTC timestamp shifted by `tz_offset` seconds.
fn local_time(dt: i64, tz_offset: i64) -> DateTime<FixedOffset> {
    let utc = DateTime::<Utc>::from_timestamp(dt, 0).unwrap_or_default();
    #[allow(clippy::cast_possible_truncation)]
    let offset = FixedOffset::east_opt(tz_offset as i32).unwrap_or_else(|| Utc.fix());
    utc.with_timezone(&offset)
}

pub(crate) fn format_datetime(dt: i64, tz_offset: i64) -> String {
    local_time(dt, tz_offset).format("%Y-%m-%d %H:%M").to_string()
}

pub(crate) fn format_time(dt: i64, tz_offset: i64) -> String {
    local_time(dt, tz_offset).format("%H:%M").to_string()
}

pub(crate) fn format_date(dt: i64, tz_offset: i64) -> String {
    local_time(dt, tz_offset).format("%Y-%m-%d").to_string()
}

const COMPASS: [&str; 16] = [
    "N", "NNE", "NE", "ENE", "E", "ESE", "SE", "SSE", "S", "SSW", "SW", "WSW", "W", "WNW", "NW",
    "NNW",
];

/// 16-point compass name for a wind bearing in degrees.
pub(crate) fn wind_direction(deg: f64) -> &'static str {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let index = ((deg.rem_euclid(360.0) / 22.5).round() as usize) % 16;
    COMPASS[index]
}
