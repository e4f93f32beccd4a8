//! Geocoding result reports.

use std::fmt::Write;

use crate::owm::models::GeocodeResult;

#[must_use]
pub fn format_geocode_results(query: &str, results: &[GeocodeResult]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "📍 Geocoding results for \"{query}\"");
    out.push('\n');

    if results.is_empty() {
        let _ = writeln!(out, "No locations matched \"{query}\".");
        return out;
    }

    for (i, result) in results.iter().enumerate() {
        let _ = writeln!(out, "{}. {}", i + 1, place_line(result));
        let _ = writeln!(out, "   🌐 {:.4}, {:.4}", result.lat, result.lon);
    }
    out
}

#[must_use]
pub fn format_reverse_geocode(lat: f64, lon: f64, results: &[GeocodeResult]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "📍 Places near {lat:.4}, {lon:.4}");
    out.push('\n');

    if results.is_empty() {
        out.push_str("No named places found at these coordinates.\n");
        return out;
    }

    for (i, result) in results.iter().enumerate() {
        let _ = writeln!(out, "{}. {}", i + 1, place_line(result));
    }
    out
}

fn place_line(result: &GeocodeResult) -> String {
    match &result.state {
        Some(state) => format!("{}, {state}, {}", result.name, result.country),
        None => format!("{}, {}", result.name, result.country),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(name: &str, state: Option<&str>) -> GeocodeResult {
        GeocodeResult {
            name: name.to_string(),
            lat: 51.5074,
            lon: -0.1278,
            country: "GB".to_string(),
            state: state.map(str::to_string),
        }
    }

    #[test]
    fn results_are_numbered_with_state_when_present() {
        let report = format_geocode_results(
            "London",
            &[result("London", Some("England")), result("London", None)],
        );
        assert!(report.contains("1. London, England, GB"));
        assert!(report.contains("2. London, GB"));
    }

    #[test]
    fn empty_results_report_no_match() {
        let report = format_geocode_results("Xyzzy", &[]);
        assert!(report.contains("No locations matched"));

        let reverse = format_reverse_geocode(0.0, 0.0, &[]);
        assert!(reverse.contains("No named places found"));
    }
}
