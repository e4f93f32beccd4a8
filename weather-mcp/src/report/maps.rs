//! Weather map tile reports.

use std::fmt::Write;

use crate::geo::{TileBounds, TileCoordinate};

/// Tile layers the provider renders.
pub const KNOWN_LAYERS: [&str; 5] = [
    "clouds_new",
    "precipitation_new",
    "pressure_new",
    "wind_new",
    "temp_new",
];

#[must_use]
pub fn layer_description(layer: &str) -> &'static str {
    match layer {
        "clouds_new" => "Cloud cover",
        "precipitation_new" => "Precipitation intensity",
        "pressure_new" => "Sea-level pressure",
        "wind_new" => "Wind speed",
        "temp_new" => "Surface temperature",
        _ => "Unknown layer",
    }
}

fn layer_usage(layer: &str) -> &'static str {
    match layer {
        "clouds_new" => "Use for estimating sunshine and satellite-style overviews.",
        "precipitation_new" => "Use for tracking rain and snow bands as they move.",
        "pressure_new" => "Use for locating highs, lows, and frontal systems.",
        "wind_new" => "Use for spotting windy corridors and calm zones.",
        "temp_new" => "Use for comparing temperatures across a region.",
        _ => "Consult the provider documentation for this layer.",
    }
}

fn layer_interpretation(layer: &str) -> &'static str {
    match layer {
        "clouds_new" => "Denser white shading means thicker cloud cover.",
        "precipitation_new" => "Blue through red shading ranks light to intense precipitation.",
        "pressure_new" => "Isolines mark equal pressure; tight spacing means strong gradients.",
        "wind_new" => "Brighter shading marks stronger winds.",
        "temp_new" => "Blue is cold, red is hot; gradients mark fronts.",
        _ => "No interpretation notes available.",
    }
}

/// Report for one explicitly-addressed tile.
#[must_use]
pub fn format_tile_map(layer: &str, tile: &TileCoordinate, bounds: &TileBounds, url: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "🗺️ **{}** map tile", layer_description(layer));
    let _ = writeln!(
        out,
        "📍 Tile {}/{}/{} (zoom {})",
        tile.zoom, tile.x, tile.y, tile.zoom
    );
    let _ = writeln!(
        out,
        "🌐 Covers {:.4}°N to {:.4}°N, {:.4}°E to {:.4}°E",
        bounds.south, bounds.north, bounds.west, bounds.east
    );
    let _ = writeln!(out, "🔗 {url}");
    out.push('\n');
    let _ = writeln!(out, "💡 {}", layer_usage(layer));
    let _ = writeln!(out, "🎨 {}", layer_interpretation(layer));
    out
}

/// Report for the tile covering a geographic point.
#[must_use]
pub fn format_region_map(
    layer: &str,
    lat: f64,
    lon: f64,
    tile: &TileCoordinate,
    bounds: &TileBounds,
    url: &str,
) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "🗺️ **{}** map around {lat:.4}, {lon:.4}",
        layer_description(layer)
    );
    let _ = writeln!(
        out,
        "📍 Tile {}/{}/{} covers {:.4}°N to {:.4}°N, {:.4}°E to {:.4}°E",
        tile.zoom, tile.x, tile.y, bounds.south, bounds.north, bounds.west, bounds.east
    );
    let _ = writeln!(out, "🔗 {url}");
    out.push('\n');
    let _ = writeln!(out, "💡 {}", layer_usage(layer));
    let _ = writeln!(out, "🎨 {}", layer_interpretation(layer));
    out
}

/// Report combining several layers over the same tile.
#[must_use]
pub fn format_multi_layer(lat: f64, lon: f64, zoom: u8, layers: &[(String, String)]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "🗺️ Multi-layer weather view around {lat:.4}, {lon:.4} (zoom {zoom})"
    );
    out.push('\n');
    for (layer, url) in layers {
        let _ = writeln!(out, "• **{}** — {}", layer_description(layer), url);
        let _ = writeln!(out, "  {}", layer_interpretation(layer));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo;

    #[test]
    fn known_layers_have_descriptions() {
        for layer in KNOWN_LAYERS {
            assert_ne!(layer_description(layer), "Unknown layer");
        }
        assert_eq!(layer_description("made_up"), "Unknown layer");
    }

    #[test]
    fn tile_report_names_bounds_and_url() {
        let tile = geo::lat_lon_to_tile(51.5074, -0.1278, 10);
        let bounds = geo::tile_to_bounds(tile.x, tile.y, 10);
        let report = format_tile_map("temp_new", &tile, &bounds, "https://example/t.png");
        assert!(report.contains("Surface temperature"));
        assert!(report.contains("10/511/340"));
        assert!(report.contains("https://example/t.png"));
    }

    #[test]
    fn multi_layer_lists_each_layer() {
        let layers = vec![
            ("clouds_new".to_string(), "https://example/c.png".to_string()),
            ("wind_new".to_string(), "https://example/w.png".to_string()),
        ];
        let report = format_multi_layer(48.85, 2.35, 8, &layers);
        assert!(report.contains("Cloud cover"));
        assert!(report.contains("Wind speed"));
    }
}
