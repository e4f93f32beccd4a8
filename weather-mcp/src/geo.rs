//! Slippy-map tile math.
//!
//! Standard Web Mercator conversions between geographic coordinates and
//! integer tile addresses, plus the inverse tile-to-bounding-box mapping.
//! Both directions are pure and deterministic.

use std::f64::consts::PI;

/// Latitude at which the Web Mercator projection is clipped.
pub const MAX_MERCATOR_LAT: f64 = 85.051_128_779_806_6;

/// Address of one slippy-map tile: `x`, `y` in `[0, 2^zoom)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileCoordinate {
    pub x: u32,
    pub y: u32,
    pub zoom: u8,
}

/// Geographic bounding box of a tile, in degrees.
#[derive(Debug, Clone, Copy)]
pub struct TileBounds {
    pub north: f64,
    pub south: f64,
    pub east: f64,
    pub west: f64,
}

impl TileBounds {
    /// Whether the box contains the given point (edges inclusive).
    #[must_use]
    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        lat <= self.north && lat >= self.south && lon >= self.west && lon <= self.east
    }
}

/// Convert a geographic coordinate to the tile containing it.
///
/// Inputs on the anti-meridian or poleward of the Mercator clipping
/// latitude land in the outermost tile row/column.
#[must_use]
pub fn lat_lon_to_tile(lat: f64, lon: f64, zoom: u8) -> TileCoordinate {
    let n = 2f64.powi(i32::from(zoom));

    let x = ((lon + 180.0) / 360.0 * n).floor();
    let lat_rad = lat.to_radians();
    let y = ((1.0 - lat_rad.tan().asinh() / PI) / 2.0 * n).floor();

    // Keep x, y inside [0, n): lon = 180 or |lat| > the clipping latitude
    // would otherwise index one past the edge.
    let max = n - 1.0;
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    TileCoordinate {
        x: x.clamp(0.0, max) as u32,
        y: y.clamp(0.0, max) as u32,
        zoom,
    }
}

/// Geographic bounding box of the tile at (`x`, `y`, `zoom`).
#[must_use]
pub fn tile_to_bounds(x: u32, y: u32, zoom: u8) -> TileBounds {
    let n = 2f64.powi(i32::from(zoom));

    let west = f64::from(x) / n * 360.0 - 180.0;
    let east = f64::from(x + 1) / n * 360.0 - 180.0;

    let north = (PI * (1.0 - 2.0 * f64::from(y) / n)).sinh().atan().to_degrees();
    let south = (PI * (1.0 - 2.0 * f64::from(y + 1) / n))
        .sinh()
        .atan()
        .to_degrees();

    TileBounds {
        north,
        south,
        east,
        west,
    }
}
