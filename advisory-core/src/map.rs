//! OpenStreetMap view of an observation location.
//!
//! Standard slippy-map tile math (Web Mercator). No tiles are downloaded;
//! callers get the tile coordinates and URLs to render or open.

use serde::{Deserialize, Serialize};

use crate::model::Coordinates;

pub const DEFAULT_ZOOM: u8 = 10;
pub const MAX_ZOOM: u8 = 19;
pub const ATTRIBUTION: &str = "© OpenStreetMap contributors";

/// Web Mercator cannot represent the poles.
const MAX_LATITUDE: f64 = 85.051_128_78;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileCoord {
    pub x: u32,
    pub y: u32,
    pub zoom: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MapView {
    pub center: Coordinates,
    pub zoom: u8,
}

impl MapView {
    /// Zoom levels above [`MAX_ZOOM`] are clamped.
    pub fn new(center: Coordinates, zoom: u8) -> Self {
        Self { center, zoom: zoom.min(MAX_ZOOM) }
    }

    /// `zoom` is a public field and may bypass [`MapView::new`].
    fn clamped_zoom(&self) -> u8 {
        self.zoom.min(MAX_ZOOM)
    }

    pub fn tile(&self) -> TileCoord {
        let zoom = self.clamped_zoom();
        let n = f64::from(1u32 << zoom);
        let max_index = (1u32 << zoom) - 1;

        let lat = self.center.latitude.clamp(-MAX_LATITUDE, MAX_LATITUDE).to_radians();
        let x = (self.center.longitude + 180.0) / 360.0 * n;
        let y = (1.0 - (lat.tan() + 1.0 / lat.cos()).ln() / std::f64::consts::PI) / 2.0 * n;

        TileCoord { x: to_index(x, max_index), y: to_index(y, max_index), zoom }
    }

    pub fn tile_url(&self) -> String {
        let TileCoord { x, y, zoom } = self.tile();
        format!("https://tile.openstreetmap.org/{zoom}/{x}/{y}.png")
    }

    /// Link to the interactive map with a marker at the center.
    pub fn browse_url(&self) -> String {
        let Coordinates { latitude, longitude } = self.center;
        let zoom = self.clamped_zoom();
        format!(
            "https://www.openstreetmap.org/?mlat={latitude:.4}&mlon={longitude:.4}\
             #map={zoom}/{latitude:.4}/{longitude:.4}"
        )
    }
}

// Longitude 180 lands exactly on `n`, which belongs to the last tile.
fn to_index(value: f64, max_index: u32) -> u32 {
    (value.floor().max(0.0) as u32).min(max_index)
}
