//! Map surface capability and its settings.
//!
//! The map itself (tiles, pan and zoom) belongs to whatever renders it. The
//! controller only needs to hand it pins.

use geomark_core::{LatLng, LatLngBounds, MarkerIcon};
use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_ATTRIBUTION, DEFAULT_CENTER, DEFAULT_MIN_ZOOM, DEFAULT_REGION, DEFAULT_TILE_URL,
    DEFAULT_ZOOM,
};

/// Something that can show pins on a map.
pub trait MapSurface {
    /// Add a colored marker pin with a popup.
    fn add_marker(&mut self, position: LatLng, icon: &MarkerIcon, popup_html: &str);

    /// Add the default-styled landmark pin and open its popup.
    fn add_landmark(&mut self, position: LatLng, popup_text: &str);
}

/// How the map is set up: where it starts and how far it may go.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapSettings {
    /// Initial center, also where the landmark pin goes
    pub center: LatLng,
    /// Corners of the pannable region; the bounding box of these is used
    pub region: Vec<LatLng>,
    pub zoom: u8,
    pub min_zoom: u8,
    /// 1.0 makes the region edge solid while dragging
    pub bounds_viscosity: f64,
    pub tile_url: String,
    pub attribution: String,
}

impl Default for MapSettings {
    fn default() -> Self {
        Self {
            center: LatLng::new(DEFAULT_CENTER.0, DEFAULT_CENTER.1),
            region: DEFAULT_REGION
                .iter()
                .map(|&(lat, lng)| LatLng::new(lat, lng))
                .collect(),
            zoom: DEFAULT_ZOOM,
            min_zoom: DEFAULT_MIN_ZOOM,
            bounds_viscosity: 1.0,
            tile_url: DEFAULT_TILE_URL.to_string(),
            attribution: DEFAULT_ATTRIBUTION.to_string(),
        }
    }
}

impl MapSettings {
    /// Pannable bounds. An empty region falls back to a box around the center.
    pub fn bounds(&self) -> LatLngBounds {
        LatLngBounds::from_points(&self.region).unwrap_or(LatLngBounds {
            south_west: self.center,
            north_east: self.center,
        })
    }

    /// Popup text of the landmark pin at the center.
    pub fn landmark_popup(&self) -> String {
        format!("Custom Center: {}", self.center.to_dms())
    }
}
