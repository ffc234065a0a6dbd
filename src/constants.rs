//! Global constants for the GeoMark application

use std::time::Duration;

/// Place-marker button label while idle
pub const PLACE_LABEL_READY: &str = "Put Marker";

/// Place-marker button label while waiting for a map click
pub const PLACE_LABEL_ARMED: &str = "Click on map to place marker";

/// How long the title field stays highlighted after a blank submit
pub const TITLE_FLASH_DURATION: Duration = Duration::from_millis(1200);

/// Default viewport for frontends that cannot measure one
pub const DEFAULT_VIEWPORT: (f32, f32) = (1280.0, 800.0);

/// Initial map center (Davao City)
pub const DEFAULT_CENTER: (f64, f64) = (7.090917, 125.611417);

/// Corners of the region the map may pan over
pub const DEFAULT_REGION: [(f64, f64); 4] = [
    (7.045510, 125.584952),
    (7.296067, 125.396947),
    (7.401148, 125.614427),
    (7.210719, 125.796855),
];

/// Initial zoom level
pub const DEFAULT_ZOOM: u8 = 15;

/// Furthest the user may zoom out
pub const DEFAULT_MIN_ZOOM: u8 = 14;

/// OpenStreetMap tile URL template
pub const DEFAULT_TILE_URL: &str = "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png";

/// Attribution shown with the tiles
pub const DEFAULT_ATTRIBUTION: &str =
    "&copy; <a href=\"https://www.openstreetmap.org/copyright\">OpenStreetMap</a> contributors";
