//! Geographic and screen-space coordinate types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A geographic coordinate in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Format as degrees, minutes and seconds, e.g. `7°05'27.3"N 125°36'41.1"E`.
    pub fn to_dms(&self) -> String {
        let lat_hemi = if self.lat < 0.0 { 'S' } else { 'N' };
        let lng_hemi = if self.lng < 0.0 { 'W' } else { 'E' };
        format!(
            "{}{} {}{}",
            format_dms(self.lat),
            lat_hemi,
            format_dms(self.lng),
            lng_hemi
        )
    }
}

impl fmt::Display for LatLng {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lat, self.lng)
    }
}

/// Tenths of an arc-second per degree.
const TENTHS_PER_DEGREE: f64 = 36_000.0;

fn format_dms(value: f64) -> String {
    // Round once on the smallest unit so 59.96" never prints as 60.0"
    let tenths = (value.abs() * TENTHS_PER_DEGREE).round() as u64;
    let degrees = tenths / 36_000;
    let minutes = (tenths % 36_000) / 600;
    let sec_tenths = tenths % 600;
    format!(
        "{}°{:02}'{:02}.{}\"",
        degrees,
        minutes,
        sec_tenths / 10,
        sec_tenths % 10
    )
}

/// Axis-aligned geographic box, stored as south-west and north-east corners.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatLngBounds {
    pub south_west: LatLng,
    pub north_east: LatLng,
}

impl LatLngBounds {
    /// Smallest box containing every point. Returns None for an empty slice.
    pub fn from_points(points: &[LatLng]) -> Option<Self> {
        let first = points.first()?;
        let mut bounds = Self {
            south_west: *first,
            north_east: *first,
        };
        for p in &points[1..] {
            bounds.south_west.lat = bounds.south_west.lat.min(p.lat);
            bounds.south_west.lng = bounds.south_west.lng.min(p.lng);
            bounds.north_east.lat = bounds.north_east.lat.max(p.lat);
            bounds.north_east.lng = bounds.north_east.lng.max(p.lng);
        }
        Some(bounds)
    }

    /// Check if a coordinate lies inside (edges inclusive).
    pub fn contains(&self, point: LatLng) -> bool {
        point.lat >= self.south_west.lat
            && point.lat <= self.north_east.lat
            && point.lng >= self.south_west.lng
            && point.lng <= self.north_east.lng
    }
}

/// A position in viewport pixels, origin at the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScreenPoint {
    pub x: f32,
    pub y: f32,
}

impl ScreenPoint {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn region() -> Vec<LatLng> {
        vec![
            LatLng::new(7.045510, 125.584952),
            LatLng::new(7.296067, 125.396947),
            LatLng::new(7.401148, 125.614427),
            LatLng::new(7.210719, 125.796855),
        ]
    }

    #[test]
    fn test_dms_of_city_center() {
        let center = LatLng::new(7.090917, 125.611417);
        assert_eq!(center.to_dms(), "7°05'27.3\"N 125°36'41.1\"E");
    }

    #[test]
    fn test_dms_southern_western_hemisphere() {
        let p = LatLng::new(-33.5, -70.25);
        assert_eq!(p.to_dms(), "33°30'00.0\"S 70°15'00.0\"W");
    }

    #[test]
    fn test_dms_rounds_up_into_next_minute() {
        // 0.99999 degrees is 59'59.964", which rounds to a whole degree
        let p = LatLng::new(0.99999, 0.0);
        assert_eq!(p.to_dms(), "1°00'00.0\"N 0°00'00.0\"E");
    }

    #[test]
    fn test_bounds_from_quadrilateral() {
        let bounds = LatLngBounds::from_points(&region()).unwrap();
        assert_eq!(bounds.south_west, LatLng::new(7.045510, 125.396947));
        assert_eq!(bounds.north_east, LatLng::new(7.401148, 125.796855));
    }

    #[test]
    fn test_bounds_empty() {
        assert!(LatLngBounds::from_points(&[]).is_none());
    }

    #[test]
    fn test_bounds_contains() {
        let bounds = LatLngBounds::from_points(&region()).unwrap();
        let center = LatLng::new(7.090917, 125.611417);
        assert!(bounds.contains(center));

        assert!(!bounds.contains(LatLng::new(8.0, 124.0)));
        // Edges count as inside
        assert!(bounds.contains(bounds.south_west));
        assert!(bounds.contains(bounds.north_east));
    }
}
