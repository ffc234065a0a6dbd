//! Marker types and their popup rendering.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ParseColorError;
use crate::geo::LatLng;

/// Pin colors offered by the authoring form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerColor {
    #[default]
    Red,
    Yellow,
    Blue,
    Green,
}

impl MarkerColor {
    /// Get the lowercase name used in forms and popups.
    pub fn name(&self) -> &'static str {
        match self {
            MarkerColor::Red => "red",
            MarkerColor::Yellow => "yellow",
            MarkerColor::Blue => "blue",
            MarkerColor::Green => "green",
        }
    }

    /// Get all colors in form order.
    pub fn all() -> &'static [MarkerColor] {
        &[
            MarkerColor::Red,
            MarkerColor::Yellow,
            MarkerColor::Blue,
            MarkerColor::Green,
        ]
    }

    /// Get the pin icon drawn for this color.
    pub fn icon(&self) -> MarkerIcon {
        let url = match self {
            MarkerColor::Red => "assets/MarkerColor/marker-icon-red.svg",
            MarkerColor::Yellow => "assets/MarkerColor/marker-icon-yellow.svg",
            MarkerColor::Blue => "assets/MarkerColor/marker-icon-blue.svg",
            MarkerColor::Green => "assets/MarkerColor/marker-icon-green.svg",
        };
        MarkerIcon {
            url,
            ..MarkerIcon::PIN
        }
    }
}

impl fmt::Display for MarkerColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for MarkerColor {
    type Err = ParseColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        MarkerColor::all()
            .iter()
            .copied()
            .find(|c| c.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ParseColorError(s.to_string()))
    }
}

/// Pin image and its anchor points, in icon pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkerIcon {
    pub url: &'static str,
    pub size: (u32, u32),
    /// Pixel of the image that sits on the coordinate
    pub anchor: (u32, u32),
    /// Offset of the popup tip from the anchor
    pub popup_anchor: (i32, i32),
}

impl MarkerIcon {
    /// Geometry shared by every colored pin.
    const PIN: MarkerIcon = MarkerIcon {
        url: "",
        size: (25, 41),
        anchor: (12, 41),
        popup_anchor: (1, -34),
    };
}

/// A placed marker. Never changes after creation.
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub position: LatLng,
    pub color: MarkerColor,
    /// Trimmed, never empty
    pub title: String,
    /// Free text, kept exactly as typed
    pub note: String,
}

impl Marker {
    /// Popup body: bold title, the note with its line breaks, and the color.
    pub fn popup_html(&self) -> String {
        format!(
            "<b>{}</b><br><b>Note:</b><br><p style='white-space:pre-line;max-width:260px;margin:0;'>{}</p><br><b>Color:</b> {}",
            escape_html(&self.title),
            escape_html(&self.note),
            self.color
        )
    }
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
