//! Text rendering of the map and its controls.

use std::io::Write;

use geomark_core::{LatLng, MarkerIcon, ScreenPoint};

use crate::map::MapSurface;
use crate::ui::{PlaceButton, UiSurface};

/// Writes one line per visible change to any `Write`.
pub struct ConsoleSurface<W: Write> {
    out: W,
    pins: usize,
}

impl<W: Write> ConsoleSurface<W> {
    pub fn new(out: W) -> Self {
        Self { out, pins: 0 }
    }

    /// Number of pins drawn, the landmark included.
    pub fn pin_count(&self) -> usize {
        self.pins
    }

    pub fn output(&self) -> &W {
        &self.out
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Write free text, such as the command help.
    pub fn write_text(&mut self, text: &str) {
        self.say(format_args!("{}", text));
    }

    fn say(&mut self, line: std::fmt::Arguments<'_>) {
        if let Err(e) = writeln!(self.out, "{}", line) {
            log::error!("Failed to write to console: {}", e);
        }
    }
}

impl<W: Write> MapSurface for ConsoleSurface<W> {
    fn add_marker(&mut self, position: LatLng, icon: &MarkerIcon, popup_html: &str) {
        self.pins += 1;
        self.say(format_args!("[map] pin {} at {}", icon.url, position));
        self.say(format_args!("[map]   popup: {}", popup_html.replace('\n', "\\n")));
    }

    fn add_landmark(&mut self, position: LatLng, popup_text: &str) {
        self.pins += 1;
        self.say(format_args!("[map] landmark at {}: {}", position, popup_text));
    }
}

impl<W: Write> UiSurface for ConsoleSurface<W> {
    fn set_login_prompt_visible(&mut self, visible: bool) {
        if visible {
            self.say(format_args!("[login] enter username and password"));
        } else {
            self.say(format_args!("[login] closed"));
        }
    }

    fn show_login_error(&mut self) {
        self.say(format_args!("[login] Invalid username or password"));
    }

    fn set_logout_visible(&mut self, visible: bool) {
        let state = if visible { "shown" } else { "hidden" };
        self.say(format_args!("[logout] {}", state));
    }

    fn set_place_button(&mut self, state: PlaceButton) {
        let enabled = if state.enabled() { "enabled" } else { "disabled" };
        self.say(format_args!("[button] {} ({})", state.label(), enabled));
    }

    fn open_form(&mut self, origin: ScreenPoint) {
        self.say(format_args!(
            "[form] open at ({:.0}, {:.0}): title '', color red, note ''",
            origin.x, origin.y
        ));
    }

    fn move_form(&mut self, origin: ScreenPoint) {
        self.say(format_args!("[form] moved to ({:.0}, {:.0})", origin.x, origin.y));
    }

    fn close_form(&mut self) {
        self.say(format_args!("[form] closed"));
    }

    fn set_title_invalid(&mut self, invalid: bool) {
        if invalid {
            self.say(format_args!("[form] title is required"));
        } else {
            self.say(format_args!("[form] title highlight cleared"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geomark_core::MarkerColor;

    fn output(surface: ConsoleSurface<Vec<u8>>) -> String {
        String::from_utf8(surface.into_inner()).unwrap()
    }

    #[test]
    fn test_button_lines() {
        let mut surface = ConsoleSurface::new(Vec::new());
        surface.set_place_button(PlaceButton::Armed);
        surface.set_place_button(PlaceButton::Ready);
        assert_eq!(
            output(surface),
            "[button] Click on map to place marker (disabled)\n[button] Put Marker (enabled)\n"
        );
    }

    #[test]
    fn test_marker_popup_on_one_line() {
        let mut surface = ConsoleSurface::new(Vec::new());
        surface.add_marker(
            LatLng::new(7.1, 125.6),
            &MarkerColor::Green.icon(),
            "<b>A</b>\nB",
        );
        assert_eq!(surface.pin_count(), 1);
        let text = output(surface);
        assert!(text.contains("marker-icon-green.svg at (7.100000, 125.600000)"));
        assert!(text.contains("popup: <b>A</b>\\nB\n"));
    }
}
