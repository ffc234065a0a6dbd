//! Native console frontend.
//!
//! Reads one command per line, turns it into UI events and prints what the
//! browser page would show. Handy for scripted walkthroughs of the authoring
//! workflow without a browser.

mod command;
mod surface;

use std::io::{BufRead, Write};

use geomark_core::{LatLngBounds, Viewport};

pub use command::{parse_command, parse_size, Command, CommandError, HELP};
pub use surface::ConsoleSurface;

use crate::config::AppConfig;
use crate::controller::Controller;
use crate::ui::UiEvent;

/// Iterator of UI events parsed from lines of text.
///
/// Bad lines are logged and skipped; `quit` or end of input ends the stream.
/// A `help` line also returns `None`, with [`ScriptEvents::take_help`]
/// reporting it, so the caller can print the help and keep iterating.
pub struct ScriptEvents<R: BufRead> {
    lines: std::io::Lines<R>,
    region: LatLngBounds,
    help_requested: bool,
}

impl<R: BufRead> ScriptEvents<R> {
    pub fn new(input: R, region: LatLngBounds) -> Self {
        Self {
            lines: input.lines(),
            region,
            help_requested: false,
        }
    }

    /// True once per `help` line that paused the stream.
    pub fn take_help(&mut self) -> bool {
        std::mem::take(&mut self.help_requested)
    }
}

impl<R: BufRead> Iterator for ScriptEvents<R> {
    type Item = UiEvent;

    fn next(&mut self) -> Option<UiEvent> {
        loop {
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(e) => {
                    log::error!("Failed to read input: {}", e);
                    return None;
                }
            };

            match parse_command(&line, &self.region) {
                Ok(Some(Command::Event(event))) => return Some(event),
                Ok(Some(Command::Help)) => {
                    self.help_requested = true;
                    return None;
                }
                Ok(Some(Command::Quit)) => return None,
                Ok(None) => {}
                Err(e) => log::warn!("{}", e),
            }
        }
    }
}

/// Run a whole session from `input`, writing the page state to `output`.
pub fn run_script<R: BufRead, W: Write>(
    config: &AppConfig,
    viewport: Viewport,
    input: R,
    output: W,
) -> Controller<ConsoleSurface<W>> {
    let mut controller = Controller::new(
        config.map.clone(),
        Box::new(config.auth.verifier()),
        ConsoleSurface::new(output),
        viewport,
    )
    .with_form_size(config.form.size());

    let mut events = ScriptEvents::new(input, config.map.bounds());
    loop {
        controller.run(&mut events);
        if !events.take_help() {
            break;
        }
        controller.surface_mut().write_text(HELP);
    }
    controller
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(script: &str) -> (Controller<ConsoleSurface<Vec<u8>>>, String) {
        let controller = run_script(
            &AppConfig::default(),
            Viewport::new(1024.0, 768.0),
            script.as_bytes(),
            Vec::new(),
        );
        let text = String::from_utf8(controller.surface().output().clone()).unwrap();
        (controller, text)
    }

    #[test]
    fn test_full_walkthrough() {
        let script = "\
# anonymous visitor tries to place a marker
place
login admin 123
click 7.1 125.6 100 100
submit blue
submit blue Checkpoint A | line1\\nline2
quit
place
";
        let (controller, text) = run(script);

        assert_eq!(controller.markers().len(), 1);
        let marker = controller.markers().get(0).unwrap();
        assert_eq!(marker.title, "Checkpoint A");
        assert_eq!(marker.note, "line1\nline2");
        // Landmark plus the new marker
        assert_eq!(controller.surface().pin_count(), 2);

        assert!(text.contains("[login] enter username and password"));
        assert!(text.contains("[button] Click on map to place marker (disabled)"));
        assert!(text.contains("[form] open at (110, 90)"));
        assert!(text.contains("[form] title is required"));
        assert!(text.ends_with("[button] Put Marker (enabled)\n[map] pin assets/MarkerColor/marker-icon-blue.svg at (7.100000, 125.600000)\n[map]   popup: <b>Checkpoint A</b><br><b>Note:</b><br><p style='white-space:pre-line;max-width:260px;margin:0;'>line1\\nline2</p><br><b>Color:</b> blue\n"));
    }

    #[test]
    fn test_viewer_cannot_place() {
        let script = "\
place
login viewer viewer123
click 7.1 125.6 100 100
click 7.2 125.5 200 200
escape
";
        let (controller, text) = run(script);
        assert!(controller.markers().is_empty());
        assert!(!text.contains("[form] open"));
        assert!(text.ends_with("[button] Put Marker (enabled)\n"));
    }

    #[test]
    fn test_help_goes_to_output() {
        let script = "\
help
place
";
        let (_, text) = run(script);
        assert!(text.starts_with("[map] landmark at"));
        assert!(text.contains(HELP));
        // Commands after help still run
        assert!(text.ends_with("[login] enter username and password\n"));
    }

    #[test]
    fn test_bad_lines_are_skipped() {
        let script = "\
fly away
click 50.0 10.0 1 1
place
";
        let (controller, text) = run(script);
        assert!(controller.markers().is_empty());
        assert!(text.ends_with("[login] enter username and password\n"));
    }
}
