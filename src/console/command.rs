//! Parsing of console command lines into UI events.

use geomark_core::{
    Event, FormSize, LatLng, LatLngBounds, MarkerColor, ParseColorError, ScreenPoint, Viewport,
};

use crate::ui::UiEvent;

/// Usage text for `help`.
pub const HELP: &str = "\
commands:
  place                         press \"Put Marker\"
  login <user> <password>       submit the login form
  dismiss-login                 click outside the login box
  logout                        press \"Logout\"
  click <lat> <lng> <x> <y>     click the map at a coordinate from screen point (x, y)
  submit <color> <title> [| <note>]
                                submit the marker form (\\n in the note is a line break)
  cancel                        press \"Cancel\" on the marker form
  outside                       press the mouse outside the marker form
  escape                        abandon the current placement
  drag <x> <y>                  press on the marker form header
  move <x> <y>                  move the pointer
  release                       release the pointer
  resize <w>x<h>                resize the viewport
  form-size <w>x<h>             report the rendered form size
  help                          show this text
  quit                          exit";

/// One parsed console line.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Event(UiEvent),
    Help,
    Quit,
}

/// Errors for lines that cannot be turned into a command.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CommandError {
    #[error("Unknown command '{0}' (try 'help')")]
    Unknown(String),

    #[error("'{command}' needs <{argument}>")]
    MissingArgument {
        command: &'static str,
        argument: &'static str,
    },

    #[error("'{0}' is not a number")]
    InvalidNumber(String),

    #[error("'{0}' is not a size, expected <width>x<height>")]
    InvalidSize(String),

    #[error(transparent)]
    InvalidColor(#[from] ParseColorError),

    #[error("{0} is outside the map region")]
    OutOfRegion(LatLng),
}

struct Args<'a> {
    command: &'static str,
    words: std::str::SplitWhitespace<'a>,
}

impl<'a> Args<'a> {
    fn new(command: &'static str, rest: &'a str) -> Self {
        Self {
            command,
            words: rest.split_whitespace(),
        }
    }

    fn word(&mut self, argument: &'static str) -> Result<&'a str, CommandError> {
        self.words.next().ok_or(CommandError::MissingArgument {
            command: self.command,
            argument,
        })
    }

    fn number<T: std::str::FromStr>(&mut self, argument: &'static str) -> Result<T, CommandError> {
        let word = self.word(argument)?;
        word.parse()
            .map_err(|_| CommandError::InvalidNumber(word.to_string()))
    }

    fn point(&mut self) -> Result<ScreenPoint, CommandError> {
        Ok(ScreenPoint::new(self.number("x")?, self.number("y")?))
    }

    fn size(&mut self) -> Result<(f32, f32), CommandError> {
        let word = self.word("size")?;
        let invalid = || CommandError::InvalidSize(word.to_string());
        let (w, h) = word.split_once(['x', 'X']).ok_or_else(invalid)?;
        let w: f32 = w.parse().map_err(|_| invalid())?;
        let h: f32 = h.parse().map_err(|_| invalid())?;
        if w <= 0.0 || h <= 0.0 {
            return Err(invalid());
        }
        Ok((w, h))
    }
}

/// Parse a `<width>x<height>` size.
pub fn parse_size(text: &str) -> Result<(f32, f32), CommandError> {
    Args::new("size", text).size()
}

/// Parse one line. Blank lines and `#` comments yield `Ok(None)`.
///
/// Map clicks outside `region` are refused the way the real map refuses to
/// pan there.
pub fn parse_command(line: &str, region: &LatLngBounds) -> Result<Option<Command>, CommandError> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }
    let (name, rest) = line
        .split_once(char::is_whitespace)
        .unwrap_or((line, ""));

    let event: UiEvent = match name {
        "help" => return Ok(Some(Command::Help)),
        "quit" | "exit" => return Ok(Some(Command::Quit)),
        "place" => Event::PlaceMarkerRequested.into(),
        "login" => {
            let mut args = Args::new("login", rest);
            let username = args.word("user")?.to_string();
            // An empty password is a valid (if wrong) attempt
            let password = args.words.next().unwrap_or_default().to_string();
            Event::LoginSubmitted { username, password }.into()
        }
        "dismiss-login" => Event::LoginDismissed.into(),
        "logout" => Event::LogoutRequested.into(),
        "click" => {
            let mut args = Args::new("click", rest);
            let position = LatLng::new(args.number("lat")?, args.number("lng")?);
            let screen = args.point()?;
            if !region.contains(position) {
                return Err(CommandError::OutOfRegion(position));
            }
            Event::MapClicked { position, screen }.into()
        }
        "submit" => parse_submit(rest)?,
        "cancel" => Event::FormCancelled.into(),
        "outside" => Event::OutsideFormPressed.into(),
        "escape" => Event::PlacementCancelled.into(),
        "drag" => UiEvent::HeaderPressed(Args::new("drag", rest).point()?),
        "move" => UiEvent::PointerMoved(Args::new("move", rest).point()?),
        "release" => UiEvent::PointerReleased,
        "resize" => {
            let (w, h) = Args::new("resize", rest).size()?;
            UiEvent::ViewportResized(Viewport::new(w, h))
        }
        "form-size" => {
            let (w, h) = Args::new("form-size", rest).size()?;
            UiEvent::FormMeasured(FormSize::new(w, h))
        }
        other => return Err(CommandError::Unknown(other.to_string())),
    };
    Ok(Some(Command::Event(event)))
}

/// `submit <color> <title> [| <note>]`. The title is passed through
/// untrimmed so blank titles reach the session as typed.
fn parse_submit(rest: &str) -> Result<UiEvent, CommandError> {
    let rest = rest.trim_start();
    let (color, tail) = rest
        .split_once(char::is_whitespace)
        .unwrap_or((rest, ""));
    if color.is_empty() {
        return Err(CommandError::MissingArgument {
            command: "submit",
            argument: "color",
        });
    }
    let color: MarkerColor = color.parse()?;

    let (title, note) = match tail.split_once('|') {
        Some((title, note)) => (title.trim_end(), note.trim_start().replace("\\n", "\n")),
        None => (tail, String::new()),
    };

    Ok(Event::FormSubmitted {
        title: title.to_string(),
        color,
        note,
    }
    .into())
}
