//! UI surface capability and the events a frontend feeds the controller.

use geomark_core::{Event, FormSize, ScreenPoint, Viewport};

use crate::constants::{PLACE_LABEL_ARMED, PLACE_LABEL_READY};

/// State of the place-marker control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaceButton {
    /// "Put Marker", clickable
    #[default]
    Ready,
    /// "Click on map to place marker", disabled
    Armed,
}

impl PlaceButton {
    pub fn label(&self) -> &'static str {
        match self {
            PlaceButton::Ready => PLACE_LABEL_READY,
            PlaceButton::Armed => PLACE_LABEL_ARMED,
        }
    }

    pub fn enabled(&self) -> bool {
        matches!(self, PlaceButton::Ready)
    }
}

/// The forms and controls around the map.
pub trait UiSurface {
    fn set_login_prompt_visible(&mut self, visible: bool);

    /// Show the inline credential mismatch message.
    fn show_login_error(&mut self);

    fn set_logout_visible(&mut self, visible: bool);

    fn set_place_button(&mut self, state: PlaceButton);

    /// Show the authoring form at `origin` with empty title, red color and
    /// empty note, and focus the title.
    fn open_form(&mut self, origin: ScreenPoint);

    fn move_form(&mut self, origin: ScreenPoint);

    fn close_form(&mut self);

    fn set_title_invalid(&mut self, invalid: bool);
}

/// Everything a frontend can report.
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    /// Goes straight to the session
    Session(Event),
    /// Pointer pressed on the authoring form header
    HeaderPressed(ScreenPoint),
    PointerMoved(ScreenPoint),
    PointerReleased,
    ViewportResized(Viewport),
    /// The form was laid out and has a real size now
    FormMeasured(FormSize),
}

impl From<Event> for UiEvent {
    fn from(event: Event) -> Self {
        UiEvent::Session(event)
    }
}

/// A pull-style source of UI events, e.g. a script or a terminal.
pub trait EventSource {
    /// Next event, or None when the source is exhausted.
    fn next_event(&mut self) -> Option<UiEvent>;
}

impl<I: Iterator<Item = UiEvent>> EventSource for I {
    fn next_event(&mut self) -> Option<UiEvent> {
        self.next()
    }
}
