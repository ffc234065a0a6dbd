//! Application controller.
//!
//! Owns the session, the marker store and the form interaction state, feeds
//! [`UiEvent`]s through the session and applies the resulting effects to a
//! surface that implements both [`MapSurface`] and [`UiSurface`].

use geomark_core::{
    CredentialVerifier, Effect, Event, FormDrag, FormSize, Marker, MarkerStore, ScreenPoint,
    Session, Transition, Viewport, clamp_form_origin, place_form,
};
use web_time::Instant;

use crate::constants::TITLE_FLASH_DURATION;
use crate::map::{MapSettings, MapSurface};
use crate::ui::{EventSource, PlaceButton, UiEvent, UiSurface};

pub struct Controller<S: MapSurface + UiSurface> {
    session: Session,
    markers: MarkerStore,
    verifier: Box<dyn CredentialVerifier>,
    surface: S,
    settings: MapSettings,
    viewport: Viewport,
    form_size: FormSize,
    /// Top-left of the authoring form while it is open
    form_origin: Option<ScreenPoint>,
    /// Click the open form was placed from, until the user drags it
    form_anchor: Option<ScreenPoint>,
    drag: FormDrag,
    /// When the title highlight should be cleared
    title_flag_until: Option<Instant>,
}

impl<S: MapSurface + UiSurface> Controller<S> {
    /// Create a controller and put the landmark pin at the map center.
    pub fn new(
        settings: MapSettings,
        verifier: Box<dyn CredentialVerifier>,
        mut surface: S,
        viewport: Viewport,
    ) -> Self {
        surface.add_landmark(settings.center, &settings.landmark_popup());
        surface.set_place_button(PlaceButton::Ready);
        surface.set_logout_visible(false);

        Self {
            session: Session::new(),
            markers: MarkerStore::new(),
            verifier,
            surface,
            settings,
            viewport,
            form_size: FormSize::default(),
            form_origin: None,
            form_anchor: None,
            drag: FormDrag::default(),
            title_flag_until: None,
        }
    }

    /// Use a known form size instead of the fallback.
    pub fn with_form_size(mut self, size: FormSize) -> Self {
        self.form_size = size;
        self
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn markers(&self) -> &MarkerStore {
        &self.markers
    }

    pub fn settings(&self) -> &MapSettings {
        &self.settings
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn form_origin(&self) -> Option<ScreenPoint> {
        self.form_origin
    }

    pub fn is_dragging_form(&self) -> bool {
        self.drag.is_dragging()
    }

    pub fn is_title_flagged(&self) -> bool {
        self.title_flag_until.is_some()
    }

    /// Handle one event from the frontend.
    pub fn dispatch(&mut self, event: UiEvent) -> Transition {
        self.dispatch_at(event, Instant::now())
    }

    /// Like [`Controller::dispatch`] with an explicit clock.
    pub fn dispatch_at(&mut self, event: UiEvent, now: Instant) -> Transition {
        self.tick(now);

        match event {
            UiEvent::Session(Event::OutsideFormPressed) if self.drag.is_dragging() => {
                log::debug!("Outside press ignored while dragging the form");
                Transition::default()
            }
            UiEvent::Session(event) => {
                let transition = self.session.handle(event, self.verifier.as_ref());
                self.apply(&transition, now);
                transition
            }
            UiEvent::HeaderPressed(pointer) => {
                if let Some(origin) = self.form_origin {
                    self.drag.begin(pointer, origin);
                }
                Transition::default()
            }
            UiEvent::PointerMoved(pointer) => {
                if let Some(origin) = self.drag.update(pointer, self.form_size, self.viewport) {
                    self.form_origin = Some(origin);
                    self.form_anchor = None;
                    self.surface.move_form(origin);
                }
                Transition::default()
            }
            UiEvent::PointerReleased => {
                self.drag.end();
                Transition::default()
            }
            UiEvent::ViewportResized(viewport) => {
                log::debug!("Viewport resized to {}x{}", viewport.width, viewport.height);
                self.viewport = viewport;
                self.refit_form();
                Transition::default()
            }
            UiEvent::FormMeasured(size) => {
                self.form_size = size;
                self.refit_form();
                Transition::default()
            }
        }
    }

    /// Clear the title highlight once its deadline has passed.
    pub fn tick(&mut self, now: Instant) {
        if self.title_flag_until.is_some_and(|until| now >= until) {
            self.clear_title_flag();
        }
    }

    /// Drain an event source. Returns the number of events handled.
    pub fn run(&mut self, source: &mut dyn EventSource) -> usize {
        let mut handled = 0;
        while let Some(event) = source.next_event() {
            self.dispatch(event);
            handled += 1;
        }
        log::debug!("Event source exhausted after {} events", handled);
        handled
    }

    fn apply(&mut self, transition: &Transition, now: Instant) {
        for effect in &transition.effects {
            match *effect {
                Effect::ShowLoginPrompt => self.surface.set_login_prompt_visible(true),
                Effect::HideLoginPrompt => self.surface.set_login_prompt_visible(false),
                Effect::ShowLoginError => self.surface.show_login_error(),
                Effect::ShowLogout => self.surface.set_logout_visible(true),
                Effect::HideLogout => self.surface.set_logout_visible(false),
                Effect::ArmPlacement => self.surface.set_place_button(PlaceButton::Armed),
                Effect::ResetPlacement => self.surface.set_place_button(PlaceButton::Ready),
                Effect::OpenForm { anchor } => {
                    let origin = place_form(anchor, self.form_size, self.viewport);
                    self.form_origin = Some(origin);
                    self.form_anchor = Some(anchor);
                    self.surface.open_form(origin);
                }
                Effect::CloseForm => {
                    self.form_origin = None;
                    self.form_anchor = None;
                    self.drag.end();
                    self.clear_title_flag();
                    self.surface.close_form();
                }
                Effect::FlagTitleInvalid => {
                    self.title_flag_until = Some(now + TITLE_FLASH_DURATION);
                    self.surface.set_title_invalid(true);
                }
            }
        }

        if let Some(marker) = &transition.created {
            self.add_marker(marker.clone());
        }
    }

    /// Re-place an open form after its size or the viewport changed.
    ///
    /// A form still at its click position is placed again from the click; a
    /// dragged one only gets pulled back inside the viewport.
    fn refit_form(&mut self) {
        let Some(origin) = self.form_origin else {
            return;
        };
        let fitted = match self.form_anchor {
            Some(anchor) => place_form(anchor, self.form_size, self.viewport),
            None => clamp_form_origin(origin, self.form_size, self.viewport),
        };
        if fitted != origin {
            self.form_origin = Some(fitted);
            self.surface.move_form(fitted);
        }
    }

    fn add_marker(&mut self, marker: Marker) {
        self.surface
            .add_marker(marker.position, &marker.color.icon(), &marker.popup_html());
        self.markers.push(marker);
    }

    fn clear_title_flag(&mut self) {
        if self.title_flag_until.take().is_some() {
            self.surface.set_title_invalid(false);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use geomark_core::{LatLng, MarkerColor, StaticCredentials};

    use super::*;

    /// Everything a surface was asked to do, in order.
    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Marker(LatLng, &'static str, String),
        Landmark(LatLng, String),
        LoginPrompt(bool),
        LoginError,
        Logout(bool),
        Button(PlaceButton),
        OpenForm(ScreenPoint),
        MoveForm(ScreenPoint),
        CloseForm,
        TitleInvalid(bool),
    }

    #[derive(Default)]
    struct Recorder {
        calls: Vec<Call>,
    }

    impl Recorder {
        fn take(&mut self) -> Vec<Call> {
            std::mem::take(&mut self.calls)
        }
    }

    impl MapSurface for Recorder {
        fn add_marker(&mut self, position: LatLng, icon: &geomark_core::MarkerIcon, popup_html: &str) {
            self.calls
                .push(Call::Marker(position, icon.url, popup_html.to_string()));
        }

        fn add_landmark(&mut self, position: LatLng, popup_text: &str) {
            self.calls.push(Call::Landmark(position, popup_text.to_string()));
        }
    }

    impl UiSurface for Recorder {
        fn set_login_prompt_visible(&mut self, visible: bool) {
            self.calls.push(Call::LoginPrompt(visible));
        }

        fn show_login_error(&mut self) {
            self.calls.push(Call::LoginError);
        }

        fn set_logout_visible(&mut self, visible: bool) {
            self.calls.push(Call::Logout(visible));
        }

        fn set_place_button(&mut self, state: PlaceButton) {
            self.calls.push(Call::Button(state));
        }

        fn open_form(&mut self, origin: ScreenPoint) {
            self.calls.push(Call::OpenForm(origin));
        }

        fn move_form(&mut self, origin: ScreenPoint) {
            self.calls.push(Call::MoveForm(origin));
        }

        fn close_form(&mut self) {
            self.calls.push(Call::CloseForm);
        }

        fn set_title_invalid(&mut self, invalid: bool) {
            self.calls.push(Call::TitleInvalid(invalid));
        }
    }

    fn controller() -> Controller<Recorder> {
        let mut c = Controller::new(
            MapSettings::default(),
            Box::new(StaticCredentials::default()),
            Recorder::default(),
            Viewport::new(1024.0, 768.0),
        );
        c.surface_mut().take();
        c
    }

    fn login(c: &mut Controller<Recorder>, username: &str, password: &str) {
        c.dispatch(
            Event::LoginSubmitted {
                username: username.to_string(),
                password: password.to_string(),
            }
            .into(),
        );
    }

    fn click(c: &mut Controller<Recorder>, x: f32, y: f32) {
        c.dispatch(
            Event::MapClicked {
                position: LatLng::new(7.1, 125.6),
                screen: ScreenPoint::new(x, y),
            }
            .into(),
        );
    }

    /// Editor logged in and composing with the form opened from (100, 100).
    fn composing() -> Controller<Recorder> {
        let mut c = controller();
        c.dispatch(Event::PlaceMarkerRequested.into());
        login(&mut c, "admin", "123");
        click(&mut c, 100.0, 100.0);
        c.surface_mut().take();
        c
    }

    fn submit(title: &str) -> UiEvent {
        Event::FormSubmitted {
            title: title.to_string(),
            color: MarkerColor::Blue,
            note: "line1\nline2".to_string(),
        }
        .into()
    }

    #[test]
    fn test_new_places_landmark() {
        let mut c = Controller::new(
            MapSettings::default(),
            Box::new(StaticCredentials::default()),
            Recorder::default(),
            Viewport::new(1024.0, 768.0),
        );
        let calls = c.surface_mut().take();
        assert_eq!(
            calls[0],
            Call::Landmark(
                LatLng::new(7.090917, 125.611417),
                "Custom Center: 7°05'27.3\"N 125°36'41.1\"E".to_string()
            )
        );
        assert!(calls.contains(&Call::Button(PlaceButton::Ready)));
        assert!(c.markers().is_empty());
    }

    #[test]
    fn test_login_flow_drives_surface() {
        let mut c = controller();
        c.dispatch(Event::PlaceMarkerRequested.into());
        assert_eq!(c.surface_mut().take(), vec![Call::LoginPrompt(true)]);

        login(&mut c, "admin", "nope");
        assert_eq!(c.surface_mut().take(), vec![Call::LoginError]);

        login(&mut c, "admin", "123");
        assert_eq!(
            c.surface_mut().take(),
            vec![
                Call::LoginPrompt(false),
                Call::Logout(true),
                Call::Button(PlaceButton::Armed)
            ]
        );
    }

    #[test]
    fn test_click_opens_form_inside_viewport() {
        let mut c = controller();
        c.dispatch(Event::PlaceMarkerRequested.into());
        login(&mut c, "admin", "123");
        c.surface_mut().take();

        click(&mut c, 1000.0, 750.0);
        let origin = c.form_origin().unwrap();
        assert_eq!(c.surface_mut().take(), vec![Call::OpenForm(origin)]);
        assert!(origin.x >= 0.0 && origin.x + 280.0 <= 1024.0);
        assert!(origin.y >= 0.0 && origin.y + 260.0 <= 768.0);
    }

    #[test]
    fn test_submit_adds_marker_to_map_and_store() {
        let mut c = composing();
        c.dispatch(submit("Checkpoint A"));

        assert_eq!(c.markers().len(), 1);
        let marker = c.markers().get(0).unwrap();
        assert_eq!(marker.title, "Checkpoint A");
        assert_eq!(marker.color, MarkerColor::Blue);
        assert_eq!(marker.note, "line1\nline2");

        let calls = c.surface_mut().take();
        assert_eq!(calls[0], Call::CloseForm);
        assert_eq!(calls[1], Call::Button(PlaceButton::Ready));
        match &calls[2] {
            Call::Marker(position, url, popup) => {
                assert_eq!(*position, LatLng::new(7.1, 125.6));
                assert!(url.ends_with("marker-icon-blue.svg"));
                assert!(popup.contains("Checkpoint A"));
            }
            other => panic!("expected a marker pin, got {:?}", other),
        }
        assert!(c.form_origin().is_none());
    }

    #[test]
    fn test_title_flag_clears_after_delay() {
        let mut c = composing();
        let start = Instant::now();
        c.dispatch_at(submit("   "), start);
        assert!(c.is_title_flagged());
        assert_eq!(c.surface_mut().take(), vec![Call::TitleInvalid(true)]);
        assert!(c.markers().is_empty());

        c.tick(start + Duration::from_millis(500));
        assert!(c.is_title_flagged());

        c.tick(start + TITLE_FLASH_DURATION);
        assert!(!c.is_title_flagged());
        assert_eq!(c.surface_mut().take(), vec![Call::TitleInvalid(false)]);
    }

    #[test]
    fn test_drag_moves_form_without_touching_placement() {
        let mut c = composing();
        let origin = c.form_origin().unwrap();
        let pending = c.session().pending();

        c.dispatch(UiEvent::HeaderPressed(ScreenPoint::new(origin.x + 20.0, origin.y + 5.0)));
        assert!(c.is_dragging_form());
        c.dispatch(UiEvent::PointerMoved(ScreenPoint::new(420.0, 305.0)));
        assert_eq!(c.form_origin(), Some(ScreenPoint::new(400.0, 300.0)));
        assert_eq!(
            c.surface_mut().take(),
            vec![Call::MoveForm(ScreenPoint::new(400.0, 300.0))]
        );

        // Outside presses are not dismissals while dragging
        let t = c.dispatch(Event::OutsideFormPressed.into());
        assert!(t.is_noop());
        assert_eq!(c.session().pending(), pending);

        c.dispatch(UiEvent::PointerReleased);
        assert!(!c.is_dragging_form());
        c.dispatch(UiEvent::PointerMoved(ScreenPoint::new(10.0, 10.0)));
        assert_eq!(c.form_origin(), Some(ScreenPoint::new(400.0, 300.0)));
    }

    #[test]
    fn test_outside_press_dismisses_when_not_dragging() {
        let mut c = composing();
        c.dispatch(Event::OutsideFormPressed.into());
        assert!(c.session().pending().is_none());
        assert!(c.form_origin().is_none());
        assert_eq!(
            c.surface_mut().take(),
            vec![Call::CloseForm, Call::Button(PlaceButton::Ready)]
        );

        // Second dismissal changes nothing
        c.dispatch(Event::OutsideFormPressed.into());
        assert!(c.surface_mut().take().is_empty());
        assert!(c.markers().is_empty());
    }

    #[test]
    fn test_measured_form_is_moved_inside_viewport() {
        let mut c = controller();
        c.dispatch(Event::PlaceMarkerRequested.into());
        login(&mut c, "admin", "123");
        click(&mut c, 600.0, 740.0);
        c.surface_mut().take();

        // Rendered form turns out larger than the configured size
        c.dispatch(UiEvent::FormMeasured(FormSize::new(360.0, 420.0)));
        let origin = c.form_origin().unwrap();
        assert_eq!(origin, ScreenPoint::new(610.0, 330.0));
        assert!(origin.x + 360.0 <= 1024.0);
        assert!(origin.y + 420.0 <= 768.0);
        assert_eq!(c.surface_mut().take(), vec![Call::MoveForm(origin)]);
    }

    #[test]
    fn test_resize_pulls_dragged_form_back_inside() {
        let mut c = composing();
        let origin = c.form_origin().unwrap();
        c.dispatch(UiEvent::HeaderPressed(origin));
        c.dispatch(UiEvent::PointerMoved(ScreenPoint::new(700.0, 500.0)));
        c.dispatch(UiEvent::PointerReleased);
        c.surface_mut().take();

        c.dispatch(UiEvent::ViewportResized(Viewport::new(800.0, 600.0)));
        assert_eq!(c.form_origin(), Some(ScreenPoint::new(520.0, 340.0)));
        assert_eq!(
            c.surface_mut().take(),
            vec![Call::MoveForm(ScreenPoint::new(520.0, 340.0))]
        );
    }

    #[test]
    fn test_measure_without_open_form_only_records_size() {
        let mut c = controller();
        c.dispatch(UiEvent::FormMeasured(FormSize::new(360.0, 420.0)));
        assert!(c.form_origin().is_none());
        assert!(c.surface_mut().take().is_empty());
    }

    #[test]
    fn test_header_press_without_form_is_ignored() {
        let mut c = controller();
        c.dispatch(UiEvent::HeaderPressed(ScreenPoint::new(10.0, 10.0)));
        assert!(!c.is_dragging_form());
    }

    #[test]
    fn test_run_drains_source() {
        let mut c = controller();
        let events = vec![
            UiEvent::from(Event::PlaceMarkerRequested),
            UiEvent::from(Event::LoginSubmitted {
                username: "admin".to_string(),
                password: "123".to_string(),
            }),
            UiEvent::from(Event::MapClicked {
                position: LatLng::new(7.2, 125.5),
                screen: ScreenPoint::new(300.0, 300.0),
            }),
            submit("Gate"),
        ];
        let handled = c.run(&mut events.into_iter());
        assert_eq!(handled, 4);
        assert_eq!(c.markers().len(), 1);
    }

    #[test]
    fn test_resize_and_measure_affect_next_placement() {
        let mut c = controller();
        c.dispatch(UiEvent::ViewportResized(Viewport::new(400.0, 300.0)));
        c.dispatch(UiEvent::FormMeasured(FormSize::new(200.0, 100.0)));
        c.dispatch(Event::PlaceMarkerRequested.into());
        login(&mut c, "admin", "123");
        click(&mut c, 390.0, 290.0);
        assert_eq!(c.form_origin(), Some(ScreenPoint::new(180.0, 200.0)));
    }
}
