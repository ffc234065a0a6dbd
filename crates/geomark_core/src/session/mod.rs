//! Session state machine for the marker authoring workflow.
//!
//! Two orthogonal axes: who is logged in ([`Identity`]) and what the user is
//! doing ([`InteractionMode`]). Every UI event goes through
//! [`Session::handle`], which updates both and returns the list of effects
//! the rendering layer must apply. Nothing here touches a screen.

use crate::auth::CredentialVerifier;
use crate::error::ValidationError;
use crate::geo::{LatLng, ScreenPoint};
use crate::identity::Identity;
use crate::marker::{Marker, MarkerColor};


/// Geographic point captured by a map click, waiting for the form.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PendingPlacement {
    pub position: LatLng,
}

/// What the user is currently doing.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum InteractionMode {
    /// Map clicks do nothing special
    #[default]
    Idle,
    /// "Put Marker" was pressed; the next qualifying click opens the form
    AwaitingPlacement,
    /// The authoring form is open for the captured point
    Composing(PendingPlacement),
}

impl InteractionMode {
    pub fn name(&self) -> &'static str {
        match self {
            InteractionMode::Idle => "idle",
            InteractionMode::AwaitingPlacement => "awaiting_placement",
            InteractionMode::Composing(_) => "composing",
        }
    }
}

/// Discrete UI events the session reacts to.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// "Put Marker" pressed
    PlaceMarkerRequested,
    /// Login form submitted
    LoginSubmitted { username: String, password: String },
    /// Login overlay closed by clicking outside its box
    LoginDismissed,
    /// Logout pressed
    LogoutRequested,
    /// Map clicked at a coordinate, from a pointer position on screen
    MapClicked {
        position: LatLng,
        screen: ScreenPoint,
    },
    /// Authoring form submitted
    FormSubmitted {
        title: String,
        color: MarkerColor,
        note: String,
    },
    /// Authoring form cancel button
    FormCancelled,
    /// Pointer pressed outside the authoring form
    OutsideFormPressed,
    /// Escape: abandon an armed or in-progress placement
    PlacementCancelled,
}

/// Instructions for the rendering layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Effect {
    ShowLoginPrompt,
    HideLoginPrompt,
    /// Inline error under the login form, until the next submit
    ShowLoginError,
    ShowLogout,
    HideLogout,
    /// Put the "awaiting click" affordance on the place-marker control
    ArmPlacement,
    /// Restore the place-marker control to its idle state
    ResetPlacement,
    /// Open the authoring form (fields reset) near a screen point
    OpenForm { anchor: ScreenPoint },
    CloseForm,
    /// Transient highlight on the title field
    FlagTitleInvalid,
}

/// Result of handling one event.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Transition {
    /// Effects to apply, in order
    pub effects: Vec<Effect>,
    /// Marker created by this event, if any
    pub created: Option<Marker>,
    /// Validation failure this event ran into, if any
    pub rejected: Option<ValidationError>,
}

impl Transition {
    fn ignored() -> Self {
        Self::default()
    }

    fn effects(effects: Vec<Effect>) -> Self {
        Self {
            effects,
            ..Self::default()
        }
    }

    fn rejected(error: ValidationError, effect: Effect) -> Self {
        Self {
            effects: vec![effect],
            created: None,
            rejected: Some(error),
        }
    }

    /// True when the event changed nothing visible.
    pub fn is_noop(&self) -> bool {
        self.effects.is_empty() && self.created.is_none()
    }
}

/// Identity and interaction mode of one page session.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Session {
    identity: Identity,
    mode: InteractionMode,
}

impl Session {
    /// Anonymous and idle, as after a page load.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn identity(&self) -> Identity {
        self.identity
    }

    pub fn mode(&self) -> InteractionMode {
        self.mode
    }

    /// The captured point while composing.
    pub fn pending(&self) -> Option<PendingPlacement> {
        match self.mode {
            InteractionMode::Composing(pending) => Some(pending),
            _ => None,
        }
    }

    /// Pure form of [`Session::handle`]: `(state, event) -> (state', effects)`.
    pub fn next(
        mut self,
        event: Event,
        verifier: &dyn CredentialVerifier,
    ) -> (Self, Transition) {
        let transition = self.handle(event, verifier);
        (self, transition)
    }

    /// Apply one event. Events that make no sense in the current state are
    /// ignored and yield an empty transition.
    pub fn handle(&mut self, event: Event, verifier: &dyn CredentialVerifier) -> Transition {
        let before = self.mode;
        let transition = match event {
            Event::PlaceMarkerRequested => self.request_placement(),
            Event::LoginSubmitted { username, password } => {
                self.login(&username, &password, verifier)
            }
            Event::LoginDismissed => self.dismiss_login(),
            Event::LogoutRequested => self.logout(),
            Event::MapClicked { position, screen } => self.map_clicked(position, screen),
            Event::FormSubmitted { title, color, note } => self.submit(&title, color, note),
            Event::FormCancelled | Event::OutsideFormPressed => self.close_form(),
            Event::PlacementCancelled => self.cancel_placement(),
        };

        if transition.is_noop() {
            log::debug!("Event ignored in mode {}", before.name());
        } else if before.name() != self.mode.name() {
            log::debug!("Mode {} -> {}", before.name(), self.mode.name());
        }
        transition
    }

    fn request_placement(&mut self) -> Transition {
        match (self.mode, self.identity.is_editor()) {
            (InteractionMode::Idle, true) => {
                self.mode = InteractionMode::AwaitingPlacement;
                Transition::effects(vec![Effect::ArmPlacement])
            }
            // Not allowed to place yet: ask for credentials, stay armed
            (InteractionMode::Idle, false) | (InteractionMode::AwaitingPlacement, false) => {
                self.mode = InteractionMode::AwaitingPlacement;
                Transition::effects(vec![Effect::ShowLoginPrompt])
            }
            _ => Transition::ignored(),
        }
    }

    fn login(
        &mut self,
        username: &str,
        password: &str,
        verifier: &dyn CredentialVerifier,
    ) -> Transition {
        let Some(identity) = verifier.verify(username, password) else {
            log::warn!("Login failed for '{}'", username.trim());
            return Transition::rejected(
                ValidationError::AuthenticationMismatch,
                Effect::ShowLoginError,
            );
        };

        self.identity = identity;
        log::info!("Logged in as '{}' ({})", username.trim(), identity.name());

        let mut effects = vec![Effect::HideLoginPrompt, Effect::ShowLogout];
        // A viewer ends up armed too; its clicks are still rejected below
        if self.mode == InteractionMode::AwaitingPlacement {
            effects.push(Effect::ArmPlacement);
        }
        Transition::effects(effects)
    }

    fn dismiss_login(&mut self) -> Transition {
        match self.mode {
            InteractionMode::AwaitingPlacement => {
                self.mode = InteractionMode::Idle;
                Transition::effects(vec![Effect::HideLoginPrompt, Effect::ResetPlacement])
            }
            _ => Transition::ignored(),
        }
    }

    fn logout(&mut self) -> Transition {
        if !self.identity.is_authenticated() {
            return Transition::ignored();
        }
        self.identity = Identity::Anonymous;
        log::info!("Logged out");

        let mut effects = vec![Effect::HideLogout];
        match self.mode {
            InteractionMode::Composing(_) => effects.extend([Effect::CloseForm, Effect::ResetPlacement]),
            // The login prompt may still be up from a re-prompt
            InteractionMode::AwaitingPlacement => {
                effects.extend([Effect::HideLoginPrompt, Effect::ResetPlacement])
            }
            InteractionMode::Idle => {}
        }
        self.mode = InteractionMode::Idle;
        Transition::effects(effects)
    }

    fn map_clicked(&mut self, position: LatLng, screen: ScreenPoint) -> Transition {
        if self.mode != InteractionMode::AwaitingPlacement || !self.identity.is_editor() {
            return Transition::ignored();
        }
        self.mode = InteractionMode::Composing(PendingPlacement { position });
        log::debug!("Captured placement at {}", position);
        Transition::effects(vec![Effect::OpenForm { anchor: screen }])
    }

    fn submit(&mut self, title: &str, color: MarkerColor, note: String) -> Transition {
        let InteractionMode::Composing(pending) = self.mode else {
            return Transition::ignored();
        };
        if !self.identity.is_editor() {
            return Transition::ignored();
        }

        let title = title.trim();
        if title.is_empty() {
            return Transition::rejected(ValidationError::EmptyTitle, Effect::FlagTitleInvalid);
        }

        let marker = Marker {
            position: pending.position,
            color,
            title: title.to_string(),
            note,
        };
        log::info!("📍 Marker '{}' ({}) at {}", marker.title, marker.color, marker.position);

        self.mode = InteractionMode::Idle;
        Transition {
            effects: vec![Effect::CloseForm, Effect::ResetPlacement],
            created: Some(marker),
            rejected: None,
        }
    }

    fn close_form(&mut self) -> Transition {
        match self.mode {
            InteractionMode::Composing(_) => {
                self.mode = InteractionMode::Idle;
                Transition::effects(vec![Effect::CloseForm, Effect::ResetPlacement])
            }
            _ => Transition::ignored(),
        }
    }

    fn cancel_placement(&mut self) -> Transition {
        match self.mode {
            InteractionMode::Composing(_) => self.close_form(),
            InteractionMode::AwaitingPlacement => {
                self.mode = InteractionMode::Idle;
                Transition::effects(vec![Effect::HideLoginPrompt, Effect::ResetPlacement])
            }
            InteractionMode::Idle => Transition::ignored(),
        }
    }
}
