//! geomark_core - marker authoring workflow for a region-bounded map viewer
//!
//! This crate holds everything that does not touch a screen: geography,
//! identities and credential checks, the marker store and the session state
//! machine that decides when a map click turns into a new marker.

mod auth;
mod error;
mod geo;
mod identity;
mod marker;
mod placement;
mod session;
mod store;

pub use auth::{CredentialVerifier, StaticCredentials};
pub use error::{ParseColorError, ValidationError};
pub use geo::{LatLng, LatLngBounds, ScreenPoint};
pub use identity::Identity;
pub use marker::{Marker, MarkerColor, MarkerIcon};
pub use placement::{clamp_form_origin, place_form, FormDrag, FormSize, Viewport, CLICK_OFFSET};
pub use session::{Effect, Event, InteractionMode, PendingPlacement, Session, Transition};
pub use store::{MarkerId, MarkerStore};

