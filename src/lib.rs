//! GeoMark - region-bounded map viewer with editor-placed markers
//!
//! Anyone can look at the map and its markers; the editor account can drop
//! annotated, colored pins on it. Runs in the browser (WASM) or as a console
//! walkthrough on native targets.

pub mod config;
pub mod constants;
pub mod controller;
pub mod map;
pub mod ui;

#[cfg(not(target_arch = "wasm32"))]
pub mod console;

pub use config::{AppConfig, ConfigError, LogLevel};
pub use controller::Controller;
pub use map::{MapSettings, MapSurface};
pub use ui::{EventSource, PlaceButton, UiEvent, UiSurface};

// WASM entry point
#[cfg(target_arch = "wasm32")]
mod wasm;

#[cfg(target_arch = "wasm32")]
pub use wasm::*;
