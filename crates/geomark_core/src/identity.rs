//! Who is using the viewer.

/// Authenticated identity of the current session.
///
/// Only lives as long as the session; a reload starts anonymous again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Identity {
    /// Nobody has logged in
    #[default]
    Anonymous,
    /// Logged in with read-only privileges
    Viewer,
    /// Logged in and allowed to place markers
    Editor,
}

impl Identity {
    /// Check if this identity may create markers.
    pub fn is_editor(&self) -> bool {
        matches!(self, Identity::Editor)
    }

    /// Check if anyone is logged in.
    pub fn is_authenticated(&self) -> bool {
        !matches!(self, Identity::Anonymous)
    }

    /// Get the display name for this identity.
    pub fn name(&self) -> &'static str {
        match self {
            Identity::Anonymous => "anonymous",
            Identity::Viewer => "viewer",
            Identity::Editor => "editor",
        }
    }
}
