//! Error types for the authoring workflow.

/// Input validation failures.
///
/// These are the only things that can go wrong in a session. Neither is
/// fatal: the session reports them as effects and stays where it is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// Username/password pair did not match any known account
    #[error("Invalid username or password")]
    AuthenticationMismatch,

    /// Marker title was empty or whitespace only
    #[error("Marker title must not be empty")]
    EmptyTitle,
}

/// Returned when a string does not name one of the four marker colors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown marker color '{0}' (expected red, yellow, blue or green)")]
pub struct ParseColorError(pub String);
