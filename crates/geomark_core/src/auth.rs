//! Credential checking.
//!
//! The built-in table is a placeholder, not a security boundary: passwords
//! are compared in plain text and there is no lockout. Anything implementing
//! [`CredentialVerifier`] can replace it without changes to the session.

use std::collections::BTreeMap;

use crate::identity::Identity;

/// Capability that turns a username/password pair into an identity.
pub trait CredentialVerifier {
    /// Returns the identity the credentials grant, or None on mismatch.
    fn verify(&self, username: &str, password: &str) -> Option<Identity>;
}

/// Fixed username -> password table with one designated editor account.
#[derive(Debug, Clone)]
pub struct StaticCredentials {
    users: BTreeMap<String, String>,
    editor: String,
}

impl StaticCredentials {
    /// Build from a user table. Every user except `editor` is a viewer.
    pub fn new(users: BTreeMap<String, String>, editor: impl Into<String>) -> Self {
        Self {
            users,
            editor: editor.into(),
        }
    }

    /// Add or replace an account.
    pub fn with_user(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.users.insert(username.into(), password.into());
        self
    }

    pub fn editor_username(&self) -> &str {
        &self.editor
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

impl Default for StaticCredentials {
    fn default() -> Self {
        Self::new(BTreeMap::new(), "admin")
            .with_user("viewer", "viewer123")
            .with_user("admin", "123")
    }
}

impl CredentialVerifier for StaticCredentials {
    fn verify(&self, username: &str, password: &str) -> Option<Identity> {
        let username = username.trim();
        let expected = self.users.get(username)?;
        if expected != password {
            return None;
        }
        if username == self.editor {
            Some(Identity::Editor)
        } else {
            Some(Identity::Viewer)
        }
    }
}
