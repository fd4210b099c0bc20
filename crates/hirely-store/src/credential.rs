//! Per-call authorization credential.

use std::fmt;

/// Bearer credential of the signed-in user.
///
/// Only a JWT-shaped token (three non-empty dot-separated segments) is sent
/// as the user's bearer. Anything else falls back to the store's public API
/// key, i.e. anonymous access under the store's row-level policies.
#[derive(Clone, Default)]
pub struct Credential {
    token: Option<String>,
}

impl Credential {
    pub fn bearer(token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
        }
    }

    pub fn anonymous() -> Self {
        Self { token: None }
    }

    /// The user token, if it looks like a JWT.
    pub fn user_token(&self) -> Option<&str> {
        self.token.as_deref().filter(|t| is_jwt(t))
    }

    pub fn is_anonymous(&self) -> bool {
        self.user_token().is_none()
    }
}

fn is_jwt(token: &str) -> bool {
    let parts: Vec<&str> = token.split('.').collect();
    parts.len() == 3 && parts.iter().all(|p| !p.is_empty())
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = if self.is_anonymous() { "anonymous" } else { "user" };
        f.debug_struct("Credential").field("kind", &kind).finish()
    }
}
