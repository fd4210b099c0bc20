//! User roles.
//!
//! The identity provider stores the role as free-form per-user metadata. It is
//! parsed into [`UserRole`] here; anything missing or unrecognised counts as
//! "no role yet", which sends the user through onboarding.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// Searches, saves and applies to jobs.
    Candidate,
    /// Posts jobs and manages applicants.
    Recruiter,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Candidate => "candidate",
            UserRole::Recruiter => "recruiter",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown role '{0}'")]
pub struct UnknownRole(pub String);

impl FromStr for UserRole {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "candidate" => Ok(UserRole::Candidate),
            "recruiter" => Ok(UserRole::Recruiter),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}

/// Resolve the role stored under metadata, if any.
pub fn resolve_role(value: Option<&serde_json::Value>) -> Option<UserRole> {
    let raw = match value {
        None | Some(serde_json::Value::Null) => return None,
        Some(serde_json::Value::String(s)) if s.trim().is_empty() => return None,
        Some(serde_json::Value::String(s)) => s.as_str(),
        Some(other) => {
            warn!(value = %other, "Ignoring non-string role metadata");
            return None;
        }
    };

    match raw.parse() {
        Ok(role) => Some(role),
        Err(e) => {
            warn!("Ignoring role metadata: {}", e);
            None
        }
    }
}
