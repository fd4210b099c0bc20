//! Typed record identifiers.
//!
//! The store hands out numeric keys for some collections and text keys for
//! others (user ids come from the identity provider). Every id is kept as a
//! non-empty string and accepts either JSON form on the way in.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use crate::validation::InputError;

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(i64),
}

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident, $field:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Parse an identifier, rejecting empty or blank input.
            pub fn parse(raw: impl Into<String>) -> Result<Self, InputError> {
                let raw = raw.into();
                let trimmed = raw.trim();
                if trimmed.is_empty() {
                    return Err(InputError::field($field, "must not be empty"));
                }
                Ok(Self(trimmed.to_string()))
            }

            /// Get the inner string.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = match RawId::deserialize(deserializer)? {
                    RawId::Text(s) => s,
                    RawId::Number(n) => n.to_string(),
                };
                Self::parse(raw).map_err(serde::de::Error::custom)
            }
        }
    };
}

define_id!(
    /// Identifier of a job posting.
    JobId,
    "job_id"
);
define_id!(
    /// Identifier of a company.
    CompanyId,
    "company_id"
);
define_id!(
    /// Identifier of an application.
    ApplicationId,
    "application_id"
);
define_id!(
    /// Identifier of a saved-job bookmark row.
    SavedJobId,
    "saved_job_id"
);
define_id!(
    /// Identity-provider user id (candidate or recruiter).
    UserId,
    "user_id"
);
