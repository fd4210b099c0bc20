//! Company records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::ids::CompanyId;
use crate::validation::{validate_input, InputError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    pub id: CompanyId,
    pub name: String,
    #[serde(default)]
    pub logo_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Company columns embedded in job and application reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanySummary {
    pub name: String,
    #[serde(default)]
    pub logo_url: Option<String>,
}

/// Company creation form (the logo travels separately as an upload).
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewCompany {
    #[validate(length(min = 1, message = "Company name is required"))]
    pub name: String,
}

impl NewCompany {
    pub fn validate_form(&self) -> Result<(), InputError> {
        validate_input(self)
    }

    /// Row to insert once the logo has been stored at `logo_url`.
    pub fn into_insert(self, logo_url: impl Into<String>) -> CompanyInsert {
        CompanyInsert {
            name: self.name,
            logo_url: logo_url.into(),
        }
    }
}

/// Row body for inserting a company.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompanyInsert {
    pub name: String,
    pub logo_url: String,
}
