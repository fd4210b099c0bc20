//! Job posting records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::application::Application;
use crate::company::CompanySummary;
use crate::ids::{CompanyId, JobId, SavedJobId, UserId};
use crate::validation::{validate_input, InputError};

/// A job posting as stored, with optional embedded relations from joined reads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub id: JobId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Markdown rich text.
    #[serde(default)]
    pub requirements: String,
    #[serde(default)]
    pub location: String,
    pub company_id: CompanyId,
    /// Owner of the posting.
    pub recruiter_id: UserId,
    /// Hiring status: whether new applications are accepted.
    #[serde(rename = "isOpen", default = "default_open")]
    pub is_open: bool,
    pub created_at: DateTime<Utc>,

    /// Embedded `companies(name, logo_url)`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<CompanySummary>,

    /// Embedded `saved_jobs(id)` rows of the current user.
    #[serde(default, alias = "saved_jobs", skip_serializing_if = "Option::is_none")]
    pub saved: Option<Vec<SavedMarker>>,

    /// Embedded `applications(*)`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub applications: Option<Vec<Application>>,
}

fn default_open() -> bool {
    true
}

impl Job {
    /// Whether the current user has bookmarked this job.
    pub fn is_saved(&self) -> bool {
        self.saved.as_ref().is_some_and(|s| !s.is_empty())
    }

    /// Whether the apply action should be offered.
    ///
    /// Only enforced by consumers; the store accepts applications either way.
    pub fn accepts_applications(&self) -> bool {
        self.is_open
    }

    pub fn is_owned_by(&self, user_id: &UserId) -> bool {
        &self.recruiter_id == user_id
    }

    /// Number of embedded applications (0 when not joined).
    pub fn applicant_count(&self) -> usize {
        self.applications.as_ref().map(Vec::len).unwrap_or(0)
    }
}

/// Id-only projection of a saved-job row embedded in a job read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedMarker {
    pub id: SavedJobId,
}

/// Job posting form.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewJob {
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,
    #[validate(length(min = 1, message = "Select a location"))]
    pub location: String,
    #[validate(length(min = 1, message = "Select or add a company"))]
    pub company_id: String,
    #[validate(length(min = 1, message = "Requirements are required"))]
    pub requirements: String,
}

impl NewJob {
    /// Validate the form and build the row to insert for `recruiter_id`.
    ///
    /// New postings always start open.
    pub fn into_insert(self, recruiter_id: &UserId) -> Result<JobInsert, InputError> {
        validate_input(&self)?;
        let company_id = CompanyId::parse(self.company_id)?;
        Ok(JobInsert {
            title: self.title,
            description: self.description,
            location: self.location,
            company_id,
            requirements: self.requirements,
            recruiter_id: recruiter_id.clone(),
            is_open: true,
        })
    }
}

/// Row body for inserting a job.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobInsert {
    pub title: String,
    pub description: String,
    pub location: String,
    pub company_id: CompanyId,
    pub requirements: String,
    pub recruiter_id: UserId,
    #[serde(rename = "isOpen")]
    pub is_open: bool,
}
