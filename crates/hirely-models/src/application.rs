//! Job application records.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::company::CompanySummary;
use crate::ids::{ApplicationId, JobId, UserId};
use crate::validation::{validate_input, InputError};

/// Hiring pipeline status of an application.
///
/// Recruiters may move an application between any two statuses; there is no
/// enforced ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    #[default]
    Applied,
    Interviewing,
    Hired,
    Rejected,
}

impl ApplicationStatus {
    pub const ALL: [ApplicationStatus; 4] = [
        ApplicationStatus::Applied,
        ApplicationStatus::Interviewing,
        ApplicationStatus::Hired,
        ApplicationStatus::Rejected,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Applied => "applied",
            ApplicationStatus::Interviewing => "interviewing",
            ApplicationStatus::Hired => "hired",
            ApplicationStatus::Rejected => "rejected",
        }
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ApplicationStatus {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ApplicationStatus::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| InputError::field("status", format!("unknown status '{}'", s)))
    }
}

/// Highest completed education level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Education {
    Intermediate,
    Graduate,
    #[serde(rename = "Post Graduate")]
    PostGraduate,
}

/// An application as stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Application {
    pub id: ApplicationId,
    pub job_id: JobId,
    pub candidate_id: UserId,
    pub name: String,
    /// Years of experience.
    pub experience: u32,
    pub education: Education,
    /// Comma separated.
    pub skills: String,
    /// Public URL of the uploaded resume.
    pub resume: String,
    #[serde(default)]
    pub status: ApplicationStatus,
    pub created_at: DateTime<Utc>,

    /// Embedded `jobs(title, companies(name))` on candidate reads.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job: Option<ApplicationJobSummary>,
}

impl Application {
    /// Skills split on commas, trimmed and lowercased.
    pub fn skill_list(&self) -> impl Iterator<Item = String> + '_ {
        self.skills
            .split(',')
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationJobSummary {
    pub title: String,
    #[serde(default)]
    pub company: Option<CompanySummary>,
}

/// Application form; the resume travels separately as an upload.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewApplication {
    #[validate(length(min = 1, message = "Full name is required"))]
    pub name: String,
    #[validate(range(min = 0, message = "Experience must be at least 0"))]
    pub experience: i32,
    #[validate(length(min = 1, message = "Skills are required"))]
    pub skills: String,
    pub education: Education,
}

impl NewApplication {
    pub fn validate_form(&self) -> Result<(), InputError> {
        validate_input(self)
    }

    /// Row to insert once the resume has been stored at `resume_url`.
    pub fn into_insert(
        self,
        job_id: JobId,
        candidate_id: UserId,
        resume_url: impl Into<String>,
    ) -> Result<ApplicationInsert, InputError> {
        self.validate_form()?;
        Ok(ApplicationInsert {
            job_id,
            candidate_id,
            name: self.name,
            experience: self.experience.max(0) as u32,
            skills: self.skills,
            education: self.education,
            resume: resume_url.into(),
            status: ApplicationStatus::Applied,
        })
    }
}

/// Row body for inserting an application.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApplicationInsert {
    pub job_id: JobId,
    pub candidate_id: UserId,
    pub name: String,
    pub experience: u32,
    pub skills: String,
    pub education: Education,
    pub resume: String,
    pub status: ApplicationStatus,
}
