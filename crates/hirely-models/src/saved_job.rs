//! Saved-job bookmarks.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{JobId, SavedJobId, UserId};
use crate::job::Job;

/// Bookmark row joining a user and a job. Unique per (user, job).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedJob {
    pub id: SavedJobId,
    pub user_id: UserId,
    pub job_id: JobId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// Embedded `jobs(*, companies(name, logo_url))`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job: Option<Job>,
}

/// Row body for inserting a bookmark.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SavedJobInsert {
    pub user_id: UserId,
    pub job_id: JobId,
}

/// Result of toggling a bookmark.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SaveOutcome {
    Saved { saved: SavedJob },
    Unsaved { job_id: JobId },
}

impl SaveOutcome {
    pub fn is_saved(&self) -> bool {
        matches!(self, SaveOutcome::Saved { .. })
    }
}
