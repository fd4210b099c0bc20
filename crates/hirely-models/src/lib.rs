//! Shared data models for the Hirely job board.
//!
//! This crate provides Serde-serializable types for:
//! - Jobs, companies, applications and saved-job bookmarks
//! - Typed identifiers and input payload validation
//! - Upload MIME-type rules for resumes and logos
//! - Job listing filters
//! - Per-job applicant analytics
//! - User roles resolved from identity metadata

pub mod analytics;
pub mod application;
pub mod company;
pub mod filter;
pub mod ids;
pub mod job;
pub mod role;
pub mod saved_job;
pub mod upload;
pub mod validation;

// Re-export common types
pub use analytics::{JobAnalytics, EXPERIENCE_BUCKETS, TOP_SKILLS_LIMIT};
pub use application::{
    Application, ApplicationInsert, ApplicationJobSummary, ApplicationStatus, Education,
    NewApplication,
};
pub use company::{Company, CompanyInsert, CompanySummary, NewCompany};
pub use filter::JobFilter;
pub use ids::{ApplicationId, CompanyId, JobId, SavedJobId, UserId};
pub use job::{Job, JobInsert, NewJob, SavedMarker};
pub use role::{resolve_role, UnknownRole, UserRole};
pub use saved_job::{SaveOutcome, SavedJob, SavedJobInsert};
pub use upload::{Upload, UploadKind};
pub use validation::{validate_input, InputError};
