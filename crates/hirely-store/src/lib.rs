//! REST client for the hosted relational store.
//!
//! This crate provides:
//! - A PostgREST client with per-call bearer credentials
//! - A small query builder for filters and joined selects
//! - Typed repositories for jobs, companies, applications and saved jobs
//! - Retry with backoff for idempotent calls, plus request metrics

pub mod applications_repo;
pub mod client;
pub mod companies_repo;
pub mod credential;
pub mod error;
pub mod jobs_repo;
mod metrics;
pub mod query;
mod retry;
pub mod saved_jobs_repo;

#[cfg(test)]
mod test_support;

pub use applications_repo::ApplicationRepository;
pub use client::{StoreClient, StoreConfig};
pub use companies_repo::CompanyRepository;
pub use credential::Credential;
pub use error::{StoreError, StoreResult};
pub use jobs_repo::JobRepository;
pub use query::Query;
pub use retry::RetryConfig;
pub use saved_jobs_repo::SavedJobRepository;
