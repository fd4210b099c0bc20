//! Axum HTTP API for the Hirely job board.
//!
//! This crate provides:
//! - REST endpoints over jobs, companies, applications and saved jobs
//! - Bearer JWT session verification with role resolution
//! - The route access guard shared by the web client and the handlers
//! - Security headers, request IDs and Prometheus metrics

pub mod auth;
pub mod config;
pub mod error;
pub mod forms;
pub mod guard;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod routes;
pub mod services;
pub mod state;

pub use auth::{AuthConfig, Session, SessionVerifier};
pub use config::ApiConfig;
pub use error::{ApiError, ApiResult};
pub use guard::{AppRoute, GuardDecision, GuardPolicy, SessionState};
pub use routes::create_router;
pub use services::{
    ApplicationService, ApplyError, CompanyService, CreateCompanyError, StagedWriteError,
};
pub use state::AppState;
