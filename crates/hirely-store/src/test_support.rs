//! Shared fixtures for store tests.

use std::time::Duration;

use serde_json::{json, Value};

use crate::client::{StoreClient, StoreConfig};
use crate::retry::RetryConfig;

/// JWT-shaped bearer; the store client forwards it as-is.
pub const USER_TOKEN: &str = "eyJhbGciOiJIUzI1NiJ9.eyJzdWIiOiJ1c2VyXzEifQ.c2ln";
pub const ANON_KEY: &str = "anon-key";

pub fn test_config(base_url: &str) -> StoreConfig {
    let mut config = StoreConfig::new(base_url, ANON_KEY);
    config.timeout = Duration::from_secs(5);
    config.connect_timeout = Duration::from_secs(2);
    config.retry = RetryConfig {
        max_retries: 2,
        base_delay_ms: 1,
        max_delay_ms: 5,
    };
    config
}

pub fn test_client(base_url: &str) -> StoreClient {
    StoreClient::new(test_config(base_url)).unwrap()
}

pub fn job_row(id: u32, is_open: bool) -> Value {
    json!({
        "id": id,
        "title": "Backend Engineer",
        "description": "Build APIs",
        "location": "Karnataka",
        "company_id": 42,
        "requirements": "- Rust",
        "recruiter_id": "user_recruiter",
        "isOpen": is_open,
        "created_at": "2024-05-01T10:00:00Z",
        "company": { "name": "Acme", "logo_url": "https://cdn/acme.png" }
    })
}

pub fn application_row(id: u32, status: &str) -> Value {
    json!({
        "id": id,
        "job_id": 1,
        "candidate_id": "user_candidate",
        "name": "Asha",
        "experience": 3,
        "education": "Graduate",
        "skills": "Rust, SQL",
        "resume": "https://store/resume-1-user_candidate",
        "status": status,
        "created_at": "2024-05-02T09:30:00Z"
    })
}
