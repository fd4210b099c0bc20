//! Object key generation.
//!
//! Keys carry a random number in `0..90000` so repeated uploads for the same
//! owner rarely collide. Collisions are possible and overwrite.

use hirely_models::UserId;

const RANDOM_UPPER: u32 = 90_000;

/// `resume-<random>-<candidate_id>`
pub fn resume_key(candidate_id: &UserId) -> String {
    format!("resume-{}-{}", rand::random_range(0..RANDOM_UPPER), candidate_id)
}

/// `logo-<random>-<sanitized company name>`
pub fn logo_key(company_name: &str) -> String {
    format!(
        "logo-{}-{}",
        rand::random_range(0..RANDOM_UPPER),
        sanitize(company_name)
    )
}

/// Lowercase alphanumerics with single dashes between words.
fn sanitize(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.trim().chars() {
        if c.is_ascii_alphanumeric() {
            out.push(c.to_ascii_lowercase());
        } else if !out.ends_with('-') && !out.is_empty() {
            out.push('-');
        }
    }
    let out = out.trim_end_matches('-');
    if out.is_empty() {
        "company".to_string()
    } else {
        out.to_string()
    }
}
