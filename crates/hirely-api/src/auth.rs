//! Bearer token verification and the per-request session.
//!
//! Tokens are verified either against the identity provider's JWKS (RS256)
//! or against a shared secret (HS256). The role is read from a metadata
//! claim at a configurable dotted path.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, Validation};
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use hirely_models::{resolve_role, UserId, UserRole};
use hirely_store::Credential;

use crate::error::{ApiError, ApiResult};
use crate::guard::{self, GuardDecision, GuardPolicy, SessionState};
use crate::state::AppState;

/// JWKS cache TTL.
const JWKS_CACHE_TTL: Duration = Duration::from_secs(3600); // 1 hour

/// Minimum gap between refreshes triggered by an unknown key ID.
const JWKS_MIN_REFRESH: Duration = Duration::from_secs(60);

const DEFAULT_ROLE_CLAIM: &str = "unsafe_metadata.role";

#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub jwks_url: Option<String>,
    pub jwt_secret: Option<String>,
    /// Expected `iss`, when set.
    pub issuer: Option<String>,
    /// Dotted path to the role inside the token claims.
    pub role_claim: String,
}

impl AuthConfig {
    pub fn from_env() -> ApiResult<Self> {
        let non_empty = |name: &str| std::env::var(name).ok().filter(|v| !v.trim().is_empty());

        let config = Self {
            jwks_url: non_empty("AUTH_JWKS_URL"),
            jwt_secret: non_empty("AUTH_JWT_SECRET"),
            issuer: non_empty("AUTH_ISSUER"),
            role_claim: non_empty("AUTH_ROLE_CLAIM").unwrap_or_else(|| DEFAULT_ROLE_CLAIM.to_string()),
        };

        if config.jwks_url.is_none() && config.jwt_secret.is_none() {
            return Err(ApiError::internal(
                "AUTH_JWKS_URL or AUTH_JWT_SECRET must be set",
            ));
        }
        Ok(config)
    }

    /// Shared-secret config, mostly for local development.
    pub fn with_secret(secret: impl Into<String>) -> Self {
        Self {
            jwks_url: None,
            jwt_secret: Some(secret.into()),
            issuer: None,
            role_claim: DEFAULT_ROLE_CLAIM.to_string(),
        }
    }
}

/// JWKS response from the identity provider.
#[derive(Debug, Deserialize)]
struct JwksResponse {
    keys: Vec<JwkKey>,
}

#[derive(Debug, Clone, Deserialize)]
struct JwkKey {
    kid: Option<String>,
    #[serde(default)]
    kty: Option<String>,
    n: Option<String>,
    e: Option<String>,
}

/// Cached JWKS keys.
pub struct JwksCache {
    http: Client,
    url: String,
    keys: RwLock<HashMap<String, DecodingKey>>,
    last_refresh: RwLock<Option<Instant>>,
}

impl JwksCache {
    pub fn new(url: impl Into<String>) -> ApiResult<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| ApiError::internal(format!("Failed to build JWKS client: {}", e)))?;

        Ok(Self {
            http,
            url: url.into(),
            keys: RwLock::new(HashMap::new()),
            last_refresh: RwLock::new(None),
        })
    }

    /// Refresh JWKS keys from the provider.
    async fn refresh_keys(&self) -> Result<usize, reqwest::Error> {
        debug!(url = %self.url, "Refreshing JWKS keys");

        // Recorded up front so a failing provider is not hit on every request.
        *self.last_refresh.write().await = Some(Instant::now());

        let jwks: JwksResponse = self
            .http
            .get(&self.url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let mut keys = HashMap::new();
        for jwk in jwks.keys {
            if jwk.kty.as_deref().is_some_and(|kty| kty != "RSA") {
                continue;
            }
            let (Some(kid), Some(n), Some(e)) = (jwk.kid, jwk.n, jwk.e) else {
                continue;
            };
            match DecodingKey::from_rsa_components(&n, &e) {
                Ok(key) => {
                    keys.insert(kid, key);
                }
                Err(err) => warn!(kid = %kid, "Skipping malformed JWK: {}", err),
            }
        }

        let key_count = keys.len();
        *self.keys.write().await = keys;

        debug!("Refreshed {} JWKS keys", key_count);
        Ok(key_count)
    }

    /// Get decoding key for a key ID.
    async fn get_key(&self, kid: &str) -> Option<DecodingKey> {
        let known = self.keys.read().await.contains_key(kid);
        let since_refresh = self.last_refresh.read().await.map(|t| t.elapsed());

        let needs_refresh = match since_refresh {
            None => true,
            Some(elapsed) if elapsed > JWKS_CACHE_TTL => true,
            Some(elapsed) => !known && elapsed > JWKS_MIN_REFRESH,
        };

        if needs_refresh {
            if let Err(e) = self.refresh_keys().await {
                warn!("Failed to refresh JWKS keys: {}", e);
            }
        }

        self.keys.read().await.get(kid).cloned()
    }
}

enum KeySource {
    Jwks(JwksCache),
    Shared(DecodingKey),
}

/// Turns bearer tokens into sessions.
pub struct SessionVerifier {
    keys: KeySource,
    issuer: Option<String>,
    role_claim: Vec<String>,
}

impl SessionVerifier {
    /// JWKS wins when both a JWKS URL and a secret are configured.
    pub fn new(config: AuthConfig) -> ApiResult<Self> {
        let keys = match (config.jwks_url, config.jwt_secret) {
            (Some(url), _) => KeySource::Jwks(JwksCache::new(url)?),
            (None, Some(secret)) => KeySource::Shared(DecodingKey::from_secret(secret.as_bytes())),
            (None, None) => return Err(ApiError::internal("No token verification key configured")),
        };

        Ok(Self {
            keys,
            issuer: config.issuer,
            role_claim: config.role_claim.split('.').map(str::to_string).collect(),
        })
    }

    pub async fn verify(&self, token: &str) -> ApiResult<Session> {
        let header = decode_header(token)
            .map_err(|e| ApiError::unauthorized(format!("Invalid token header: {}", e)))?;

        let (key, algorithm) = match &self.keys {
            KeySource::Shared(key) => (key.clone(), Algorithm::HS256),
            KeySource::Jwks(cache) => {
                let kid = header
                    .kid
                    .ok_or_else(|| ApiError::unauthorized("Token missing key ID"))?;
                let key = cache
                    .get_key(&kid)
                    .await
                    .ok_or_else(|| ApiError::unauthorized("Unknown key ID"))?;
                (key, Algorithm::RS256)
            }
        };

        let mut validation = Validation::new(algorithm);
        validation.validate_aud = false;
        if let Some(issuer) = &self.issuer {
            validation.set_issuer(&[issuer]);
        }

        let claims = decode::<Value>(token, &key, &validation)
            .map_err(|e| ApiError::unauthorized(format!("Token validation failed: {}", e)))?
            .claims;

        let user_id = claims
            .get("sub")
            .and_then(Value::as_str)
            .and_then(|sub| UserId::parse(sub).ok())
            .ok_or_else(|| ApiError::unauthorized("Token missing subject"))?;

        let role = resolve_role(claim_at(&claims, &self.role_claim));
        debug!(user_id = %user_id, role = ?role, "Verified session");

        Ok(Session {
            user_id,
            role,
            credential: Credential::bearer(token),
        })
    }
}

fn claim_at<'a>(claims: &'a Value, path: &[String]) -> Option<&'a Value> {
    path.iter().try_fold(claims, |value, key| value.get(key.as_str()))
}

/// Authenticated caller.
#[derive(Debug, Clone)]
pub struct Session {
    pub user_id: UserId,
    pub role: Option<UserRole>,
    /// The caller's own token, forwarded to the store.
    pub credential: Credential,
}

impl Session {
    pub fn state(&self) -> SessionState {
        SessionState::SignedIn { role: self.role }
    }

    /// Apply the role-required guard to an API call.
    pub fn require_role(&self) -> ApiResult<UserRole> {
        match (
            guard::evaluate(GuardPolicy::ROLE_REQUIRED, self.state(), ""),
            self.role,
        ) {
            (GuardDecision::Render, Some(role)) => Ok(role),
            _ => Err(ApiError::OnboardingRequired),
        }
    }

    pub fn require_recruiter(&self) -> ApiResult<()> {
        match self.require_role()? {
            UserRole::Recruiter => Ok(()),
            UserRole::Candidate => Err(ApiError::forbidden("Recruiter access required")),
        }
    }

    pub fn require_candidate(&self) -> ApiResult<()> {
        match self.require_role()? {
            UserRole::Candidate => Ok(()),
            UserRole::Recruiter => Err(ApiError::forbidden("Candidate access required")),
        }
    }
}

fn bearer_token(parts: &Parts) -> ApiResult<&str> {
    let auth_header = parts
        .headers
        .get("Authorization")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| ApiError::unauthorized("Missing Authorization header"))?;

    auth_header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ApiError::unauthorized("Invalid Authorization header format"))
}

/// Axum extractor for the authenticated session.
#[axum::async_trait]
impl FromRequestParts<AppState> for Session {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?;
        state.sessions.verify(token).await
    }
}
