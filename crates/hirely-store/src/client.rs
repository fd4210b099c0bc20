//! PostgREST client.
//!
//! Every call carries the caller's [`Credential`]; row-level policies in the
//! store decide what that credential may read or write.

use std::sync::Arc;
use std::time::{Duration, Instant};

use reqwest::header::RETRY_AFTER;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info_span, Instrument};

use crate::credential::Credential;
use crate::error::{StoreError, StoreResult};
use crate::metrics::record_request;
use crate::query::Query;
use crate::retry::{env_or, with_retry, RetryConfig};

const PREFER_REPRESENTATION: &str = "return=representation";
const PREFER_IGNORE_DUPLICATES: &str = "resolution=ignore-duplicates,return=representation";

// =============================================================================
// Configuration
// =============================================================================

#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Project URL, without the `/rest/v1` suffix.
    pub base_url: String,
    /// Public (anon) API key.
    pub api_key: String,
    pub timeout: Duration,
    pub connect_timeout: Duration,
    pub retry: RetryConfig,
}

impl StoreConfig {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(5),
            retry: RetryConfig::default(),
        }
    }

    pub fn from_env() -> StoreResult<Self> {
        let base_url = required_env("STORE_URL")?;
        let api_key = required_env("STORE_API_KEY")?;

        let mut config = Self::new(base_url, api_key);
        config.timeout = Duration::from_secs(env_or("STORE_TIMEOUT_SECS", 30));
        config.connect_timeout = Duration::from_secs(env_or("STORE_CONNECT_TIMEOUT_SECS", 5));
        config.retry = RetryConfig::from_env();
        Ok(config)
    }
}

fn required_env(key: &str) -> StoreResult<String> {
    match std::env::var(key) {
        Ok(v) if !v.trim().is_empty() => Ok(v.trim().to_string()),
        Ok(_) => Err(StoreError::config(format!("{} cannot be empty", key))),
        Err(_) => Err(StoreError::config(format!("{} must be set", key))),
    }
}

// =============================================================================
// Client
// =============================================================================

#[derive(Clone)]
pub struct StoreClient {
    http: Client,
    config: Arc<StoreConfig>,
    rest_url: String,
}

impl StoreClient {
    pub fn new(config: StoreConfig) -> StoreResult<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .pool_idle_timeout(Duration::from_secs(90))
            .pool_max_idle_per_host(10)
            .user_agent(concat!("hirely-store/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(StoreError::Network)?;

        let rest_url = format!("{}/rest/v1", config.base_url);

        Ok(Self {
            http,
            config: Arc::new(config),
            rest_url,
        })
    }

    pub fn from_env() -> StoreResult<Self> {
        Self::new(StoreConfig::from_env()?)
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    fn collection_url(&self, collection: &str) -> String {
        format!("{}/{}", self.rest_url, collection)
    }

    fn authorize(&self, request: RequestBuilder, credential: &Credential) -> RequestBuilder {
        let bearer = credential.user_token().unwrap_or(self.config.api_key.as_str());
        request
            .header("apikey", &self.config.api_key)
            .bearer_auth(bearer)
    }

    // =========================================================================
    // Operations
    // =========================================================================

    /// Filtered read.
    pub async fn select<T: DeserializeOwned>(
        &self,
        credential: &Credential,
        collection: &str,
        query: &Query,
    ) -> StoreResult<Vec<T>> {
        let url = self.collection_url(collection);
        let params = query.to_params();

        self.execute_request("select", collection, true, || {
            self.authorize(self.http.get(&url), credential)
                .query(&params)
        })
        .await
    }

    /// Insert returning the created rows. Sent exactly once.
    pub async fn insert<B, T>(
        &self,
        credential: &Credential,
        collection: &str,
        rows: &B,
        query: &Query,
    ) -> StoreResult<Vec<T>>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let url = self.collection_url(collection);
        let params = query.to_params();

        self.execute_request("insert", collection, false, || {
            self.authorize(self.http.post(&url), credential)
                .query(&params)
                .header("Prefer", PREFER_REPRESENTATION)
                .json(rows)
        })
        .await
    }

    /// Insert that silently skips rows conflicting on `on_conflict`.
    ///
    /// Returns only rows that were actually inserted, so an empty result
    /// means the row already existed.
    pub async fn insert_ignore_duplicates<B, T>(
        &self,
        credential: &Credential,
        collection: &str,
        rows: &B,
        on_conflict: &str,
    ) -> StoreResult<Vec<T>>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let url = self.collection_url(collection);

        self.execute_request("upsert", collection, true, || {
            self.authorize(self.http.post(&url), credential)
                .query(&[("on_conflict", on_conflict)])
                .header("Prefer", PREFER_IGNORE_DUPLICATES)
                .json(rows)
        })
        .await
    }

    /// Keyed update returning the changed rows.
    pub async fn update<B, T>(
        &self,
        credential: &Credential,
        collection: &str,
        query: &Query,
        patch: &B,
    ) -> StoreResult<Vec<T>>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        if !query.has_filters() {
            return Err(StoreError::Unfiltered("update"));
        }
        let url = self.collection_url(collection);
        let params = query.to_params();

        self.execute_request("update", collection, true, || {
            self.authorize(self.http.patch(&url), credential)
                .query(&params)
                .header("Prefer", PREFER_REPRESENTATION)
                .json(patch)
        })
        .await
    }

    /// Keyed delete returning the removed rows.
    pub async fn delete<T: DeserializeOwned>(
        &self,
        credential: &Credential,
        collection: &str,
        query: &Query,
    ) -> StoreResult<Vec<T>> {
        self.keyed_delete(credential, collection, query, true).await
    }

    /// Keyed delete sent exactly once.
    ///
    /// For callers that branch on which rows were removed: a retry after a
    /// lost response would report nothing removed.
    pub async fn delete_once<T: DeserializeOwned>(
        &self,
        credential: &Credential,
        collection: &str,
        query: &Query,
    ) -> StoreResult<Vec<T>> {
        self.keyed_delete(credential, collection, query, false).await
    }

    async fn keyed_delete<T: DeserializeOwned>(
        &self,
        credential: &Credential,
        collection: &str,
        query: &Query,
        retry: bool,
    ) -> StoreResult<Vec<T>> {
        if !query.has_filters() {
            return Err(StoreError::Unfiltered("delete"));
        }
        let url = self.collection_url(collection);
        let params = query.to_params();

        self.execute_request("delete", collection, retry, || {
            self.authorize(self.http.delete(&url), credential)
                .query(&params)
                .header("Prefer", PREFER_REPRESENTATION)
        })
        .await
    }

    // =========================================================================
    // Plumbing
    // =========================================================================

    async fn execute_request<T, F>(
        &self,
        operation: &'static str,
        collection: &str,
        idempotent: bool,
        build: F,
    ) -> StoreResult<Vec<T>>
    where
        T: DeserializeOwned,
        F: Fn() -> RequestBuilder,
    {
        let span = info_span!("store_request", operation = %operation, collection = %collection);

        let build = &build;
        let send = move || async move { Self::read_rows::<T>(build().send().await?).await };

        let start = Instant::now();
        let result = async {
            if idempotent {
                with_retry(&self.config.retry, operation, send).await
            } else {
                send().await
            }
        }
        .instrument(span)
        .await;

        let status = match &result {
            Ok(_) => 200,
            Err(e) => e.http_status().unwrap_or(500),
        };
        record_request(operation, collection, status, start.elapsed().as_secs_f64());

        result
    }

    async fn read_rows<T: DeserializeOwned>(response: Response) -> StoreResult<Vec<T>> {
        if !response.status().is_success() {
            return Err(Self::handle_error_response(response).await);
        }

        let body = response.text().await?;
        if body.trim().is_empty() {
            return Ok(Vec::new());
        }
        serde_json::from_str(&body)
            .map_err(|e| StoreError::invalid_response(format!("unexpected row shape: {}", e)))
    }

    async fn handle_error_response(response: Response) -> StoreError {
        let status = response.status().as_u16();
        let retry_after = response
            .headers()
            .get(RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u64>().ok());
        let body = response.text().await.unwrap_or_default();
        debug!(status, body = %body, "Store request rejected");
        StoreError::from_response(status, &body, retry_after)
    }
}
