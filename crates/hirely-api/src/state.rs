//! Application state.

use std::sync::Arc;

use hirely_storage::{BlobClient, BlobStore};
use hirely_store::{
    ApplicationRepository, CompanyRepository, JobRepository, SavedJobRepository, StoreClient,
};

use crate::auth::{AuthConfig, Session, SessionVerifier};
use crate::config::ApiConfig;
use crate::services::{ApplicationService, CompanyService};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: ApiConfig,
    pub store: StoreClient,
    pub sessions: Arc<SessionVerifier>,
    pub applications: ApplicationService,
    pub companies: CompanyService,
}

impl AppState {
    /// Create new application state from the environment.
    pub async fn new(config: ApiConfig) -> Result<Self, Box<dyn std::error::Error>> {
        let store = StoreClient::from_env()?;
        let blobs = BlobClient::from_env()?;
        let sessions = SessionVerifier::new(AuthConfig::from_env()?)?;

        Ok(Self::from_parts(config, store, Arc::new(blobs), sessions))
    }

    pub fn from_parts(
        config: ApiConfig,
        store: StoreClient,
        blobs: Arc<dyn BlobStore>,
        sessions: SessionVerifier,
    ) -> Self {
        let applications = ApplicationService::new(store.clone(), Arc::clone(&blobs));
        let companies = CompanyService::new(store.clone(), Arc::clone(&blobs));

        Self {
            config,
            store,
            sessions: Arc::new(sessions),
            applications,
            companies,
        }
    }

    pub fn jobs(&self, session: &Session) -> JobRepository {
        JobRepository::new(
            self.store.clone(),
            session.credential.clone(),
            session.user_id.clone(),
        )
    }

    pub fn saved_jobs(&self, session: &Session) -> SavedJobRepository {
        SavedJobRepository::new(
            self.store.clone(),
            session.credential.clone(),
            session.user_id.clone(),
        )
    }

    pub fn application_records(&self, session: &Session) -> ApplicationRepository {
        ApplicationRepository::new(self.store.clone(), session.credential.clone())
    }

    pub fn company_records(&self, session: &Session) -> CompanyRepository {
        CompanyRepository::new(self.store.clone(), session.credential.clone())
    }
}
