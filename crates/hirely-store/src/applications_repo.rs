//! Application repository.

use serde::Serialize;
use tracing::info;

use hirely_models::{Application, ApplicationId, ApplicationInsert, ApplicationStatus, JobId, UserId};

use crate::client::StoreClient;
use crate::credential::Credential;
use crate::error::{StoreError, StoreResult};
use crate::query::Query;

const COLLECTION: &str = "applications";
const CANDIDATE_SELECT: &str = "*, job: jobs(title, company: companies(name))";

#[derive(Serialize)]
struct StatusPatch {
    status: ApplicationStatus,
}

pub struct ApplicationRepository {
    client: StoreClient,
    credential: Credential,
}

impl ApplicationRepository {
    pub fn new(client: StoreClient, credential: Credential) -> Self {
        Self { client, credential }
    }

    pub async fn create(&self, application: &ApplicationInsert) -> StoreResult<Application> {
        let rows: Vec<Application> = self
            .client
            .insert(&self.credential, COLLECTION, std::slice::from_ref(application), &Query::new())
            .await?;
        rows.into_iter()
            .next()
            .ok_or_else(|| StoreError::invalid_response("insert returned no application"))
    }

    pub async fn get(&self, application_id: &ApplicationId) -> StoreResult<Option<Application>> {
        let query = Query::new().select("*").eq("id", application_id).limit(1);
        let rows: Vec<Application> = self.client.select(&self.credential, COLLECTION, &query).await?;
        Ok(rows.into_iter().next())
    }

    /// Set the status of one application. Other columns are untouched.
    pub async fn update_status(
        &self,
        application_id: &ApplicationId,
        status: ApplicationStatus,
    ) -> StoreResult<Application> {
        let query = Query::new().eq("id", application_id);
        let rows: Vec<Application> = self
            .client
            .update(&self.credential, COLLECTION, &query, &StatusPatch { status })
            .await?;

        let updated = rows
            .into_iter()
            .next()
            .ok_or_else(|| StoreError::not_found(format!("application {}", application_id)))?;
        info!(application_id = %application_id, status = %status, "Application status updated");
        Ok(updated)
    }

    /// A candidate's applications with job title and company name.
    pub async fn list_for_candidate(&self, candidate_id: &UserId) -> StoreResult<Vec<Application>> {
        let query = Query::new()
            .select(CANDIDATE_SELECT)
            .eq("candidate_id", candidate_id);
        self.client.select(&self.credential, COLLECTION, &query).await
    }

    pub async fn list_for_job(&self, job_id: &JobId) -> StoreResult<Vec<Application>> {
        let query = Query::new().select("*").eq("job_id", job_id);
        self.client.select(&self.credential, COLLECTION, &query).await
    }
}
