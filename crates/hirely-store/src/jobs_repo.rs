//! Job repository.

use serde::Serialize;
use tracing::info;

use hirely_models::{Job, JobFilter, JobId, JobInsert, UserId};

use crate::client::StoreClient;
use crate::credential::Credential;
use crate::error::{StoreError, StoreResult};
use crate::query::Query;

const COLLECTION: &str = "jobs";

/// Listing shape: saved markers plus company name and logo. The markers are
/// narrowed to the viewer by an embedded filter on `saved_jobs.user_id`.
pub(crate) const LIST_SELECT: &str = "*, saved_jobs(id), company: companies(name,logo_url)";
const DETAIL_SELECT: &str = "*, company: companies(name,logo_url), applications: applications(*)";
const OWNER_SELECT: &str = "*, company: companies(name,logo_url)";

#[derive(Serialize)]
struct HiringStatusPatch {
    #[serde(rename = "isOpen")]
    is_open: bool,
}

/// Jobs as seen by one signed-in user.
pub struct JobRepository {
    client: StoreClient,
    credential: Credential,
    user_id: UserId,
}

impl JobRepository {
    pub fn new(client: StoreClient, credential: Credential, user_id: UserId) -> Self {
        Self {
            client,
            credential,
            user_id,
        }
    }

    /// Open listing. Blank filter values impose no constraint.
    pub async fn list(&self, filter: &JobFilter) -> StoreResult<Vec<Job>> {
        let mut query = Query::new()
            .select(LIST_SELECT)
            .eq("saved_jobs.user_id", &self.user_id);
        if let Some(location) = filter.location() {
            query = query.eq("location", location);
        }
        if let Some(company_id) = filter.company_id() {
            query = query.eq("company_id", company_id);
        }
        if let Some(search) = filter.search() {
            query = query.ilike_contains("title", search);
        }

        let mut jobs: Vec<Job> = self.client.select(&self.credential, COLLECTION, &query).await?;
        // `*` can only be sent as a wildcard
        if filter.search().is_some_and(|s| s.contains('*')) {
            jobs.retain(|job| filter.matches(job));
        }
        Ok(jobs)
    }

    pub async fn get(&self, job_id: &JobId) -> StoreResult<Option<Job>> {
        let query = Query::new().select(DETAIL_SELECT).eq("id", job_id);
        let rows: Vec<Job> = self.client.select(&self.credential, COLLECTION, &query).await?;
        Ok(rows.into_iter().next())
    }

    pub async fn list_by_recruiter(&self, recruiter_id: &UserId) -> StoreResult<Vec<Job>> {
        let query = Query::new()
            .select(OWNER_SELECT)
            .eq("recruiter_id", recruiter_id);
        self.client.select(&self.credential, COLLECTION, &query).await
    }

    pub async fn create(&self, job: &JobInsert) -> StoreResult<Job> {
        let rows: Vec<Job> = self
            .client
            .insert(&self.credential, COLLECTION, std::slice::from_ref(job), &Query::new())
            .await?;

        let created = rows
            .into_iter()
            .next()
            .ok_or_else(|| StoreError::invalid_response("insert returned no job"))?;
        info!(job_id = %created.id, recruiter_id = %created.recruiter_id, "Job posted");
        Ok(created)
    }

    /// Flip `isOpen` and nothing else.
    pub async fn update_hiring_status(&self, job_id: &JobId, is_open: bool) -> StoreResult<Vec<Job>> {
        let query = Query::new().eq("id", job_id);
        let rows: Vec<Job> = self
            .client
            .update(&self.credential, COLLECTION, &query, &HiringStatusPatch { is_open })
            .await?;
        info!(job_id = %job_id, is_open, updated = rows.len(), "Hiring status updated");
        Ok(rows)
    }

    pub async fn delete(&self, job_id: &JobId) -> StoreResult<Vec<Job>> {
        let query = Query::new().eq("id", job_id);
        let rows: Vec<Job> = self.client.delete(&self.credential, COLLECTION, &query).await?;
        info!(job_id = %job_id, deleted = rows.len(), "Job deleted");
        Ok(rows)
    }
}
