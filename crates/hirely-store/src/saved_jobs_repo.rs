//! Saved-job bookmarks.
//!
//! A bookmark is unique per `(user_id, job_id)`. Both the toggle and the
//! explicit setter are built from single keyed statements, so concurrent
//! calls can never produce a duplicate row.

use tracing::info;

use hirely_models::{JobId, SaveOutcome, SavedJob, SavedJobInsert, UserId};

use crate::client::StoreClient;
use crate::credential::Credential;
use crate::error::{StoreError, StoreResult};
use crate::query::Query;

const COLLECTION: &str = "saved_jobs";
const ON_CONFLICT: &str = "user_id,job_id";
const LIST_SELECT: &str = "*, job: jobs(*, company: companies(name,logo_url))";

/// Bookmarks of one user.
#[derive(Clone)]
pub struct SavedJobRepository {
    client: StoreClient,
    credential: Credential,
    user_id: UserId,
}

impl SavedJobRepository {
    pub fn new(client: StoreClient, credential: Credential, user_id: UserId) -> Self {
        Self {
            client,
            credential,
            user_id,
        }
    }

    fn key(&self, job_id: &JobId) -> Query {
        Query::new()
            .eq("user_id", &self.user_id)
            .eq("job_id", job_id)
    }

    /// Saved jobs with the full job and its company embedded.
    pub async fn list(&self) -> StoreResult<Vec<SavedJob>> {
        let query = Query::new()
            .select(LIST_SELECT)
            .eq("user_id", &self.user_id);
        self.client.select(&self.credential, COLLECTION, &query).await
    }

    /// Flip the bookmark.
    ///
    /// Deletes the `(user, job)` row first; if nothing was deleted the job
    /// was not saved, so it is inserted with duplicates ignored. The delete
    /// is sent once.
    pub async fn toggle(&self, job_id: &JobId) -> StoreResult<SaveOutcome> {
        let removed: Vec<SavedJob> = self
            .client
            .delete_once(&self.credential, COLLECTION, &self.key(job_id))
            .await?;

        if !removed.is_empty() {
            info!(user_id = %self.user_id, job_id = %job_id, "Job unsaved");
            return Ok(SaveOutcome::Unsaved {
                job_id: job_id.clone(),
            });
        }

        let saved = self.insert_once(job_id).await?;
        info!(user_id = %self.user_id, job_id = %job_id, "Job saved");
        Ok(SaveOutcome::Saved { saved })
    }

    /// Idempotent save or unsave.
    pub async fn set_saved(&self, job_id: &JobId, saved: bool) -> StoreResult<SaveOutcome> {
        if saved {
            let saved = self.insert_once(job_id).await?;
            Ok(SaveOutcome::Saved { saved })
        } else {
            let _: Vec<SavedJob> = self
                .client
                .delete(&self.credential, COLLECTION, &self.key(job_id))
                .await?;
            Ok(SaveOutcome::Unsaved {
                job_id: job_id.clone(),
            })
        }
    }

    /// Insert ignoring duplicates; when a concurrent insert won, read its row.
    async fn insert_once(&self, job_id: &JobId) -> StoreResult<SavedJob> {
        let row = SavedJobInsert {
            user_id: self.user_id.clone(),
            job_id: job_id.clone(),
        };
        let inserted: Vec<SavedJob> = self
            .client
            .insert_ignore_duplicates(&self.credential, COLLECTION, std::slice::from_ref(&row), ON_CONFLICT)
            .await?;

        if let Some(saved) = inserted.into_iter().next() {
            return Ok(saved);
        }

        let existing: Vec<SavedJob> = self
            .client
            .select(&self.credential, COLLECTION, &self.key(job_id).select("*"))
            .await?;
        existing
            .into_iter()
            .next()
            .ok_or_else(|| StoreError::not_found(format!("saved job {} for {}", job_id, self.user_id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{job_row, test_client, USER_TOKEN};
    use serde_json::{json, Value};
    use std::sync::{Arc, Mutex};
    use wiremock::matchers::{headers, method, path, query_param};
    use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

    fn repo(server: &MockServer) -> SavedJobRepository {
        SavedJobRepository::new(
            test_client(&server.uri()),
            Credential::bearer(USER_TOKEN),
            UserId::parse("user_1").unwrap(),
        )
    }

    fn saved_row(id: u32) -> Value {
        json!({ "id": id, "user_id": "user_1", "job_id": 1, "created_at": "2024-05-01T10:00:00Z" })
    }

    /// In-memory `saved_jobs` table honoring the two statements the toggle issues.
    #[derive(Clone, Default)]
    struct SavedTable {
        rows: Arc<Mutex<Vec<Value>>>,
    }

    impl Respond for SavedTable {
        fn respond(&self, req: &Request) -> ResponseTemplate {
            let mut rows = self.rows.lock().unwrap();
            match req.method.to_string().as_str() {
                "DELETE" => {
                    let removed: Vec<Value> = rows.drain(..).collect();
                    ResponseTemplate::new(200).set_body_json(removed)
                }
                "POST" => {
                    if rows.is_empty() {
                        rows.push(saved_row(10));
                        ResponseTemplate::new(201).set_body_json(rows.clone())
                    } else {
                        ResponseTemplate::new(201).set_body_json(json!([]))
                    }
                }
                _ => ResponseTemplate::new(200).set_body_json(rows.clone()),
            }
        }
    }

    #[tokio::test]
    async fn test_toggle_twice_restores_original_state() {
        let server = MockServer::start().await;
        let table = SavedTable::default();
        Mock::given(path("/rest/v1/saved_jobs"))
            .and(query_param("user_id", "eq.user_1"))
            .respond_with(table.clone())
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/rest/v1/saved_jobs"))
            .and(query_param("on_conflict", "user_id,job_id"))
            .and(headers("prefer", vec!["resolution=ignore-duplicates", "return=representation"]))
            .respond_with(table.clone())
            .mount(&server)
            .await;

        let repo = repo(&server);
        let job_id = JobId::parse("1").unwrap();

        let first = repo.toggle(&job_id).await.unwrap();
        assert!(first.is_saved());
        assert_eq!(table.rows.lock().unwrap().len(), 1);

        let second = repo.toggle(&job_id).await.unwrap();
        assert_eq!(second, SaveOutcome::Unsaved { job_id: job_id.clone() });
        assert!(table.rows.lock().unwrap().is_empty());
    }

    /// Deletes rows, then answers as if the response was lost upstream.
    struct DeleteThenUnavailable(SavedTable);

    impl Respond for DeleteThenUnavailable {
        fn respond(&self, _req: &Request) -> ResponseTemplate {
            self.0.rows.lock().unwrap().clear();
            ResponseTemplate::new(503)
        }
    }

    #[tokio::test]
    async fn test_toggle_delete_is_not_retried() {
        let server = MockServer::start().await;
        let table = SavedTable::default();
        table.rows.lock().unwrap().push(saved_row(10));

        Mock::given(method("DELETE"))
            .and(path("/rest/v1/saved_jobs"))
            .respond_with(DeleteThenUnavailable(table.clone()))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/rest/v1/saved_jobs"))
            .respond_with(table.clone())
            .expect(0)
            .mount(&server)
            .await;

        let err = repo(&server)
            .toggle(&JobId::parse("1").unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::ServerError(503, _)));
        assert!(table.rows.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_set_saved_reads_existing_row_when_insert_ignored() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/rest/v1/saved_jobs"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!([])))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/saved_jobs"))
            .and(query_param("job_id", "eq.1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([saved_row(3)])))
            .mount(&server)
            .await;

        let outcome = repo(&server)
            .set_saved(&JobId::parse("1").unwrap(), true)
            .await
            .unwrap();
        match outcome {
            SaveOutcome::Saved { saved } => assert_eq!(saved.id.as_str(), "3"),
            other => panic!("expected saved, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_list_empty_then_one_joined_record() {
        let server = MockServer::start().await;
        let repo = repo(&server);

        Mock::given(method("GET"))
            .and(path("/rest/v1/saved_jobs"))
            .and(query_param("select", LIST_SELECT))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        assert!(repo.list().await.unwrap().is_empty());

        let mut row = saved_row(10);
        row["job"] = job_row(1, true);
        Mock::given(method("GET"))
            .and(path("/rest/v1/saved_jobs"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([row])))
            .mount(&server)
            .await;

        let saved = repo.list().await.unwrap();
        assert_eq!(saved.len(), 1);
        let job = saved[0].job.as_ref().unwrap();
        let company = job.company.as_ref().unwrap();
        assert_eq!(company.name, "Acme");
        assert_eq!(company.logo_url.as_deref(), Some("https://cdn/acme.png"));
    }
}
