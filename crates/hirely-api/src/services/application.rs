use std::sync::Arc;

use tracing::{info, info_span, warn, Instrument};

use hirely_models::{Application, JobId, NewApplication, Upload, UploadKind};
use hirely_storage::{resume_key, BlobStore};
use hirely_store::{ApplicationRepository, StoreClient};

use super::{check_all, ApplyError};
use crate::auth::Session;

/// Submits job applications: resume upload followed by the application row.
#[derive(Clone)]
pub struct ApplicationService {
    store: StoreClient,
    blobs: Arc<dyn BlobStore>,
}

impl ApplicationService {
    pub fn new(store: StoreClient, blobs: Arc<dyn BlobStore>) -> Self {
        Self { store, blobs }
    }

    /// Apply to `job_id` as the session's user.
    ///
    /// The resume type is checked before anything is uploaded. If the insert
    /// fails after the upload, the stored resume is not removed.
    pub async fn apply(
        &self,
        session: &Session,
        job_id: JobId,
        form: NewApplication,
        resume: Upload,
    ) -> Result<Application, ApplyError> {
        let span = info_span!("apply", job_id = %job_id, candidate_id = %session.user_id);

        async move {
            check_all([form.validate_form(), resume.validate(UploadKind::Resume)])?;

            let key = resume_key(&session.user_id);
            let stored = self.blobs.put(UploadKind::Resume, &key, &resume).await?;

            let row = form.into_insert(job_id, session.user_id.clone(), stored.public_url)?;
            let repo = ApplicationRepository::new(self.store.clone(), session.credential.clone());

            match repo.create(&row).await {
                Ok(application) => {
                    info!(application_id = %application.id, "Application submitted");
                    Ok(application)
                }
                Err(source) => {
                    warn!(key = %stored.key, "Application insert failed after resume upload");
                    Err(ApplyError::InsertFailed {
                        orphaned_key: stored.key,
                        source,
                    })
                }
            }
        }
        .instrument(span)
        .await
    }
}
