//! Multi-step write services.
//!
//! Both services upload a file first and then insert the row that points at
//! it. There is no compensating delete: when the insert fails the object is
//! left behind and its key is reported in [`StagedWriteError::InsertFailed`].

mod application;
mod company;

use thiserror::Error;

use hirely_models::InputError;
use hirely_storage::StorageError;
use hirely_store::StoreError;

pub use application::ApplicationService;
pub use company::CompanyService;

/// Failure of an upload-then-insert write.
#[derive(Debug, Error)]
pub enum StagedWriteError {
    /// Rejected before anything was uploaded.
    #[error("Invalid input: {0}")]
    Invalid(#[from] InputError),

    #[error("Upload failed: {0}")]
    Upload(#[from] StorageError),

    #[error("Insert failed after upload, object {orphaned_key} left in place: {source}")]
    InsertFailed {
        orphaned_key: String,
        #[source]
        source: StoreError,
    },
}

/// Error of [`ApplicationService::apply`].
pub type ApplyError = StagedWriteError;

/// Error of [`CompanyService::create`].
pub type CreateCompanyError = StagedWriteError;

/// Merge form and file validation so both are reported together.
fn check_all(checks: impl IntoIterator<Item = Result<(), InputError>>) -> Result<(), InputError> {
    let mut errors = InputError::default();
    for check in checks {
        if let Err(e) = check {
            errors.merge(e);
        }
    }
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use hirely_models::{Upload, UploadKind};
    use hirely_storage::{BlobStore, StorageResult, StoredObject};

    /// In-memory blob store that records every key it was asked to write.
    #[derive(Default)]
    pub struct RecordingBlobs {
        pub keys: Mutex<Vec<String>>,
    }

    impl RecordingBlobs {
        pub fn stored(&self) -> Vec<String> {
            self.keys.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl BlobStore for RecordingBlobs {
        async fn put(&self, kind: UploadKind, key: &str, _upload: &Upload) -> StorageResult<StoredObject> {
            self.keys.lock().unwrap().push(key.to_string());
            let bucket = match kind {
                UploadKind::Resume => "resumes",
                UploadKind::Logo => "company-logo",
            };
            Ok(StoredObject {
                bucket: bucket.to_string(),
                key: key.to_string(),
                public_url: format!(
                    "https://store.test/storage/v1/object/public/{}/{}",
                    bucket, key
                ),
            })
        }
    }
}
