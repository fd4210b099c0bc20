use std::sync::Arc;

use tracing::{info, warn};

use hirely_models::{Company, NewCompany, Upload, UploadKind};
use hirely_storage::{logo_key, BlobStore};
use hirely_store::{CompanyRepository, StoreClient};

use super::{check_all, CreateCompanyError};
use crate::auth::Session;

/// Creates companies: logo upload followed by the company row.
#[derive(Clone)]
pub struct CompanyService {
    store: StoreClient,
    blobs: Arc<dyn BlobStore>,
}

impl CompanyService {
    pub fn new(store: StoreClient, blobs: Arc<dyn BlobStore>) -> Self {
        Self { store, blobs }
    }

    pub async fn create(
        &self,
        session: &Session,
        form: NewCompany,
        logo: Upload,
    ) -> Result<Company, CreateCompanyError> {
        check_all([form.validate_form(), logo.validate(UploadKind::Logo)])?;

        let key = logo_key(&form.name);
        let stored = self.blobs.put(UploadKind::Logo, &key, &logo).await?;

        let repo = CompanyRepository::new(self.store.clone(), session.credential.clone());
        match repo.create(&form.into_insert(stored.public_url)).await {
            Ok(company) => {
                info!(company_id = %company.id, name = %company.name, "Company created");
                Ok(company)
            }
            Err(source) => {
                warn!(key = %stored.key, "Company insert failed after logo upload");
                Err(CreateCompanyError::InsertFailed {
                    orphaned_key: stored.key,
                    source,
                })
            }
        }
    }
}
