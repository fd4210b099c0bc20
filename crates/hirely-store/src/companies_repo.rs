//! Company repository.

use tracing::info;

use hirely_models::{Company, CompanyInsert};

use crate::client::StoreClient;
use crate::credential::Credential;
use crate::error::{StoreError, StoreResult};
use crate::query::Query;

const COLLECTION: &str = "companies";

pub struct CompanyRepository {
    client: StoreClient,
    credential: Credential,
}

impl CompanyRepository {
    pub fn new(client: StoreClient, credential: Credential) -> Self {
        Self { client, credential }
    }

    pub async fn list(&self) -> StoreResult<Vec<Company>> {
        self.client
            .select(&self.credential, COLLECTION, &Query::new().select("*"))
            .await
    }

    pub async fn create(&self, company: &CompanyInsert) -> StoreResult<Company> {
        let rows: Vec<Company> = self
            .client
            .insert(&self.credential, COLLECTION, std::slice::from_ref(company), &Query::new().select("*"))
            .await?;
        let created = rows
            .into_iter()
            .next()
            .ok_or_else(|| StoreError::invalid_response("insert returned no company"))?;
        info!(company_id = %created.id, name = %created.name, "Company added");
        Ok(created)
    }
}
