//! S3-compatible blob client.

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_credential_types::Credentials;
use aws_sdk_s3::config::{Builder, Region};
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use tracing::{debug, info};

use hirely_models::{Upload, UploadKind};

use crate::error::{StorageError, StorageResult};

#[derive(Debug, Clone)]
pub struct BlobConfig {
    /// S3 API endpoint of the hosted store.
    pub endpoint_url: String,
    pub access_key_id: String,
    pub secret_access_key: String,
    pub region: String,
    /// Project URL used to compose public object URLs.
    pub public_base_url: String,
    pub resume_bucket: String,
    pub logo_bucket: String,
}

fn required(key: &str) -> StorageResult<String> {
    std::env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| StorageError::config_error(format!("{} not set", key)))
}

impl BlobConfig {
    pub fn from_env() -> StorageResult<Self> {
        Ok(Self {
            endpoint_url: required("STORAGE_S3_ENDPOINT")?,
            access_key_id: required("STORAGE_ACCESS_KEY_ID")?,
            secret_access_key: required("STORAGE_SECRET_ACCESS_KEY")?,
            region: std::env::var("STORAGE_REGION").unwrap_or_else(|_| "auto".to_string()),
            public_base_url: required("STORE_URL")?.trim_end_matches('/').to_string(),
            resume_bucket: std::env::var("RESUME_BUCKET").unwrap_or_else(|_| "resumes".to_string()),
            logo_bucket: std::env::var("LOGO_BUCKET").unwrap_or_else(|_| "company-logo".to_string()),
        })
    }

    pub fn bucket(&self, kind: UploadKind) -> &str {
        match kind {
            UploadKind::Resume => &self.resume_bucket,
            UploadKind::Logo => &self.logo_bucket,
        }
    }

    /// `{base}/storage/v1/object/public/{bucket}/{key}`
    pub fn public_url(&self, bucket: &str, key: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{}/{}",
            self.public_base_url,
            bucket,
            urlencoding::encode(key)
        )
    }
}

/// An object written to storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub bucket: String,
    pub key: String,
    pub public_url: String,
}

/// Write-side storage seam used by the multi-step services.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Store `upload` under `key` in the bucket for `kind`.
    async fn put(&self, kind: UploadKind, key: &str, upload: &Upload) -> StorageResult<StoredObject>;
}

#[derive(Clone)]
pub struct BlobClient {
    client: Client,
    config: BlobConfig,
}

impl BlobClient {
    pub fn new(config: BlobConfig) -> Self {
        let credentials = Credentials::new(
            &config.access_key_id,
            &config.secret_access_key,
            None,
            None,
            "hirely-storage",
        );

        let sdk_config = Builder::new()
            .behavior_version(BehaviorVersion::latest())
            .endpoint_url(&config.endpoint_url)
            .region(Region::new(config.region.clone()))
            .credentials_provider(credentials)
            .force_path_style(true)
            .build();

        Self {
            client: Client::from_conf(sdk_config),
            config,
        }
    }

    pub fn from_env() -> StorageResult<Self> {
        Ok(Self::new(BlobConfig::from_env()?))
    }

    pub fn config(&self) -> &BlobConfig {
        &self.config
    }

    pub async fn upload_bytes(
        &self,
        bucket: &str,
        key: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> StorageResult<()> {
        debug!(bucket, key, bytes = data.len(), "Uploading object");

        self.client
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(ByteStream::from(data))
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| StorageError::upload_failed(format!("{}/{}: {}", bucket, key, e)))?;

        Ok(())
    }
}

#[async_trait]
impl BlobStore for BlobClient {
    async fn put(&self, kind: UploadKind, key: &str, upload: &Upload) -> StorageResult<StoredObject> {
        if key.is_empty() || key.starts_with('/') {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        let bucket = self.config.bucket(kind);

        self.upload_bytes(bucket, key, upload.bytes.clone(), &upload.content_type)
            .await?;
        info!(bucket, key, "Stored {}", kind.field());

        Ok(StoredObject {
            bucket: bucket.to_string(),
            key: key.to_string(),
            public_url: self.config.public_url(bucket, key),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn config() -> BlobConfig {
        BlobConfig {
            endpoint_url: "http://localhost:9000".into(),
            access_key_id: "key".into(),
            secret_access_key: "secret".into(),
            region: "auto".into(),
            public_base_url: "https://project.example.co".into(),
            resume_bucket: "resumes".into(),
            logo_bucket: "company-logo".into(),
        }
    }

    #[test]
    fn test_public_url() {
        assert_eq!(
            config().public_url("resumes", "resume-12-user_1"),
            "https://project.example.co/storage/v1/object/public/resumes/resume-12-user_1"
        );
    }

    #[test]
    fn test_bucket_per_kind() {
        let config = config();
        assert_eq!(config.bucket(UploadKind::Resume), "resumes");
        assert_eq!(config.bucket(UploadKind::Logo), "company-logo");
    }

    #[tokio::test]
    async fn test_put_rejects_invalid_key() {
        let client = BlobClient::new(config());
        let upload = Upload::new("cv.pdf", "application/pdf", vec![1]);
        let err = client.put(UploadKind::Resume, "", &upload).await.unwrap_err();
        assert!(matches!(err, StorageError::InvalidKey(_)));
    }

    #[test]
    #[serial]
    fn test_config_from_env_defaults_buckets() {
        std::env::set_var("STORAGE_S3_ENDPOINT", "http://localhost:9000");
        std::env::set_var("STORAGE_ACCESS_KEY_ID", "key");
        std::env::set_var("STORAGE_SECRET_ACCESS_KEY", "secret");
        std::env::set_var("STORE_URL", "https://project.example.co/");
        std::env::remove_var("RESUME_BUCKET");
        std::env::remove_var("LOGO_BUCKET");

        let config = BlobConfig::from_env().unwrap();
        assert_eq!(config.resume_bucket, "resumes");
        assert_eq!(config.logo_bucket, "company-logo");
        assert_eq!(config.public_base_url, "https://project.example.co");

        std::env::remove_var("STORAGE_S3_ENDPOINT");
        assert!(BlobConfig::from_env().is_err());
        std::env::remove_var("STORE_URL");
    }
}
