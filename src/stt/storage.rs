use async_trait::async_trait;
use tracing::info;

use crate::error::PipelineError;

/// Durable object store the normalized audio is uploaded to.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Upload a byte stream into the bucket under the given object name.
    /// Returns the storage URI the object is addressed by afterwards.
    async fn upload(
        &self,
        bucket: &str,
        object_name: &str,
        bytes: Vec<u8>,
    ) -> Result<String, PipelineError>;
}

/// Google Cloud Storage JSON API upload endpoint.
const GCS_UPLOAD_URL: &str = "https://storage.googleapis.com/upload/storage/v1";

/// Object store backed by Google Cloud Storage.
pub struct GcsObjectStore {
    http: reqwest::Client,
    api_token: String,
    base_url: String,
}

impl GcsObjectStore {
    pub fn new(api_token: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_token: api_token.into(),
            base_url: GCS_UPLOAD_URL.to_string(),
        }
    }
}

#[async_trait]
impl ObjectStore for GcsObjectStore {
    async fn upload(
        &self,
        bucket: &str,
        object_name: &str,
        bytes: Vec<u8>,
    ) -> Result<String, PipelineError> {
        let url = format!(
            "{}/b/{}/o?uploadType=media&name={}",
            self.base_url, bucket, object_name
        );
        let size = bytes.len();

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_token)
            .header(reqwest::header::CONTENT_TYPE, "audio/wav")
            .body(bytes)
            .send()
            .await
            .map_err(|e| PipelineError::Upload(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(PipelineError::Upload(format!("HTTP {}: {}", status, body)));
        }

        info!("Uploaded {} bytes to gs://{}/{}", size, bucket, object_name);

        Ok(format!("gs://{}/{}", bucket, object_name))
    }
}
