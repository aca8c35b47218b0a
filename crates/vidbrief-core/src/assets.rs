use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tokio::time::sleep;
use tracing::debug;

use crate::config::PipelineConfig;
use crate::error::{Result, VidbriefError};

/// Lifecycle state of a file in the remote asset store. The store owns the
/// lifecycle; we only ever read it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum AssetState {
    #[serde(rename = "PROCESSING", alias = "PENDING", alias = "STATE_UNSPECIFIED")]
    Pending,
    #[serde(rename = "ACTIVE")]
    Active,
    #[serde(rename = "FAILED")]
    Failed,
}

/// Opaque handle to an uploaded file, as returned by the asset store.
#[derive(Debug, Clone, Deserialize)]
pub struct AssetHandle {
    pub name: String,
    #[serde(default)]
    pub uri: String,
    #[serde(rename = "mimeType", default = "default_mime")]
    pub mime_type: String,
    pub state: AssetState,
}

fn default_mime() -> String {
    "video/mp4".to_string()
}

/// Upload-and-status seam for the remote file store.
#[async_trait]
pub trait AssetStore: Send + Sync {
    /// Submit a local file, returning its handle (usually still Pending).
    async fn upload(&self, path: &Path) -> Result<AssetHandle>;
    /// Re-query the current state of a previously uploaded asset.
    async fn get(&self, name: &str) -> Result<AssetHandle>;
}

/// Poll `store` until `handle` becomes Active.
///
/// A Failed state aborts immediately, and the wait budget bounds the loop;
/// polling never blocks forever.
pub async fn wait_until_active(
    store: &dyn AssetStore,
    handle: AssetHandle,
    poll_interval: Duration,
    poll_budget: Duration,
) -> Result<AssetHandle> {
    let mut current = handle;
    let mut waited = Duration::ZERO;

    loop {
        match current.state {
            AssetState::Active => return Ok(current),
            AssetState::Failed => {
                return Err(VidbriefError::AssetFailed { name: current.name });
            }
            AssetState::Pending => {
                if waited >= poll_budget {
                    return Err(VidbriefError::PollTimeout {
                        name: current.name,
                        waited,
                    });
                }
                debug!(name = %current.name, ?waited, "asset still pending");
                sleep(poll_interval).await;
                waited += poll_interval;
                current = store.get(&current.name).await?;
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    file: AssetHandle,
}

/// Asset store backed by the Gemini Files API.
pub struct GeminiFileStore {
    client: reqwest::Client,
    api_base: String,
    api_key: String,
}

impl GeminiFileStore {
    pub fn new(config: &PipelineConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_base: config.api_base.clone(),
            api_key: config.api_key.clone(),
        }
    }
}

#[async_trait]
impl AssetStore for GeminiFileStore {
    async fn upload(&self, path: &Path) -> Result<AssetHandle> {
        let bytes = tokio::fs::read(path).await?;
        debug!(path = %path.display(), size = bytes.len(), "uploading video");

        let display_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "video.mp4".to_string());

        let metadata = serde_json::json!({ "file": { "display_name": display_name } });
        let form = reqwest::multipart::Form::new()
            .part(
                "metadata",
                reqwest::multipart::Part::text(metadata.to_string())
                    .mime_str("application/json")
                    .map_err(VidbriefError::ApiError)?,
            )
            .part(
                "file",
                reqwest::multipart::Part::bytes(bytes)
                    .file_name(display_name)
                    .mime_str("video/mp4")
                    .map_err(VidbriefError::ApiError)?,
            );

        let response = self
            .client
            .post(format!("{}/upload/v1beta/files", self.api_base))
            .header("x-goog-api-key", &self.api_key)
            .multipart(form)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(VidbriefError::UploadFailed {
                path: path.to_path_buf(),
                reason: format!("{status}: {body}"),
            });
        }

        let uploaded: UploadResponse = response.json().await?;
        Ok(uploaded.file)
    }

    async fn get(&self, name: &str) -> Result<AssetHandle> {
        let response = self
            .client
            .get(format!("{}/v1beta/{}", self.api_base, name))
            .header("x-goog-api-key", &self.api_key)
            .send()
            .await?
            .error_for_status()?;

        Ok(response.json().await?)
    }
}
