use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum VidbriefError {
    /// Recoverable: the orchestrator falls back to download + upload.
    #[error("No usable transcript for video {video_id}: {reason}")]
    TranscriptUnavailable { video_id: String, reason: String },

    #[error("Could not extract a video id from {url}")]
    InvalidVideoId { url: String },

    #[error("Transcript client init failed: {reason}")]
    TranscriptClientInit { reason: String },

    #[error("Local file not found: {path}")]
    InvalidLocalPath { path: PathBuf },

    #[error("Download failed for {url}: {reason}")]
    DownloadFailed { url: String, reason: String },

    #[error("Upload failed for {path}: {reason}")]
    UploadFailed { path: PathBuf, reason: String },

    #[error("Remote asset {name} entered FAILED state")]
    AssetFailed { name: String },

    #[error("Asset {name} not ready after {waited:?}")]
    PollTimeout { name: String, waited: Duration },

    #[error("Summarization failed: {reason}")]
    CompletionFailed { reason: String },

    #[error("Missing API key: {env_var} environment variable is not set")]
    MissingApiKey { env_var: String },

    #[error("PDF rendering failed: {reason}")]
    PdfFailed { reason: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),
}

impl VidbriefError {
    /// Only failures on the transcript path trigger the download fallback;
    /// every other failure is terminal and surfaces to the caller as-is.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            VidbriefError::TranscriptUnavailable { .. } | VidbriefError::InvalidVideoId { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, VidbriefError>;
