use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use crate::error::{Result, VidbriefError};

/// Fallback-path video retrieval seam.
#[async_trait]
pub trait VideoDownloader: Send + Sync {
    /// Fetch the video at `url` into `work_dir`, returning the file path.
    async fn download(&self, url: &str, work_dir: &Path) -> Result<PathBuf>;
}

/// Downloads via the external `yt-dlp` binary.
pub struct YtDlpDownloader;

#[async_trait]
impl VideoDownloader for YtDlpDownloader {
    async fn download(&self, url: &str, work_dir: &Path) -> Result<PathBuf> {
        let output_template = work_dir.join("video.%(ext)s");
        debug!(url, "invoking yt-dlp");

        let output = Command::new("yt-dlp")
            .arg(url)
            .arg("--print")
            .arg("after_move:filepath")
            .arg("--extractor-args")
            .arg("youtube:player_client=android,web")
            .arg("-f")
            .arg("mp4")
            .arg("-o")
            .arg(&output_template)
            .output()
            .await?;

        // A failed download is terminal; there is no cheaper path left.
        if !output.status.success() {
            return Err(VidbriefError::DownloadFailed {
                url: url.to_string(),
                reason: String::from_utf8_lossy(&output.stderr).to_string(),
            });
        }

        let stdout_str = String::from_utf8_lossy(output.stdout.as_slice());
        let filepath = stdout_str.trim();
        if filepath.is_empty() {
            return Err(VidbriefError::DownloadFailed {
                url: url.to_string(),
                reason: "yt-dlp reported no output file".to_string(),
            });
        }

        Ok(PathBuf::from(filepath))
    }
}
