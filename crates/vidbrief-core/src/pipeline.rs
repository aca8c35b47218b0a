use std::path::Path;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::assets::{AssetStore, GeminiFileStore, wait_until_active};
use crate::config::PipelineConfig;
use crate::download::{VideoDownloader, YtDlpDownloader};
use crate::error::{Result, VidbriefError};
use crate::source::{VideoReference, classify, extract_video_id};
use crate::summarize::{Completions, GeminiCompletions};
use crate::transcript::{TranscriptSource, YoutubeTranscriptSource};

/// Which acquisition route produced the summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcquisitionPath {
    /// Low-cost: caption track fetched directly.
    Captions,
    /// Fallback: video downloaded (or local) and uploaded for inference.
    VideoUpload,
}

#[derive(Debug, Clone)]
pub struct Summary {
    pub text: String,
    pub path: AcquisitionPath,
}

/// Pipeline stage, reported to the caller as work progresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Classifying,
    AcquiringTranscript,
    Downloading,
    Uploading,
    Polling,
    Summarizing,
}

/// The acquisition & summarization pipeline.
///
/// Exactly one acquisition path feeds each summarization call, and all
/// intermediate artifacts are request-scoped: the download directory is a
/// fresh temp dir removed on every exit path.
pub struct Pipeline {
    config: PipelineConfig,
    transcripts: Arc<dyn TranscriptSource>,
    downloader: Arc<dyn VideoDownloader>,
    assets: Arc<dyn AssetStore>,
    completions: Arc<dyn Completions>,
}

impl Pipeline {
    /// Build a pipeline with the real external services.
    pub fn new(config: PipelineConfig) -> Result<Self> {
        let transcripts =
            Arc::new(YoutubeTranscriptSource::new()?.with_languages(config.languages.clone()));
        let assets = Arc::new(GeminiFileStore::new(&config));
        let completions = Arc::new(GeminiCompletions::new(&config));
        Ok(Self {
            config,
            transcripts,
            downloader: Arc::new(YtDlpDownloader),
            assets,
            completions,
        })
    }

    /// Build a pipeline from explicit stage implementations.
    pub fn from_parts(
        config: PipelineConfig,
        transcripts: Arc<dyn TranscriptSource>,
        downloader: Arc<dyn VideoDownloader>,
        assets: Arc<dyn AssetStore>,
        completions: Arc<dyn Completions>,
    ) -> Self {
        Self {
            config,
            transcripts,
            downloader,
            assets,
            completions,
        }
    }

    pub async fn run(&self, source: &str) -> Result<Summary> {
        self.run_with_progress(source, |_| {}).await
    }

    /// Run the pipeline, reporting each stage transition through `on_stage`.
    pub async fn run_with_progress(
        &self,
        source: &str,
        mut on_stage: impl FnMut(Stage),
    ) -> Result<Summary> {
        on_stage(Stage::Classifying);

        match classify(source) {
            VideoReference::Remote(url) => {
                on_stage(Stage::AcquiringTranscript);
                match self.fetch_transcript_text(&url).await {
                    Ok(text) => {
                        on_stage(Stage::Summarizing);
                        let summary = self
                            .completions
                            .summarize_text(self.config.style.prompt(), &text)
                            .await?;
                        Ok(Summary {
                            text: summary,
                            path: AcquisitionPath::Captions,
                        })
                    }
                    Err(e) if e.is_recoverable() => {
                        warn!(url = %url, error = %e, "transcript unavailable, falling back to download");
                        on_stage(Stage::Downloading);
                        let work_dir = tempfile::tempdir()?;
                        let video_path = self.downloader.download(&url, work_dir.path()).await?;
                        self.summarize_upload(&video_path, &mut on_stage).await
                        // work_dir dropped here, removing the downloaded file
                    }
                    Err(e) => Err(e),
                }
            }
            VideoReference::Local(path) => {
                if !path.is_file() {
                    return Err(VidbriefError::InvalidLocalPath { path });
                }
                debug!(path = %path.display(), "local video input");
                self.summarize_upload(&path, &mut on_stage).await
            }
        }
    }

    async fn fetch_transcript_text(&self, url: &str) -> Result<String> {
        let video_id = extract_video_id(url)?;
        self.transcripts.fetch_text(&video_id).await
    }

    async fn summarize_upload(
        &self,
        video_path: &Path,
        on_stage: &mut impl FnMut(Stage),
    ) -> Result<Summary> {
        on_stage(Stage::Uploading);
        let handle = self.assets.upload(video_path).await?;

        on_stage(Stage::Polling);
        let active = wait_until_active(
            self.assets.as_ref(),
            handle,
            self.config.poll_interval,
            self.config.poll_budget,
        )
        .await?;

        on_stage(Stage::Summarizing);
        let summary = self
            .completions
            .summarize_asset(self.config.style.prompt(), &active)
            .await?;

        Ok(Summary {
            text: summary,
            path: AcquisitionPath::VideoUpload,
        })
    }
}
