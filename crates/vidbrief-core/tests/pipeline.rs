//! Orchestration tests driving the pipeline with in-memory stage fakes.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use vidbrief_core::{
    AcquisitionPath, AssetHandle, AssetState, AssetStore, Completions, Pipeline, PipelineConfig,
    Result, TranscriptSource, VideoDownloader, VidbriefError, wait_until_active,
};

fn test_config() -> PipelineConfig {
    let mut config = PipelineConfig::new("test-key".to_string());
    config.poll_interval = Duration::from_millis(1);
    config.poll_budget = Duration::from_millis(50);
    config
}

fn handle(state: AssetState) -> AssetHandle {
    AssetHandle {
        name: "files/abc123".to_string(),
        uri: "https://example.test/files/abc123".to_string(),
        mime_type: "video/mp4".to_string(),
        state,
    }
}

/// Shared call journal so tests can assert cross-stage ordering.
type Journal = Arc<Mutex<Vec<&'static str>>>;

struct StubTranscripts {
    text: Option<&'static str>,
    calls: AtomicUsize,
}

impl StubTranscripts {
    fn available(text: &'static str) -> Self {
        Self {
            text: Some(text),
            calls: AtomicUsize::new(0),
        }
    }

    fn unavailable() -> Self {
        Self {
            text: None,
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl TranscriptSource for StubTranscripts {
    async fn fetch_text(&self, video_id: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.text {
            Some(text) => Ok(text.to_string()),
            None => Err(VidbriefError::TranscriptUnavailable {
                video_id: video_id.to_string(),
                reason: "captions disabled".to_string(),
            }),
        }
    }
}

struct StubDownloader {
    calls: AtomicUsize,
    journal: Journal,
}

#[async_trait]
impl VideoDownloader for StubDownloader {
    async fn download(&self, _url: &str, work_dir: &Path) -> Result<PathBuf> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.journal.lock().unwrap().push("download");
        let path = work_dir.join("video.mp4");
        std::fs::write(&path, b"fake video")?;
        Ok(path)
    }
}

struct StubAssets {
    /// States returned by successive `get` calls; Active once exhausted.
    get_states: Mutex<Vec<AssetState>>,
    upload_state: AssetState,
    upload_calls: AtomicUsize,
    journal: Journal,
}

impl StubAssets {
    fn new(upload_state: AssetState, get_states: Vec<AssetState>, journal: Journal) -> Self {
        Self {
            get_states: Mutex::new(get_states),
            upload_state,
            upload_calls: AtomicUsize::new(0),
            journal,
        }
    }
}

#[async_trait]
impl AssetStore for StubAssets {
    async fn upload(&self, _path: &Path) -> Result<AssetHandle> {
        self.upload_calls.fetch_add(1, Ordering::SeqCst);
        self.journal.lock().unwrap().push("upload");
        Ok(handle(self.upload_state))
    }

    async fn get(&self, _name: &str) -> Result<AssetHandle> {
        let mut states = self.get_states.lock().unwrap();
        let state = if states.is_empty() {
            AssetState::Active
        } else {
            states.remove(0)
        };
        Ok(handle(state))
    }
}

#[derive(Default)]
struct StubCompletions {
    text_input: Mutex<Option<String>>,
    text_calls: AtomicUsize,
    asset_calls: AtomicUsize,
}

#[async_trait]
impl Completions for StubCompletions {
    async fn summarize_text(&self, _prompt: &str, transcript: &str) -> Result<String> {
        self.text_calls.fetch_add(1, Ordering::SeqCst);
        *self.text_input.lock().unwrap() = Some(transcript.to_string());
        Ok("text summary".to_string())
    }

    async fn summarize_asset(&self, _prompt: &str, asset: &AssetHandle) -> Result<String> {
        self.asset_calls.fetch_add(1, Ordering::SeqCst);
        assert_eq!(asset.state, AssetState::Active);
        Ok("asset summary".to_string())
    }
}

struct Fixture {
    transcripts: Arc<StubTranscripts>,
    downloader: Arc<StubDownloader>,
    assets: Arc<StubAssets>,
    completions: Arc<StubCompletions>,
    journal: Journal,
}

impl Fixture {
    fn new(transcripts: StubTranscripts, upload_state: AssetState) -> Self {
        let journal: Journal = Arc::new(Mutex::new(Vec::new()));
        Self {
            transcripts: Arc::new(transcripts),
            downloader: Arc::new(StubDownloader {
                calls: AtomicUsize::new(0),
                journal: journal.clone(),
            }),
            assets: Arc::new(StubAssets::new(upload_state, vec![], journal.clone())),
            completions: Arc::new(StubCompletions::default()),
            journal,
        }
    }

    fn pipeline(&self) -> Pipeline {
        Pipeline::from_parts(
            test_config(),
            self.transcripts.clone(),
            self.downloader.clone(),
            self.assets.clone(),
            self.completions.clone(),
        )
    }
}

const WATCH_URL: &str = "https://www.youtube.com/watch?v=gP4ki8m8EZg";

#[tokio::test]
async fn captions_available_never_touches_fallback() {
    let fx = Fixture::new(
        StubTranscripts::available("Hello world. This is a test."),
        AssetState::Pending,
    );

    let summary = fx.pipeline().run(WATCH_URL).await.unwrap();

    assert_eq!(summary.path, AcquisitionPath::Captions);
    assert_eq!(summary.text, "text summary");
    assert_eq!(fx.downloader.calls.load(Ordering::SeqCst), 0);
    assert_eq!(fx.assets.upload_calls.load(Ordering::SeqCst), 0);
    assert_eq!(fx.completions.asset_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn summarizer_receives_space_joined_transcript() {
    let fx = Fixture::new(
        StubTranscripts::available("Hello world. This is a test."),
        AssetState::Active,
    );

    fx.pipeline().run(WATCH_URL).await.unwrap();

    let seen = fx.completions.text_input.lock().unwrap().clone();
    assert_eq!(seen.as_deref(), Some("Hello world. This is a test."));
}

#[tokio::test]
async fn missing_captions_fall_back_to_download_then_upload() {
    let fx = Fixture::new(StubTranscripts::unavailable(), AssetState::Active);

    let summary = fx.pipeline().run(WATCH_URL).await.unwrap();

    assert_eq!(summary.path, AcquisitionPath::VideoUpload);
    assert_eq!(fx.transcripts.calls.load(Ordering::SeqCst), 1);
    assert_eq!(fx.downloader.calls.load(Ordering::SeqCst), 1);
    assert_eq!(fx.assets.upload_calls.load(Ordering::SeqCst), 1);
    assert_eq!(*fx.journal.lock().unwrap(), vec!["download", "upload"]);
}

#[tokio::test]
async fn local_path_skips_transcript_and_download() {
    let fx = Fixture::new(StubTranscripts::unavailable(), AssetState::Active);

    let file = tempfile::NamedTempFile::new().unwrap();
    let source = file.path().to_string_lossy().to_string();

    let summary = fx.pipeline().run(&source).await.unwrap();

    assert_eq!(summary.path, AcquisitionPath::VideoUpload);
    assert_eq!(fx.transcripts.calls.load(Ordering::SeqCst), 0);
    assert_eq!(fx.downloader.calls.load(Ordering::SeqCst), 0);
    assert_eq!(fx.assets.upload_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn missing_local_path_is_fatal() {
    let fx = Fixture::new(StubTranscripts::unavailable(), AssetState::Active);

    let err = fx
        .pipeline()
        .run("/definitely/not/a/real/file.mp4")
        .await
        .unwrap_err();

    assert!(matches!(err, VidbriefError::InvalidLocalPath { .. }));
    assert_eq!(fx.assets.upload_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn download_failure_propagates_without_upload() {
    struct FailingDownloader;

    #[async_trait]
    impl VideoDownloader for FailingDownloader {
        async fn download(&self, url: &str, _work_dir: &Path) -> Result<PathBuf> {
            Err(VidbriefError::DownloadFailed {
                url: url.to_string(),
                reason: "video unavailable".to_string(),
            })
        }
    }

    let fx = Fixture::new(StubTranscripts::unavailable(), AssetState::Active);
    let pipeline = Pipeline::from_parts(
        test_config(),
        fx.transcripts.clone(),
        Arc::new(FailingDownloader),
        fx.assets.clone(),
        fx.completions.clone(),
    );

    let err = pipeline.run(WATCH_URL).await.unwrap_err();

    assert!(matches!(err, VidbriefError::DownloadFailed { .. }));
    assert_eq!(fx.assets.upload_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn polling_waits_until_active() {
    let journal: Journal = Arc::new(Mutex::new(Vec::new()));
    let store = StubAssets::new(
        AssetState::Pending,
        vec![AssetState::Pending, AssetState::Pending, AssetState::Active],
        journal,
    );

    let active = wait_until_active(
        &store,
        handle(AssetState::Pending),
        Duration::from_millis(1),
        Duration::from_secs(1),
    )
    .await
    .unwrap();

    assert_eq!(active.state, AssetState::Active);
}

#[tokio::test]
async fn polling_aborts_on_failed_state() {
    let journal: Journal = Arc::new(Mutex::new(Vec::new()));
    let store = StubAssets::new(
        AssetState::Pending,
        vec![AssetState::Failed],
        journal,
    );

    let err = wait_until_active(
        &store,
        handle(AssetState::Pending),
        Duration::from_millis(1),
        Duration::from_secs(1),
    )
    .await
    .unwrap_err();

    assert!(matches!(err, VidbriefError::AssetFailed { .. }));
}

#[tokio::test]
async fn polling_gives_up_after_budget() {
    struct ForeverPending;

    #[async_trait]
    impl AssetStore for ForeverPending {
        async fn upload(&self, _path: &Path) -> Result<AssetHandle> {
            Ok(handle(AssetState::Pending))
        }

        async fn get(&self, _name: &str) -> Result<AssetHandle> {
            Ok(handle(AssetState::Pending))
        }
    }

    let err = wait_until_active(
        &ForeverPending,
        handle(AssetState::Pending),
        Duration::from_millis(1),
        Duration::from_millis(5),
    )
    .await
    .unwrap_err();

    assert!(matches!(err, VidbriefError::PollTimeout { .. }));
}

#[tokio::test]
async fn failed_asset_during_pipeline_never_reaches_summarizer() {
    let journal: Journal = Arc::new(Mutex::new(Vec::new()));
    let fx = Fixture::new(StubTranscripts::unavailable(), AssetState::Pending);
    let assets = Arc::new(StubAssets::new(
        AssetState::Pending,
        vec![AssetState::Failed],
        journal,
    ));

    let pipeline = Pipeline::from_parts(
        test_config(),
        fx.transcripts.clone(),
        fx.downloader.clone(),
        assets,
        fx.completions.clone(),
    );

    let err = pipeline.run(WATCH_URL).await.unwrap_err();

    assert!(matches!(err, VidbriefError::AssetFailed { .. }));
    assert_eq!(fx.completions.asset_calls.load(Ordering::SeqCst), 0);
    assert_eq!(fx.completions.text_calls.load(Ordering::SeqCst), 0);
}
