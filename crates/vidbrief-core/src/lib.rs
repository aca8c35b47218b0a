//! Vidbrief Core Library
//!
//! Core functionality for turning a video reference (YouTube URL or local
//! file) into an AI-generated summary: transcript-first acquisition with a
//! download-and-upload fallback, readiness polling, and PDF export.

pub mod assets;
pub mod config;
pub mod download;
pub mod error;
pub mod pdf;
pub mod pipeline;
pub mod source;
pub mod summarize;
pub mod transcript;

// Re-export commonly used items at crate root
pub use assets::{AssetHandle, AssetState, AssetStore, GeminiFileStore, wait_until_active};
pub use config::{GEMINI_API_KEY_ENV, PipelineConfig, SummaryStyle};
pub use download::{VideoDownloader, YtDlpDownloader};
pub use error::{Result, VidbriefError};
pub use pdf::render_summary_pdf;
pub use pipeline::{AcquisitionPath, Pipeline, Stage, Summary};
pub use source::{VideoReference, classify, extract_video_id};
pub use summarize::{Completions, GeminiCompletions};
pub use transcript::{TranscriptSource, YoutubeTranscriptSource};
