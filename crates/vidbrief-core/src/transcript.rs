use async_trait::async_trait;
use yt_transcript_rs::api::YouTubeTranscriptApi;

use crate::error::{Result, VidbriefError};

/// Caption-track retrieval seam. The pipeline only ever needs the joined
/// text; timing information is discarded at this boundary.
#[async_trait]
pub trait TranscriptSource: Send + Sync {
    async fn fetch_text(&self, video_id: &str) -> Result<String>;
}

/// Transcript retrieval backed by YouTube's caption tracks.
pub struct YoutubeTranscriptSource {
    api: YouTubeTranscriptApi,
    languages: Vec<String>,
}

impl YoutubeTranscriptSource {
    pub fn new() -> Result<Self> {
        let api = YouTubeTranscriptApi::new(None, None, None).map_err(|e| {
            VidbriefError::TranscriptClientInit {
                reason: e.to_string(),
            }
        })?;
        Ok(Self {
            api,
            languages: vec!["en".to_string()],
        })
    }

    pub fn with_languages(mut self, languages: Vec<String>) -> Self {
        self.languages = languages;
        self
    }
}

#[async_trait]
impl TranscriptSource for YoutubeTranscriptSource {
    async fn fetch_text(&self, video_id: &str) -> Result<String> {
        let languages: Vec<&str> = self.languages.iter().map(String::as_str).collect();

        // Every transcript failure (captions disabled, private video,
        // network error) is recoverable: the caller falls back to the
        // download path instead of surfacing it.
        let transcript = self
            .api
            .fetch_transcript(video_id, &languages, false)
            .await
            .map_err(|e| VidbriefError::TranscriptUnavailable {
                video_id: video_id.to_string(),
                reason: e.to_string(),
            })?;

        let texts: Vec<&str> = transcript
            .snippets
            .iter()
            .map(|snippet| snippet.text.as_str())
            .collect();

        Ok(join_fragments(&texts))
    }
}

/// Concatenate caption fragments with single spaces, preserving order.
pub fn join_fragments(fragments: &[&str]) -> String {
    fragments.join(" ")
}

#[cfg(test)]
mod tests {
    use super::join_fragments;

    #[test]
    fn joins_fragments_with_single_spaces() {
        let joined = join_fragments(&["Hello world.", "This is a test."]);
        assert_eq!(joined, "Hello world. This is a test.");
    }

    #[test]
    fn preserves_fragment_order() {
        let joined = join_fragments(&["first", "second", "third"]);
        assert_eq!(joined, "first second third");
    }

    #[test]
    fn empty_track_joins_to_empty_string() {
        assert_eq!(join_fragments(&[]), "");
    }
}
