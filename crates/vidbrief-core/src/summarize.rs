use async_trait::async_trait;
use tracing::debug;

use crate::assets::AssetHandle;
use crate::config::PipelineConfig;
use crate::error::{Result, VidbriefError};

/// Generative completion seam. One synchronous call per summary; no
/// streaming, no retries, oversized transcripts are passed whole.
#[async_trait]
pub trait Completions: Send + Sync {
    async fn summarize_text(&self, prompt: &str, transcript: &str) -> Result<String>;
    async fn summarize_asset(&self, prompt: &str, asset: &AssetHandle) -> Result<String>;
}

/// Summarization via the Gemini generateContent endpoint.
pub struct GeminiCompletions {
    client: reqwest::Client,
    api_base: String,
    api_key: String,
    model: String,
}

impl GeminiCompletions {
    pub fn new(config: &PipelineConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_base: config.api_base.clone(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
        }
    }

    async fn generate(&self, parts: Vec<serde_json::Value>) -> Result<String> {
        let response = self
            .client
            .post(format!(
                "{}/v1beta/models/{}:generateContent",
                self.api_base, self.model
            ))
            .header("Content-Type", "application/json")
            .header("x-goog-api-key", &self.api_key)
            .json(&serde_json::json!({
                "contents": [{ "parts": parts }]
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(VidbriefError::CompletionFailed {
                reason: format!("{status}: {body}"),
            });
        }

        let body = response.json::<serde_json::Value>().await?;

        // Extract content from response
        let text = body["candidates"][0]["content"]["parts"]
            .as_array()
            .map(|parts| {
                parts
                    .iter()
                    .filter_map(|part| part["text"].as_str())
                    .collect::<Vec<_>>()
                    .join("")
            })
            .filter(|text| !text.is_empty())
            .ok_or_else(|| VidbriefError::CompletionFailed {
                reason: format!("Invalid API response: {:?}", body),
            })?;

        Ok(text)
    }
}

#[async_trait]
impl Completions for GeminiCompletions {
    async fn summarize_text(&self, prompt: &str, transcript: &str) -> Result<String> {
        debug!(chars = transcript.len(), "summarizing transcript text");
        self.generate(vec![
            serde_json::json!({ "text": format!("{prompt}\n") }),
            serde_json::json!({ "text": transcript }),
        ])
        .await
    }

    async fn summarize_asset(&self, prompt: &str, asset: &AssetHandle) -> Result<String> {
        debug!(name = %asset.name, "summarizing uploaded video");
        self.generate(vec![
            serde_json::json!({
                "file_data": {
                    "mime_type": asset.mime_type,
                    "file_uri": asset.uri,
                }
            }),
            serde_json::json!({ "text": prompt }),
        ])
        .await
    }
}
