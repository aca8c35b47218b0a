use std::time::Duration;

use crate::error::{Result, VidbriefError};

pub const GEMINI_API_KEY_ENV: &str = "GEMINI_API_KEY";
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// The instruction prompt sent along with the acquired content.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SummaryStyle {
    /// Simple bullet-point summary.
    #[default]
    Bullets,
    /// Short summary plus topic-wise insights and actionable takeaways.
    Insights,
}

impl SummaryStyle {
    pub fn prompt(&self) -> &'static str {
        match self {
            SummaryStyle::Bullets => "Summarize this video in simple bullet points.",
            SummaryStyle::Insights => {
                "Generate:\n\
                 1. Short summary\n\
                 2. Topic-wise insights\n\
                 3. Actionable takeaways"
            }
        }
    }
}

/// Everything one pipeline invocation needs. Built once by the caller and
/// passed in explicitly; there is no process-wide client state.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub api_key: String,
    pub api_base: String,
    pub model: String,
    pub style: SummaryStyle,
    /// Preferred caption languages, in order.
    pub languages: Vec<String>,
    /// Delay between asset readiness checks.
    pub poll_interval: Duration,
    /// Total wait budget before polling gives up with a timeout.
    pub poll_budget: Duration,
}

impl PipelineConfig {
    /// Read the API key from the environment, defaults for the rest.
    pub fn from_env() -> Result<Self> {
        let api_key =
            std::env::var(GEMINI_API_KEY_ENV).map_err(|_| VidbriefError::MissingApiKey {
                env_var: GEMINI_API_KEY_ENV.to_string(),
            })?;
        Ok(Self::new(api_key))
    }

    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            api_base: DEFAULT_API_BASE.to_string(),
            model: DEFAULT_MODEL.to_string(),
            style: SummaryStyle::default(),
            languages: vec!["en".to_string()],
            poll_interval: Duration::from_secs(4),
            poll_budget: Duration::from_secs(300),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_style(mut self, style: SummaryStyle) -> Self {
        self.style = style;
        self
    }

    pub fn with_languages(mut self, languages: Vec<String>) -> Self {
        self.languages = languages;
        self
    }
}
