use std::path::PathBuf;

use crate::error::{Result, VidbriefError};

/// A video reference as given by the user, before any I/O happens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VideoReference {
    /// A URL on a known hosting domain.
    Remote(String),
    /// Anything else is treated as a path on the local filesystem;
    /// existence is checked by the pipeline, not here.
    Local(PathBuf),
}

/// Classify a reference string. Pure pattern matching, no I/O, never fails.
pub fn classify(source: &str) -> VideoReference {
    let trimmed = source.trim();
    if trimmed.starts_with("http") && (trimmed.contains("youtube.com") || trimmed.contains("youtu.be"))
    {
        VideoReference::Remote(trimmed.to_string())
    } else {
        VideoReference::Local(PathBuf::from(trimmed))
    }
}

const MAX_VIDEO_ID_LEN: usize = 128;

/// Extract the platform video id from a YouTube URL.
///
/// Handles `watch?v=` URLs, `youtu.be/` short links, and raw ids.
pub fn extract_video_id(url: &str) -> Result<String> {
    let raw_id = if let Some(v_param) = url.split("v=").nth(1) {
        v_param.split('&').next().unwrap_or(v_param)
    } else if let Some(short) = url.split("youtu.be/").nth(1) {
        short.split('?').next().unwrap_or(short)
    } else {
        url
    };

    sanitize_video_id(raw_id).ok_or_else(|| VidbriefError::InvalidVideoId {
        url: url.to_string(),
    })
}

/// Ids go into API calls and filesystem paths, so only ASCII alphanumeric
/// characters plus `_` and `-` are allowed.
fn sanitize_video_id(raw: &str) -> Option<String> {
    let trimmed = raw.trim();

    if trimmed.is_empty() || trimmed.len() > MAX_VIDEO_ID_LEN {
        return None;
    }

    if !trimmed
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_'))
    {
        return None;
    }

    Some(trimmed.to_string())
}
