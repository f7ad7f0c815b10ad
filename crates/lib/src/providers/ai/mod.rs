pub mod claude;
pub mod deepseek;

use crate::{constants::LOG_PREVIEW_CHARS, errors::ProviderError};
use async_trait::async_trait;
use dyn_clone::DynClone;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// Generation parameters for a single chat completion.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub system_instruction: Option<String>,
    pub user_prompt: String,
    pub model_id: String,
    pub max_output_tokens: u32,
    pub temperature: f32,
}

/// The text of a successful completion and its token usage.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct Completion {
    pub text: String,
    pub input_tokens: u32,
    pub output_tokens: u32,
}

/// A trait for interacting with a hosted chat-completion API.
///
/// Implementations must be interchangeable: the rest of the pipeline only sees
/// this interface. An implementation built without an API key is disabled and
/// fails every call with `ProviderError::Unavailable` without touching the network.
#[async_trait]
pub trait AiProvider: Send + Sync + Debug + DynClone {
    /// A short, stable name for logs (e.g. `claude`).
    fn name(&self) -> &str;

    /// Whether the provider has credentials and will attempt network calls.
    fn is_enabled(&self) -> bool;

    /// Runs one completion. No retries are performed.
    async fn complete(&self, request: &CompletionRequest) -> Result<Completion, ProviderError>;
}

dyn_clone::clone_trait_object!(AiProvider);

/// Treats a missing or blank key as absent.
pub(crate) fn normalize_api_key(api_key: Option<String>) -> Option<String> {
    api_key.filter(|k| !k.trim().is_empty())
}

/// Classifies a transport-level failure from `reqwest`.
pub(crate) fn classify_send_error(err: reqwest::Error) -> ProviderError {
    if err.is_connect() || err.is_timeout() || err.is_request() {
        ProviderError::Connection(err)
    } else {
        ProviderError::Other(err.to_string())
    }
}

/// Maps a non-success HTTP status to the matching failure kind.
pub(crate) fn classify_status(code: u16, body: String) -> ProviderError {
    if code == 429 {
        ProviderError::RateLimited(body)
    } else {
        ProviderError::Status { code, body }
    }
}

/// The first `LOG_PREVIEW_CHARS` characters of a reply, for logging.
pub(crate) fn preview(text: &str) -> String {
    let mut preview: String = text.chars().take(LOG_PREVIEW_CHARS).collect();
    if text.chars().count() > LOG_PREVIEW_CHARS {
        preview.push_str("...");
    }
    preview
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_api_key() {
        assert_eq!(normalize_api_key(None), None);
        assert_eq!(normalize_api_key(Some("  ".to_string())), None);
        assert_eq!(
            normalize_api_key(Some("sk-test".to_string())),
            Some("sk-test".to_string())
        );
    }

    #[test]
    fn test_classify_status() {
        assert!(matches!(
            classify_status(429, "slow down".to_string()),
            ProviderError::RateLimited(_)
        ));
        assert!(matches!(
            classify_status(503, String::new()),
            ProviderError::Status { code: 503, .. }
        ));
    }

    #[test]
    fn test_preview_counts_characters_not_bytes() {
        let thai = "ก".repeat(LOG_PREVIEW_CHARS + 5);
        let p = preview(&thai);
        assert_eq!(p.chars().count(), LOG_PREVIEW_CHARS + 3);
        assert!(p.ends_with("..."));
        assert_eq!(preview("short"), "short");
    }
}
