//! # AI Provider Factory
//!
//! Centralizes the construction of provider instances from a backend kind, so the
//! server and the experiment runner build their adapters the same way.

use crate::{
    errors::ProviderError,
    providers::ai::{
        claude::{ClaudeProvider, DEFAULT_CLAUDE_API_URL},
        deepseek::{DeepSeekProvider, DEFAULT_DEEPSEEK_API_URL},
        AiProvider,
    },
};
use std::str::FromStr;
use tracing::info;

/// The supported backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    Claude,
    DeepSeek,
}

impl ProviderKind {
    pub fn default_api_url(&self) -> &'static str {
        match self {
            ProviderKind::Claude => DEFAULT_CLAUDE_API_URL,
            ProviderKind::DeepSeek => DEFAULT_DEEPSEEK_API_URL,
        }
    }

    /// The environment variable holding this backend's secret.
    pub fn api_key_env(&self) -> &'static str {
        match self {
            ProviderKind::Claude => "CLAUDE_KEY",
            ProviderKind::DeepSeek => "DEEPSEEK_API_KEY",
        }
    }
}

impl FromStr for ProviderKind {
    type Err = ProviderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "claude" | "anthropic" => Ok(ProviderKind::Claude),
            "deepseek" => Ok(ProviderKind::DeepSeek),
            other => Err(ProviderError::Other(format!(
                "unsupported AI provider type '{other}'"
            ))),
        }
    }
}

/// Creates a provider of the given kind.
///
/// `api_url` falls back to the backend's public endpoint. A missing key produces
/// a disabled provider rather than an error, so startup never fails on it.
pub fn create_provider(
    kind: ProviderKind,
    api_url: Option<String>,
    api_key: Option<String>,
) -> Result<Box<dyn AiProvider>, ProviderError> {
    let api_url = api_url.unwrap_or_else(|| kind.default_api_url().to_string());
    info!(?kind, %api_url, "Configuring AI provider");
    let provider: Box<dyn AiProvider> = match kind {
        ProviderKind::Claude => Box::new(ClaudeProvider::new(api_url, api_key)?),
        ProviderKind::DeepSeek => Box::new(DeepSeekProvider::new(api_url, api_key)?),
    };
    Ok(provider)
}
