use crate::{
    errors::ProviderError,
    providers::ai::{
        classify_send_error, classify_status, normalize_api_key, preview, AiProvider, Completion,
        CompletionRequest,
    },
};
use async_trait::async_trait;
use reqwest::Client as ReqwestClient;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Debug};
use tracing::{debug, info, warn};

pub const DEFAULT_CLAUDE_API_URL: &str = "https://api.anthropic.com/v1/messages";
pub const DEFAULT_CLAUDE_MODEL: &str = "claude-3-haiku-20240307";
const ANTHROPIC_VERSION: &str = "2023-06-01";

// --- Anthropic Messages API request and response structures ---

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<&'a str>,
    messages: Vec<Message<'a>>,
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize, Debug)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Deserialize, Debug)]
struct ContentBlock {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Deserialize, Debug)]
struct Usage {
    #[serde(default)]
    input_tokens: u32,
    #[serde(default)]
    output_tokens: u32,
}

// --- Claude Provider implementation ---

/// A provider for the Anthropic Messages API.
#[derive(Clone)]
pub struct ClaudeProvider {
    client: ReqwestClient,
    api_url: String,
    api_key: Option<String>,
}

impl Debug for ClaudeProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClaudeProvider")
            .field("api_url", &self.api_url)
            .field("enabled", &self.api_key.is_some())
            .finish_non_exhaustive()
    }
}

impl ClaudeProvider {
    /// Creates a new `ClaudeProvider`. A `None` or blank key yields a disabled provider.
    pub fn new(api_url: String, api_key: Option<String>) -> Result<Self, ProviderError> {
        let client = ReqwestClient::builder()
            .build()
            .map_err(ProviderError::ReqwestClientBuild)?;
        let api_key = normalize_api_key(api_key);
        if api_key.is_none() {
            warn!("CLAUDE_KEY is not set; the Claude provider is disabled.");
        }
        Ok(Self {
            client,
            api_url,
            api_key,
        })
    }
}

#[async_trait]
impl AiProvider for ClaudeProvider {
    fn name(&self) -> &str {
        "claude"
    }

    fn is_enabled(&self) -> bool {
        self.api_key.is_some()
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<Completion, ProviderError> {
        let Some(api_key) = &self.api_key else {
            return Err(ProviderError::Unavailable(self.name().to_string()));
        };

        info!(model = %request.model_id, "--> Calling Claude");
        debug!(user_prompt = %request.user_prompt, "--> Claude prompt");

        let body = MessagesRequest {
            model: &request.model_id,
            max_tokens: request.max_output_tokens,
            temperature: request.temperature,
            system: request.system_instruction.as_deref(),
            messages: vec![Message {
                role: "user",
                content: &request.user_prompt,
            }],
        };

        let response = self
            .client
            .post(&self.api_url)
            .header("x-api-key", api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&body)
            .send()
            .await
            .map_err(classify_send_error)?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), body = %error_text, "Claude API returned an error");
            return Err(classify_status(status.as_u16(), error_text));
        }

        let parsed: MessagesResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Other(format!("failed to decode Claude response: {e}")))?;

        let (input_tokens, output_tokens) = parsed
            .usage
            .map(|u| (u.input_tokens, u.output_tokens))
            .unwrap_or_default();

        let text = parsed
            .content
            .into_iter()
            .find_map(|block| block.text)
            .ok_or_else(|| {
                warn!("Claude returned a response without a text block");
                ProviderError::UnexpectedStructure
            })?;

        info!(
            input_tokens,
            output_tokens,
            "<-- Claude reply: {}",
            preview(&text)
        );

        Ok(Completion {
            text: text.trim().to_string(),
            input_tokens,
            output_tokens,
        })
    }
}
