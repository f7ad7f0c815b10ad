use crate::{
    constants::DISALLOWED_EMPHASIS,
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

pub const DEFAULT_DEEPSEEK_API_URL: &str = "https://api.deepseek.com/chat/completions";
pub const DEFAULT_DEEPSEEK_MODEL: &str = "deepseek-chat";

// --- OpenAI-compatible request and response structures ---

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
    stream: bool,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize, Debug)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
    #[serde(default)]
    usage: Option<ChatUsage>,
}

#[derive(Deserialize, Debug)]
struct ChatChoice {
    #[serde(default)]
    message: Option<ChatChoiceMessage>,
}

#[derive(Deserialize, Debug)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize, Debug)]
struct ChatUsage {
    #[serde(default)]
    prompt_tokens: u32,
    #[serde(default)]
    completion_tokens: u32,
}

/// Removes every emphasis marker from a reply.
pub fn strip_emphasis(text: &str) -> String {
    text.chars().filter(|c| *c != DISALLOWED_EMPHASIS).collect()
}

// --- DeepSeek Provider implementation ---

/// A provider for the DeepSeek (OpenAI-compatible) chat completions API.
///
/// Replies never contain `*`: the system instruction forbids emphasis and any
/// marker the model emits anyway is stripped before the text is returned.
#[derive(Clone)]
pub struct DeepSeekProvider {
    client: ReqwestClient,
    api_url: String,
    api_key: Option<String>,
}

impl Debug for DeepSeekProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeepSeekProvider")
            .field("api_url", &self.api_url)
            .field("enabled", &self.api_key.is_some())
            .finish_non_exhaustive()
    }
}

impl DeepSeekProvider {
    /// Creates a new `DeepSeekProvider`. A `None` or blank key yields a disabled provider.
    pub fn new(api_url: String, api_key: Option<String>) -> Result<Self, ProviderError> {
        let client = ReqwestClient::builder()
            .build()
            .map_err(ProviderError::ReqwestClientBuild)?;
        let api_key = normalize_api_key(api_key);
        if api_key.is_none() {
            warn!("DEEPSEEK_API_KEY is not set; the DeepSeek provider is disabled.");
        }
        Ok(Self {
            client,
            api_url,
            api_key,
        })
    }
}

#[async_trait]
impl AiProvider for DeepSeekProvider {
    fn name(&self) -> &str {
        "deepseek"
    }

    fn is_enabled(&self) -> bool {
        self.api_key.is_some()
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<Completion, ProviderError> {
        let Some(api_key) = &self.api_key else {
            return Err(ProviderError::Unavailable(self.name().to_string()));
        };

        info!(model = %request.model_id, "--> Calling DeepSeek");
        debug!(user_prompt = %request.user_prompt, "--> DeepSeek prompt");

        let mut messages = Vec::with_capacity(2);
        if let Some(system) = request.system_instruction.as_deref() {
            messages.push(ChatMessage {
                role: "system",
                content: system,
            });
        }
        messages.push(ChatMessage {
            role: "user",
            content: &request.user_prompt,
        });

        let body = ChatRequest {
            model: &request.model_id,
            messages,
            temperature: request.temperature,
            max_tokens: request.max_output_tokens,
            stream: false,
        };

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(classify_send_error)?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), body = %error_text, "DeepSeek API returned an error");
            return Err(classify_status(status.as_u16(), error_text));
        }

        let parsed: ChatResponse = response.json().await.map_err(|e| {
            ProviderError::Other(format!("failed to decode DeepSeek response: {e}"))
        })?;

        let (input_tokens, output_tokens) = parsed
            .usage
            .map(|u| (u.prompt_tokens, u.completion_tokens))
            .unwrap_or_default();

        let raw = parsed
            .choices
            .into_iter()
            .find_map(|c| c.message.and_then(|m| m.content))
            .ok_or_else(|| {
                warn!("DeepSeek returned a response without message content");
                ProviderError::UnexpectedStructure
            })?;

        info!(
            input_tokens,
            output_tokens,
            "<-- DeepSeek reply: {}",
            preview(&raw)
        );

        Ok(Completion {
            text: strip_emphasis(&raw).trim().to_string(),
            input_tokens,
            output_tokens,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_emphasis() {
        assert_eq!(strip_emphasis("**โทร 1669** ทันที"), "โทร 1669 ทันที");
        assert_eq!(strip_emphasis("no markers"), "no markers");
    }
}
