#![allow(dead_code)]
//! # Common Test Utilities
//!
//! Shared helpers for the `bystander` integration tests: tracing setup, a scripted
//! in-memory provider and canned provider reply bodies.

use async_trait::async_trait;
use bystander::{
    providers::ai::{AiProvider, Completion, CompletionRequest},
    GenerationParams, ProviderError,
};
use dotenvy::dotenv;
use serde_json::{json, Value};
use std::sync::{Arc, Once, RwLock};

static INIT: Once = Once::new();

/// Initializes the tracing subscriber and loads .env for tests.
pub fn setup_tracing() {
    INIT.call_once(|| {
        dotenv().ok();
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

pub fn test_params() -> GenerationParams {
    GenerationParams {
        model_id: "test-model".to_string(),
        max_output_tokens: 256,
        temperature: 0.0,
        system_instruction: Some("system".to_string()),
    }
}

// --- Mock AI Provider for Logic Testing ---

/// Replays scripted replies in order and records every request it receives.
#[derive(Clone, Debug)]
pub struct MockAiProvider {
    pub call_history: Arc<RwLock<Vec<CompletionRequest>>>,
    responses: Arc<RwLock<Vec<String>>>,
    fail_with_unavailable: bool,
}

impl MockAiProvider {
    pub fn new(responses: Vec<&str>) -> Self {
        Self {
            call_history: Arc::new(RwLock::new(Vec::new())),
            responses: Arc::new(RwLock::new(
                responses.into_iter().rev().map(String::from).collect(),
            )),
            fail_with_unavailable: false,
        }
    }

    /// A provider that behaves like one built without an API key.
    pub fn disabled() -> Self {
        Self {
            fail_with_unavailable: true,
            ..Self::new(vec![])
        }
    }

    pub fn calls(&self) -> Vec<CompletionRequest> {
        self.call_history.read().unwrap().clone()
    }
}

#[async_trait]
impl AiProvider for MockAiProvider {
    fn name(&self) -> &str {
        "mock"
    }

    fn is_enabled(&self) -> bool {
        !self.fail_with_unavailable
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<Completion, ProviderError> {
        self.call_history.write().unwrap().push(request.clone());
        if self.fail_with_unavailable {
            return Err(ProviderError::Unavailable("mock".to_string()));
        }
        let text = self
            .responses
            .write()
            .unwrap()
            .pop()
            .unwrap_or_else(|| "Default mock response".to_string());
        Ok(Completion {
            text,
            input_tokens: 10,
            output_tokens: 20,
        })
    }
}

// --- Canned provider bodies ---

pub fn claude_body(text: &str, input_tokens: u32, output_tokens: u32) -> Value {
    json!({
        "id": "msg_test",
        "type": "message",
        "role": "assistant",
        "content": [{"type": "text", "text": text}],
        "usage": {"input_tokens": input_tokens, "output_tokens": output_tokens}
    })
}

pub fn deepseek_body(text: &str) -> Value {
    json!({
        "id": "chatcmpl-test",
        "choices": [{"index": 0, "message": {"role": "assistant", "content": text}}],
        "usage": {"prompt_tokens": 12, "completion_tokens": 34, "total_tokens": 46}
    })
}

pub const SECTIONED_REPLY: &str = "===EMERGENCY ASSESSMENT===\nYES. person choking\n===GUIDANCE THAI===\nStep 1\nStep 2\n===REASONING THAI===\nBecause airway blocked";
