//! # Guidance Pipeline
//!
//! Sequences one request through preprocessing, prompt assembly, the provider call
//! and postprocessing. Both the live request service and the experiment runner use
//! it, so a scenario logged offline goes through exactly the same steps as a live
//! request.

use crate::{
    errors::ProviderError,
    postprocess::Postprocessor,
    preprocess::Preprocessor,
    prompts::assemble,
    providers::ai::{AiProvider, Completion, CompletionRequest},
    types::{EmergencyQuery, ExtractedContext, ProcessedOutput, PromptText},
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Model settings applied to every completion the pipeline requests.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct GenerationParams {
    pub model_id: String,
    pub max_output_tokens: u32,
    pub temperature: f32,
    pub system_instruction: Option<String>,
}

/// The text handed to the postprocessor when the provider call fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    /// The Thai message for the failure kind, suitable for an end user.
    UserMessage,
    /// `Error: <message>`, as logged by the experiment runner.
    ErrorText,
}

/// The template and processors that make up one pipeline variant.
pub struct Stages<'a> {
    pub template: &'a str,
    pub preprocessor: Option<&'a dyn Preprocessor>,
    pub postprocessor: &'a dyn Postprocessor,
}

/// Every intermediate value of one pipeline run.
#[derive(Debug)]
pub struct PipelineRun {
    pub context: Option<ExtractedContext>,
    pub prompt: PromptText,
    /// `None` when the provider call failed.
    pub completion: Option<Completion>,
    /// The provider failure, when the call failed.
    pub error: Option<ProviderError>,
    /// The text that was postprocessed: the reply, or the failure text.
    pub raw_text: String,
    pub output: ProcessedOutput,
}

impl PipelineRun {
    pub fn input_tokens(&self) -> u32 {
        self.completion.as_ref().map_or(0, |c| c.input_tokens)
    }

    pub fn output_tokens(&self) -> u32 {
        self.completion.as_ref().map_or(0, |c| c.output_tokens)
    }
}

/// A provider handle plus the generation parameters used with it.
///
/// Built once at startup and only read afterwards.
#[derive(Debug, Clone)]
pub struct GuidancePipeline {
    provider: Box<dyn AiProvider>,
    params: GenerationParams,
}

impl GuidancePipeline {
    pub fn new(provider: Box<dyn AiProvider>, params: GenerationParams) -> Self {
        Self { provider, params }
    }

    /// Runs the query through every stage. Provider failures are absorbed
    /// according to `on_failure`, so this never fails.
    pub async fn run(
        &self,
        query: &EmergencyQuery,
        stages: &Stages<'_>,
        on_failure: FailurePolicy,
    ) -> PipelineRun {
        let context = stages.preprocessor.map(|p| {
            info!(preprocessor = p.name(), "[pipeline] Preprocessing query");
            p.extract(query.text())
        });

        let prompt = assemble(stages.template, query, context.as_ref());

        let request = CompletionRequest {
            system_instruction: self.params.system_instruction.clone(),
            user_prompt: prompt.as_str().to_string(),
            model_id: self.params.model_id.clone(),
            max_output_tokens: self.params.max_output_tokens,
            temperature: self.params.temperature,
        };

        let (completion, error, raw_text) = match self.provider.complete(&request).await {
            Ok(completion) => {
                let text = completion.text.clone();
                (Some(completion), None, text)
            }
            Err(e) => {
                warn!(provider = self.provider.name(), error = %e, "[pipeline] Provider call failed");
                let text = failure_text(&e, &prompt, on_failure);
                (None, Some(e), text)
            }
        };

        info!(
            postprocessor = stages.postprocessor.name(),
            "[pipeline] Postprocessing reply"
        );
        let output = stages.postprocessor.process(&raw_text);

        PipelineRun {
            context,
            prompt,
            completion,
            error,
            raw_text,
            output,
        }
    }
}

fn failure_text(error: &ProviderError, prompt: &PromptText, policy: FailurePolicy) -> String {
    match policy {
        FailurePolicy::UserMessage => error.user_message(prompt.as_str()),
        FailurePolicy::ErrorText => format!("Error: {error}"),
    }
}
