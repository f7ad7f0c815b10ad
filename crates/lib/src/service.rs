//! # The Guidance Service
//!
//! `GuidanceService` is the entry point for request-level guidance operations. It
//! holds the pipeline that was built at startup and exposes one method per
//! operation, so any consumer (the HTTP server, tests, a CLI) gets identical
//! validation and sequencing.

use crate::{
    errors::GuidanceError,
    pipeline::{FailurePolicy, GuidancePipeline, Stages},
    postprocess::{clean_plain, parse_sectioned, PlainPostprocessor, SectionedPostprocessor},
    preprocess::EntityPreprocessor,
    prompts::tasks::{SECTIONED_USER_PROMPT, SENTENCE_ONLY_USER_PROMPT},
    types::{EmergencyQuery, PlainGuidance, ProcessedOutput, SectionedGuidance},
};
use tracing::info;

#[derive(Debug, Clone)]
pub struct GuidanceService {
    pipeline: GuidancePipeline,
}

impl GuidanceService {
    pub fn new(pipeline: GuidancePipeline) -> Self {
        Self { pipeline }
    }

    /// Plain step-by-step Thai guidance for a single sentence.
    ///
    /// Fails only on invalid input; a provider failure yields the Thai
    /// fallback message for that failure as the guidance text.
    pub async fn generate_sentence_only(
        &self,
        sentence: &str,
    ) -> Result<PlainGuidance, GuidanceError> {
        let query = EmergencyQuery::new(sentence)?;
        info!("[generate_sentence_only] received sentence: {:?}", query.text());

        let stages = Stages {
            template: SENTENCE_ONLY_USER_PROMPT,
            preprocessor: None,
            postprocessor: &PlainPostprocessor,
        };
        let run = self
            .pipeline
            .run(&query, &stages, FailurePolicy::UserMessage)
            .await;

        Ok(match run.output {
            ProcessedOutput::Plain(guidance) => guidance,
            _ => clean_plain(&run.raw_text),
        })
    }

    /// Sectioned guidance: emergency assessment, Thai steps and Thai reasoning.
    ///
    /// A provider failure is returned as `GuidanceError::Provider`: a canned
    /// message cannot be classified, and guidance is never invented.
    pub async fn generate_guidance(
        &self,
        sentence: &str,
    ) -> Result<SectionedGuidance, GuidanceError> {
        let query = EmergencyQuery::new(sentence)?;
        info!("[generate_guidance] received sentence: {:?}", query.text());

        let stages = Stages {
            template: SECTIONED_USER_PROMPT,
            preprocessor: Some(&EntityPreprocessor),
            postprocessor: &SectionedPostprocessor,
        };
        let run = self
            .pipeline
            .run(&query, &stages, FailurePolicy::UserMessage)
            .await;
        if let Some(source) = run.error {
            return Err(GuidanceError::Provider {
                user_message: source.user_message(run.prompt.as_str()),
                source,
            });
        }

        Ok(match run.output {
            ProcessedOutput::Sectioned(result) => result,
            _ => parse_sectioned(&run.raw_text),
        })
    }
}
