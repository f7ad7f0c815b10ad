//! # ByStander Guidance Pipeline
//!
//! This crate turns a short description of an emergency into Thai first-aid
//! guidance using a hosted LLM provider. A request flows through four stages:
//!
//! 1. an optional **preprocessor** extracts entities or intent from the query,
//! 2. the **prompt assembler** fills a template,
//! 3. an **AI provider** (Claude or DeepSeek) completes the prompt,
//! 4. a **postprocessor** turns the reply into plain or sectioned guidance.
//!
//! `GuidanceService` exposes the request-level operations used by the server,
//! and `GuidancePipeline` is shared with the offline experiment runner.

pub mod constants;
pub mod errors;
pub mod keywords;
pub mod pipeline;
pub mod postprocess;
pub mod preprocess;
pub mod prompts;
pub mod providers;
pub mod service;
pub mod types;

pub use errors::{GuidanceError, ProviderError};
pub use pipeline::{FailurePolicy, GenerationParams, GuidancePipeline, PipelineRun, Stages};
pub use service::GuidanceService;
pub use types::{
    EmergencyQuery, ExtractedContext, PlainGuidance, ProcessedOutput, PromptText,
    SectionedGuidance,
};
