//! # Application State
//!
//! The shared state built once at startup and handed to every request handler.
//! It is never mutated afterwards, so handlers only need shared references.

use crate::config::AppConfig;
use bystander::{
    providers::factory::{create_provider, ProviderKind},
    GenerationParams, GuidancePipeline, GuidanceService,
};
use std::sync::Arc;
use tracing::info;

/// The shared application state, accessible from all request handlers.
#[derive(Clone, Debug)]
pub struct AppState {
    /// The guidance service backed by the active provider.
    pub guidance: Arc<GuidanceService>,
}

/// Builds the shared application state from the configuration.
///
/// Instantiates the active provider and wraps it in a `GuidanceService`. A provider
/// without an API key is still built: it answers with fallback messages.
pub fn build_app_state(config: &AppConfig) -> anyhow::Result<AppState> {
    let provider_config = config.active()?;
    let kind: ProviderKind = provider_config.provider.parse()?;
    let provider = create_provider(
        kind,
        provider_config.api_url.clone(),
        provider_config.api_key.clone(),
    )?;

    info!(
        active_provider = %config.active_provider,
        model = %provider_config.model_name,
        enabled = provider.is_enabled(),
        "Guidance provider ready"
    );

    let params = GenerationParams {
        model_id: provider_config.model_name.clone(),
        max_output_tokens: provider_config.max_tokens,
        temperature: provider_config.temperature,
        system_instruction: provider_config.system_prompt.clone(),
    };
    let guidance = GuidanceService::new(GuidancePipeline::new(provider, params));

    Ok(AppState {
        guidance: Arc::new(guidance),
    })
}
