//! # Experiment Runner
//!
//! Runs every scenario through one version's pipeline, strictly in order, and
//! records the results in the tracking store.

use crate::{
    registry::VersionConfig,
    scenarios::scenario_id,
    tracking::{FileTrackingStore, RunStatus, TrackedRun},
};
use anyhow::Result;
use bystander::{
    providers::ai::AiProvider, EmergencyQuery, FailurePolicy, GuidancePipeline, ProcessedOutput,
    ProviderError,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, info, warn};

const PROMPTS_ARTIFACT_PATH: &str = "version_setup/prompts";
const SCRIPTS_ARTIFACT_PATH: &str = "version_setup/scripts";
const SCENARIO_RESULTS_FILE: &str = "scenario_results.json";

/// Everything recorded for one scenario of a run.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ScenarioResult {
    pub scenario_id: String,
    pub user_query: String,
    pub processed_input: Option<String>,
    pub actual_prompt_sent: String,
    pub claude_raw_response: String,
    pub final_bystander_output: String,
    pub input_tokens: u32,
    pub output_tokens: u32,
    pub api_error: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub run_id: String,
    pub version_key: String,
    pub scenario_count: usize,
    pub error_count: usize,
    pub total_input_tokens: u64,
    pub total_output_tokens: u64,
}

pub struct ExperimentRunner {
    provider: Box<dyn AiProvider>,
    store: FileTrackingStore,
}

impl ExperimentRunner {
    pub fn new(provider: Box<dyn AiProvider>, store: FileTrackingStore) -> Self {
        Self { provider, store }
    }

    pub fn store(&self) -> &FileTrackingStore {
        &self.store
    }

    /// Runs `scenarios` through `version` as one tracked run.
    ///
    /// Provider failures are recorded per scenario and do not stop the run. Any
    /// other failure marks the run as failed and is returned.
    pub async fn run_version(
        &self,
        version: &VersionConfig,
        scenarios: &[String],
    ) -> Result<RunSummary> {
        info!(version = version.key, scenarios = scenarios.len(), "--- Starting experiment ---");
        let mut run = self.store.start_run(version.run_name)?;

        match self.record_run(&mut run, version, scenarios).await {
            Ok(summary) => {
                run.finish(RunStatus::Finished)?;
                info!(
                    version = version.key,
                    run_id = %summary.run_id,
                    total_input_tokens = summary.total_input_tokens,
                    total_output_tokens = summary.total_output_tokens,
                    "--- Experiment complete ---"
                );
                Ok(summary)
            }
            Err(e) => {
                error!(version = version.key, "Experiment failed: {e:?}");
                run.finish(RunStatus::Failed)?;
                Err(e)
            }
        }
    }

    async fn record_run(
        &self,
        run: &mut TrackedRun,
        version: &VersionConfig,
        scenarios: &[String],
    ) -> Result<RunSummary> {
        run.set_tag("version_key", version.key)?;
        run.log_params(&version.logged_params())?;
        log_version_setup(run, version)?;

        let pipeline = GuidancePipeline::new(self.provider.clone(), version.generation_params());
        let stages = version.stages();

        let mut results = Vec::with_capacity(scenarios.len());
        let mut total_input_tokens: u64 = 0;
        let mut total_output_tokens: u64 = 0;

        for (i, user_query) in scenarios.iter().enumerate() {
            let scenario_id = scenario_id(i);
            let preview: String = user_query.chars().take(50).collect();
            info!("Processing {scenario_id}: '{preview}...' for version {}", version.key);

            let query = EmergencyQuery::new(user_query.as_str())?;
            let outcome = pipeline.run(&query, &stages, FailurePolicy::ErrorText).await;

            let api_error = outcome.error.as_ref().map(|_| outcome.raw_text.clone());
            if let Some(error) = &outcome.error {
                warn!("{scenario_id} failed at the provider: {error}");
                log_api_error(
                    run,
                    version.key,
                    &scenario_id,
                    outcome.prompt.as_str(),
                    &outcome.raw_text,
                    error,
                )?;
            }

            total_input_tokens += u64::from(outcome.input_tokens());
            total_output_tokens += u64::from(outcome.output_tokens());

            let processed_input = outcome
                .context
                .as_ref()
                .map(serde_json::to_string)
                .transpose()?;
            let final_bystander_output = match &outcome.output {
                ProcessedOutput::Raw(text) => text.clone(),
                other => serde_json::to_string_pretty(other)?,
            };

            results.push(ScenarioResult {
                scenario_id,
                user_query: user_query.clone(),
                processed_input,
                actual_prompt_sent: outcome.prompt.as_str().to_string(),
                input_tokens: outcome.input_tokens(),
                output_tokens: outcome.output_tokens(),
                claude_raw_response: outcome.raw_text,
                final_bystander_output,
                api_error,
            });
        }

        run.log_json_artifact("", SCENARIO_RESULTS_FILE, &results)?;
        run.log_metric("total_input_tokens", total_input_tokens as f64)?;
        run.log_metric("total_output_tokens", total_output_tokens as f64)?;
        for (key, value) in &version.qualitative_metrics {
            run.log_metric(key, *value)?;
        }

        Ok(RunSummary {
            run_id: run.run_id().to_string(),
            version_key: version.key.to_string(),
            scenario_count: results.len(),
            error_count: results.iter().filter(|r| r.api_error.is_some()).count(),
            total_input_tokens,
            total_output_tokens,
        })
    }
}

/// Records a provider failure as a param plus an artifact holding the failed prompt.
fn log_api_error(
    run: &mut TrackedRun,
    version_key: &str,
    scenario_id: &str,
    prompt: &str,
    error_text: &str,
    error: &ProviderError,
) -> Result<()> {
    let label = format!("{version_key}_{scenario_id}");
    run.log_param(&format!("{label}_api_error_details"), error_text)?;
    run.log_text_artifact(
        "",
        &format!("claude_api_error_{label}.txt"),
        &format!("Prompt that caused error:\n{prompt}\n\nError:\n{error}"),
    )?;
    Ok(())
}

/// Logs the template and a descriptor for each processor of the version.
fn log_version_setup(run: &TrackedRun, version: &VersionConfig) -> Result<()> {
    run.log_text_artifact(PROMPTS_ARTIFACT_PATH, version.prompt_file, version.template)?;
    for (stage, name, description) in [
        (
            "preprocessing",
            version.preprocessor.name(),
            version.preprocessor.description(),
        ),
        (
            "postprocessing",
            version.postprocessor.name(),
            version.postprocessor.description(),
        ),
    ] {
        run.log_json_artifact(
            SCRIPTS_ARTIFACT_PATH,
            &format!("{name}.json"),
            &json!({"stage": stage, "name": name, "description": description}),
        )?;
    }
    Ok(())
}
