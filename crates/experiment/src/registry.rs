//! # Version Registry
//!
//! Each experiment version pairs a prompt template with a preprocessor, a
//! postprocessor and generation parameters. Versions are looked up by key
//! (e.g. `V3_App_Integrator`) and always iterate in registration order.

use anyhow::{anyhow, Result};
use bystander::{
    postprocess::{Postprocessor, RawPostprocessor, SectionedPostprocessor, StepsPostprocessor},
    preprocess::{EntityPreprocessor, IntentPreprocessor, PassthroughPreprocessor, Preprocessor},
    prompts::tasks::{
        DYNAMIC_PROMPT_V3, GENERIC_PROMPT_V1, GUIDANCE_PROMPT_V2, SECTIONED_USER_PROMPT,
    },
    providers::ai::claude::DEFAULT_CLAUDE_MODEL,
    GenerationParams, Stages,
};
use std::collections::BTreeMap;

/// Matches the Anthropic API default, which unconfigured runs relied on.
const EXPERIMENT_TEMPERATURE: f32 = 1.0;
const EXPERIMENT_MAX_TOKENS: u32 = 1024;

/// One experiment version.
pub struct VersionConfig {
    pub key: &'static str,
    pub run_name: &'static str,
    pub description: &'static str,
    /// The file name the template is logged under.
    pub prompt_file: &'static str,
    pub template: &'static str,
    pub preprocessor: &'static dyn Preprocessor,
    pub postprocessor: &'static dyn Postprocessor,
    /// Extra parameters logged with the run.
    pub params: Vec<(&'static str, &'static str)>,
    pub system_instruction: Option<&'static str>,
    /// Scores assigned to the version's strategy by a reviewer.
    pub qualitative_metrics: Vec<(&'static str, f64)>,
}

impl VersionConfig {
    pub fn stages(&self) -> Stages<'static> {
        Stages {
            template: self.template,
            preprocessor: Some(self.preprocessor),
            postprocessor: self.postprocessor,
        }
    }

    pub fn generation_params(&self) -> GenerationParams {
        GenerationParams {
            model_id: DEFAULT_CLAUDE_MODEL.to_string(),
            max_output_tokens: EXPERIMENT_MAX_TOKENS,
            temperature: EXPERIMENT_TEMPERATURE,
            system_instruction: self.system_instruction.map(String::from),
        }
    }

    /// Every parameter logged for a run of this version.
    pub fn logged_params(&self) -> BTreeMap<String, String> {
        let generation = self.generation_params();
        let mut params = BTreeMap::from([
            ("description".to_string(), self.description.to_string()),
            ("claude_model_id".to_string(), generation.model_id),
            (
                "max_tokens".to_string(),
                generation.max_output_tokens.to_string(),
            ),
            ("temperature".to_string(), generation.temperature.to_string()),
            ("prompt_template_file".to_string(), self.prompt_file.to_string()),
            (
                "preprocessing_script".to_string(),
                self.preprocessor.name().to_string(),
            ),
            (
                "postprocessing_script".to_string(),
                self.postprocessor.name().to_string(),
            ),
        ]);
        for (key, value) in &self.params {
            params.insert(key.to_string(), value.to_string());
        }
        params
    }
}

pub struct VersionRegistry {
    versions: Vec<VersionConfig>,
}

impl VersionRegistry {
    /// The four built-in versions, from baseline to sectioned parsing.
    pub fn builtin() -> Self {
        let versions = vec![
            VersionConfig {
                key: "V1_Baseline",
                run_name: "ByStander_V1_Baseline_Direct_MultiScenario",
                description: "Version 1: Direct query to Claude, raw output, tested on multiple scenarios.",
                prompt_file: "generic_prompt_template_v1.txt",
                template: GENERIC_PROMPT_V1,
                preprocessor: &PassthroughPreprocessor,
                postprocessor: &RawPostprocessor,
                params: vec![],
                system_instruction: None,
                qualitative_metrics: vec![
                    ("overall_clarity", 3.0),
                    ("overall_actionability", 2.0),
                    ("overall_thai_relevance", 2.0),
                ],
            },
            VersionConfig {
                key: "V2_Prompt_Engineer",
                run_name: "ByStander_V2_Prompt_Engineered_MultiScenario",
                description: "Version 2: Context-enhanced & role-specific prompting, tested on multiple scenarios.",
                prompt_file: "guidance_prompt_template_v2.txt",
                template: GUIDANCE_PROMPT_V2,
                preprocessor: &IntentPreprocessor,
                postprocessor: &RawPostprocessor,
                params: vec![("prompt_focus", "guidance_thai_context")],
                system_instruction: None,
                qualitative_metrics: vec![
                    ("overall_clarity", 4.0),
                    ("overall_actionability", 4.0),
                    ("overall_thai_relevance", 4.0),
                ],
            },
            VersionConfig {
                key: "V3_App_Integrator",
                run_name: "ByStander_V3_Structured_IO_MultiScenario",
                description: "Version 3: Structured I/O & application-aware logic, tested on multiple scenarios.",
                prompt_file: "dynamic_prompt_template_v3.txt",
                template: DYNAMIC_PROMPT_V3,
                preprocessor: &EntityPreprocessor,
                postprocessor: &StepsPostprocessor,
                params: vec![
                    ("location_context", "Thailand"),
                    ("app_name", "ByStander"),
                ],
                system_instruction: None,
                qualitative_metrics: vec![
                    ("overall_clarity", 5.0),
                    ("overall_actionability", 5.0),
                    ("overall_thai_relevance", 5.0),
                    ("overall_ui_suitability", 4.0),
                ],
            },
            VersionConfig {
                key: "V4_Section_Parser",
                run_name: "ByStander_V4_Section_Parser_MultiScenario",
                description: "Version 4: Emergency assessment with Thai guidance and reasoning sections, tested on multiple scenarios.",
                prompt_file: "sectioned_prompt_template_v4.txt",
                template: SECTIONED_USER_PROMPT,
                preprocessor: &EntityPreprocessor,
                postprocessor: &SectionedPostprocessor,
                params: vec![("location_context", "Thailand")],
                system_instruction: None,
                qualitative_metrics: vec![],
            },
        ];
        Self { versions }
    }

    pub fn get(&self, key: &str) -> Option<&VersionConfig> {
        self.versions.iter().find(|v| v.key == key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &VersionConfig> {
        self.versions.iter()
    }

    pub fn keys(&self) -> Vec<&'static str> {
        self.versions.iter().map(|v| v.key).collect()
    }

    /// Resolves the requested keys, or every version when none are given.
    pub fn select(&self, keys: &[String]) -> Result<Vec<&VersionConfig>> {
        if keys.is_empty() {
            return Ok(self.versions.iter().collect());
        }
        keys.iter()
            .map(|key| {
                self.get(key).ok_or_else(|| {
                    anyhow!(
                        "Unknown version '{key}'. Available: {}",
                        self.keys().join(", ")
                    )
                })
            })
            .collect()
    }
}
