//! # Core Data Types
//!
//! Value types that flow through the guidance pipeline: the validated query, the
//! context a preprocessor extracts from it, the assembled prompt and the shapes
//! a postprocessor can produce.

use crate::{constants::DEFAULT_REGION, errors::GuidanceError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The language guidance is produced in. Only Thai is deployed.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Language {
    #[default]
    Thai,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Thai => "Thai",
        }
    }
}

/// A caller's description of an emergency.
///
/// Construction guarantees the text is non-empty once trimmed.
#[derive(Debug, Clone, PartialEq)]
pub struct EmergencyQuery {
    text: String,
    language: Language,
    region: String,
}

impl EmergencyQuery {
    pub fn new(text: impl Into<String>) -> Result<Self, GuidanceError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(GuidanceError::InvalidInput(
                "query text must be a non-empty string".to_string(),
            ));
        }
        Ok(Self {
            text,
            language: Language::Thai,
            region: DEFAULT_REGION.to_string(),
        })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn region(&self) -> &str {
        &self.region
    }
}

/// The categorical emergency type detected by the entity preprocessor.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmergencyType {
    Fire,
    #[serde(rename = "Traffic Accident")]
    TrafficAccident,
    Unknown,
}

impl EmergencyType {
    pub fn label(&self) -> &'static str {
        match self {
            EmergencyType::Fire => "Fire",
            EmergencyType::TrafficAccident => "Traffic Accident",
            EmergencyType::Unknown => "Unknown",
        }
    }
}

/// The request intent detected by the intent preprocessor.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    Guidance,
    OperatorScript,
    FacilityFinding,
}

impl Intent {
    pub fn label(&self) -> &'static str {
        match self {
            Intent::Guidance => "guidance",
            Intent::OperatorScript => "operator_script",
            Intent::FacilityFinding => "facility_finding",
        }
    }
}

/// Entities and intent pulled out of a raw query by a `Preprocessor`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct ExtractedContext {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub locations: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emergency_type: Option<EmergencyType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detected_intent: Option<Intent>,
    pub raw_query: String,
}

impl ExtractedContext {
    pub fn from_query(query: &str) -> Self {
        Self {
            raw_query: query.to_string(),
            ..Default::default()
        }
    }
}

/// The exact text sent to a provider.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(transparent)]
pub struct PromptText(String);

impl PromptText {
    pub fn new(text: String) -> Self {
        Self(text)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PromptText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// How the assessment section of a sectioned reply was classified.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AssessmentStatus {
    Yes,
    No,
    /// The section was present but did not start with YES or NO.
    Ambiguous,
    Missing,
}

/// The structured result of parsing a sectioned reply.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SectionedGuidance {
    pub is_emergency: bool,
    pub assessment: AssessmentStatus,
    pub assessment_reasoning_en: String,
    pub guidance_thai: Option<Vec<String>>,
    pub guidance_reasoning_thai: Option<String>,
    pub raw_output: String,
}

/// Guidance returned as cleaned plain text.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct PlainGuidance {
    pub guidance: String,
}

/// Step-oriented output derived from a free-text reply.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct StructuredSteps {
    pub summary: String,
    pub guidance_steps: Vec<String>,
    pub suggested_actions_thai: Vec<String>,
}

/// Any output a `Postprocessor` can produce.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum ProcessedOutput {
    Raw(String),
    Plain(PlainGuidance),
    Steps(StructuredSteps),
    Sectioned(SectionedGuidance),
}
