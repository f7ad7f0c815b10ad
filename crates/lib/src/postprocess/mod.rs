//! # Postprocessors
//!
//! Turn a provider's raw reply into the shape returned to a caller or logged by the
//! experiment runner.

pub mod sections;

pub use sections::{parse_sectioned, split_sections, Sections};

use crate::{
    constants::DISALLOWED_EMPHASIS,
    types::{PlainGuidance, ProcessedOutput, StructuredSteps},
};
use tracing::debug;

pub trait Postprocessor: Send + Sync {
    /// A stable name, logged as the version's postprocessing step.
    fn name(&self) -> &'static str;

    /// One-line description of the output shape.
    fn description(&self) -> &'static str;

    fn process(&self, raw: &str) -> ProcessedOutput;
}

/// Returns the reply unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct RawPostprocessor;

impl Postprocessor for RawPostprocessor {
    fn name(&self) -> &'static str {
        "postprocess_raw"
    }

    fn description(&self) -> &'static str {
        "Returns the provider reply unchanged."
    }

    fn process(&self, raw: &str) -> ProcessedOutput {
        ProcessedOutput::Raw(raw.to_string())
    }
}

/// Strips emphasis markers and returns the text under a single `guidance` field.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainPostprocessor;

impl Postprocessor for PlainPostprocessor {
    fn name(&self) -> &'static str {
        "postprocess_plain"
    }

    fn description(&self) -> &'static str {
        "Strips emphasis markers and returns {guidance}."
    }

    fn process(&self, raw: &str) -> ProcessedOutput {
        ProcessedOutput::Plain(clean_plain(raw))
    }
}

/// Splits `Step N:` lines into numbered actions and collects emergency numbers.
#[derive(Debug, Clone, Copy, Default)]
pub struct StepsPostprocessor;

impl Postprocessor for StepsPostprocessor {
    fn name(&self) -> &'static str {
        "postprocess_structured_output"
    }

    fn description(&self) -> &'static str {
        "Summary, numbered actions and suggested Thai emergency calls."
    }

    fn process(&self, raw: &str) -> ProcessedOutput {
        ProcessedOutput::Steps(structure_steps(raw))
    }
}

/// Parses the three-section reply format.
#[derive(Debug, Clone, Copy, Default)]
pub struct SectionedPostprocessor;

impl Postprocessor for SectionedPostprocessor {
    fn name(&self) -> &'static str {
        "postprocess_section_parser"
    }

    fn description(&self) -> &'static str {
        "Parses assessment, Thai guidance and Thai reasoning sections."
    }

    fn process(&self, raw: &str) -> ProcessedOutput {
        ProcessedOutput::Sectioned(parse_sectioned(raw))
    }
}

/// The plain form: no structural parsing, emphasis markers removed.
pub fn clean_plain(raw: &str) -> PlainGuidance {
    let guidance: String = raw.chars().filter(|c| *c != DISALLOWED_EMPHASIS).collect();
    PlainGuidance {
        guidance: guidance.trim().to_string(),
    }
}

pub fn structure_steps(raw: &str) -> StructuredSteps {
    debug!("Structuring reply into steps");
    let summary = raw.split('.').next().unwrap_or(raw).to_string();

    let guidance_steps = if raw.contains("Step 1:") {
        raw.split("Step")
            .skip(1)
            .map(str::trim)
            .enumerate()
            .map(|(i, step)| {
                let action = step.split(':').nth(1).map(str::trim).unwrap_or(step);
                format!("Action {}: {action}", i + 1)
            })
            .collect()
    } else {
        vec!["Refer to raw response.".to_string()]
    };

    let lower = raw.to_lowercase();
    let mut suggested_actions_thai = Vec::new();
    if lower.contains("call 191") {
        suggested_actions_thai.push("โทรแจ้งตำรวจ 191".to_string());
    }
    if lower.contains("call 1669") {
        suggested_actions_thai.push("โทรเรียกรถพยาบาล 1669".to_string());
    }

    StructuredSteps {
        summary,
        guidance_steps,
        suggested_actions_thai,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_plain_removes_every_marker() {
        let cleaned = clean_plain("  **ขั้นที่ 1** *ตรวจสอบ* การหายใจ\n");
        assert_eq!(cleaned.guidance, "ขั้นที่ 1 ตรวจสอบ การหายใจ");
        assert!(!cleaned.guidance.contains('*'));
    }

    #[test]
    fn test_structure_steps() {
        let raw = "Someone collapsed. Step 1: Check breathing. Step 2: call 1669 now";
        let steps = structure_steps(raw);
        assert_eq!(steps.summary, "Someone collapsed");
        assert_eq!(
            steps.guidance_steps,
            vec![
                "Action 1: Check breathing.".to_string(),
                "Action 2: call 1669 now".to_string()
            ]
        );
        assert_eq!(steps.suggested_actions_thai, vec!["โทรเรียกรถพยาบาล 1669"]);
    }

    #[test]
    fn test_structure_steps_without_step_lines() {
        let steps = structure_steps("Stay calm and call 191");
        assert_eq!(steps.guidance_steps, vec!["Refer to raw response."]);
        assert_eq!(steps.summary, "Stay calm and call 191");
        assert_eq!(steps.suggested_actions_thai, vec!["โทรแจ้งตำรวจ 191"]);
    }
}
