//! # Prompt Assembly
//!
//! Literal placeholder substitution for the prompt templates in `prompts::tasks`.
//! There is no conditional logic: every recognized placeholder is replaced by the
//! string form of its field, and everything else in the template is kept verbatim.

use crate::types::{EmergencyQuery, ExtractedContext, PromptText};

pub const USER_QUERY: &str = "[user_query]";
pub const LANGUAGE: &str = "[language]";
pub const LOCATION_CONTEXT: &str = "[location_context]";
pub const EXTRACTED_ENTITIES: &str = "[extracted_entities]";
pub const EMERGENCY_TYPE: &str = "[emergency_type]";
pub const DETECTED_INTENT: &str = "[detected_intent]";

/// Every placeholder `assemble` knows how to fill.
pub const PLACEHOLDERS: [&str; 6] = [
    USER_QUERY,
    LANGUAGE,
    LOCATION_CONTEXT,
    EXTRACTED_ENTITIES,
    EMERGENCY_TYPE,
    DETECTED_INTENT,
];

/// Substituted for context fields that were not extracted.
pub const NOT_SPECIFIED: &str = "not specified";

/// Fills `template` from the query and the optional extracted context.
///
/// Missing context substitutes `[]` for the location list and `not specified`
/// for the categorical fields. Unknown bracketed text is left untouched.
pub fn assemble(
    template: &str,
    query: &EmergencyQuery,
    context: Option<&ExtractedContext>,
) -> PromptText {
    let locations = context
        .map(|c| format_locations(&c.locations))
        .unwrap_or_else(|| "[]".to_string());
    let emergency_type = context
        .and_then(|c| c.emergency_type)
        .map(|t| t.label())
        .unwrap_or(NOT_SPECIFIED);
    let detected_intent = context
        .and_then(|c| c.detected_intent)
        .map(|i| i.label())
        .unwrap_or(NOT_SPECIFIED);

    // The query is substituted last so placeholder-like text typed by a caller
    // is never expanded.
    let text = template
        .replace(LANGUAGE, query.language().as_str())
        .replace(LOCATION_CONTEXT, query.region())
        .replace(EXTRACTED_ENTITIES, &locations)
        .replace(EMERGENCY_TYPE, emergency_type)
        .replace(DETECTED_INTENT, detected_intent)
        .replace(USER_QUERY, query.text());

    PromptText::new(text)
}

/// Renders the locations as a JSON array, keeping non-ASCII text readable.
fn format_locations(locations: &[String]) -> String {
    let quoted: Vec<String> = locations
        .iter()
        .map(|l| serde_json::Value::String(l.clone()).to_string())
        .collect();
    format!("[{}]", quoted.join(", "))
}
