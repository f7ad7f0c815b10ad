//! # Preprocessors
//!
//! Keyword heuristics that pull an `ExtractedContext` out of a raw query before the
//! prompt is assembled. These are deliberately simple stand-ins for real entity
//! recognition: matching is done on the lowercased text, triggers are checked in a
//! fixed priority order and the first hit wins. The same text always yields the
//! same context.

use crate::types::{EmergencyType, ExtractedContext, Intent};
use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

/// `at X Y` or `near X Y`, capturing the two words that follow.
static LOCATION_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\bat (\w+ \w+)|\bnear (\w+ \w+)").expect("location pattern is valid")
});

/// Turns a raw query into the context consumed by `prompts::assemble`.
pub trait Preprocessor: Send + Sync {
    /// A stable name, logged as the version's preprocessing step.
    fn name(&self) -> &'static str;

    /// One-line description of what the preprocessor extracts.
    fn description(&self) -> &'static str;

    fn extract(&self, query: &str) -> ExtractedContext;
}

/// Keeps the query as-is and extracts nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassthroughPreprocessor;

impl Preprocessor for PassthroughPreprocessor {
    fn name(&self) -> &'static str {
        "preprocess_minimal"
    }

    fn description(&self) -> &'static str {
        "Forwards the raw query without extraction."
    }

    fn extract(&self, query: &str) -> ExtractedContext {
        ExtractedContext::from_query(query)
    }
}

/// Detects what the caller wants: guidance, an operator script, or a facility.
#[derive(Debug, Clone, Copy, Default)]
pub struct IntentPreprocessor;

impl Preprocessor for IntentPreprocessor {
    fn name(&self) -> &'static str {
        "preprocess_intent_detection"
    }

    fn description(&self) -> &'static str {
        "Keyword intent detection: operator script, facility finding or guidance."
    }

    fn extract(&self, query: &str) -> ExtractedContext {
        let intent = detect_intent(query);
        debug!(intent = intent.label(), "Detected intent");
        ExtractedContext {
            detected_intent: Some(intent),
            ..ExtractedContext::from_query(query)
        }
    }
}

/// Extracts mentioned locations and a coarse emergency type.
#[derive(Debug, Clone, Copy, Default)]
pub struct EntityPreprocessor;

impl Preprocessor for EntityPreprocessor {
    fn name(&self) -> &'static str {
        "preprocess_entity_extraction"
    }

    fn description(&self) -> &'static str {
        "Pattern-based location extraction and keyword emergency typing."
    }

    fn extract(&self, query: &str) -> ExtractedContext {
        let locations = extract_locations(query);
        let emergency_type = detect_emergency_type(query);
        debug!(?locations, emergency_type = emergency_type.label(), "Extracted entities");
        ExtractedContext {
            locations,
            emergency_type: Some(emergency_type),
            ..ExtractedContext::from_query(query)
        }
    }
}

pub fn detect_intent(query: &str) -> Intent {
    let lower = query.to_lowercase();
    if lower.contains("operator") {
        Intent::OperatorScript
    } else if lower.contains("hospital") || lower.contains("clinic") {
        Intent::FacilityFinding
    } else {
        Intent::Guidance
    }
}

pub fn detect_emergency_type(query: &str) -> EmergencyType {
    let lower = query.to_lowercase();
    if lower.contains("fire") {
        EmergencyType::Fire
    } else if lower.contains("accident") {
        EmergencyType::TrafficAccident
    } else {
        EmergencyType::Unknown
    }
}

/// Every phrase following `at` or `near`, in order of appearance. Duplicates are kept.
pub fn extract_locations(query: &str) -> Vec<String> {
    LOCATION_PATTERN
        .captures_iter(query)
        .filter_map(|caps| caps.get(1).or_else(|| caps.get(2)))
        .map(|m| m.as_str().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
