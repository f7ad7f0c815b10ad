//! # Sectioned Reply Parser
//!
//! A sectioned reply carries three marker-delimited blocks:
//!
//! ```text
//! ===EMERGENCY ASSESSMENT===
//! YES. person choking
//! ===GUIDANCE THAI===
//! 1. ...
//! ===REASONING THAI===
//! ...
//! ```
//!
//! The scanner walks the marker hits in text order. Each section runs from the end
//! of its marker to the next marker hit, or to the end of the text. Markers match
//! ASCII case-insensitively, and only the first occurrence of each marker counts.

use crate::{
    constants::{
        ASSESSMENT_MARKER, ASSESSMENT_NOT_FOUND, GUIDANCE_MARKER, NOT_APPLICABLE,
        REASONING_MARKER,
    },
    types::{AssessmentStatus, SectionedGuidance},
};
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Assessment,
    Guidance,
    Reasoning,
}

impl Section {
    pub const ALL: [Section; 3] = [Section::Assessment, Section::Guidance, Section::Reasoning];

    pub fn marker(&self) -> &'static str {
        match self {
            Section::Assessment => ASSESSMENT_MARKER,
            Section::Guidance => GUIDANCE_MARKER,
            Section::Reasoning => REASONING_MARKER,
        }
    }
}

/// The trimmed content of each section whose marker was found. A section whose
/// marker is present but whose body is blank holds an empty string.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Sections {
    pub assessment: Option<String>,
    pub guidance: Option<String>,
    pub reasoning: Option<String>,
}

impl Sections {
    fn slot(&mut self, section: Section) -> &mut Option<String> {
        match section {
            Section::Assessment => &mut self.assessment,
            Section::Guidance => &mut self.guidance,
            Section::Reasoning => &mut self.reasoning,
        }
    }
}

/// Scanner state: outside any section, or collecting one that started at `start`.
enum ScanState {
    Outside,
    Within { section: Section, start: usize },
}

/// Splits a reply into its sections.
pub fn split_sections(raw: &str) -> Sections {
    // ASCII lowercasing keeps byte offsets identical, so positions found in
    // `lower` index straight into `raw` even for Thai text.
    let lower = raw.to_ascii_lowercase();

    let mut hits: Vec<(usize, Section)> = Vec::new();
    for section in Section::ALL {
        let marker = section.marker().to_ascii_lowercase();
        let mut from = 0;
        while let Some(pos) = lower[from..].find(&marker) {
            hits.push((from + pos, section));
            from += pos + marker.len();
        }
    }
    hits.sort_by_key(|(pos, _)| *pos);

    let mut sections = Sections::default();
    let mut seen: Vec<Section> = Vec::new();
    let mut state = ScanState::Outside;

    let close = |state: &ScanState, end: usize, sections: &mut Sections| {
        if let ScanState::Within { section, start } = *state {
            *sections.slot(section) = Some(raw[start..end].trim().to_string());
        }
    };

    for (pos, section) in hits {
        close(&state, pos, &mut sections);
        state = if seen.contains(&section) {
            debug!(marker = section.marker(), "Ignoring repeated section marker");
            ScanState::Outside
        } else {
            seen.push(section);
            ScanState::Within {
                section,
                start: pos + section.marker().len(),
            }
        };
    }
    close(&state, raw.len(), &mut sections);

    sections
}

/// Present, non-empty and not the `N/A` sentinel.
fn is_filled(content: &Option<String>) -> bool {
    content
        .as_deref()
        .is_some_and(|c| !c.is_empty() && !c.eq_ignore_ascii_case(NOT_APPLICABLE))
}

/// Strips a leading verdict word and any punctuation or whitespace after it.
///
/// The verdict must be a whole word: `NOT sure` or `Yesterday` is not a verdict.
fn strip_verdict<'a>(text: &'a str, verdict: &str) -> Option<&'a str> {
    let head = text.get(..verdict.len())?;
    if !head.eq_ignore_ascii_case(verdict) {
        return None;
    }
    let rest = &text[verdict.len()..];
    if rest.chars().next().is_some_and(char::is_alphanumeric) {
        return None;
    }
    let rest = rest.trim_start_matches(|c: char| {
        c.is_whitespace() || matches!(c, '.' | ',' | ':' | ';' | '!' | '-')
    });
    Some(rest.trim())
}

/// Classifies the assessment section.
fn classify(assessment: &str) -> (AssessmentStatus, String) {
    let text = assessment.trim_start();
    if let Some(rest) = strip_verdict(text, "YES") {
        (AssessmentStatus::Yes, rest.to_string())
    } else if let Some(rest) = strip_verdict(text, "NO") {
        (AssessmentStatus::No, rest.to_string())
    } else {
        (
            AssessmentStatus::Ambiguous,
            format!("Warning: Could not parse YES/NO from assessment: {assessment}"),
        )
    }
}

/// Parses a sectioned reply into a `SectionedGuidance`.
///
/// Never fails. A missing assessment marker means "not an emergency". An assessment
/// that is blank or neither YES nor NO is ambiguous, and counts as an emergency when
/// guidance or reasoning was provided. An explicit NO always wins, and guidance
/// found alongside it is dropped.
pub fn parse_sectioned(raw: &str) -> SectionedGuidance {
    let sections = split_sections(raw);

    let (assessment, assessment_reasoning_en) = match sections.assessment.as_deref() {
        Some(text) => classify(text),
        None => (AssessmentStatus::Missing, ASSESSMENT_NOT_FOUND.to_string()),
    };

    let has_guidance = is_filled(&sections.guidance);
    let has_reasoning = is_filled(&sections.reasoning);

    let is_emergency = match assessment {
        AssessmentStatus::Yes => true,
        AssessmentStatus::No | AssessmentStatus::Missing => false,
        AssessmentStatus::Ambiguous => {
            let inferred = has_guidance || has_reasoning;
            if inferred {
                warn!("Assessment unclear, inferring an emergency from the guidance/reasoning sections.");
            } else {
                warn!("Assessment unclear and no guidance provided; treating as not an emergency.");
            }
            inferred
        }
    };

    let mut guidance_thai = None;
    let mut guidance_reasoning_thai = None;

    if is_emergency {
        if has_guidance {
            let steps: Vec<String> = sections
                .guidance
                .as_deref()
                .unwrap_or_default()
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(String::from)
                .collect();
            if !steps.is_empty() {
                guidance_thai = Some(steps);
            }
        }
        if has_reasoning {
            guidance_reasoning_thai = sections.reasoning.clone();
        }
    } else {
        if has_guidance {
            warn!(?assessment, "Guidance found but the reply is not an emergency. Discarding guidance.");
        }
        if has_reasoning {
            warn!(?assessment, "Reasoning found but the reply is not an emergency. Discarding reasoning.");
        }
    }

    SectionedGuidance {
        is_emergency,
        assessment,
        assessment_reasoning_en,
        guidance_thai,
        guidance_reasoning_thai,
        raw_output: raw.to_string(),
    }
}
