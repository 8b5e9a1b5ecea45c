//! Compact pre-analysis payload handed to the LLM adjudicator.

use serde::{Deserialize, Serialize};

use crate::{MetaphorEvidence, MetaphorLevel, MetaphorType, NetworkAnalysis, Theory};

const SEMANTIC_FIELD_PREVIEW: usize = 5;
const EVIDENCE_PREVIEW: usize = 3;
const SPAN_PREVIEW_CHARS: usize = 100;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvidencePreview {
    pub theory: Theory,
    pub level: MetaphorLevel,
    #[serde(rename = "type")]
    pub metaphor_type: MetaphorType,
    pub span: String,
}

/// What the deterministic analyzer saw in a description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetaphorHints {
    pub detected_metaphors: usize,
    pub meta_metaphor_present: bool,
    pub dominant_theory: Option<Theory>,
    pub semantic_fields: Vec<String>,
    pub evidence_preview: Vec<EvidencePreview>,
}

impl MetaphorHints {
    pub fn from_analysis(evidence: &[MetaphorEvidence], network: &NetworkAnalysis) -> Self {
        Self {
            detected_metaphors: evidence.len(),
            meta_metaphor_present: network.meta_metaphor_detected,
            dominant_theory: network.dominant_pattern,
            semantic_fields: evidence
                .iter()
                .take(SEMANTIC_FIELD_PREVIEW)
                .map(|e| e.semantic_field.clone())
                .collect(),
            evidence_preview: evidence
                .iter()
                .take(EVIDENCE_PREVIEW)
                .map(|e| EvidencePreview {
                    theory: e.theory,
                    level: e.level,
                    metaphor_type: e.metaphor_type,
                    span: truncate_chars(&e.span, SPAN_PREVIEW_CHARS),
                })
                .collect(),
        }
    }
}

/// Truncate on character (not byte) boundaries; Cyrillic is multi-byte.
pub fn truncate_chars(s: &str, max_chars: usize) -> String {
    s.chars().take(max_chars).collect()
}
