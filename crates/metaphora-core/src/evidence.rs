//! Evidence records and their extraction from a single text.

use serde::{Deserialize, Serialize};

use crate::detection::{detect_metaphor_level, determine_metaphor_type};
use crate::semantic_field::identify_semantic_field;
use crate::taxonomy::calculate_metaphor_weight;
use crate::{MetaphorLevel, MetaphorType, Ontology, Theory};

/// Semantic-field scores below this produce no evidence.
pub const EVIDENCE_SCORE_FLOOR: f64 = 0.2;

/// Target domain of every metaphor this crate detects.
pub const TARGET_DOMAIN: &str = "consciousness";

/// One piece of metaphor evidence for a theory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetaphorEvidence {
    /// Matched keyword or phrase.
    pub span: String,
    #[serde(rename = "theory_class")]
    pub theory: Theory,
    pub level: MetaphorLevel,
    #[serde(rename = "type")]
    pub metaphor_type: MetaphorType,
    /// Bounded evidence weight in `[0, 1]`.
    pub weight: f64,
    pub semantic_field: String,
    pub source_domain: String,
    pub target_domain: String,
    pub reasoning: String,
}

/// Extract metaphor evidence from `text`.
///
/// Records follow the order of [`identify_semantic_field`]: descending field score,
/// ontology order on ties. Empty or unmatched text yields no records.
pub fn extract_metaphors(ontology: &Ontology, text: &str) -> Vec<MetaphorEvidence> {
    let mut evidence = Vec::new();

    for field in identify_semantic_field(ontology, text) {
        if field.score < EVIDENCE_SCORE_FLOOR {
            continue;
        }
        let Some(domain) = ontology.domain(field.theory) else {
            continue;
        };

        let (level, span) = detect_metaphor_level(text, domain);
        if span.is_empty() && level == MetaphorLevel::NestedMetaphor {
            continue;
        }

        let metaphor_type = determine_metaphor_type(ontology.markers(), text, &span);
        let weight = calculate_metaphor_weight(level, metaphor_type, field.score);
        let source_domain = field.label.split(',').next().unwrap_or_default().to_string();

        tracing::debug!(
            theory = %field.theory,
            level = %level,
            metaphor_type = %metaphor_type,
            weight,
            "metaphor evidence"
        );

        evidence.push(MetaphorEvidence {
            span,
            theory: field.theory,
            level,
            metaphor_type,
            weight,
            reasoning: format!("{} в {} контексте", level, metaphor_type),
            semantic_field: field.label,
            source_domain,
            target_domain: TARGET_DOMAIN.to_string(),
        });
    }

    evidence
}
