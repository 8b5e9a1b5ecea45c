//! Metaphor levels, metaphor types, and the evidence weight they combine into.
//!
//! Levels escalate from literal terminology to layered figurative language; types
//! describe what a metaphor is *about*. Both carry a fixed numeric factor, and the
//! evidence weight is their product scaled by the semantic-field relevance.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Level of metaphorical expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetaphorLevel {
    /// Direct theoretical term
    ExplicitTerm,
    /// Metaphor from scientific discourse ("brain as computer")
    ScientificMetaphor,
    /// Artistic reinterpretation of a scientific metaphor
    MetaMetaphor,
    /// Layered transformation with no concrete lexical anchor
    NestedMetaphor,
}

impl MetaphorLevel {
    pub const ALL: [MetaphorLevel; 4] = [
        MetaphorLevel::ExplicitTerm,
        MetaphorLevel::ScientificMetaphor,
        MetaphorLevel::MetaMetaphor,
        MetaphorLevel::NestedMetaphor,
    ];

    /// Base evidence weight. Meta-metaphors outrank bare scientific metaphors.
    pub const fn base_weight(self) -> f64 {
        match self {
            MetaphorLevel::ExplicitTerm => 1.0,
            MetaphorLevel::ScientificMetaphor => 0.7,
            MetaphorLevel::MetaMetaphor => 0.8,
            MetaphorLevel::NestedMetaphor => 0.5,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MetaphorLevel::ExplicitTerm => "explicit_term",
            MetaphorLevel::ScientificMetaphor => "scientific_metaphor",
            MetaphorLevel::MetaMetaphor => "meta_metaphor",
            MetaphorLevel::NestedMetaphor => "nested_metaphor",
        }
    }
}

impl fmt::Display for MetaphorLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rhetorical function of a metaphor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetaphorType {
    /// About the nature of mind/consciousness
    Ontological,
    /// About structure/architecture
    Structural,
    /// About spatial/temporal relations
    Orientational,
    /// Aesthetic only
    Decorative,
}

impl MetaphorType {
    pub const ALL: [MetaphorType; 4] = [
        MetaphorType::Ontological,
        MetaphorType::Structural,
        MetaphorType::Orientational,
        MetaphorType::Decorative,
    ];

    /// Weight multiplier. Decorative metaphors are cut to a minor fraction.
    pub const fn multiplier(self) -> f64 {
        match self {
            MetaphorType::Ontological => 1.2,
            MetaphorType::Structural => 1.0,
            MetaphorType::Orientational => 0.8,
            MetaphorType::Decorative => 0.3,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MetaphorType::Ontological => "ontological",
            MetaphorType::Structural => "structural",
            MetaphorType::Orientational => "orientational",
            MetaphorType::Decorative => "decorative",
        }
    }
}

impl fmt::Display for MetaphorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Relevance used when the caller has no semantic-field score.
pub const DEFAULT_CONTEXT_RELEVANCE: f64 = 1.0;

/// Combine level, type and field relevance into an evidence weight in `[0, 1]`.
pub fn calculate_metaphor_weight(
    level: MetaphorLevel,
    metaphor_type: MetaphorType,
    context_relevance: f64,
) -> f64 {
    let weight = level.base_weight() * metaphor_type.multiplier() * context_relevance;
    if weight.is_nan() {
        return 0.0;
    }
    weight.min(1.0).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn meta_metaphor_outweighs_scientific_metaphor() {
        assert!(
            MetaphorLevel::MetaMetaphor.base_weight()
                > MetaphorLevel::ScientificMetaphor.base_weight()
        );
    }

    #[test]
    fn weight_is_product_of_factors() {
        let w = calculate_metaphor_weight(
            MetaphorLevel::ScientificMetaphor,
            MetaphorType::Orientational,
            0.5,
        );
        assert_relative_eq!(w, 0.7 * 0.8 * 0.5, epsilon = 1e-12);
    }

    #[test]
    fn weight_is_capped_at_one() {
        let w = calculate_metaphor_weight(
            MetaphorLevel::ExplicitTerm,
            MetaphorType::Ontological,
            DEFAULT_CONTEXT_RELEVANCE,
        );
        assert_eq!(w, 1.0);
    }

    #[test]
    fn negative_or_nan_relevance_floors_at_zero() {
        let w = calculate_metaphor_weight(MetaphorLevel::ExplicitTerm, MetaphorType::Structural, -3.0);
        assert_eq!(w, 0.0);
        let w = calculate_metaphor_weight(
            MetaphorLevel::ExplicitTerm,
            MetaphorType::Structural,
            f64::NAN,
        );
        assert_eq!(w, 0.0);
    }

    #[test]
    fn levels_and_types_serialize_snake_case() {
        assert_eq!(
            serde_json::to_string(&MetaphorLevel::MetaMetaphor).unwrap(),
            "\"meta_metaphor\""
        );
        assert_eq!(
            serde_json::to_string(&MetaphorType::Orientational).unwrap(),
            "\"orientational\""
        );
    }
}
