//! Metaphor analysis for consciousness-theory classification of artwork descriptions.
//!
//! Pipeline:
//!
//! ```text
//!   text ──► semantic field scorer ──► candidate theories (+ relevance)
//!                                          │
//!                    ┌─────────────────────┴─────────────────────┐
//!                    ▼                                           ▼
//!            level detector                             type classifier
//!   (explicit / scientific / meta / nested)  (ontological / structural / ...)
//!                    └─────────────────────┬─────────────────────┘
//!                                          ▼
//!                               weight calculator
//!                                          ▼
//!                           evidence records (ordered)
//!                                          ▼
//!                        metaphor network analysis
//!        (clusters, meta-metaphor flag, dominant theory, hybrid set)
//! ```
//!
//! Everything here is pure and synchronous. The [`Ontology`] is an immutable value
//! shared by reference, so one [`MetaphorAnalyzer`] can serve any number of threads.
//! A meta-metaphor (an artistic reinterpretation of a scientific metaphor) is the
//! signal this crate cares most about; see [`MetaphorLevel::MetaMetaphor`].

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub mod detection;
pub mod error;
pub mod evidence;
pub mod hints;
pub mod network;
pub mod ontology;
pub mod prompt;
pub mod semantic_field;
pub mod taxonomy;
pub mod theory;

pub use detection::{detect_metaphor_level, determine_metaphor_type};
pub use error::{AnalysisError, OntologyError};
pub use evidence::{extract_metaphors, MetaphorEvidence, EVIDENCE_SCORE_FLOOR, TARGET_DOMAIN};
pub use hints::{truncate_chars, EvidencePreview, MetaphorHints};
pub use network::{analyze_metaphor_network, MetaphorCluster, NetworkAnalysis, HYBRID_WEIGHT_THRESHOLD};
pub use ontology::{DomainEntry, Ontology, TypeMarkers};
pub use prompt::{enhance_system_prompt, generate_prompt_section, RESPONSE_FORMAT_MARKER};
pub use semantic_field::{identify_semantic_field, SemanticField};
pub use taxonomy::{calculate_metaphor_weight, MetaphorLevel, MetaphorType, DEFAULT_CONTEXT_RELEVANCE};
pub use theory::{Theory, UnknownTheory};

// ============================================================================
// Analyzer
// ============================================================================

/// Evidence and network verdict for one text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextAnalysis {
    pub evidence: Vec<MetaphorEvidence>,
    pub network: NetworkAnalysis,
}

impl TextAnalysis {
    pub fn hints(&self) -> MetaphorHints {
        MetaphorHints::from_analysis(&self.evidence, &self.network)
    }
}

/// Entry point bundling an ontology with the analysis operations.
#[derive(Debug, Clone)]
pub struct MetaphorAnalyzer {
    ontology: Arc<Ontology>,
}

impl MetaphorAnalyzer {
    pub fn new(ontology: Ontology) -> Self {
        Self {
            ontology: Arc::new(ontology),
        }
    }

    /// Share an ontology already held elsewhere.
    pub fn with_shared(ontology: Arc<Ontology>) -> Self {
        Self { ontology }
    }

    pub fn ontology(&self) -> &Ontology {
        &self.ontology
    }

    pub fn identify_semantic_field(&self, text: &str) -> Vec<SemanticField> {
        identify_semantic_field(&self.ontology, text)
    }

    /// Level detection against one theory's domain; `None` when the ontology has no
    /// domain for `theory`.
    pub fn detect_metaphor_level(&self, text: &str, theory: Theory) -> Option<(MetaphorLevel, String)> {
        self.ontology
            .domain(theory)
            .map(|domain| detect_metaphor_level(text, domain))
    }

    pub fn determine_metaphor_type(&self, text: &str, span: &str) -> MetaphorType {
        determine_metaphor_type(self.ontology.markers(), text, span)
    }

    pub fn extract_metaphors(&self, text: &str) -> Vec<MetaphorEvidence> {
        extract_metaphors(&self.ontology, text)
    }

    /// Extraction at a dynamic boundary: anything but a JSON string is rejected.
    pub fn extract_metaphors_value(
        &self,
        value: &serde_json::Value,
    ) -> Result<Vec<MetaphorEvidence>, AnalysisError> {
        match value {
            serde_json::Value::String(text) => Ok(self.extract_metaphors(text)),
            serde_json::Value::Null => Err(AnalysisError::InvalidInput("null")),
            serde_json::Value::Bool(_) => Err(AnalysisError::InvalidInput("a boolean")),
            serde_json::Value::Number(_) => Err(AnalysisError::InvalidInput("a number")),
            serde_json::Value::Array(_) => Err(AnalysisError::InvalidInput("an array")),
            serde_json::Value::Object(_) => Err(AnalysisError::InvalidInput("an object")),
        }
    }

    pub fn analyze_metaphor_network(&self, evidence: &[MetaphorEvidence]) -> NetworkAnalysis {
        analyze_metaphor_network(evidence)
    }

    /// Extraction followed by network analysis.
    pub fn analyze(&self, text: &str) -> TextAnalysis {
        let evidence = self.extract_metaphors(text);
        let network = analyze_metaphor_network(&evidence);
        TextAnalysis { evidence, network }
    }

    /// Hint payload for the LLM adjudicator.
    pub fn pre_analyze(&self, text: &str) -> MetaphorHints {
        self.analyze(text).hints()
    }

    /// Analyze many texts in parallel; output order matches input order.
    pub fn analyze_batch<S>(&self, texts: &[S]) -> Vec<TextAnalysis>
    where
        S: AsRef<str> + Sync,
    {
        texts.par_iter().map(|t| self.analyze(t.as_ref())).collect()
    }
}

impl Default for MetaphorAnalyzer {
    fn default() -> Self {
        Self::new(Ontology::builtin())
    }
}
