//! Semantic field scoring.
//!
//! Every domain of the ontology is scanned against the lower-cased text and
//! accumulates a relevance score from three sources:
//!
//! | source                       | rule                         | contribution            |
//! |------------------------------|------------------------------|-------------------------|
//! | keyword                      | verbatim substring           | `+0.15` each            |
//! | scientific metaphor phrase   | `>= 2` tokens present        | `0.3 * matched / total` |
//! | artistic transformation      | `>= 2` tokens present        | `0.5 * matched / total` |
//!
//! Scores are capped at `1.0`; theories that score nothing are dropped.

use serde::{Deserialize, Serialize};

use crate::{Ontology, Theory};

pub const KEYWORD_SCORE: f64 = 0.15;
pub const SCIENTIFIC_PHRASE_SCORE: f64 = 0.3;
pub const ARTISTIC_PHRASE_SCORE: f64 = 0.5;
/// Minimum number of phrase tokens that must occur for a phrase to score.
pub const MIN_PHRASE_TOKEN_HITS: usize = 2;
/// Matched items shown in a field label.
pub const LABEL_PREVIEW_LEN: usize = 3;

/// Relevance of one theory's semantic field to a text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SemanticField {
    pub theory: Theory,
    /// Accumulated relevance in `(0, 1]`.
    pub score: f64,
    /// Up to three matched keywords/phrases, comma-joined.
    pub label: String,
}

/// Token hit count of a phrase against an already lower-cased text.
///
/// Tokens are whitespace-delimited and matched as substrings anywhere in the text,
/// not as whole words.
pub(crate) fn phrase_token_hits(phrase: &str, text_lower: &str) -> (usize, usize) {
    let phrase_lower = phrase.to_lowercase();
    let tokens: Vec<&str> = phrase_lower.split_whitespace().collect();
    let hits = tokens.iter().filter(|t| text_lower.contains(*t)).count();
    (hits, tokens.len())
}

pub(crate) fn contains_term(text_lower: &str, term: &str) -> bool {
    text_lower.contains(&term.to_lowercase())
}

/// Score every domain of `ontology` against `text`.
///
/// Output is sorted by descending score; equal scores keep ontology order.
pub fn identify_semantic_field(ontology: &Ontology, text: &str) -> Vec<SemanticField> {
    let text_lower = text.to_lowercase();
    let mut fields = Vec::new();

    for domain in ontology.domains() {
        let mut score = 0.0;
        let mut matched: Vec<&str> = Vec::new();

        for keyword in &domain.keywords {
            if contains_term(&text_lower, keyword) {
                score += KEYWORD_SCORE;
                matched.push(keyword);
            }
        }

        for (phrases, phrase_score) in [
            (&domain.scientific_metaphors, SCIENTIFIC_PHRASE_SCORE),
            (&domain.artistic_transformations, ARTISTIC_PHRASE_SCORE),
        ] {
            for phrase in phrases {
                let (hits, total) = phrase_token_hits(phrase, &text_lower);
                if hits >= MIN_PHRASE_TOKEN_HITS {
                    score += phrase_score * (hits as f64 / total as f64);
                    matched.push(phrase);
                }
            }
        }

        if score > 0.0 {
            fields.push(SemanticField {
                theory: domain.theory,
                score: score.min(1.0),
                label: matched
                    .iter()
                    .take(LABEL_PREVIEW_LEN)
                    .copied()
                    .collect::<Vec<_>>()
                    .join(", "),
            });
        }
    }

    // `sort_by` is stable, so ties stay in ontology order.
    fields.sort_by(|a, b| b.score.total_cmp(&a.score));
    tracing::debug!(candidates = fields.len(), "semantic fields scored");
    fields
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DomainEntry, TypeMarkers};
    use approx::assert_relative_eq;

    fn single(entry: DomainEntry) -> Ontology {
        Ontology::new(vec![entry], TypeMarkers::default()).unwrap()
    }

    #[test]
    fn keywords_add_fixed_increment() {
        let ontology = Ontology::builtin();
        let fields = identify_semantic_field(&ontology, "Рой и синергия");
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].theory, Theory::Emerg);
        assert_relative_eq!(fields[0].score, 0.30, epsilon = 1e-12);
        assert_eq!(fields[0].label, "рой, синергия");
    }

    #[test]
    fn phrase_needs_two_token_hits() {
        let ontology = single(DomainEntry::new(
            Theory::Gwt,
            &[],
            &["внимание как прожектор"],
            &[],
        ));
        assert!(identify_semantic_field(&ontology, "прожектор в темноте").is_empty());

        let fields = identify_semantic_field(&ontology, "прожектор как луч");
        assert_eq!(fields.len(), 1);
        assert_relative_eq!(fields[0].score, 0.3 * 2.0 / 3.0, epsilon = 1e-12);
    }

    #[test]
    fn single_token_phrase_never_scores() {
        let ontology = single(DomainEntry::new(Theory::Pan, &[], &["гилозоизм"], &["анимизм"]));
        assert!(identify_semantic_field(&ontology, "гилозоизм и анимизм").is_empty());
    }

    #[test]
    fn artistic_phrases_weigh_more_than_scientific() {
        let ontology = single(DomainEntry::new(
            Theory::Enact,
            &[],
            &["познание как действие"],
            &["движение как познание"],
        ));
        // Both phrases hit all three tokens.
        let fields = identify_semantic_field(&ontology, "познание как действие, движение");
        assert_relative_eq!(fields[0].score, 0.3 + 0.5, epsilon = 1e-12);
    }

    #[test]
    fn score_is_capped_and_label_truncated() {
        let text = "алгоритм, вычисление, процессор, программа, input, output, обработка, \
                    computation, function";
        let fields = identify_semantic_field(&Ontology::builtin(), text);
        let comp = fields.iter().find(|f| f.theory == Theory::Comp).unwrap();
        assert_eq!(comp.score, 1.0);
        assert_eq!(comp.label, "алгоритм, вычисление, процессор");
    }

    #[test]
    fn sorted_descending_with_stable_ties() {
        // COMP and PRED both score exactly 0.30; IIT scores 0.45.
        let text = "алгоритм, программа, предсказание, ошибка, квалиа, phi, интеграция";
        let fields = identify_semantic_field(&Ontology::builtin(), text);
        let order: Vec<Theory> = fields.iter().map(|f| f.theory).collect();
        assert_eq!(order, vec![Theory::Iit, Theory::Comp, Theory::Pred]);
    }

    #[test]
    fn matching_is_case_insensitive() {
        let fields = identify_semantic_field(&Ontology::builtin(), "SWARM EMERGENCE");
        assert_eq!(fields[0].theory, Theory::Emerg);
        assert_relative_eq!(fields[0].score, 0.30, epsilon = 1e-12);
    }
}
