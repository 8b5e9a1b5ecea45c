//! Metaphor level detection and metaphor type classification.

use crate::semantic_field::{contains_term, phrase_token_hits};
use crate::{DomainEntry, MetaphorLevel, MetaphorType, TypeMarkers};

/// A phrase passes level detection when at least half of its tokens (integer floor)
/// occur in the text. One-token phrases therefore pass with zero hits and two-token
/// phrases with one.
fn half_tokens_present(phrase: &str, text_lower: &str) -> bool {
    let (hits, total) = phrase_token_hits(phrase, text_lower);
    hits >= total / 2
}

/// Determine the metaphor level `text` exhibits for one domain.
///
/// First match wins, in order: keyword, scientific metaphor, artistic
/// transformation. Falls through to [`MetaphorLevel::NestedMetaphor`] with an empty
/// span, which callers treat as "no concrete evidence".
pub fn detect_metaphor_level(text: &str, domain: &DomainEntry) -> (MetaphorLevel, String) {
    let text_lower = text.to_lowercase();

    if let Some(keyword) = domain
        .keywords
        .iter()
        .find(|k| contains_term(&text_lower, k))
    {
        return (MetaphorLevel::ExplicitTerm, keyword.clone());
    }

    if let Some(phrase) = domain
        .scientific_metaphors
        .iter()
        .find(|p| half_tokens_present(p, &text_lower))
    {
        return (MetaphorLevel::ScientificMetaphor, phrase.clone());
    }

    if let Some(phrase) = domain
        .artistic_transformations
        .iter()
        .find(|p| half_tokens_present(p, &text_lower))
    {
        return (MetaphorLevel::MetaMetaphor, phrase.clone());
    }

    (MetaphorLevel::NestedMetaphor, String::new())
}

/// Classify what a detected metaphor is about.
///
/// Ontological markers are looked up in the whole text: consciousness vocabulary
/// anywhere in the passage marks the metaphor as being about the mind. Structural
/// and orientational markers must occur in the span itself.
pub fn determine_metaphor_type(markers: &TypeMarkers, text: &str, span: &str) -> MetaphorType {
    let text_lower = text.to_lowercase();
    let span_lower = span.to_lowercase();

    let any_in = |haystack: &str, list: &[String]| list.iter().any(|m| contains_term(haystack, m));

    if any_in(&text_lower, &markers.ontological) {
        MetaphorType::Ontological
    } else if any_in(&span_lower, &markers.structural) {
        MetaphorType::Structural
    } else if any_in(&span_lower, &markers.orientational) {
        MetaphorType::Orientational
    } else {
        MetaphorType::Decorative
    }
}
