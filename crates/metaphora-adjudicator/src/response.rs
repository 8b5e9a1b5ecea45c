//! Parsing of the model's JSON verdict.
//!
//! Models drift from the requested schema in small ways (lower-case tags,
//! `type` instead of `metaphor_type`, stray keys), so every field is read
//! leniently and anything unrecognised is kept in `extra`.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

use metaphora_core::Theory;

use crate::AdjudicatorError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    High,
    Medium,
    Low,
}

impl Confidence {
    pub fn as_str(&self) -> &'static str {
        match self {
            Confidence::High => "high",
            Confidence::Medium => "medium",
            Confidence::Low => "low",
        }
    }
}

/// One quoted piece of evidence as the model reported it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportedEvidence {
    #[serde(default, rename = "class", skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metaphor_level: Option<String>,
    #[serde(default, alias = "type", skip_serializing_if = "Option::is_none")]
    pub metaphor_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub span: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_f64",
        skip_serializing_if = "Option::is_none"
    )]
    pub weight: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetaphorAnalysisReport {
    #[serde(default)]
    pub meta_metaphor_detected: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dominant_semantic_field: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artistic_transformation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theoretical_grounding: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// The model's classification of one description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    #[serde(deserialize_with = "lenient_theory")]
    pub primary_class: Theory,
    #[serde(
        default,
        deserialize_with = "lenient_confidence",
        skip_serializing_if = "Option::is_none"
    )]
    pub confidence: Option<Confidence>,
    #[serde(
        default,
        deserialize_with = "lenient_scores",
        skip_serializing_if = "BTreeMap::is_empty"
    )]
    pub scores: BTreeMap<Theory, f64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub evidence: Vec<ReportedEvidence>,
    #[serde(
        default,
        deserialize_with = "lenient_optional_theory",
        skip_serializing_if = "Option::is_none"
    )]
    pub secondary_class: Option<Theory>,
    #[serde(default)]
    pub is_hybrid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metaphor_analysis: Option<MetaphorAnalysisReport>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Classification {
    /// Placeholder verdict for items that never got a usable answer.
    pub fn undetermined() -> Self {
        Self {
            primary_class: Theory::Und,
            confidence: None,
            scores: BTreeMap::new(),
            evidence: Vec::new(),
            secondary_class: None,
            is_hybrid: false,
            metaphor_analysis: None,
            notes: None,
            extra: serde_json::Map::new(),
        }
    }

    pub fn meta_metaphor_detected(&self) -> bool {
        self.metaphor_analysis
            .as_ref()
            .is_some_and(|m| m.meta_metaphor_detected)
    }
}

/// Remove a surrounding Markdown code fence, if any.
pub fn strip_code_fences(content: &str) -> &str {
    let mut s = content.trim();
    if let Some(rest) = s.strip_prefix("```json") {
        s = rest;
    } else if let Some(rest) = s.strip_prefix("```") {
        s = rest;
    }
    if let Some(rest) = s.trim_end().strip_suffix("```") {
        s = rest;
    }
    s.trim()
}

/// Parse the model's reply into a [`Classification`].
///
/// When the reply is not bare JSON, the outermost `{ ... }` block is tried
/// before giving up.
pub fn parse_classification(content: &str) -> Result<Classification, AdjudicatorError> {
    let body = strip_code_fences(content);
    match serde_json::from_str(body) {
        Ok(classification) => Ok(classification),
        Err(first_err) => {
            let start = body.find('{');
            let end = body.rfind('}');
            match (start, end) {
                (Some(start), Some(end)) if start < end => {
                    serde_json::from_str(&body[start..=end])
                        .map_err(|e| AdjudicatorError::Parse(e.to_string()))
                }
                _ => Err(AdjudicatorError::Parse(first_err.to_string())),
            }
        }
    }
}

// ============================================================================
// Lenient field readers
// ============================================================================

fn theory_from_value(value: &serde_json::Value) -> Option<Theory> {
    value.as_str().and_then(|s| s.trim().parse().ok())
}

fn lenient_theory<'de, D>(deserializer: D) -> Result<Theory, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(theory_from_value(&value).unwrap_or(Theory::Und))
}

fn lenient_optional_theory<'de, D>(deserializer: D) -> Result<Option<Theory>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(theory_from_value(&value))
}

fn lenient_confidence<'de, D>(deserializer: D) -> Result<Option<Confidence>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(value
        .as_str()
        .and_then(|s| match s.trim().to_ascii_lowercase().as_str() {
            "high" => Some(Confidence::High),
            "medium" => Some(Confidence::Medium),
            "low" => Some(Confidence::Low),
            _ => None,
        }))
}

fn lenient_scores<'de, D>(deserializer: D) -> Result<BTreeMap<Theory, f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    let mut scores = BTreeMap::new();
    if let serde_json::Value::Object(map) = value {
        for (key, score) in map {
            let theory = key.trim().parse::<Theory>().ok();
            let score = number_from_value(&score);
            if let (Some(theory), Some(score)) = (theory, score) {
                scores.insert(theory, score);
            }
        }
    }
    Ok(scores)
}

fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(number_from_value(&value))
}

fn number_from_value(value: &serde_json::Value) -> Option<f64> {
    match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
