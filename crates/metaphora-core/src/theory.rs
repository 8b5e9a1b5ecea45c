//! Consciousness-theory tags.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The closed set of theory classes an artwork description can be assigned to.
///
/// Declaration order is the canonical ontology order and drives every
/// "first encountered" tie-break downstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Theory {
    /// Computational functionalism
    #[serde(rename = "COMP")]
    Comp,
    /// Integrated information theory
    #[serde(rename = "IIT")]
    Iit,
    /// Predictive processing / free energy
    #[serde(rename = "PRED")]
    Pred,
    /// Global workspace theory
    #[serde(rename = "GWT")]
    Gwt,
    /// Enactivism / embodied cognition
    #[serde(rename = "ENACT")]
    Enact,
    /// Panpsychism
    #[serde(rename = "PAN")]
    Pan,
    /// Emergentism
    #[serde(rename = "EMERG")]
    Emerg,
    /// Undetermined
    #[serde(rename = "UND")]
    Und,
}

impl Theory {
    /// All eight tags, substantive theories first.
    pub const ALL: [Theory; 8] = [
        Theory::Comp,
        Theory::Iit,
        Theory::Pred,
        Theory::Gwt,
        Theory::Enact,
        Theory::Pan,
        Theory::Emerg,
        Theory::Und,
    ];

    /// The seven theories that can carry an ontology domain.
    pub const SUBSTANTIVE: [Theory; 7] = [
        Theory::Comp,
        Theory::Iit,
        Theory::Pred,
        Theory::Gwt,
        Theory::Enact,
        Theory::Pan,
        Theory::Emerg,
    ];

    pub fn tag(&self) -> &'static str {
        match self {
            Theory::Comp => "COMP",
            Theory::Iit => "IIT",
            Theory::Pred => "PRED",
            Theory::Gwt => "GWT",
            Theory::Enact => "ENACT",
            Theory::Pan => "PAN",
            Theory::Emerg => "EMERG",
            Theory::Und => "UND",
        }
    }

    pub fn full_name(&self) -> &'static str {
        match self {
            Theory::Comp => "Computational Functionalism",
            Theory::Iit => "Integrated Information Theory",
            Theory::Pred => "Predictive Processing / Free Energy",
            Theory::Gwt => "Global Workspace Theory",
            Theory::Enact => "Enactivism",
            Theory::Pan => "Panpsychism",
            Theory::Emerg => "Emergentism",
            Theory::Und => "Undetermined",
        }
    }

    pub fn is_substantive(&self) -> bool {
        !matches!(self, Theory::Und)
    }
}

impl fmt::Display for Theory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Error returned when a string is not one of the eight theory tags.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown theory tag: {0}")]
pub struct UnknownTheory(pub String);

impl FromStr for Theory {
    type Err = UnknownTheory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = s.trim().to_ascii_uppercase();
        Theory::ALL
            .iter()
            .copied()
            .find(|t| t.tag() == tag)
            .ok_or_else(|| UnknownTheory(s.to_string()))
    }
}
