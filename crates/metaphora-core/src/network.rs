//! Metaphor network analysis: per-theory clusters over one text's evidence.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::{MetaphorEvidence, MetaphorLevel, MetaphorType, Theory};

/// Cluster total weight at which a theory counts as strongly supported.
pub const HYBRID_WEIGHT_THRESHOLD: f64 = 0.5;

/// Aggregate statistics for one theory's evidence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetaphorCluster {
    pub total_evidence: usize,
    pub meta_metaphor_count: usize,
    pub scientific_metaphor_count: usize,
    pub ontological_count: usize,
    pub total_weight: f64,
    pub semantic_fields: BTreeSet<String>,
}

impl MetaphorCluster {
    fn empty() -> Self {
        Self {
            total_evidence: 0,
            meta_metaphor_count: 0,
            scientific_metaphor_count: 0,
            ontological_count: 0,
            total_weight: 0.0,
            semantic_fields: BTreeSet::new(),
        }
    }

    fn absorb(&mut self, evidence: &MetaphorEvidence) {
        self.total_evidence += 1;
        match evidence.level {
            MetaphorLevel::MetaMetaphor => self.meta_metaphor_count += 1,
            MetaphorLevel::ScientificMetaphor => self.scientific_metaphor_count += 1,
            _ => {}
        }
        if evidence.metaphor_type == MetaphorType::Ontological {
            self.ontological_count += 1;
        }
        self.total_weight += evidence.weight;
        self.semantic_fields.insert(evidence.semantic_field.clone());
    }

    /// Scientific metaphor and its artistic transformation co-occur.
    pub fn has_meta_metaphor_pattern(&self) -> bool {
        self.meta_metaphor_count > 0 && self.scientific_metaphor_count > 0
    }
}

/// Aggregate verdict over one text's evidence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkAnalysis {
    pub clusters: BTreeMap<Theory, MetaphorCluster>,
    pub meta_metaphor_detected: bool,
    pub dominant_pattern: Option<Theory>,
    pub hybrid_theories: BTreeSet<Theory>,
}

impl NetworkAnalysis {
    pub fn is_hybrid(&self) -> bool {
        !self.hybrid_theories.is_empty()
    }
}

/// Group evidence by theory and derive the meta-metaphor flag, dominant theory and
/// hybrid set.
///
/// The dominant theory is the cluster with the largest total weight; on equal weights
/// the cluster encountered first in `evidence` wins.
pub fn analyze_metaphor_network(evidence: &[MetaphorEvidence]) -> NetworkAnalysis {
    // Encounter order matters for the dominant tie-break, so group into a Vec.
    let mut grouped: Vec<(Theory, MetaphorCluster)> = Vec::new();
    for e in evidence {
        match grouped.iter_mut().find(|(t, _)| *t == e.theory) {
            Some((_, cluster)) => cluster.absorb(e),
            None => {
                let mut cluster = MetaphorCluster::empty();
                cluster.absorb(e);
                grouped.push((e.theory, cluster));
            }
        }
    }

    let meta_metaphor_detected = grouped.iter().any(|(_, c)| c.has_meta_metaphor_pattern());

    let mut dominant_pattern: Option<(Theory, f64)> = None;
    for (theory, cluster) in &grouped {
        match dominant_pattern {
            Some((_, best)) if cluster.total_weight <= best => {}
            _ => dominant_pattern = Some((*theory, cluster.total_weight)),
        }
    }

    let strong: BTreeSet<Theory> = grouped
        .iter()
        .filter(|(_, c)| c.total_weight >= HYBRID_WEIGHT_THRESHOLD)
        .map(|(t, _)| *t)
        .collect();
    let hybrid_theories = if strong.len() > 1 {
        strong
    } else {
        BTreeSet::new()
    };

    NetworkAnalysis {
        clusters: grouped.into_iter().collect(),
        meta_metaphor_detected,
        dominant_pattern: dominant_pattern.map(|(t, _)| t),
        hybrid_theories,
    }
}
