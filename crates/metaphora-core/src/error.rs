use crate::Theory;

/// Errors raised while constructing or loading an [`Ontology`](crate::Ontology).
#[derive(Debug, thiserror::Error)]
pub enum OntologyError {
    #[error("theory {0} appears more than once in the ontology")]
    DuplicateTheory(Theory),
    #[error("theory {0} cannot carry a domain entry")]
    UndeterminedDomain(Theory),
    #[error("blank phrase in {theory} {list}")]
    BlankPhrase { theory: Theory, list: &'static str },
    #[error("blank marker in {0} markers")]
    BlankMarker(&'static str),
    #[error("ontology JSON is malformed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors at the dynamic (JSON) boundary of the analyzer.
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error("invalid input: expected a text description, got {0}")]
    InvalidInput(&'static str),
}
