use thiserror::Error;

/// Failures at the document boundary (parsing saved automations).
///
/// Interactive edits never produce these; they report an [`crate::graph::Outcome`].
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("unknown step type `{0}`")]
    UnknownStepType(String),
    #[error("invalid automation document: {0}")]
    Json(#[from] serde_json::Error),
}
