//! Curation error types.
//!
//! Validation failures leave the entity under edit untouched; store
//! failures carry the path and operation that failed.

use std::path::PathBuf;

use onto_map::ScoreError;
use onto_model::{EntityId, ModelError, Status};
use thiserror::Error;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CurationError {
    /// The requested status change is not in the transition table.
    #[error("cannot change status from [{from}] to [{to}]")]
    IllegalTransition { from: Status, to: Status },

    /// No mapping entity with this id.
    #[error("mapping entity {0} not found")]
    NotFound(EntityId),

    /// A mapping names an entity type that is not defined.
    #[error("unknown entity type: {0}")]
    UnknownEntityType(String),

    /// Two mappings in one document share an id.
    #[error("duplicate mapping entity id {0}")]
    DuplicateEntity(EntityId),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error("suggestion ranking failed: {0}")]
    Scoring(#[from] ScoreError),

    #[error("failed to {operation} file: {path}")]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON in {path}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl CurationError {
    /// True for rejected operations (bad input), false for store failures.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::IllegalTransition { .. }
                | Self::UnknownEntityType(_)
                | Self::DuplicateEntity(_)
                | Self::Model(_)
                | Self::Scoring(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, CurationError>;
