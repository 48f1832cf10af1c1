//! Error types for scoring and lookup.

use thiserror::Error;

/// Errors raised while scoring or ranking candidates.
///
/// All variants are validation failures: the caller supplied inconsistent
/// input or configuration, and nothing was computed.
#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum ScoreError {
    /// Left values, right values and weights do not share one key set.
    #[error("key sets differ: left {left:?}, right {right:?}, weights {weights:?}")]
    KeyMismatch {
        left: Vec<String>,
        right: Vec<String>,
        weights: Vec<String>,
    },

    /// Per-key scores and weights do not share one key set.
    #[error("scored keys {scored:?} do not match weighted keys {weights:?}")]
    WeightKeyMismatch {
        scored: Vec<String>,
        weights: Vec<String>,
    },

    /// A single weight is negative, above 1.0 or not a number.
    #[error("weight for {key} must be within [0, 1], got {weight}")]
    WeightOutOfRange { key: String, weight: f64 },

    /// A weighted key is not a similarity key of its entity type.
    #[error("weighted key {key} is not a similarity key of entity type {entity_type}")]
    UnscoredWeightKey { entity_type: String, key: String },

    /// Weights do not add up to 1.0.
    #[error("weights must sum to 1.0, got {total}")]
    WeightSum { total: f64 },

    /// Entity references a type missing from the registry.
    #[error("unknown entity type: {0}")]
    UnknownEntityType(String),

    /// Configuration value out of range.
    #[error("invalid similarity configuration: {0}")]
    InvalidConfig(String),
}

/// Errors from the free-text lookup collaborator.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LookupError {
    /// The free-text input was blank.
    #[error("lookup input must not be empty")]
    EmptyInput,

    /// The search index could not answer.
    #[error("term index unavailable: {0}")]
    IndexUnavailable(String),
}

pub type Result<T> = std::result::Result<T, ScoreError>;
