//! Configuration for suggestion scoring and free-text lookup.
//!
//! Read once at start-up and shared read-only by every ranking pass.

use std::collections::BTreeMap;
use std::fmt;

use onto_model::eq_ignore_case;
use serde::{Deserialize, Serialize};

use crate::error::{Result, ScoreError};

/// Default cutoff below which candidates are discarded.
pub const DEFAULT_ACCEPTABLE_MATCH_SCORE: f64 = 0.75;
/// Default label score at which synonyms are no longer scanned.
pub const DEFAULT_PERFECT_MATCH_SCORE: f64 = 0.95;
/// Default number of suggestions kept per entity.
pub const DEFAULT_SUGGESTIONS_PER_ENTITY: usize = 10;
/// Default number of free-text lookup results.
pub const DEFAULT_MAX_LOOKUP_RESULTS: usize = 50;

/// Placeholders that providers use for "no value".
pub const DEFAULT_UNKNOWN_VALUES: &[&str] = &[
    "",
    "-",
    "n/a",
    "na",
    "not collected",
    "not provided",
    "not reported",
    "not specified",
    "unknown",
];

/// String similarity algorithm used by the term scorer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SimilarityAlgorithm {
    #[default]
    JaroWinkler,
    Jaro,
    /// Normalized Levenshtein similarity.
    Levenshtein,
    /// Normalized Indel similarity (insertions and deletions only).
    Indel,
}

impl SimilarityAlgorithm {
    pub const fn label(&self) -> &'static str {
        match self {
            Self::JaroWinkler => "jaro_winkler",
            Self::Jaro => "jaro",
            Self::Levenshtein => "levenshtein",
            Self::Indel => "indel",
        }
    }
}

impl fmt::Display for SimilarityAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Settings for [`SuggestionRanker`](crate::SuggestionRanker).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimilarityConfig {
    pub algorithm: SimilarityAlgorithm,
    /// Candidates scoring below this are discarded.
    pub acceptable_match_score: f64,
    /// A label score at or above this skips the synonym scan.
    pub perfect_match_score: f64,
    /// Maximum suggestions kept per entity.
    pub suggestions_per_entity: usize,
    /// Values that all compare as the same "unknown" token.
    pub unknown_values: Vec<String>,
    /// Optional per entity type weighting of scoring keys.
    ///
    /// Entity types without an entry use the plain mean over their keys.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub entity_weights: BTreeMap<String, BTreeMap<String, f64>>,
}

impl Default for SimilarityConfig {
    fn default() -> Self {
        Self {
            algorithm: SimilarityAlgorithm::default(),
            acceptable_match_score: DEFAULT_ACCEPTABLE_MATCH_SCORE,
            perfect_match_score: DEFAULT_PERFECT_MATCH_SCORE,
            suggestions_per_entity: DEFAULT_SUGGESTIONS_PER_ENTITY,
            unknown_values: DEFAULT_UNKNOWN_VALUES
                .iter()
                .map(|v| (*v).to_string())
                .collect(),
            entity_weights: BTreeMap::new(),
        }
    }
}

impl SimilarityConfig {
    /// Rejects thresholds outside `[0, 1]`, a zero cap, weights outside
    /// `[0, 1]` and weight tables that do not sum to 1.0.
    pub fn validate(&self) -> Result<()> {
        check_unit_interval("acceptable_match_score", self.acceptable_match_score)?;
        check_unit_interval("perfect_match_score", self.perfect_match_score)?;
        if self.suggestions_per_entity == 0 {
            return Err(ScoreError::InvalidConfig(
                "suggestions_per_entity must be at least 1".to_string(),
            ));
        }
        for (entity_type, weights) in &self.entity_weights {
            crate::weighted::check_weight_sum(weights).map_err(|err| {
                ScoreError::InvalidConfig(format!("weights for {entity_type}: {err}"))
            })?;
        }
        Ok(())
    }

    /// Configured weights for an entity type, matched ignoring case.
    pub fn weights_for(&self, entity_type: &str) -> Option<&BTreeMap<String, f64>> {
        self.entity_weights
            .iter()
            .find(|(name, _)| eq_ignore_case(name, entity_type))
            .map(|(_, weights)| weights)
    }
}

fn check_unit_interval(name: &str, value: f64) -> Result<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ScoreError::InvalidConfig(format!(
            "{name} must be within [0, 1], got {value}"
        )))
    }
}

/// Settings for [`FreeTextLookup`](crate::FreeTextLookup).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LookupConfig {
    pub max_results: usize,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            max_results: DEFAULT_MAX_LOOKUP_RESULTS,
        }
    }
}
