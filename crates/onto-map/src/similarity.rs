//! Pairwise string similarity with provider-specific normalization.
//!
//! Both inputs are trimmed and lowercased, and any configured "unknown"
//! placeholder is replaced by a single sentinel so that two different
//! placeholders compare as identical.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use onto_model::fold_case;
use rapidfuzz::distance::{indel, jaro, jaro_winkler, levenshtein};

use crate::config::{SimilarityAlgorithm, SimilarityConfig};

/// Token every unknown placeholder is canonicalized to.
pub const UNKNOWN_ELEMENT: &str = "unknown";

/// A symmetric, normalized string similarity measure.
///
/// Implementations return 1.0 for identical strings and 0.0 for maximally
/// dissimilar ones.
pub trait SimilarityComparator: fmt::Debug + Send + Sync {
    fn compare(&self, left: &str, right: &str) -> f64;
}

impl SimilarityComparator for SimilarityAlgorithm {
    fn compare(&self, left: &str, right: &str) -> f64 {
        match self {
            Self::JaroWinkler => jaro_winkler::similarity(left.chars(), right.chars()),
            Self::Jaro => jaro::similarity(left.chars(), right.chars()),
            Self::Levenshtein => levenshtein::normalized_similarity(left.chars(), right.chars()),
            Self::Indel => indel::normalized_similarity(left.chars(), right.chars()),
        }
    }
}

/// Scores two free-text terms against each other.
#[derive(Debug, Clone)]
pub struct TermSimilarity {
    comparator: Arc<dyn SimilarityComparator>,
    unknown_values: BTreeSet<String>,
}

impl TermSimilarity {
    pub fn new<I, S>(comparator: Arc<dyn SimilarityComparator>, unknown_values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            comparator,
            unknown_values: unknown_values
                .into_iter()
                .map(|v| fold_case(v.as_ref().trim()))
                .collect(),
        }
    }

    /// Builds the scorer for the configured algorithm.
    pub fn from_config(config: &SimilarityConfig) -> Self {
        Self::new(Arc::new(config.algorithm), &config.unknown_values)
    }

    /// Returns true when `term` is one of the configured placeholders.
    pub fn is_unknown(&self, term: &str) -> bool {
        self.unknown_values.contains(&fold_case(term.trim()))
    }

    /// Lowercases `term` and maps placeholders to [`UNKNOWN_ELEMENT`].
    pub fn normalize(&self, term: &str) -> String {
        let lowered = fold_case(term.trim());
        if self.unknown_values.contains(&lowered) {
            UNKNOWN_ELEMENT.to_string()
        } else {
            lowered
        }
    }

    /// Similarity of `left` and `right` in `[0, 1]`.
    pub fn score(&self, left: &str, right: &str) -> f64 {
        let left = self.normalize(left);
        let right = self.normalize(right);
        if left == right {
            return 1.0;
        }
        let score = self.comparator.compare(&left, &right);
        if score.is_finite() {
            score.clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}
