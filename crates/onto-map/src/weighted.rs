//! Weighted aggregation of per-field similarity scores.

use std::collections::BTreeMap;

use tracing::warn;

use crate::error::{Result, ScoreError};
use crate::similarity::TermSimilarity;

/// Absolute tolerance when checking that weights sum to 1.0.
///
/// Covers binary rounding of decimal weights such as ten times 0.1.
pub const WEIGHT_SUM_TOLERANCE: f64 = 1e-9;

/// Combines per-key similarities into one candidate score.
#[derive(Debug, Clone)]
pub struct WeightedFieldScorer {
    similarity: TermSimilarity,
}

impl WeightedFieldScorer {
    pub fn new(similarity: TermSimilarity) -> Self {
        Self { similarity }
    }

    pub fn similarity(&self) -> &TermSimilarity {
        &self.similarity
    }

    /// Returns `Σ weight[k] · similarity(left[k], right[k])`.
    ///
    /// # Errors
    ///
    /// [`ScoreError::KeyMismatch`] when the three maps do not share one key
    /// set. [`ScoreError::WeightOutOfRange`] for a weight outside `[0, 1]`,
    /// [`ScoreError::WeightSum`] when the weights do not sum to 1.0.
    pub fn score(
        &self,
        left: &BTreeMap<String, String>,
        right: &BTreeMap<String, String>,
        weights: &BTreeMap<String, f64>,
    ) -> Result<f64> {
        check_same_keys(left, right, weights)?;
        check_weight_sum(weights)?;

        Ok(left
            .iter()
            .map(|(key, l)| weights[key] * self.similarity.score(l, &right[key]))
            .sum())
    }
}

/// Weighted sum of already computed per-key scores.
///
/// Applies the same weight validation as [`WeightedFieldScorer::score`].
pub fn weighted_sum(scores: &BTreeMap<&str, f64>, weights: &BTreeMap<String, f64>) -> Result<f64> {
    if scores.len() != weights.len() || !scores.keys().all(|k| weights.contains_key(*k)) {
        return Err(ScoreError::WeightKeyMismatch {
            scored: scores.keys().map(|k| (*k).to_string()).collect(),
            weights: weights.keys().cloned().collect(),
        });
    }
    check_weight_sum(weights)?;
    Ok(scores.iter().map(|(k, score)| weights[*k] * score).sum())
}

/// Restricts `weights` to `keys` and rescales the rest to sum to 1.0.
///
/// Returns `None` when no weight is left, or the remaining weights are all
/// zero.
pub fn rescale_weights<'a>(
    weights: &BTreeMap<String, f64>,
    keys: impl IntoIterator<Item = &'a str>,
) -> Option<BTreeMap<String, f64>> {
    let kept: BTreeMap<String, f64> = keys
        .into_iter()
        .filter_map(|key| weights.get(key).map(|w| (key.to_string(), *w)))
        .collect();
    let total: f64 = kept.values().sum();
    if kept.is_empty() || total <= 0.0 {
        return None;
    }
    Some(kept.into_iter().map(|(key, w)| (key, w / total)).collect())
}

/// Uniform weights over `keys`. Empty input yields an empty table.
pub fn uniform_weights<'a>(keys: impl IntoIterator<Item = &'a str>) -> BTreeMap<String, f64> {
    let keys: Vec<&str> = keys.into_iter().collect();
    if keys.is_empty() {
        return BTreeMap::new();
    }
    let weight = 1.0 / keys.len() as f64;
    keys.into_iter().map(|k| (k.to_string(), weight)).collect()
}

/// Checks that every weight lies in `[0, 1]` and that they sum to 1.0.
pub(crate) fn check_weight_sum(weights: &BTreeMap<String, f64>) -> Result<()> {
    if let Some((key, weight)) = weights
        .iter()
        .find(|(_, w)| !(0.0..=1.0).contains(*w))
    {
        warn!(key = %key, weight = *weight, "weight outside [0, 1]");
        return Err(ScoreError::WeightOutOfRange {
            key: key.clone(),
            weight: *weight,
        });
    }
    let total: f64 = weights.values().sum();
    if (total - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
        warn!(total, ?weights, "weights do not sum to 1.0");
        return Err(ScoreError::WeightSum { total });
    }
    Ok(())
}

fn check_same_keys(
    left: &BTreeMap<String, String>,
    right: &BTreeMap<String, String>,
    weights: &BTreeMap<String, f64>,
) -> Result<()> {
    let same = left.len() == right.len()
        && left.len() == weights.len()
        && left.keys().eq(right.keys())
        && left.keys().eq(weights.keys());
    if same {
        return Ok(());
    }
    warn!(
        left = left.len(),
        right = right.len(),
        weights = weights.len(),
        "wrong number of values for weighted similarity"
    );
    Err(ScoreError::KeyMismatch {
        left: left.keys().cloned().collect(),
        right: right.keys().cloned().collect(),
        weights: weights.keys().cloned().collect(),
    })
}
