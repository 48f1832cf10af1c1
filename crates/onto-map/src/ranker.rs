//! Ranked ontology suggestions for mapping entities.
//!
//! For every entity the ranker scores each catalog term over the entity's
//! similarity keys, drops candidates below the acceptable-match threshold
//! and keeps the best `suggestions_per_entity`. Entities are independent,
//! so a pass runs them in parallel.
//!
//! Configured weights for a type are restricted to the keys an entity
//! actually has and rescaled to sum to 1.0 before aggregation.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::sync::Arc;

use onto_model::{
    EntityId, EntityType, EntityTypeRegistry, MappingEntity, OntologyTerm, Suggestion,
};
use rayon::prelude::*;
use tracing::{debug, info, info_span, trace};

use crate::config::SimilarityConfig;
use crate::error::{Result, ScoreError};
use crate::similarity::{SimilarityComparator, TermSimilarity};
use crate::term::TermScorer;
use crate::weighted::{rescale_weights, weighted_sum};

/// Computes suggestion sets. Holds no mutable state; share freely.
#[derive(Debug, Clone)]
pub struct SuggestionRanker {
    scorer: TermScorer,
    config: SimilarityConfig,
}

impl SuggestionRanker {
    /// Creates a ranker using the configured algorithm.
    pub fn new(config: SimilarityConfig) -> Result<Self> {
        let comparator: Arc<dyn SimilarityComparator> = Arc::new(config.algorithm);
        Self::with_comparator(config, comparator)
    }

    /// Creates a ranker with an explicit comparator.
    pub fn with_comparator(
        config: SimilarityConfig,
        comparator: Arc<dyn SimilarityComparator>,
    ) -> Result<Self> {
        config.validate()?;
        let similarity = TermSimilarity::new(comparator, &config.unknown_values);
        let scorer = TermScorer::new(similarity, config.perfect_match_score);
        Ok(Self { scorer, config })
    }

    pub fn config(&self) -> &SimilarityConfig {
        &self.config
    }

    pub fn scorer(&self) -> &TermScorer {
        &self.scorer
    }

    /// Ranks every entity against the catalog.
    ///
    /// Fails as a whole if any entity fails; no partial result is returned.
    pub fn rank(
        &self,
        entities: &[MappingEntity],
        types: &EntityTypeRegistry,
        catalog: &[OntologyTerm],
    ) -> Result<BTreeMap<EntityId, Vec<Suggestion>>> {
        let span = info_span!(
            "rank",
            entities = entities.len(),
            terms = catalog.len(),
            algorithm = %self.config.algorithm
        );
        let _guard = span.enter();

        for entity_type in types.iter() {
            self.check_weighted_keys(entity_type)?;
        }

        let ranked = entities
            .par_iter()
            .map(|entity| -> Result<(EntityId, Vec<Suggestion>)> {
                let entity_type = types
                    .get(&entity.entity_type)
                    .ok_or_else(|| ScoreError::UnknownEntityType(entity.entity_type.clone()))?;
                let suggestions = self.rank_entity(entity, entity_type, catalog)?;
                Ok((entity.id, suggestions))
            })
            .collect::<Result<BTreeMap<_, _>>>()?;

        info!(
            ranked = ranked.len(),
            suggestions = ranked.values().map(Vec::len).sum::<usize>(),
            "ranking pass complete"
        );
        Ok(ranked)
    }

    /// Ranks and replaces each entity's suggestion set.
    ///
    /// Suggestion sets are only replaced once every entity ranked
    /// successfully. Returns the number of entities updated.
    pub fn refresh(
        &self,
        entities: &mut [MappingEntity],
        types: &EntityTypeRegistry,
        catalog: &[OntologyTerm],
    ) -> Result<usize> {
        let mut ranked = self.rank(entities, types, catalog)?;
        let mut updated = 0;
        for entity in entities.iter_mut() {
            if let Some(suggestions) = ranked.remove(&entity.id) {
                entity.replace_suggestions(suggestions);
                updated += 1;
            }
        }
        Ok(updated)
    }

    /// Suggestion set for one entity, best first.
    pub fn rank_entity(
        &self,
        entity: &MappingEntity,
        entity_type: &EntityType,
        catalog: &[OntologyTerm],
    ) -> Result<Vec<Suggestion>> {
        let mut values = values_to_evaluate(entity, entity_type);
        if values.is_empty() {
            debug!(entity = %entity.id, "no scorable keys, skipping");
            return Ok(Vec::new());
        }
        self.check_weighted_keys(entity_type)?;
        let weights = match self.config.weights_for(&entity_type.name) {
            Some(configured) => match rescale_weights(configured, values.keys().copied()) {
                Some(rescaled) => {
                    // Unweighted keys take no part in a weighted score.
                    values.retain(|key, _| rescaled.contains_key(*key));
                    Some(rescaled)
                }
                None => {
                    debug!(entity = %entity.id, "no weighted keys present, skipping");
                    return Ok(Vec::new());
                }
            },
            None => None,
        };

        let mut candidates = Vec::new();
        for term in catalog {
            let score = self.aggregate_score(&values, term, weights.as_ref())?;
            if score >= self.config.acceptable_match_score {
                trace!(entity = %entity.id, term = %term.url, score, "candidate accepted");
                candidates.push(Suggestion::for_term(term, score));
            }
        }

        let suggestions = best_suggestions(candidates, self.config.suggestions_per_entity);
        debug!(
            entity = %entity.id,
            keys = values.len(),
            suggestions = suggestions.len(),
            "entity ranked"
        );
        Ok(suggestions)
    }

    /// Every configured weight key must be a similarity key of the type.
    fn check_weighted_keys(&self, entity_type: &EntityType) -> Result<()> {
        let Some(weights) = self.config.weights_for(&entity_type.name) else {
            return Ok(());
        };
        match weights
            .keys()
            .find(|key| !entity_type.scoring_keys().any(|scored| scored == key.as_str()))
        {
            Some(key) => Err(ScoreError::UnscoredWeightKey {
                entity_type: entity_type.name.clone(),
                key: key.clone(),
            }),
            None => Ok(()),
        }
    }

    fn aggregate_score(
        &self,
        values: &BTreeMap<&str, &str>,
        term: &OntologyTerm,
        weights: Option<&BTreeMap<String, f64>>,
    ) -> Result<f64> {
        let scores: BTreeMap<&str, f64> = values
            .iter()
            .map(|(key, value)| (*key, self.scorer.score(value, term)))
            .collect();
        match weights {
            Some(weights) => weighted_sum(&scores, weights),
            None => Ok(scores.values().sum::<f64>() / scores.len() as f64),
        }
    }
}

/// Values under the type's similarity keys that the entity actually has.
fn values_to_evaluate<'a>(
    entity: &'a MappingEntity,
    entity_type: &'a EntityType,
) -> BTreeMap<&'a str, &'a str> {
    entity_type
        .scoring_keys()
        .filter_map(|key| entity.value(key).map(|value| (key, value)))
        .collect()
}

/// Keeps the `limit` best candidates, highest score first.
///
/// Equal scores are ordered by term URL so selection is stable across runs.
fn best_suggestions(mut candidates: Vec<Suggestion>, limit: usize) -> Vec<Suggestion> {
    candidates.sort_by(|a, b| match b.score.total_cmp(&a.score) {
        Ordering::Equal => a.term_url.cmp(&b.term_url),
        other => other,
    });
    candidates.truncate(limit);
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;

    fn suggestion(url: &str, score: f64) -> Suggestion {
        Suggestion {
            term_url: url.to_string(),
            term_label: url.to_uppercase(),
            score,
        }
    }

    #[test]
    fn best_suggestions_consumes_buckets_in_order() {
        let picked = best_suggestions(
            vec![
                suggestion("c", 0.8),
                suggestion("b", 0.9),
                suggestion("a", 0.9),
                suggestion("d", 0.7),
            ],
            3,
        );
        let urls: Vec<&str> = picked.iter().map(|s| s.term_url.as_str()).collect();
        assert_eq!(urls, vec!["a", "b", "c"]);
    }

    #[test]
    fn best_suggestions_splits_a_bucket_at_the_cap() {
        let picked = best_suggestions(
            vec![
                suggestion("z", 0.9),
                suggestion("y", 0.9),
                suggestion("x", 0.9),
            ],
            2,
        );
        let urls: Vec<&str> = picked.iter().map(|s| s.term_url.as_str()).collect();
        assert_eq!(urls, vec!["x", "y"]);
    }
}
