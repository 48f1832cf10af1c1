use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::Utc;
use onto_map::{
    ScoreError, SimilarityComparator, SimilarityConfig, SuggestionRanker, TermScorer,
    TermSimilarity,
};
use onto_model::{
    EntityId, EntityType, EntityTypeRegistry, MappingEntity, MappingKey, OntologyTerm, Suggestion,
};

/// Comparator answering from a fixed table and counting its calls.
#[derive(Debug, Default)]
struct TableComparator {
    scores: BTreeMap<(String, String), f64>,
    calls: AtomicUsize,
}

impl TableComparator {
    fn with(mut self, left: &str, right: &str, score: f64) -> Self {
        self.scores
            .insert((left.to_string(), right.to_string()), score);
        self.scores
            .insert((right.to_string(), left.to_string()), score);
        self
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl SimilarityComparator for TableComparator {
    fn compare(&self, left: &str, right: &str) -> f64 {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.scores
            .get(&(left.to_string(), right.to_string()))
            .copied()
            .unwrap_or(0.0)
    }
}

fn term_scorer(comparator: Arc<TableComparator>, perfect: f64) -> TermScorer {
    TermScorer::new(TermSimilarity::new(comparator, ["not provided"]), perfect)
}

fn cancer_term() -> OntologyTerm {
    OntologyTerm::new("http://purl.obolibrary.org/obo/NCIT_C9305", "Cancer")
        .with_synonyms(["Tumor", "Malignancy"])
}

#[test]
fn perfect_label_match_skips_synonyms() {
    let comparator = Arc::new(TableComparator::default());
    let scorer = term_scorer(Arc::clone(&comparator), 0.95);

    assert_eq!(scorer.score("Cancer", &cancer_term()), 1.0);
    assert_eq!(comparator.calls(), 0);
}

#[test]
fn near_perfect_label_match_skips_synonyms() {
    let comparator = Arc::new(
        TableComparator::default()
            .with("cancers", "cancer", 0.97)
            .with("cancers", "tumor", 0.99),
    );
    let scorer = term_scorer(Arc::clone(&comparator), 0.95);

    assert_eq!(scorer.score("Cancers", &cancer_term()), 0.97);
    assert_eq!(comparator.calls(), 1);
}

#[test]
fn best_synonym_wins_below_threshold() {
    let comparator = Arc::new(
        TableComparator::default()
            .with("tumour", "cancer", 0.6)
            .with("tumour", "tumor", 0.9)
            .with("tumour", "malignancy", 0.1),
    );
    let scorer = term_scorer(Arc::clone(&comparator), 0.95);

    assert_eq!(scorer.score("Tumour", &cancer_term()), 0.9);
    assert_eq!(comparator.calls(), 3);
}

#[test]
fn label_score_kept_when_no_synonym_improves() {
    let comparator = Arc::new(
        TableComparator::default()
            .with("carcinoma", "cancer", 0.7)
            .with("carcinoma", "tumor", 0.2),
    );
    let scorer = term_scorer(comparator, 0.95);

    assert_eq!(scorer.score("carcinoma", &cancer_term()), 0.7);
}

fn single_key_type() -> EntityType {
    EntityType::new(
        "Diagnosis",
        vec![
            MappingKey::new("DataSource", false),
            MappingKey::new("SampleDiagnosis", true),
            MappingKey::new("OriginTissue", true),
            MappingKey::new("TumorType", true),
        ],
    )
    .unwrap()
}

fn entity(id: u64, pairs: &[(&str, &str)]) -> MappingEntity {
    let values = pairs
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect();
    MappingEntity::new(EntityId::new(id), &single_key_type(), values, Utc::now()).unwrap()
}

fn registry() -> EntityTypeRegistry {
    EntityTypeRegistry::new(vec![single_key_type()]).unwrap()
}

fn ranker(comparator: TableComparator, acceptable: f64, cap: usize) -> SuggestionRanker {
    let config = SimilarityConfig {
        acceptable_match_score: acceptable,
        suggestions_per_entity: cap,
        ..SimilarityConfig::default()
    };
    SuggestionRanker::with_comparator(config, Arc::new(comparator)).unwrap()
}

fn urls(suggestions: &[Suggestion]) -> Vec<&str> {
    suggestions.iter().map(|s| s.term_url.as_str()).collect()
}

#[test]
fn threshold_and_cap_select_top_bucket() {
    let comparator = TableComparator::default()
        .with("glioma", "alpha", 0.9)
        .with("glioma", "beta", 0.9)
        .with("glioma", "gamma", 0.4);
    let catalog = vec![
        OntologyTerm::new("t:alpha", "alpha"),
        OntologyTerm::new("t:beta", "beta"),
        OntologyTerm::new("t:gamma", "gamma"),
    ];
    let ranker = ranker(comparator, 0.5, 2);
    let entity = entity(1, &[("DataSource", "crl"), ("SampleDiagnosis", "glioma")]);

    let suggestions = ranker
        .rank_entity(&entity, &single_key_type(), &catalog)
        .unwrap();

    assert_eq!(urls(&suggestions), vec!["t:alpha", "t:beta"]);
    assert!(suggestions.iter().all(|s| s.score == 0.9));
}

#[test]
fn aggregate_is_mean_over_present_scoring_keys() {
    let comparator = TableComparator::default()
        .with("glioma", "brain cancer", 0.8)
        .with("brain", "brain cancer", 0.4)
        .with("crl", "brain cancer", 1.0);
    let catalog = vec![OntologyTerm::new("t:brain", "brain cancer")];
    let ranker = ranker(comparator, 0.0, 5);
    // TumorType is a scoring key but is absent; DataSource is not scored.
    let entity = entity(
        2,
        &[
            ("DataSource", "crl"),
            ("SampleDiagnosis", "glioma"),
            ("OriginTissue", "brain"),
        ],
    );

    let suggestions = ranker
        .rank_entity(&entity, &single_key_type(), &catalog)
        .unwrap();

    assert_eq!(suggestions.len(), 1);
    assert!((suggestions[0].score - 0.6).abs() < 1e-12);
}

#[test]
fn configured_weights_replace_the_mean() {
    let comparator = TableComparator::default()
        .with("glioma", "brain cancer", 0.8)
        .with("brain", "brain cancer", 0.4);
    let mut config = SimilarityConfig {
        acceptable_match_score: 0.0,
        ..SimilarityConfig::default()
    };
    config.entity_weights.insert(
        "diagnosis".to_string(),
        BTreeMap::from([
            ("SampleDiagnosis".to_string(), 0.75),
            ("OriginTissue".to_string(), 0.25),
        ]),
    );
    let ranker = SuggestionRanker::with_comparator(config, Arc::new(comparator)).unwrap();
    let catalog = vec![OntologyTerm::new("t:brain", "brain cancer")];

    let weighted = entity(3, &[("SampleDiagnosis", "glioma"), ("OriginTissue", "brain")]);
    let suggestions = ranker
        .rank_entity(&weighted, &single_key_type(), &catalog)
        .unwrap();
    assert!((suggestions[0].score - 0.7).abs() < 1e-12);

    // OriginTissue is absent, so SampleDiagnosis carries the whole weight.
    let missing_key = entity(4, &[("SampleDiagnosis", "glioma")]);
    let suggestions = ranker
        .rank_entity(&missing_key, &single_key_type(), &catalog)
        .unwrap();
    assert!((suggestions[0].score - 0.8).abs() < 1e-12);

    // TumorType is scored but not weighted, so it does not dilute the score.
    let unweighted_extra = entity(
        12,
        &[("SampleDiagnosis", "glioma"), ("OriginTissue", "brain"), ("TumorType", "primary")],
    );
    let suggestions = ranker
        .rank_entity(&unweighted_extra, &single_key_type(), &catalog)
        .unwrap();
    assert!((suggestions[0].score - 0.7).abs() < 1e-12);
}

fn weighted_ranker(comparator: TableComparator, weights: &[(&str, f64)]) -> SuggestionRanker {
    let mut config = SimilarityConfig {
        acceptable_match_score: 0.0,
        ..SimilarityConfig::default()
    };
    config.entity_weights.insert(
        "Diagnosis".to_string(),
        weights.iter().map(|(k, w)| ((*k).to_string(), *w)).collect(),
    );
    SuggestionRanker::with_comparator(config, Arc::new(comparator)).unwrap()
}

#[test]
fn weighted_batch_with_partial_entities_refreshes_every_entity() {
    let comparator = TableComparator::default()
        .with("glioma", "glioma term", 0.9)
        .with("primary", "glioma term", 0.5);
    let ranker = weighted_ranker(comparator, &[("SampleDiagnosis", 0.5), ("TumorType", 0.5)]);
    let catalog = vec![OntologyTerm::new("t:glioma", "glioma term")];
    let mut entities = vec![
        entity(13, &[("SampleDiagnosis", "glioma"), ("TumorType", "primary")]),
        entity(14, &[("SampleDiagnosis", "glioma")]),
    ];

    let updated = ranker.refresh(&mut entities, &registry(), &catalog).unwrap();

    assert_eq!(updated, 2);
    assert!((entities[0].suggestions[0].score - 0.7).abs() < 1e-12);
    assert!((entities[1].suggestions[0].score - 0.9).abs() < 1e-12);
}

#[test]
fn weights_on_non_scoring_keys_are_rejected() {
    let comparator = TableComparator::default().with("glioma", "glioma term", 0.9);
    let ranker = weighted_ranker(comparator, &[("SampleDiagnosis", 0.5), ("DataSource", 0.5)]);
    let catalog = vec![OntologyTerm::new("t:glioma", "glioma term")];
    let mut entities = vec![entity(15, &[("SampleDiagnosis", "glioma")])];

    let err = ranker
        .refresh(&mut entities, &registry(), &catalog)
        .unwrap_err();

    assert_eq!(
        err,
        ScoreError::UnscoredWeightKey {
            entity_type: "Diagnosis".to_string(),
            key: "DataSource".to_string(),
        }
    );
    assert!(entities[0].suggestions.is_empty());
}

#[test]
fn entity_with_only_zero_weighted_keys_gets_no_suggestions() {
    let comparator = TableComparator::default().with("brain", "brain term", 1.0);
    let ranker = weighted_ranker(comparator, &[("SampleDiagnosis", 1.0), ("OriginTissue", 0.0)]);
    let catalog = vec![OntologyTerm::new("t:brain", "brain term")];

    let only_zero = entity(16, &[("OriginTissue", "brain")]);
    assert!(
        ranker
            .rank_entity(&only_zero, &single_key_type(), &catalog)
            .unwrap()
            .is_empty()
    );

    let unweighted = entity(17, &[("TumorType", "brain")]);
    assert!(
        ranker
            .rank_entity(&unweighted, &single_key_type(), &catalog)
            .unwrap()
            .is_empty()
    );
}

#[test]
fn entity_without_scoring_keys_gets_no_suggestions() {
    let ranker = ranker(TableComparator::default(), 0.0, 5);
    let catalog = vec![OntologyTerm::new("t:crl", "crl")];
    let entity = entity(5, &[("DataSource", "crl")]);

    let suggestions = ranker
        .rank_entity(&entity, &single_key_type(), &catalog)
        .unwrap();
    assert!(suggestions.is_empty());
}

#[test]
fn empty_catalog_yields_empty_sets() {
    let ranker = ranker(TableComparator::default(), 0.0, 5);
    let entities = vec![entity(6, &[("SampleDiagnosis", "glioma")])];

    let ranked = ranker.rank(&entities, &registry(), &[]).unwrap();
    assert_eq!(ranked.len(), 1);
    assert!(ranked[&EntityId::new(6)].is_empty());
}

#[test]
fn ranking_is_repeatable() {
    let ranker = SuggestionRanker::new(SimilarityConfig {
        acceptable_match_score: 0.3,
        suggestions_per_entity: 3,
        ..SimilarityConfig::default()
    })
    .unwrap();
    let catalog = vec![
        OntologyTerm::new("t:1", "Glioblastoma").with_synonyms(["GBM"]),
        OntologyTerm::new("t:2", "Glioma"),
        OntologyTerm::new("t:3", "Melanoma"),
        OntologyTerm::new("t:4", "Lung Adenocarcinoma"),
    ];
    let entities = vec![
        entity(7, &[("SampleDiagnosis", "glioblastoma multiforme")]),
        entity(8, &[("SampleDiagnosis", "malignant melanoma"), ("TumorType", "primary")]),
    ];

    let first = ranker.rank(&entities, &registry(), &catalog).unwrap();
    let second = ranker.rank(&entities, &registry(), &catalog).unwrap();
    assert_eq!(first, second);
    assert!(first.values().all(|s| s.len() <= 3));
}

#[test]
fn unknown_entity_type_fails_the_batch_without_partial_updates() {
    let comparator = TableComparator::default().with("glioma", "glioma term", 0.9);
    let ranker = ranker(comparator, 0.5, 5);
    let catalog = vec![OntologyTerm::new("t:glioma", "glioma term")];

    let good = entity(9, &[("SampleDiagnosis", "glioma")]);
    let mut orphan = entity(10, &[("SampleDiagnosis", "glioma")]);
    orphan.entity_type = "Treatment".to_string();
    let mut entities = vec![good, orphan];

    let err = ranker
        .refresh(&mut entities, &registry(), &catalog)
        .unwrap_err();
    assert_eq!(err, ScoreError::UnknownEntityType("Treatment".to_string()));
    assert!(entities.iter().all(|e| e.suggestions.is_empty()));
}

#[test]
fn refresh_replaces_previous_suggestions() {
    let comparator = TableComparator::default().with("glioma", "glioma term", 0.9);
    let ranker = ranker(comparator, 0.5, 5);
    let catalog = vec![OntologyTerm::new("t:glioma", "glioma term")];

    let mut stale = entity(11, &[("SampleDiagnosis", "glioma")]);
    stale.replace_suggestions(vec![Suggestion {
        term_url: "t:old".to_string(),
        term_label: "old".to_string(),
        score: 0.99,
    }]);
    let mut entities = vec![stale];

    let updated = ranker.refresh(&mut entities, &registry(), &catalog).unwrap();
    assert_eq!(updated, 1);
    assert_eq!(urls(&entities[0].suggestions), vec!["t:glioma"]);
}
