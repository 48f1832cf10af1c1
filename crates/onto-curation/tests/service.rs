//! Curation service over the in-memory store.

use std::collections::BTreeMap;

use chrono::{Duration, TimeZone, Utc};
use onto_curation::{
    CurationError, CurationService, EavFilterComposer, InMemoryMappingStore, MappingEdit,
    MappingStore, MappingsFilter, PageRequest, SearchConfig,
};
use onto_map::{ScoreError, SimilarityConfig, SuggestionRanker};
use onto_model::{
    EntityId, EntityType, EntityTypeRegistry, MappingEntity, MappingKey, OntologyTerm, Status,
    Suggestion,
};

fn diagnosis_type() -> EntityType {
    EntityType::new(
        "Diagnosis",
        vec![
            MappingKey::new("DataSource", false),
            MappingKey::new("SampleDiagnosis", true),
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
    let created = Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap();
    MappingEntity::new(EntityId::new(id), &diagnosis_type(), values, created).unwrap()
}

fn service(config: SimilarityConfig) -> CurationService<InMemoryMappingStore> {
    let mut stale = entity(
        1,
        &[("DataSource", "crl"), ("SampleDiagnosis", "lung adenocarcinoma")],
    );
    stale.replace_suggestions(vec![Suggestion {
        term_url: "http://example.org/stale".to_string(),
        term_label: "Stale".to_string(),
        score: 0.8,
    }]);
    let store: InMemoryMappingStore = [
        stale,
        entity(
            2,
            &[
                ("DataSource", "crl"),
                ("SampleDiagnosis", "melanoma"),
                ("TumorType", "primary"),
            ],
        ),
    ]
    .into_iter()
    .collect();

    CurationService::new(
        store,
        EntityTypeRegistry::new([diagnosis_type()]).unwrap(),
        EavFilterComposer::new(&SearchConfig::default()),
        SuggestionRanker::new(config).unwrap(),
    )
}

fn catalog() -> Vec<OntologyTerm> {
    vec![
        OntologyTerm::new("http://example.org/NCIT_C3512", "Lung Adenocarcinoma"),
        OntologyTerm::new("http://example.org/NCIT_C3224", "Melanoma")
            .with_synonyms(["Malignant Melanoma"]),
    ]
}

#[test]
fn update_saves_changed_entity() {
    let mut service = service(SimilarityConfig::default());
    let now = Utc.with_ymd_and_hms(2024, 2, 1, 8, 30, 0).unwrap();
    let edit = MappingEdit::status(Status::Unmapped)
        .with_term("http://example.org/NCIT_C3512", "Lung Adenocarcinoma");

    let (entity, outcome) = service.update_at(EntityId::new(1), &edit, now).unwrap();

    assert!(outcome.changed());
    assert_eq!(entity.status, Status::Mapped);
    let stored = service.store().load(EntityId::new(1)).unwrap();
    assert_eq!(stored, entity);
    assert_eq!(stored.date_updated, now);
}

#[test]
fn rejected_update_writes_nothing() {
    let mut service = service(SimilarityConfig::default());
    let edit = MappingEdit::status(Status::Revise);

    let err = service
        .update_at(EntityId::new(2), &edit, Utc::now() + Duration::days(1))
        .unwrap_err();

    assert!(matches!(err, CurationError::IllegalTransition { .. }));
    assert_eq!(
        service.store().load(EntityId::new(2)).unwrap(),
        entity(
            2,
            &[
                ("DataSource", "crl"),
                ("SampleDiagnosis", "melanoma"),
                ("TumorType", "primary"),
            ],
        )
    );
}

#[test]
fn missing_entity_is_not_found() {
    let mut service = service(SimilarityConfig::default());
    let err = service
        .update(EntityId::new(99), &MappingEdit::status(Status::Mapped))
        .unwrap_err();
    assert!(matches!(err, CurationError::NotFound(id) if id == EntityId::new(99)));
    assert!(!err.is_validation());
}

#[test]
fn search_composes_filter() {
    let service = service(SimilarityConfig::default());
    let filter = MappingsFilter::default()
        .with_values("DataSource", ["CRL"])
        .with_values("TumorType", ["primary"]);

    let page = service.search(&filter, PageRequest::default()).unwrap();

    assert_eq!(page.total, 1);
    assert_eq!(page.items[0].id, EntityId::new(2));
}

#[test]
fn refresh_replaces_suggestion_sets() {
    let mut service = service(SimilarityConfig::default());

    let updated = service.refresh_suggestions("diagnosis", &catalog()).unwrap();

    assert_eq!(updated, 2);
    let lung = service.store().load(EntityId::new(1)).unwrap();
    assert_eq!(lung.suggestions[0].term_url, "http://example.org/NCIT_C3512");
    assert!((lung.suggestions[0].score - 1.0).abs() < 1e-12);
    assert!(
        lung.suggestions
            .iter()
            .all(|s| s.term_url != "http://example.org/stale")
    );
}

#[test]
fn failed_batch_keeps_previous_suggestions() {
    let mut config = SimilarityConfig::default();
    let weights: BTreeMap<String, f64> = [("SampleDiagnosis", 0.5), ("DataSource", 0.5)]
        .into_iter()
        .map(|(k, w)| (k.to_string(), w))
        .collect();
    config.entity_weights.insert("Diagnosis".to_string(), weights);
    let mut service = service(config);

    let err = service
        .refresh_suggestions("Diagnosis", &catalog())
        .unwrap_err();

    assert!(matches!(
        err,
        CurationError::Scoring(ScoreError::UnscoredWeightKey { ref key, .. }) if key == "DataSource"
    ));
    let stale = service.store().load(EntityId::new(1)).unwrap();
    assert_eq!(stale.suggestions.len(), 1);
    assert_eq!(stale.suggestions[0].term_url, "http://example.org/stale");
    assert!(service.store().load(EntityId::new(2)).unwrap().suggestions.is_empty());
}

#[test]
fn weighted_refresh_covers_entities_missing_a_weighted_key() {
    let mut config = SimilarityConfig {
        acceptable_match_score: 0.5,
        ..SimilarityConfig::default()
    };
    let weights: BTreeMap<String, f64> = [("SampleDiagnosis", 0.5), ("TumorType", 0.5)]
        .into_iter()
        .map(|(k, w)| (k.to_string(), w))
        .collect();
    config.entity_weights.insert("Diagnosis".to_string(), weights);
    let mut service = service(config);

    service.refresh_suggestions("Diagnosis", &catalog()).unwrap();

    let partial = service.store().load(EntityId::new(1)).unwrap();
    assert_eq!(partial.suggestions[0].term_url, "http://example.org/NCIT_C3512");
    assert!(
        partial
            .suggestions
            .iter()
            .all(|s| s.term_url != "http://example.org/stale")
    );
}

#[test]
fn refresh_of_undefined_type_fails() {
    let mut service = service(SimilarityConfig::default());
    let err = service.refresh_suggestions("Treatment", &catalog()).unwrap_err();
    assert!(matches!(err, CurationError::UnknownEntityType(name) if name == "Treatment"));
}
