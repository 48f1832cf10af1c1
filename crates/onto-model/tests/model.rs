use std::collections::BTreeMap;

use chrono::{TimeZone, Utc};
use onto_model::{
    EntityId, EntityType, EntityTypeRegistry, MappingEntity, MappingKey, ModelError, Status,
    Suggestion,
};

fn diagnosis_type() -> EntityType {
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

fn values(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect()
}

#[test]
fn new_entity_starts_unmapped() {
    let now = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
    let entity = MappingEntity::new(
        EntityId::new(1),
        &diagnosis_type(),
        values(&[
            ("DataSource", "crl"),
            ("SampleDiagnosis", "central nervous system cancer"),
            ("OriginTissue", "central nervous system"),
            ("TumorType", "primary"),
        ]),
        now,
    )
    .unwrap();

    assert_eq!(entity.status, Status::Unmapped);
    assert_eq!(entity.date_created, now);
    assert_eq!(entity.date_updated, now);
    assert_eq!(entity.value("DataSource"), Some("crl"));
    assert_eq!(entity.mapped_term_url_or_empty(), "");
}

#[test]
fn entity_rejects_keys_outside_its_type() {
    let err = MappingEntity::new(
        EntityId::new(2),
        &diagnosis_type(),
        values(&[("TreatmentName", "cisplatin")]),
        Utc::now(),
    )
    .unwrap_err();

    assert_eq!(
        err,
        ModelError::UndefinedKey {
            entity_type: "Diagnosis".to_string(),
            key: "TreatmentName".to_string(),
        }
    );
}

#[test]
fn entity_type_rejects_duplicate_keys() {
    let err = EntityType::new(
        "Treatment",
        vec![
            MappingKey::new("TreatmentName", true),
            MappingKey::new("TreatmentName", false),
        ],
    )
    .unwrap_err();
    assert!(matches!(err, ModelError::DuplicateMappingKey { .. }));
}

#[test]
fn scoring_keys_follow_definition_order() {
    let entity_type = diagnosis_type();
    let keys: Vec<&str> = entity_type.scoring_keys().collect();
    assert_eq!(keys, vec!["SampleDiagnosis", "OriginTissue", "TumorType"]);
}

#[test]
fn registry_names_are_unique_ignoring_case() {
    let lower = EntityType::new("diagnosis", vec![]).unwrap();
    let err = EntityTypeRegistry::new(vec![diagnosis_type(), lower]).unwrap_err();
    assert_eq!(err, ModelError::DuplicateEntityType("diagnosis".to_string()));

    let registry = EntityTypeRegistry::new(vec![diagnosis_type()]).unwrap();
    assert!(registry.get("DIAGNOSIS").is_some());
    assert!(registry.get("treatment").is_none());
}

#[test]
fn registry_folds_non_ascii_names() {
    let study = EntityType::new("Étude", vec![]).unwrap();
    let registry = EntityTypeRegistry::new(vec![study]).unwrap();
    assert!(registry.get("ÉTUDE").is_some());
    assert!(registry.get("étude").is_some());

    let upper = EntityType::new("ÉTUDE", vec![]).unwrap();
    let err = EntityTypeRegistry::new(vec![EntityType::new("étude", vec![]).unwrap(), upper])
        .unwrap_err();
    assert_eq!(err, ModelError::DuplicateEntityType("ÉTUDE".to_string()));
}

#[test]
fn replacing_suggestions_drops_previous_set() {
    let mut entity = MappingEntity::new(
        EntityId::new(3),
        &diagnosis_type(),
        values(&[("SampleDiagnosis", "glioma")]),
        Utc::now(),
    )
    .unwrap();
    entity.replace_suggestions(vec![Suggestion {
        term_url: "a".to_string(),
        term_label: "A".to_string(),
        score: 0.9,
    }]);
    entity.replace_suggestions(vec![Suggestion {
        term_url: "b".to_string(),
        term_label: "B".to_string(),
        score: 0.8,
    }]);

    assert_eq!(entity.suggestions.len(), 1);
    assert_eq!(entity.suggestions[0].term_url, "b");
}

#[test]
fn entity_serializes_without_empty_term_fields() {
    let now = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
    let entity = MappingEntity::new(
        EntityId::new(4),
        &diagnosis_type(),
        values(&[("SampleDiagnosis", "glioma")]),
        now,
    )
    .unwrap();
    let json = serde_json::to_value(&entity).expect("serialize entity");
    assert_eq!(json["id"], 4);
    assert_eq!(json["status"], "Unmapped");
    assert!(json.get("mapped_term_url").is_none());

    let round: MappingEntity = serde_json::from_value(json).expect("deserialize entity");
    assert_eq!(round, entity);
}
