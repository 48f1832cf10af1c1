//! Mapping entities and the entity types that define their attributes.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::enums::{MappingType, Source, Status};
use crate::ids::EntityId;
use crate::ontology::Suggestion;
use crate::text::fold_case;
use crate::{ModelError, Result};

/// Definition of one attribute key of an entity type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingKey {
    /// Attribute key, e.g. `SampleDiagnosis`.
    pub key: String,
    /// Whether values under this key take part in ontology suggestion scoring.
    #[serde(default)]
    pub use_in_similarity: bool,
}

impl MappingKey {
    pub fn new(key: impl Into<String>, use_in_similarity: bool) -> Self {
        Self {
            key: key.into(),
            use_in_similarity,
        }
    }
}

/// A named category of mapping entities (e.g. "Diagnosis", "Treatment").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityType {
    pub name: String,
    /// Ordered key definitions. Key names are unique.
    pub mapping_keys: Vec<MappingKey>,
}

impl EntityType {
    /// Creates an entity type, rejecting empty names and duplicated keys.
    pub fn new(name: impl Into<String>, mapping_keys: Vec<MappingKey>) -> Result<Self> {
        let entity_type = Self {
            name: name.into(),
            mapping_keys,
        };
        entity_type.validate()?;
        Ok(entity_type)
    }

    /// Checks the invariants that deserialization cannot enforce.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(ModelError::EmptyEntityTypeName);
        }
        let mut seen = BTreeSet::new();
        for mapping_key in &self.mapping_keys {
            if mapping_key.key.trim().is_empty() {
                return Err(ModelError::EmptyMappingKey {
                    entity_type: self.name.clone(),
                });
            }
            if !seen.insert(mapping_key.key.as_str()) {
                return Err(ModelError::DuplicateMappingKey {
                    entity_type: self.name.clone(),
                    key: mapping_key.key.clone(),
                });
            }
        }
        Ok(())
    }

    pub fn defines(&self, key: &str) -> bool {
        self.mapping_keys.iter().any(|k| k.key == key)
    }

    /// Keys flagged for use in similarity scoring, in definition order.
    pub fn scoring_keys(&self) -> impl Iterator<Item = &str> {
        self.mapping_keys
            .iter()
            .filter(|k| k.use_in_similarity)
            .map(|k| k.key.as_str())
    }
}

/// Entity types indexed by name. Names are unique ignoring case.
#[derive(Debug, Clone, Default)]
pub struct EntityTypeRegistry {
    by_name: BTreeMap<String, EntityType>,
}

impl EntityTypeRegistry {
    pub fn new(types: impl IntoIterator<Item = EntityType>) -> Result<Self> {
        let mut by_name = BTreeMap::new();
        for entity_type in types {
            entity_type.validate()?;
            let name = fold_case(&entity_type.name);
            if by_name.contains_key(&name) {
                return Err(ModelError::DuplicateEntityType(entity_type.name));
            }
            by_name.insert(name, entity_type);
        }
        Ok(Self { by_name })
    }

    pub fn get(&self, name: &str) -> Option<&EntityType> {
        self.by_name.get(&fold_case(name))
    }

    pub fn iter(&self) -> impl Iterator<Item = &EntityType> {
        self.by_name.values()
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

/// A curated record linking a provider's free-text attributes to an ontology term.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MappingEntity {
    pub id: EntityId,
    /// Name of the owning [`EntityType`].
    pub entity_type: String,
    /// Attribute key to value ("mapping values").
    pub values: BTreeMap<String, String>,
    #[serde(default)]
    pub status: Status,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mapped_term_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mapped_term_label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<Source>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mapping_type: Option<MappingType>,
    /// Current suggestion set, replaced wholesale on every recomputation.
    #[serde(default)]
    pub suggestions: Vec<Suggestion>,
    pub date_created: DateTime<Utc>,
    pub date_updated: DateTime<Utc>,
}

impl MappingEntity {
    /// Creates a new, unmapped entity.
    ///
    /// Every key in `values` must be defined by `entity_type`.
    pub fn new(
        id: EntityId,
        entity_type: &EntityType,
        values: BTreeMap<String, String>,
        now: DateTime<Utc>,
    ) -> Result<Self> {
        let entity = Self {
            id,
            entity_type: entity_type.name.clone(),
            values,
            status: Status::Unmapped,
            mapped_term_url: None,
            mapped_term_label: None,
            source: None,
            mapping_type: None,
            suggestions: Vec::new(),
            date_created: now,
            date_updated: now,
        };
        entity.validate_against(entity_type)?;
        Ok(entity)
    }

    /// Checks that the attribute keys are a subset of the type's keys.
    pub fn validate_against(&self, entity_type: &EntityType) -> Result<()> {
        match self.values.keys().find(|key| !entity_type.defines(key)) {
            Some(key) => Err(ModelError::UndefinedKey {
                entity_type: entity_type.name.clone(),
                key: key.clone(),
            }),
            None => Ok(()),
        }
    }

    pub fn value(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn values_as_map(&self) -> &BTreeMap<String, String> {
        &self.values
    }

    /// The mapped term URL, with an absent URL read as the empty string.
    pub fn mapped_term_url_or_empty(&self) -> &str {
        self.mapped_term_url.as_deref().unwrap_or("")
    }

    /// Replaces the suggestion set. Prior suggestions are dropped, never merged.
    pub fn replace_suggestions(&mut self, suggestions: Vec<Suggestion>) {
        self.suggestions = suggestions;
    }

    pub fn clear_mapped_term(&mut self) {
        self.mapped_term_url = None;
        self.mapped_term_label = None;
        self.source = None;
        self.mapping_type = None;
    }
}
