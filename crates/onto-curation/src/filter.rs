//! Catalog search filters.
//!
//! [`EavFilterComposer::compose`] turns a [`MappingsFilter`] into a
//! [`MappingPredicate`]: a conjunction of clauses. Scalar clauses (status,
//! entity type, mapping type) are checked on the entity itself. Attribute
//! clauses are answered by the [`AttributeStore`], one independent id set
//! per clause, and then intersected.

use std::collections::{BTreeMap, BTreeSet};

use onto_model::{EntityId, MappingEntity, MappingKeyName, fold_case};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::attributes::{AttributeStore, intersect_ids};

/// Search request over the mapping catalog.
///
/// Empty sets leave the corresponding field unconstrained.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MappingsFilter {
    pub statuses: Vec<String>,
    pub entity_type_names: Vec<String>,
    pub mapping_types: Vec<String>,
    /// Free text matched against the label-bearing keys.
    pub label: Option<String>,
    /// Attribute key to accepted values.
    pub mapping_query: BTreeMap<String, Vec<String>>,
}

impl MappingsFilter {
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.statuses.push(status.into());
        self
    }

    pub fn with_entity_type(mut self, name: impl Into<String>) -> Self {
        self.entity_type_names.push(name.into());
        self
    }

    pub fn with_mapping_type(mut self, mapping_type: impl Into<String>) -> Self {
        self.mapping_types.push(mapping_type.into());
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Adds accepted values for one attribute key.
    pub fn with_values<I, S>(mut self, key: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.mapping_query
            .entry(key.into())
            .or_default()
            .extend(values.into_iter().map(Into::into));
        self
    }
}

/// Search settings read at start-up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Keys whose values hold human-readable names; the label query searches these.
    pub label_keys: Vec<String>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            label_keys: vec![
                MappingKeyName::SampleDiagnosis.as_str().to_string(),
                MappingKeyName::TreatmentName.as_str().to_string(),
            ],
        }
    }
}

/// One conjunct of a [`MappingPredicate`]. Values are lowercase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Clause {
    StatusIn(BTreeSet<String>),
    EntityTypeIn(BTreeSet<String>),
    MappingTypeIn(BTreeSet<String>),
    /// Some value under one of `keys` contains `text`.
    LabelContains { keys: Vec<String>, text: String },
    /// Some row with `key` has a value in `values`.
    AttributeIn { key: String, values: Vec<String> },
}

impl Clause {
    fn matches_scalar(&self, entity: &MappingEntity) -> bool {
        match self {
            Self::StatusIn(accepted) => accepted.contains(&fold_case(entity.status.as_str())),
            Self::EntityTypeIn(accepted) => accepted.contains(&fold_case(&entity.entity_type)),
            Self::MappingTypeIn(accepted) => entity
                .mapping_type
                .is_some_and(|t| accepted.contains(&fold_case(t.as_str()))),
            Self::LabelContains { .. } | Self::AttributeIn { .. } => true,
        }
    }

    fn matching_ids(&self, attributes: &AttributeStore) -> Option<BTreeSet<EntityId>> {
        match self {
            Self::LabelContains { keys, text } => {
                Some(attributes.ids_containing(keys.as_slice(), text))
            }
            Self::AttributeIn { key, values } => {
                Some(attributes.ids_matching(key, values.as_slice()))
            }
            Self::StatusIn(_) | Self::EntityTypeIn(_) | Self::MappingTypeIn(_) => None,
        }
    }
}

/// AND of clauses. A predicate with no clauses accepts everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MappingPredicate {
    clauses: Vec<Clause>,
}

impl MappingPredicate {
    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    pub fn is_unconstrained(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Checks the clauses over the entity's own fields.
    pub fn matches_scalars(&self, entity: &MappingEntity) -> bool {
        self.clauses.iter().all(|c| c.matches_scalar(entity))
    }

    /// Ids satisfying every attribute clause, or `None` when there is none.
    pub fn attribute_ids(&self, attributes: &AttributeStore) -> Option<BTreeSet<EntityId>> {
        intersect_ids(
            self.clauses
                .iter()
                .filter_map(|clause| clause.matching_ids(attributes)),
        )
    }

    /// The entities satisfying the whole predicate, in input order.
    pub fn select<'a, I>(&self, entities: I, attributes: &AttributeStore) -> Vec<&'a MappingEntity>
    where
        I: IntoIterator<Item = &'a MappingEntity>,
    {
        let ids = self.attribute_ids(attributes);
        entities
            .into_iter()
            .filter(|e| ids.as_ref().is_none_or(|ids| ids.contains(&e.id)))
            .filter(|e| self.matches_scalars(e))
            .collect()
    }
}

/// Builds [`MappingPredicate`]s from search requests.
#[derive(Debug, Clone, Default)]
pub struct EavFilterComposer {
    label_keys: Vec<String>,
}

impl EavFilterComposer {
    pub fn new(config: &SearchConfig) -> Self {
        Self {
            label_keys: config.label_keys.clone(),
        }
    }

    pub fn compose(&self, filter: &MappingsFilter) -> MappingPredicate {
        let mut clauses = Vec::new();

        if let Some(set) = lowercase_set(&filter.statuses) {
            clauses.push(Clause::StatusIn(set));
        }
        if let Some(set) = lowercase_set(&filter.entity_type_names) {
            clauses.push(Clause::EntityTypeIn(set));
        }
        if let Some(set) = lowercase_set(&filter.mapping_types) {
            clauses.push(Clause::MappingTypeIn(set));
        }
        if let Some(text) = filter.label.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
            clauses.push(Clause::LabelContains {
                keys: self.label_keys.clone(),
                text: fold_case(text),
            });
        }
        for (key, values) in &filter.mapping_query {
            if values.is_empty() {
                continue;
            }
            clauses.push(Clause::AttributeIn {
                key: key.clone(),
                values: values.iter().map(|v| fold_case(v)).collect(),
            });
        }

        debug!(clauses = clauses.len(), "composed mapping filter");
        MappingPredicate { clauses }
    }
}

fn lowercase_set(values: &[String]) -> Option<BTreeSet<String>> {
    let set: BTreeSet<String> = values.iter().map(|v| fold_case(v.trim())).collect();
    (!set.is_empty()).then_some(set)
}
