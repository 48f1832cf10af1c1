//! Entity-attribute-value index over mapping values.
//!
//! Each entity's attributes are stored as `(entity, key, value)` rows. The
//! two lookup primitives answer "which entities have some row with key K
//! and a value in V" (or a value containing some text); callers AND
//! several constraints by intersecting the returned id sets, so that the
//! rows satisfying different keys may differ.

use std::collections::{BTreeMap, BTreeSet};

use onto_model::{EntityId, MappingEntity, fold_case};

/// One stored attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeRow {
    pub entity_id: EntityId,
    pub key: String,
    pub value: String,
}

/// Attribute rows indexed by lowercase key and value.
#[derive(Debug, Clone, Default)]
pub struct AttributeStore {
    by_key: BTreeMap<String, BTreeMap<String, BTreeSet<EntityId>>>,
    by_entity: BTreeMap<EntityId, Vec<AttributeRow>>,
}

impl AttributeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Indexes an entity's values, replacing any rows it had.
    pub fn insert_entity(&mut self, entity: &MappingEntity) {
        self.remove_entity(entity.id);
        let rows: Vec<AttributeRow> = entity
            .values
            .iter()
            .map(|(key, value)| AttributeRow {
                entity_id: entity.id,
                key: key.clone(),
                value: value.clone(),
            })
            .collect();
        for row in &rows {
            self.by_key
                .entry(fold_case(&row.key))
                .or_default()
                .entry(fold_case(&row.value))
                .or_default()
                .insert(row.entity_id);
        }
        self.by_entity.insert(entity.id, rows);
    }

    pub fn remove_entity(&mut self, id: EntityId) {
        let Some(rows) = self.by_entity.remove(&id) else {
            return;
        };
        for row in rows {
            let key = fold_case(&row.key);
            let Some(values) = self.by_key.get_mut(&key) else {
                continue;
            };
            let value = fold_case(&row.value);
            if let Some(ids) = values.get_mut(&value) {
                ids.remove(&id);
                if ids.is_empty() {
                    values.remove(&value);
                }
            }
            if values.is_empty() {
                self.by_key.remove(&key);
            }
        }
    }

    pub fn rows(&self, id: EntityId) -> &[AttributeRow] {
        self.by_entity.get(&id).map_or(&[], Vec::as_slice)
    }

    /// Entities with some row whose key is `key` and whose value is one of
    /// `values`. Both comparisons ignore case.
    pub fn ids_matching<S: AsRef<str>>(&self, key: &str, values: &[S]) -> BTreeSet<EntityId> {
        let Some(by_value) = self.by_key.get(&fold_case(key)) else {
            return BTreeSet::new();
        };
        values
            .iter()
            .filter_map(|value| by_value.get(&fold_case(value.as_ref())))
            .flatten()
            .copied()
            .collect()
    }

    /// Entities with some row under one of `keys` whose value contains
    /// `needle`, ignoring case.
    pub fn ids_containing<S: AsRef<str>>(&self, keys: &[S], needle: &str) -> BTreeSet<EntityId> {
        let needle = fold_case(needle);
        keys.iter()
            .filter_map(|key| self.by_key.get(&fold_case(key.as_ref())))
            .flat_map(|by_value| {
                by_value
                    .iter()
                    .filter(|(value, _)| value.contains(&needle))
                    .flat_map(|(_, ids)| ids.iter().copied())
            })
            .collect()
    }
}

/// Intersection of every set; `None` when there are no sets to intersect.
pub fn intersect_ids<I>(sets: I) -> Option<BTreeSet<EntityId>>
where
    I: IntoIterator<Item = BTreeSet<EntityId>>,
{
    sets.into_iter().reduce(|acc, set| {
        if acc.len() <= set.len() {
            acc.into_iter().filter(|id| set.contains(id)).collect()
        } else {
            set.into_iter().filter(|id| acc.contains(id)).collect()
        }
    })
}
