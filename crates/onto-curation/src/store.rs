//! Persistence collaborator for mapping entities.

use std::collections::BTreeMap;

use onto_model::{EntityId, MappingEntity, eq_ignore_case};
use tracing::trace;

use crate::attributes::AttributeStore;
use crate::error::{CurationError, Result};
use crate::filter::MappingPredicate;
use crate::page::{Page, PageRequest};

/// Loads, saves and queries mapping entities.
///
/// Implementations serialize writes per entity id; callers treat `save` as
/// last-write-wins.
pub trait MappingStore {
    /// Loads one entity by id.
    fn load(&self, id: EntityId) -> Result<MappingEntity>;

    /// Inserts or replaces one entity.
    fn save(&mut self, entity: MappingEntity) -> Result<()>;

    /// Entities matching `predicate`, ordered by id.
    fn query(&self, predicate: &MappingPredicate, page: PageRequest)
    -> Result<Page<MappingEntity>>;

    /// Every entity whose type name equals `entity_type`, ignoring case.
    fn all_by_type(&self, entity_type: &str) -> Result<Vec<MappingEntity>>;
}

/// Store holding entities in memory, with their values indexed as
/// attribute rows.
#[derive(Debug, Clone, Default)]
pub struct InMemoryMappingStore {
    entities: BTreeMap<EntityId, MappingEntity>,
    attributes: AttributeStore,
}

impl InMemoryMappingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// All entities ordered by id.
    pub fn iter(&self) -> impl Iterator<Item = &MappingEntity> {
        self.entities.values()
    }

    pub fn attributes(&self) -> &AttributeStore {
        &self.attributes
    }

    /// Smallest id not yet in use.
    pub fn next_id(&self) -> EntityId {
        self.entities
            .keys()
            .next_back()
            .map_or(EntityId::new(1), |id| EntityId::new(id.get() + 1))
    }
}

impl FromIterator<MappingEntity> for InMemoryMappingStore {
    fn from_iter<I: IntoIterator<Item = MappingEntity>>(iter: I) -> Self {
        let mut store = Self::new();
        for entity in iter {
            store.attributes.insert_entity(&entity);
            store.entities.insert(entity.id, entity);
        }
        store
    }
}

impl MappingStore for InMemoryMappingStore {
    fn load(&self, id: EntityId) -> Result<MappingEntity> {
        self.entities
            .get(&id)
            .cloned()
            .ok_or(CurationError::NotFound(id))
    }

    fn save(&mut self, entity: MappingEntity) -> Result<()> {
        trace!(entity = %entity.id, values = ?entity.values, "saving mapping");
        self.attributes.insert_entity(&entity);
        self.entities.insert(entity.id, entity);
        Ok(())
    }

    fn query(
        &self,
        predicate: &MappingPredicate,
        page: PageRequest,
    ) -> Result<Page<MappingEntity>> {
        let matches = predicate
            .select(self.entities.values(), &self.attributes)
            .into_iter()
            .cloned()
            .collect();
        Ok(page.slice(matches))
    }

    fn all_by_type(&self, entity_type: &str) -> Result<Vec<MappingEntity>> {
        Ok(self
            .entities
            .values()
            .filter(|e| eq_ignore_case(&e.entity_type, entity_type))
            .cloned()
            .collect())
    }
}
