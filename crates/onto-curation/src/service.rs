//! Curation operations over a [`MappingStore`].

use chrono::{DateTime, Utc};
use onto_map::SuggestionRanker;
use onto_model::{EntityId, EntityTypeRegistry, MappingEntity, OntologyTerm};
use tracing::{info, info_span};

use crate::edit::{EditOutcome, MappingEdit};
use crate::error::{CurationError, Result};
use crate::filter::{EavFilterComposer, MappingsFilter};
use crate::page::{Page, PageRequest};
use crate::store::MappingStore;
use crate::transition::StatusTransitionValidator;

/// Wires the validator, filter composer and ranker to one store.
#[derive(Debug)]
pub struct CurationService<S> {
    store: S,
    types: EntityTypeRegistry,
    validator: StatusTransitionValidator,
    composer: EavFilterComposer,
    ranker: SuggestionRanker,
}

impl<S: MappingStore> CurationService<S> {
    pub fn new(
        store: S,
        types: EntityTypeRegistry,
        composer: EavFilterComposer,
        ranker: SuggestionRanker,
    ) -> Self {
        Self {
            store,
            types,
            validator: StatusTransitionValidator,
            composer,
            ranker,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    pub fn types(&self) -> &EntityTypeRegistry {
        &self.types
    }

    /// Applies a curator edit, stamping changes with the current time.
    pub fn update(
        &mut self,
        id: EntityId,
        edit: &MappingEdit,
    ) -> Result<(MappingEntity, EditOutcome)> {
        self.update_at(id, edit, Utc::now())
    }

    /// Applies a curator edit. The entity is saved only when the edit changed
    /// it; a rejected edit writes nothing.
    pub fn update_at(
        &mut self,
        id: EntityId,
        edit: &MappingEdit,
        now: DateTime<Utc>,
    ) -> Result<(MappingEntity, EditOutcome)> {
        let mut entity = self.store.load(id)?;
        let outcome = self.validator.apply(&mut entity, edit, now)?;
        if outcome.changed() {
            self.store.save(entity.clone())?;
        }
        Ok((entity, outcome))
    }

    /// One page of the mappings matching `filter`.
    pub fn search(
        &self,
        filter: &MappingsFilter,
        page: PageRequest,
    ) -> Result<Page<MappingEntity>> {
        let predicate = self.composer.compose(filter);
        self.store.query(&predicate, page)
    }

    /// Recomputes the suggestion set of every entity of `entity_type`.
    ///
    /// Nothing is saved unless the whole batch ranked. Returns the number of
    /// entities updated.
    pub fn refresh_suggestions(
        &mut self,
        entity_type: &str,
        catalog: &[OntologyTerm],
    ) -> Result<usize> {
        let span = info_span!("refresh_suggestions", entity_type);
        let _guard = span.enter();

        if self.types.get(entity_type).is_none() {
            return Err(CurationError::UnknownEntityType(entity_type.to_string()));
        }
        let mut entities = self.store.all_by_type(entity_type)?;
        let updated = self.ranker.refresh(&mut entities, &self.types, catalog)?;
        for entity in entities {
            self.store.save(entity)?;
        }
        info!(updated, "suggestions refreshed");
        Ok(updated)
    }
}
