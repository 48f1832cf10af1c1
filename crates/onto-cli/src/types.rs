//! Command results handed to the summary printers.

use std::path::PathBuf;

use onto_curation::EditOutcome;
use onto_model::{EntityId, MappingEntity, Status, Suggestion};

/// Best suggestion of one refreshed mapping.
#[derive(Debug, Clone)]
pub struct SuggestionRow {
    pub id: EntityId,
    pub entity_type: String,
    pub status: Status,
    /// The mapping's values under its similarity keys, joined for display.
    pub values: String,
    pub best: Option<Suggestion>,
    pub count: usize,
}

#[derive(Debug, Clone)]
pub struct SuggestResult {
    pub document: PathBuf,
    pub refreshed: usize,
    pub rows: Vec<SuggestionRow>,
    pub written: bool,
}

#[derive(Debug, Clone)]
pub struct EditResult {
    pub entity: MappingEntity,
    pub outcome: EditOutcome,
    pub written: bool,
}
