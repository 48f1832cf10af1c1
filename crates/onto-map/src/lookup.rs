//! Interactive free-text lookup of ontology terms.
//!
//! A curator types a label; the lookup turns it into a source entity shaped
//! like the provider records of the requested type and asks a [`TermIndex`]
//! for the best matches. Independent of the batch ranking pass.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use onto_model::{MappingKeyName, OntologyTerm, Suggestion, eq_ignore_case};
use tracing::debug;

use crate::config::LookupConfig;
use crate::error::LookupError;
use crate::term::TermScorer;

/// Identifier given to entities built from free text.
pub const FREE_TEXT_ENTRY_ID: &str = "free-text-entry";

/// Placeholder for attributes the curator did not type.
const NOT_GIVEN: &str = "-";

/// An ad-hoc entity submitted to a [`TermIndex`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceEntity {
    pub id: String,
    pub entity_type: String,
    pub data: BTreeMap<String, String>,
}

impl SourceEntity {
    /// Builds the entity for a free-text `input`.
    ///
    /// Treatments carry only a treatment name; any other type is treated as
    /// a diagnosis with unknown tumor type and origin tissue.
    pub fn free_text(input: &str, entity_type: &str) -> Self {
        let mut data = BTreeMap::new();
        if eq_ignore_case(entity_type, "treatment") {
            data.insert(
                MappingKeyName::TreatmentName.as_str().to_string(),
                input.to_string(),
            );
        } else {
            data.insert(
                MappingKeyName::SampleDiagnosis.as_str().to_string(),
                input.to_string(),
            );
            data.insert(
                MappingKeyName::TumorType.as_str().to_string(),
                NOT_GIVEN.to_string(),
            );
            data.insert(
                MappingKeyName::OriginTissue.as_str().to_string(),
                NOT_GIVEN.to_string(),
            );
        }
        Self {
            id: FREE_TEXT_ENTRY_ID.to_string(),
            entity_type: entity_type.to_string(),
            data,
        }
    }
}

/// A pre-built search index over the ontology catalog.
pub trait TermIndex {
    /// Up to `max_results` matches for `entity`, best first.
    fn find_suggestions(
        &self,
        entity: &SourceEntity,
        max_results: usize,
    ) -> Result<Vec<Suggestion>, LookupError>;
}

/// Front door for ad-hoc term lookups.
#[derive(Debug, Clone)]
pub struct FreeTextLookup<I> {
    index: I,
    max_results: usize,
}

impl<I: TermIndex> FreeTextLookup<I> {
    pub fn new(index: I, config: &LookupConfig) -> Self {
        Self {
            index,
            max_results: config.max_results,
        }
    }

    pub fn find(&self, input: &str, entity_type: &str) -> Result<Vec<Suggestion>, LookupError> {
        if input.trim().is_empty() {
            return Err(LookupError::EmptyInput);
        }
        let entity = SourceEntity::free_text(input, entity_type);
        let suggestions = self.index.find_suggestions(&entity, self.max_results)?;
        debug!(entity_type, results = suggestions.len(), "free-text lookup");
        Ok(suggestions)
    }
}

/// A [`TermIndex`] that scans an in-memory catalog.
///
/// Scores the mean label-or-synonym similarity over the entity's values,
/// ignoring placeholder values.
#[derive(Debug, Clone)]
pub struct InMemoryTermIndex {
    scorer: TermScorer,
    terms: Vec<OntologyTerm>,
}

impl InMemoryTermIndex {
    pub fn new(scorer: TermScorer, terms: Vec<OntologyTerm>) -> Self {
        Self { scorer, terms }
    }
}

impl TermIndex for InMemoryTermIndex {
    fn find_suggestions(
        &self,
        entity: &SourceEntity,
        max_results: usize,
    ) -> Result<Vec<Suggestion>, LookupError> {
        let values: Vec<&str> = entity
            .data
            .values()
            .map(String::as_str)
            .filter(|value| !self.scorer.similarity().is_unknown(value))
            .collect();
        if values.is_empty() {
            return Ok(Vec::new());
        }

        let mut matches: Vec<Suggestion> = self
            .terms
            .iter()
            .map(|term| {
                let total: f64 = values.iter().map(|v| self.scorer.score(v, term)).sum();
                Suggestion::for_term(term, total / values.len() as f64)
            })
            .collect();
        matches.sort_by(|a, b| match b.score.total_cmp(&a.score) {
            Ordering::Equal => a.term_url.cmp(&b.term_url),
            other => other,
        });
        matches.truncate(max_results);
        Ok(matches)
    }
}
