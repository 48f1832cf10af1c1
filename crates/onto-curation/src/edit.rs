//! Applying curator edits to a mapping entity.

use chrono::{DateTime, Utc};
use onto_model::{MappingEntity, MappingType, Source, Status, eq_ignore_case};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::Result;
use crate::transition::StatusTransitionValidator;

/// A curator's requested change to one mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingEdit {
    /// Requested status.
    pub status: Status,
    #[serde(default)]
    pub mapped_term_url: Option<String>,
    #[serde(default)]
    pub mapped_term_label: Option<String>,
    #[serde(default)]
    pub source: Option<Source>,
    #[serde(default)]
    pub mapping_type: Option<MappingType>,
}

impl MappingEdit {
    /// An edit that only requests a status.
    pub fn status(status: Status) -> Self {
        Self {
            status,
            ..Self::default()
        }
    }

    /// Sets the proposed term.
    pub fn with_term(mut self, url: impl Into<String>, label: impl Into<String>) -> Self {
        self.mapped_term_url = Some(url.into());
        self.mapped_term_label = Some(label.into());
        self
    }

    pub fn with_source(mut self, source: Source) -> Self {
        self.source = Some(source);
        self
    }

    pub fn with_mapping_type(mut self, mapping_type: MappingType) -> Self {
        self.mapping_type = Some(mapping_type);
        self
    }
}

/// What an applied edit changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditOutcome {
    pub term_changed: bool,
    pub status_changed: bool,
    pub from: Status,
    pub to: Status,
}

impl EditOutcome {
    pub fn changed(&self) -> bool {
        self.term_changed || self.status_changed
    }
}

impl StatusTransitionValidator {
    /// Applies `edit` to `entity`.
    ///
    /// The term fields are compared first: a new term URL (compared ignoring
    /// case, absent read as empty) replaces URL, label, source and mapping
    /// type. Giving a term to an entity that had none requests
    /// [`Status::Mapped`] whatever status the edit asked for. The status
    /// change is then checked against the transition table.
    /// `date_updated` is set to `now` only when something changed.
    ///
    /// # Errors
    ///
    /// [`CurationError::IllegalTransition`](crate::CurationError::IllegalTransition);
    /// `entity` is left unmodified.
    pub fn apply(
        &self,
        entity: &mut MappingEntity,
        edit: &MappingEdit,
        now: DateTime<Utc>,
    ) -> Result<EditOutcome> {
        let mut working = entity.clone();

        let previous_url = entity.mapped_term_url_or_empty();
        let new_url = edit.mapped_term_url.as_deref().unwrap_or("");
        let term_changed = !eq_ignore_case(previous_url, new_url);
        if term_changed {
            working.mapped_term_url = (!new_url.is_empty()).then(|| new_url.to_string());
            working.mapped_term_label = edit.mapped_term_label.clone();
            working.source = edit.source;
            working.mapping_type = edit.mapping_type;
        }

        let mut requested = edit.status;
        if previous_url.is_empty() && !new_url.is_empty() {
            debug!(entity = %entity.id, "term assigned, promoting requested status to Mapped");
            requested = Status::Mapped;
        }

        let from = working.status;
        let effect = self.check(from, requested)?;
        let status_changed = from != requested;
        if status_changed {
            effect.apply_to(&mut working);
            working.status = requested;
        }

        let outcome = EditOutcome {
            term_changed,
            status_changed,
            from,
            to: requested,
        };
        if outcome.changed() {
            working.date_updated = now;
            *entity = working;
            info!(
                entity = %entity.id,
                from = %outcome.from,
                to = %outcome.to,
                term_changed,
                "mapping updated"
            );
        }
        Ok(outcome)
    }
}
