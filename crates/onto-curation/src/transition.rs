//! Curation status workflow.
//!
//! Legal status changes are listed in [`TRANSITIONS`]; anything else is
//! rejected. Staying in the same status is always allowed and does nothing.
//!
//! ```text
//! Unmapped -> Mapped
//! Unmapped -> Request
//! Mapped   -> Revise
//! Revise   -> Mapped
//! Request  -> Unmapped   (clears the mapped term)
//! ```

use onto_model::{MappingEntity, Status};

use crate::error::{CurationError, Result};

/// Side effect applied to the entity when a transition fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SideEffect {
    None,
    /// Clears mapped term URL, label, source and mapping type.
    ClearMappedTerm,
}

impl SideEffect {
    pub fn apply_to(self, entity: &mut MappingEntity) {
        match self {
            SideEffect::None => {}
            SideEffect::ClearMappedTerm => entity.clear_mapped_term(),
        }
    }
}

/// One row of the transition table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: Status,
    pub to: Status,
    pub effect: SideEffect,
}

const fn transition(from: Status, to: Status, effect: SideEffect) -> Transition {
    Transition { from, to, effect }
}

/// Every legal status change.
pub const TRANSITIONS: &[Transition] = &[
    transition(Status::Unmapped, Status::Mapped, SideEffect::None),
    transition(Status::Unmapped, Status::Request, SideEffect::None),
    transition(Status::Mapped, Status::Revise, SideEffect::None),
    transition(Status::Revise, Status::Mapped, SideEffect::None),
    transition(Status::Request, Status::Unmapped, SideEffect::ClearMappedTerm),
];

/// Table-driven validator for status changes.
#[derive(Debug, Clone, Copy, Default)]
pub struct StatusTransitionValidator;

impl StatusTransitionValidator {
    /// Looks up `from -> to`, returning the side effect to apply.
    ///
    /// # Errors
    ///
    /// [`CurationError::IllegalTransition`] when the pair is not in the table.
    pub fn check(&self, from: Status, to: Status) -> Result<SideEffect> {
        if from == to {
            return Ok(SideEffect::None);
        }
        TRANSITIONS
            .iter()
            .find(|t| t.from == from && t.to == to)
            .map(|t| t.effect)
            .ok_or(CurationError::IllegalTransition { from, to })
    }

    pub fn is_allowed(&self, from: Status, to: Status) -> bool {
        self.check(from, to).is_ok()
    }

    /// Statuses reachable from `from` in one step, excluding `from` itself.
    pub fn targets(&self, from: Status) -> impl Iterator<Item = Status> {
        TRANSITIONS
            .iter()
            .filter(move |t| t.from == from)
            .map(|t| t.to)
    }
}
