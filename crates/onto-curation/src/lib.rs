//! Curation workflow for ontology mappings.
//!
//! - [`StatusTransitionValidator`]: the status workflow and edit application.
//! - [`EavFilterComposer`]: catalog search predicates over attribute rows.
//! - [`MappingStore`]: the persistence collaborator, with an in-memory
//!   implementation and JSON [`CurationDocument`]s.
//! - [`CurationService`]: the operations above wired to one store.

#![deny(unsafe_code)]

pub mod attributes;
pub mod document;
pub mod edit;
pub mod error;
pub mod filter;
pub mod page;
pub mod service;
pub mod store;
pub mod transition;

pub use attributes::{AttributeRow, AttributeStore, intersect_ids};
pub use document::{CurationDocument, load_catalog};
pub use edit::{EditOutcome, MappingEdit};
pub use error::{CurationError, Result};
pub use filter::{Clause, EavFilterComposer, MappingPredicate, MappingsFilter, SearchConfig};
pub use page::{DEFAULT_PAGE_SIZE, Page, PageRequest};
pub use service::CurationService;
pub use store::{InMemoryMappingStore, MappingStore};
pub use transition::{SideEffect, StatusTransitionValidator, TRANSITIONS, Transition};
