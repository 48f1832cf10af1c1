//! Data model for curating mappings between provider attributes and ontology terms.

#![deny(unsafe_code)]

pub mod entity;
pub mod enums;
pub mod error;
pub mod ids;
pub mod ontology;
pub mod text;

pub use entity::{EntityType, EntityTypeRegistry, MappingEntity, MappingKey};
pub use enums::{MappingKeyName, MappingType, Source, Status};
pub use error::{ModelError, Result};
pub use ids::EntityId;
pub use ontology::{OntologyTerm, Suggestion};
pub use text::{eq_ignore_case, fold_case};
