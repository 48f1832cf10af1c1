use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ModelError {
    #[error("unknown status: {0}")]
    UnknownStatus(String),
    #[error("unknown mapping type: {0}")]
    UnknownMappingType(String),
    #[error("unknown mapping source: {0}")]
    UnknownSource(String),
    #[error("entity type name must not be empty")]
    EmptyEntityTypeName,
    #[error("mapping key must not be empty (entity type {entity_type})")]
    EmptyMappingKey { entity_type: String },
    #[error("mapping key '{key}' is defined twice for entity type {entity_type}")]
    DuplicateMappingKey { entity_type: String, key: String },
    #[error("entity type '{0}' is defined twice")]
    DuplicateEntityType(String),
    #[error("key '{key}' is not defined by entity type {entity_type}")]
    UndefinedKey { entity_type: String, key: String },
}

pub type Result<T> = std::result::Result<T, ModelError>;
