//! JSON curation documents.
//!
//! A document holds the entity type definitions and every mapping entity.
//! Saving writes a temp file next to the target and renames it into place.

use std::collections::BTreeSet;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use onto_model::{EntityType, EntityTypeRegistry, MappingEntity, OntologyTerm};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{CurationError, Result};
use crate::store::InMemoryMappingStore;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CurationDocument {
    pub entity_types: Vec<EntityType>,
    #[serde(default)]
    pub mappings: Vec<MappingEntity>,
}

impl CurationDocument {
    /// Reads and validates a document.
    pub fn load(path: &Path) -> Result<Self> {
        let document: Self = read_json(path)?;
        document.validate()?;
        info!(
            path = %path.display(),
            entity_types = document.entity_types.len(),
            mappings = document.mappings.len(),
            "loaded curation document"
        );
        Ok(document)
    }

    /// Writes the document as pretty JSON, replacing `path` atomically.
    pub fn save(&self, path: &Path) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(self).map_err(|source| CurationError::Json {
            path: path.to_path_buf(),
            source,
        })?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| CurationError::Io {
                operation: "create directory",
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let temp_path = temp_path_for(path);
        let mut file = File::create(&temp_path).map_err(|source| CurationError::Io {
            operation: "create",
            path: temp_path.clone(),
            source,
        })?;
        file.write_all(&bytes).map_err(|source| CurationError::Io {
            operation: "write",
            path: temp_path.clone(),
            source,
        })?;
        file.sync_all().map_err(|source| CurationError::Io {
            operation: "sync",
            path: temp_path.clone(),
            source,
        })?;
        fs::rename(&temp_path, path).map_err(|source| CurationError::Io {
            operation: "rename",
            path: temp_path.clone(),
            source,
        })?;

        info!(path = %path.display(), mappings = self.mappings.len(), "saved curation document");
        Ok(())
    }

    pub fn registry(&self) -> Result<EntityTypeRegistry> {
        Ok(EntityTypeRegistry::new(self.entity_types.iter().cloned())?)
    }

    /// Checks type names, attribute keys and id uniqueness.
    pub fn validate(&self) -> Result<()> {
        let registry = self.registry()?;
        let mut ids = BTreeSet::new();
        for mapping in &self.mappings {
            let entity_type = registry
                .get(&mapping.entity_type)
                .ok_or_else(|| CurationError::UnknownEntityType(mapping.entity_type.clone()))?;
            mapping.validate_against(entity_type)?;
            if !ids.insert(mapping.id) {
                return Err(CurationError::DuplicateEntity(mapping.id));
            }
        }
        Ok(())
    }

    /// Splits the document into its registry and a store of its mappings.
    pub fn into_store(self) -> Result<(EntityTypeRegistry, InMemoryMappingStore)> {
        self.validate()?;
        let registry = self.registry()?;
        Ok((registry, self.mappings.into_iter().collect()))
    }

    /// Rebuilds a document from a store, keeping the given type definitions.
    pub fn from_store(entity_types: Vec<EntityType>, store: &InMemoryMappingStore) -> Self {
        Self {
            entity_types,
            mappings: store.iter().cloned().collect(),
        }
    }
}

/// Reads an ontology catalog: a JSON array of terms.
pub fn load_catalog(path: &Path) -> Result<Vec<OntologyTerm>> {
    let terms: Vec<OntologyTerm> = read_json(path)?;
    info!(path = %path.display(), terms = terms.len(), "loaded ontology catalog");
    Ok(terms)
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let text = fs::read_to_string(path).map_err(|source| CurationError::Io {
        operation: "read",
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| CurationError::Json {
        path: path.to_path_buf(),
        source,
    })
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
