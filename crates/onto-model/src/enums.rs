//! Type-safe enumerations for curation metadata.
//!
//! The admin catalog stores these as free strings; parsing is
//! case-insensitive so that values coming from older records or from
//! request parameters resolve to the same variant.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::ModelError;
use crate::text::{eq_ignore_case, fold_case};

/// Curation status of a mapping entity.
///
/// Transitions between statuses are governed by the curation workflow,
/// not by this type.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Status {
    /// No ontology term assigned yet. Initial state of every new mapping.
    #[default]
    Unmapped,
    /// An ontology term has been assigned.
    Mapped,
    /// A mapped term is flagged for review.
    Revise,
    /// A new ontology term has been requested from the terminology provider.
    Request,
}

impl Status {
    pub const ALL: [Status; 4] = [
        Status::Unmapped,
        Status::Mapped,
        Status::Revise,
        Status::Request,
    ];

    /// Returns the label stored in the catalog.
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Unmapped => "Unmapped",
            Status::Mapped => "Mapped",
            Status::Revise => "Revise",
            Status::Request => "Request",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Status::ALL
            .into_iter()
            .find(|status| eq_ignore_case(status.as_str(), trimmed))
            .ok_or_else(|| ModelError::UnknownStatus(s.to_string()))
    }
}

/// How a mapping was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MappingType {
    /// Assigned automatically (rules or accepted suggestions).
    Inferred,
    /// Assigned or confirmed by a curator.
    Curated,
}

impl MappingType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MappingType::Inferred => "Inferred",
            MappingType::Curated => "Curated",
        }
    }
}

impl fmt::Display for MappingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MappingType {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match fold_case(s.trim()).as_str() {
            "inferred" => Ok(MappingType::Inferred),
            "curated" => Ok(MappingType::Curated),
            _ => Err(ModelError::UnknownMappingType(s.to_string())),
        }
    }
}

/// Origin of the term assigned to a mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Source {
    /// A mapping rule from the rules catalog.
    Rule,
    /// A term picked from the NCIt ontology.
    #[serde(rename = "NCIt")]
    Ontology,
    /// Imported from the legacy mapping files.
    Legacy,
}

impl Source {
    pub fn as_str(&self) -> &'static str {
        match self {
            Source::Rule => "Rule",
            Source::Ontology => "NCIt",
            Source::Legacy => "Legacy",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Source {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        [Source::Rule, Source::Ontology, Source::Legacy]
            .into_iter()
            .find(|source| eq_ignore_case(source.as_str(), trimmed))
            .ok_or_else(|| ModelError::UnknownSource(s.to_string()))
    }
}

/// Attribute keys used by the data providers' submission templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MappingKeyName {
    DataSource,
    SampleDiagnosis,
    TumorType,
    OriginTissue,
    TreatmentName,
}

impl MappingKeyName {
    pub fn as_str(&self) -> &'static str {
        match self {
            MappingKeyName::DataSource => "DataSource",
            MappingKeyName::SampleDiagnosis => "SampleDiagnosis",
            MappingKeyName::TumorType => "TumorType",
            MappingKeyName::OriginTissue => "OriginTissue",
            MappingKeyName::TreatmentName => "TreatmentName",
        }
    }
}

impl fmt::Display for MappingKeyName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
