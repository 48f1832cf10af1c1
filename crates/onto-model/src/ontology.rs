use serde::{Deserialize, Serialize};

/// An entry of the ontology catalog.
///
/// Owned by the catalog; the engines only read it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OntologyTerm {
    /// External identifier, e.g. `http://purl.obolibrary.org/obo/NCIT_C4627`.
    pub url: String,
    /// Canonical label.
    pub label: String,
    #[serde(default)]
    pub synonyms: Vec<String>,
}

impl OntologyTerm {
    pub fn new(url: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            label: label.into(),
            synonyms: Vec::new(),
        }
    }

    pub fn with_synonyms<I, S>(mut self, synonyms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.synonyms = synonyms.into_iter().map(Into::into).collect();
        self
    }
}

/// A scored candidate ontology term for a mapping entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    pub term_url: String,
    pub term_label: String,
    /// Similarity score in `[0, 1]`.
    pub score: f64,
}

impl Suggestion {
    pub fn for_term(term: &OntologyTerm, score: f64) -> Self {
        Self {
            term_url: term.url.clone(),
            term_label: term.label.clone(),
            score,
        }
    }
}
