//! Ontology suggestion engine.
//!
//! - [`TermSimilarity`]: normalized pairwise string similarity.
//! - [`WeightedFieldScorer`]: weighted multi-field aggregation.
//! - [`TermScorer`]: label-or-best-synonym scoring against a catalog term.
//! - [`SuggestionRanker`]: thresholded, capped suggestion sets per entity.
//! - [`FreeTextLookup`]: ad-hoc lookups against a [`TermIndex`].

#![deny(unsafe_code)]

pub mod config;
pub mod error;
pub mod lookup;
pub mod ranker;
pub mod similarity;
pub mod term;
pub mod weighted;

pub use config::{LookupConfig, SimilarityAlgorithm, SimilarityConfig};
pub use error::{LookupError, Result, ScoreError};
pub use lookup::{FreeTextLookup, InMemoryTermIndex, SourceEntity, TermIndex};
pub use ranker::SuggestionRanker;
pub use similarity::{SimilarityComparator, TermSimilarity, UNKNOWN_ELEMENT};
pub use term::TermScorer;
pub use weighted::{WeightedFieldScorer, rescale_weights, uniform_weights, weighted_sum};
