//! Scoring a free-text value against an ontology term.

use onto_model::OntologyTerm;

use crate::similarity::TermSimilarity;

/// Scores a value against a term's label, falling back to its synonyms.
#[derive(Debug, Clone)]
pub struct TermScorer {
    similarity: TermSimilarity,
    perfect_match_score: f64,
}

impl TermScorer {
    pub fn new(similarity: TermSimilarity, perfect_match_score: f64) -> Self {
        Self {
            similarity,
            perfect_match_score,
        }
    }

    pub fn similarity(&self) -> &TermSimilarity {
        &self.similarity
    }

    /// Label score when it reaches the perfect-match threshold; otherwise
    /// the best of the label and every synonym.
    pub fn score(&self, value: &str, term: &OntologyTerm) -> f64 {
        let mut highest = self.similarity.score(value, &term.label);
        if highest >= self.perfect_match_score {
            return highest;
        }
        for synonym in &term.synonyms {
            let score = self.similarity.score(value, synonym);
            if score > highest {
                highest = score;
            }
        }
        highest
    }
}
