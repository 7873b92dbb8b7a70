//! TF-IDF vectorisation fitted on a single small corpus.
//!
//! Tokens are lowercase runs of alphanumeric or `_` characters of at least two
//! characters, with English stop words removed. Term weights are raw counts
//! times the smoothed inverse document frequency
//! `ln((1 + n) / (1 + df)) + 1`, and every row is L2-normalised.

use crate::stopwords::is_stop_word;
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

const MIN_TOKEN_CHARS: usize = 2;

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Split `text` into terms, stop words excluded.
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !is_word_char(c))
        .filter(|token| token.chars().count() >= MIN_TOKEN_CHARS)
        .filter(|token| !is_stop_word(token))
        .map(str::to_string)
        .collect()
}

/// Vocabulary and idf weights learned from one corpus.
#[derive(Debug, Clone)]
pub struct TfidfVectorizer {
    vocabulary: BTreeMap<String, usize>,
    idf: Vec<f64>,
}

impl TfidfVectorizer {
    #[cfg(test)]
    fn fit<S: AsRef<str>>(documents: &[S]) -> Self {
        let tokenized: Vec<Vec<String>> = documents.iter().map(|d| tokenize(d.as_ref())).collect();
        Self::fit_tokens(&tokenized)
    }

    fn fit_tokens(tokenized: &[Vec<String>]) -> Self {
        let terms: BTreeSet<&str> = tokenized
            .iter()
            .flat_map(|doc| doc.iter().map(String::as_str))
            .collect();
        let vocabulary: BTreeMap<String, usize> = terms
            .into_iter()
            .enumerate()
            .map(|(index, term)| (term.to_string(), index))
            .collect();

        let mut document_frequency = vec![0usize; vocabulary.len()];
        for doc in tokenized {
            let seen: BTreeSet<usize> = doc.iter().filter_map(|t| vocabulary.get(t).copied()).collect();
            for index in seen {
                document_frequency[index] += 1;
            }
        }

        let n = tokenized.len() as f64;
        let idf = document_frequency
            .into_iter()
            .map(|df| ((1.0 + n) / (1.0 + df as f64)).ln() + 1.0)
            .collect();

        Self { vocabulary, idf }
    }

    /// Fit on `documents` and return one normalised row per document.
    pub fn fit_transform<S: AsRef<str>>(documents: &[S]) -> (Self, Vec<Vec<f64>>) {
        let tokenized: Vec<Vec<String>> = documents.iter().map(|d| tokenize(d.as_ref())).collect();
        let vectorizer = Self::fit_tokens(&tokenized);
        let rows = tokenized.iter().map(|doc| vectorizer.weigh(doc)).collect();
        debug!(
            "Fitted TF-IDF on {} documents, {} terms",
            documents.len(),
            vectorizer.vocabulary.len()
        );
        (vectorizer, rows)
    }

    #[cfg(test)]
    fn transform(&self, text: &str) -> Vec<f64> {
        self.weigh(&tokenize(text))
    }

    fn weigh(&self, tokens: &[String]) -> Vec<f64> {
        let mut row = vec![0.0; self.vocabulary.len()];
        for token in tokens {
            if let Some(&index) = self.vocabulary.get(token) {
                row[index] += 1.0;
            }
        }
        for (weight, idf) in row.iter_mut().zip(&self.idf) {
            *weight *= idf;
        }
        l2_normalize(&mut row);
        row
    }

    #[cfg(test)]
    fn vocabulary(&self) -> impl Iterator<Item = &str> {
        self.vocabulary.keys().map(String::as_str)
    }
}

fn l2_normalize(row: &mut [f64]) {
    let norm = row.iter().map(|w| w * w).sum::<f64>().sqrt();
    if norm > 0.0 {
        for weight in row.iter_mut() {
            *weight /= norm;
        }
    }
}
