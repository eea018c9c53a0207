//! TF-IDF over a tiny in-memory corpus, used as a lexical similarity proxy.
//!
//! Term frequency is the raw count of a term in a document. Inverse document
//! frequency is `1 + ln(N / (1 + df))`, so a term present in every document of
//! a two-document corpus weighs `1 + ln(2/3) ≈ 0.59`.

use std::collections::{HashMap, HashSet};

const STOP_WORDS: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "by", "for", "from", "has", "have", "in", "is",
    "it", "its", "of", "on", "or", "our", "that", "the", "their", "this", "to", "was", "we",
    "were", "will", "with", "you", "your",
];

/// Lowercased alphanumeric tokens with stop words removed.
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty() && !STOP_WORDS.contains(t))
        .map(String::from)
        .collect()
}

pub struct TfIdfCorpus {
    term_counts: Vec<HashMap<String, usize>>,
}

impl TfIdfCorpus {
    pub fn new(documents: &[&str]) -> Self {
        let term_counts = documents
            .iter()
            .map(|doc| {
                let mut counts: HashMap<String, usize> = HashMap::new();
                for token in tokenize(doc) {
                    *counts.entry(token).or_insert(0) += 1;
                }
                counts
            })
            .collect();
        Self { term_counts }
    }

    pub fn len(&self) -> usize {
        self.term_counts.len()
    }

    /// Number of documents containing `term`.
    pub fn document_frequency(&self, term: &str) -> usize {
        self.term_counts
            .iter()
            .filter(|counts| counts.contains_key(term))
            .count()
    }

    pub fn idf(&self, term: &str) -> f64 {
        let n = self.len() as f64;
        let df = self.document_frequency(term) as f64;
        1.0 + (n / (1.0 + df)).ln()
    }

    /// TF-IDF weight of `term` in document `doc`; zero for unknown documents.
    pub fn tf_idf(&self, term: &str, doc: usize) -> f64 {
        let tf = self
            .term_counts
            .get(doc)
            .and_then(|counts| counts.get(term))
            .copied()
            .unwrap_or(0) as f64;
        if tf == 0.0 {
            return 0.0;
        }
        tf * self.idf(term)
    }

    /// Distinct terms of document `doc`.
    pub fn terms(&self, doc: usize) -> HashSet<&str> {
        self.term_counts
            .get(doc)
            .map(|counts| counts.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }
}

/// Average TF-IDF weight, inside `reference`, of each distinct term of `probe`.
///
/// Both texts form the corpus. Terms of `probe` that never occur in
/// `reference` contribute zero; an empty `probe` averages to zero.
pub fn average_term_weight(reference: &str, probe: &str) -> f64 {
    const REFERENCE: usize = 0;
    const PROBE: usize = 1;

    let corpus = TfIdfCorpus::new(&[reference, probe]);
    let terms = corpus.terms(PROBE);
    if terms.is_empty() {
        return 0.0;
    }
    let total: f64 = terms.iter().map(|t| corpus.tf_idf(t, REFERENCE)).sum();
    total / terms.len() as f64
}
