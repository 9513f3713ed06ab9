use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Term to column mapping fitted once over the whole corpus.
///
/// Columns are assigned in ascending term order. Each entry remembers its
/// document frequency and IDF; the vocabulary is immutable after fitting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vocabulary {
    terms: IndexMap<Box<str>, TermStats>,
    doc_num: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TermStats {
    /// number of documents containing the term
    pub doc_freq: u32,
    pub idf: f64,
}

impl Vocabulary {
    /// `terms` must be sorted ascending and unique; `idf` is index-aligned with it
    pub(crate) fn from_sorted(terms: Vec<(Box<str>, u32)>, idf: Vec<f64>, doc_num: usize) -> Self {
        debug_assert_eq!(terms.len(), idf.len());
        debug_assert!(terms.windows(2).all(|w| w[0].0 < w[1].0));
        let terms = terms
            .into_iter()
            .zip(idf)
            .map(|((term, doc_freq), idf)| (term, TermStats { doc_freq, idf }))
            .collect();
        Self { terms, doc_num }
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// number of documents the vocabulary was fitted on
    pub fn doc_num(&self) -> usize {
        self.doc_num
    }

    #[inline]
    pub fn column(&self, term: &str) -> Option<usize> {
        self.terms.get_index_of(term)
    }

    pub fn term(&self, column: usize) -> Option<&str> {
        self.terms.get_index(column).map(|(term, _)| term.as_ref())
    }

    pub fn stats(&self, column: usize) -> Option<TermStats> {
        self.terms.get_index(column).map(|(_, stats)| *stats)
    }

    pub fn contains(&self, term: &str) -> bool {
        self.terms.contains_key(term)
    }

    /// (column, term, stats) in column order
    pub fn iter(&self) -> impl Iterator<Item = (usize, &str, TermStats)> {
        self.terms
            .iter()
            .enumerate()
            .map(|(col, (term, stats))| (col, term.as_ref(), *stats))
    }
}
