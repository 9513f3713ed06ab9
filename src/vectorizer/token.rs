use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Term occurrence counts of one document
/// Terms keep first-seen order.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct TermCounts {
    #[serde(with = "indexmap::map::serde_seq")]
    term_count: IndexMap<Box<str>, u32>,
    total_term_count: u64,
}

impl TermCounts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count whitespace-separated terms of an already normalized text
    pub fn from_text(text: &str) -> Self {
        let mut counts = Self::new();
        for term in text.split_whitespace() {
            counts.add_term(term);
        }
        counts
    }

    #[inline]
    pub fn add_term(&mut self, term: &str) -> &mut Self {
        if let Some(count) = self.term_count.get_mut(term) {
            *count += 1;
        } else {
            self.term_count.insert(term.into(), 1);
        }
        self.total_term_count += 1;
        self
    }

    #[inline]
    pub fn term_count(&self, term: &str) -> u32 {
        self.term_count.get(term).copied().unwrap_or(0)
    }

    /// total number of term occurrences
    #[inline]
    pub fn term_sum(&self) -> u64 {
        self.total_term_count
    }

    /// number of distinct terms
    #[inline]
    pub fn term_num(&self) -> usize {
        self.term_count.len()
    }

    pub fn is_empty(&self) -> bool {
        self.term_count.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.term_count.iter().map(|(term, &count)| (term.as_ref(), count))
    }

    /// distinct terms, each once
    pub fn terms(&self) -> impl Iterator<Item = &str> {
        self.term_count.keys().map(|term| term.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_occurrences() {
        let counts = TermCounts::from_text("cat dog  cat\tbird");
        assert_eq!(counts.term_count("cat"), 2);
        assert_eq!(counts.term_count("dog"), 1);
        assert_eq!(counts.term_count("fish"), 0);
        assert_eq!(counts.term_sum(), 4);
        assert_eq!(counts.term_num(), 3);
        assert_eq!(counts.terms().collect::<Vec<_>>(), vec!["cat", "dog", "bird"]);
    }

    #[test]
    fn empty_text_has_no_terms() {
        let counts = TermCounts::from_text("   ");
        assert!(counts.is_empty());
        assert_eq!(counts.term_sum(), 0);
    }
}
