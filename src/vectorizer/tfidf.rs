use crate::vectorizer::{token::TermCounts, vocabulary::Vocabulary};

/// Weighting strategy for the document-term matrix.
///
/// The builder multiplies `tf` by `idf` per retained term and L2-normalizes
/// each row afterwards, so an engine only decides the raw weights.
pub trait TfIdfEngine {
    /// IDF per vocabulary column
    /// # Arguments
    /// * `doc_num` - number of documents in the corpus
    /// * `doc_freqs` - document frequency per vocabulary column
    fn idf_vec(doc_num: usize, doc_freqs: &[u32]) -> Vec<f64>;

    /// Term frequency weight of a term occurring `count` times in a document
    fn tf(count: u32) -> f64;

    /// (column, tf) for every vocabulary term of the document, in ascending column order
    fn tf_vec(counts: &TermCounts, vocabulary: &Vocabulary) -> Vec<(u32, f64)> {
        let mut row: Vec<(u32, f64)> = counts
            .iter()
            .filter_map(|(term, count)| {
                vocabulary
                    .column(term)
                    .map(|col| (col as u32, Self::tf(count)))
            })
            .collect();
        row.sort_unstable_by_key(|(col, _)| *col);
        row
    }
}

/// Textbook tf-idf
/// tf is the raw count, idf = ln((1 + n) / (1 + df)) + 1
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultTfIdfEngine;

impl TfIdfEngine for DefaultTfIdfEngine {
    fn idf_vec(doc_num: usize, doc_freqs: &[u32]) -> Vec<f64> {
        let n = doc_num as f64;
        doc_freqs
            .iter()
            .map(|&df| ((1.0 + n) / (1.0 + df as f64)).ln() + 1.0)
            .collect()
    }

    #[inline]
    fn tf(count: u32) -> f64 {
        count as f64
    }
}

/// Sublinear tf scaling: tf = 1 + ln(count); idf as in `DefaultTfIdfEngine`
/// Damps long documents that repeat a term many times.
#[derive(Debug, Clone, Copy, Default)]
pub struct SublinearTfIdfEngine;

impl TfIdfEngine for SublinearTfIdfEngine {
    fn idf_vec(doc_num: usize, doc_freqs: &[u32]) -> Vec<f64> {
        DefaultTfIdfEngine::idf_vec(doc_num, doc_freqs)
    }

    #[inline]
    fn tf(count: u32) -> f64 {
        if count == 0 {
            0.0
        } else {
            1.0 + (count as f64).ln()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn smoothed_idf() {
        let idf = DefaultTfIdfEngine::idf_vec(3, &[1, 3]);
        assert!((idf[0] - ((4.0f64 / 2.0).ln() + 1.0)).abs() < 1e-12);
        // a term in every document still gets weight 1
        assert!((idf[1] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn rarer_terms_weigh_more() {
        let idf = DefaultTfIdfEngine::idf_vec(10, &[1, 5, 10]);
        assert!(idf[0] > idf[1] && idf[1] > idf[2]);
    }

    #[test]
    fn sublinear_tf() {
        assert_eq!(SublinearTfIdfEngine::tf(0), 0.0);
        assert_eq!(SublinearTfIdfEngine::tf(1), 1.0);
        assert!(SublinearTfIdfEngine::tf(10) < DefaultTfIdfEngine::tf(10));
    }
}
