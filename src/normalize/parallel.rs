use std::time::Instant;

use rayon::prelude::*;
use tracing::{info, trace, warn};

use crate::{
    document::Document,
    error::{ConfigurationError, Result},
    utils::partition::split_even,
};

use super::TextNormalizer;

/// Fans documents out over a fixed number of workers.
///
/// The input is split into `worker_count` contiguous, near-equal chunks; each
/// chunk is normalized on its own thread of a dedicated rayon pool and the
/// chunk outputs are reassembled in input order, so position `i` of the result
/// always belongs to document `i` whatever order the workers finish in.
#[derive(Debug, Clone)]
pub struct ParallelNormalizer {
    normalizer: TextNormalizer,
    worker_count: usize,
}

impl ParallelNormalizer {
    pub fn new(normalizer: TextNormalizer, worker_count: usize) -> Result<Self> {
        if worker_count < 1 {
            return Err(ConfigurationError::InvalidWorkerCount.into());
        }
        Ok(Self { normalizer, worker_count })
    }

    pub fn worker_count(&self) -> usize {
        self.worker_count
    }

    /// Normalized texts, index-aligned with `documents`.
    /// A document that cannot be read or decoded yields an empty string.
    pub fn normalize_all(&self, documents: &[Document]) -> Result<Vec<String>> {
        if documents.is_empty() {
            return Ok(Vec::new());
        }
        let started = Instant::now();
        info!(documents = documents.len(), workers = self.worker_count, "normalizing documents");

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.worker_count)
            .thread_name(|i| format!("normalize-{i}"))
            .build()?;

        let chunks: Vec<Vec<String>> = pool.install(|| {
            split_even(documents.len(), self.worker_count)
                .into_par_iter()
                .enumerate()
                .map(|(worker, range)| {
                    trace!(worker, start = range.start, end = range.end, "normalizing chunk");
                    documents[range].iter().map(|doc| self.normalize_one(doc)).collect()
                })
                .collect()
        });

        let normalized: Vec<String> = chunks.into_iter().flatten().collect();
        debug_assert_eq!(normalized.len(), documents.len());
        info!(
            documents = normalized.len(),
            empty = normalized.iter().filter(|t| t.is_empty()).count(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "normalization finished"
        );
        Ok(normalized)
    }

    fn normalize_one(&self, doc: &Document) -> String {
        match self.normalizer.try_normalize(&doc.raw) {
            Ok(text) => text,
            Err(error) => {
                warn!(doc_id = doc.id, %error, "normalization failed, using empty text");
                String::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NormalizeOptions;

    fn normalizer() -> TextNormalizer {
        TextNormalizer::english(NormalizeOptions::plain())
    }

    fn corpus(n: usize) -> Vec<Document> {
        (0..n)
            .map(|i| Document::new(i, format!("Document number{i} WITH text{}", i * 7)))
            .collect()
    }

    #[test]
    fn preserves_order_for_any_worker_count() {
        let docs = corpus(37);
        let expected: Vec<String> = docs
            .iter()
            .map(|d| normalizer().try_normalize(&d.raw).unwrap())
            .collect();
        for workers in [1, 2, 3, 8, 64] {
            let parallel = ParallelNormalizer::new(normalizer(), workers).unwrap();
            assert_eq!(parallel.normalize_all(&docs).unwrap(), expected, "workers={workers}");
        }
    }

    #[test]
    fn failures_degrade_to_empty_text() {
        let docs = vec![
            Document::new(0, "first document"),
            Document::unreadable(1, "permission denied"),
            Document::from_bytes(2, vec![0xff, 0xfe]),
            Document::new(3, "last document"),
        ];
        let parallel = ParallelNormalizer::new(normalizer(), 2).unwrap();
        let out = parallel.normalize_all(&docs).unwrap();
        assert_eq!(out, vec!["first document", "", "", "last document"]);
    }

    #[test]
    fn empty_input_and_zero_workers() {
        let parallel = ParallelNormalizer::new(normalizer(), 4).unwrap();
        assert!(parallel.normalize_all(&[]).unwrap().is_empty());
        assert!(ParallelNormalizer::new(normalizer(), 0).is_err());
    }
}
