use std::time::Instant;

use num::Float;
use rayon::prelude::*;
use tracing::{debug, info};

use crate::{
    error::{ConfigurationError, Error, Result},
    recommendation::{Candidate, Recommendation, Recommendations},
    similarity::{compare::dot, select::TopKSelector},
    utils::{cancel::CancellationToken, partition::blocks},
    vectorizer::matrix::{ColumnIndex, SparseMatrix},
};

/// Pairwise cosine similarity over a row-normalized document-term matrix,
/// computed one row block at a time.
///
/// Only a `block_size × n` dense score buffer is alive at once; it is reused
/// for every block. Each score row is produced by scattering the source row's
/// weights through the column postings, so `score(i, j)` and `score(j, i)` sum
/// the same products in the same column order and are bit-identical.
#[derive(Debug)]
pub struct BlockSimilarityEngine<'a, N = f32> {
    matrix: &'a SparseMatrix<N>,
    postings: ColumnIndex,
    cancel: Option<CancellationToken>,
}

impl<'a, N> BlockSimilarityEngine<'a, N>
where
    N: Float + Into<f64> + Send + Sync,
{
    /// The matrix rows must already be L2-normalized.
    pub fn new(matrix: &'a SparseMatrix<N>) -> Self {
        Self {
            matrix,
            postings: matrix.column_index(),
            cancel: None,
        }
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn doc_num(&self) -> usize {
        self.matrix.n_rows()
    }

    /// Score of one pair: the dot product of the stored unit rows, summed in
    /// the same column order as the block scores, so it equals what `top_k_all`
    /// and `similar_to_any` report for that pair.
    pub fn similarity(&self, a: usize, b: usize) -> Result<f64> {
        self.check_id(a)?;
        self.check_id(b)?;
        Ok(dot(self.matrix.row(a), self.matrix.row(b)))
    }

    /// Top-k recommendations for every document.
    ///
    /// # Arguments
    /// * `k` - maximum candidates per document, at least 1
    /// * `block_size` - rows scored per block, at least 1; bounds memory to `block_size × n` scores
    /// * `min_score` - candidates scoring below are dropped
    ///
    /// The result holds one entry per document, in id order, possibly with no
    /// candidates. Block size never changes the result.
    pub fn top_k_all(&self, k: usize, block_size: usize, min_score: f64) -> Result<Recommendations> {
        if block_size < 1 {
            return Err(ConfigurationError::InvalidBlockSize.into());
        }
        let selector = TopKSelector::new(k, min_score)?;
        let n = self.doc_num();
        if n == 0 {
            return Ok(Recommendations::default());
        }

        let block_size = block_size.min(n);
        let mut buffer = vec![0f64; block_size * n];
        let mut list = Vec::with_capacity(n);
        let started = Instant::now();
        let mut block_count = 0;

        for block in blocks(n, block_size) {
            if self.is_cancelled() {
                info!(completed_blocks = block_count, "similarity cancelled");
                return Err(Error::Cancelled { completed_blocks: block_count });
            }
            let block_started = Instant::now();
            let start = block.start;
            let scores = &mut buffer[..block.len() * n];
            let recs: Vec<Recommendation> = scores
                .par_chunks_mut(n)
                .enumerate()
                .map(|(offset, row_scores)| {
                    let source_id = start + offset;
                    self.score_row(source_id, row_scores);
                    Recommendation {
                        source_id,
                        candidates: selector.select(row_scores, Some(source_id)),
                    }
                })
                .collect();
            list.extend(recs);
            block_count += 1;
            debug!(
                start = block.start,
                end = block.end,
                elapsed_ms = block_started.elapsed().as_millis() as u64,
                "similarity block done"
            );
        }

        let recommendations = Recommendations::from_ordered(list);
        info!(
            documents = n,
            blocks = block_count,
            with_candidates = recommendations.with_candidates(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "similarity complete"
        );
        Ok(recommendations)
    }

    /// Top-k candidates of a single document
    pub fn top_k_for(&self, source_id: usize, k: usize, min_score: f64) -> Result<Recommendation> {
        let selector = TopKSelector::new(k, min_score)?;
        self.check_id(source_id)?;
        let mut scores = vec![0f64; self.doc_num()];
        self.score_row(source_id, &mut scores);
        Ok(Recommendation {
            source_id,
            candidates: selector.select(&scores, Some(source_id)),
        })
    }

    /// Every document, seeds excluded, that scores at least `min_score`
    /// against any of the seeds, with its best score over the seeds.
    ///
    /// Not truncated; ordered by descending score then ascending id.
    pub fn similar_to_any(&self, seeds: &[usize], min_score: f64) -> Result<Vec<Candidate>> {
        if !min_score.is_finite() {
            return Err(ConfigurationError::InvalidMinScore(min_score).into());
        }
        for &seed in seeds {
            self.check_id(seed)?;
        }
        if seeds.is_empty() {
            return Ok(Vec::new());
        }
        let mut seeds = seeds.to_vec();
        seeds.sort_unstable();
        seeds.dedup();

        let n = self.doc_num();
        let best = seeds
            .par_iter()
            .fold(
                || (vec![f64::NEG_INFINITY; n], vec![0f64; n]),
                |(mut best, mut scratch), &seed| {
                    self.score_row(seed, &mut scratch);
                    for (b, &s) in best.iter_mut().zip(&scratch) {
                        *b = b.max(s);
                    }
                    (best, scratch)
                },
            )
            .map(|(best, _)| best)
            .reduce(
                || vec![f64::NEG_INFINITY; n],
                |mut acc, other| {
                    for (a, o) in acc.iter_mut().zip(other) {
                        *a = a.max(o);
                    }
                    acc
                },
            );

        let mut candidates: Vec<Candidate> = best
            .into_iter()
            .enumerate()
            .filter(|&(j, score)| score >= min_score && seeds.binary_search(&j).is_err())
            .map(|(j, score)| Candidate::new(j, score))
            .collect();
        candidates.sort_unstable_by(Candidate::rank_cmp);
        debug!(seeds = seeds.len(), matches = candidates.len(), "threshold union done");
        Ok(candidates)
    }

    /// Dot products of row `source` against every row, written to `out`
    #[inline]
    fn score_row(&self, source: usize, out: &mut [f64]) {
        debug_assert_eq!(out.len(), self.doc_num());
        out.fill(0.0);
        for (col, weight) in self.matrix.row(source).iter() {
            for (row, other) in self.postings.column(col) {
                out[row] += weight * other;
            }
        }
    }

    fn check_id(&self, id: usize) -> Result<()> {
        if id < self.doc_num() {
            Ok(())
        } else {
            Err(Error::UnknownDocument(id))
        }
    }

    fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(|c| c.is_cancelled())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vectorizer::VectorizerBuilder;

    fn corpus() -> SparseMatrix<f32> {
        let texts = [
            "rust compiler borrow checker",
            "rust borrow checker lifetimes",
            "python interpreter garbage collector",
            "python garbage collector reference counting",
            "rust compiler lifetimes",
            "gardening tomatoes",
            "",
        ];
        let (_, matrix) = VectorizerBuilder::new(1, 1.0).fit_transform(&texts).unwrap();
        matrix
    }

    fn brute_force(matrix: &SparseMatrix<f32>, k: usize, min_score: f64) -> Vec<Vec<usize>> {
        let n = matrix.n_rows();
        (0..n)
            .map(|i| {
                let scores: Vec<f64> = (0..n).map(|j| dot(matrix.row(i), matrix.row(j))).collect();
                let mut ranked: Vec<Candidate> = scores
                    .iter()
                    .enumerate()
                    .filter(|&(j, &s)| j != i && s >= min_score)
                    .map(|(j, &s)| Candidate::new(j, s))
                    .collect();
                ranked.sort_by(Candidate::rank_cmp);
                ranked.truncate(k);
                ranked.into_iter().map(|c| c.id).collect()
            })
            .collect()
    }

    #[test]
    fn matches_pairwise_dot_products() {
        let matrix = corpus();
        let engine = BlockSimilarityEngine::new(&matrix);
        let recs = engine.top_k_all(2, 3, 0.1).unwrap();
        let expected = brute_force(&matrix, 2, 0.1);
        assert_eq!(recs.len(), matrix.n_rows());
        for (rec, ids) in recs.iter().zip(expected) {
            assert_eq!(rec.ids().collect::<Vec<_>>(), ids, "source {}", rec.source_id);
        }
    }

    #[test]
    fn block_size_does_not_change_result() {
        let matrix = corpus();
        let engine = BlockSimilarityEngine::new(&matrix);
        let reference = engine.top_k_all(3, 1, 0.0).unwrap();
        for block_size in [2, 3, 7, 100] {
            assert_eq!(engine.top_k_all(3, block_size, 0.0).unwrap(), reference);
        }
    }

    #[test]
    fn scores_are_exactly_symmetric() {
        let matrix = corpus();
        let engine = BlockSimilarityEngine::new(&matrix);
        let n = matrix.n_rows();
        let rows: Vec<Vec<f64>> = (0..n)
            .map(|i| {
                let mut out = vec![0.0; n];
                engine.score_row(i, &mut out);
                out
            })
            .collect();
        for i in 0..n {
            for j in 0..n {
                assert_eq!(rows[i][j].to_bits(), rows[j][i].to_bits(), "({i}, {j})");
            }
        }
    }

    #[test]
    fn empty_document_gets_no_candidates() {
        let matrix = corpus();
        let recs = BlockSimilarityEngine::new(&matrix).top_k_all(5, 4, 0.0).unwrap();
        // a zero-weight row scores 0 against everything, which still passes min_score 0
        assert!(recs.get(6).unwrap().candidates.iter().all(|c| c.score == 0.0));
        let recs = BlockSimilarityEngine::new(&matrix).top_k_all(5, 4, 0.01).unwrap();
        assert!(recs.get(6).unwrap().is_empty());
        assert!(recs.iter().all(|r| r.ids().all(|id| id != 6)));
    }

    #[test]
    fn single_query_agrees_with_batch() {
        let matrix = corpus();
        let engine = BlockSimilarityEngine::new(&matrix);
        let all = engine.top_k_all(3, 2, 0.05).unwrap();
        for id in 0..matrix.n_rows() {
            assert_eq!(&engine.top_k_for(id, 3, 0.05).unwrap(), all.get(id).unwrap());
        }
        assert!(matches!(engine.top_k_for(99, 3, 0.05), Err(Error::UnknownDocument(99))));
    }

    #[test]
    fn validates_arguments_before_work() {
        let matrix = corpus();
        let engine = BlockSimilarityEngine::new(&matrix);
        assert!(matches!(
            engine.top_k_all(0, 10, 0.4),
            Err(Error::Configuration(ConfigurationError::InvalidK))
        ));
        assert!(matches!(
            engine.top_k_all(5, 0, 0.4),
            Err(Error::Configuration(ConfigurationError::InvalidBlockSize))
        ));
        assert!(matches!(
            engine.top_k_all(5, 10, f64::NAN),
            Err(Error::Configuration(ConfigurationError::InvalidMinScore(_)))
        ));
    }

    #[test]
    fn cancelled_token_stops_before_first_block() {
        let matrix = corpus();
        let token = CancellationToken::new();
        token.cancel();
        let engine = BlockSimilarityEngine::new(&matrix).with_cancellation(token);
        assert!(matches!(
            engine.top_k_all(5, 2, 0.0),
            Err(Error::Cancelled { completed_blocks: 0 })
        ));
    }

    #[test]
    fn similar_to_any_takes_union_with_best_score() {
        let matrix = corpus();
        let engine = BlockSimilarityEngine::new(&matrix);
        let found = engine.similar_to_any(&[0, 2], 0.1).unwrap();
        let ids: Vec<usize> = found.iter().map(|c| c.id).collect();
        assert!(!ids.contains(&0) && !ids.contains(&2));
        assert!(ids.contains(&1) && ids.contains(&3));
        assert!(!ids.contains(&5));
        for c in &found {
            let best = engine.similarity(0, c.id).unwrap().max(engine.similarity(2, c.id).unwrap());
            assert_eq!(c.score, best);
            assert!(c.score >= 0.1);
        }
        assert!(found.windows(2).all(|w| Candidate::rank_cmp(&w[0], &w[1]).is_lt()));
    }

    #[test]
    fn pair_score_matches_reported_scores() {
        let matrix = corpus();
        let engine = BlockSimilarityEngine::new(&matrix);
        let n = matrix.n_rows();
        let all = engine.top_k_all(n, 3, 0.0).unwrap();
        for i in 0..n {
            let single = engine.top_k_for(i, n, 0.0).unwrap();
            assert_eq!(&single, all.get(i).unwrap());
            for c in &single.candidates {
                assert_eq!(c.score, engine.similarity(i, c.id).unwrap(), "({i}, {})", c.id);
                // f32 storage keeps rows unit length to within rounding
                let cosine = crate::similarity::compare::cosine_similarity(matrix.row(i), matrix.row(c.id));
                assert!((c.score - cosine).abs() < 1e-6);
            }
        }
    }

    #[test]
    fn similar_to_any_edge_cases() {
        let matrix = corpus();
        let engine = BlockSimilarityEngine::new(&matrix);
        assert!(engine.similar_to_any(&[], 0.1).unwrap().is_empty());
        assert!(matches!(engine.similar_to_any(&[1, 42], 0.1), Err(Error::UnknownDocument(42))));
        // duplicated seeds behave like a single seed
        assert_eq!(
            engine.similar_to_any(&[4, 4], 0.1).unwrap(),
            engine.similar_to_any(&[4], 0.1).unwrap()
        );
    }

    #[test]
    fn empty_matrix_yields_empty_map() {
        let matrix = SparseMatrix::<f32>::default();
        let recs = BlockSimilarityEngine::new(&matrix).top_k_all(5, 10, 0.4).unwrap();
        assert!(recs.is_empty());
    }
}
