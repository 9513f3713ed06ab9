use crate::{error::ConfigurationError, recommendation::Candidate};

/// Top-k extraction from one dense score row.
///
/// Candidates are the indices scoring at least `min_score`, minus the
/// excluded index. When more than `k` qualify, a partial selection isolates
/// the best `k` and only those are sorted. Output is ordered by descending
/// score with ties broken by ascending index. NaN scores never qualify.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TopKSelector {
    k: usize,
    min_score: f64,
}

impl TopKSelector {
    pub fn new(k: usize, min_score: f64) -> Result<Self, ConfigurationError> {
        if k < 1 {
            return Err(ConfigurationError::InvalidK);
        }
        if !min_score.is_finite() {
            return Err(ConfigurationError::InvalidMinScore(min_score));
        }
        Ok(Self { k, min_score })
    }

    pub fn k(&self) -> usize {
        self.k
    }

    pub fn min_score(&self) -> f64 {
        self.min_score
    }

    pub fn select(&self, scores: &[f64], exclude: Option<usize>) -> Vec<Candidate> {
        let mut candidates: Vec<Candidate> = scores
            .iter()
            .enumerate()
            .filter(|&(j, &score)| score >= self.min_score && Some(j) != exclude)
            .map(|(j, &score)| Candidate::new(j, score))
            .collect();

        if candidates.len() > self.k {
            candidates.select_nth_unstable_by(self.k - 1, Candidate::rank_cmp);
            candidates.truncate(self.k);
        }
        candidates.sort_unstable_by(Candidate::rank_cmp);
        candidates
    }
}
