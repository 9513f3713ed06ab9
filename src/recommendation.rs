use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

/// One recommended document
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: usize,
    pub score: f64,
}

impl Candidate {
    pub fn new(id: usize, score: f64) -> Self {
        Self { id, score }
    }

    /// Ranking order: higher score first, ties by ascending id
    #[inline]
    pub fn rank_cmp(&self, other: &Self) -> Ordering {
        other
            .score
            .total_cmp(&self.score)
            .then_with(|| self.id.cmp(&other.id))
    }
}

/// Ranked candidates of one source document.
/// At most `k` entries, every score >= `min_score`, never the source itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub source_id: usize,
    pub candidates: Vec<Candidate>,
}

impl Recommendation {
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = usize> + '_ {
        self.candidates.iter().map(|c| c.id)
    }
}

/// Recommendations for every document of a corpus, indexed by source id
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Recommendations {
    list: Vec<Recommendation>,
}

impl Recommendations {
    /// `list[i].source_id` must equal `i`
    pub(crate) fn from_ordered(list: Vec<Recommendation>) -> Self {
        debug_assert!(list.iter().enumerate().all(|(i, r)| r.source_id == i));
        Self { list }
    }

    pub fn get(&self, source_id: usize) -> Option<&Recommendation> {
        self.list.get(source_id)
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Recommendation> {
        self.list.iter()
    }

    /// number of documents that received at least one candidate
    pub fn with_candidates(&self) -> usize {
        self.list.iter().filter(|r| !r.is_empty()).count()
    }

    pub fn into_vec(self) -> Vec<Recommendation> {
        self.list
    }
}

impl IntoIterator for Recommendations {
    type Item = Recommendation;
    type IntoIter = std::vec::IntoIter<Recommendation>;

    fn into_iter(self) -> Self::IntoIter {
        self.list.into_iter()
    }
}

impl<'a> IntoIterator for &'a Recommendations {
    type Item = &'a Recommendation;
    type IntoIter = std::slice::Iter<'a, Recommendation>;

    fn into_iter(self) -> Self::IntoIter {
        self.list.iter()
    }
}
