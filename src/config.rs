use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::ConfigurationError;

pub const DEFAULT_MIN_SCORE: f64 = 0.4;
pub const DEFAULT_K: usize = 5;
pub const DEFAULT_BLOCK_SIZE: usize = 500;
pub const DEFAULT_MIN_DF: usize = 2;
pub const DEFAULT_MAX_DF: f64 = 0.8;

/// Text normalization switches
/// Every flag can be toggled independently.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizeOptions {
    pub remove_stopwords: bool,
    pub use_stemming: bool,
    pub use_lemmatization: bool,
    /// replaces the default English stopword set when present
    pub custom_stopwords: Option<BTreeSet<String>>,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            remove_stopwords: true,
            use_stemming: false,
            use_lemmatization: true,
            custom_stopwords: None,
        }
    }
}

impl NormalizeOptions {
    /// Lowercase, strip and length-filter only
    pub fn plain() -> Self {
        Self {
            remove_stopwords: false,
            use_stemming: false,
            use_lemmatization: false,
            custom_stopwords: None,
        }
    }
}

/// Recommender configuration
///
/// All fields have documented defaults, so a config file may set any subset.
/// `validate` checks everything that does not depend on the corpus; the
/// document frequency band is checked once the corpus size is known.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecommenderConfig {
    /// lower bound on reported similarity
    pub min_score: f64,
    /// maximum candidates per document
    pub k: usize,
    /// rows processed per similarity block
    pub block_size: usize,
    /// minimum number of documents a term must occur in
    pub min_df: usize,
    /// maximum fraction of documents a term may occur in
    pub max_df: f64,
    /// normalization parallelism degree
    pub worker_count: usize,
    pub normalize: NormalizeOptions,
}

impl Default for RecommenderConfig {
    fn default() -> Self {
        Self {
            min_score: DEFAULT_MIN_SCORE,
            k: DEFAULT_K,
            block_size: DEFAULT_BLOCK_SIZE,
            min_df: DEFAULT_MIN_DF,
            max_df: DEFAULT_MAX_DF,
            worker_count: default_worker_count(),
            normalize: NormalizeOptions::default(),
        }
    }
}

/// Available hardware parallelism, 1 when it cannot be queried
pub fn default_worker_count() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

impl RecommenderConfig {
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.k < 1 {
            return Err(ConfigurationError::InvalidK);
        }
        if self.block_size < 1 {
            return Err(ConfigurationError::InvalidBlockSize);
        }
        if self.worker_count < 1 {
            return Err(ConfigurationError::InvalidWorkerCount);
        }
        if !self.min_score.is_finite() {
            return Err(ConfigurationError::InvalidMinScore(self.min_score));
        }
        if !(self.max_df > 0.0 && self.max_df <= 1.0) {
            return Err(ConfigurationError::InvalidMaxDf(self.max_df));
        }
        Ok(())
    }

    pub fn with_min_score(mut self, min_score: f64) -> Self {
        self.min_score = min_score;
        self
    }

    pub fn with_k(mut self, k: usize) -> Self {
        self.k = k;
        self
    }

    pub fn with_block_size(mut self, block_size: usize) -> Self {
        self.block_size = block_size;
        self
    }

    pub fn with_df_bounds(mut self, min_df: usize, max_df: f64) -> Self {
        self.min_df = min_df;
        self.max_df = max_df;
        self
    }

    pub fn with_worker_count(mut self, worker_count: usize) -> Self {
        self.worker_count = worker_count;
        self
    }

    pub fn with_normalize(mut self, normalize: NormalizeOptions) -> Self {
        self.normalize = normalize;
        self
    }
}
