use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Setup problems detected before any similarity work starts.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigurationError {
    #[error("k must be at least 1")]
    InvalidK,
    #[error("block_size must be at least 1")]
    InvalidBlockSize,
    #[error("worker_count must be at least 1")]
    InvalidWorkerCount,
    #[error("min_score must be a finite number, got {0}")]
    InvalidMinScore(f64),
    #[error("max_df must lie in (0, 1], got {0}")]
    InvalidMaxDf(f64),
    /// max_df * corpus size is below min_df, so no term can ever qualify
    #[error("document frequency band is empty: min_df={min_df} exceeds max document count {max_doc_count}")]
    EmptyDfBand { min_df: usize, max_doc_count: f64 },
    #[error("corpus contains no documents")]
    EmptyCorpus,
    #[error("vocabulary is empty after document frequency pruning ({documents} documents)")]
    EmptyVocabulary { documents: usize },
    /// document ids must equal their position in the input
    #[error("document at position {position} has id {id}; ids must be dense and 0-based")]
    NonDenseIds { position: usize, id: usize },
}

/// Per-document normalization failure.
/// Never escapes the parallel normalizer, which degrades it to an empty text.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum NormalizeError {
    #[error("malformed text: {0}")]
    Malformed(String),
    #[error("unreadable document: {0}")]
    Unreadable(String),
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigurationError),
    #[error("failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
    #[error("similarity computation cancelled after {completed_blocks} blocks")]
    Cancelled { completed_blocks: usize },
    #[error("unknown document id {0}")]
    UnknownDocument(usize),
    #[error("model serialization failed: {0}")]
    Model(#[from] serde_cbor::Error),
}
