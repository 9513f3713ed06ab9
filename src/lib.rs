/// This crate is a batch document recommender built on TF-IDF vectors and cosine similarity.
pub mod config;
pub mod document;
pub mod error;
pub mod normalize;
pub mod recommend;
pub mod recommendation;
pub mod similarity;
pub mod utils;
pub mod vectorizer;

/// Recommender
/// The top-level struct of this crate. It runs the whole pipeline over a corpus:
/// - parallel text normalization
/// - document-frequency bounded vocabulary and TF-IDF matrix
/// - block-wise cosine similarity
/// - top-k selection per document under a minimum score
///
/// `fit` stops after vectorizing and returns a `TfIdfModel`, which can be
/// queried several times (top-k for all documents, top-k for one document,
/// threshold union over seed documents) without refitting.
pub use recommend::Recommender;

/// Recommender configuration
/// Every field has a default, so a TOML file may set any subset.
/// `NormalizeOptions` toggles stopword removal, lemmatization and stemming.
pub use config::{NormalizeOptions, RecommenderConfig};

/// Input document
/// `id` is the dense 0-based position of the document in the corpus.
/// Content that could not be read or decoded is carried in `RawText` and
/// degrades to an empty text instead of failing the batch.
pub use document::{Document, RawText};

/// Errors
/// `ConfigurationError` covers everything detected before similarity work
/// starts; `NormalizeError` never escapes the normalizer.
pub use error::{ConfigurationError, Error, NormalizeError, Result};

/// Recommendation output
/// - `Candidate`: a recommended document id and its score
/// - `Recommendation`: ranked candidates of one source document
/// - `Recommendations`: one `Recommendation` per document, indexed by id
///
/// # Serialization
/// Supported.
pub use recommendation::{Candidate, Recommendation, Recommendations};

/// Text normalization
/// `TextNormalizer` lowercases, strips punctuation, drops short tokens and
/// optionally removes stopwords, lemmatizes and stems.
/// `ParallelNormalizer` runs it over a corpus on a fixed number of workers
/// while keeping document order.
pub use normalize::{LanguageResources, ParallelNormalizer, TextNormalizer};

/// TF-IDF model
/// `VectorizerBuilder` fits the vocabulary and builds the L2-normalized
/// sparse document-term matrix; `TfIdfModel` holds both.
///
/// # Serialization
/// Supported, with CBOR helpers.
pub use vectorizer::{TfIdfModel, VectorizerBuilder};

/// TF IDF Calculation Engine Trait
/// Defines how term frequency and inverse document frequency are computed.
/// `DefaultTfIdfEngine` is textbook TF-IDF with smoothed IDF;
/// `SublinearTfIdfEngine` dampens repeated terms with 1 + ln(tf).
pub use vectorizer::tfidf::{DefaultTfIdfEngine, SublinearTfIdfEngine, TfIdfEngine};

/// Similarity
/// `BlockSimilarityEngine` computes all-pairs cosine similarity one row
/// block at a time, so peak memory is bounded by `block_size × n` scores.
/// `TopKSelector` is the per-row selection step, usable on its own.
pub use similarity::{BlockSimilarityEngine, TopKSelector};

/// Cooperative cancellation for long similarity runs
pub use utils::cancel::CancellationToken;
