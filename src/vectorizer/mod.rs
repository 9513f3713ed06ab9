pub mod matrix;
pub mod tfidf;
pub mod token;
pub mod vocabulary;

use std::{
    collections::HashMap,
    io::{Read, Write},
    marker::PhantomData,
};

use num::{Float, NumCast};
use rayon::prelude::*;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::info;

use crate::{
    config::RecommenderConfig,
    error::{ConfigurationError, Result},
    similarity::BlockSimilarityEngine,
    vectorizer::{
        matrix::SparseMatrix,
        tfidf::{DefaultTfIdfEngine, TfIdfEngine},
        token::TermCounts,
        vocabulary::Vocabulary,
    },
};

/// Fits a document-frequency bounded vocabulary and builds the weighted
/// document-term matrix in one pass over the normalized corpus.
///
/// `E` is the weighting engine (textbook tf-idf by default). Rows of the
/// produced matrix are L2-normalized, so the cosine similarity of two rows is
/// their plain dot product.
#[derive(Debug, Clone)]
pub struct VectorizerBuilder<E = DefaultTfIdfEngine> {
    min_df: usize,
    max_df: f64,
    _marker: PhantomData<E>,
}

impl VectorizerBuilder {
    /// # Arguments
    /// * `min_df` - minimum number of documents a term must occur in
    /// * `max_df` - maximum fraction of documents a term may occur in, in (0, 1]
    pub fn new(min_df: usize, max_df: f64) -> Self {
        Self { min_df, max_df, _marker: PhantomData }
    }

    pub fn from_config(config: &RecommenderConfig) -> Self {
        Self::new(config.min_df, config.max_df)
    }
}

impl<E> VectorizerBuilder<E>
where
    E: TfIdfEngine,
{
    /// Switch the weighting engine
    pub fn with_engine<F: TfIdfEngine>(self) -> VectorizerBuilder<F> {
        VectorizerBuilder { min_df: self.min_df, max_df: self.max_df, _marker: PhantomData }
    }

    /// Largest document frequency a term may have in a corpus of `doc_num`
    /// documents. Fails when no term could ever fall inside the band.
    pub fn check_df_band(&self, doc_num: usize) -> std::result::Result<f64, ConfigurationError> {
        if doc_num == 0 {
            return Err(ConfigurationError::EmptyCorpus);
        }
        if !(self.max_df > 0.0 && self.max_df <= 1.0) {
            return Err(ConfigurationError::InvalidMaxDf(self.max_df));
        }
        let max_doc_count = self.max_df * doc_num as f64;
        if max_doc_count < self.min_df as f64 {
            return Err(ConfigurationError::EmptyDfBand { min_df: self.min_df, max_doc_count });
        }
        Ok(max_doc_count)
    }

    /// Fit the vocabulary and emit one weighted row per text.
    /// Texts are split on whitespace only.
    pub fn fit_transform<N, S>(&self, texts: &[S]) -> Result<(Vocabulary, SparseMatrix<N>)>
    where
        N: Float + Into<f64> + Send + Sync,
        S: AsRef<str> + Sync,
    {
        let doc_num = texts.len();
        let max_doc_count = self.check_df_band(doc_num)?;

        let counts: Vec<TermCounts> = texts
            .par_iter()
            .map(|text| TermCounts::from_text(text.as_ref()))
            .collect();

        let doc_freq: HashMap<&str, u32> = counts
            .par_iter()
            .fold(HashMap::new, |mut acc, doc| {
                for term in doc.terms() {
                    *acc.entry(term).or_insert(0) += 1;
                }
                acc
            })
            .reduce(HashMap::new, |mut acc, other| {
                for (term, df) in other {
                    *acc.entry(term).or_insert(0) += df;
                }
                acc
            });
        let candidate_terms = doc_freq.len();

        let mut kept: Vec<(Box<str>, u32)> = doc_freq
            .into_iter()
            .filter(|&(_, df)| df as usize >= self.min_df && df as f64 <= max_doc_count)
            .map(|(term, df)| (term.into(), df))
            .collect();
        if kept.is_empty() {
            return Err(ConfigurationError::EmptyVocabulary { documents: doc_num }.into());
        }
        kept.sort_unstable_by(|a, b| a.0.cmp(&b.0));

        let dfs: Vec<u32> = kept.iter().map(|(_, df)| *df).collect();
        let idf = E::idf_vec(doc_num, &dfs);
        let vocabulary = Vocabulary::from_sorted(kept, idf.clone(), doc_num);

        let rows: Vec<Vec<(u32, N)>> = counts
            .par_iter()
            .map(|doc| weighted_row::<E, N>(doc, &vocabulary, &idf))
            .collect();
        let matrix = SparseMatrix::from_rows(rows, vocabulary.len());

        info!(
            documents = doc_num,
            candidate_terms,
            terms = vocabulary.len(),
            nnz = matrix.nnz(),
            "tf-idf matrix built"
        );
        Ok((vocabulary, matrix))
    }
}

/// tf * idf per retained term, scaled to unit L2 norm; empty rows stay empty
fn weighted_row<E, N>(doc: &TermCounts, vocabulary: &Vocabulary, idf: &[f64]) -> Vec<(u32, N)>
where
    E: TfIdfEngine,
    N: Float,
{
    let mut row = E::tf_vec(doc, vocabulary);
    for (col, weight) in row.iter_mut() {
        *weight *= idf[*col as usize];
    }
    let norm = row.iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
    if norm > 0.0 {
        for (_, weight) in row.iter_mut() {
            *weight /= norm;
        }
    }
    row.into_iter()
        .map(|(col, w)| (col, <N as NumCast>::from(w).unwrap_or_else(N::zero)))
        .collect()
}

/// Fitted vocabulary together with its document-term matrix.
///
/// # Serialization
/// Supported, CBOR helpers included. The similarity scores themselves are
/// never persisted; they are recomputed from the matrix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TfIdfModel<N = f32> {
    pub vocabulary: Vocabulary,
    pub matrix: SparseMatrix<N>,
}

impl<N> TfIdfModel<N>
where
    N: Float + Into<f64> + Send + Sync,
{
    pub fn new(vocabulary: Vocabulary, matrix: SparseMatrix<N>) -> Self {
        Self { vocabulary, matrix }
    }

    pub fn doc_num(&self) -> usize {
        self.matrix.n_rows()
    }

    pub fn engine(&self) -> BlockSimilarityEngine<'_, N> {
        BlockSimilarityEngine::new(&self.matrix)
    }

    pub fn to_cbor_writer<W: Write>(&self, writer: W) -> Result<()>
    where
        N: Serialize,
    {
        serde_cbor::to_writer(writer, self)?;
        Ok(())
    }

    pub fn from_cbor_reader<R: Read>(reader: R) -> Result<Self>
    where
        N: DeserializeOwned,
    {
        Ok(serde_cbor::from_reader(reader)?)
    }
}
