use std::sync::Arc;

use tracing::info;

use crate::{
    config::RecommenderConfig,
    document::Document,
    error::{ConfigurationError, Result},
    normalize::{LanguageResources, ParallelNormalizer, TextNormalizer},
    recommendation::Recommendations,
    utils::cancel::CancellationToken,
    vectorizer::{TfIdfModel, VectorizerBuilder},
};

/// End-to-end pipeline: normalize, vectorize, score in blocks, select top-k.
///
/// Configuration is validated once at construction; checks that need the
/// corpus (dense ids, document frequency band) run at the start of `fit`.
#[derive(Debug, Clone)]
pub struct Recommender {
    config: RecommenderConfig,
    resources: Arc<LanguageResources>,
    cancel: Option<CancellationToken>,
}

impl Recommender {
    pub fn new(config: RecommenderConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            resources: LanguageResources::english(),
            cancel: None,
        })
    }

    /// Use other stopword, lemma and stemmer resources than the built-in English ones
    pub fn with_resources(mut self, resources: Arc<LanguageResources>) -> Self {
        self.resources = resources;
        self
    }

    /// Checked between similarity blocks
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn config(&self) -> &RecommenderConfig {
        &self.config
    }

    /// Normalize and vectorize the corpus.
    /// Document ids must equal their position in `documents`; ids and the
    /// document frequency band are checked before any text is normalized.
    pub fn fit(&self, documents: &[Document]) -> Result<TfIdfModel<f32>> {
        check_dense_ids(documents)?;
        let builder = VectorizerBuilder::from_config(&self.config);
        builder.check_df_band(documents.len())?;
        let normalizer = TextNormalizer::new(self.config.normalize.clone(), Arc::clone(&self.resources));
        let texts = ParallelNormalizer::new(normalizer, self.config.worker_count)?.normalize_all(documents)?;
        let (vocabulary, matrix) = builder.fit_transform(&texts)?;
        Ok(TfIdfModel::new(vocabulary, matrix))
    }

    /// Top-k recommendations for every document, indexed by id
    pub fn recommend(&self, documents: &[Document]) -> Result<Recommendations> {
        let model = self.fit(documents)?;
        self.recommend_fitted(&model)
    }

    /// Run the similarity stage against an already fitted model
    pub fn recommend_fitted(&self, model: &TfIdfModel<f32>) -> Result<Recommendations> {
        let mut engine = model.engine();
        if let Some(token) = &self.cancel {
            engine = engine.with_cancellation(token.clone());
        }
        let recommendations = engine.top_k_all(self.config.k, self.config.block_size, self.config.min_score)?;
        info!(
            documents = recommendations.len(),
            k = self.config.k,
            min_score = self.config.min_score,
            "recommendations ready"
        );
        Ok(recommendations)
    }
}

fn check_dense_ids(documents: &[Document]) -> std::result::Result<(), ConfigurationError> {
    match documents.iter().enumerate().find(|(position, doc)| doc.id != *position) {
        Some((position, doc)) => Err(ConfigurationError::NonDenseIds { position, id: doc.id }),
        None => Ok(()),
    }
}
