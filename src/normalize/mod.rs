//! Text normalization: raw text to a space-joined token string.
//!
//! Steps, in order: lowercase, strip everything that is neither a word
//! character (alphanumeric or `_`) nor whitespace, split on whitespace, drop
//! tokens of 2 chars or fewer, then optionally remove stopwords, lemmatize and
//! stem.

pub mod lemma;
pub mod parallel;
pub mod stem;
pub mod stopwords;

use std::sync::Arc;

use once_cell::sync::OnceCell;

use crate::{config::NormalizeOptions, document::RawText, error::NormalizeError};

use self::{
    lemma::LemmaDictionary,
    stem::{PorterStemmer, Stemmer},
    stopwords::StopWords,
};

pub use parallel::ParallelNormalizer;

const MIN_TOKEN_CHARS: usize = 3;

/// Read-only language data shared by every normalizer and worker
pub struct LanguageResources {
    pub stopwords: StopWords,
    pub lemmas: LemmaDictionary,
    pub stemmer: Box<dyn Stemmer>,
}

static ENGLISH: OnceCell<Arc<LanguageResources>> = OnceCell::new();

impl LanguageResources {
    pub fn new(stopwords: StopWords, lemmas: LemmaDictionary) -> Self {
        Self {
            stopwords,
            lemmas,
            stemmer: Box::new(PorterStemmer::new()),
        }
    }

    pub fn with_stemmer(mut self, stemmer: impl Stemmer + 'static) -> Self {
        self.stemmer = Box::new(stemmer);
        self
    }

    /// Process-wide English resources, built on first use
    pub fn english() -> Arc<LanguageResources> {
        ENGLISH
            .get_or_init(|| {
                tracing::debug!("initializing English language resources");
                Arc::new(Self::new(StopWords::english(), LemmaDictionary::english()))
            })
            .clone()
    }
}

impl std::fmt::Debug for LanguageResources {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LanguageResources")
            .field("stopwords", &self.stopwords.len())
            .field("lemmas", &self.lemmas.len())
            .finish_non_exhaustive()
    }
}

/// Pure text normalizer
/// Cloning is cheap; the language resources are behind an `Arc`.
#[derive(Debug, Clone)]
pub struct TextNormalizer {
    options: NormalizeOptions,
    resources: Arc<LanguageResources>,
    custom_stopwords: Option<Arc<StopWords>>,
}

impl TextNormalizer {
    pub fn new(options: NormalizeOptions, resources: Arc<LanguageResources>) -> Self {
        let custom_stopwords = options
            .custom_stopwords
            .as_ref()
            .map(|words| Arc::new(StopWords::new(words)));
        Self { options, resources, custom_stopwords }
    }

    /// Normalizer backed by the shared English resources
    pub fn english(options: NormalizeOptions) -> Self {
        Self::new(options, LanguageResources::english())
    }

    pub fn options(&self) -> &NormalizeOptions {
        &self.options
    }

    fn stopwords(&self) -> &StopWords {
        self.custom_stopwords
            .as_deref()
            .unwrap_or(&self.resources.stopwords)
    }

    pub fn normalize(&self, text: &str) -> String {
        let lowered = text.to_lowercase();
        let stripped: String = lowered
            .chars()
            .filter(|c| c.is_alphanumeric() || *c == '_' || c.is_whitespace())
            .collect();

        let stopwords = self.stopwords();
        let tokens = stripped
            .split_whitespace()
            .filter(|token| token.chars().count() >= MIN_TOKEN_CHARS)
            .filter(|token| !(self.options.remove_stopwords && stopwords.contains(token)))
            .map(|token| {
                let token = if self.options.use_lemmatization {
                    self.resources.lemmas.lemmatize(token)
                } else {
                    token.to_string()
                };
                if self.options.use_stemming {
                    self.resources.stemmer.stem(&token)
                } else {
                    token
                }
            });

        let mut out = String::with_capacity(stripped.len());
        for token in tokens {
            if !out.is_empty() {
                out.push(' ');
            }
            out.push_str(&token);
        }
        out
    }

    /// Normalize raw document content; fails for unreadable or non-UTF-8 input
    pub fn try_normalize(&self, raw: &RawText) -> Result<String, NormalizeError> {
        raw.as_text().map(|text| self.normalize(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain() -> TextNormalizer {
        TextNormalizer::english(NormalizeOptions::plain())
    }

    #[test]
    fn lowercases_strips_and_drops_short_tokens() {
        let out = plain().normalize("Hello, World! It's a GREAT day_2 at 10am.");
        assert_eq!(out, "hello world its great day_2 10am");
    }

    #[test]
    fn removes_default_stopwords() {
        let options = NormalizeOptions { remove_stopwords: true, ..NormalizeOptions::plain() };
        let out = TextNormalizer::english(options).normalize("the cat and the dog were there");
        assert_eq!(out, "cat dog");
    }

    #[test]
    fn custom_stopwords_replace_default_set() {
        let options = NormalizeOptions {
            remove_stopwords: true,
            custom_stopwords: Some(["cat".to_string()].into_iter().collect()),
            ..NormalizeOptions::plain()
        };
        let out = TextNormalizer::english(options).normalize("the cat and the dog");
        assert_eq!(out, "the and the dog");
    }

    #[test]
    fn custom_stopwords_ignored_when_removal_disabled() {
        let options = NormalizeOptions {
            custom_stopwords: Some(["cat".to_string()].into_iter().collect()),
            ..NormalizeOptions::plain()
        };
        assert_eq!(TextNormalizer::english(options).normalize("cat dog"), "cat dog");
    }

    #[test]
    fn lemmatizes_then_stems() {
        let lemma_only = NormalizeOptions { use_lemmatization: true, ..NormalizeOptions::plain() };
        assert_eq!(
            TextNormalizer::english(lemma_only).normalize("Studies of children running"),
            "study child running"
        );

        let both = NormalizeOptions {
            use_lemmatization: true,
            use_stemming: true,
            ..NormalizeOptions::plain()
        };
        assert_eq!(TextNormalizer::english(both).normalize("cats running"), "cat run");
    }

    #[test]
    fn custom_resources_are_injected() {
        let resources = Arc::new(LanguageResources::new(
            StopWords::new(["rust"]),
            LemmaDictionary::from_pairs([("crates", "crate")]),
        ));
        let options = NormalizeOptions {
            remove_stopwords: true,
            use_lemmatization: true,
            ..NormalizeOptions::plain()
        };
        let out = TextNormalizer::new(options, resources).normalize("rust crates the cats");
        assert_eq!(out, "crate the cats");
    }

    #[test]
    fn unicode_word_characters_survive() {
        assert_eq!(plain().normalize("Café naïve — über"), "café naïve über");
    }

    #[test]
    fn deterministic() {
        let normalizer = TextNormalizer::english(NormalizeOptions::default());
        let text = "The quick brown foxes jumped over the lazy dogs!";
        assert_eq!(normalizer.normalize(text), normalizer.normalize(text));
    }

    #[test]
    fn try_normalize_reports_failures() {
        let normalizer = plain();
        assert_eq!(normalizer.try_normalize(&RawText::Text("Hello there".into())), Ok("hello there".into()));
        assert!(normalizer.try_normalize(&RawText::Unreadable("gone".into())).is_err());
        assert!(normalizer.try_normalize(&RawText::Bytes(vec![0xc3, 0x28])).is_err());
    }

    #[test]
    fn shared_english_resources_are_reused() {
        let a = LanguageResources::english();
        let b = LanguageResources::english();
        assert!(Arc::ptr_eq(&a, &b));
    }
}
