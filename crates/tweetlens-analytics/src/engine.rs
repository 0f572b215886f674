//! Analytics facade used by the store, server and CLI.

use std::sync::Arc;

use tweetlens_core::{AppConfig, LexiconFile};

use crate::error::{require_positive, AnalyticsError};
use crate::frequency::{FrequencyTable, WordCount, WordFrequencyAnalyzer};
use crate::lexicon::Lexicon;
use crate::normalize::{NormalizerPolicy, TextNormalizer};
use crate::scorer::{SentimentScore, SentimentScorer, SentimentThresholds};
use crate::similarity::{SimilarRecord, SimilarityIndex};
use crate::vectorizer::{TextVectorizer, Vocabulary, DEFAULT_DIMENSIONS};

/// Knobs for building an [`AnalyticsEngine`].
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyticsConfig {
    pub thresholds: SentimentThresholds,
    pub normalizer: NormalizerPolicy,
    pub remove_stopwords: bool,
    pub vector_dimensions: usize,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            thresholds: SentimentThresholds::default(),
            normalizer: NormalizerPolicy::default(),
            remove_stopwords: true,
            vector_dimensions: DEFAULT_DIMENSIONS,
        }
    }
}

impl AnalyticsConfig {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            thresholds: SentimentThresholds {
                positive: config.positive_threshold,
                negative: config.negative_threshold,
            },
            normalizer: NormalizerPolicy {
                expand_acronyms: config.expand_acronyms,
                ..NormalizerPolicy::default()
            },
            remove_stopwords: config.remove_stopwords,
            vector_dimensions: config.vector_dimensions,
        }
    }
}

/// Sentiment, similarity and word counts behind one handle.
///
/// The normalizer, lexicon and vocabulary are fixed at build time. Only the
/// similarity index changes afterwards, through [`index_record`] and
/// [`forget_record`].
///
/// [`index_record`]: AnalyticsEngine::index_record
/// [`forget_record`]: AnalyticsEngine::forget_record
#[derive(Debug)]
pub struct AnalyticsEngine {
    normalizer: Arc<TextNormalizer>,
    scorer: SentimentScorer,
    vectorizer: TextVectorizer,
    index: SimilarityIndex,
    frequency: WordFrequencyAnalyzer,
}

impl AnalyticsEngine {
    /// Build the engine and index every `(id, text)` pair of `corpus`.
    ///
    /// The corpus also supplies the document frequencies used to weight
    /// vectors, so records added later are weighted against it.
    ///
    /// # Errors
    ///
    /// Returns [`AnalyticsError::InvalidArgument`] if the index rejects a
    /// corpus vector.
    pub fn build<I, S>(
        config: &AnalyticsConfig,
        corpus: I,
        overrides: Option<&LexiconFile>,
    ) -> Result<Self, AnalyticsError>
    where
        I: IntoIterator<Item = (i64, S)>,
        S: AsRef<str>,
    {
        let corpus: Vec<(i64, S)> = corpus.into_iter().collect();
        let normalizer = Arc::new(TextNormalizer::new(config.normalizer));

        let lexicon = Arc::new(overrides.map_or_else(Lexicon::builtin, Lexicon::with_overrides));
        let vocabulary = Arc::new(Vocabulary::from_corpus(
            &normalizer,
            corpus.iter().map(|(_, text)| text.as_ref()),
        ));

        let scorer = SentimentScorer::new(lexicon, Arc::clone(&normalizer), config.thresholds);
        let vectorizer = TextVectorizer::new(
            Arc::clone(&normalizer),
            Arc::clone(&vocabulary),
            config.vector_dimensions,
        );
        let index = SimilarityIndex::new(vectorizer.dimensions());
        let frequency = WordFrequencyAnalyzer::new(Arc::clone(&normalizer), config.remove_stopwords);

        let engine = Self {
            normalizer,
            scorer,
            vectorizer,
            index,
            frequency,
        };
        engine.index.rebuild(
            corpus
                .iter()
                .map(|(id, text)| (*id, engine.vectorizer.vectorize(text.as_ref()))),
        )?;

        tracing::info!(
            records = engine.index.len(),
            terms = vocabulary.term_count(),
            dimensions = engine.vectorizer.dimensions(),
            "analytics engine built"
        );
        Ok(engine)
    }

    /// Score `text` for sentiment.
    ///
    /// # Errors
    ///
    /// Returns [`AnalyticsError::InvalidInput`] when the text has no words.
    pub fn score_sentiment(&self, text: &str) -> Result<SentimentScore, AnalyticsError> {
        self.scorer.score(text)
    }

    /// The `n` indexed records most similar to record `id`, excluding `id`.
    ///
    /// # Errors
    ///
    /// Returns [`AnalyticsError::InvalidArgument`] when `n <= 0` and
    /// [`AnalyticsError::NotFound`] when `id` is not indexed.
    pub fn similar_to(&self, id: i64, n: i64) -> Result<Vec<SimilarRecord>, AnalyticsError> {
        let n = require_positive(n)?;
        self.index.query_by_id(id, n)
    }

    /// The `n` indexed records most similar to an arbitrary `text`.
    ///
    /// # Errors
    ///
    /// Returns [`AnalyticsError::InvalidArgument`] when `n <= 0`.
    pub fn similar_to_text(&self, text: &str, n: i64) -> Result<Vec<SimilarRecord>, AnalyticsError> {
        let n = require_positive(n)?;
        self.index.query(&self.vectorizer.vectorize(text), n)
    }

    /// The `n` most frequent words across `texts`.
    ///
    /// # Errors
    ///
    /// Returns [`AnalyticsError::InvalidArgument`] when `n <= 0`.
    pub fn top_words<I, S>(&self, texts: I, n: i64) -> Result<Vec<WordCount>, AnalyticsError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let n = require_positive(n)?;
        self.frequency.top_n(texts, n)
    }

    /// Full word-count table across `texts`, most frequent first.
    pub fn word_counts<I, S>(&self, texts: I) -> FrequencyTable
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.frequency.counts(texts)
    }

    /// Vectorize `text` and store it under `id`, replacing any previous vector.
    ///
    /// # Errors
    ///
    /// Returns [`AnalyticsError::InvalidArgument`] if the index rejects the
    /// vector.
    pub fn index_record(&self, id: i64, text: &str) -> Result<(), AnalyticsError> {
        self.index.upsert(id, self.vectorizer.vectorize(text))?;
        tracing::debug!(id, "record indexed");
        Ok(())
    }

    /// Drop `id` from the similarity index. Returns whether it was indexed.
    pub fn forget_record(&self, id: i64) -> bool {
        let removed = self.index.remove(id);
        tracing::debug!(id, removed, "record forgotten");
        removed
    }

    /// Tweet cleanup with the engine's normalizer policy.
    #[must_use]
    pub fn clean_text(&self, text: &str) -> String {
        self.normalizer.clean(text)
    }

    #[must_use]
    pub fn is_indexed(&self, id: i64) -> bool {
        self.index.contains(id)
    }

    #[must_use]
    pub fn index_len(&self) -> usize {
        self.index.len()
    }

    #[must_use]
    pub fn thresholds(&self) -> SentimentThresholds {
        self.scorer.thresholds()
    }
}
