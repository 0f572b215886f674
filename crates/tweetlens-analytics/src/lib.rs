//! Tweet analytics for tweetlens.
//!
//! Cleans tweet text, scores it with a slang-aware valence lexicon, embeds it
//! as hashed TF-IDF vectors for cosine nearest-neighbour search and counts
//! word frequencies. [`AnalyticsEngine`] wires these together for the store,
//! server and CLI.

pub mod engine;
pub mod error;
pub mod frequency;
pub mod lexicon;
pub mod normalize;
pub mod scorer;
pub mod similarity;
pub mod vectorizer;

pub use engine::{AnalyticsConfig, AnalyticsEngine};
pub use error::{require_positive, AnalyticsError};
pub use frequency::{FrequencyTable, WordCount, WordFrequencyAnalyzer};
pub use lexicon::Lexicon;
pub use normalize::{NormalizerPolicy, TextNormalizer};
pub use scorer::{SentimentScore, SentimentScorer, SentimentThresholds};
pub use similarity::{SimilarRecord, SimilarityIndex};
pub use vectorizer::{TextVectorizer, Vector, Vocabulary, DEFAULT_DIMENSIONS};
