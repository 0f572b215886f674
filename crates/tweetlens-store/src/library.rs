//! Records plus analytics: every write rescores and reindexes.

use std::path::Path;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::Serialize;
use tweetlens_analytics::{
    AnalyticsConfig, AnalyticsEngine, AnalyticsError, FrequencyTable, SentimentScore, WordCount,
};
use tweetlens_core::{load_tweets, LexiconFile, RawTweet, Record, SentimentLabel};

use crate::records::{parse_compact_date, TweetStore};
use crate::StoreError;

/// A neighbour returned by [`TweetLibrary::similar`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimilarTweet {
    pub id: i64,
    pub text: String,
    pub sentiment_label: Option<SentimentLabel>,
    pub similarity: f32,
}

/// Tweet records and the analytics engine that scores and indexes them.
///
/// Writes are serialized so a record and its index entry always change
/// together; reads go straight to the store or the index.
#[derive(Debug)]
pub struct TweetLibrary {
    store: TweetStore,
    engine: AnalyticsEngine,
    writes: Mutex<()>,
}

impl TweetLibrary {
    /// Store, score and index `tweets`, assigning ids from 1 in input order.
    ///
    /// Blank tweets are skipped and take no id. Tweets with no words left
    /// after cleanup are stored unscored.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Analytics`] if the engine cannot be built.
    pub fn from_tweets(
        config: &AnalyticsConfig,
        tweets: &[RawTweet],
        overrides: Option<&LexiconFile>,
    ) -> Result<Self, StoreError> {
        let (tweets, blank): (Vec<&RawTweet>, Vec<&RawTweet>) =
            tweets.iter().partition(|t| !t.text.trim().is_empty());
        if !blank.is_empty() {
            tracing::warn!(skipped = blank.len(), "blank tweets skipped while loading");
        }

        let engine = AnalyticsEngine::build(
            config,
            (1_i64..).zip(tweets.iter().map(|t| t.text.as_str())),
            overrides,
        )?;
        let library = Self {
            store: TweetStore::new(),
            engine,
            writes: Mutex::new(()),
        };

        let mut unscored = 0_usize;
        for tweet in tweets {
            let record = library
                .store
                .insert(|id| library.build_record(id, &tweet.text, tweet.created_at))?;
            if !record.is_scored() {
                unscored += 1;
            }
        }

        tracing::info!(
            records = library.store.len(),
            indexed = library.engine.index_len(),
            unscored,
            "tweet library ready"
        );
        Ok(library)
    }

    /// Load a JSON Lines dataset and build a library from it.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Config`] if the dataset cannot be read, otherwise
    /// as [`TweetLibrary::from_tweets`].
    pub fn from_dataset(
        config: &AnalyticsConfig,
        path: &Path,
        overrides: Option<&LexiconFile>,
    ) -> Result<Self, StoreError> {
        let tweets = load_tweets(path)?;
        Self::from_tweets(config, &tweets, overrides)
    }

    #[must_use]
    pub fn engine(&self) -> &AnalyticsEngine {
        &self.engine
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.store.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    #[must_use]
    pub fn index_len(&self) -> usize {
        self.engine.index_len()
    }

    /// Store a new tweet, scored and indexed. `created_at` defaults to now.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Analytics`] with `InvalidInput` for blank text.
    pub fn add(&self, text: &str, created_at: Option<DateTime<Utc>>) -> Result<Record, StoreError> {
        let _guard = self.writes.lock();
        let created_at = created_at.unwrap_or_else(Utc::now);
        let record = self
            .store
            .insert(|id| self.build_record(id, text, created_at))?;
        self.engine.index_record(record.id, &record.text)?;
        tracing::info!(id = record.id, label = ?record.sentiment_label, "record added");
        Ok(record)
    }

    /// Replace the text of record `id`, keeping its timestamp.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] for an unknown id and
    /// [`StoreError::Analytics`] with `InvalidInput` for blank text.
    pub fn update_text(&self, id: i64, text: &str) -> Result<Record, StoreError> {
        let _guard = self.writes.lock();
        let record = self.store.update(id, |record| {
            *record = self.build_record(id, text, record.created_at)?;
            Ok(())
        })?;
        self.engine.index_record(id, &record.text)?;
        tracing::info!(id, label = ?record.sentiment_label, "record updated");
        Ok(record)
    }

    /// Delete record `id` and drop it from the similarity index.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] for an unknown id.
    pub fn delete(&self, id: i64) -> Result<Record, StoreError> {
        let _guard = self.writes.lock();
        let record = self.store.delete(id)?;
        self.engine.forget_record(id);
        tracing::info!(id, "record deleted");
        Ok(record)
    }

    #[must_use]
    pub fn get(&self, id: i64) -> Option<Record> {
        self.store.get(id)
    }

    #[must_use]
    pub fn all(&self) -> Vec<Record> {
        self.store.all()
    }

    #[must_use]
    pub fn random(&self) -> Option<Record> {
        self.store.random()
    }

    /// See [`TweetStore::range_by_id`].
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidQuery`] for an inverted or non-positive range.
    pub fn range(&self, start_id: i64, end_id: i64) -> Result<Vec<Record>, StoreError> {
        self.store.range_by_id(start_id, end_id)
    }

    /// Records created between two `YYYYMMDD` dates, inclusive, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidDate`] for a malformed date and
    /// [`StoreError::InvalidQuery`] when `start_date` is after `end_date`.
    pub fn filter_dates(&self, start_date: &str, end_date: &str) -> Result<Vec<Record>, StoreError> {
        let start = parse_compact_date(start_date)?;
        let end = parse_compact_date(end_date)?;
        self.store.filter_by_date(start, end)
    }

    /// See [`TweetStore::search_keyword`].
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidQuery`] for a blank keyword.
    pub fn search(&self, keyword: &str) -> Result<Vec<Record>, StoreError> {
        self.store.search_keyword(keyword)
    }

    /// Score arbitrary text without storing it.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Analytics`] with `InvalidInput` for text without words.
    pub fn score_text(&self, text: &str) -> Result<SentimentScore, StoreError> {
        Ok(self.engine.score_sentiment(text)?)
    }

    /// The `n` records most similar to record `id`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] for an unknown id and
    /// [`StoreError::Analytics`] with `InvalidArgument` when `n <= 0`.
    pub fn similar(&self, id: i64, n: i64) -> Result<Vec<SimilarTweet>, StoreError> {
        let hits = self.engine.similar_to(id, n).map_err(|e| match e {
            AnalyticsError::NotFound(id) => StoreError::NotFound(id),
            other => StoreError::Analytics(other),
        })?;
        // A neighbour deleted since the query ran is skipped.
        Ok(hits
            .into_iter()
            .filter_map(|hit| {
                self.store.get(hit.id).map(|record| SimilarTweet {
                    id: record.id,
                    text: record.text,
                    sentiment_label: record.sentiment_label,
                    similarity: hit.similarity,
                })
            })
            .collect())
    }

    /// Top `n` words over every record, or over `ids` when given.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] for an unknown id and
    /// [`StoreError::Analytics`] with `InvalidArgument` when `n <= 0`.
    pub fn top_words(&self, ids: Option<&[i64]>, n: i64) -> Result<Vec<WordCount>, StoreError> {
        let records = self.select(ids)?;
        Ok(self
            .engine
            .top_words(records.iter().map(|r| r.text.as_str()), n)?)
    }

    /// Every word count over every record, or over `ids` when given.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] for an unknown id.
    pub fn word_counts(&self, ids: Option<&[i64]>) -> Result<FrequencyTable, StoreError> {
        let records = self.select(ids)?;
        Ok(self
            .engine
            .word_counts(records.iter().map(|r| r.text.as_str())))
    }

    fn select(&self, ids: Option<&[i64]>) -> Result<Vec<Record>, StoreError> {
        match ids {
            Some(ids) => self.store.get_many(ids),
            None => Ok(self.store.all()),
        }
    }

    fn build_record(
        &self,
        id: i64,
        text: &str,
        created_at: DateTime<Utc>,
    ) -> Result<Record, StoreError> {
        if text.trim().is_empty() {
            return Err(AnalyticsError::InvalidInput("text must not be blank".to_string()).into());
        }

        let scored = match self.engine.score_sentiment(text) {
            Ok(score) => Some(score),
            Err(AnalyticsError::InvalidInput(reason)) => {
                tracing::warn!(id, %reason, "record stored without sentiment");
                None
            }
            Err(e) => return Err(e.into()),
        };

        Ok(Record {
            id,
            text: text.to_string(),
            cleaned_text: self.engine.clean_text(text),
            created_at,
            sentiment_label: scored.map(|s| s.label),
            sentiment_score: scored.map(|s| s.score),
            polarity: scored.map(|s| s.polarity),
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn tweet(text: &str, day: u32) -> RawTweet {
        RawTweet {
            text: text.to_string(),
            created_at: Utc.with_ymd_and_hms(2018, 1, day, 8, 30, 0).unwrap(),
        }
    }

    fn library(tweets: &[RawTweet]) -> TweetLibrary {
        TweetLibrary::from_tweets(&AnalyticsConfig::default(), tweets, None).unwrap()
    }

    #[test]
    fn loaded_tweets_are_scored_cleaned_and_indexed() {
        let lib = library(&[tweet("RT @a: I love this!", 1), tweet("I hate this.", 2)]);
        assert_eq!(lib.len(), 2);
        assert_eq!(lib.index_len(), 2);
        let first = lib.get(1).unwrap();
        assert_eq!(first.cleaned_text, "I love this!");
        assert_eq!(first.sentiment_label, Some(SentimentLabel::Positive));
        assert_eq!(lib.get(2).unwrap().sentiment_label, Some(SentimentLabel::Negative));
    }

    #[test]
    fn wordless_tweet_is_stored_unscored() {
        let lib = library(&[tweet("@someone https://t.co/x", 1)]);
        let record = lib.get(1).unwrap();
        assert!(!record.is_scored());
        assert!(record.cleaned_text.is_empty());
    }

    #[test]
    fn blank_dataset_tweets_are_skipped_without_shifting_ids() {
        let lib = library(&[
            tweet("cats are great", 1),
            tweet("", 2),
            tweet("   ", 3),
            tweet("cats are wonderful", 4),
        ]);
        assert_eq!(lib.len(), 2);
        assert_eq!(lib.index_len(), 2);
        assert_eq!(lib.get(2).unwrap().text, "cats are wonderful");
        let hits = lib.similar(1, 1).unwrap();
        assert_eq!(hits[0].id, 2);
        assert_eq!(hits[0].text, "cats are wonderful");
    }

    #[test]
    fn blank_tweet_is_rejected() {
        let lib = library(&[]);
        assert!(matches!(
            lib.add("   ", None),
            Err(StoreError::Analytics(AnalyticsError::InvalidInput(_)))
        ));
        assert!(lib.is_empty());
    }

    #[test]
    fn update_rescores_and_reindexes() {
        let lib = library(&[
            tweet("cats are great", 1),
            tweet("cats are wonderful", 2),
            tweet("stock market crash", 3),
        ]);
        let updated = lib.update_text(3, "cats are great friends").unwrap();
        assert_eq!(updated.created_at, tweet("", 3).created_at);
        assert_eq!(updated.sentiment_label, Some(SentimentLabel::Positive));
        assert_eq!(lib.similar(1, 1).unwrap()[0].id, 3);
    }

    #[test]
    fn delete_drops_from_index() {
        let lib = library(&[tweet("cats are great", 1), tweet("cats are wonderful", 2)]);
        lib.delete(2).unwrap();
        assert_eq!(lib.index_len(), 1);
        assert!(lib.similar(1, 5).unwrap().is_empty());
        assert!(matches!(lib.similar(2, 1), Err(StoreError::NotFound(2))));
    }

    #[test]
    fn top_words_over_a_subset() {
        let lib = library(&[
            tweet("rust rust rust", 1),
            tweet("tokio tokio", 2),
            tweet("serde", 3),
        ]);
        let top = lib.top_words(Some(&[2, 3]), 1).unwrap();
        assert_eq!(top[0].word, "tokio");
        assert_eq!(lib.top_words(None, 1).unwrap()[0].word, "rust");
        assert!(matches!(lib.top_words(Some(&[42]), 1), Err(StoreError::NotFound(42))));
        assert_eq!(lib.word_counts(None).unwrap().len(), 3);
    }

    #[test]
    fn date_filter_parses_compact_dates() {
        let lib = library(&[tweet("one", 3), tweet("two", 1), tweet("three", 9)]);
        let ids: Vec<i64> = lib
            .filter_dates("20180101", "20180103")
            .unwrap()
            .iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec![2, 1]);
        assert!(matches!(
            lib.filter_dates("2018-01-01", "20180103"),
            Err(StoreError::InvalidDate { .. })
        ));
    }
}
