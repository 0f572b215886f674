//! Loader for tweet dumps in JSON Lines form.
//!
//! Each line wraps the tweet in a `document` object:
//! `{"document": {"text": "...", "created_at": "Mon Jan 22 22:01:10 +0000 2018", "lang": "en"}}`.
//! Only English tweets with a parseable timestamp are kept.

use std::io::BufRead;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::ConfigError;

/// Timestamp layout used by the Twitter API `created_at` field.
pub const TWITTER_TIMESTAMP_FORMAT: &str = "%a %b %d %H:%M:%S %z %Y";

/// A tweet read from a dataset, before it is stored or scored.
#[derive(Debug, Clone, PartialEq)]
pub struct RawTweet {
    pub text: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
struct DatasetLine {
    document: DatasetDocument,
}

#[derive(Debug, Deserialize)]
struct DatasetDocument {
    #[serde(default)]
    text: String,
    #[serde(default)]
    created_at: String,
    #[serde(default)]
    lang: String,
}

/// Parse a Twitter-style `created_at` timestamp into UTC.
///
/// Returns `None` when the string does not match [`TWITTER_TIMESTAMP_FORMAT`].
#[must_use]
pub fn parse_tweet_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_str(raw.trim(), TWITTER_TIMESTAMP_FORMAT)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Load every English tweet from a JSON Lines file.
///
/// # Errors
///
/// Returns [`ConfigError::DatasetIo`] if the file cannot be read and
/// [`ConfigError::DatasetParse`] on a line that is not valid JSON.
pub fn load_tweets(path: &Path) -> Result<Vec<RawTweet>, ConfigError> {
    let file = std::fs::File::open(path).map_err(|e| ConfigError::DatasetIo {
        path: path.display().to_string(),
        source: e,
    })?;
    let tweets = read_lines(std::io::BufReader::new(file), &path.display().to_string())?;
    tracing::info!(path = %path.display(), tweets = tweets.len(), "dataset loaded");
    Ok(tweets)
}

/// Read English tweets from any buffered reader.
///
/// # Errors
///
/// Same as [`load_tweets`].
pub fn read_tweets<R: BufRead>(reader: R) -> Result<Vec<RawTweet>, ConfigError> {
    read_lines(reader, "<stream>")
}

fn read_lines<R: BufRead>(reader: R, source: &str) -> Result<Vec<RawTweet>, ConfigError> {
    let mut tweets = Vec::new();
    let mut skipped = 0_usize;

    for (index, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| ConfigError::DatasetIo {
            path: source.to_string(),
            source: e,
        })?;
        if line.trim().is_empty() {
            continue;
        }

        let parsed: DatasetLine =
            serde_json::from_str(&line).map_err(|e| ConfigError::DatasetParse {
                line: index + 1,
                source: e,
            })?;
        let doc = parsed.document;

        if doc.lang != "en" {
            skipped += 1;
            continue;
        }

        let Some(created_at) = parse_tweet_timestamp(&doc.created_at) else {
            tracing::warn!(
                line = index + 1,
                created_at = %doc.created_at,
                "skipping tweet with unparseable timestamp"
            );
            skipped += 1;
            continue;
        };

        tweets.push(RawTweet {
            text: doc.text,
            created_at,
        });
    }

    if skipped > 0 {
        tracing::debug!(source, skipped, "dataset lines skipped");
    }
    Ok(tweets)
}
