//! In-memory tweet storage kept in step with the analytics index.

pub mod library;
pub mod records;

use thiserror::Error;
use tweetlens_analytics::AnalyticsError;
use tweetlens_core::ConfigError;

pub use library::{SimilarTweet, TweetLibrary};
pub use records::{parse_compact_date, TweetStore};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("record {0} not found")]
    NotFound(i64),

    #[error("invalid date {value:?}: expected YYYYMMDD")]
    InvalidDate { value: String },

    #[error("invalid query: {0}")]
    InvalidQuery(String),

    #[error(transparent)]
    Analytics(#[from] AnalyticsError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}
