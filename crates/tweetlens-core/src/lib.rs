//! Shared configuration, data model and dataset loading for tweetlens.

pub mod app_config;
pub mod config;
pub mod dataset;
pub mod lexicon_file;
pub mod record;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use dataset::{load_tweets, parse_tweet_timestamp, read_tweets, RawTweet};
pub use lexicon_file::{load_lexicon_file, LexiconFile};
pub use record::{PolarityScores, Record, SentimentLabel};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read lexicon file {path}: {source}")]
    LexiconFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse lexicon file: {0}")]
    LexiconFileParse(#[source] serde_yaml::Error),

    #[error("failed to read dataset {path}: {source}")]
    DatasetIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed dataset line {line}: {source}")]
    DatasetParse {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("config validation error: {0}")]
    Validation(String),
}
