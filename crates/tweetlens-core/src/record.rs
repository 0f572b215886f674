use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Sentiment class derived from a continuous score and fixed thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Positive,
    Neutral,
    Negative,
}

impl std::fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SentimentLabel::Positive => write!(f, "positive"),
            SentimentLabel::Neutral => write!(f, "neutral"),
            SentimentLabel::Negative => write!(f, "negative"),
        }
    }
}

/// Share of negative, neutral and positive weight in a text, plus the
/// normalized compound score in `[-1.0, 1.0]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PolarityScores {
    pub negative: f32,
    pub neutral: f32,
    pub positive: f32,
    pub compound: f32,
}

/// One stored tweet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: i64,
    /// The text exactly as submitted.
    pub text: String,
    /// `text` after tweet cleanup (mentions, URLs and retweet markers removed).
    pub cleaned_text: String,
    pub created_at: DateTime<Utc>,
    pub sentiment_label: Option<SentimentLabel>,
    pub sentiment_score: Option<f32>,
    pub polarity: Option<PolarityScores>,
}

impl Record {
    /// Whether the record has been scored for sentiment.
    #[must_use]
    pub fn is_scored(&self) -> bool {
        self.sentiment_label.is_some()
    }
}
