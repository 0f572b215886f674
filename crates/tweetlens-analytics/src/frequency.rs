//! Token counting over a set of texts.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;

use crate::error::AnalyticsError;
use crate::normalize::TextNormalizer;

/// English function words dropped when stopword removal is on.
const STOPWORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "all", "am", "an", "and", "any", "are",
    "as", "at", "be", "because", "been", "before", "being", "below", "between", "both", "but",
    "by", "can", "could", "did", "do", "does", "doing", "down", "during", "each", "few", "for",
    "from", "further", "had", "has", "have", "having", "he", "her", "here", "hers", "herself",
    "him", "himself", "his", "how", "i", "i'm", "if", "in", "into", "is", "it", "it's", "its",
    "itself", "just", "me", "more", "most", "my", "myself", "no", "nor", "not", "now", "of", "off",
    "on", "once", "only", "or", "other", "our", "ours", "ourselves", "out", "over", "own", "same",
    "she", "should", "so", "some", "such", "than", "that", "the", "their", "theirs", "them",
    "themselves", "then", "there", "these", "they", "this", "those", "through", "to", "too",
    "under", "until", "up", "very", "was", "we", "were", "what", "when", "where", "which", "while",
    "who", "whom", "why", "will", "with", "would", "you", "your", "yours", "yourself",
    "yourselves",
];

/// One word and how often it occurred.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WordCount {
    pub word: String,
    pub count: usize,
}

/// Every counted word, ordered by descending count then first appearance.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrequencyTable {
    entries: Vec<WordCount>,
}

impl FrequencyTable {
    #[must_use]
    pub fn entries(&self) -> &[WordCount] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn count_of(&self, word: &str) -> usize {
        self.entries
            .iter()
            .find(|e| e.word == word)
            .map_or(0, |e| e.count)
    }

    #[must_use]
    pub fn into_entries(self) -> Vec<WordCount> {
        self.entries
    }
}

/// Counts word occurrences using the shared normalizer.
#[derive(Debug, Clone)]
pub struct WordFrequencyAnalyzer {
    normalizer: Arc<TextNormalizer>,
    remove_stopwords: bool,
}

impl WordFrequencyAnalyzer {
    #[must_use]
    pub fn new(normalizer: Arc<TextNormalizer>, remove_stopwords: bool) -> Self {
        Self {
            normalizer,
            remove_stopwords,
        }
    }

    #[must_use]
    pub fn removes_stopwords(&self) -> bool {
        self.remove_stopwords
    }

    /// Count every token across `texts`.
    pub fn counts<I, S>(&self, texts: I) -> FrequencyTable
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        // word -> position in `entries`, which holds first-seen order
        let mut positions: HashMap<String, usize> = HashMap::new();
        let mut entries: Vec<WordCount> = Vec::new();

        for text in texts {
            for token in self.normalizer.tokens(text.as_ref()) {
                if self.remove_stopwords && STOPWORDS.contains(&token.as_str()) {
                    continue;
                }
                if let Some(&pos) = positions.get(&token) {
                    entries[pos].count += 1;
                } else {
                    positions.insert(token.clone(), entries.len());
                    entries.push(WordCount {
                        word: token,
                        count: 1,
                    });
                }
            }
        }

        // stable sort keeps first-seen order among equal counts
        entries.sort_by(|a, b| b.count.cmp(&a.count));
        FrequencyTable { entries }
    }

    /// The `n` most frequent words across `texts`.
    ///
    /// # Errors
    ///
    /// Returns [`AnalyticsError::InvalidArgument`] when `n` is zero.
    pub fn top_n<I, S>(&self, texts: I, n: usize) -> Result<Vec<WordCount>, AnalyticsError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        if n == 0 {
            return Err(AnalyticsError::InvalidArgument(
                "n must be positive".to_string(),
            ));
        }
        let mut entries = self.counts(texts).into_entries();
        entries.truncate(n);
        Ok(entries)
    }
}
