//! Rule-based sentiment scorer over the valence [`Lexicon`].
//!
//! Per-token valences are adjusted for ALL-CAPS emphasis, booster and
//! dampener words, negation and a contrastive "but", summed, amplified by
//! `!`/`?` emphasis and squashed into `[-1.0, 1.0]`.

use std::sync::Arc;

use serde::Serialize;
use tweetlens_core::{PolarityScores, SentimentLabel};

use crate::error::AnalyticsError;
use crate::lexicon::{Lexicon, BOOSTERS, DAMPENERS, NEGATIONS};
use crate::normalize::TextNormalizer;

const BOOSTER_INCREMENT: f32 = 0.293;
const CAPS_INCREMENT: f32 = 0.733;
const NEGATION_SCALAR: f32 = -0.74;
const EXCLAMATION_INCREMENT: f32 = 0.292;
const MAX_EXCLAMATIONS: usize = 4;
const QUESTION_INCREMENT: f32 = 0.18;
const MAX_QUESTION_EMPHASIS: f32 = 0.96;
const NORMALIZATION_ALPHA: f32 = 15.0;
/// Scale applied to booster influence at distance 1, 2 and 3 tokens back.
const DISTANCE_DAMPING: [f32; 3] = [1.0, 0.95, 0.9];

/// Score cut-offs separating positive, neutral and negative labels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SentimentThresholds {
    pub positive: f32,
    pub negative: f32,
}

impl Default for SentimentThresholds {
    fn default() -> Self {
        Self {
            positive: 0.05,
            negative: -0.05,
        }
    }
}

impl SentimentThresholds {
    /// `score > positive` is positive, `score < negative` is negative, else neutral.
    #[must_use]
    pub fn label_for(&self, score: f32) -> SentimentLabel {
        if score > self.positive {
            SentimentLabel::Positive
        } else if score < self.negative {
            SentimentLabel::Negative
        } else {
            SentimentLabel::Neutral
        }
    }
}

/// Result of scoring one text.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SentimentScore {
    pub label: SentimentLabel,
    /// Compound score in `[-1.0, 1.0]`.
    pub score: f32,
    pub polarity: PolarityScores,
}

struct Token {
    lower: String,
    shouting: bool,
}

#[derive(Debug)]
pub struct SentimentScorer {
    lexicon: Arc<Lexicon>,
    normalizer: Arc<TextNormalizer>,
    thresholds: SentimentThresholds,
}

impl SentimentScorer {
    #[must_use]
    pub fn new(
        lexicon: Arc<Lexicon>,
        normalizer: Arc<TextNormalizer>,
        thresholds: SentimentThresholds,
    ) -> Self {
        Self {
            lexicon,
            normalizer,
            thresholds,
        }
    }

    #[must_use]
    pub fn thresholds(&self) -> SentimentThresholds {
        self.thresholds
    }

    /// Score `text` for sentiment.
    ///
    /// # Errors
    ///
    /// Returns [`AnalyticsError::InvalidInput`] when the text holds no words
    /// after tweet cleanup.
    pub fn score(&self, text: &str) -> Result<SentimentScore, AnalyticsError> {
        let cleaned = self.normalizer.clean(text);
        let tokens = split_tokens(&cleaned);
        if tokens.is_empty() {
            return Err(AnalyticsError::InvalidInput(
                "text is empty after normalization".to_string(),
            ));
        }

        let caps_differential = is_caps_differential(&tokens);
        let mut sentiments = self.token_valences(&tokens, caps_differential);
        apply_but_rule(&tokens, &mut sentiments);

        let emphasis = punctuation_emphasis(&cleaned);
        let mut sum: f32 = sentiments.iter().sum();
        if sum > 0.0 {
            sum += emphasis;
        } else if sum < 0.0 {
            sum -= emphasis;
        }

        let compound = normalize_score(sum);
        let polarity = polarity_split(&sentiments, emphasis, compound);

        Ok(SentimentScore {
            label: self.thresholds.label_for(compound),
            score: compound,
            polarity,
        })
    }

    fn token_valences(&self, tokens: &[Token], caps_differential: bool) -> Vec<f32> {
        let mut sentiments = Vec::with_capacity(tokens.len());
        let mut skip_next = false;

        for (i, token) in tokens.iter().enumerate() {
            if skip_next {
                skip_next = false;
                sentiments.push(0.0);
                continue;
            }
            if booster_increment(&token.lower).is_some() {
                sentiments.push(0.0);
                continue;
            }

            let phrase = tokens
                .get(i + 1)
                .and_then(|next| self.lexicon.valence(&format!("{} {}", token.lower, next.lower)));
            let (mut valence, consumed) = match phrase {
                Some(v) => (v, true),
                None => match self.lexicon.valence(&token.lower) {
                    Some(v) => (v, false),
                    None => {
                        sentiments.push(0.0);
                        continue;
                    }
                },
            };

            if valence != 0.0 {
                if caps_differential && token.shouting {
                    valence += CAPS_INCREMENT.copysign(valence);
                }

                for (distance, damping) in (1..=3).zip(DISTANCE_DAMPING) {
                    let Some(prev) = i.checked_sub(distance).map(|j| &tokens[j]) else {
                        break;
                    };
                    if let Some(scalar) = booster_scalar(prev, valence, caps_differential) {
                        valence += scalar * damping;
                    }
                }

                let window_start = i.saturating_sub(3);
                if tokens[window_start..i].iter().any(|t| is_negation(&t.lower)) {
                    valence *= NEGATION_SCALAR;
                }
            }

            sentiments.push(valence);
            skip_next = consumed;
        }

        sentiments
    }
}

/// Split cleaned text into tokens, trimming surrounding punctuation but
/// keeping emoticons and inner apostrophes.
fn split_tokens(cleaned: &str) -> Vec<Token> {
    cleaned
        .split_whitespace()
        .filter_map(|raw| {
            let word = if EMOTICONS.contains(&raw.to_lowercase().as_str()) {
                raw
            } else {
                let trimmed = raw.trim_matches(|c: char| !c.is_alphanumeric());
                if trimmed.is_empty() {
                    return None;
                }
                trimmed
            };
            let letters: Vec<char> = word.chars().filter(|c| c.is_alphabetic()).collect();
            let shouting = letters.len() > 1 && letters.iter().all(|c| c.is_uppercase());
            Some(Token {
                lower: word.to_lowercase(),
                shouting,
            })
        })
        .collect()
}

const EMOTICONS: &[&str] = &[":)", ":-)", ":d", ";)", "<3", ":(", ":-(", ":'("];

/// True when some, but not all, tokens are written in capitals.
fn is_caps_differential(tokens: &[Token]) -> bool {
    let shouting = tokens.iter().filter(|t| t.shouting).count();
    shouting > 0 && shouting < tokens.len()
}

fn booster_increment(word: &str) -> Option<f32> {
    if BOOSTERS.contains(&word) {
        Some(BOOSTER_INCREMENT)
    } else if DAMPENERS.contains(&word) {
        Some(-BOOSTER_INCREMENT)
    } else {
        None
    }
}

/// How much a preceding booster or dampener shifts `valence`.
fn booster_scalar(prev: &Token, valence: f32, caps_differential: bool) -> Option<f32> {
    let mut scalar = booster_increment(&prev.lower)?;
    if valence < 0.0 {
        scalar = -scalar;
    }
    if caps_differential && prev.shouting {
        scalar += CAPS_INCREMENT.copysign(valence);
    }
    Some(scalar)
}

fn is_negation(word: &str) -> bool {
    NEGATIONS.contains(&word) || word.ends_with("n't")
}

/// Everything before the first "but" is halved, everything after grows by half.
fn apply_but_rule(tokens: &[Token], sentiments: &mut [f32]) {
    let Some(pivot) = tokens.iter().position(|t| t.lower == "but") else {
        return;
    };
    for (i, s) in sentiments.iter_mut().enumerate() {
        if i < pivot {
            *s *= 0.5;
        } else if i > pivot {
            *s *= 1.5;
        }
    }
}

#[allow(clippy::cast_precision_loss)]
fn punctuation_emphasis(text: &str) -> f32 {
    let exclamations = text.matches('!').count().min(MAX_EXCLAMATIONS);
    let questions = text.matches('?').count();
    let question_emphasis = match questions {
        0 | 1 => 0.0,
        2 | 3 => questions as f32 * QUESTION_INCREMENT,
        _ => MAX_QUESTION_EMPHASIS,
    };
    exclamations as f32 * EXCLAMATION_INCREMENT + question_emphasis
}

/// Squash an unbounded valence sum into `[-1.0, 1.0]`.
fn normalize_score(sum: f32) -> f32 {
    (sum / (sum * sum + NORMALIZATION_ALPHA).sqrt()).clamp(-1.0, 1.0)
}

#[allow(clippy::cast_precision_loss)]
fn polarity_split(sentiments: &[f32], emphasis: f32, compound: f32) -> PolarityScores {
    let mut positive = 0.0_f32;
    let mut negative = 0.0_f32;
    let mut neutral = 0.0_f32;

    for &s in sentiments {
        if s > 0.0 {
            positive += s + 1.0;
        } else if s < 0.0 {
            negative += s - 1.0;
        } else {
            neutral += 1.0;
        }
    }

    if positive > negative.abs() {
        positive += emphasis;
    } else if positive < negative.abs() {
        negative -= emphasis;
    }

    let total = positive + negative.abs() + neutral;
    if total == 0.0 {
        return PolarityScores {
            negative: 0.0,
            neutral: 1.0,
            positive: 0.0,
            compound,
        };
    }

    PolarityScores {
        negative: negative.abs() / total,
        neutral: neutral / total,
        positive: positive / total,
        compound,
    }
}
