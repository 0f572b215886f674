//! Plain-text table rendering for CLI output.

use tweetlens_analytics::{SentimentScore, WordCount};
use tweetlens_core::{Record, SentimentLabel};
use tweetlens_store::SimilarTweet;

const TEXT_WIDTH: usize = 60;

fn label_of(label: Option<SentimentLabel>) -> String {
    label.map_or_else(|| "-".to_string(), |l| l.to_string())
}

fn clip(text: &str) -> String {
    if text.chars().count() <= TEXT_WIDTH {
        return text.to_string();
    }
    let head: String = text.chars().take(TEXT_WIDTH - 3).collect();
    format!("{head}...")
}

pub(crate) fn render_score(text: &str, score: &SentimentScore) -> String {
    let p = &score.polarity;
    [
        format!("text:     {text}"),
        format!("label:    {}", score.label),
        format!("compound: {:.4}", score.score),
        format!(
            "polarity: neg {:.3}  neu {:.3}  pos {:.3}",
            p.negative, p.neutral, p.positive
        ),
    ]
    .join("\n")
}

pub(crate) fn render_similar(id: i64, hits: &[SimilarTweet]) -> String {
    if hits.is_empty() {
        return format!("no records similar to {id}");
    }
    let mut lines = vec![format!(
        "{:<8}{:<12}{:<10}TEXT",
        "ID", "SIMILARITY", "LABEL"
    )];
    lines.extend(hits.iter().map(|hit| {
        format!(
            "{:<8}{:<12.4}{:<10}{}",
            hit.id,
            hit.similarity,
            label_of(hit.sentiment_label),
            clip(&hit.text)
        )
    }));
    lines.join("\n")
}

pub(crate) fn render_words(words: &[WordCount]) -> String {
    if words.is_empty() {
        return "no words counted".to_string();
    }
    let mut lines = vec![format!("{:<25}COUNT", "WORD")];
    lines.extend(
        words
            .iter()
            .map(|w| format!("{:<25}{}", w.word, w.count)),
    );
    lines.join("\n")
}

pub(crate) fn render_records(records: &[Record]) -> String {
    if records.is_empty() {
        return "no matching records".to_string();
    }
    let mut lines = vec![format!(
        "{:<8}{:<18}{:<10}{:<10}TEXT",
        "ID", "CREATED", "LABEL", "SCORE"
    )];
    lines.extend(records.iter().map(|r| {
        let score = r
            .sentiment_score
            .map_or_else(|| "-".to_string(), |s| format!("{s:.4}"));
        format!(
            "{:<8}{:<18}{:<10}{:<10}{}",
            r.id,
            r.created_at.format("%Y-%m-%d %H:%M"),
            label_of(r.sentiment_label),
            score,
            clip(&r.text)
        )
    }));
    lines.join("\n")
}

pub(crate) fn render_stats(records: &[Record], index_len: usize) -> String {
    let count = |label: Option<SentimentLabel>| {
        records
            .iter()
            .filter(|r| r.sentiment_label == label)
            .count()
    };
    [
        format!("records:  {}", records.len()),
        format!("indexed:  {index_len}"),
        format!("positive: {}", count(Some(SentimentLabel::Positive))),
        format!("neutral:  {}", count(Some(SentimentLabel::Neutral))),
        format!("negative: {}", count(Some(SentimentLabel::Negative))),
        format!("unscored: {}", count(None)),
    ]
    .join("\n")
}
