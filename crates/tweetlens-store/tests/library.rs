//! Library behaviour over a small JSON Lines dataset, no files on disk.

use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;

use tweetlens_analytics::AnalyticsConfig;
use tweetlens_core::{read_tweets, SentimentLabel};
use tweetlens_store::{StoreError, TweetLibrary};

const DATASET: &str = r#"{"document": {"text": "I love this new phone! #blessed", "created_at": "Mon Jan 22 22:01:10 +0000 2018", "lang": "en"}}
{"document": {"text": "Ce téléphone est nul", "created_at": "Mon Jan 22 22:05:10 +0000 2018", "lang": "fr"}}
{"document": {"text": "RT @carrier: outage again, I hate this network", "created_at": "Tue Jan 23 08:00:00 +0000 2018", "lang": "en"}}
{"document": {"text": "new phone who dis", "created_at": "Sun Jan 21 10:00:00 +0000 2018", "lang": "en"}}
"#;

fn library() -> TweetLibrary {
    let tweets = read_tweets(Cursor::new(DATASET)).unwrap();
    TweetLibrary::from_tweets(&AnalyticsConfig::default(), &tweets, None).unwrap()
}

#[test]
fn only_english_tweets_are_loaded() {
    let lib = library();
    assert_eq!(lib.len(), 3);
    assert!(lib.all().iter().all(|r| !r.text.contains("téléphone")));
}

#[test]
fn loaded_records_carry_labels() {
    let lib = library();
    assert_eq!(lib.get(1).unwrap().sentiment_label, Some(SentimentLabel::Positive));
    let second = lib.get(2).unwrap();
    assert_eq!(second.sentiment_label, Some(SentimentLabel::Negative));
    assert_eq!(second.cleaned_text, "outage again, I hate this network");
}

#[test]
fn date_filter_returns_oldest_first() {
    let lib = library();
    let ids: Vec<i64> = lib
        .filter_dates("20180121", "20180122")
        .unwrap()
        .iter()
        .map(|r| r.id)
        .collect();
    assert_eq!(ids, vec![3, 1]);
}

#[test]
fn keyword_search_matches_cleaned_text_only() {
    let lib = library();
    assert_eq!(lib.search("PHONE").unwrap().len(), 2);
    // mentions are removed during cleanup
    assert!(lib.search("carrier").unwrap().is_empty());
}

#[test]
fn similar_records_exclude_the_query_record() {
    let lib = library();
    let hits = lib.similar(1, 10).unwrap();
    assert_eq!(hits.len(), 2);
    assert!(hits.iter().all(|h| h.id != 1));
    assert_eq!(hits[0].id, 3);
}

#[test]
fn non_positive_n_is_rejected() {
    let lib = library();
    assert!(matches!(lib.similar(1, 0), Err(StoreError::Analytics(_))));
    assert!(matches!(lib.top_words(None, -1), Err(StoreError::Analytics(_))));
}

#[test]
fn missing_dataset_is_a_config_error() {
    let result = TweetLibrary::from_dataset(
        &AnalyticsConfig::default(),
        Path::new("/nonexistent/tweets.jl"),
        None,
    );
    assert!(matches!(result, Err(StoreError::Config(_))));
}

#[test]
fn concurrent_writes_keep_store_and_index_in_step() {
    let lib = Arc::new(library());
    let handles: Vec<_> = (0..4)
        .map(|t| {
            let lib = Arc::clone(&lib);
            std::thread::spawn(move || {
                for i in 0..25 {
                    let record = lib.add(&format!("worker {t} tweet {i} is great"), None).unwrap();
                    if i % 5 == 0 {
                        lib.delete(record.id).unwrap();
                    }
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }
    assert_eq!(lib.len(), 3 + 4 * 20);
    assert_eq!(lib.len(), lib.index_len());
}

#[test]
fn dataset_with_blank_tweet_still_loads() {
    let input = concat!(
        r#"{"document": {"text": "cats are great", "created_at": "Mon Jan 22 22:01:10 +0000 2018", "lang": "en"}}"#,
        "\n",
        r#"{"document": {"text": "", "created_at": "Mon Jan 22 22:02:10 +0000 2018", "lang": "en"}}"#,
        "\n",
        r#"{"document": {"created_at": "Mon Jan 22 22:03:10 +0000 2018", "lang": "en"}}"#,
        "\n",
        r#"{"document": {"text": "cats are wonderful", "created_at": "Mon Jan 22 22:04:10 +0000 2018", "lang": "en"}}"#,
        "\n",
    );
    let tweets = read_tweets(Cursor::new(input)).unwrap();
    assert_eq!(tweets.len(), 4);

    let lib = TweetLibrary::from_tweets(&AnalyticsConfig::default(), &tweets, None).unwrap();
    assert_eq!(lib.len(), 2);
    assert_eq!(lib.index_len(), 2);
    assert_eq!(lib.similar(2, 1).unwrap()[0].id, 1);
}
