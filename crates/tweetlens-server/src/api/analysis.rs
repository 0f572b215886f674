//! Similarity, ad-hoc sentiment and word-frequency handlers.

use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use tweetlens_analytics::WordCount;
use tweetlens_core::{PolarityScores, SentimentLabel};
use tweetlens_store::SimilarTweet;

use crate::middleware::RequestId;

use super::{map_store_error, ApiError, ApiResponse, AppState};

const DEFAULT_SIMILAR: i64 = 5;
const DEFAULT_TOP_WORDS: i64 = 10;

#[derive(Debug, Deserialize)]
pub(super) struct SimilarQuery {
    pub n: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub(super) struct SentimentQuery {
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct TopWordsQuery {
    pub n: Option<i64>,
    /// Comma-separated record ids; every record when absent.
    pub ids: Option<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct SentimentData {
    pub text: String,
    pub cleaned_text: String,
    pub label: SentimentLabel,
    pub score: f32,
    pub polarity: PolarityScores,
}

/// GET /api/v1/entries/:id/similar?n: nearest records, excluding `id`.
pub(super) async fn similar_entries(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<i64>,
    Query(query): Query<SimilarQuery>,
) -> Result<Json<ApiResponse<Vec<SimilarTweet>>>, ApiError> {
    let hits = state
        .library
        .similar(id, query.n.unwrap_or(DEFAULT_SIMILAR))
        .map_err(|e| map_store_error(&req_id.0, &e))?;
    Ok(Json(ApiResponse::new(hits, req_id.0)))
}

/// GET /api/v1/sentiment?text: score a string without storing it.
pub(super) async fn score_text(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<SentimentQuery>,
) -> Result<Json<ApiResponse<SentimentData>>, ApiError> {
    let score = state
        .library
        .score_text(&query.text)
        .map_err(|e| map_store_error(&req_id.0, &e))?;
    let cleaned_text = state.library.engine().clean_text(&query.text);
    Ok(Json(ApiResponse::new(
        SentimentData {
            text: query.text,
            cleaned_text,
            label: score.label,
            score: score.score,
            polarity: score.polarity,
        },
        req_id.0,
    )))
}

/// GET /api/v1/words/top?n&ids: most frequent words.
pub(super) async fn top_words(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<TopWordsQuery>,
) -> Result<Json<ApiResponse<Vec<WordCount>>>, ApiError> {
    let ids = query
        .ids
        .as_deref()
        .map(|raw| parse_ids(&req_id.0, raw))
        .transpose()?;
    let words = state
        .library
        .top_words(ids.as_deref(), query.n.unwrap_or(DEFAULT_TOP_WORDS))
        .map_err(|e| map_store_error(&req_id.0, &e))?;
    Ok(Json(ApiResponse::new(words, req_id.0)))
}

fn parse_ids(req_id: &str, raw: &str) -> Result<Vec<i64>, ApiError> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<i64>().map_err(|_| {
                ApiError::new(
                    req_id,
                    "invalid_argument",
                    format!("ids must be comma-separated integers, got '{s}'"),
                )
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_ids_skips_blanks() {
        assert_eq!(parse_ids("r", "1, 2,,3").unwrap(), vec![1, 2, 3]);
        assert!(parse_ids("r", "").unwrap().is_empty());
    }

    #[test]
    fn parse_ids_rejects_non_integers() {
        let err = parse_ids("r", "1,two").unwrap_err();
        assert_eq!(err.error.code, "invalid_argument");
    }
}
