//! Record CRUD and lookup handlers under `/api/v1/entries`.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tweetlens_core::Record;

use crate::middleware::RequestId;

use super::{map_store_error, ApiError, ApiResponse, AppState};

// ---------------------------------------------------------------------------
// Request bodies and queries
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub(super) struct CreateEntryRequest {
    pub text: String,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub(super) struct UpdateEntryRequest {
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct RangeQuery {
    pub start_id: i64,
    pub end_id: i64,
}

#[derive(Debug, Deserialize)]
pub(super) struct DateFilterQuery {
    pub start_date: String,
    pub end_date: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct SearchQuery {
    pub keyword: String,
}

type EntryResult = Result<Json<ApiResponse<Record>>, ApiError>;
type EntriesResult = Result<Json<ApiResponse<Vec<Record>>>, ApiError>;

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/entries: every record in id order.
pub(super) async fn list_entries(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Json<ApiResponse<Vec<Record>>> {
    Json(ApiResponse::new(state.library.all(), req_id.0))
}

/// POST /api/v1/entries: store, score and index a new record.
pub(super) async fn create_entry(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<CreateEntryRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Record>>), ApiError> {
    let record = state
        .library
        .add(&body.text, body.created_at)
        .map_err(|e| map_store_error(&req_id.0, &e))?;
    Ok((StatusCode::CREATED, Json(ApiResponse::new(record, req_id.0))))
}

/// GET /api/v1/entries/random
pub(super) async fn random_entry(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> EntryResult {
    let record = state
        .library
        .random()
        .ok_or_else(|| ApiError::new(&req_id.0, "not_found", "no entries found"))?;
    Ok(Json(ApiResponse::new(record, req_id.0)))
}

/// GET /api/v1/entries/range?start_id&end_id: inclusive id range.
pub(super) async fn entries_in_range(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<RangeQuery>,
) -> EntriesResult {
    let records = state
        .library
        .range(query.start_id, query.end_id)
        .map_err(|e| map_store_error(&req_id.0, &e))?;
    Ok(Json(ApiResponse::new(records, req_id.0)))
}

/// GET /api/v1/entries/filter?start_date&end_date: `YYYYMMDD`, inclusive.
pub(super) async fn entries_by_date(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<DateFilterQuery>,
) -> EntriesResult {
    let records = state
        .library
        .filter_dates(&query.start_date, &query.end_date)
        .map_err(|e| map_store_error(&req_id.0, &e))?;
    Ok(Json(ApiResponse::new(records, req_id.0)))
}

/// GET /api/v1/entries/search?keyword
pub(super) async fn search_entries(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<SearchQuery>,
) -> EntriesResult {
    let records = state
        .library
        .search(&query.keyword)
        .map_err(|e| map_store_error(&req_id.0, &e))?;
    Ok(Json(ApiResponse::new(records, req_id.0)))
}

/// GET /api/v1/entries/:id
pub(super) async fn get_entry(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<i64>,
) -> EntryResult {
    let record = state.library.get(id).ok_or_else(|| {
        ApiError::new(&req_id.0, "not_found", format!("record {id} not found"))
    })?;
    Ok(Json(ApiResponse::new(record, req_id.0)))
}

/// PUT /api/v1/entries/:id: replace the text, then rescore and reindex.
pub(super) async fn update_entry(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<i64>,
    Json(body): Json<UpdateEntryRequest>,
) -> EntryResult {
    let record = state
        .library
        .update_text(id, &body.text)
        .map_err(|e| map_store_error(&req_id.0, &e))?;
    Ok(Json(ApiResponse::new(record, req_id.0)))
}

/// DELETE /api/v1/entries/:id: returns the deleted record.
pub(super) async fn delete_entry(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<i64>,
) -> EntryResult {
    let record = state
        .library
        .delete(id)
        .map_err(|e| map_store_error(&req_id.0, &e))?;
    Ok(Json(ApiResponse::new(record, req_id.0)))
}
