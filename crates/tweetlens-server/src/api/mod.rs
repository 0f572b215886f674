mod analysis;
mod entries;

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::get,
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tweetlens_analytics::AnalyticsError;
use tweetlens_store::{StoreError, TweetLibrary};

use crate::middleware::{enforce_rate_limit, request_id, RateLimitState, RequestId};

#[derive(Clone)]
pub struct AppState {
    pub library: Arc<TweetLibrary>,
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: ErrorBody,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
    records: usize,
    indexed: usize,
}

impl ResponseMeta {
    pub(super) fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
        }
    }
}

impl<T: Serialize> ApiResponse<T> {
    pub(super) fn new(data: T, request_id: String) -> Self {
        Self {
            data,
            meta: ResponseMeta::new(request_id),
        }
    }
}

impl ApiError {
    pub fn new(
        request_id: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            error: ErrorBody {
                code: code.into(),
                message: message.into(),
            },
            meta: ResponseMeta::new(request_id.into()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.error.code.as_str() {
            "not_found" => StatusCode::NOT_FOUND,
            "invalid_input" | "invalid_argument" => StatusCode::BAD_REQUEST,
            "rate_limited" => StatusCode::TOO_MANY_REQUESTS,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

pub(super) fn map_store_error(request_id: &str, error: &StoreError) -> ApiError {
    match error {
        StoreError::NotFound(_) | StoreError::Analytics(AnalyticsError::NotFound(_)) => {
            ApiError::new(request_id, "not_found", error.to_string())
        }
        StoreError::Analytics(AnalyticsError::InvalidInput(_)) => {
            ApiError::new(request_id, "invalid_input", error.to_string())
        }
        StoreError::InvalidDate { .. }
        | StoreError::InvalidQuery(_)
        | StoreError::Analytics(AnalyticsError::InvalidArgument(_)) => {
            ApiError::new(request_id, "invalid_argument", error.to_string())
        }
        StoreError::Config(_) => {
            tracing::error!(error = %error, "unexpected store failure");
            ApiError::new(request_id, "internal_error", "internal error")
        }
    }
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([
            header::CONTENT_TYPE,
            HeaderName::from_static("x-request-id"),
        ])
}

fn limited_router(rate_limit: RateLimitState) -> Router<AppState> {
    Router::new()
        .route(
            "/api/v1/entries",
            get(entries::list_entries).post(entries::create_entry),
        )
        .route("/api/v1/entries/random", get(entries::random_entry))
        .route("/api/v1/entries/range", get(entries::entries_in_range))
        .route("/api/v1/entries/filter", get(entries::entries_by_date))
        .route("/api/v1/entries/search", get(entries::search_entries))
        .route(
            "/api/v1/entries/{id}",
            get(entries::get_entry)
                .put(entries::update_entry)
                .delete(entries::delete_entry),
        )
        .route("/api/v1/entries/{id}/similar", get(analysis::similar_entries))
        .route("/api/v1/sentiment", get(analysis::score_text))
        .route("/api/v1/words/top", get(analysis::top_words))
        .layer(axum::middleware::from_fn_with_state(
            rate_limit,
            enforce_rate_limit,
        ))
}

pub fn build_app(state: AppState, rate_limit: RateLimitState) -> Router {
    let public_routes = Router::new().route("/api/v1/health", get(health));

    Router::new()
        .merge(public_routes)
        .merge(limited_router(rate_limit))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn health(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> impl IntoResponse {
    Json(ApiResponse::new(
        HealthData {
            status: "ok",
            records: state.library.len(),
            indexed: state.library.index_len(),
        },
        req_id.0,
    ))
}

#[cfg(test)]
mod tests {
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use chrono::TimeZone;
    use serde_json::{json, Value};
    use tower::ServiceExt;
    use tweetlens_analytics::AnalyticsConfig;
    use tweetlens_core::RawTweet;

    use super::*;

    fn tweet(text: &str, day: u32) -> RawTweet {
        RawTweet {
            text: text.to_string(),
            created_at: Utc.with_ymd_and_hms(2018, 1, day, 12, 0, 0).unwrap(),
        }
    }

    fn test_app() -> Router {
        let tweets = [
            tweet("cats are great", 3),
            tweet("cats are wonderful", 1),
            tweet("stock market crash, I hate this", 2),
        ];
        let library = TweetLibrary::from_tweets(&AnalyticsConfig::default(), &tweets, None)
            .expect("library");
        build_app(
            AppState {
                library: Arc::new(library),
            },
            RateLimitState::per_minute(1_000),
        )
    }

    async fn send(app: Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("request");
        let response = app.oneshot(request).await.expect("response");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, json)
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
        send(app, Method::GET, uri, None).await
    }

    #[test]
    fn api_error_codes_map_to_statuses() {
        for (code, status) in [
            ("not_found", StatusCode::NOT_FOUND),
            ("invalid_input", StatusCode::BAD_REQUEST),
            ("invalid_argument", StatusCode::BAD_REQUEST),
            ("rate_limited", StatusCode::TOO_MANY_REQUESTS),
            ("internal_error", StatusCode::INTERNAL_SERVER_ERROR),
        ] {
            assert_eq!(ApiError::new("req-1", code, "msg").into_response().status(), status);
        }
    }

    #[tokio::test]
    async fn health_reports_counts() {
        let (status, json) = get_json(test_app(), "/api/v1/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["status"], "ok");
        assert_eq!(json["data"]["records"], 3);
        assert_eq!(json["data"]["indexed"], 3);
        assert!(json["meta"]["request_id"].is_string());
    }

    #[tokio::test]
    async fn list_entries_returns_every_record() {
        let (status, json) = get_json(test_app(), "/api/v1/entries").await;
        assert_eq!(status, StatusCode::OK);
        let data = json["data"].as_array().expect("data array");
        assert_eq!(data.len(), 3);
        assert_eq!(data[0]["sentiment_label"], "positive");
    }

    #[tokio::test]
    async fn get_unknown_entry_is_404() {
        let (status, json) = get_json(test_app(), "/api/v1/entries/99").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error"]["code"], "not_found");
    }

    #[tokio::test]
    async fn create_then_fetch_entry() {
        let app = test_app();
        let (status, json) = send(
            app.clone(),
            Method::POST,
            "/api/v1/entries",
            Some(json!({ "text": "RT @fan: I love this band!" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(json["data"]["id"], 4);
        assert_eq!(json["data"]["cleaned_text"], "I love this band!");
        assert_eq!(json["data"]["sentiment_label"], "positive");

        let (status, json) = get_json(app, "/api/v1/entries/4").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["text"], "RT @fan: I love this band!");
    }

    #[tokio::test]
    async fn create_blank_entry_is_400() {
        let (status, json) = send(
            test_app(),
            Method::POST,
            "/api/v1/entries",
            Some(json!({ "text": "   " })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"]["code"], "invalid_input");
    }

    #[tokio::test]
    async fn update_rescores_entry() {
        let app = test_app();
        let (status, json) = send(
            app,
            Method::PUT,
            "/api/v1/entries/1",
            Some(json!({ "text": "cats are terrible" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["sentiment_label"], "negative");
        assert_eq!(json["data"]["created_at"], "2018-01-03T12:00:00Z");
    }

    #[tokio::test]
    async fn delete_removes_entry_and_neighbour() {
        let app = test_app();
        let (status, _) = send(app.clone(), Method::DELETE, "/api/v1/entries/2", None).await;
        assert_eq!(status, StatusCode::OK);
        let (status, _) = get_json(app.clone(), "/api/v1/entries/2").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (_, json) = get_json(app, "/api/v1/entries/1/similar?n=5").await;
        let ids: Vec<i64> = json["data"]
            .as_array()
            .expect("data array")
            .iter()
            .map(|h| h["id"].as_i64().unwrap())
            .collect();
        assert_eq!(ids, vec![3]);
    }

    #[tokio::test]
    async fn similar_entries_rank_closest_first() {
        let (status, json) = get_json(test_app(), "/api/v1/entries/1/similar?n=1").await;
        assert_eq!(status, StatusCode::OK);
        let data = json["data"].as_array().expect("data array");
        assert_eq!(data.len(), 1);
        assert_eq!(data[0]["id"], 2);
        assert_eq!(data[0]["text"], "cats are wonderful");
    }

    #[tokio::test]
    async fn similar_with_zero_n_is_400() {
        let (status, json) = get_json(test_app(), "/api/v1/entries/1/similar?n=0").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"]["code"], "invalid_argument");
    }

    #[tokio::test]
    async fn similar_for_unknown_entry_is_404() {
        let (status, _) = get_json(test_app(), "/api/v1/entries/42/similar").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn range_is_inclusive() {
        let (status, json) = get_json(test_app(), "/api/v1/entries/range?start_id=2&end_id=3").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"].as_array().map(Vec::len), Some(2));
    }

    #[tokio::test]
    async fn date_filter_sorts_by_date() {
        let (status, json) = get_json(
            test_app(),
            "/api/v1/entries/filter?start_date=20180101&end_date=20180102",
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let ids: Vec<i64> = json["data"]
            .as_array()
            .expect("data array")
            .iter()
            .map(|r| r["id"].as_i64().unwrap())
            .collect();
        assert_eq!(ids, vec![2, 3]);
    }

    #[tokio::test]
    async fn malformed_date_is_400() {
        let (status, json) = get_json(
            test_app(),
            "/api/v1/entries/filter?start_date=2018-01-01&end_date=20180102",
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"]["code"], "invalid_argument");
    }

    #[tokio::test]
    async fn search_is_case_insensitive() {
        let (status, json) = get_json(test_app(), "/api/v1/entries/search?keyword=CATS").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"].as_array().map(Vec::len), Some(2));
    }

    #[tokio::test]
    async fn sentiment_scores_ad_hoc_text() {
        let (status, json) = get_json(test_app(), "/api/v1/sentiment?text=I%20love%20this%21").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["label"], "positive");
        assert_eq!(json["data"]["text"], "I love this!");
        assert!(json["data"]["score"].as_f64().unwrap() > 0.05);
    }

    #[tokio::test]
    async fn sentiment_of_empty_text_is_400() {
        let (status, json) = get_json(test_app(), "/api/v1/sentiment?text=").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"]["code"], "invalid_input");
    }

    #[tokio::test]
    async fn top_words_over_all_and_subset() {
        let app = test_app();
        let (status, json) = get_json(app.clone(), "/api/v1/words/top?n=1").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"][0]["word"], "cats");
        assert_eq!(json["data"][0]["count"], 2);

        let (status, json) = get_json(app.clone(), "/api/v1/words/top?n=10&ids=3").await;
        assert_eq!(status, StatusCode::OK);
        let words: Vec<&str> = json["data"]
            .as_array()
            .expect("data array")
            .iter()
            .map(|w| w["word"].as_str().unwrap())
            .collect();
        assert_eq!(words, vec!["stock", "market", "crash", "hate"]);

        let (status, _) = get_json(app, "/api/v1/words/top?ids=1,x").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn random_entry_on_empty_library_is_404() {
        let library = TweetLibrary::from_tweets(&AnalyticsConfig::default(), &[], None)
            .expect("library");
        let app = build_app(
            AppState {
                library: Arc::new(library),
            },
            RateLimitState::per_minute(10),
        );
        let (status, _) = get_json(app, "/api/v1/entries/random").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn rate_limit_spares_health() {
        let library = TweetLibrary::from_tweets(&AnalyticsConfig::default(), &[], None)
            .expect("library");
        let app = build_app(
            AppState {
                library: Arc::new(library),
            },
            RateLimitState::per_minute(1),
        );
        let (first, _) = get_json(app.clone(), "/api/v1/entries").await;
        assert_eq!(first, StatusCode::OK);
        let (second, json) = get_json(app.clone(), "/api/v1/entries").await;
        assert_eq!(second, StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(json["error"]["code"], "rate_limited");
        let (health, _) = get_json(app, "/api/v1/health").await;
        assert_eq!(health, StatusCode::OK);
    }
}
