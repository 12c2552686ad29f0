pub mod health;

use axum::{
    http::Uri,
    routing::{get, post},
    Router,
};

use crate::errors::AppError;
use crate::narrative::handlers;
use crate::state::AppState;

async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(format!("No route for {uri}"))
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/narrative/rank", post(handlers::handle_rank))
        .route("/api/v1/narrative/select", post(handlers::handle_select))
        .route("/api/v1/narrative/report", post(handlers::handle_report))
        .fallback(not_found)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::config::Config;

    fn app() -> Router {
        build_router(AppState {
            config: Config::default(),
        })
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let response = app()
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["status"], "ok");
    }

    #[tokio::test]
    async fn test_rank_round_trip_over_http() {
        let body = json!({
            "blocks": [
                { "title": "Leadership", "body": "", "tags": ["leadership", "management"] },
                { "title": "Analysis", "body": "", "tags": ["analysis", "metrics", "impact"] }
            ],
            "context": {
                "mask": {
                    "filters": { "include_tags": ["analysis", "metrics"], "exclude_tags": [] }
                }
            },
            "config": { "priorityKeywords": ["impact"] }
        });
        let response = app()
            .oneshot(post_json("/api/v1/narrative/rank", body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let value = json_body(response).await;
        assert_eq!(value["items"][0]["block"]["title"], "Analysis");
        assert_eq!(value["items"][0]["score"]["blockId"], "Analysis");
        assert_eq!(value["items"][0]["score"]["factors"]["hasKeywordBoost"], true);
    }

    #[tokio::test]
    async fn test_select_with_empty_pool() {
        let response = app()
            .oneshot(post_json(
                "/api/v1/narrative/select",
                json!({ "blocks": [], "topN": 5 }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["blocks"], json!([]));
    }

    #[tokio::test]
    async fn test_blank_title_is_bad_request() {
        let response = app()
            .oneshot(post_json(
                "/api/v1/narrative/report",
                json!({ "blocks": [{ "title": "", "body": "x" }] }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_unknown_route_is_not_found() {
        let response = app()
            .oneshot(Request::builder().uri("/api/v1/resumes").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
