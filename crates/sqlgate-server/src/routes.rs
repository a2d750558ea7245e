//! HTTP surface: a thin wrapper over the validation pipeline
//!
//! `POST /validate {query}` returns `200 {valid, message, results}` when
//! the query passes every layer and `400 {valid, results}` with the
//! partial check trail when any layer rejects. A rejection is a normal
//! outcome, not a server error.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, error};

use sqlgate_core::Validator;

#[derive(Clone)]
pub struct AppState {
    pub validator: Arc<Validator>,
}

#[derive(Debug, Deserialize)]
pub struct ValidateRequest {
    pub query: String,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/validate", post(validate))
        .route("/health", get(health))
        .with_state(state)
}

async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

async fn validate(
    State(state): State<AppState>,
    Json(request): Json<ValidateRequest>,
) -> Response {
    let validator = state.validator.clone();

    // The syntax layer blocks on a database round trip; keep it off the
    // async workers.
    let outcome =
        tokio::task::spawn_blocking(move || validator.validate(&request.query)).await;

    match outcome {
        Ok(outcome) if outcome.valid => (
            StatusCode::OK,
            Json(json!({
                "valid": true,
                "message": "Query is valid",
                "results": outcome.results,
            })),
        )
            .into_response(),
        Ok(outcome) => {
            debug!(trail_len = outcome.results.len(), "query rejected");
            (
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "valid": false,
                    "results": outcome.results,
                })),
            )
                .into_response()
        }
        Err(e) => {
            error!(error = %e, "validation task failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "validation task failed" })),
            )
                .into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use sqlgate_core::{Catalog, CatalogDefinition};
    use tower::ServiceExt;

    fn test_router() -> Router {
        let definition: CatalogDefinition = serde_json::from_str(
            r#"{ "tables": { "Student": ["name", "year", "semester"] } }"#,
        )
        .unwrap();
        let validator = Validator::from_catalog(Catalog::from_definition(definition).unwrap());
        router(AppState {
            validator: Arc::new(validator),
        })
    }

    async fn post_validate(query: &str) -> (StatusCode, serde_json::Value) {
        let response = test_router()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/validate")
                    .header("content-type", "application/json")
                    .body(Body::from(json!({ "query": query }).to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn valid_query_returns_200_with_full_trail() {
        let (status, body) = post_validate("SELECT name FROM Student WHERE year = 1").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["valid"], true);
        assert_eq!(body["message"], "Query is valid");
        assert_eq!(body["results"].as_array().unwrap().len(), 4);
    }

    #[tokio::test]
    async fn rejected_query_returns_400_with_partial_trail() {
        let (status, body) = post_validate("SELECT * FROM Nonexistent").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["valid"], false);
        let results = body["results"].as_array().unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[1]["check"], "Semantics");
        assert_eq!(results[1]["valid"], false);
    }

    #[tokio::test]
    async fn health_endpoint_responds() {
        let response = test_router()
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
