//! Body and query extractors that reject with the JSON error envelope.
//!
//! axum's own `Json` and `Query` reject with plain-text bodies; these wrap
//! them and convert the rejection into `AppError` ("Invalid JSON" and
//! "Invalid query parameters", both 400).

use axum::Json;
use axum::extract::{FromRequest, FromRequestParts, Query};

use crate::error::AppError;

/// JSON request body.
#[derive(Debug, FromRequest)]
#[from_request(via(Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

/// Query string.
#[derive(Debug, FromRequestParts)]
#[from_request(via(Query), rejection(AppError))]
pub struct ApiQuery<T>(pub T);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header::CONTENT_TYPE};
    use axum::Router;
    use axum::routing::{get, post};
    use serde::Deserialize;
    use tower::ServiceExt;

    use backlink_vista_core::api::ErrorBody;

    use super::*;

    #[derive(Debug, Deserialize)]
    struct Amount {
        amount: u32,
    }

    fn app() -> Router {
        Router::new()
            .route(
                "/body",
                post(|ApiJson(body): ApiJson<Amount>| async move { body.amount.to_string() }),
            )
            .route(
                "/query",
                get(|ApiQuery(query): ApiQuery<Amount>| async move { query.amount.to_string() }),
            )
    }

    async fn error_body(response: axum::response::Response) -> ErrorBody {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_malformed_json_is_envelope() {
        let response = app()
            .oneshot(
                Request::post("/body")
                    .header(CONTENT_TYPE, "application/json")
                    .body(Body::from("{\"amount\":"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(error_body(response).await.message, "Invalid JSON");
    }

    #[tokio::test]
    async fn test_bad_query_is_envelope() {
        let response = app()
            .oneshot(Request::get("/query?amount=lots").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(error_body(response).await.message, "Invalid query parameters");
    }

    #[tokio::test]
    async fn test_valid_input_passes_through() {
        let response = app()
            .oneshot(Request::get("/query?amount=7").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
