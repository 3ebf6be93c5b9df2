// Entrant Registry - HTTP binding
// REST routes over the request handler with Axum

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use serde::Serialize;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::entrant::{EntrantId, NewEntrant};
use crate::handler::{EntrantHandler, Reply};
use crate::store::EntrantStore;

/// Shared application state
struct AppState<S: EntrantStore> {
    handler: EntrantHandler<S>,
}

impl<S: EntrantStore> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            handler: self.handler.clone(),
        }
    }
}

/// API Response wrapper used for health and error bodies
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn failure(error: &str, data: Option<T>) -> Self {
        Self {
            success: false,
            data,
            error: Some(error.to_string()),
        }
    }
}

impl IntoResponse for Reply {
    fn into_response(self) -> Response {
        match self {
            Reply::Ok(entrants) => (StatusCode::OK, Json(entrants)).into_response(),
            Reply::Found(entrant) => (StatusCode::OK, Json(entrant)).into_response(),
            Reply::Created(entrant) => {
                let location = format!("/entrant/{}", entrant.id);
                (
                    StatusCode::CREATED,
                    [(header::LOCATION, location)],
                    Json(entrant),
                )
                    .into_response()
            }
            Reply::Deleted => StatusCode::OK.into_response(),
            Reply::NotFound(id) => (
                StatusCode::NOT_FOUND,
                Json(ApiResponse::failure("not found", Some(id))),
            )
                .into_response(),
            Reply::BadRequest(field) => (
                StatusCode::BAD_REQUEST,
                Json(ApiResponse::failure("invalid argument", Some(field.as_str()))),
            )
                .into_response(),
            Reply::InternalFailure => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<()>::failure("internal failure", None)),
            )
                .into_response(),
        }
    }
}

// ============================================================================
// API Handlers
// ============================================================================

/// GET /health - Health check
async fn health_check() -> impl IntoResponse {
    Json(ApiResponse::ok("OK"))
}

/// GET /entrant - All entrants
async fn list_entrants<S: EntrantStore + 'static>(State(state): State<AppState<S>>) -> Reply {
    state.handler.list()
}

/// GET /entrant/:id - One entrant
async fn get_entrant<S: EntrantStore + 'static>(
    State(state): State<AppState<S>>,
    Path(id): Path<EntrantId>,
) -> Reply {
    state.handler.get(id)
}

/// POST /entrant - Create an entrant
///
/// An empty body or JSON `null` is an absent candidate. A body that is not a
/// candidate object is treated the same way.
async fn create_entrant<S: EntrantStore + 'static>(
    State(state): State<AppState<S>>,
    body: Bytes,
) -> Reply {
    state.handler.create(parse_candidate(&body))
}

/// DELETE /entrant/:id - Remove an entrant
async fn delete_entrant<S: EntrantStore + 'static>(
    State(state): State<AppState<S>>,
    Path(id): Path<EntrantId>,
) -> Reply {
    state.handler.delete(id)
}

fn parse_candidate(body: &[u8]) -> Option<NewEntrant> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return None;
    }

    match serde_json::from_slice::<Option<NewEntrant>>(body) {
        Ok(candidate) => candidate,
        Err(e) => {
            tracing::debug!(error = %e, "Rejected malformed entrant body");
            None
        }
    }
}

// ============================================================================
// Router
// ============================================================================

/// Build the API router around a handler
pub fn router<S: EntrantStore + 'static>(handler: EntrantHandler<S>) -> Router {
    let state = AppState { handler };

    Router::new()
        .route("/health", get(health_check))
        .route(
            "/entrant",
            get(list_entrants::<S>).post(create_entrant::<S>),
        )
        .route(
            "/entrant/:id",
            get(get_entrant::<S>).delete(delete_entrant::<S>),
        )
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entrant::Entrant;
    use crate::error::{StoreError, StoreResult};
    use crate::store::{default_seed, InMemoryEntrantStore};
    use axum::body::{to_bytes, Body};
    use axum::http::{Method, Request};
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn app() -> Router {
        let store = InMemoryEntrantStore::with_records(default_seed()).unwrap();
        router(EntrantHandler::new(Arc::new(store)))
    }

    async fn send(app: &Router, method: Method, uri: &str, body: Option<&str>) -> (StatusCode, Response) {
        let mut builder = Request::builder().method(method).uri(uri);
        if body.is_some() {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
        }
        let request = builder
            .body(body.map(|b| Body::from(b.to_string())).unwrap_or_else(Body::empty))
            .unwrap();

        let response = app.clone().oneshot(request).await.unwrap();
        (response.status(), response)
    }

    async fn json_body(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let app = app();
        let (status, response) = send(&app, Method::GET, "/health", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json_body(response).await, json!({"success": true, "data": "OK"}));
    }

    #[tokio::test]
    async fn test_list_entrants() {
        let app = app();
        let (status, response) = send(&app, Method::GET, "/entrant", None).await;

        assert_eq!(status, StatusCode::OK);
        let body = json_body(response).await;
        let mut ids: Vec<u64> = body
            .as_array()
            .unwrap()
            .iter()
            .map(|e| e["id"].as_u64().unwrap())
            .collect();
        ids.sort();
        assert_eq!(ids, vec![1, 2]);
    }

    #[tokio::test]
    async fn test_get_entrant_and_not_found() {
        let app = app();

        let (status, response) = send(&app, Method::GET, "/entrant/1", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            json_body(response).await,
            json!({"id": 1, "firstName": "First1", "lastName": "Last1"})
        );

        let (status, response) = send(&app, Method::GET, "/entrant/7", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(
            json_body(response).await,
            json!({"success": false, "data": 7, "error": "not found"})
        );
    }

    #[tokio::test]
    async fn test_get_entrant_with_non_numeric_id_is_bad_request() {
        let app = app();
        let (status, _) = send(&app, Method::GET, "/entrant/abc", None).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_create_entrant() {
        let app = app();
        let (status, response) = send(
            &app,
            Method::POST,
            "/entrant",
            Some(r#"{"firstName": "First3", "lastName": "Last3"}"#),
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(
            response.headers().get(header::LOCATION).unwrap(),
            "/entrant/3"
        );
        assert_eq!(
            json_body(response).await,
            json!({"id": 3, "firstName": "First3", "lastName": "Last3"})
        );
    }

    #[tokio::test]
    async fn test_create_entrant_bad_requests() {
        let app = app();
        let cases = [
            (Some(r#"{"firstName": " ", "lastName": "Last"}"#), "firstName"),
            (Some(r#"{"firstName": "First"}"#), "lastName"),
            (Some("null"), "entrant"),
            (Some("{not json"), "entrant"),
            (None, "entrant"),
        ];

        for (body, field) in cases {
            let (status, response) = send(&app, Method::POST, "/entrant", body).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{:?}", body);
            assert_eq!(
                json_body(response).await,
                json!({"success": false, "data": field, "error": "invalid argument"})
            );
        }

        let (_, response) = send(&app, Method::GET, "/entrant", None).await;
        assert_eq!(json_body(response).await.as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_delete_entrant() {
        let app = app();

        let (status, response) = send(&app, Method::DELETE, "/entrant/1", None).await;
        assert_eq!(status, StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(bytes.is_empty());

        let (status, response) = send(&app, Method::DELETE, "/entrant/1", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json_body(response).await["data"], json!(1));

        let (_, response) = send(
            &app,
            Method::POST,
            "/entrant",
            Some(r#"{"firstName": "First3", "lastName": "Last3"}"#),
        )
        .await;
        assert_eq!(json_body(response).await["id"], json!(3));
    }

    /// Store whose every call fails with an internal error
    struct BrokenStore;

    impl EntrantStore for BrokenStore {
        fn create(&self, _candidate: NewEntrant) -> StoreResult<Entrant> {
            Err(StoreError::internal("secret detail"))
        }
        fn get_all(&self) -> StoreResult<Vec<Entrant>> {
            Err(StoreError::internal("secret detail"))
        }
        fn get_by_id(&self, _id: EntrantId) -> StoreResult<Entrant> {
            Err(StoreError::internal("secret detail"))
        }
        fn delete(&self, _id: EntrantId) -> StoreResult<()> {
            Err(StoreError::internal("secret detail"))
        }
    }

    #[tokio::test]
    async fn test_internal_failure_body() {
        let response = Reply::InternalFailure.into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            json_body(response).await,
            json!({"success": false, "error": "internal failure"})
        );
    }

    #[tokio::test]
    async fn test_store_failure_detail_is_not_sent_to_client() {
        let app = router(EntrantHandler::new(Arc::new(BrokenStore)));
        let requests = [
            (Method::GET, "/entrant", None),
            (Method::GET, "/entrant/1", None),
            (Method::DELETE, "/entrant/1", None),
            (
                Method::POST,
                "/entrant",
                Some(r#"{"firstName": "First", "lastName": "Last"}"#),
            ),
        ];

        for (method, uri, body) in requests {
            let (status, response) = send(&app, method.clone(), uri, body).await;
            assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR, "{} {}", method, uri);

            let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
            let text = String::from_utf8(bytes.to_vec()).unwrap();
            assert!(!text.contains("secret detail"), "{} {} leaked: {}", method, uri, text);
            assert_eq!(
                serde_json::from_str::<Value>(&text).unwrap(),
                json!({"success": false, "error": "internal failure"})
            );
        }
    }

    #[test]
    fn test_parse_candidate() {
        assert_eq!(parse_candidate(b""), None);
        assert_eq!(parse_candidate(b"  \n"), None);
        assert_eq!(parse_candidate(b"null"), None);
        assert_eq!(parse_candidate(b"[1, 2]"), None);
        assert_eq!(
            parse_candidate(br#"{"firstName": "a", "lastName": "b"}"#),
            Some(NewEntrant::new("a", "b"))
        );
    }
}
