//! Account HTTP Routes
//!
//! Every response body is the envelope wire shape:
//! 200 for `Success`, 422 for `Error`, 500 for `Failure`.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, patch, post},
    Json, Router,
};
use serde::Serialize;
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::account::{
    AccountService, AccountView, Argon2Hasher, FeedbackReceipt, InMemoryAccountRepository,
    ServiceConfig,
};
use crate::envelope::{ResponseEnvelope, Status};

/// Service type served over HTTP
pub type HttpAccountService = AccountService<InMemoryAccountRepository, Argon2Hasher>;

/// Shared route state
pub struct AccountState {
    pub service: HttpAccountService,
}

impl AccountState {
    pub fn new(service: HttpAccountService) -> Self {
        Self { service }
    }

    /// In-memory store, default Argon2id cost
    pub fn in_memory(config: ServiceConfig) -> Self {
        Self::new(AccountService::new(
            Arc::new(InMemoryAccountRepository::new()),
            Arc::new(Argon2Hasher::new()),
            config,
        ))
    }
}

/// Account routes with shared state
pub fn account_routes(state: Arc<AccountState>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/accounts", post(register_handler))
        .route("/accounts/:id/attributes/:name", patch(update_attribute_handler))
        .route("/sessions", post(login_handler))
        .route("/feedback", post(feedback_handler))
        .with_state(state)
}

type EnvelopeResponse<T> = (StatusCode, Json<ResponseEnvelope<T>>);

/// HTTP status for an envelope
pub fn status_code(status: Status) -> StatusCode {
    match status {
        Status::Success => StatusCode::OK,
        Status::Error => StatusCode::UNPROCESSABLE_ENTITY,
        Status::Failure => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn respond<T: Serialize>(envelope: ResponseEnvelope<T>) -> EnvelopeResponse<T> {
    (status_code(envelope.status()), Json(envelope))
}

/// Parse a JSON object body; a malformed body is answered with a 400 `Failure`
fn parse_object<T>(body: &Bytes) -> Result<Map<String, Value>, EnvelopeResponse<T>> {
    serde_json::from_slice::<Map<String, Value>>(body).map_err(|e| {
        (
            StatusCode::BAD_REQUEST,
            Json(ResponseEnvelope::failure(format!("Malformed request body: {}", e))),
        )
    })
}

// ==================
// Handlers
// ==================

async fn health_handler() -> EnvelopeResponse<()> {
    respond(ResponseEnvelope::success("ok", ()))
}

async fn register_handler(
    State(state): State<Arc<AccountState>>,
    body: Bytes,
) -> EnvelopeResponse<AccountView> {
    match parse_object(&body) {
        Ok(payload) => respond(state.service.register(&payload)),
        Err(response) => response,
    }
}

async fn login_handler(
    State(state): State<Arc<AccountState>>,
    body: Bytes,
) -> EnvelopeResponse<AccountView> {
    match parse_object(&body) {
        Ok(payload) => respond(state.service.login(&payload)),
        Err(response) => response,
    }
}

async fn feedback_handler(
    State(state): State<Arc<AccountState>>,
    body: Bytes,
) -> EnvelopeResponse<FeedbackReceipt> {
    match parse_object(&body) {
        Ok(payload) => respond(state.service.submit_feedback(&payload)),
        Err(response) => response,
    }
}

/// Body: `{"value": <any>}`; a missing `value` is `null`
async fn update_attribute_handler(
    State(state): State<Arc<AccountState>>,
    Path((id, name)): Path<(String, String)>,
    body: Bytes,
) -> EnvelopeResponse<()> {
    let mut payload = match parse_object(&body) {
        Ok(payload) => payload,
        Err(response) => return response,
    };

    let Ok(id) = Uuid::parse_str(&id) else {
        return respond(ResponseEnvelope::failure(format!("Invalid account id '{}'", id)));
    };

    let value = payload.remove("value").unwrap_or(Value::Null);
    respond(state.service.update_attribute(id, &name, value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Method, Request};
    use serde_json::json;
    use tower::ServiceExt;

    fn router() -> Router {
        let service = AccountService::new(
            Arc::new(InMemoryAccountRepository::new()),
            Arc::new(Argon2Hasher::with_cost(1024, 1, 1).unwrap()),
            ServiceConfig::default(),
        );
        account_routes(Arc::new(AccountState::new(service)))
    }

    async fn call(router: Router, method: Method, uri: &str, body: &str) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let response = router.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = call(router(), Method::GET, "/health", "").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "Success");
    }

    #[tokio::test]
    async fn test_feedback_error_is_422_with_field_errors() {
        let (status, body) = call(
            router(),
            Method::POST,
            "/feedback",
            r#"{"name":"","email":"bad","message":"hi"}"#,
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["status"], "Error");
        assert!(body["errors"].get("name").is_some());
        assert!(body["errors"].get("email").is_some());
        assert!(body["errors"].get("message").is_none());
        assert_eq!(body["data"], Value::Null);
    }

    #[tokio::test]
    async fn test_malformed_body_is_failure() {
        let (status, body) = call(router(), Method::POST, "/accounts", "{not json").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["status"], "Failure");
        assert!(body["errors"].get("system").is_some());
    }

    #[tokio::test]
    async fn test_register_then_update_attribute() {
        let router = router();
        let (status, body) = call(
            router.clone(),
            Method::POST,
            "/accounts",
            &json!({
                "handle": "alice",
                "name": "Alice",
                "email": "alice@example.com",
                "password": "password123"
            })
            .to_string(),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let id = body["data"]["id"].as_str().unwrap().to_string();

        let uri = format!("/accounts/{}/attributes/name", id);
        let (status, body) = call(router.clone(), Method::PATCH, &uri, r#"{"value":"Alice B"}"#).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["errors"], json!({}));

        let uri = format!("/accounts/{}/attributes/id", id);
        let (status, body) = call(router, Method::PATCH, &uri, r#"{"value":"other"}"#).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["status"], "Failure");
    }

    #[tokio::test]
    async fn test_invalid_account_id_is_failure() {
        let (status, body) = call(
            router(),
            Method::PATCH,
            "/accounts/not-a-uuid/attributes/name",
            r#"{"value":"x"}"#,
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["status"], "Failure");
    }
}
