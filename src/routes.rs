use std::collections::BTreeMap;

use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::extract::rejection::BytesRejection;
use axum::http::{HeaderMap, Method, StatusCode};
use axum::routing::{any, get};
use serde_json::json;
use tracing::warn;

use crate::envelope::{ApiRequest, ApiResponse};
use crate::error::AppError;
use crate::models::FieldViolation;
use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/enroll", any(enroll))
        .with_state(state)
}

async fn health(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    state.handler.service().health().await?;
    Ok(StatusCode::OK)
}

/// Wraps the HTTP request in an envelope and hands it to the handler.
/// Bodies that never make it into an envelope still get a JSON reply with
/// the CORS header.
async fn enroll(
    State(state): State<AppState>,
    method: Method,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> ApiResponse {
    let bytes = match body {
        Ok(bytes) => bytes,
        Err(rejection) => {
            warn!("unreadable request body: {}", rejection.body_text());
            return ApiResponse::json(
                rejection.status(),
                &json!({ "error": rejection.body_text() }),
            );
        }
    };

    let body = match String::from_utf8(bytes.to_vec()) {
        Ok(body) => (!body.is_empty()).then_some(body),
        Err(_) if method == Method::POST => {
            return AppError::Validation(vec![FieldViolation::invalid_body(
                "Invalid JSON: body is not valid UTF-8",
            )])
            .into_api_response();
        }
        // only POST reads the body
        Err(_) => None,
    };

    let mut req = ApiRequest::new(method.as_str(), body);

    req.headers = headers
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|v| (name.as_str().to_string(), v.to_string()))
        })
        .collect::<BTreeMap<_, _>>();

    if let Some(request_id) = req.headers.get("x-request-id").cloned() {
        req = req.with_request_id(request_id);
    }

    state.handler.handle(req).await
}
