use axum::http::StatusCode;
use serde_json::json;
use tracing::{Instrument, info_span, warn};
use uuid::Uuid;

use crate::envelope::{ApiRequest, ApiResponse};
use crate::services::EnrollmentService;

/// Dispatches one invocation envelope to the enrollment service.
#[derive(Clone)]
pub struct EnrollmentHandler {
    service: EnrollmentService,
}

impl EnrollmentHandler {
    pub fn new(service: EnrollmentService) -> Self {
        Self { service }
    }

    pub fn service(&self) -> &EnrollmentService {
        &self.service
    }

    pub async fn handle(&self, req: ApiRequest) -> ApiResponse {
        let method = req.http_method.clone();
        let request_id = req
            .request_context
            .request_id
            .clone()
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        let span = info_span!("enrollment_request", method = %method, request_id = %request_id);
        self.dispatch(&method, req).instrument(span).await
    }

    async fn dispatch(&self, method: &str, req: ApiRequest) -> ApiResponse {
        match method {
            "OPTIONS" => ApiResponse::preflight(),
            "POST" => match self.service.submit(req.body.as_deref()).await {
                Ok(enrollment) => ApiResponse::json(
                    StatusCode::OK,
                    &json!({
                        "success": true,
                        "message": "Successfully enrolled in course",
                        "enrollment": enrollment,
                    }),
                ),
                Err(e) => e.into_api_response(),
            },
            "GET" => match self.service.list().await {
                Ok(enrollments) => ApiResponse::json(
                    StatusCode::OK,
                    &json!({ "success": true, "enrollments": enrollments }),
                ),
                Err(e) => e.into_api_response(),
            },
            other => {
                warn!("method not allowed: {}", other);
                ApiResponse::json(
                    StatusCode::METHOD_NOT_ALLOWED,
                    &json!({ "error": "Method not allowed" }),
                )
            }
        }
    }
}
