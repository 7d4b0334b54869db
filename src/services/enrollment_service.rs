use std::sync::Arc;

use tracing::{info, warn};

use crate::db::EnrollmentStore;
use crate::error::AppError;
use crate::models::{Enrollment, EnrollmentRequest};

/// Upper bound on rows returned by [`EnrollmentService::list`].
pub const LIST_LIMIT: i64 = 100;

#[derive(Clone)]
pub struct EnrollmentService {
    store: Option<Arc<dyn EnrollmentStore>>,
}

impl EnrollmentService {
    pub fn new(store: Arc<dyn EnrollmentStore>) -> Self {
        Self { store: Some(store) }
    }

    /// A service with no database endpoint. Every storage call fails with
    /// [`AppError::Configuration`].
    pub fn unconfigured() -> Self {
        Self { store: None }
    }

    fn store(&self) -> Result<&dyn EnrollmentStore, AppError> {
        self.store.as_deref().ok_or(AppError::Configuration)
    }

    /// Validates a raw body and upserts it. Input is checked before the
    /// store is looked at, so bad input never reaches storage.
    pub async fn submit(&self, body: Option<&str>) -> Result<Enrollment, AppError> {
        let req = EnrollmentRequest::parse(body).map_err(|violations| {
            warn!("rejected enrollment with {} violation(s)", violations.len());
            AppError::Validation(violations)
        })?;

        let enrollment = self.store()?.upsert(&req).await?;
        info!(
            id = enrollment.id,
            course_id = enrollment.course_id,
            status = ?enrollment.status,
            "enrollment stored"
        );
        Ok(enrollment)
    }

    pub async fn list(&self) -> Result<Vec<Enrollment>, AppError> {
        let enrollments = self.store()?.recent(LIST_LIMIT).await?;
        Ok(enrollments)
    }

    pub async fn health(&self) -> Result<(), AppError> {
        self.store()?.ping().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unconfigured_list_is_configuration_error() {
        let service = EnrollmentService::unconfigured();
        let err = service.list().await.unwrap_err();
        assert!(matches!(err, AppError::Configuration));
    }

    #[tokio::test]
    async fn test_invalid_input_wins_over_missing_configuration() {
        let service = EnrollmentService::unconfigured();
        let err = service.submit(Some("{}")).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_valid_input_without_database_is_configuration_error() {
        let service = EnrollmentService::unconfigured();
        let body = r#"{"student_name":"Ann Lee","student_email":"ann@example.com","course_id":7,"course_title":"Intro to Systems"}"#;
        let err = service.submit(Some(body)).await.unwrap_err();
        assert!(matches!(err, AppError::Configuration));
    }
}
