use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum EnrollmentStatus {
    Pending,
    Confirmed,
    Cancelled,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Enrollment {
    pub id: i64,
    pub student_name: String,
    pub student_email: String,
    pub phone: Option<String>,
    pub course_id: i64,
    pub course_title: String,
    pub status: EnrollmentStatus,
    pub enrolled_at: String,
}

/// Current time as fixed-width RFC 3339 text, so that `enrolled_at`
/// orders correctly as a plain string column.
pub fn enrollment_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timestamp_is_fixed_width() {
        let ts = enrollment_timestamp();
        // 2026-01-10T12:34:56.123456Z
        assert_eq!(ts.len(), 27);
        assert!(ts.ends_with('Z'));
    }

    #[test]
    fn test_status_serializes_lowercase() {
        let json = serde_json::to_string(&EnrollmentStatus::Pending).unwrap();
        assert_eq!(json, "\"pending\"");
    }
}
