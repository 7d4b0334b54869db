use sqlx::SqliteConnection;

use crate::models::enrollment::enrollment_timestamp;
use crate::models::{Enrollment, EnrollmentRequest};

/// Inserts a pending enrollment, or refreshes the existing row for the same
/// (student_email, course_id). On conflict only student_name, phone and
/// enrolled_at change; course_title and status keep their stored values.
pub async fn upsert_enrollment(
    conn: &mut SqliteConnection,
    req: &EnrollmentRequest,
) -> Result<Enrollment, sqlx::Error> {
    let now = enrollment_timestamp();

    sqlx::query_as::<_, Enrollment>(
        r#"
        INSERT INTO course_enrollments
            (student_name, student_email, phone, course_id, course_title, status, enrolled_at)
        VALUES (?1, ?2, ?3, ?4, ?5, 'pending', ?6)
        ON CONFLICT (student_email, course_id)
        DO UPDATE SET
            student_name = excluded.student_name,
            phone = excluded.phone,
            enrolled_at = excluded.enrolled_at
        RETURNING id, student_name, student_email, phone, course_id, course_title,
            status, enrolled_at
        "#,
    )
    .bind(&req.student_name)
    .bind(&req.student_email)
    .bind(&req.phone)
    .bind(req.course_id)
    .bind(&req.course_title)
    .bind(now)
    .fetch_one(conn)
    .await
}

pub async fn fetch_recent_enrollments(
    conn: &mut SqliteConnection,
    limit: i64,
) -> Result<Vec<Enrollment>, sqlx::Error> {
    sqlx::query_as::<_, Enrollment>(
        r#"
        SELECT id, student_name, student_email, phone, course_id, course_title,
            status, enrolled_at
        FROM course_enrollments
        ORDER BY enrolled_at DESC, id DESC
        LIMIT ?1
        "#,
    )
    .bind(limit)
    .fetch_all(conn)
    .await
}
