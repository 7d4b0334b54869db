pub mod repository;

use std::str::FromStr;

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::SqlitePool;
use sqlx::migrate::MigrateError;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tracing::error;

use crate::models::{Enrollment, EnrollmentRequest};

/// Storage behind the enrollment service.
#[async_trait]
pub trait EnrollmentStore: Send + Sync {
    async fn upsert(&self, req: &EnrollmentRequest) -> Result<Enrollment, sqlx::Error>;
    async fn recent(&self, limit: i64) -> Result<Vec<Enrollment>, sqlx::Error>;
    async fn ping(&self) -> Result<(), sqlx::Error>;
}

/// Every call checks one connection out of the pool; it goes back to the
/// pool when the guard drops, whichever way the call returns.
#[derive(Clone)]
pub struct SqliteEnrollmentStore {
    pool: SqlitePool,
}

impl SqliteEnrollmentStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EnrollmentStore for SqliteEnrollmentStore {
    async fn upsert(&self, req: &EnrollmentRequest) -> Result<Enrollment, sqlx::Error> {
        let mut conn = self.pool.acquire().await?;
        repository::upsert_enrollment(&mut *conn, req).await
    }

    async fn recent(&self, limit: i64) -> Result<Vec<Enrollment>, sqlx::Error> {
        let mut conn = self.pool.acquire().await?;
        repository::fetch_recent_enrollments(&mut *conn, limit).await
    }

    async fn ping(&self) -> Result<(), sqlx::Error> {
        let mut conn = self.pool.acquire().await?;
        sqlx::query("select 1").execute(&mut *conn).await?;
        Ok(())
    }
}

/// Stands in for storage whose URL could not be turned into a pool, so the
/// failure is reported on each call rather than at startup.
pub struct MisconfiguredStore {
    reason: String,
}

impl MisconfiguredStore {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    fn error(&self) -> sqlx::Error {
        sqlx::Error::Configuration(self.reason.clone().into())
    }
}

#[async_trait]
impl EnrollmentStore for MisconfiguredStore {
    async fn upsert(&self, _req: &EnrollmentRequest) -> Result<Enrollment, sqlx::Error> {
        Err(self.error())
    }

    async fn recent(&self, _limit: i64) -> Result<Vec<Enrollment>, sqlx::Error> {
        Err(self.error())
    }

    async fn ping(&self) -> Result<(), sqlx::Error> {
        Err(self.error())
    }
}

/// Builds a pool without opening a connection. Connection failures show up
/// on first use instead of at startup.
pub fn connect_lazy(database_url: &str, max_connections: u32) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);

    Ok(SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect_lazy_with(options))
}

pub async fn run_migrations(pool: &SqlitePool) -> Result<(), MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}

/// Store for `database_url`, plus the pool when one could be built.
pub fn store_from_url(
    database_url: &str,
    max_connections: u32,
) -> (Arc<dyn EnrollmentStore>, Option<SqlitePool>) {
    match connect_lazy(database_url, max_connections) {
        Ok(pool) => (Arc::new(SqliteEnrollmentStore::new(pool.clone())), Some(pool)),
        Err(e) => {
            error!("unusable DATABASE_URL: {}", e);
            (Arc::new(MisconfiguredStore::new(e.to_string())), None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_misconfigured_store_fails_every_call() {
        let store = MisconfiguredStore::new("unknown query parameter");

        let err = store.recent(10).await.unwrap_err();
        assert!(matches!(err, sqlx::Error::Configuration(_)));
        assert!(err.to_string().contains("unknown query parameter"));
        assert!(store.ping().await.is_err());
    }

    #[tokio::test]
    async fn test_store_from_url_never_fails_eagerly() {
        let (store, _pool) =
            store_from_url("sqlite:///nonexistent-dir/enrollments.db?unknown_option=1", 1);
        assert!(store.ping().await.is_err());

        let (store, pool) = store_from_url("sqlite::memory:", 1);
        assert!(pool.is_some());
        assert!(store.ping().await.is_ok());
    }
}
