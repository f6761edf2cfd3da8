use thiserror::Error;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("Database not configured")]
    NotConfigured,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Expected a single row but found several: {0}")]
    MultipleRows(String),

    #[cfg(any(feature = "database-sqlite", feature = "database-postgres"))]
    #[error("Database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[cfg(any(feature = "database-sqlite", feature = "database-postgres"))]
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type DbResult<T> = Result<T, DbError>;

/// Enforce the single-row contract for lookups that fetched with `LIMIT 2`.
pub(crate) fn exactly_one<T>(mut rows: Vec<T>, what: impl FnOnce() -> String) -> DbResult<T> {
    match rows.len() {
        0 => Err(DbError::NotFound(what())),
        1 => Ok(rows.remove(0)),
        _ => Err(DbError::MultipleRows(what())),
    }
}
