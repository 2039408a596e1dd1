use thiserror::Error;

/// Failures from the sqlite backend.
#[derive(Debug, Error)]
pub enum SqlError {
    #[error("sqlx error")]
    Sqlx(#[from] sqlx::Error),
    #[error("migration error")]
    Migrate(#[from] sqlx::migrate::MigrateError),
    #[error("offset {0} holds an unrepresentable timestamp")]
    InvalidTimestamp(i64),
}
