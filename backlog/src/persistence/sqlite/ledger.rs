use std::str::FromStr;

use sqlx::{
    sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteRow},
    Row, SqlitePool,
};

use super::error::SqlError;
use crate::{persistence::LedgerPersistence, Record};

/// A persistence type backed by sqlite.
pub struct SqliteLedgerPersistence {
    /// Connection pool
    pool: SqlitePool,
}

impl SqliteLedgerPersistence {
    /// Wrap a pool which has already had the crate's migrations applied.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Open (creating if necessary) the database at `url` and bring its
    /// schema up to date.
    pub async fn connect(url: &str) -> Result<Self, SqlError> {
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal);
        // every connection to an in-memory database is a different database
        let max_connections = if url.contains(":memory:") { 1 } else { 4 };
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await?;
        sqlx::migrate!("./migrations").run(&pool).await?;
        Ok(Self::new(pool))
    }

    fn to_record(offset: i64, row: SqliteRow) -> Result<Record, SqlError> {
        let nanos = u32::try_from(row.get::<i64, _>("ts_nanos"))
            .map_err(|_| SqlError::InvalidTimestamp(offset))?;
        Record::from_parts(row.get::<String, _>("value"), row.get("ts_secs"), nanos)
            .ok_or(SqlError::InvalidTimestamp(offset))
    }
}

#[async_trait::async_trait]
impl LedgerPersistence for SqliteLedgerPersistence {
    type Error = SqlError;

    async fn max_offset(&self) -> Result<Option<i64>, Self::Error> {
        let mut conn = self.pool.acquire().await?;
        let maybe_row = sqlx::query(
            r#"
                SELECT id
                FROM ledger_log
                ORDER BY id DESC
                LIMIT 1
            "#,
        )
        .fetch_optional(&mut conn)
        .await?;
        Ok(maybe_row.map(|r| r.get::<i64, _>("id")))
    }

    async fn write_record(&self, offset: i64, record: &Record) -> Result<(), Self::Error> {
        let mut conn = self.pool.acquire().await?;
        sqlx::query(
            r#"
                INSERT OR REPLACE INTO ledger_log (id, ts_secs, ts_nanos, value)
                VALUES (?1, ?2, ?3, ?4)
            "#,
        )
        .bind(offset)
        .bind(record.seconds())
        .bind(i64::from(record.subsec_nanos()))
        .bind(record.value.as_str())
        .execute(&mut conn)
        .await?;
        Ok(())
    }

    async fn read_record(&self, offset: i64) -> Result<Option<Record>, Self::Error> {
        let mut conn = self.pool.acquire().await?;
        let maybe_row = sqlx::query(
            r#"
                SELECT ts_secs, ts_nanos, value
                FROM ledger_log
                WHERE id = ?1
            "#,
        )
        .bind(offset)
        .fetch_optional(&mut conn)
        .await?;
        maybe_row.map(|row| Self::to_record(offset, row)).transpose()
    }

    async fn close(&self) {
        self.pool.close().await
    }
}
