//! The external, crash-durable key-value collaborator a ledger archives its
//! records to.

use std::error::Error;

use async_trait::async_trait;

use crate::Record;

/// This is the interface for persisting records to disk, keyed by offset.
/// Implementations must be safe to call concurrently.
#[async_trait]
pub trait LedgerPersistence: Send + Sync + 'static {
    /// An error occurring from an operation.
    type Error: Error + Send + Sync + 'static;

    /// The highest offset stored. None signifies nothing ever stored.
    async fn max_offset(&self) -> Result<Option<i64>, Self::Error>;

    /// Write a record under `offset`, replacing anything already there.
    /// Writing the same record twice must succeed.
    async fn write_record(&self, offset: i64, record: &Record) -> Result<(), Self::Error>;

    /// Read back a previously written record, exactly as it was written.
    /// None signifies nothing was ever written at `offset`.
    async fn read_record(&self, offset: i64) -> Result<Option<Record>, Self::Error>;

    /// Release any resources. No further calls are made afterwards.
    async fn close(&self);
}
