//! [DurableStore] wraps a [LedgerPersistence] with the contract the ledger
//! relies on: not-found is distinguishable from I/O failure, and recovery
//! never fails.

use std::sync::Arc;

use thiserror::Error;
use tracing::{info, warn};

use crate::{error::BoxError, persistence::LedgerPersistence, Record};

/// Failure modes of the [DurableStore].
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("offset {0} not found")]
    NotFound(i64),
    #[error("durable store i/o")]
    Io(#[source] BoxError),
}

/// The durable half of a ledger's key space.
pub struct DurableStore<P> {
    persistence: Arc<P>,
}

impl<P> Clone for DurableStore<P> {
    fn clone(&self) -> Self {
        Self {
            persistence: Arc::clone(&self.persistence),
        }
    }
}

impl<P: LedgerPersistence> DurableStore<P> {
    pub fn new(persistence: P) -> Self {
        Self::from_arc(Arc::new(persistence))
    }

    pub fn from_arc(persistence: Arc<P>) -> Self {
        Self { persistence }
    }

    /// The wrapped persistence backend.
    pub fn persistence(&self) -> &Arc<P> {
        &self.persistence
    }

    /// Idempotently write `record` under `offset`. Failures aren't retried.
    pub async fn persist(&self, offset: i64, record: &Record) -> Result<(), StoreError> {
        self.persistence
            .write_record(offset, record)
            .await
            .map_err(|e| StoreError::Io(Box::new(e)))
    }

    /// Read the record previously persisted at `offset`.
    pub async fn fetch(&self, offset: i64) -> Result<Record, StoreError> {
        match self.persistence.read_record(offset).await {
            Ok(Some(record)) => Ok(record),
            Ok(None) => Err(StoreError::NotFound(offset)),
            Err(e) => Err(StoreError::Io(Box::new(e))),
        }
    }

    /// The highest offset ever persisted, or 0. An unreadable store counts
    /// as an empty one so that startup is never blocked.
    pub async fn recover_max_offset(&self) -> i64 {
        match self.persistence.max_offset().await {
            Ok(Some(offset)) if offset > 0 => {
                info!("Recovered offset {} from durable store", offset);
                offset
            }
            Ok(_) => {
                info!("Durable store is empty, starting cold");
                0
            }
            Err(e) => {
                warn!("Failed to recover offset, starting cold: {}", e);
                0
            }
        }
    }

    pub async fn close(&self) {
        self.persistence.close().await
    }
}
