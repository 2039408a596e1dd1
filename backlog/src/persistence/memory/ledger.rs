use std::{
    collections::BTreeMap,
    sync::atomic::{AtomicBool, Ordering},
};

use tokio::sync::{Mutex, MutexGuard};

use crate::{
    persistence::{memory::error::MemoryPersistenceError, LedgerPersistence},
    Record,
};

/// An in-memory persistence service. Nothing survives the process, and
/// nothing is ever evicted.
#[derive(Debug, Default)]
pub struct MemoryLedgerPersistence {
    records: Mutex<BTreeMap<i64, Record>>,
    closed: AtomicBool,
    fail_writes: AtomicBool,
    fail_reads: AtomicBool,
}

impl MemoryLedgerPersistence {
    pub fn new() -> Self {
        Default::default()
    }

    pub async fn records(&self) -> MutexGuard<'_, BTreeMap<i64, Record>> {
        self.records.lock().await
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Make every subsequent write fail until reset.
    #[cfg(any(test, feature = "mocks"))]
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::Release);
    }

    /// Make every subsequent read (including [LedgerPersistence::max_offset])
    /// fail until reset.
    #[cfg(any(test, feature = "mocks"))]
    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::Release);
    }

    fn check(&self, flag: &AtomicBool) -> Result<(), MemoryPersistenceError> {
        if self.is_closed() {
            Err(MemoryPersistenceError::Closed)
        } else if flag.load(Ordering::Acquire) {
            Err(MemoryPersistenceError::Injected)
        } else {
            Ok(())
        }
    }
}

#[async_trait::async_trait]
impl LedgerPersistence for MemoryLedgerPersistence {
    type Error = MemoryPersistenceError;

    async fn max_offset(&self) -> Result<Option<i64>, Self::Error> {
        self.check(&self.fail_reads)?;
        Ok(self.records.lock().await.keys().next_back().copied())
    }

    async fn write_record(&self, offset: i64, record: &Record) -> Result<(), Self::Error> {
        self.check(&self.fail_writes)?;
        self.records.lock().await.insert(offset, record.clone());
        Ok(())
    }

    async fn read_record(&self, offset: i64) -> Result<Option<Record>, Self::Error> {
        self.check(&self.fail_reads)?;
        Ok(self.records.lock().await.get(&offset).cloned())
    }

    async fn close(&self) {
        self.closed.store(true, Ordering::Release);
    }
}
