//! An [OffsetLedger] turns pushed arrivals in to a gap-free, replayable log.
//!
//! Arrivals are numbered `1, 2, 3, ...` in the order they take the ledger's
//! lock and are buffered in memory. Batch reads resolve each offset from the
//! buffer, falling back to the durable store, write the record through to
//! the store and only then evict the buffered copy. Callers never see which
//! tier answered.
//!
//! ```text
//!   arrival ──stamp──▶ buffer ──read_range──▶ durable store
//!                        │                        │
//!                        └──────── result ◀───────┘
//! ```
//!
//! Example usage:
//!
//! ``` no_run
//! # use backlog::{OffsetLedger, TextParser};
//! # use backlog::memory::MemoryLedgerPersistence;
//! # async fn inner() {
//! let ledger = OffsetLedger::new(MemoryLedgerPersistence::new(), TextParser::strict());
//! ledger.recover().await;
//!
//! ledger.on_arrival(b"first").await.unwrap();
//! ledger.on_arrival(b"second").await.unwrap();
//! assert_eq!(ledger.latest_offset().await.unwrap(), Some(2));
//!
//! // everything after offset 0, up to and including offset 2
//! let records = ledger.read_range(None, 2).await.unwrap();
//! assert_eq!(records[0].value, "first");
//! # }
//! ```

mod barrier;
mod state;

use tokio::sync::{Mutex, MutexGuard};
use tracing::{debug, error, info, trace, warn};

pub use barrier::Phase;

use crate::{
    error::LedgerError,
    ledger::{barrier::Barrier, state::LedgerState},
    persistence::{DurableStore, LedgerPersistence, StoreError},
    record::PayloadParser,
    Record,
};

/// Upper bound on the up-front allocation for a range read.
const READ_CAPACITY: i64 = 1024;

/// The offset ledger. Safe to share between any number of arrival tasks and
/// a reader.
pub struct OffsetLedger<P, R> {
    state: Mutex<LedgerState>,
    barrier: Barrier,
    store: DurableStore<P>,
    parser: R,
}

impl<P: LedgerPersistence, R: PayloadParser> OffsetLedger<P, R> {
    /// Create a ledger in [Phase::Initializing]. Nothing is read from the
    /// store until [OffsetLedger::recover].
    pub fn new(persistence: P, parser: R) -> Self {
        Self::with_store(DurableStore::new(persistence), parser)
    }

    pub fn with_store(store: DurableStore<P>, parser: R) -> Self {
        Self {
            state: Default::default(),
            barrier: Default::default(),
            store,
            parser,
        }
    }

    pub fn phase(&self) -> Phase {
        self.barrier.phase()
    }

    pub fn store(&self) -> &DurableStore<P> {
        &self.store
    }

    /// Resume numbering from the highest persisted offset (0 if the store is
    /// empty or unreadable) and open the barrier. Only the first call does
    /// anything; every call returns the offset arrivals resume after.
    ///
    /// Records which were buffered but never read before a previous process
    /// died are not recovered. Their offsets are reassigned to new arrivals.
    pub async fn recover(&self) -> i64 {
        let mut state = self.state.lock().await;
        if self.barrier.phase() != Phase::Initializing {
            return state.current_offset();
        }
        let offset = self.store.recover_max_offset().await;
        *state = LedgerState::with_offset(offset);
        if self.barrier.open() {
            info!("Ledger ready at offset {}", offset);
        }
        offset
    }

    /// Parse a payload and append it to the ledger, returning its offset.
    ///
    /// Suspends until [OffsetLedger::recover] has completed.
    pub async fn on_arrival(&self, payload: &[u8]) -> Result<i64, LedgerError> {
        let record = self
            .parser
            .parse(payload)
            .map_err(|e| LedgerError::Parse(Box::new(e)))?;
        if self.barrier.wait().await == Phase::Stopped {
            return Err(LedgerError::Stopped);
        }
        let offset = self.live_state().await?.stamp(record);
        trace!("Buffered arrival at offset {}", offset);
        Ok(offset)
    }

    /// The latest offset available to read, or None if nothing has ever
    /// arrived (including before a restart).
    pub async fn latest_offset(&self) -> Result<Option<i64>, LedgerError> {
        let offset = self.live_state().await?.current_offset();
        Ok((offset > 0).then_some(offset))
    }

    /// Number of records held in memory awaiting their first read.
    pub async fn buffered(&self) -> Result<usize, LedgerError> {
        Ok(self.live_state().await?.buffered())
    }

    /// Read every record in `(start, end]` in offset order, moving each one
    /// to the durable store. A `start` of None means from the beginning.
    ///
    /// Reads are idempotent: the same range always returns the same records.
    /// The lock is only held for individual buffer accesses, so arrivals
    /// continue while a read is in progress.
    pub async fn read_range(
        &self,
        start: Option<i64>,
        end: i64,
    ) -> Result<Vec<Record>, LedgerError> {
        let start = start.unwrap_or(0);
        {
            let latest = self.live_state().await?.current_offset();
            if start < 0 || end < start || end > latest {
                return Err(LedgerError::RangeOutOfBounds { start, end, latest });
            }
        }

        let mut records = Vec::with_capacity((end - start).min(READ_CAPACITY) as usize);
        for offset in (start + 1)..=end {
            let record = self.resolve(offset).await?;
            self.store
                .persist(offset, &record)
                .await
                .map_err(|e| LedgerError::PersistFailure {
                    offset,
                    source: Box::new(e),
                })?;
            self.live_state().await?.evict(offset);
            records.push(record);
        }
        debug!("Read {} records in ({}, {}]", records.len(), start, end);
        Ok(records)
    }

    /// Tear down. Arrivals and reads fail with [LedgerError::Stopped] from
    /// here on, and the durable store is closed. Records still buffered are
    /// discarded.
    pub async fn stop(&self) {
        let buffered = {
            let state = self.state.lock().await;
            if !self.barrier.stop() {
                return;
            }
            state.buffered()
        };
        if buffered > 0 {
            warn!("Stopping with {} unread records buffered", buffered);
        }
        self.store.close().await;
        info!("Ledger stopped");
    }

    /// Look `offset` up in the buffer, then the durable store. Eviction only
    /// follows a successful persist, so a buffer miss must be durable.
    async fn resolve(&self, offset: i64) -> Result<Record, LedgerError> {
        let buffered = self.live_state().await?.get(offset).cloned();
        if let Some(record) = buffered {
            return Ok(record);
        }
        match self.store.fetch(offset).await {
            Ok(record) => Ok(record),
            Err(StoreError::NotFound(_)) => {
                error!("Offset {} is missing from buffer and store", offset);
                Err(LedgerError::RecordMissing(offset))
            }
            Err(StoreError::Io(source)) => Err(LedgerError::FetchFailure { offset, source }),
        }
    }

    /// Take the lock, failing if the ledger has been stopped. The phase is
    /// only moved to stopped while the lock is held.
    async fn live_state(&self) -> Result<MutexGuard<'_, LedgerState>, LedgerError> {
        let state = self.state.lock().await;
        if self.barrier.phase() == Phase::Stopped {
            return Err(LedgerError::Stopped);
        }
        Ok(state)
    }
}

#[cfg(test)]
mod tests {
    use std::{collections::HashSet, sync::Arc, time::Duration};

    use chrono::Utc;
    use rand::{seq::SliceRandom, thread_rng};
    use tokio::time::timeout;

    use super::*;
    use crate::{
        error::ErrorClass, persistence::memory::MemoryLedgerPersistence, record::TextParser,
    };

    type TestLedger = OffsetLedger<MemoryLedgerPersistence, TextParser>;

    async fn ready_ledger() -> TestLedger {
        let ledger = OffsetLedger::new(MemoryLedgerPersistence::new(), TextParser::strict());
        ledger.recover().await;
        ledger
    }

    fn values(records: &[Record]) -> Vec<&str> {
        records.iter().map(|r| r.value.as_str()).collect()
    }

    #[tokio::test]
    async fn example_scenario() -> anyhow::Result<()> {
        let ledger = ready_ledger().await;
        assert_eq!(ledger.latest_offset().await?, None);

        assert_eq!(ledger.on_arrival(b"R1").await?, 1);
        assert_eq!(ledger.on_arrival(b"R2").await?, 2);
        assert_eq!(ledger.on_arrival(b"R3").await?, 3);
        assert_eq!(ledger.latest_offset().await?, Some(3));

        let first = ledger.read_range(None, 2).await?;
        assert_eq!(values(&first), vec!["R1", "R2"]);
        assert_eq!(ledger.buffered().await?, 1);

        let again = ledger.read_range(Some(0), 2).await?;
        assert_eq!(first, again);

        let last = ledger.read_range(Some(2), 3).await?;
        assert_eq!(values(&last), vec!["R3"]);
        assert_eq!(ledger.buffered().await?, 0);
        Ok(())
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_arrivals_are_contiguous() -> anyhow::Result<()> {
        let persistence = MemoryLedgerPersistence::new();
        persistence
            .write_record(5, &Record::new("old", Utc::now()))
            .await?;
        let ledger = Arc::new(OffsetLedger::new(persistence, TextParser::strict()));
        let prev = ledger.recover().await;
        assert_eq!(prev, 5);

        let count = 200;
        let mut payloads: Vec<_> = (0..count).map(|i| format!("msg-{i}")).collect();
        payloads.shuffle(&mut thread_rng());
        let handles: Vec<_> = payloads
            .into_iter()
            .map(|payload| {
                let ledger = Arc::clone(&ledger);
                tokio::spawn(async move { ledger.on_arrival(payload.as_bytes()).await })
            })
            .collect();
        let mut offsets = HashSet::new();
        for handle in handles {
            assert!(offsets.insert(handle.await??));
        }
        let expected: HashSet<_> = (prev + 1..=prev + count).collect();
        assert_eq!(offsets, expected);
        assert_eq!(ledger.latest_offset().await?, Some(prev + count));
        assert_eq!(ledger.buffered().await?, count as usize);
        Ok(())
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn reads_interleave_with_arrivals() -> anyhow::Result<()> {
        let ledger = Arc::new(ready_ledger().await);
        let writer = {
            let ledger = Arc::clone(&ledger);
            tokio::spawn(async move {
                for i in 1..=500 {
                    ledger.on_arrival(i.to_string().as_bytes()).await?;
                }
                Ok::<_, LedgerError>(())
            })
        };

        let mut read_up_to = 0;
        let mut seen = Vec::new();
        while read_up_to < 500 {
            let latest = ledger.latest_offset().await?.unwrap_or(0);
            let records = ledger.read_range(Some(read_up_to), latest).await?;
            seen.extend(records.into_iter().map(|r| r.value));
            read_up_to = latest;
            tokio::task::yield_now().await;
        }
        writer.await??;

        let expected: Vec<_> = (1..=500).map(|i: i64| i.to_string()).collect();
        assert_eq!(seen, expected);
        Ok(())
    }

    #[tokio::test]
    async fn read_moves_buffer_to_store() -> anyhow::Result<()> {
        let ledger = ready_ledger().await;
        for payload in ["a", "b", "c", "d"] {
            ledger.on_arrival(payload.as_bytes()).await?;
        }
        let records = ledger.read_range(None, 3).await?;
        for (i, record) in records.iter().enumerate() {
            let offset = i as i64 + 1;
            assert_eq!(&ledger.store().fetch(offset).await?, record);
            assert!(ledger.state.lock().await.get(offset).is_none());
        }
        assert!(ledger.store().fetch(4).await.is_err());
        assert!(ledger.state.lock().await.get(4).is_some());

        let stored = ledger.store().persistence().records().await;
        assert_eq!(stored.keys().copied().collect::<Vec<_>>(), vec![1, 2, 3]);
        assert_eq!(stored.values().cloned().collect::<Vec<_>>(), records);
        Ok(())
    }

    #[tokio::test]
    async fn sparse_store_read_fails_without_allocating_range() -> anyhow::Result<()> {
        let far = 1_000_000_000_000;
        let persistence = MemoryLedgerPersistence::new();
        persistence
            .write_record(far, &Record::new("far", Utc::now()))
            .await?;
        let ledger = OffsetLedger::new(persistence, TextParser::strict());
        assert_eq!(ledger.recover().await, far);
        let err = ledger.read_range(None, far).await.unwrap_err();
        assert!(matches!(err, LedgerError::RecordMissing(1)));
        assert_eq!(values(&ledger.read_range(Some(far - 1), far).await?), vec!["far"]);
        Ok(())
    }

    #[tokio::test]
    async fn recovery_resumes_numbering() -> anyhow::Result<()> {
        let persistence = MemoryLedgerPersistence::new();
        for offset in 1..=7 {
            persistence
                .write_record(offset, &Record::new(offset.to_string(), Utc::now()))
                .await?;
        }
        let ledger = OffsetLedger::new(persistence, TextParser::strict());
        assert_eq!(ledger.recover().await, 7);
        assert_eq!(ledger.latest_offset().await?, Some(7));
        assert_eq!(ledger.on_arrival(b"new").await?, 8);

        // recovered history is readable, and only the first recover counts
        let records = ledger.read_range(Some(5), 8).await?;
        assert_eq!(values(&records), vec!["6", "7", "new"]);
        assert_eq!(ledger.recover().await, 8);
        Ok(())
    }

    #[tokio::test]
    async fn unreadable_store_is_cold_start() -> anyhow::Result<()> {
        let persistence = MemoryLedgerPersistence::new();
        persistence
            .write_record(3, &Record::new("x", Utc::now()))
            .await?;
        persistence.fail_reads(true);
        let ledger = OffsetLedger::new(persistence, TextParser::strict());
        assert_eq!(ledger.recover().await, 0);
        assert_eq!(ledger.phase(), Phase::Ready);
        assert_eq!(ledger.latest_offset().await?, None);
        Ok(())
    }

    #[tokio::test]
    async fn arrivals_wait_for_recovery() -> anyhow::Result<()> {
        let persistence = MemoryLedgerPersistence::new();
        persistence
            .write_record(2, &Record::new("x", Utc::now()))
            .await?;
        let ledger = Arc::new(OffsetLedger::new(persistence, TextParser::strict()));
        let arrival = {
            let ledger = Arc::clone(&ledger);
            tokio::spawn(async move { ledger.on_arrival(b"early").await })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!arrival.is_finished());
        assert_eq!(ledger.phase(), Phase::Initializing);
        assert_eq!(ledger.state.lock().await.buffered(), 0);

        ledger.recover().await;
        let offset = timeout(Duration::from_secs(1), arrival).await???;
        assert_eq!(offset, 3);
        Ok(())
    }

    #[tokio::test]
    async fn out_of_bounds() -> anyhow::Result<()> {
        let ledger = ready_ledger().await;
        ledger.on_arrival(b"a").await?;
        for (start, end) in [(None, 2), (Some(-1), 1), (Some(1), 0)] {
            let err = ledger.read_range(start, end).await.unwrap_err();
            assert!(matches!(err, LedgerError::RangeOutOfBounds { .. }));
            assert_eq!(err.class(), ErrorClass::Configuration);
        }
        // an empty range is fine
        assert!(ledger.read_range(Some(1), 1).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn missing_record_is_fatal() -> anyhow::Result<()> {
        let persistence = MemoryLedgerPersistence::new();
        persistence
            .write_record(3, &Record::new("c", Utc::now()))
            .await?;
        let ledger = OffsetLedger::new(persistence, TextParser::strict());
        ledger.recover().await;
        let err = ledger.read_range(None, 3).await.unwrap_err();
        assert!(matches!(err, LedgerError::RecordMissing(1)));
        assert_eq!(err.class(), ErrorClass::Invariant);
        // the durable part is still served
        assert_eq!(values(&ledger.read_range(Some(2), 3).await?), vec!["c"]);
        Ok(())
    }

    #[tokio::test]
    async fn persist_failure_keeps_buffer() -> anyhow::Result<()> {
        let ledger = ready_ledger().await;
        ledger.on_arrival(b"a").await?;
        ledger.on_arrival(b"b").await?;

        ledger.store().persistence().fail_writes(true);
        let err = ledger.read_range(None, 2).await.unwrap_err();
        assert!(matches!(err, LedgerError::PersistFailure { offset: 1, .. }));
        assert!(err.is_retriable());
        assert_eq!(ledger.buffered().await?, 2);

        ledger.store().persistence().fail_writes(false);
        let records = ledger.read_range(None, 2).await?;
        assert_eq!(values(&records), vec!["a", "b"]);
        assert_eq!(ledger.buffered().await?, 0);
        Ok(())
    }

    #[tokio::test]
    async fn parse_failure_consumes_no_offset() -> anyhow::Result<()> {
        let ledger = ready_ledger().await;
        let err = ledger.on_arrival(&[0xff, 0xfe]).await.unwrap_err();
        assert!(matches!(err, LedgerError::Parse(_)));
        assert_eq!(ledger.latest_offset().await?, None);
        assert_eq!(ledger.on_arrival(b"ok").await?, 1);
        Ok(())
    }

    #[tokio::test]
    async fn stop_is_terminal() -> anyhow::Result<()> {
        let ledger = ready_ledger().await;
        ledger.on_arrival(b"a").await?;
        ledger.stop().await;
        assert_eq!(ledger.phase(), Phase::Stopped);
        assert!(ledger.store().persistence().is_closed());
        assert!(matches!(
            ledger.on_arrival(b"b").await,
            Err(LedgerError::Stopped)
        ));
        assert!(matches!(
            ledger.read_range(None, 1).await,
            Err(LedgerError::Stopped)
        ));
        assert!(matches!(
            ledger.latest_offset().await,
            Err(LedgerError::Stopped)
        ));
        // idempotent
        ledger.stop().await;
        Ok(())
    }

    #[tokio::test]
    async fn stop_wakes_waiting_arrivals() {
        let ledger = Arc::new(OffsetLedger::new(
            MemoryLedgerPersistence::new(),
            TextParser::strict(),
        ));
        let arrival = {
            let ledger = Arc::clone(&ledger);
            tokio::spawn(async move { ledger.on_arrival(b"early").await })
        };
        tokio::task::yield_now().await;
        ledger.stop().await;
        let res = timeout(Duration::from_secs(1), arrival).await.unwrap().unwrap();
        assert!(matches!(res, Err(LedgerError::Stopped)));
    }

    #[tokio::test]
    async fn unread_records_are_lost_on_restart() -> anyhow::Result<()> {
        let persistence = Arc::new(MemoryLedgerPersistence::new());
        {
            let ledger = OffsetLedger::with_store(
                DurableStore::from_arc(Arc::clone(&persistence)),
                TextParser::strict(),
            );
            ledger.recover().await;
            for payload in ["a", "b", "c"] {
                ledger.on_arrival(payload.as_bytes()).await?;
            }
            ledger.read_range(None, 1).await?;
            // crash: dropped without stop
        }

        let ledger = OffsetLedger::with_store(
            DurableStore::from_arc(Arc::clone(&persistence)),
            TextParser::strict(),
        );
        assert_eq!(ledger.recover().await, 1);
        assert_eq!(ledger.on_arrival(b"d").await?, 2);
        let records = ledger.read_range(None, 2).await?;
        assert_eq!(values(&records), vec!["a", "d"]);
        Ok(())
    }
}
