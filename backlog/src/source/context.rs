//! [SourceContext] is the public interface to a running source. A consumer
//! polls [latest_offset](SourceContext::latest_offset) and reads batches
//! with [read_range](SourceContext::read_range) while the subscription task
//! keeps appending arrivals in the background.
//!
//! Upon dropping a [SourceContext], a shutdown signal will be sent to the
//! spawned tasks causing them to exit. Use [stop](SourceContext::stop) to
//! also close the durable store.

use std::sync::{mpsc::Sender, Arc};

use tracing::warn;

use crate::{
    persistence::LedgerPersistence, LedgerError, OffsetLedger, PayloadParser, Record,
};

/// Represents a source which has started its background tasks.
pub struct SourceContext<P, R> {
    ledger: Arc<OffsetLedger<P, R>>,
    subscription_shutdown: Option<Sender<()>>,
    api_shutdown: Option<Sender<()>>,
}

impl<P, R> SourceContext<P, R> {
    pub(super) fn new(
        ledger: Arc<OffsetLedger<P, R>>,
        subscription_shutdown: Sender<()>,
        api_shutdown: Option<Sender<()>>,
    ) -> Self {
        Self {
            ledger,
            subscription_shutdown: Some(subscription_shutdown),
            api_shutdown,
        }
    }

    /// The ledger behind this source.
    pub fn ledger(&self) -> &Arc<OffsetLedger<P, R>> {
        &self.ledger
    }

    fn signal_shutdown(&mut self) {
        let senders = [
            ("subscription", self.subscription_shutdown.take()),
            ("ledger API", self.api_shutdown.take()),
        ];
        for (task, sender) in senders {
            if let Some(Err(e)) = sender.map(|s| s.send(())) {
                warn!("Failed to send the {} shutdown signal: {}", task, e);
            }
        }
    }
}

impl<P: LedgerPersistence, R: PayloadParser> SourceContext<P, R> {
    /// See [OffsetLedger::latest_offset].
    pub async fn latest_offset(&self) -> Result<Option<i64>, LedgerError> {
        self.ledger.latest_offset().await
    }

    /// See [OffsetLedger::read_range].
    pub async fn read_range(
        &self,
        start: Option<i64>,
        end: i64,
    ) -> Result<Vec<Record>, LedgerError> {
        self.ledger.read_range(start, end).await
    }

    /// Disconnect from the transport, stop serving the API, then stop the
    /// ledger and close its durable store.
    pub async fn stop(mut self) {
        self.signal_shutdown();
        self.ledger.stop().await;
    }
}

impl<P, R> Drop for SourceContext<P, R> {
    fn drop(&mut self) {
        self.signal_shutdown();
    }
}
