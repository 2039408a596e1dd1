//! A [LedgerSource] bridges a multicast subscription to an
//! [OffsetLedger](crate::OffsetLedger) which a pull-based consumer reads
//! deterministically.
//!
//! Running a source entails:
//!
//! - A `subscription` task. This hands every received payload to the ledger.
//! It starts before recovery, and arrivals wait on the ledger's barrier
//! until recovery completes.
//! - Recovery. The ledger resumes numbering from the durable store.
//! - Optionally, a ledger API server. This lets consumers in other
//! processes read from the ledger over gRPC.
//!
//! Example usage:
//!
//! ``` no_run
//! # use std::net::{Ipv4Addr, SocketAddrV4};
//! # use backlog::{LedgerSource, TextParser};
//! # use backlog::transport::bind_multicast_listener;
//! # use backlog::memory::MemoryLedgerPersistence;
//! #
//! # async fn inner() {
//! # let mc_addr = SocketAddrV4::new(Ipv4Addr::new(224, 0, 0, 123), 1234);
//! let socket = bind_multicast_listener(&mc_addr).unwrap();
//! let source = LedgerSource::new(socket, MemoryLedgerPersistence::new(), TextParser::strict());
//! // start the source, without an API server
//! let context = source.run(None).await;
//!
//! // consume a batch
//! if let Some(latest) = context.latest_offset().await.unwrap() {
//!     let records = context.read_range(None, latest).await.unwrap();
//! }
//! context.stop().await;
//! # }
//! ```

mod api;
mod context;
mod subscription;

use std::{
    net::SocketAddr,
    sync::{mpsc, Arc},
};

pub use api::{LedgerService, RecordStream};
pub use context::SourceContext;
use tokio::net::UdpSocket;

use crate::{
    persistence::LedgerPersistence,
    source::subscription::Subscription,
    OffsetLedger, ParseFailurePolicy, PayloadParser,
};

pub struct LedgerSource<P, R> {
    socket: Arc<UdpSocket>,
    ledger: Arc<OffsetLedger<P, R>>,
    on_parse_failure: ParseFailurePolicy,
}

impl<P: LedgerPersistence, R: PayloadParser> LedgerSource<P, R> {
    /// Create a new instance. Nothing happens until [LedgerSource::run].
    pub fn new(socket: UdpSocket, persistence: P, parser: R) -> Self {
        Self {
            socket: Arc::new(socket),
            ledger: Arc::new(OffsetLedger::new(persistence, parser)),
            on_parse_failure: Default::default(),
        }
    }

    /// Decide what happens to payloads the parser rejects.
    pub fn on_parse_failure(mut self, policy: ParseFailurePolicy) -> Self {
        self.on_parse_failure = policy;
        self
    }

    /// Run this source. This entails starting the subscription, recovering
    /// the ledger, optionally starting the API server and moving in to a
    /// [SourceContext], which represents a source running in the
    /// background.
    pub async fn run(self, api_address: Option<SocketAddr>) -> SourceContext<P, R> {
        let (sub_tx, sub_rx) = mpsc::channel();
        let subscription = Subscription::new(
            self.socket,
            Arc::clone(&self.ledger),
            self.on_parse_failure,
        );
        let _subscription_handle = tokio::spawn(subscription.run(sub_rx));

        self.ledger.recover().await;

        let api_tx = api_address.map(|address| {
            let api = LedgerService::new(Arc::clone(&self.ledger));
            let (api_tx, api_rx) = mpsc::channel();
            let _api_handle = tokio::spawn(api.run(address, api_rx));
            api_tx
        });

        SourceContext::new(self.ledger, sub_tx, api_tx)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::{
        subscription::tests::{frame, socket_pair, wait_for_offset},
        *,
    };
    use crate::{memory::MemoryLedgerPersistence, LedgerError, Phase, Record, TextParser};

    #[tokio::test]
    async fn run_read_stop() -> anyhow::Result<()> {
        let (sender, listener) = socket_pair().await?;
        let persistence = MemoryLedgerPersistence::new();
        persistence
            .write_record(4, &Record::new("before", Utc::now()))
            .await?;
        let source = LedgerSource::new(listener, persistence, TextParser::strict());
        let context = source.run(None).await;
        assert_eq!(context.latest_offset().await?, Some(4));

        for payload in ["x", "y"] {
            sender.send(&frame(payload.as_bytes())).await?;
        }
        wait_for_offset(context.ledger(), 6).await?;

        let records = context.read_range(Some(4), 6).await?;
        assert_eq!(records.len(), 2);
        let again = context.read_range(Some(3), 6).await?;
        assert_eq!(again[0].value, "before");
        assert_eq!(&again[1..], &records[..]);

        let ledger = Arc::clone(context.ledger());
        context.stop().await;
        assert_eq!(ledger.phase(), Phase::Stopped);
        assert!(ledger.store().persistence().is_closed());
        assert!(matches!(
            ledger.latest_offset().await,
            Err(LedgerError::Stopped)
        ));
        Ok(())
    }
}
