//! The ledger API lets a consumer poll for the
//! [latest offset](LedgerService::latest_offset) and
//! [read a range](LedgerService::read_range) of records from another
//! process.
//!
//! Reads through the API have exactly the same semantics as
//! [OffsetLedger::read_range]: records are moved to the durable store as
//! they're read and repeated reads return the same records.

use std::{
    net::SocketAddr,
    pin::Pin,
    sync::{mpsc::Receiver, Arc},
};

use async_stream::stream;
use tokio::select;
use tokio_stream::Stream;
use tonic::{transport::Server, Request, Response, Status};
use tracing::{info, warn};

use crate::{
    persistence::LedgerPersistence,
    proto::ledger::{
        ledger_api_server::{LedgerApi, LedgerApiServer},
        LatestOffsetRequest, LatestOffsetResponse, RangeRequest, RecordMessage,
    },
    util::shutdown_signal,
    OffsetLedger, PayloadParser,
};

pub type RecordStream = Pin<Box<dyn Stream<Item = Result<RecordMessage, Status>> + Send>>;

/// Serves an [OffsetLedger] over gRPC.
pub struct LedgerService<P, R> {
    ledger: Arc<OffsetLedger<P, R>>,
}

impl<P: LedgerPersistence, R: PayloadParser> LedgerService<P, R> {
    /// Create a new instance.
    pub fn new(ledger: Arc<OffsetLedger<P, R>>) -> Self {
        Self { ledger }
    }

    /// Bind a [LedgerApiServer] to the address provided and listen until a
    /// shutdown signal is sent.
    pub async fn run(self, address: SocketAddr, shutdown: Receiver<()>) {
        info!("Ledger API running on {}", address);
        select! {
            res = Server::builder()
                .add_service(LedgerApiServer::new(self))
                .serve(address) => {
                warn!("Ledger API exited: {:?}", res);
            },
            _ = shutdown_signal(shutdown) => {
                warn!("Ledger API received shutdown signal");
            }
        }
    }
}

#[tonic::async_trait]
impl<P: LedgerPersistence, R: PayloadParser> LedgerApi for LedgerService<P, R> {
    type ReadRangeStream = RecordStream;

    async fn latest_offset(
        &self,
        _: Request<LatestOffsetRequest>,
    ) -> Result<Response<LatestOffsetResponse>, Status> {
        let offset = self.ledger.latest_offset().await?;
        Ok(Response::new(LatestOffsetResponse { offset }))
    }

    async fn read_range(
        &self,
        request: Request<RangeRequest>,
    ) -> Result<Response<Self::ReadRangeStream>, Status> {
        let RangeRequest { start, end } = request.into_inner();
        let records = self.ledger.read_range(start, end).await?;
        let first = start.unwrap_or(0) + 1;
        // TODO: stream straight out of the ledger rather than collecting the
        //  whole range first.
        Ok(Response::new(Box::pin(stream! {
            for (offset, record) in (first..).zip(records) {
                yield Ok(RecordMessage::new(offset, record));
            }
        })))
    }
}
