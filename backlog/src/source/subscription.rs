//! The transport collaborator's half of a source: every datagram received
//! is unframed and handed to [OffsetLedger::on_arrival].
//!
//! Arrivals are awaited one at a time, so payloads are numbered in the
//! order the socket delivers them.

use std::sync::{mpsc::Receiver, Arc};

use futures::StreamExt;
use tokio::{net::UdpSocket, select};
use tokio_util::udp::UdpFramed;
use tracing::{error, info, trace, warn};

use crate::{
    codec::{FrameDecoder, FrameError},
    error::BoxError,
    persistence::LedgerPersistence,
    util::shutdown_signal,
    LedgerError, OffsetLedger, ParseFailurePolicy, PayloadParser,
};

/// The state of the subscription task
pub(super) struct Subscription<P, R> {
    frames: UdpFramed<FrameDecoder, Arc<UdpSocket>>,
    ledger: Arc<OffsetLedger<P, R>>,
    on_parse_failure: ParseFailurePolicy,
}

impl<P: LedgerPersistence, R: PayloadParser> Subscription<P, R> {
    /// Create a new instance.
    pub fn new(
        socket: Arc<UdpSocket>,
        ledger: Arc<OffsetLedger<P, R>>,
        on_parse_failure: ParseFailurePolicy,
    ) -> Self {
        Self {
            frames: UdpFramed::new(socket, FrameDecoder::new()),
            ledger,
            on_parse_failure,
        }
    }

    /// A task which delivers arrivals to the ledger until a shutdown signal
    /// is sent, the ledger stops or delivery fails.
    pub async fn run(mut self, shutdown: Receiver<()>) {
        if let Ok(address) = self.frames.get_ref().local_addr() {
            info!("Subscription listening on {}", address);
        }
        select! {
            res = self.listen() => match res {
                Ok(()) => info!("Subscription ended"),
                Err(e) => error!("Subscription failed: {}", e),
            },
            _ = shutdown_signal(shutdown) => {
                warn!("Subscription received shutdown signal");
            }
        }
    }

    async fn listen(&mut self) -> Result<(), BoxError> {
        while let Some(frame) = self.frames.next().await {
            let (payload, from) = match frame {
                Ok(frame) => frame,
                Err(FrameError::Io(e)) => return Err(Box::new(e)),
                Err(e) => {
                    warn!("Dropping malformed datagram: {}", e);
                    continue;
                }
            };
            match self.ledger.on_arrival(&payload).await {
                Ok(offset) => trace!("Offset {} from {}", offset, from),
                Err(e @ LedgerError::Parse(_)) => match self.on_parse_failure {
                    ParseFailurePolicy::Drop => warn!("Dropping payload from {}: {}", from, e),
                    ParseFailurePolicy::Fail => return Err(Box::new(e)),
                },
                Err(LedgerError::Stopped) => return Ok(()),
                Err(e) => return Err(Box::new(e)),
            }
        }
        Ok(())
    }
}
