//! # Backlog
//!
//! Backlog turns a pushed, fire-and-forget message stream in to a
//! replayable log which a pull-based batch consumer can read
//! deterministically.
//!
//! A subscriber callback has no concept of batches or offsets: messages just
//! show up, at unpredictable times, possibly concurrently. A batch consumer
//! needs the opposite: monotonic, gap-free offsets, the ability to ask for
//! "everything in `(a, b]`" and to get exactly the same answer if it asks
//! again after a failure.
//!
//! ## Getting Started
//!
//! The core is the [OffsetLedger]. Hand it arrivals, read it in ranges:
//!
//! ``` no_run
//! use backlog::{memory::MemoryLedgerPersistence, OffsetLedger, TextParser};
//!
//! # async fn inner() -> Result<(), backlog::LedgerError> {
//! let ledger = OffsetLedger::new(MemoryLedgerPersistence::new(), TextParser::strict());
//! // resume from whatever the durable store last saw
//! ledger.recover().await;
//!
//! // from any number of transport tasks
//! ledger.on_arrival(b"R1").await?;
//! ledger.on_arrival(b"R2").await?;
//! ledger.on_arrival(b"R3").await?;
//!
//! // from the consumer
//! let latest = ledger.latest_offset().await?; // Some(3)
//! let batch = ledger.read_range(None, 2).await?; // [R1, R2]
//! let retry = ledger.read_range(Some(0), 2).await?; // [R1, R2] again
//! # Ok(())
//! # }
//! ```
//!
//! ### Networking
//!
//! A [LedgerSource] wires a ledger to a UDP multicast subscription (see
//! [transport]) and can serve the ledger to other processes over gRPC (see
//! [proto::ledger]).
//!
//! ## Guarantees
//!
//! - Offsets start at 1 and are never skipped or reused while running.
//! - A range read always returns records in offset order, and the same
//! range always returns the same records.
//! - Delivery is at-least-once: the transport may redeliver, and the ledger
//! numbers whatever it's given. Records which arrived but were never read
//! before a crash are lost.
//! - There's no backpressure. The in-memory buffer is unbounded; cap it by
//! reading.
//!
//! ## Crate feature flags
//!
//! - `sqlite`: A durable store backed by sqlite. Enabled by default.
//! - `mocks`: Failure injection for the in-memory store.

pub mod codec;
pub(crate) mod constants;

mod config;
mod error;
mod ledger;
mod persistence;
pub mod proto;
mod record;
pub mod source;
pub mod transport;
mod util;

pub use config::*;
pub use error::{BoxError, ErrorClass, LedgerError};
pub use ledger::{OffsetLedger, Phase};
pub use persistence::*;
pub use record::{PayloadParser, Record, TextParseError, TextParser};
pub use source::{LedgerService, LedgerSource, SourceContext};
pub use util::shutdown_signal;
