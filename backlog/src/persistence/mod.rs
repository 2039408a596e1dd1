//! # Functionality to store and retrieve Records by offset
//!
//! The durable store is the archival copy of everything a consumer has read
//! from an [OffsetLedger](crate::OffsetLedger).
//!
//! ## Hot and cold records
//!
//! Arrivals are only ever buffered in memory. A record moves to the durable
//! store the first time a batch read covers its offset, and every later
//! read of that offset is answered from the store. Reads write through
//! whether or not the record was already durable, so overlapping and
//! repeated reads are harmless.
//!
//! ## Recovery
//!
//! On start, the highest persisted offset becomes the ledger's current
//! offset and numbering resumes from there. Only records which completed a
//! persist survive a restart: anything still buffered when the process died
//! is gone, and its offsets will be handed out again to new arrivals.
//!
//! ## Backends
//!
//! - [memory]: a map behind a mutex. Fine for tests and for sources which
//! don't need to survive a restart.
//! - [sqlite]: a `ledger_log` table, enabled with the `sqlite` feature.

#[cfg(feature = "sqlite")]
pub mod sqlite;

pub mod memory;

mod ledger_persistence;
mod store;

pub use ledger_persistence::LedgerPersistence;
pub use store::{DurableStore, StoreError};
