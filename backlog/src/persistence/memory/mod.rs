mod error;
mod ledger;

pub use error::MemoryPersistenceError;
pub use ledger::MemoryLedgerPersistence;
