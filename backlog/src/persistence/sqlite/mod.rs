mod error;
mod ledger;

pub use error::SqlError;
pub use ledger::SqliteLedgerPersistence;
