use thiserror::Error;

#[derive(Debug, Error)]
pub enum MemoryPersistenceError {
    #[error("store is closed")]
    Closed,
    #[error("injected failure")]
    Injected,
}
