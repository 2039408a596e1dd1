use thiserror::Error;
use tonic::Status;

/// A boxed error from a collaborator (persistence backend, payload parser).
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Everything which can go wrong calling an [OffsetLedger](crate::OffsetLedger).
#[derive(Debug, Error)]
pub enum LedgerError {
    /// The caller asked for `(start, end]` outside of `[0, latest]`.
    #[error("range ({start}, {end}] is out of bounds (latest offset {latest})")]
    RangeOutOfBounds { start: i64, end: i64, latest: i64 },
    /// Neither the buffer nor the durable store hold this offset. Offset
    /// accounting has desynchronized from storage.
    #[error("offset {0} is in neither the buffer nor the durable store")]
    RecordMissing(i64),
    /// Writing through to the durable store failed. The buffered copy (if
    /// any) is kept, so the read may be retried.
    #[error("failed to persist offset {offset}")]
    PersistFailure {
        offset: i64,
        #[source]
        source: BoxError,
    },
    /// The durable store couldn't be read (as opposed to not having the
    /// record).
    #[error("failed to fetch offset {offset}")]
    FetchFailure {
        offset: i64,
        #[source]
        source: BoxError,
    },
    /// The payload parser rejected an arrival.
    #[error("failed to parse payload")]
    Parse(#[source] BoxError),
    #[error("ledger is stopped")]
    Stopped,
}

/// How a caller should react to a [LedgerError].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Store I/O. Retrying may succeed.
    Transient,
    /// Caller logic or configuration. Retrying the same call won't help.
    Configuration,
    /// An internal invariant was broken. Crash loudly.
    Invariant,
}

impl LedgerError {
    pub fn class(&self) -> ErrorClass {
        match self {
            Self::PersistFailure { .. } | Self::FetchFailure { .. } => ErrorClass::Transient,
            Self::RangeOutOfBounds { .. } | Self::Parse(_) | Self::Stopped => {
                ErrorClass::Configuration
            }
            Self::RecordMissing(_) => ErrorClass::Invariant,
        }
    }

    pub fn is_retriable(&self) -> bool {
        self.class() == ErrorClass::Transient
    }
}

impl From<LedgerError> for Status {
    fn from(error: LedgerError) -> Self {
        let message = error.to_string();
        match error {
            LedgerError::RangeOutOfBounds { .. } => Status::out_of_range(message),
            LedgerError::RecordMissing(_) => Status::data_loss(message),
            LedgerError::PersistFailure { .. } | LedgerError::FetchFailure { .. } => {
                Status::unavailable(message)
            }
            LedgerError::Parse(_) => Status::invalid_argument(message),
            LedgerError::Stopped => Status::failed_precondition(message),
        }
    }
}
