//! The unit of data flowing through a ledger, and the pluggable step which
//! turns a raw transport payload in to one.

use std::{error::Error, str::Utf8Error};

use chrono::{DateTime, TimeZone, Utc};
use thiserror::Error;

/// An immutable `(value, timestamp)` pair. Created once when a payload
/// arrives and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Record {
    /// The message text.
    pub value: String,
    /// When the message arrived, according to our process.
    pub timestamp: DateTime<Utc>,
}

impl Record {
    pub fn new(value: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            value: value.into(),
            timestamp,
        }
    }

    /// Rebuild a record from its stored parts. `None` if the seconds and
    /// nanos don't describe a representable instant.
    pub fn from_parts(value: String, seconds: i64, nanos: u32) -> Option<Self> {
        let timestamp = Utc.timestamp_opt(seconds, nanos).single()?;
        Some(Self { value, timestamp })
    }

    /// Whole seconds since the unix epoch.
    pub fn seconds(&self) -> i64 {
        self.timestamp.timestamp()
    }

    /// Nanoseconds past [Record::seconds].
    pub fn subsec_nanos(&self) -> u32 {
        self.timestamp.timestamp_subsec_nanos()
    }
}

/// Turns raw payload bytes in to a [Record].
///
/// A failure here is fatal to that single message only. Whether it is then
/// dropped or stops the subscription is decided by the
/// [ParseFailurePolicy](crate::ParseFailurePolicy) in use.
pub trait PayloadParser: Send + Sync + 'static {
    /// Why a payload was rejected.
    type Error: Error + Send + Sync + 'static;

    fn parse(&self, payload: &[u8]) -> Result<Record, Self::Error>;
}

/// Rejection from a [TextParser].
#[derive(Debug, Error)]
pub enum TextParseError {
    #[error("payload is not valid utf-8")]
    InvalidUtf8(#[from] Utf8Error),
}

/// Interprets the payload as UTF-8 text, stamped with the time of arrival.
#[derive(Debug, Default, Clone, Copy)]
pub struct TextParser {
    lossy: bool,
}

impl TextParser {
    /// Reject payloads which aren't valid UTF-8.
    pub fn strict() -> Self {
        Self { lossy: false }
    }

    /// Replace invalid UTF-8 sequences with `U+FFFD` rather than rejecting.
    pub fn lossy() -> Self {
        Self { lossy: true }
    }
}

impl PayloadParser for TextParser {
    type Error = TextParseError;

    fn parse(&self, payload: &[u8]) -> Result<Record, Self::Error> {
        let value = if self.lossy {
            String::from_utf8_lossy(payload).into_owned()
        } else {
            std::str::from_utf8(payload)?.to_owned()
        };
        Ok(Record::new(value, Utc::now()))
    }
}
