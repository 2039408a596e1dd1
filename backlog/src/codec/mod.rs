//! Datagram framing for payloads arriving over the transport.
//!
//! Every payload is sent with a future compatible compression flag (always
//! zero for now) and a big-endian `u16` body size (n). The next n bytes are
//! the payload, handed untouched to the ledger's
//! [PayloadParser](crate::PayloadParser).

mod decoder;
mod encoder;

use std::io;

use thiserror::Error;

pub use decoder::FrameDecoder;
pub use encoder::FrameEncoder;

/// A frame couldn't be encoded or decoded.
#[derive(Debug, Error)]
pub enum FrameError {
    #[error("compression not supported: found flag {0}")]
    Compressed(u8),
    #[error("payload too large: {0} bytes")]
    TooLarge(usize),
    #[error("datagram ended mid-frame with {0} bytes left over")]
    Truncated(usize),
    #[error("io error")]
    Io(#[from] io::Error),
}
