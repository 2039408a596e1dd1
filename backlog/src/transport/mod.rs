//! The pub/sub transport a ledger subscribes to: framed payloads over UDP
//! multicast.

mod multicast;

pub use multicast::{
    bind_multicast_listener, connect_multicast_sender, TransportError, TransportResult,
};
