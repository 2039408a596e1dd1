use std::mem::size_of;

/// Maximum Transmission Unit.
const MTU: usize = 1500;
/// Frame header size in contiguous bytes.
pub const HEADER_SIZE: usize =
    // compression flag
    size_of::<u8>() +
        // payload length
        size_of::<u16>();

/// Keep datagrams clear of the MTU (headers are not included in this
/// capacity).
pub const MAX_PAYLOAD_SIZE: usize = MTU - HEADER_SIZE - 100;
