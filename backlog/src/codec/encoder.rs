use bytes::{BufMut, Bytes, BytesMut};
use tokio_util::codec;

use super::FrameError;
use crate::constants::{HEADER_SIZE, MAX_PAYLOAD_SIZE};

/// Wraps raw payloads in a frame header.
#[derive(Debug, Clone, Default)]
pub struct FrameEncoder;

impl codec::Encoder<Bytes> for FrameEncoder {
    type Error = FrameError;

    fn encode(&mut self, item: Bytes, dst: &mut BytesMut) -> Result<(), Self::Error> {
        let len = item.len();
        if len > MAX_PAYLOAD_SIZE {
            return Err(FrameError::TooLarge(len));
        }
        dst.reserve(HEADER_SIZE + len);
        // forward-compatible compression flag
        dst.put_u8(0);
        dst.put_u16(len as u16);
        dst.put_slice(&item);
        Ok(())
    }
}
