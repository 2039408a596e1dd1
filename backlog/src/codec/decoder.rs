use bytes::{Buf, Bytes, BytesMut};
use tokio_util::codec;

use super::FrameError;
use crate::constants::{HEADER_SIZE, MAX_PAYLOAD_SIZE};

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
enum State {
    ReadHeader,
    ReadBody { len: usize },
}

/// Splits frames in to raw payloads.
#[derive(Debug)]
pub struct FrameDecoder {
    state: State,
}

impl Default for FrameDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameDecoder {
    pub fn new() -> Self {
        Self {
            state: State::ReadHeader,
        }
    }

    /// Throw away whatever is left of a bad datagram and start afresh.
    fn reject(&mut self, src: &mut BytesMut, error: FrameError) -> FrameError {
        src.clear();
        self.state = State::ReadHeader;
        error
    }
}

impl codec::Decoder for FrameDecoder {
    type Error = FrameError;
    type Item = Bytes;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if let State::ReadHeader = self.state {
            if src.remaining() < HEADER_SIZE {
                return Ok(None);
            }
            // don't support compression, but keep the flag in place
            match src.get_u8() {
                0 => {}
                v => return Err(self.reject(src, FrameError::Compressed(v))),
            };
            let len = src.get_u16() as usize;
            if len > MAX_PAYLOAD_SIZE {
                return Err(self.reject(src, FrameError::TooLarge(len)));
            }
            src.reserve(len);
            self.state = State::ReadBody { len };
        }

        if let State::ReadBody { len } = self.state {
            if src.len() < len {
                return Ok(None);
            }
            self.state = State::ReadHeader;
            Ok(Some(src.split_to(len).freeze()))
        } else {
            Ok(None)
        }
    }

    /// Each datagram is decoded on its own, so anything left once it's
    /// exhausted is a partial frame.
    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        match self.decode(src)? {
            Some(frame) => Ok(Some(frame)),
            None if src.is_empty() && self.state == State::ReadHeader => Ok(None),
            None => {
                let left = src.len();
                Err(self.reject(src, FrameError::Truncated(left)))
            }
        }
    }
}
