//! Optional `tokio_util` adapter applying the transport-owned 3-byte length
//! prefix around a [`FrameSerializer`]. The byte-stream transport itself is
//! out of scope for this crate; this is the minimal, swappable bridge to it.

use bytes::BytesMut;
use tokio_util::codec::{Decoder, Encoder};
use tracing::trace;

use crate::error::FramingError;
use crate::frame::Frame;
use crate::primitive::MAX_24BIT;
use crate::serializer::FrameSerializer;

const LENGTH_PREFIX_SIZE: usize = 3;

pub struct ProteusCodec {
    serializer: Box<dyn FrameSerializer>,
}

impl ProteusCodec {
    #[must_use]
    pub fn new(serializer: Box<dyn FrameSerializer>) -> Self {
        Self { serializer }
    }
}

impl Decoder for ProteusCodec {
    type Item = Frame;
    type Error = FramingError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if src.len() < LENGTH_PREFIX_SIZE {
            return Ok(None);
        }
        let body_len = ((src[0] as usize) << 16) | ((src[1] as usize) << 8) | (src[2] as usize);
        let total_len = LENGTH_PREFIX_SIZE + body_len;
        if src.len() < total_len {
            trace!(have = src.len(), need = total_len, "codec: frame incomplete");
            return Ok(None);
        }
        let frame_bytes = src.split_to(total_len).freeze();
        let body = frame_bytes.slice(LENGTH_PREFIX_SIZE..);
        self.serializer.deserialize(&body).map(Some)
    }
}

impl Encoder<Frame> for ProteusCodec {
    type Error = FramingError;

    fn encode(&mut self, item: Frame, dst: &mut BytesMut) -> Result<(), Self::Error> {
        let queue = self.serializer.serialize(item)?;
        let segments = queue.into_segments();
        let body_len: usize = segments.iter().map(|s| s.len()).sum();
        if body_len > MAX_24BIT {
            return Err(FramingError::MetadataOverflow { len: body_len });
        }
        dst.reserve(LENGTH_PREFIX_SIZE + body_len);
        dst.extend_from_slice(&[(body_len >> 16) as u8, (body_len >> 8) as u8, body_len as u8]);
        for segment in segments {
            dst.extend_from_slice(&segment);
        }
        Ok(())
    }
}
