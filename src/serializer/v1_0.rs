//! Protocol version 1.0: the only serializer this crate currently ships.

use bytes::Bytes;
use tracing::{debug, trace};

use crate::error::FramingError;
use crate::frame::Frame;
use crate::header::{decode_header, encode_header, FrameType, HEADER_SIZE};
use crate::payload::{decode_payload, encode_payload};
use crate::primitive::{Cursor, FrameQueue};
use crate::serializer::FrameSerializer;
use crate::version::ProtocolVersion;

/// Historical v0 broker-setup-with-resume type code, not a v1.0
/// [`FrameType`] — autodetection accepts it alongside SETUP for backward
/// compatibility with a prelude this crate otherwise does not parse.
/// Preserved literally rather than mapped to anything modern; see
/// DESIGN.md.
const LEGACY_RESUME_TYPE_CODE: u8 = 0x0D;

/// Minimum bytes of the first frame needed to attempt autodetection:
/// 4 (stream id) + 1 (type/flags high byte) + 1 (flags low byte) + 2
/// (major) + 2 (minor).
pub const MIN_BYTES_FOR_AUTODETECT: usize = 10;

#[derive(Debug, Clone, Copy, Default)]
pub struct SerializerV1_0 {
    preallocate_frame_size_field: bool,
}

impl SerializerV1_0 {
    pub const VERSION: ProtocolVersion = ProtocolVersion::new(1, 0);
    pub const FRAME_LENGTH_FIELD_SIZE: usize = 3;

    #[must_use]
    pub fn new(preallocate_frame_size_field: bool) -> Self {
        Self { preallocate_frame_size_field }
    }

    fn make_queue(&self, prefix_capacity: usize) -> FrameQueue {
        if self.preallocate_frame_size_field {
            FrameQueue::with_headroom(prefix_capacity, Self::FRAME_LENGTH_FIELD_SIZE)
        } else {
            FrameQueue::new(prefix_capacity)
        }
    }

    /// Peeks `skip_bytes` into `buf` (past any transport length prefix
    /// already stripped by the caller) and reports whether the header found
    /// there is a v1.0 SETUP, without consuming the buffer.
    #[must_use]
    pub fn detect_protocol_version(buf: &Bytes, skip_bytes: usize) -> ProtocolVersion {
        if buf.len() < skip_bytes + MIN_BYTES_FOR_AUTODETECT {
            trace!(available = buf.len(), needed = skip_bytes + MIN_BYTES_FOR_AUTODETECT, "autodetect: too short");
            return ProtocolVersion::UNKNOWN;
        }
        let windowed = buf.slice(skip_bytes..);
        let mut cursor = Cursor::new(&windowed);
        let result = (|| -> Result<ProtocolVersion, FramingError> {
            let stream_id = cursor.read_i32()?;
            if stream_id != 0 {
                return Ok(ProtocolVersion::UNKNOWN);
            }
            let byte0 = cursor.read_u8()?;
            let type_code = byte0 >> 2;
            cursor.skip(1)?;
            let major = cursor.read_u16()?;
            let minor = cursor.read_u16()?;
            let is_setup_like = type_code == FrameType::BrokerSetup.to_wire() || type_code == LEGACY_RESUME_TYPE_CODE;
            if is_setup_like && major == Self::VERSION.major && minor == Self::VERSION.minor {
                Ok(Self::VERSION)
            } else {
                Ok(ProtocolVersion::UNKNOWN)
            }
        })();
        let version = result.unwrap_or(ProtocolVersion::UNKNOWN);
        debug!(%version, "autodetect result");
        version
    }
}

impl FrameSerializer for SerializerV1_0 {
    fn protocol_version(&self) -> ProtocolVersion {
        Self::VERSION
    }

    fn frame_length_field_size(&self) -> usize {
        Self::FRAME_LENGTH_FIELD_SIZE
    }

    fn preallocate_frame_size_field(&self) -> bool {
        self.preallocate_frame_size_field
    }

    fn serialize(&self, frame: Frame) -> Result<FrameQueue, FramingError> {
        let header = frame.header();
        let mut queue = match &frame {
            Frame::BrokerSetup { .. } => self.make_queue(HEADER_SIZE + 4),
            Frame::DestinationSetup { payload, .. } | Frame::Destination { payload, .. } => {
                let metadata_len = payload.metadata.as_ref().map_or(0, Bytes::len);
                self.make_queue(HEADER_SIZE + 3 + metadata_len)
            }
            Frame::Group { metadata } => self.make_queue(HEADER_SIZE + metadata.len()),
            Frame::Broadcast { .. } | Frame::Shard { .. } => self.make_queue(HEADER_SIZE),
        };
        encode_header(&mut queue, header);
        match frame {
            Frame::BrokerSetup { request_n, .. } => queue.put_u32(request_n),
            Frame::DestinationSetup { flags, payload, .. } | Frame::Destination { flags, payload, .. } => {
                encode_payload(&mut queue, flags, &payload)?;
            }
            Frame::Group { metadata } => queue.insert_chain(metadata),
            Frame::Broadcast { .. } | Frame::Shard { .. } => {}
        }
        Ok(queue)
    }

    fn deserialize(&self, buf: &Bytes) -> Result<Frame, FramingError> {
        let mut cursor = Cursor::new(buf);
        let header = decode_header(&mut cursor)?;
        match header.frame_type {
            FrameType::BrokerSetup => {
                let request_n = cursor.read_u32()?;
                Frame::broker_setup(header.flags, header.stream_id, request_n)
            }
            FrameType::DestinationSetup => {
                let payload = decode_payload(&mut cursor, header.flags)?;
                Frame::destination_setup(header.flags, header.stream_id, payload)
            }
            FrameType::Destination => {
                let payload = decode_payload(&mut cursor, header.flags)?;
                Frame::destination(header.flags, header.stream_id, payload)
            }
            FrameType::Group => {
                let metadata = cursor.remainder_as_chain();
                if metadata.is_empty() {
                    debug!("GROUP frame decoded with empty body");
                    return Err(FramingError::InvalidArgument("GROUP body must not be empty".to_string()));
                }
                Frame::group(metadata)
            }
            FrameType::Broadcast => Frame::broadcast(header.stream_id),
            FrameType::Shard => Frame::shard(header.stream_id),
            FrameType::Undefined => {
                debug!("decode of an unrecognized frame type code was attempted");
                Err(FramingError::InvalidArgument("no frame variant for this wire type code".to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::Frame;
    use crate::header::FrameFlags;
    use crate::payload::Payload;

    fn serializer() -> SerializerV1_0 {
        SerializerV1_0::new(false)
    }

    #[test]
    fn broker_setup_round_trips() {
        let ser = serializer();
        let frame = Frame::broker_setup(FrameFlags::EMPTY, 0, 3).unwrap();
        let queue = ser.serialize(frame.clone()).unwrap();
        let bytes = queue.into_bytes();
        assert_eq!(hex::encode(&bytes), "00000000040000000003");
        let decoded = ser.deserialize(&bytes).unwrap();
        assert_eq!(decoded, frame);
    }

    #[test]
    fn broker_setup_with_nonzero_stream_id_matches_known_wire_bytes() {
        let ser = serializer();
        let frame = Frame::broker_setup(FrameFlags::EMPTY, 42, 3).unwrap();
        let bytes = ser.serialize(frame.clone()).unwrap().into_bytes();
        assert_eq!(hex::encode(&bytes), "0000002a040000000003");
        assert_eq!(ser.deserialize(&bytes).unwrap(), frame);
    }

    #[test]
    fn destination_setup_matches_known_wire_bytes() {
        let ser = serializer();
        let payload = Payload::new(Some(Bytes::from_static(b"d")), Some(Bytes::from_static(b"m")));
        let frame = Frame::destination_setup(FrameFlags::new(FrameFlags::METADATA), 1, payload).unwrap();
        let bytes = ser.serialize(frame.clone()).unwrap().into_bytes();
        assert_eq!(hex::encode(&bytes), "0000000109000000016d64");
        assert_eq!(ser.deserialize(&bytes).unwrap(), frame);
    }

    #[test]
    fn group_matches_known_wire_bytes() {
        let ser = serializer();
        let frame = Frame::group(Bytes::from_static(b"abc")).unwrap();
        let bytes = ser.serialize(frame.clone()).unwrap().into_bytes();
        assert_eq!(hex::encode(&bytes), "000000001100616263");
        assert_eq!(ser.deserialize(&bytes).unwrap(), frame);
    }

    #[test]
    fn broadcast_and_shard_match_known_wire_bytes() {
        let ser = serializer();
        let broadcast = Frame::broadcast(7).unwrap();
        assert_eq!(hex::encode(ser.serialize(broadcast).unwrap().into_bytes()), "000000071400");

        let shard = Frame::shard(9).unwrap();
        assert_eq!(hex::encode(ser.serialize(shard).unwrap().into_bytes()), "000000091800");
    }

    #[test]
    fn group_with_empty_body_fails_to_decode() {
        let ser = serializer();
        let bytes = Bytes::from_static(&[0x00, 0x00, 0x00, 0x00, 0x11, 0x00]);
        assert!(ser.deserialize(&bytes).is_err());
    }

    #[test]
    fn broker_setup_with_zero_request_n_fails_to_decode() {
        let ser = serializer();
        let bytes = Bytes::from_static(&[0x00, 0x00, 0x00, 0x00, 0x04, 0x00, 0x00, 0x00, 0x00, 0x00]);
        assert!(ser.deserialize(&bytes).is_err());
    }

    #[test]
    fn autodetect_accepts_matching_setup_and_rejects_mismatches() {
        let matching = Bytes::from_static(&[0x00, 0x00, 0x00, 0x00, 0x04, 0x00, 0x00, 0x01, 0x00, 0x00]);
        assert_eq!(SerializerV1_0::detect_protocol_version(&matching, 0), ProtocolVersion::new(1, 0));

        let wrong_type = Bytes::from_static(&[0x00, 0x00, 0x00, 0x00, 0x08, 0x00, 0x00, 0x01, 0x00, 0x00]);
        assert_eq!(SerializerV1_0::detect_protocol_version(&wrong_type, 0), ProtocolVersion::UNKNOWN);

        let nonzero_stream = Bytes::from_static(&[0x00, 0x00, 0x00, 0x05, 0x04, 0x00, 0x00, 0x01, 0x00, 0x00]);
        assert_eq!(SerializerV1_0::detect_protocol_version(&nonzero_stream, 0), ProtocolVersion::UNKNOWN);

        let wrong_minor = Bytes::from_static(&[0x00, 0x00, 0x00, 0x00, 0x04, 0x00, 0x00, 0x01, 0x00, 0x01]);
        assert_eq!(SerializerV1_0::detect_protocol_version(&wrong_minor, 0), ProtocolVersion::UNKNOWN);

        let too_short = Bytes::from_static(&[0x00, 0x00, 0x00, 0x00, 0x04, 0x00, 0x00, 0x01, 0x00]);
        assert_eq!(SerializerV1_0::detect_protocol_version(&too_short, 0), ProtocolVersion::UNKNOWN);
    }

    #[test]
    fn preallocate_reserves_length_field_headroom() {
        let ser = SerializerV1_0::new(true);
        let frame = Frame::shard(9).unwrap();
        let queue = ser.serialize(frame).unwrap();
        assert_eq!(queue.headroom(), SerializerV1_0::FRAME_LENGTH_FIELD_SIZE);
    }
}
