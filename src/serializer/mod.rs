//! The serializer trait and the dispatch helpers that pick an implementation
//! by declared or autodetected protocol version.

pub mod v1_0;

use bytes::Bytes;

use crate::error::FramingError;
use crate::frame::Frame;
use crate::header::{peek_frame_type, peek_stream_id, FrameType};
use crate::primitive::FrameQueue;
use crate::version::ProtocolVersion;

/// A version-scoped frame codec. All encode/decode entry points are single
/// functions over the closed [`Frame`] sum type, favoring exhaustive
/// matching over one method per variant.
pub trait FrameSerializer {
    fn protocol_version(&self) -> ProtocolVersion;

    /// Bytes of headroom a length-prefix-owning transport should reserve,
    /// when [`FrameSerializer::preallocate_frame_size_field`] is enabled.
    fn frame_length_field_size(&self) -> usize;

    fn preallocate_frame_size_field(&self) -> bool;

    /// Non-destructive peek at the frame type of `buf`. Never errors: an
    /// unrecognized or truncated buffer reports `FrameType::Undefined`.
    fn peek_frame_type(&self, buf: &Bytes) -> FrameType {
        peek_frame_type(buf)
    }

    /// Non-destructive peek at the stream id of `buf`. `None` on truncation
    /// or a negative wire value.
    fn peek_stream_id(&self, buf: &Bytes) -> Option<u32> {
        peek_stream_id(buf)
    }

    /// Consumes `frame` and returns an assembled output queue. Consuming by
    /// value (rather than by reference) means the frame's payload/metadata
    /// chains move into the queue rather than being copied.
    fn serialize(&self, frame: Frame) -> Result<FrameQueue, FramingError>;

    /// Parses one frame out of `buf`. `buf` is the frame body with any
    /// transport-owned length prefix already stripped.
    fn deserialize(&self, buf: &Bytes) -> Result<Frame, FramingError>;
}

/// Returns a serializer for an explicitly requested protocol version, or
/// `VersionMismatch` if none is known.
pub fn create(version: ProtocolVersion) -> Result<Box<dyn FrameSerializer>, FramingError> {
    create_with_preallocate(version, false)
}

/// As [`create`], but with `preallocateFrameSizeField` set on construction.
pub fn create_with_preallocate(
    version: ProtocolVersion,
    preallocate_frame_size_field: bool,
) -> Result<Box<dyn FrameSerializer>, FramingError> {
    if version == v1_0::SerializerV1_0::VERSION {
        Ok(Box::new(v1_0::SerializerV1_0::new(preallocate_frame_size_field)))
    } else {
        Err(FramingError::VersionMismatch)
    }
}

/// Tries each known serializer's `detect_protocol_version` against the first
/// frame of a connection (after skipping `skip_bytes`, e.g. a stripped
/// transport length prefix), returning the first match.
pub fn create_autodetected(first_frame: &Bytes, skip_bytes: usize) -> Result<Box<dyn FrameSerializer>, FramingError> {
    let version = v1_0::SerializerV1_0::detect_protocol_version(first_frame, skip_bytes);
    if version.is_unknown() {
        return Err(FramingError::VersionMismatch);
    }
    create(version)
}
