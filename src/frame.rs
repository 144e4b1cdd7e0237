//! The closed set of frame values, one variant per kind, each validated at
//! construction rather than trusted from wherever it came from.
//!
//! A single sum type with one `serialize`/`deserialize` entry point (see
//! [`crate::serializer`]) was chosen over one method per variant on an
//! abstract serializer, favoring exhaustive matching.

use std::fmt;

use bytes::Bytes;

use crate::error::FramingError;
use crate::header::{FrameFlags, FrameHeader, FrameType};
use crate::payload::Payload;

/// The platform's maximum positive signed 32-bit request count —
/// `Frame_BROKER_SETUP::kMaxRequestN` in the original, itself
/// `std::numeric_limits<int32_t>::max()`.
pub const MAX_REQUEST_N: u32 = i32::MAX as u32;

/// Masks `requested` down to `allowed_beyond_metadata` plus, when
/// `has_metadata`, the METADATA bit — and only that bit, added or removed to
/// match payload presence. `IGNORE` is **not** implicitly allowed here: only
/// `BROKER_SETUP` lists it in its allowed-flags set, so callers for the
/// other variants must not (and do not) pass it in.
fn masked_flags(requested: FrameFlags, allowed_beyond_metadata: u16, has_metadata: bool) -> FrameFlags {
    let mut allowed = allowed_beyond_metadata;
    if has_metadata {
        allowed |= FrameFlags::METADATA;
    }
    let mut bits = requested.0 & allowed;
    if has_metadata {
        bits |= FrameFlags::METADATA;
    } else {
        bits &= !FrameFlags::METADATA;
    }
    FrameFlags::new(bits)
}

fn check_metadata_consistency(flags: FrameFlags, payload: &Payload) -> Result<(), FramingError> {
    if flags.is_metadata() != payload.metadata.is_some() {
        return Err(FramingError::InvalidArgument(
            "header METADATA flag disagrees with payload metadata presence".to_string(),
        ));
    }
    Ok(())
}

/// One value per frame kind on the wire; header fields are folded into each
/// variant rather than stored alongside it, since a `Frame`'s header is
/// wholly determined by its variant and fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    BrokerSetup { flags: FrameFlags, stream_id: u32, request_n: u32 },
    DestinationSetup { flags: FrameFlags, stream_id: u32, payload: Payload },
    Destination { flags: FrameFlags, stream_id: u32, payload: Payload },
    Group { metadata: Bytes },
    Broadcast { stream_id: u32 },
    Shard { stream_id: u32 },
}

impl Frame {
    /// Validates `requestN` bounds and constructs a `BROKER_SETUP`.
    /// `stream_id` is caller-supplied and not forced to zero — only `GROUP`
    /// hardcodes its stream id.
    pub fn broker_setup(flags: FrameFlags, stream_id: u32, request_n: u32) -> Result<Self, FramingError> {
        if request_n == 0 || request_n > MAX_REQUEST_N {
            return Err(FramingError::InvalidArgument(format!(
                "requestN {request_n} out of range (1..={MAX_REQUEST_N})"
            )));
        }
        let flags =
            masked_flags(flags, FrameFlags::RESUME_ENABLE | FrameFlags::LEASE | FrameFlags::IGNORE, false);
        Ok(Frame::BrokerSetup { flags, stream_id, request_n })
    }

    /// Validates the stream id and metadata-flag consistency, and constructs
    /// a `DESTINATION_SETUP`.
    pub fn destination_setup(flags: FrameFlags, stream_id: u32, payload: Payload) -> Result<Self, FramingError> {
        require_positive_stream_id(stream_id)?;
        let flags = masked_flags(flags, FrameFlags::FOLLOWS, payload.metadata.is_some());
        check_metadata_consistency(flags, &payload)?;
        Ok(Frame::DestinationSetup { flags, stream_id, payload })
    }

    /// Validates the stream id and metadata-flag consistency, and constructs
    /// a `DESTINATION`. `RESUME_ENABLE` and
    /// `FOLLOWS`/`KEEPALIVE_RESPOND` share the same physical bit (`0x80`);
    /// passing `RESUME_ENABLE` here sets that bit, but `DESTINATION` has no
    /// `is_resume_enable`-flavored meaning of its own — read it back with
    /// [`FrameFlags::is_follows`] or [`FrameFlags::is_keepalive_respond`].
    pub fn destination(flags: FrameFlags, stream_id: u32, payload: Payload) -> Result<Self, FramingError> {
        require_positive_stream_id(stream_id)?;
        let flags = masked_flags(flags, FrameFlags::FOLLOWS, payload.metadata.is_some());
        check_metadata_consistency(flags, &payload)?;
        Ok(Frame::Destination { flags, stream_id, payload })
    }

    /// Constructs a connection-scoped `GROUP`. Metadata
    /// must be non-empty: an empty chain is rejected here at construction,
    /// and an empty remainder is rejected at decode (see `serializer`).
    pub fn group(metadata: Bytes) -> Result<Self, FramingError> {
        if metadata.is_empty() {
            return Err(FramingError::InvalidArgument("GROUP metadata must not be empty".to_string()));
        }
        Ok(Frame::Group { metadata })
    }

    pub fn broadcast(stream_id: u32) -> Result<Self, FramingError> {
        require_positive_stream_id(stream_id)?;
        Ok(Frame::Broadcast { stream_id })
    }

    pub fn shard(stream_id: u32) -> Result<Self, FramingError> {
        require_positive_stream_id(stream_id)?;
        Ok(Frame::Shard { stream_id })
    }

    #[must_use]
    pub fn frame_type(&self) -> FrameType {
        match self {
            Frame::BrokerSetup { .. } => FrameType::BrokerSetup,
            Frame::DestinationSetup { .. } => FrameType::DestinationSetup,
            Frame::Destination { .. } => FrameType::Destination,
            Frame::Group { .. } => FrameType::Group,
            Frame::Broadcast { .. } => FrameType::Broadcast,
            Frame::Shard { .. } => FrameType::Shard,
        }
    }

    #[must_use]
    pub fn stream_id(&self) -> u32 {
        match self {
            Frame::Group { .. } => 0,
            Frame::BrokerSetup { stream_id, .. }
            | Frame::DestinationSetup { stream_id, .. }
            | Frame::Destination { stream_id, .. }
            | Frame::Broadcast { stream_id }
            | Frame::Shard { stream_id } => *stream_id,
        }
    }

    /// Assembles the [`FrameHeader`] implied by this value's variant and
    /// fields. The header is derived, not stored, so it can never drift out
    /// of sync with the frame it describes.
    #[must_use]
    pub fn header(&self) -> FrameHeader {
        let flags = match self {
            Frame::BrokerSetup { flags, .. }
            | Frame::DestinationSetup { flags, .. }
            | Frame::Destination { flags, .. } => *flags,
            Frame::Group { .. } => FrameFlags::new(FrameFlags::METADATA),
            Frame::Broadcast { .. } | Frame::Shard { .. } => FrameFlags::EMPTY,
        };
        FrameHeader::new(self.frame_type(), flags, self.stream_id())
    }
}

fn require_positive_stream_id(stream_id: u32) -> Result<(), FramingError> {
    if stream_id == 0 {
        return Err(FramingError::InvalidArgument(
            "stream-scoped frame must not carry stream id 0".to_string(),
        ));
    }
    Ok(())
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Frame::BrokerSetup { flags, stream_id, request_n } => {
                write!(f, "BROKER_SETUP(streamId={}, flags=0x{:03x}, requestN={})", stream_id, flags.0, request_n)
            }
            Frame::DestinationSetup { flags, stream_id, payload } => write!(
                f,
                "DESTINATION_SETUP(streamId={}, flags=0x{:03x}, metadata={}B, data={}B)",
                stream_id,
                flags.0,
                payload.metadata.as_ref().map_or(0, Bytes::len),
                payload.data.as_ref().map_or(0, Bytes::len)
            ),
            Frame::Destination { flags, stream_id, payload } => write!(
                f,
                "DESTINATION(streamId={}, flags=0x{:03x}, metadata={}B, data={}B)",
                stream_id,
                flags.0,
                payload.metadata.as_ref().map_or(0, Bytes::len),
                payload.data.as_ref().map_or(0, Bytes::len)
            ),
            Frame::Group { metadata } => write!(f, "GROUP(metadata={}B)", metadata.len()),
            Frame::Broadcast { stream_id } => write!(f, "BROADCAST(streamId={stream_id})"),
            Frame::Shard { stream_id } => write!(f, "SHARD(streamId={stream_id})"),
        }
    }
}
