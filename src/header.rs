//! The 6-byte frame header: stream id plus a packed type/flags word.

use bytes::Bytes;
use std::fmt;

use crate::error::FramingError;
use crate::primitive::{Cursor, FrameQueue};

/// Size in bytes of the header on the wire.
pub const HEADER_SIZE: usize = 6;

/// The frame kind, as carried in the header's low 6 bits.
///
/// Any wire value above `0x06` decodes to [`FrameType::Undefined`] rather
/// than raising an error — an unrecognized frame type is traffic a future
/// version might send, not a malformed stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum FrameType {
    Undefined = 0x00,
    BrokerSetup = 0x01,
    DestinationSetup = 0x02,
    Destination = 0x03,
    Group = 0x04,
    Broadcast = 0x05,
    Shard = 0x06,
}

impl FrameType {
    #[must_use]
    pub fn from_wire(code: u8) -> Self {
        match code {
            0x01 => FrameType::BrokerSetup,
            0x02 => FrameType::DestinationSetup,
            0x03 => FrameType::Destination,
            0x04 => FrameType::Group,
            0x05 => FrameType::Broadcast,
            0x06 => FrameType::Shard,
            _ => FrameType::Undefined,
        }
    }

    #[must_use]
    pub fn to_wire(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for FrameType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FrameType::Undefined => "UNDEFINED",
            FrameType::BrokerSetup => "BROKER_SETUP",
            FrameType::DestinationSetup => "DESTINATION_SETUP",
            FrameType::Destination => "DESTINATION",
            FrameType::Group => "GROUP",
            FrameType::Broadcast => "BROADCAST",
            FrameType::Shard => "SHARD",
        };
        write!(f, "{name}")
    }
}

/// The raw 10-bit flag word. Bit meaning is frame-type scoped — per
/// DESIGN.md this stays a bare bitset with named masks plus per-frame-type
/// accessor methods, rather than a single enum of differently-named
/// constants that would collide on the same bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct FrameFlags(pub u16);

impl FrameFlags {
    pub const EMPTY: FrameFlags = FrameFlags(0);
    pub const IGNORE: u16 = 0x200;
    pub const METADATA: u16 = 0x100;
    /// RESUME_ENABLE (BROKER_SETUP) / KEEPALIVE_RESPOND (DESTINATION) /
    /// FOLLOWS (GROUP, BROADCAST, SHARD, payload-carrying request frames) —
    /// one physical bit, three names.
    pub const BIT_0X80: u16 = 0x080;
    /// LEASE (BROKER_SETUP) / COMPLETE (request-channel/payload frames).
    pub const BIT_0X40: u16 = 0x040;
    pub const NEXT: u16 = 0x020;

    pub const RESUME_ENABLE: u16 = Self::BIT_0X80;
    pub const KEEPALIVE_RESPOND: u16 = Self::BIT_0X80;
    pub const FOLLOWS: u16 = Self::BIT_0X80;
    pub const LEASE: u16 = Self::BIT_0X40;
    pub const COMPLETE: u16 = Self::BIT_0X40;

    #[must_use]
    pub fn new(bits: u16) -> Self {
        FrameFlags(bits & 0x3FF)
    }

    #[must_use]
    pub fn has(self, mask: u16) -> bool {
        self.0 & mask != 0
    }

    #[must_use]
    pub fn with(self, mask: u16) -> Self {
        FrameFlags(self.0 | mask)
    }

    #[must_use]
    pub fn without(self, mask: u16) -> Self {
        FrameFlags(self.0 & !mask)
    }

    #[must_use]
    pub fn is_ignore(self) -> bool {
        self.has(Self::IGNORE)
    }

    #[must_use]
    pub fn is_metadata(self) -> bool {
        self.has(Self::METADATA)
    }

    #[must_use]
    pub fn is_resume_enable(self) -> bool {
        self.has(Self::RESUME_ENABLE)
    }

    #[must_use]
    pub fn is_keepalive_respond(self) -> bool {
        self.has(Self::KEEPALIVE_RESPOND)
    }

    #[must_use]
    pub fn is_follows(self) -> bool {
        self.has(Self::FOLLOWS)
    }

    #[must_use]
    pub fn is_lease(self) -> bool {
        self.has(Self::LEASE)
    }

    #[must_use]
    pub fn is_complete(self) -> bool {
        self.has(Self::COMPLETE)
    }

    #[must_use]
    pub fn is_next(self) -> bool {
        self.has(Self::NEXT)
    }
}

/// `FrameHeader { type, flags, streamId }`.
///
/// `stream_id == 0` iff the frame is connection-scoped (BROKER_SETUP,
/// GROUP). Enforced by [`crate::frame::Frame`] constructors, not here: the
/// header alone cannot know which variant it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct FrameHeader {
    pub frame_type: FrameType,
    pub flags: FrameFlags,
    pub stream_id: u32,
}

impl Default for FrameType {
    fn default() -> Self {
        FrameType::Undefined
    }
}

impl FrameHeader {
    #[must_use]
    pub fn new(frame_type: FrameType, flags: FrameFlags, stream_id: u32) -> Self {
        Self { frame_type, flags, stream_id }
    }
}

impl fmt::Display for FrameHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(streamId={}, flags=0x{:03x})", self.frame_type, self.stream_id, self.flags.0)
    }
}

/// Writes `streamId` (i32 BE) then the packed type/flags bytes.
pub fn encode_header(queue: &mut FrameQueue, header: FrameHeader) {
    queue.put_i32(header.stream_id as i32);
    let byte0 = (header.frame_type.to_wire() << 2) | ((header.flags.0 >> 8) as u8);
    let byte1 = (header.flags.0 & 0xFF) as u8;
    queue.put_u8(byte0);
    queue.put_u8(byte1);
}

/// Reads a full header, failing if the wire stream id is negative.
pub fn decode_header(cursor: &mut Cursor<'_>) -> Result<FrameHeader, FramingError> {
    let stream_id = cursor.read_i32()?;
    if stream_id < 0 {
        return Err(FramingError::InvalidStreamId);
    }
    let byte0 = cursor.read_u8()?;
    let byte1 = cursor.read_u8()?;
    let frame_type = FrameType::from_wire(byte0 >> 2);
    let flags = FrameFlags::new((u16::from(byte0 & 0x3) << 8) | u16::from(byte1));
    Ok(FrameHeader { frame_type, flags, stream_id: stream_id as u32 })
}

/// Non-destructive peek of the frame type at byte offset 4 (past the 4-byte
/// stream id). Returns `Undefined` on truncation or an unknown code, never
/// an error — matches `peekFrameType`'s contract.
#[must_use]
pub fn peek_frame_type(buf: &Bytes) -> FrameType {
    let cursor = Cursor::new(buf);
    let mut probe = cursor;
    if probe.skip(4).is_err() {
        return FrameType::Undefined;
    }
    match probe.read_u8() {
        Ok(byte0) => FrameType::from_wire(byte0 >> 2),
        Err(_) => FrameType::Undefined,
    }
}

/// Non-destructive peek of the stream id at bytes `0..4`. Returns `None` on
/// truncation or a negative wire value.
#[must_use]
pub fn peek_stream_id(buf: &Bytes) -> Option<u32> {
    let mut probe = Cursor::new(buf);
    match probe.read_i32() {
        Ok(id) if id >= 0 => Some(id as u32),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_round_trips_through_queue_and_cursor() {
        let header = FrameHeader::new(FrameType::Group, FrameFlags::new(FrameFlags::METADATA), 0);
        let mut queue = FrameQueue::new(HEADER_SIZE);
        encode_header(&mut queue, header);
        let bytes = queue.into_bytes();
        assert_eq!(&bytes[..], &[0x00, 0x00, 0x00, 0x00, 0x11, 0x00]);

        let mut cursor = Cursor::new(&bytes);
        let decoded = decode_header(&mut cursor).unwrap();
        assert_eq!(decoded, header);
    }

    #[test]
    fn negative_stream_id_is_rejected() {
        let bytes = Bytes::from_static(&[0xFF, 0xFF, 0xFF, 0xFF, 0x00, 0x00]);
        let mut cursor = Cursor::new(&bytes);
        assert_eq!(decode_header(&mut cursor).unwrap_err(), FramingError::InvalidStreamId);
    }

    #[test]
    fn unknown_type_code_decodes_to_undefined() {
        let bytes = Bytes::from_static(&[0x00, 0x00, 0x00, 0x01, 0x7F, 0x00]);
        let mut cursor = Cursor::new(&bytes);
        let decoded = decode_header(&mut cursor).unwrap();
        assert_eq!(decoded.frame_type, FrameType::Undefined);
    }

    #[test]
    fn peek_does_not_mutate_and_is_idempotent() {
        let bytes = Bytes::from_static(&[0x00, 0x00, 0x00, 0x07, 0x14, 0x00]);
        assert_eq!(peek_frame_type(&bytes), FrameType::Broadcast);
        assert_eq!(peek_frame_type(&bytes), FrameType::Broadcast);
        assert_eq!(peek_stream_id(&bytes), Some(7));
        assert_eq!(peek_stream_id(&bytes), Some(7));
    }

    #[test]
    fn destination_shares_one_physical_bit_across_three_names() {
        let flags = FrameFlags::new(FrameFlags::FOLLOWS);
        assert!(flags.is_follows());
        assert!(flags.is_keepalive_respond());
        assert!(flags.is_resume_enable());
    }
}
