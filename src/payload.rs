//! Optional metadata-then-data payload shared by `DESTINATION_SETUP`,
//! `DESTINATION` and (implicitly, as metadata-only) `GROUP`.

use bytes::Bytes;

use crate::error::FramingError;
use crate::header::FrameFlags;
use crate::primitive::{Cursor, FrameQueue, MAX_24BIT};

/// `Payload { data, metadata }` — either or both may be absent.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Payload {
    pub data: Option<Bytes>,
    pub metadata: Option<Bytes>,
}

impl Payload {
    #[must_use]
    pub fn new(data: Option<Bytes>, metadata: Option<Bytes>) -> Self {
        Self { data, metadata }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_none() && self.metadata.is_none()
    }
}

/// Writes `[24-bit metadata length][metadata]` when metadata is present
/// (gated by the header's METADATA flag, not by `payload.metadata` alone —
/// callers derive the flag from the payload before calling this), then the
/// data chain verbatim.
pub fn encode_payload(queue: &mut FrameQueue, flags: FrameFlags, payload: &Payload) -> Result<(), FramingError> {
    if flags.is_metadata() {
        let metadata = payload.metadata.clone().unwrap_or_default();
        if metadata.len() > MAX_24BIT {
            return Err(FramingError::MetadataOverflow { len: metadata.len() });
        }
        queue.put_u24(metadata.len() as u32);
        queue.insert_chain(metadata);
    }
    if let Some(data) = &payload.data {
        queue.insert_chain(data.clone());
    }
    Ok(())
}

/// Reads metadata (if `flags` carries METADATA) then clones the remainder
/// of the cursor as data. A zero-length remainder after metadata leaves
/// `data = None`.
pub fn decode_payload(cursor: &mut Cursor<'_>, flags: FrameFlags) -> Result<Payload, FramingError> {
    let metadata = if flags.is_metadata() {
        let len = cursor.read_u24()? as usize;
        Some(cursor.clone_slice(len)?)
    } else {
        None
    };
    let remainder = cursor.remainder_as_chain();
    let data = if remainder.is_empty() { None } else { Some(remainder) };
    Ok(Payload { data, metadata })
}
