//! Mapping from RSocket request-frame kind to the stream shape an upstream
//! automaton uses to pick flow-control behavior.
//!
//! These request-frame kinds (`REQUEST_STREAM`, `REQUEST_CHANNEL`, ...) are
//! inherited from the underlying RSocket transport and are not part of this
//! crate's own [`crate::header::FrameType`] set — the broker profile's
//! trimmed v1.0 wire format carries none of them directly, but the contract
//! is retained for when stream automata need it, exactly as the error-frame
//! helpers in [`crate::error_frame`] are retained for a profile that adds
//! ERROR back.

use std::fmt;

/// An RSocket request-frame kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestFrameType {
    RequestStream,
    RequestChannel,
    RequestResponse,
    RequestFnf,
}

/// The stream shape a request establishes, as consumed by flow-control and
/// request-accounting logic upstream of this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StreamType {
    Stream,
    Channel,
    RequestResponse,
    Fnf,
}

impl fmt::Display for StreamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StreamType::Stream => "STREAM",
            StreamType::Channel => "CHANNEL",
            StreamType::RequestResponse => "REQUEST_RESPONSE",
            StreamType::Fnf => "FNF",
        };
        write!(f, "{name}")
    }
}

/// Total mapping request-frame-type → stream-type. There is no "other"
/// input once the request-frame-type enum is exhausted; this is not a
/// partial function.
#[must_use]
pub fn stream_type_for(request_frame_type: RequestFrameType) -> StreamType {
    match request_frame_type {
        RequestFrameType::RequestStream => StreamType::Stream,
        RequestFrameType::RequestChannel => StreamType::Channel,
        RequestFrameType::RequestResponse => StreamType::RequestResponse,
        RequestFrameType::RequestFnf => StreamType::Fnf,
    }
}
