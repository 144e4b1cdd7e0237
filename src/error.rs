//! Errors raised while constructing, encoding or decoding frames.

use std::fmt;

/// Everything that can go wrong in the framing layer.
///
/// Decode failures are modeled as `Err` rather than a boolean success flag
/// with an out-parameter — see DESIGN.md for why. An unrecognized wire
/// frame-type code is *not* an error here: it decodes to
/// [`crate::FrameType::Undefined`] without a `FramingError`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FramingError {
    /// Construction-time invariant violation (flag/payload mismatch, a
    /// stream-scoped error frame with stream id 0, an out-of-range
    /// `requestN`, ...).
    InvalidArgument(String),
    /// A read ran past the end of the available bytes.
    Truncated { needed: usize, available: usize },
    /// The wire stream id decoded as negative.
    InvalidStreamId,
    /// A metadata chain is too long to fit the 24-bit length prefix.
    MetadataOverflow { len: usize },
    /// No known serializer matches the requested or autodetected version.
    VersionMismatch,
}

impl fmt::Display for FramingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FramingError::InvalidArgument(msg) => write!(f, "invalid argument: {msg}"),
            FramingError::Truncated { needed, available } => {
                write!(f, "truncated frame: needed {needed} bytes, had {available}")
            }
            FramingError::InvalidStreamId => write!(f, "negative stream id on the wire"),
            FramingError::MetadataOverflow { len } => {
                write!(f, "metadata length {len} exceeds the 24-bit field")
            }
            FramingError::VersionMismatch => write!(f, "no serializer matches the protocol version"),
        }
    }
}

impl std::error::Error for FramingError {}

impl From<std::io::Error> for FramingError {
    fn from(error: std::io::Error) -> Self {
        FramingError::InvalidArgument(error.to_string())
    }
}
