//! Construction-time scope validation for ERROR frames.
//!
//! The trimmed v1.0 wire format does not put ERROR on the wire, but the
//! connection-vs-stream scoping contract is part of the protocol and applies
//! unchanged once a broker profile reintroduces it — kept here so that
//! profile is a drop-in consumer rather than a rewrite.

use std::fmt;

use crate::error::FramingError;

/// The ERROR frame's error code, split by the scope it is legal on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorFrameKind {
    /// Connection-scoped: must carry stream id 0.
    InvalidSetup,
    UnsupportedSetup,
    RejectedSetup,
    RejectedResume,
    ConnectionError,
    /// Stream-scoped: must carry a nonzero stream id.
    ApplicationError,
    Rejected,
    Canceled,
    Invalid,
}

impl ErrorFrameKind {
    #[must_use]
    pub fn is_connection_scoped(self) -> bool {
        matches!(
            self,
            ErrorFrameKind::InvalidSetup
                | ErrorFrameKind::UnsupportedSetup
                | ErrorFrameKind::RejectedSetup
                | ErrorFrameKind::RejectedResume
                | ErrorFrameKind::ConnectionError
        )
    }
}

impl fmt::Display for ErrorFrameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorFrameKind::InvalidSetup => "INVALID_SETUP",
            ErrorFrameKind::UnsupportedSetup => "UNSUPPORTED_SETUP",
            ErrorFrameKind::RejectedSetup => "REJECTED_SETUP",
            ErrorFrameKind::RejectedResume => "REJECTED_RESUME",
            ErrorFrameKind::ConnectionError => "CONNECTION_ERROR",
            ErrorFrameKind::ApplicationError => "APPLICATION_ERROR",
            ErrorFrameKind::Rejected => "REJECTED",
            ErrorFrameKind::Canceled => "CANCELED",
            ErrorFrameKind::Invalid => "INVALID",
        };
        write!(f, "{name}")
    }
}

/// A validated `(kind, streamId)` pair for an ERROR frame header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ErrorFrameHeader {
    pub kind: ErrorFrameKind,
    pub stream_id: u32,
}

impl ErrorFrameHeader {
    /// Builds a connection-scoped error header (stream id 0).
    pub fn connection(kind: ErrorFrameKind) -> Result<Self, FramingError> {
        if !kind.is_connection_scoped() {
            return Err(FramingError::InvalidArgument(format!("{kind} is not connection-scoped")));
        }
        Ok(Self { kind, stream_id: 0 })
    }

    /// Builds a stream-scoped error header. Fails if `stream_id == 0`.
    pub fn stream(kind: ErrorFrameKind, stream_id: u32) -> Result<Self, FramingError> {
        if kind.is_connection_scoped() {
            return Err(FramingError::InvalidArgument(format!("{kind} is not stream-scoped")));
        }
        if stream_id == 0 {
            return Err(FramingError::InvalidArgument(
                "stream-scoped error frame must not carry stream id 0".to_string(),
            ));
        }
        Ok(Self { kind, stream_id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connection_scoped_errors_require_stream_zero() {
        let header = ErrorFrameHeader::connection(ErrorFrameKind::InvalidSetup).unwrap();
        assert_eq!(header.stream_id, 0);
        assert!(ErrorFrameHeader::connection(ErrorFrameKind::Canceled).is_err());
    }

    #[test]
    fn stream_scoped_errors_reject_stream_zero() {
        assert!(ErrorFrameHeader::stream(ErrorFrameKind::Canceled, 0).is_err());
        let header = ErrorFrameHeader::stream(ErrorFrameKind::Canceled, 7).unwrap();
        assert_eq!(header.stream_id, 7);
        assert!(ErrorFrameHeader::stream(ErrorFrameKind::ConnectionError, 7).is_err());
    }
}
