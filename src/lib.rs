//! Wire framing for the Proteus broker protocol.
//!
//! Bit-exact serialization, deserialization and structural validation of
//! frames on a shared byte stream, plus protocol-version autodetection on a
//! connection's first frame. The underlying byte-stream transport,
//! stream-automaton logic and application payload semantics are out of
//! scope — see [`codec::ProteusCodec`] for the minimal, swappable bridge to
//! a `tokio_util`-based transport.

pub mod codec;
pub mod config;
pub mod error;
pub mod error_frame;
pub mod frame;
pub mod header;
pub mod payload;
pub mod primitive;
pub mod serializer;
pub mod stream_type;
pub mod version;

pub use error::FramingError;
pub use frame::Frame;
pub use header::{FrameFlags, FrameHeader, FrameType};
pub use payload::Payload;
pub use serializer::{v1_0::SerializerV1_0, FrameSerializer};
pub use version::ProtocolVersion;
