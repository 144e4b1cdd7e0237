//! Configuration for the one externally-tunable knob this crate exposes.
//!
//! [`FramingConfig`] is never a process-wide singleton: `preallocateFrameSizeField`
//! is a per-serializer knob with no global state, so callers load one and
//! pass it into [`crate::serializer::v1_0::SerializerV1_0::new`] explicitly.

use std::env;

/// Loaded once by the caller (e.g. at connection setup) and handed to a
/// serializer constructor; never read from a global.
#[derive(Debug, Clone, Copy, Default)]
pub struct FramingConfig {
    pub preallocate_frame_size_field: bool,
}

impl FramingConfig {
    #[must_use]
    pub fn load() -> Self {
        Self { preallocate_frame_size_field: get_env("PROTEUS_PREALLOCATE_FRAME_SIZE_FIELD", "false") }
    }
}

fn get_env<T: std::str::FromStr>(key: &str, default: &str) -> T {
    env::var(key)
        .unwrap_or_else(|_| default.to_string())
        .parse()
        .unwrap_or_else(|_| panic!("config error: {key} must be valid"))
}
