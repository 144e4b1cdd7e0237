//! Big-endian primitive codec over chained byte buffers.
//!
//! [`Cursor`] reads; [`FrameQueue`] writes. Both operate on [`bytes::Bytes`],
//! whose `slice()` is an O(1) refcounted sub-range — the zero-copy "byte
//! chain" primitive this layer is built on. An outbound frame is a small, freshly
//! written [`bytes::BytesMut`] prefix (header plus any fixed-width fields)
//! followed by zero or more existing `Bytes` segments inserted by reference,
//! never copied.

use bytes::{BufMut, Bytes, BytesMut};

use crate::error::FramingError;

/// The 24-bit length prefix used for metadata and, at the transport
/// boundary, for whole frames. Values above this cannot be represented.
pub const MAX_24BIT: usize = 0xFF_FFFF;

/// A cursor over a borrowed [`bytes::Bytes`] buffer.
///
/// Reading never mutates or copies the underlying bytes; only `pos`
/// advances. Cloning a `Cursor` (it is `Copy`) is how callers implement
/// non-destructive peeks.
#[derive(Clone, Copy)]
pub struct Cursor<'a> {
    buf: &'a Bytes,
    pos: usize,
}

impl<'a> Cursor<'a> {
    #[must_use]
    pub fn new(buf: &'a Bytes) -> Self {
        Self { buf, pos: 0 }
    }

    #[must_use]
    pub fn total_remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    fn require(&self, n: usize) -> Result<(), FramingError> {
        let available = self.total_remaining();
        if available < n {
            Err(FramingError::Truncated { needed: n, available })
        } else {
            Ok(())
        }
    }

    pub fn skip(&mut self, n: usize) -> Result<(), FramingError> {
        self.require(n)?;
        self.pos += n;
        Ok(())
    }

    pub fn read_u8(&mut self) -> Result<u8, FramingError> {
        self.require(1)?;
        let b = self.buf[self.pos];
        self.pos += 1;
        Ok(b)
    }

    pub fn read_u16(&mut self) -> Result<u16, FramingError> {
        self.require(2)?;
        let b = [self.buf[self.pos], self.buf[self.pos + 1]];
        self.pos += 2;
        Ok(u16::from_be_bytes(b))
    }

    pub fn read_u32(&mut self) -> Result<u32, FramingError> {
        self.require(4)?;
        let mut b = [0u8; 4];
        b.copy_from_slice(&self.buf[self.pos..self.pos + 4]);
        self.pos += 4;
        Ok(u32::from_be_bytes(b))
    }

    pub fn read_i32(&mut self) -> Result<i32, FramingError> {
        self.read_u32().map(|v| v as i32)
    }

    /// Reads a 24-bit big-endian length (the metadata-length encoding).
    pub fn read_u24(&mut self) -> Result<u32, FramingError> {
        self.require(3)?;
        let b0 = self.buf[self.pos] as u32;
        let b1 = self.buf[self.pos + 1] as u32;
        let b2 = self.buf[self.pos + 2] as u32;
        self.pos += 3;
        Ok((b0 << 16) | (b1 << 8) | b2)
    }

    /// Clones out the next `n` bytes as a zero-copy sub-slice and advances
    /// past them.
    pub fn clone_slice(&mut self, n: usize) -> Result<Bytes, FramingError> {
        self.require(n)?;
        let slice = self.buf.slice(self.pos..self.pos + n);
        self.pos += n;
        Ok(slice)
    }

    /// Clones out everything remaining, consuming the cursor's position to
    /// the end.
    pub fn remainder_as_chain(&mut self) -> Bytes {
        let slice = self.buf.slice(self.pos..);
        self.pos = self.buf.len();
        slice
    }
}

/// An outbound frame under construction: a small mutable prefix (header plus
/// any fixed-width fields) followed by zero-copy-inserted payload segments.
///
/// When `headroom > 0`, the first `headroom` bytes of the prefix are
/// reserved zero bytes that an external transport can patch in place with a
/// frame-length field after the whole frame has been assembled (see
/// [`FrameQueue::patch_headroom`]).
pub struct FrameQueue {
    headroom: usize,
    prefix: BytesMut,
    segments: Vec<Bytes>,
}

impl FrameQueue {
    /// A queue with no reserved headroom, sized to hold `prefix_capacity`
    /// bytes of header/fixed fields before any payload segments are pushed.
    #[must_use]
    pub fn new(prefix_capacity: usize) -> Self {
        Self { headroom: 0, prefix: BytesMut::with_capacity(prefix_capacity), segments: Vec::new() }
    }

    /// A queue that reserves `headroom` leading zero bytes in the prefix,
    /// in addition to `prefix_capacity` bytes for the header/fixed fields
    /// that follow.
    #[must_use]
    pub fn with_headroom(prefix_capacity: usize, headroom: usize) -> Self {
        let mut prefix = BytesMut::with_capacity(headroom + prefix_capacity);
        prefix.put_bytes(0, headroom);
        Self { headroom, prefix, segments: Vec::new() }
    }

    pub fn put_u8(&mut self, v: u8) {
        self.prefix.put_u8(v);
    }

    pub fn put_i32(&mut self, v: i32) {
        self.prefix.put_i32(v);
    }

    pub fn put_u32(&mut self, v: u32) {
        self.prefix.put_u32(v);
    }

    /// Writes a 24-bit big-endian length. Callers must validate `v <=
    /// MAX_24BIT` themselves (see [`crate::payload::encode_payload`]).
    pub fn put_u24(&mut self, v: u32) {
        self.prefix.put_u8((v >> 16) as u8);
        self.prefix.put_u8((v >> 8) as u8);
        self.prefix.put_u8(v as u8);
    }

    /// Inserts an existing byte chain by reference (a refcounted clone, not
    /// a copy) as the next segment.
    pub fn insert_chain(&mut self, chain: Bytes) {
        if !chain.is_empty() {
            self.segments.push(chain);
        }
    }

    #[must_use]
    pub fn total_len(&self) -> usize {
        self.prefix.len() + self.segments.iter().map(Bytes::len).sum::<usize>()
    }

    #[must_use]
    pub fn headroom(&self) -> usize {
        self.headroom
    }

    /// Overwrites the reserved headroom bytes in place. `bytes.len()` must
    /// equal [`FrameQueue::headroom`].
    ///
    /// # Panics
    ///
    /// Panics if `bytes.len()` does not match the reserved headroom size.
    pub fn patch_headroom(&mut self, bytes: &[u8]) {
        assert_eq!(bytes.len(), self.headroom, "headroom patch size mismatch");
        self.prefix[..self.headroom].copy_from_slice(bytes);
    }

    /// Consumes the queue, returning its segments in wire order: the prefix
    /// (header + fixed fields, with any patched headroom) first, then each
    /// inserted payload chain.
    #[must_use]
    pub fn into_segments(self) -> Vec<Bytes> {
        let mut out = Vec::with_capacity(1 + self.segments.len());
        out.push(self.prefix.freeze());
        out.extend(self.segments);
        out
    }

    /// Flattens the queue into one contiguous buffer. This is a copy of the
    /// payload segments and exists for callers (tests, simple in-memory
    /// uses) that want a single `Bytes` rather than a vectored write.
    #[must_use]
    pub fn into_bytes(self) -> Bytes {
        let total = self.total_len();
        let mut out = BytesMut::with_capacity(total);
        for seg in self.into_segments() {
            out.extend_from_slice(&seg);
        }
        out.freeze()
    }
}
