//! Event buffer: the growable byte encoder.
//!
//! All multi-byte fixed-width integers are little-endian; variable-length
//! integers use unsigned LEB128 (`uvarint`) with zig-zag for signed values
//! (`varint`). Growth is geometric, delegated to `bytes::BytesMut`.

use bytes::{BufMut, Bytes, BytesMut};
use std::collections::HashMap;

use crate::error::TracedError;
use crate::stack::{FormattedStack, RawStack};

/// A growable buffer for encoding one event payload.
pub struct EventBuffer {
    scratch: [u8; 10],
    buf: BytesMut,
}

impl EventBuffer {
    pub fn with_capacity(hint: usize) -> Self {
        EventBuffer {
            scratch: [0; 10],
            buf: BytesMut::with_capacity(hint),
        }
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn reserve(&mut self, additional: usize) {
        self.buf.reserve(additional);
    }

    /// Consumes the buffer, returning the finished payload bytes.
    pub fn freeze(self) -> Bytes {
        self.buf.freeze()
    }

    #[inline]
    pub fn byte(&mut self, b: u8) {
        self.buf.reserve(1);
        self.buf.put_u8(b);
    }

    #[inline]
    pub fn bytes(&mut self, b: &[u8]) {
        self.buf.reserve(b.len());
        self.buf.extend_from_slice(b);
    }

    #[inline]
    pub fn bool(&mut self, b: bool) {
        self.byte(if b { 1 } else { 0 });
    }

    /// `uvarint`: unsigned LEB128, 7 bits per byte, high bit = continuation.
    #[inline]
    pub fn uvarint(&mut self, mut u: u64) {
        let mut i = 0;
        while u >= 0x80 {
            self.scratch[i] = (u as u8) | 0x80;
            u >>= 7;
            i += 1;
        }
        self.scratch[i] = u as u8;
        i += 1;
        self.buf.extend_from_slice(&self.scratch[..i]);
    }

    /// `varint`: zig-zag encoded signed LEB128.
    #[inline]
    pub fn varint(&mut self, i: i64) {
        self.uvarint(zigzag_encode_i64(i));
    }

    #[inline]
    pub fn byte_string(&mut self, b: &[u8]) {
        self.buf.reserve(10 + b.len());
        self.uvarint(b.len() as u64);
        self.buf.extend_from_slice(b);
    }

    /// Writes a byte string truncated to `max_len`, returning whether
    /// truncation occurred.
    #[inline]
    pub fn truncated_byte_string(&mut self, b: &[u8], max_len: usize) -> bool {
        if b.len() <= max_len {
            self.byte_string(b);
            false
        } else {
            self.byte_string(&b[..max_len]);
            true
        }
    }

    #[inline]
    pub fn string(&mut self, s: &str) {
        self.byte_string(s.as_bytes());
    }

    #[inline]
    pub fn opt_string(&mut self, s: Option<&str>) {
        match s {
            None => self.byte(0),
            Some(s) => {
                self.byte(1);
                self.string(s);
            }
        }
    }

    #[inline]
    pub fn opt_uvarint(&mut self, n: Option<u64>) {
        match n {
            None => self.byte(0),
            Some(n) => {
                self.byte(1);
                self.uvarint(n);
            }
        }
    }

    /// Duration in nanoseconds, as a `varint`.
    #[inline]
    pub fn duration(&mut self, d: std::time::Duration) {
        let nanos = d.as_nanos();
        let nanos: i64 = if nanos > i64::MAX as u128 {
            i64::MAX
        } else {
            nanos as i64
        };
        self.varint(nanos);
    }

    /// Wall-clock time as two varints: seconds since epoch, then nanos.
    #[inline]
    pub fn time(&mut self, t: &chrono::DateTime<chrono::Utc>) {
        self.varint(t.timestamp());
        self.varint(t.timestamp_subsec_nanos() as i64);
    }

    #[inline]
    pub fn float32(&mut self, f: f32) {
        self.buf.extend_from_slice(&f.to_le_bytes());
    }

    #[inline]
    pub fn float64(&mut self, f: f64) {
        self.buf.extend_from_slice(&f.to_le_bytes());
    }

    #[inline]
    pub fn uuid(&mut self, u: &[u8; 16]) {
        self.bytes(u);
    }

    /// Fixed 8-byte little-endian unsigned integer (distinct from
    /// `uvarint`): used only by the HTTP call sub-protocol, which carries
    /// `net/http.ClientTrace` timestamps and a correlation span ID as
    /// fixed-width fields rather than variable-length ones.
    #[inline]
    pub fn fixed_u64(&mut self, u: u64) {
        self.bytes(&u.to_le_bytes());
    }

    /// Zig-zag encoded fixed-width signed 64-bit integer.
    #[inline]
    pub fn fixed_i64(&mut self, i: i64) {
        self.fixed_u64(zigzag_encode_i64(i));
    }

    #[inline]
    pub fn event_id(&mut self, id: crate::ids::EventId) {
        self.uvarint(id.0);
    }

    /// `uvarint(depth)` then `depth` varint deltas, first value absolute.
    #[inline]
    pub fn stack(&mut self, stack: &RawStack) {
        self.uvarint(stack.pcs.len() as u64);
        let mut prev: i64 = 0;
        for (i, &pc) in stack.pcs.iter().enumerate() {
            let pc = pc as i64;
            if i == 0 {
                self.varint(pc);
            } else {
                self.varint(pc - prev);
            }
            prev = pc;
        }
    }

    /// `uvarint(n)` then `n` `(function, file, line)` triples.
    #[inline]
    pub fn formatted_stack(&mut self, stack: &FormattedStack) {
        self.uvarint(stack.frames.len() as u64);
        for frame in &stack.frames {
            self.string(&frame.function);
            self.string(&frame.file);
            self.uvarint(frame.line as u64);
        }
    }

    /// `byte 0` if absent; else `byte 1, string(message), uvarint(kind),
    /// formatted_stack`.
    #[inline]
    pub fn err_with_stack(&mut self, err: Option<&TracedError>) {
        match err {
            None => self.byte(0),
            Some(err) => {
                self.byte(1);
                self.string(&err.message);
                self.uvarint(err.kind);
                self.formatted_stack(&err.stack);
            }
        }
    }

    /// `uvarint(n)` then per entry `string(key), string(first_value)`.
    /// Only the first value of a multi-valued header is emitted.
    #[inline]
    pub fn headers(&mut self, headers: &HashMap<String, Vec<String>>) {
        self.uvarint(headers.len() as u64);
        for (k, v) in headers {
            self.string(k);
            self.string(v.first().map(|s| s.as_str()).unwrap_or(""));
        }
    }

    /// `opt_uvarint(size), opt_string(version), opt_string(etag),
    /// opt_string(content_type)`.
    #[inline]
    pub fn bucket_object_attrs(&mut self, attrs: &crate::catalog::BucketObjectAttrs) {
        self.opt_uvarint(attrs.size);
        self.opt_string(attrs.version.as_deref());
        self.opt_string(attrs.etag.as_deref());
        self.opt_string(attrs.content_type.as_deref());
    }
}

#[inline]
pub(crate) fn zigzag_encode_i64(i: i64) -> u64 {
    ((i << 1) ^ (i >> 63)) as u64
}
