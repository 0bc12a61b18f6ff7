//! Field-level decoding: the read-side counterpart to [`crate::buf::EventBuffer`].
//!
//! Uses sticky-error semantics: once a read runs past the end of the
//! buffer, every subsequent read returns a default value instead of
//! panicking, and the error is surfaced once at the end via
//! [`FieldReader::finish`]. This keeps decode loops free of `?` on every
//! field while still reporting a truncated payload reliably.

use std::collections::HashMap;

use crate::catalog::BucketObjectAttrs;
use crate::error::TracedError;
use crate::ids::EventId;
use crate::stack::{FormattedStack, RawStack, StackFrame};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("unexpected end of payload")]
    UnexpectedEof,
}

pub struct FieldReader<'a> {
    data: &'a [u8],
    pos: usize,
    err: bool,
}

impl<'a> FieldReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        FieldReader {
            data,
            pos: 0,
            err: false,
        }
    }

    pub fn has_error(&self) -> bool {
        self.err
    }

    pub fn bytes_read(&self) -> usize {
        self.pos
    }

    pub fn finish(self) -> Result<(), DecodeError> {
        if self.err {
            Err(DecodeError::UnexpectedEof)
        } else {
            Ok(())
        }
    }

    fn set_err(&mut self) {
        self.err = true;
    }

    fn ensure(&mut self, n: usize) -> bool {
        if self.err || self.pos + n > self.data.len() {
            self.set_err();
            false
        } else {
            true
        }
    }

    fn read_slice(&mut self, n: usize) -> &'a [u8] {
        if !self.ensure(n) {
            return &[];
        }
        let start = self.pos;
        self.pos += n;
        &self.data[start..self.pos]
    }

    pub fn byte(&mut self) -> u8 {
        if !self.ensure(1) {
            return 0;
        }
        let b = self.data[self.pos];
        self.pos += 1;
        b
    }

    pub fn bool_val(&mut self) -> bool {
        self.byte() != 0
    }

    pub fn bytes(&mut self, n: usize) -> Vec<u8> {
        self.read_slice(n).to_vec()
    }

    pub fn uvarint(&mut self) -> u64 {
        let mut result: u64 = 0;
        let mut shift: u32 = 0;
        loop {
            if self.err {
                return 0;
            }
            let b = self.byte();
            if self.err {
                return 0;
            }
            result |= ((b & 0x7F) as u64) << shift;
            if b & 0x80 == 0 {
                return result;
            }
            shift += 7;
            if shift >= 64 {
                self.set_err();
                return 0;
            }
        }
    }

    pub fn varint(&mut self) -> i64 {
        zigzag_decode_i64(self.uvarint())
    }

    pub fn float32(&mut self) -> f32 {
        let b = self.read_slice(4);
        if b.len() < 4 {
            return 0.0;
        }
        f32::from_le_bytes(b.try_into().unwrap())
    }

    pub fn float64(&mut self) -> f64 {
        let b = self.read_slice(8);
        if b.len() < 8 {
            return 0.0;
        }
        f64::from_le_bytes(b.try_into().unwrap())
    }

    pub fn string(&mut self) -> String {
        let bytes = self.byte_string();
        if self.err {
            return String::new();
        }
        String::from_utf8_lossy(&bytes).into_owned()
    }

    pub fn byte_string(&mut self) -> Vec<u8> {
        let len = self.uvarint() as usize;
        if len == 0 {
            return Vec::new();
        }
        self.read_slice(len).to_vec()
    }

    pub fn opt_string(&mut self) -> Option<String> {
        match self.byte() {
            0 => None,
            _ => Some(self.string()),
        }
    }

    pub fn opt_uvarint(&mut self) -> Option<u64> {
        match self.byte() {
            0 => None,
            _ => Some(self.uvarint()),
        }
    }

    pub fn duration(&mut self) -> std::time::Duration {
        let nanos = self.varint();
        std::time::Duration::from_nanos(nanos.max(0) as u64)
    }

    pub fn time(&mut self) -> chrono::DateTime<chrono::Utc> {
        let secs = self.varint();
        let nanos = self.varint();
        chrono::DateTime::from_timestamp(secs, nanos.max(0) as u32)
            .unwrap_or_else(|| chrono::DateTime::from_timestamp(0, 0).unwrap())
    }

    pub fn uuid(&mut self) -> [u8; 16] {
        let b = self.read_slice(16);
        let mut out = [0u8; 16];
        if b.len() == 16 {
            out.copy_from_slice(b);
        }
        out
    }

    pub fn event_id(&mut self) -> EventId {
        EventId(self.uvarint())
    }

    /// Fixed 8-byte little-endian unsigned integer (see
    /// [`crate::buf::EventBuffer::fixed_u64`]).
    pub fn fixed_u64(&mut self) -> u64 {
        let b = self.read_slice(8);
        if b.len() < 8 {
            return 0;
        }
        u64::from_le_bytes(b.try_into().unwrap())
    }

    pub fn fixed_i64(&mut self) -> i64 {
        zigzag_decode_i64(self.fixed_u64())
    }

    /// `uvarint(depth)` then `depth` varint deltas, first value absolute.
    pub fn stack(&mut self) -> RawStack {
        let depth = self.uvarint() as usize;
        let mut pcs = Vec::with_capacity(depth.min(1024));
        let mut prev: i64 = 0;
        for i in 0..depth {
            let delta = self.varint();
            let pc = if i == 0 { delta } else { prev + delta };
            pcs.push(pc as u64);
            prev = pc;
        }
        RawStack { pcs }
    }

    /// `uvarint(n)` then `n` `(function, file, line)` triples.
    pub fn formatted_stack(&mut self) -> FormattedStack {
        let n = self.uvarint() as usize;
        let mut frames = Vec::with_capacity(n.min(1024));
        for _ in 0..n {
            let function = self.string();
            let file = self.string();
            let line = self.uvarint() as u32;
            frames.push(StackFrame {
                function,
                file,
                line,
            });
        }
        FormattedStack { frames }
    }

    /// `byte 0` for absent; `byte 1, string(message), uvarint(kind),
    /// formatted_stack` for present.
    pub fn err_with_stack(&mut self) -> Option<TracedError> {
        match self.byte() {
            0 => None,
            _ => {
                let message = self.string();
                let kind = self.uvarint();
                let stack = self.formatted_stack();
                Some(TracedError {
                    message,
                    kind,
                    stack,
                })
            }
        }
    }

    /// `uvarint(n)` then `n` `(key, value)` pairs, one value per key.
    pub fn headers(&mut self) -> HashMap<String, String> {
        let n = self.uvarint() as usize;
        let mut headers = HashMap::with_capacity(n.min(1024));
        for _ in 0..n {
            let k = self.string();
            let v = self.string();
            headers.insert(k, v);
        }
        headers
    }

    /// `opt_uvarint(size), opt_string(version), opt_string(etag),
    /// opt_string(content_type)`.
    pub fn bucket_object_attrs(&mut self) -> BucketObjectAttrs {
        BucketObjectAttrs {
            size: self.opt_uvarint(),
            version: self.opt_string(),
            etag: self.opt_string(),
            content_type: self.opt_string(),
        }
    }
}

fn zigzag_decode_i64(u: u64) -> i64 {
    if u & 1 == 0 {
        (u >> 1) as i64
    } else {
        !((u >> 1) as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zigzag_decode_matches_known_values() {
        assert_eq!(zigzag_decode_i64(0), 0);
        assert_eq!(zigzag_decode_i64(1), -1);
        assert_eq!(zigzag_decode_i64(2), 1);
        assert_eq!(zigzag_decode_i64(3), -2);
    }

    #[test]
    fn byte_reads_sequentially_then_sets_sticky_error() {
        let data = [0x42, 0xFF];
        let mut r = FieldReader::new(&data);
        assert_eq!(r.byte(), 0x42);
        assert_eq!(r.byte(), 0xFF);
        assert!(!r.has_error());
        assert_eq!(r.byte(), 0);
        assert!(r.has_error());
    }

    #[test]
    fn sticky_error_poisons_all_subsequent_reads() {
        let data = [0x42];
        let mut r = FieldReader::new(&data);
        assert_eq!(r.byte(), 0x42);
        assert_eq!(r.byte(), 0); // past end
        assert!(r.has_error());
        assert_eq!(r.uvarint(), 0);
        assert_eq!(r.string(), "");
        assert!(r.finish().is_err());
    }

    #[test]
    fn opt_string_and_opt_uvarint_roundtrip_none() {
        let mut r = FieldReader::new(&[0x00, 0x00]);
        assert_eq!(r.opt_string(), None);
        assert_eq!(r.opt_uvarint(), None);
    }

    #[test]
    fn time_decodes_seconds_and_nanos() {
        let mut eb = crate::buf::EventBuffer::with_capacity(16);
        let t = chrono::DateTime::from_timestamp(1_700_000_000, 123_000_000).unwrap();
        eb.time(&t);
        let bytes = eb.freeze();
        let mut r = FieldReader::new(&bytes);
        let decoded = r.time();
        assert_eq!(decoded.timestamp(), 1_700_000_000);
        assert_eq!(decoded.timestamp_subsec_nanos(), 123_000_000);
    }

    #[test]
    fn stack_roundtrips_delta_encoding() {
        let mut eb = crate::buf::EventBuffer::with_capacity(16);
        let stack = RawStack {
            pcs: vec![1000, 1010, 900, 900],
        };
        eb.stack(&stack);
        let bytes = eb.freeze();
        let mut r = FieldReader::new(&bytes);
        assert_eq!(r.stack(), stack);
    }
}
