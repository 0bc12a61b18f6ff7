//! Reader/framing: the outermost wire envelope a consumer sees.
//!
//! ```text
//! "TRC2" | uvarint(version) | record* (EOF-terminated)
//! record = byte(kind) bytes(trace_id,16) bytes(span_id,8)
//!          uvarint(event_id) uvarint(ts_nanos)
//!          uvarint(payload_len) bytes(payload)
//! ```

use bytes::{Bytes, BytesMut};

use crate::catalog::EventKind;
use crate::ids::{EventId, SpanId, TraceId};
use crate::log::QueuedEvent;
use crate::reader::FieldReader;

pub const MAGIC: [u8; 4] = *b"TRC2";
pub const VERSION: u64 = 1;

/// Appends the stream header (`"TRC2"` + version) to `out`.
pub fn write_header(out: &mut BytesMut) {
    out.extend_from_slice(&MAGIC);
    let mut scratch = [0u8; 10];
    let mut v = VERSION;
    let mut i = 0;
    while v >= 0x80 {
        scratch[i] = (v as u8) | 0x80;
        v >>= 7;
        i += 1;
    }
    scratch[i] = v as u8;
    out.extend_from_slice(&scratch[..i + 1]);
}

/// Appends one framed record for `event` to `out`.
pub fn write_record(out: &mut BytesMut, event: &QueuedEvent) {
    let mut eb = crate::buf::EventBuffer::with_capacity(32 + event.payload.len());
    eb.byte(event.kind.tag());
    eb.bytes(&event.trace.0);
    eb.bytes(&event.span.0);
    eb.event_id(event.event_id);
    eb.uvarint(event.ts_nanos);
    eb.byte_string(&event.payload);
    out.extend_from_slice(&eb.freeze());
}

/// Encodes a full stream (header followed by every event in order).
pub fn encode_stream<'a>(events: impl IntoIterator<Item = &'a QueuedEvent>) -> Bytes {
    let mut out = BytesMut::new();
    write_header(&mut out);
    for event in events {
        write_record(&mut out, event);
    }
    out.freeze()
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum FrameError {
    #[error("stream too short for the magic/version header")]
    TruncatedHeader,
    #[error("bad magic bytes: expected \"TRC2\"")]
    BadMagic,
    #[error("unsupported wire version {0}")]
    UnsupportedVersion(u64),
    #[error("truncated record")]
    TruncatedRecord,
}

/// A decoded record with its envelope fields intact and its payload left
/// as opaque bytes for a kind-specific decoder to interpret.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord {
    pub kind: EventKind,
    pub trace: TraceId,
    pub span: SpanId,
    pub event_id: EventId,
    pub ts_nanos: u64,
    pub payload: Vec<u8>,
}

/// Parses a complete in-memory byte stream into its header and records.
///
/// Unknown kind tags are skipped with their payload intact rather than
/// aborting the whole stream, so a consumer built against an older catalog
/// can still read a stream containing newer kinds it doesn't recognize.
pub struct FrameReader<'a> {
    r: FieldReader<'a>,
    pub version: u64,
}

impl<'a> FrameReader<'a> {
    pub fn new(data: &'a [u8]) -> Result<Self, FrameError> {
        if data.len() < 4 {
            return Err(FrameError::TruncatedHeader);
        }
        if data[0..4] != MAGIC {
            return Err(FrameError::BadMagic);
        }
        let mut r = FieldReader::new(&data[4..]);
        let version = r.uvarint();
        if r.has_error() {
            return Err(FrameError::TruncatedHeader);
        }
        if version != VERSION {
            return Err(FrameError::UnsupportedVersion(version));
        }
        Ok(FrameReader { r, version })
    }

    /// Returns the next record, `Ok(None)` at a clean end of stream, or an
    /// error if the stream is truncated mid-record.
    pub fn next_record(&mut self) -> Result<Option<RawRecord>, FrameError> {
        let kind_byte = self.r.byte();
        if self.r.has_error() {
            return Ok(None);
        }
        let kind = match EventKind::try_from(kind_byte) {
            Ok(k) => k,
            Err(_) => {
                // Unknown kind: still parse the envelope so we can skip
                // the payload and keep reading.
                let _trace = self.r.bytes(16);
                let _span = self.r.bytes(8);
                let _event_id = self.r.event_id();
                let _ts = self.r.uvarint();
                let _payload = self.r.byte_string();
                if self.r.has_error() {
                    return Err(FrameError::TruncatedRecord);
                }
                return self.next_record();
            }
        };
        let trace_bytes = self.r.bytes(16);
        let span_bytes = self.r.bytes(8);
        let event_id = self.r.event_id();
        let ts_nanos = self.r.uvarint();
        let payload = self.r.byte_string();
        if self.r.has_error() {
            return Err(FrameError::TruncatedRecord);
        }
        let mut trace = [0u8; 16];
        trace.copy_from_slice(&trace_bytes);
        let mut span = [0u8; 8];
        span.copy_from_slice(&span_bytes);
        Ok(Some(RawRecord {
            kind,
            trace: TraceId(trace),
            span: SpanId(span),
            event_id,
            ts_nanos,
            payload,
        }))
    }

    pub fn collect_all(mut self) -> Result<Vec<RawRecord>, FrameError> {
        let mut out = Vec::new();
        while let Some(record) = self.next_record()? {
            out.push(record);
        }
        Ok(out)
    }
}
