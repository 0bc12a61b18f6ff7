//! Event catalog: the closed, stable tag-to-kind map.
//!
//! Tag values are part of the wire contract and must never be renumbered;
//! [`tests::tag_values_match_spec`] pins every one of them literally so a
//! future edit that reorders the enum trips a test instead of silently
//! drifting the wire format.

use std::collections::HashMap;

/// A 1-byte event kind tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum EventKind {
    RequestSpanStart = 0x01,
    RequestSpanEnd = 0x02,
    AuthSpanStart = 0x03,
    AuthSpanEnd = 0x04,
    PubsubMessageSpanStart = 0x05,
    PubsubMessageSpanEnd = 0x06,
    DBTransactionStart = 0x07,
    DBTransactionEnd = 0x08,
    DBQueryStart = 0x09,
    DBQueryEnd = 0x0A,
    RPCCallStart = 0x0B,
    RPCCallEnd = 0x0C,
    HTTPCallStart = 0x0D,
    HTTPCallEnd = 0x0E,
    LogMessage = 0x0F,
    PubsubPublishStart = 0x10,
    PubsubPublishEnd = 0x11,
    ServiceInitStart = 0x12,
    ServiceInitEnd = 0x13,
    CacheCallStart = 0x14,
    CacheCallEnd = 0x15,
    BodyStream = 0x16,
    TestStart = 0x17,
    TestEnd = 0x18,
    BucketObjectUploadStart = 0x19,
    BucketObjectUploadEnd = 0x1A,
    BucketObjectDownloadStart = 0x1B,
    BucketObjectDownloadEnd = 0x1C,
    BucketObjectGetAttrsStart = 0x1D,
    BucketObjectGetAttrsEnd = 0x1E,
    BucketListObjectsStart = 0x1F,
    BucketListObjectsEnd = 0x20,
    BucketDeleteObjectsStart = 0x21,
    BucketDeleteObjectsEnd = 0x22,
}

impl EventKind {
    pub fn tag(self) -> u8 {
        self as u8
    }

    /// Whether this kind starts a span (as opposed to ending one or being
    /// a self-contained inner-operation event).
    pub fn is_span_start(self) -> bool {
        matches!(
            self,
            EventKind::RequestSpanStart
                | EventKind::AuthSpanStart
                | EventKind::PubsubMessageSpanStart
                | EventKind::TestStart
        )
    }

    pub fn is_span_end(self) -> bool {
        matches!(
            self,
            EventKind::RequestSpanEnd
                | EventKind::AuthSpanEnd
                | EventKind::PubsubMessageSpanEnd
                | EventKind::TestEnd
        )
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown event kind tag: 0x{0:02x}")]
pub struct UnknownEventKind(pub u8);

impl TryFrom<u8> for EventKind {
    type Error = UnknownEventKind;

    fn try_from(b: u8) -> Result<Self, Self::Error> {
        use EventKind::*;
        Ok(match b {
            0x01 => RequestSpanStart,
            0x02 => RequestSpanEnd,
            0x03 => AuthSpanStart,
            0x04 => AuthSpanEnd,
            0x05 => PubsubMessageSpanStart,
            0x06 => PubsubMessageSpanEnd,
            0x07 => DBTransactionStart,
            0x08 => DBTransactionEnd,
            0x09 => DBQueryStart,
            0x0A => DBQueryEnd,
            0x0B => RPCCallStart,
            0x0C => RPCCallEnd,
            0x0D => HTTPCallStart,
            0x0E => HTTPCallEnd,
            0x0F => LogMessage,
            0x10 => PubsubPublishStart,
            0x11 => PubsubPublishEnd,
            0x12 => ServiceInitStart,
            0x13 => ServiceInitEnd,
            0x14 => CacheCallStart,
            0x15 => CacheCallEnd,
            0x16 => BodyStream,
            0x17 => TestStart,
            0x18 => TestEnd,
            0x19 => BucketObjectUploadStart,
            0x1A => BucketObjectUploadEnd,
            0x1B => BucketObjectDownloadStart,
            0x1C => BucketObjectDownloadEnd,
            0x1D => BucketObjectGetAttrsStart,
            0x1E => BucketObjectGetAttrsEnd,
            0x1F => BucketListObjectsStart,
            0x20 => BucketListObjectsEnd,
            0x21 => BucketDeleteObjectsStart,
            0x22 => BucketDeleteObjectsEnd,
            other => return Err(UnknownEventKind(other)),
        })
    }
}

/// gRPC-style status code carried on every span end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum StatusCode {
    #[default]
    Ok = 0,
    Canceled = 1,
    Unknown = 2,
    InvalidArgument = 3,
    DeadlineExceeded = 4,
    NotFound = 5,
    AlreadyExists = 6,
    PermissionDenied = 7,
    ResourceExhausted = 8,
    FailedPrecondition = 9,
    Aborted = 10,
    OutOfRange = 11,
    Unimplemented = 12,
    Internal = 13,
    Unavailable = 14,
    DataLoss = 15,
    Unauthenticated = 16,
}

impl StatusCode {
    pub fn from_byte(b: u8) -> Self {
        use StatusCode::*;
        match b {
            0 => Ok,
            1 => Canceled,
            2 => Unknown,
            3 => InvalidArgument,
            4 => DeadlineExceeded,
            5 => NotFound,
            6 => AlreadyExists,
            7 => PermissionDenied,
            8 => ResourceExhausted,
            9 => FailedPrecondition,
            10 => Aborted,
            11 => OutOfRange,
            12 => Unimplemented,
            13 => Internal,
            14 => Unavailable,
            15 => DataLoss,
            16 => Unauthenticated,
            _ => Unknown,
        }
    }
}

/// Cache operation outcome (`CacheCallEnd.result_code`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum CacheResult {
    Ok = 1,
    NoSuchKey = 2,
    Conflict = 3,
    Err = 4,
}

impl CacheResult {
    pub fn from_byte(b: u8) -> Option<Self> {
        use CacheResult::*;
        Some(match b {
            1 => Ok,
            2 => NoSuchKey,
            3 => Conflict,
            4 => Err,
            _ => return None,
        })
    }
}

/// Structured log level, wire-compatible with the reference decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum LogLevel {
    Trace = 0,
    Debug = 1,
    Info = 2,
    Warn = 3,
    Error = 4,
}

impl LogLevel {
    pub fn from_byte(b: u8) -> Self {
        use LogLevel::*;
        match b {
            0 => Trace,
            1 => Debug,
            2 => Info,
            3 => Warn,
            4 => Error,
            _ => Trace,
        }
    }
}

/// DB transaction completion kind. The wire form is a single bool
/// (`commit`); this enum is the decoded-side ergonomic type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DbTransactionCompletion {
    Rollback,
    Commit,
}

impl DbTransactionCompletion {
    pub fn commit(self) -> bool {
        matches!(self, DbTransactionCompletion::Commit)
    }

    pub fn from_bool(commit: bool) -> Self {
        if commit {
            DbTransactionCompletion::Commit
        } else {
            DbTransactionCompletion::Rollback
        }
    }
}

/// `opt_uvarint(size), opt_string(version), opt_string(etag),
/// opt_string(content_type)`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BucketObjectAttrs {
    pub size: Option<u64>,
    pub version: Option<String>,
    pub etag: Option<String>,
    pub content_type: Option<String>,
}

/// One entry of an `HTTPCallEnd`'s connection-lifecycle trace: a
/// `net/http.ClientTrace`-shaped timeline of DNS, connect, TLS, and body
/// events observed over the life of one outbound HTTP call.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpTraceEvent {
    /// Nanoseconds since the call started (`HttpCallStart.start_nanotime`).
    pub nanotime: i64,
    pub kind: HttpTraceEventKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum HttpTraceEventKind {
    GetConn { host_port: String },
    GotConn { reused: bool, was_idle: bool, idle_duration_ns: i64 },
    GotFirstResponseByte,
    Got1xxResponse { code: i32 },
    DnsStart { host: String },
    DnsDone { err: Vec<u8>, addrs: Vec<Vec<u8>> },
    ConnectStart { network: String, addr: String },
    ConnectDone { network: String, addr: String, err: Vec<u8> },
    TlsHandshakeStart,
    TlsHandshakeDone {
        err: Vec<u8>,
        tls_version: u32,
        cipher_suite: u32,
        server_name: String,
        negotiated_protocol: String,
    },
    WroteHeaders,
    WroteRequest { err: Vec<u8> },
    Wait100Continue,
    ClosedBody { err: Vec<u8> },
}

impl HttpTraceEventKind {
    pub fn tag(&self) -> u8 {
        match self {
            HttpTraceEventKind::GetConn { .. } => 1,
            HttpTraceEventKind::GotConn { .. } => 2,
            HttpTraceEventKind::GotFirstResponseByte => 3,
            HttpTraceEventKind::Got1xxResponse { .. } => 4,
            HttpTraceEventKind::DnsStart { .. } => 5,
            HttpTraceEventKind::DnsDone { .. } => 6,
            HttpTraceEventKind::ConnectStart { .. } => 7,
            HttpTraceEventKind::ConnectDone { .. } => 8,
            HttpTraceEventKind::TlsHandshakeStart => 9,
            HttpTraceEventKind::TlsHandshakeDone { .. } => 10,
            HttpTraceEventKind::WroteHeaders => 11,
            HttpTraceEventKind::WroteRequest { .. } => 12,
            HttpTraceEventKind::Wait100Continue => 13,
            HttpTraceEventKind::ClosedBody { .. } => 14,
        }
    }
}

/// A single bucket delete-objects entry (`object`, optional `version`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BucketDeleteEntry {
    pub object: String,
    pub version: Option<String>,
}

/// Request/response headers as seen by the encoder: multiple values per key
/// are accepted, but only the first is ever written to the wire (§4.B).
pub type Headers = HashMap<String, Vec<String>>;

/// A typed log field value. This is a closed union rather than a
/// dynamically-dispatched value: a statically typed encoder refuses field
/// kinds outside the union instead of silently falling through to JSON the
/// way a dynamically typed source logger would.
#[derive(Debug, Clone, PartialEq)]
pub enum LogFieldValue {
    Error(crate::error::TracedError),
    String(String),
    Bool(bool),
    Time(chrono::DateTime<chrono::Utc>),
    Duration(std::time::Duration),
    Uuid([u8; 16]),
    /// Pre-serialized JSON bytes, or a classified marshal failure.
    Json {
        data: Vec<u8>,
        err: Option<crate::error::TracedError>,
    },
    Int(i64),
    Uint(u64),
    Float32(f32),
    Float64(f64),
}

impl LogFieldValue {
    pub(crate) fn type_tag(&self) -> u8 {
        match self {
            LogFieldValue::Error(_) => 1,
            LogFieldValue::String(_) => 2,
            LogFieldValue::Bool(_) => 3,
            LogFieldValue::Time(_) => 4,
            LogFieldValue::Duration(_) => 5,
            LogFieldValue::Uuid(_) => 6,
            LogFieldValue::Json { .. } => 7,
            LogFieldValue::Int(_) => 8,
            LogFieldValue::Uint(_) => 9,
            LogFieldValue::Float32(_) => 10,
            LogFieldValue::Float64(_) => 11,
        }
    }
}

/// A single `(key, value)` log field.
#[derive(Debug, Clone, PartialEq)]
pub struct LogField {
    pub key: String,
    pub value: LogFieldValue,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_values_match_spec() {
        assert_eq!(EventKind::RequestSpanStart.tag(), 0x01);
        assert_eq!(EventKind::RequestSpanEnd.tag(), 0x02);
        assert_eq!(EventKind::AuthSpanStart.tag(), 0x03);
        assert_eq!(EventKind::AuthSpanEnd.tag(), 0x04);
        assert_eq!(EventKind::PubsubMessageSpanStart.tag(), 0x05);
        assert_eq!(EventKind::PubsubMessageSpanEnd.tag(), 0x06);
        assert_eq!(EventKind::DBTransactionStart.tag(), 0x07);
        assert_eq!(EventKind::DBTransactionEnd.tag(), 0x08);
        assert_eq!(EventKind::DBQueryStart.tag(), 0x09);
        assert_eq!(EventKind::DBQueryEnd.tag(), 0x0A);
        assert_eq!(EventKind::RPCCallStart.tag(), 0x0B);
        assert_eq!(EventKind::RPCCallEnd.tag(), 0x0C);
        assert_eq!(EventKind::HTTPCallStart.tag(), 0x0D);
        assert_eq!(EventKind::HTTPCallEnd.tag(), 0x0E);
        assert_eq!(EventKind::LogMessage.tag(), 0x0F);
        assert_eq!(EventKind::PubsubPublishStart.tag(), 0x10);
        assert_eq!(EventKind::PubsubPublishEnd.tag(), 0x11);
        assert_eq!(EventKind::ServiceInitStart.tag(), 0x12);
        assert_eq!(EventKind::ServiceInitEnd.tag(), 0x13);
        assert_eq!(EventKind::CacheCallStart.tag(), 0x14);
        assert_eq!(EventKind::CacheCallEnd.tag(), 0x15);
        assert_eq!(EventKind::BodyStream.tag(), 0x16);
        assert_eq!(EventKind::TestStart.tag(), 0x17);
        assert_eq!(EventKind::TestEnd.tag(), 0x18);
        assert_eq!(EventKind::BucketObjectUploadStart.tag(), 0x19);
        assert_eq!(EventKind::BucketObjectUploadEnd.tag(), 0x1A);
        assert_eq!(EventKind::BucketObjectDownloadStart.tag(), 0x1B);
        assert_eq!(EventKind::BucketObjectDownloadEnd.tag(), 0x1C);
        assert_eq!(EventKind::BucketObjectGetAttrsStart.tag(), 0x1D);
        assert_eq!(EventKind::BucketObjectGetAttrsEnd.tag(), 0x1E);
        assert_eq!(EventKind::BucketListObjectsStart.tag(), 0x1F);
        assert_eq!(EventKind::BucketListObjectsEnd.tag(), 0x20);
        assert_eq!(EventKind::BucketDeleteObjectsStart.tag(), 0x21);
        assert_eq!(EventKind::BucketDeleteObjectsEnd.tag(), 0x22);
    }

    #[test]
    fn try_from_roundtrips_every_tag() {
        for b in 0x01u8..=0x22 {
            let kind = EventKind::try_from(b).unwrap();
            assert_eq!(kind.tag(), b);
        }
    }

    #[test]
    fn try_from_rejects_unknown() {
        assert!(EventKind::try_from(0x00).is_err());
        assert!(EventKind::try_from(0x23).is_err());
        assert!(EventKind::try_from(0xFF).is_err());
    }

    #[test]
    fn db_transaction_completion_roundtrips() {
        assert_eq!(
            DbTransactionCompletion::from_bool(true),
            DbTransactionCompletion::Commit
        );
        assert_eq!(
            DbTransactionCompletion::from_bool(false),
            DbTransactionCompletion::Rollback
        );
        assert!(DbTransactionCompletion::Commit.commit());
        assert!(!DbTransactionCompletion::Rollback.commit());
    }
}
