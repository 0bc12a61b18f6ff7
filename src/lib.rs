//! Binary trace event encoding, span correlation, and wire framing for an
//! in-process observability log.
//!
//! A backend application emits structured, timestamped, causally-linked
//! events (request spans, DB queries, RPC calls, cache operations, log
//! messages, and so on) through the [`Tracer`] emitter API. Each event is
//! encoded into a compact self-describing payload by [`buf::EventBuffer`],
//! queued by a [`Log`], and eventually framed onto the wire for an
//! out-of-process collector by [`frame`].
//!
//! # Wire format
//!
//! ```text
//! "TRC2" | uvarint(version=1) | record*
//! record = byte(kind) bytes(trace_id,16) bytes(span_id,8)
//!          uvarint(event_id) uvarint(ts_nanos)
//!          uvarint(payload_len) bytes(payload)
//! ```
//!
//! The payload layout is specific to each [`catalog::EventKind`] and is
//! produced by the matching [`Tracer`] method; [`reader::FieldReader`]
//! supplies the primitive readers needed to decode one back out.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use tracewire::{
//!     config::TraceConfig,
//!     emit::{Envelope, RequestSpanEndParams, RequestSpanStartParams, SpanEndEnvelope, SpanStartEnvelope},
//!     ids::{EventId, SpanId, TraceId},
//!     Tracer,
//! };
//!
//! let tracer = Tracer::new(TraceConfig::default());
//! let base = Envelope {
//!     trace: TraceId::generate(),
//!     span: SpanId::generate(),
//!     goid: 1,
//!     def_loc: 0,
//! };
//! let start_env = SpanStartEnvelope {
//!     base,
//!     parent_trace: TraceId::ZERO,
//!     parent_span: SpanId::ZERO,
//!     caller_event_id: EventId::NONE,
//!     ext_correlation_id: String::new(),
//! };
//! let start_id = tracer.request_span_start(
//!     &start_env,
//!     &RequestSpanStartParams {
//!         service: "svc".into(),
//!         endpoint: "ping".into(),
//!         http_method: "GET".into(),
//!         path: "/ping".into(),
//!         ..Default::default()
//!     },
//! );
//! tracer.request_span_end(
//!     &SpanEndEnvelope {
//!         base,
//!         duration: Duration::from_millis(1),
//!         status_code: tracewire::catalog::StatusCode::Ok,
//!         err: None,
//!         panic_stack: Default::default(),
//!         parent_trace: TraceId::ZERO,
//!         parent_span: SpanId::ZERO,
//!     },
//!     &RequestSpanEndParams {
//!         service: "svc".into(),
//!         endpoint: "ping".into(),
//!         http_status: 200,
//!         ..Default::default()
//!     },
//! );
//! assert_eq!(start_id, tracewire::ids::EventId(1));
//! ```

pub mod buf;
pub mod catalog;
pub mod config;
pub mod emit;
pub mod error;
pub mod frame;
pub mod ids;
pub mod log;
pub mod reader;
pub mod span;
pub mod stack;

pub use emit::Tracer;
pub use log::Log;
