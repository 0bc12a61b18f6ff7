//! The emitter API: one typed entry point per event kind, each packing its
//! parameters through an [`crate::buf::EventBuffer`] into a
//! [`crate::catalog::EventKind`]-tagged payload and handing it to the
//! [`crate::log::Log`].
//!
//! Emitters are total functions: encoding never fails in a way observable
//! to the caller. An oversized byte payload is truncated rather than
//! rejected; a saturated log drops the event rather than blocking.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::buf::EventBuffer;
use crate::catalog::{
    BucketDeleteEntry, BucketObjectAttrs, CacheResult, EventKind, HttpTraceEvent,
    HttpTraceEventKind, LogField, LogFieldValue, LogLevel, StatusCode,
};
use crate::config::TraceConfig;
use crate::error::TracedError;
use crate::ids::{Clock, EventId, MonotonicClock, SpanId, TraceId};
use crate::log::Log;
use crate::span::{Lineage, SpanRegistry};
use crate::stack::RawStack;

/// Fields common to every emitter: which execution context it ran on, and
/// where in the source it was defined (`def_loc` is an opaque handle
/// resolved externally by the consumer, not by this crate).
#[derive(Debug, Clone, Copy)]
pub struct Envelope {
    pub trace: TraceId,
    pub span: SpanId,
    pub goid: u64,
    pub def_loc: u64,
}

/// Additional fields carried by every span-start emitter.
#[derive(Debug, Clone)]
pub struct SpanStartEnvelope {
    pub base: Envelope,
    pub parent_trace: TraceId,
    pub parent_span: SpanId,
    pub caller_event_id: EventId,
    pub ext_correlation_id: String,
}

/// Additional fields carried by every span-end emitter.
#[derive(Debug, Clone)]
pub struct SpanEndEnvelope {
    pub base: Envelope,
    pub duration: Duration,
    /// gRPC-style status, independent of `err`: a span can fail with a
    /// specific status (e.g. `NotFound`) without an attached error value,
    /// and a dashboard colorizes on this byte rather than re-deriving
    /// success/failure from error presence alone.
    pub status_code: StatusCode,
    pub err: Option<TracedError>,
    pub panic_stack: RawStack,
    pub parent_trace: TraceId,
    pub parent_span: SpanId,
}

/// Additional fields carried by every inner-operation emitter (things that
/// are not spans themselves but are correlated to one via a start/end
/// EventID pair, or to an enclosing span/transaction).
#[derive(Debug, Clone, Copy)]
pub struct InnerOpEnvelope {
    pub base: Envelope,
    pub correlation_event_id: EventId,
}

fn truncate_payload(buf: &mut EventBuffer, data: &[u8], max_len: usize, log: &Log) {
    if buf.truncated_byte_string(data, max_len) {
        log.record_truncation();
    }
}

/// Typed entry points over a shared [`Log`] and [`SpanRegistry`].
pub struct Tracer {
    log: Arc<Log>,
    spans: SpanRegistry,
    config: TraceConfig,
}

impl Tracer {
    pub fn new(config: TraceConfig) -> Self {
        let clock: Arc<dyn Clock> = Arc::new(MonotonicClock::new());
        Tracer {
            log: Arc::new(Log::new(config, clock)),
            spans: SpanRegistry::new(),
            config,
        }
    }

    pub fn with_log(log: Arc<Log>, config: TraceConfig) -> Self {
        Tracer {
            log,
            spans: SpanRegistry::new(),
            config,
        }
    }

    pub fn log(&self) -> &Log {
        &self.log
    }

    pub fn spans(&self) -> &SpanRegistry {
        &self.spans
    }

    fn span_start_base(&self, eb: &mut EventBuffer, env: &SpanStartEnvelope) {
        eb.uvarint(env.base.goid);
        eb.bytes(&env.parent_trace.0);
        eb.bytes(&env.parent_span.0);
        eb.uvarint(env.base.def_loc);
        eb.event_id(env.caller_event_id);
        eb.string(&env.ext_correlation_id);
    }

    fn span_end_base(&self, eb: &mut EventBuffer, env: &SpanEndEnvelope) {
        eb.duration(env.duration);
        eb.byte(env.status_code as u8);
        eb.err_with_stack(env.err.as_ref());
        eb.formatted_stack(&crate::stack::format(&env.panic_stack));
        eb.bytes(&env.parent_trace.0);
        eb.bytes(&env.parent_span.0);
    }

    fn inner_op_base(&self, eb: &mut EventBuffer, env: &InnerOpEnvelope) {
        eb.uvarint(env.base.def_loc);
        eb.uvarint(env.base.goid);
        eb.event_id(env.correlation_event_id);
    }

    fn start_span(
        &self,
        kind: EventKind,
        env: &SpanStartEnvelope,
        tail: impl FnOnce(&mut EventBuffer),
    ) -> EventId {
        let mut eb = EventBuffer::with_capacity(128);
        self.span_start_base(&mut eb, env);
        tail(&mut eb);
        let id = self.log.add(kind, env.base.trace, env.base.span, eb.freeze());
        self.spans.start(
            env.base.trace,
            env.base.span,
            Lineage {
                parent_trace: Some(env.parent_trace),
                parent_span: Some(env.parent_span),
                caller_event_id: env.caller_event_id.as_option(),
                ext_correlation_id: Some(env.ext_correlation_id.clone()),
            },
            id,
        );
        id
    }

    fn end_span(&self, kind: EventKind, env: &SpanEndEnvelope, tail: impl FnOnce(&mut EventBuffer)) {
        let mut eb = EventBuffer::with_capacity(128);
        self.span_end_base(&mut eb, env);
        tail(&mut eb);
        self.log.add(kind, env.base.trace, env.base.span, eb.freeze());
        self.spans.end(env.base.trace, env.base.span);
    }

    fn start_inner(
        &self,
        kind: EventKind,
        env: &InnerOpEnvelope,
        tail: impl FnOnce(&mut EventBuffer),
    ) -> EventId {
        let mut eb = EventBuffer::with_capacity(64);
        self.inner_op_base(&mut eb, env);
        tail(&mut eb);
        self.log.add(kind, env.base.trace, env.base.span, eb.freeze())
    }

    fn end_inner(&self, kind: EventKind, env: &InnerOpEnvelope, tail: impl FnOnce(&mut EventBuffer)) {
        let mut eb = EventBuffer::with_capacity(64);
        self.inner_op_base(&mut eb, env);
        tail(&mut eb);
        self.log.add(kind, env.base.trace, env.base.span, eb.freeze());
    }

    // ---- Request span ----

    pub fn request_span_start(
        &self,
        env: &SpanStartEnvelope,
        p: &RequestSpanStartParams,
    ) -> EventId {
        self.start_span(EventKind::RequestSpanStart, env, |eb| {
            eb.string(&p.service);
            eb.string(&p.endpoint);
            eb.string(&p.http_method);
            eb.string(&p.path);
            eb.uvarint(p.path_params.len() as u64);
            for param in &p.path_params {
                eb.string(param);
            }
            if self.config.capture_headers {
                eb.headers(&p.request_headers);
            } else {
                eb.uvarint(0);
            }
            truncate_payload(
                eb,
                &p.non_raw_payload,
                self.config.max_payload_bytes as usize,
                &self.log,
            );
            eb.string(&p.ext_correlation_id_repeat);
            eb.string(&p.user_id);
            eb.bool(p.mocked);
        })
    }

    pub fn request_span_end(&self, env: &SpanEndEnvelope, p: &RequestSpanEndParams) {
        self.end_span(EventKind::RequestSpanEnd, env, |eb| {
            eb.string(&p.service);
            eb.string(&p.endpoint);
            eb.uvarint(p.http_status);
            if self.config.capture_headers {
                eb.headers(&p.response_headers);
            } else {
                eb.uvarint(0);
            }
            truncate_payload(
                eb,
                &p.response_payload,
                self.config.max_payload_bytes as usize,
                &self.log,
            );
            eb.event_id(p.caller_event_id);
            eb.opt_string(p.user_id.as_deref());
        })
    }

    // ---- Auth span ----

    pub fn auth_span_start(&self, env: &SpanStartEnvelope, p: &AuthSpanStartParams) -> EventId {
        self.start_span(EventKind::AuthSpanStart, env, |eb| {
            eb.string(&p.service);
            eb.string(&p.endpoint);
            truncate_payload(
                eb,
                &p.non_raw_payload,
                self.config.max_payload_bytes as usize,
                &self.log,
            );
        })
    }

    pub fn auth_span_end(&self, env: &SpanEndEnvelope, p: &AuthSpanEndParams) {
        self.end_span(EventKind::AuthSpanEnd, env, |eb| {
            eb.string(&p.service);
            eb.string(&p.endpoint);
            eb.string(&p.auth_uid);
            truncate_payload(
                eb,
                &p.payload,
                self.config.max_payload_bytes as usize,
                &self.log,
            );
        })
    }

    // ---- Pubsub message span ----

    pub fn pubsub_message_span_start(
        &self,
        env: &SpanStartEnvelope,
        p: &PubsubMessageSpanStartParams,
    ) -> EventId {
        self.start_span(EventKind::PubsubMessageSpanStart, env, |eb| {
            eb.string(&p.service);
            eb.string(&p.topic);
            eb.string(&p.subscription);
            eb.string(&p.message_id);
            eb.uvarint(p.attempt);
            eb.time(&p.published);
            truncate_payload(
                eb,
                &p.payload,
                self.config.max_payload_bytes as usize,
                &self.log,
            );
        })
    }

    pub fn pubsub_message_span_end(&self, env: &SpanEndEnvelope, p: &PubsubMessageSpanEndParams) {
        self.end_span(EventKind::PubsubMessageSpanEnd, env, |eb| {
            eb.string(&p.service);
            eb.string(&p.topic);
            eb.string(&p.subscription);
            eb.string(&p.message_id);
        })
    }

    // ---- Test span ----

    pub fn test_start(&self, env: &SpanStartEnvelope, p: &TestStartParams) -> EventId {
        self.start_span(EventKind::TestStart, env, |eb| {
            eb.string(&p.service);
            eb.string(&p.test_name);
            eb.string(&p.user_id);
            eb.string(&p.test_file);
            eb.uvarint(p.test_line as u64);
        })
    }

    pub fn test_end(&self, env: &SpanEndEnvelope, p: &TestEndParams) {
        self.end_span(EventKind::TestEnd, env, |eb| {
            eb.string(&p.service);
            eb.string(&p.test_name);
            eb.bool(p.failed);
            eb.bool(p.skipped);
            eb.opt_string(p.user_id.as_deref());
        })
    }

    // ---- RPC call ----

    pub fn rpc_call_start(&self, env: &InnerOpEnvelope, p: &RpcCallStartParams) -> EventId {
        self.start_inner(EventKind::RPCCallStart, env, |eb| {
            eb.string(&p.target_service);
            eb.string(&p.target_endpoint);
            eb.stack(&p.caller_stack);
        })
    }

    pub fn rpc_call_end(&self, env: &InnerOpEnvelope, err: Option<&TracedError>) {
        self.end_inner(EventKind::RPCCallEnd, env, |eb| {
            eb.err_with_stack(err);
        })
    }

    // ---- HTTP call ----

    /// `bytes(8, correlation_parent_span_id), string(method), string(url),
    /// stack(caller_stack), fixed_i64(start_nanotime)`. The distilled
    /// catalog lists the tag but never a payload shape for it (§4.C); this
    /// mirrors the reference decoder's `http_call_start`.
    pub fn http_call_start(&self, env: &InnerOpEnvelope, p: &HttpCallStartParams) -> EventId {
        self.start_inner(EventKind::HTTPCallStart, env, |eb| {
            eb.bytes(&p.correlation_parent_span_id.0);
            eb.string(&p.method);
            eb.string(&p.url);
            eb.stack(&p.caller_stack);
            eb.fixed_i64(p.start_nanotime);
        })
    }

    /// `uvarint(status_code), err_with_stack(err), uvarint(n), [byte(tag),
    /// fixed_i64(nanotime), tag-specific fields]×n`.
    pub fn http_call_end(&self, env: &InnerOpEnvelope, p: &HttpCallEndParams) {
        self.end_inner(EventKind::HTTPCallEnd, env, |eb| {
            eb.uvarint(p.status_code.unwrap_or(0) as u64);
            eb.err_with_stack(p.err.as_ref());
            eb.uvarint(p.trace_events.len() as u64);
            for ev in &p.trace_events {
                eb.byte(ev.kind.tag());
                eb.fixed_i64(ev.nanotime);
                write_http_trace_event_kind(eb, &ev.kind);
            }
        })
    }

    // ---- DB query ----

    pub fn db_query_start(&self, env: &InnerOpEnvelope, p: &DbQueryStartParams) -> EventId {
        self.start_inner(EventKind::DBQueryStart, env, |eb| {
            eb.string(&p.query);
            eb.stack(&p.caller_stack);
        })
    }

    pub fn db_query_end(&self, env: &InnerOpEnvelope, err: Option<&TracedError>) {
        self.end_inner(EventKind::DBQueryEnd, env, |eb| {
            eb.err_with_stack(err);
        })
    }

    // ---- DB transaction ----

    pub fn db_transaction_start(&self, env: &InnerOpEnvelope, caller_stack: &RawStack) -> EventId {
        self.start_inner(EventKind::DBTransactionStart, env, |eb| {
            eb.stack(caller_stack);
        })
    }

    pub fn db_transaction_end(&self, env: &InnerOpEnvelope, p: &DbTransactionEndParams) {
        self.end_inner(EventKind::DBTransactionEnd, env, |eb| {
            eb.bool(p.commit);
            eb.stack(&p.commit_stack);
            eb.err_with_stack(p.err.as_ref());
        })
    }

    // ---- Pubsub publish ----

    pub fn pubsub_publish_start(
        &self,
        env: &InnerOpEnvelope,
        p: &PubsubPublishStartParams,
    ) -> EventId {
        self.start_inner(EventKind::PubsubPublishStart, env, |eb| {
            eb.string(&p.topic);
            truncate_payload(
                eb,
                &p.message,
                self.config.max_payload_bytes as usize,
                &self.log,
            );
            eb.stack(&p.caller_stack);
        })
    }

    pub fn pubsub_publish_end(&self, env: &InnerOpEnvelope, p: &PubsubPublishEndParams) {
        self.end_inner(EventKind::PubsubPublishEnd, env, |eb| {
            eb.string(&p.message_id);
            eb.err_with_stack(p.err.as_ref());
        })
    }

    // ---- Service init ----

    pub fn service_init_start(&self, env: &InnerOpEnvelope, service: &str) -> EventId {
        self.start_inner(EventKind::ServiceInitStart, env, |eb| {
            eb.string(service);
        })
    }

    pub fn service_init_end(&self, env: &InnerOpEnvelope, err: Option<&TracedError>) {
        self.end_inner(EventKind::ServiceInitEnd, env, |eb| {
            eb.err_with_stack(err);
        })
    }

    // ---- Cache call ----

    pub fn cache_call_start(&self, env: &InnerOpEnvelope, p: &CacheCallStartParams) -> EventId {
        self.start_inner(EventKind::CacheCallStart, env, |eb| {
            eb.string(&p.operation);
            eb.bool(p.is_write);
            eb.stack(&p.caller_stack);
            eb.uvarint(p.keys.len() as u64);
            for key in &p.keys {
                eb.string(key);
            }
        })
    }

    pub fn cache_call_end(&self, env: &InnerOpEnvelope, p: &CacheCallEndParams) {
        self.end_inner(EventKind::CacheCallEnd, env, |eb| {
            eb.byte(p.result_code as u8);
            eb.err_with_stack(p.err.as_ref());
        })
    }

    // ---- Body stream ----

    pub fn body_stream(&self, env: &InnerOpEnvelope, p: &BodyStreamParams) {
        self.end_inner(EventKind::BodyStream, env, |eb| {
            let mut flags = 0u8;
            if p.is_response {
                flags |= 0b01;
            }
            let truncated =
                p.data.len() > self.config.max_payload_bytes as usize || p.overflowed;
            if truncated {
                flags |= 0b10;
            }
            eb.byte(flags);
            let cap = self.config.max_payload_bytes as usize;
            if p.data.len() > cap {
                eb.byte_string(&p.data[..cap]);
                self.log.record_truncation();
            } else {
                eb.byte_string(&p.data);
            }
        })
    }

    // ---- Bucket: object upload ----

    pub fn bucket_object_upload_start(
        &self,
        env: &InnerOpEnvelope,
        p: &BucketObjectUploadStartParams,
    ) -> EventId {
        self.start_inner(EventKind::BucketObjectUploadStart, env, |eb| {
            eb.string(&p.bucket);
            eb.string(&p.object);
            eb.bucket_object_attrs(&p.attrs);
            eb.stack(&p.caller_stack);
        })
    }

    pub fn bucket_object_upload_end(&self, env: &InnerOpEnvelope, p: &BucketObjectUploadEndParams) {
        self.end_inner(EventKind::BucketObjectUploadEnd, env, |eb| {
            eb.uvarint(p.size);
            eb.opt_string(p.version.as_deref());
            eb.err_with_stack(p.err.as_ref());
        })
    }

    // ---- Bucket: object download ----

    pub fn bucket_object_download_start(
        &self,
        env: &InnerOpEnvelope,
        p: &BucketObjectDownloadStartParams,
    ) -> EventId {
        self.start_inner(EventKind::BucketObjectDownloadStart, env, |eb| {
            eb.string(&p.bucket);
            eb.string(&p.object);
            eb.opt_string(p.version.as_deref());
            eb.stack(&p.caller_stack);
        })
    }

    pub fn bucket_object_download_end(
        &self,
        env: &InnerOpEnvelope,
        p: &BucketObjectDownloadEndParams,
    ) {
        self.end_inner(EventKind::BucketObjectDownloadEnd, env, |eb| {
            eb.uvarint(p.size);
            eb.err_with_stack(p.err.as_ref());
        })
    }

    // ---- Bucket: get attrs ----

    pub fn bucket_object_get_attrs_start(
        &self,
        env: &InnerOpEnvelope,
        p: &BucketObjectGetAttrsStartParams,
    ) -> EventId {
        self.start_inner(EventKind::BucketObjectGetAttrsStart, env, |eb| {
            eb.string(&p.bucket);
            eb.string(&p.object);
            eb.opt_string(p.version.as_deref());
            eb.stack(&p.caller_stack);
        })
    }

    pub fn bucket_object_get_attrs_end(
        &self,
        env: &InnerOpEnvelope,
        p: &BucketObjectGetAttrsEndParams,
    ) {
        self.end_inner(EventKind::BucketObjectGetAttrsEnd, env, |eb| {
            eb.err_with_stack(p.err.as_ref());
            if p.err.is_none() {
                eb.bucket_object_attrs(p.attrs.as_ref().unwrap_or(&BucketObjectAttrs::default()));
            }
        })
    }

    // ---- Bucket: list objects ----

    pub fn bucket_list_objects_start(
        &self,
        env: &InnerOpEnvelope,
        p: &BucketListObjectsStartParams,
    ) -> EventId {
        self.start_inner(EventKind::BucketListObjectsStart, env, |eb| {
            eb.string(&p.bucket);
            eb.opt_string(p.prefix.as_deref());
            eb.stack(&p.caller_stack);
        })
    }

    pub fn bucket_list_objects_end(&self, env: &InnerOpEnvelope, p: &BucketListObjectsEndParams) {
        self.end_inner(EventKind::BucketListObjectsEnd, env, |eb| {
            eb.err_with_stack(p.err.as_ref());
            eb.uvarint(p.observed);
            eb.bool(p.has_more);
        })
    }

    // ---- Bucket: delete objects ----

    pub fn bucket_delete_objects_start(
        &self,
        env: &InnerOpEnvelope,
        p: &BucketDeleteObjectsStartParams,
    ) -> EventId {
        self.start_inner(EventKind::BucketDeleteObjectsStart, env, |eb| {
            eb.string(&p.bucket);
            eb.stack(&p.caller_stack);
            eb.uvarint(p.entries.len() as u64);
            for entry in &p.entries {
                eb.string(&entry.object);
                eb.opt_string(entry.version.as_deref());
            }
        })
    }

    pub fn bucket_delete_objects_end(&self, env: &InnerOpEnvelope, err: Option<&TracedError>) {
        self.end_inner(EventKind::BucketDeleteObjectsEnd, env, |eb| {
            eb.err_with_stack(err);
        })
    }

    // ---- Log message ----

    pub fn log_message(&self, env: &InnerOpEnvelope, p: &LogMessageParams) {
        self.end_inner(EventKind::LogMessage, env, |eb| {
            eb.byte(p.level as u8);
            eb.string(&p.message);
            eb.uvarint(p.fields.len() as u64);
            for field in &p.fields {
                eb.byte(field.value.type_tag());
                eb.string(&field.key);
                write_log_field_value(eb, &field.value);
            }
            eb.stack(&p.caller_stack);
        })
    }
}

fn write_http_trace_event_kind(eb: &mut EventBuffer, kind: &HttpTraceEventKind) {
    match kind {
        HttpTraceEventKind::GetConn { host_port } => eb.string(host_port),
        HttpTraceEventKind::GotConn {
            reused,
            was_idle,
            idle_duration_ns,
        } => {
            eb.bool(*reused);
            eb.bool(*was_idle);
            eb.fixed_i64(*idle_duration_ns);
        }
        HttpTraceEventKind::GotFirstResponseByte => {}
        HttpTraceEventKind::Got1xxResponse { code } => eb.varint(*code as i64),
        HttpTraceEventKind::DnsStart { host } => eb.string(host),
        HttpTraceEventKind::DnsDone { err, addrs } => {
            eb.byte_string(err);
            eb.uvarint(addrs.len() as u64);
            for addr in addrs {
                eb.byte_string(addr);
            }
        }
        HttpTraceEventKind::ConnectStart { network, addr } => {
            eb.string(network);
            eb.string(addr);
        }
        HttpTraceEventKind::ConnectDone { network, addr, err } => {
            eb.string(network);
            eb.string(addr);
            eb.byte_string(err);
        }
        HttpTraceEventKind::TlsHandshakeStart => {}
        HttpTraceEventKind::TlsHandshakeDone {
            err,
            tls_version,
            cipher_suite,
            server_name,
            negotiated_protocol,
        } => {
            eb.byte_string(err);
            eb.uvarint(*tls_version as u64);
            eb.uvarint(*cipher_suite as u64);
            eb.string(server_name);
            eb.string(negotiated_protocol);
        }
        HttpTraceEventKind::WroteHeaders => {}
        HttpTraceEventKind::WroteRequest { err } => eb.byte_string(err),
        HttpTraceEventKind::Wait100Continue => {}
        HttpTraceEventKind::ClosedBody { err } => eb.byte_string(err),
    }
}

fn write_log_field_value(eb: &mut EventBuffer, value: &LogFieldValue) {
    match value {
        LogFieldValue::Error(err) => eb.err_with_stack(Some(err)),
        LogFieldValue::String(s) => eb.string(s),
        LogFieldValue::Bool(b) => eb.bool(*b),
        LogFieldValue::Time(t) => eb.time(t),
        LogFieldValue::Duration(d) => eb.duration(*d),
        LogFieldValue::Uuid(u) => eb.bytes(u),
        LogFieldValue::Json { data, err } => {
            if err.is_some() {
                eb.byte_string(&[]);
            } else {
                eb.byte_string(data);
            }
            eb.err_with_stack(err.as_ref());
        }
        LogFieldValue::Int(i) => eb.varint(*i),
        LogFieldValue::Uint(u) => eb.uvarint(*u),
        LogFieldValue::Float32(f) => eb.float32(*f),
        LogFieldValue::Float64(f) => eb.float64(*f),
    }
}

// ---- Parameter structs for the larger emitter tails ----

#[derive(Debug, Clone, Default)]
pub struct RequestSpanStartParams {
    pub service: String,
    pub endpoint: String,
    pub http_method: String,
    pub path: String,
    pub path_params: Vec<String>,
    pub request_headers: HashMap<String, Vec<String>>,
    pub non_raw_payload: Vec<u8>,
    pub ext_correlation_id_repeat: String,
    pub user_id: String,
    pub mocked: bool,
}

#[derive(Debug, Clone, Default)]
pub struct RequestSpanEndParams {
    pub service: String,
    pub endpoint: String,
    pub http_status: u64,
    pub response_headers: HashMap<String, Vec<String>>,
    pub response_payload: Vec<u8>,
    /// Echoes the upstream call that spawned this request, letting a
    /// consumer link the end event back without a second trace lookup.
    pub caller_event_id: EventId,
    pub user_id: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct AuthSpanStartParams {
    pub service: String,
    pub endpoint: String,
    pub non_raw_payload: Vec<u8>,
}

#[derive(Debug, Clone, Default)]
pub struct AuthSpanEndParams {
    pub service: String,
    pub endpoint: String,
    pub auth_uid: String,
    pub payload: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct PubsubMessageSpanStartParams {
    pub service: String,
    pub topic: String,
    pub subscription: String,
    pub message_id: String,
    pub attempt: u64,
    pub published: DateTime<Utc>,
    pub payload: Vec<u8>,
}

#[derive(Debug, Clone, Default)]
pub struct PubsubMessageSpanEndParams {
    pub service: String,
    pub topic: String,
    pub subscription: String,
    pub message_id: String,
}

#[derive(Debug, Clone, Default)]
pub struct TestStartParams {
    pub service: String,
    pub test_name: String,
    pub user_id: String,
    pub test_file: String,
    pub test_line: u32,
}

#[derive(Debug, Clone, Default)]
pub struct TestEndParams {
    pub service: String,
    pub test_name: String,
    pub failed: bool,
    pub skipped: bool,
    pub user_id: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct RpcCallStartParams {
    pub target_service: String,
    pub target_endpoint: String,
    pub caller_stack: RawStack,
}

#[derive(Debug, Clone, Default)]
pub struct HttpCallStartParams {
    pub correlation_parent_span_id: SpanId,
    pub method: String,
    pub url: String,
    pub caller_stack: RawStack,
    pub start_nanotime: i64,
}

#[derive(Debug, Clone, Default)]
pub struct HttpCallEndParams {
    pub status_code: Option<u32>,
    pub err: Option<TracedError>,
    pub trace_events: Vec<HttpTraceEvent>,
}

#[derive(Debug, Clone, Default)]
pub struct DbQueryStartParams {
    pub query: String,
    pub caller_stack: RawStack,
}

#[derive(Debug, Clone, Default)]
pub struct DbTransactionEndParams {
    pub commit: bool,
    pub commit_stack: RawStack,
    pub err: Option<TracedError>,
}

#[derive(Debug, Clone, Default)]
pub struct PubsubPublishStartParams {
    pub topic: String,
    pub message: Vec<u8>,
    pub caller_stack: RawStack,
}

#[derive(Debug, Clone, Default)]
pub struct PubsubPublishEndParams {
    pub message_id: String,
    pub err: Option<TracedError>,
}

#[derive(Debug, Clone, Default)]
pub struct CacheCallStartParams {
    pub operation: String,
    pub is_write: bool,
    pub caller_stack: RawStack,
    pub keys: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct CacheCallEndParams {
    pub result_code: CacheResult,
    pub err: Option<TracedError>,
}

#[derive(Debug, Clone, Default)]
pub struct BodyStreamParams {
    pub is_response: bool,
    pub overflowed: bool,
    pub data: Vec<u8>,
}

#[derive(Debug, Clone, Default)]
pub struct BucketObjectUploadStartParams {
    pub bucket: String,
    pub object: String,
    pub attrs: BucketObjectAttrs,
    pub caller_stack: RawStack,
}

#[derive(Debug, Clone, Default)]
pub struct BucketObjectUploadEndParams {
    pub size: u64,
    pub version: Option<String>,
    pub err: Option<TracedError>,
}

#[derive(Debug, Clone, Default)]
pub struct BucketObjectDownloadStartParams {
    pub bucket: String,
    pub object: String,
    pub version: Option<String>,
    pub caller_stack: RawStack,
}

#[derive(Debug, Clone, Default)]
pub struct BucketObjectDownloadEndParams {
    pub size: u64,
    pub err: Option<TracedError>,
}

#[derive(Debug, Clone, Default)]
pub struct BucketObjectGetAttrsStartParams {
    pub bucket: String,
    pub object: String,
    pub version: Option<String>,
    pub caller_stack: RawStack,
}

#[derive(Debug, Clone, Default)]
pub struct BucketObjectGetAttrsEndParams {
    pub err: Option<TracedError>,
    pub attrs: Option<BucketObjectAttrs>,
}

#[derive(Debug, Clone, Default)]
pub struct BucketListObjectsStartParams {
    pub bucket: String,
    pub prefix: Option<String>,
    pub caller_stack: RawStack,
}

#[derive(Debug, Clone, Default)]
pub struct BucketListObjectsEndParams {
    pub err: Option<TracedError>,
    pub observed: u64,
    pub has_more: bool,
}

#[derive(Debug, Clone, Default)]
pub struct BucketDeleteObjectsStartParams {
    pub bucket: String,
    pub caller_stack: RawStack,
    pub entries: Vec<BucketDeleteEntry>,
}

#[derive(Debug, Clone)]
pub struct LogMessageParams {
    pub level: LogLevel,
    pub message: String,
    pub fields: Vec<LogField>,
    pub caller_stack: RawStack,
}
