//! End-to-end scenarios: emit through the [`tracewire::Tracer`], frame the
//! drained queue onto the wire, then decode it back with
//! [`tracewire::frame::FrameReader`] and a [`tracewire::reader::FieldReader`]
//! over each payload. Exercises the full encode -> queue -> frame -> decode
//! path rather than just one layer at a time.

use std::time::Duration;

use tracewire::catalog::{CacheResult, EventKind, LogField, LogFieldValue, LogLevel, StatusCode};
use tracewire::config::TraceConfig;
use tracewire::emit::{
    CacheCallEndParams, CacheCallStartParams, DbTransactionEndParams, DbQueryStartParams,
    Envelope, InnerOpEnvelope, LogMessageParams, PubsubMessageSpanStartParams,
    PubsubPublishEndParams, PubsubPublishStartParams, RequestSpanEndParams,
    RequestSpanStartParams, SpanEndEnvelope, SpanStartEnvelope,
};
use tracewire::frame::{encode_stream, FrameReader};
use tracewire::ids::{EventId, SpanId, TraceId};
use tracewire::reader::FieldReader;
use tracewire::stack::RawStack;
use tracewire::Tracer;

fn envelope(trace: TraceId, span: SpanId) -> Envelope {
    Envelope {
        trace,
        span,
        goid: 1,
        def_loc: 0,
    }
}

/// S1: request round-trip.
#[test]
fn request_round_trip_decodes_through_the_wire() {
    let tracer = Tracer::new(TraceConfig::default());
    let trace = TraceId([0x01; 16]);
    let span = SpanId([0x02; 8]);
    let base = envelope(trace, span);

    let mut headers = std::collections::HashMap::new();
    headers.insert("x-k".to_string(), vec!["v".to_string()]);

    let start_env = SpanStartEnvelope {
        base,
        parent_trace: TraceId::ZERO,
        parent_span: SpanId::ZERO,
        caller_event_id: EventId::NONE,
        ext_correlation_id: String::new(),
    };
    let start_id = tracer.request_span_start(
        &start_env,
        &RequestSpanStartParams {
            service: "svc".into(),
            endpoint: "ping".into(),
            http_method: "GET".into(),
            path: "/ping".into(),
            request_headers: headers.clone(),
            non_raw_payload: b"{}".to_vec(),
            ..Default::default()
        },
    );
    assert_eq!(start_id, EventId(1));

    tracer.request_span_end(
        &SpanEndEnvelope {
            base,
            duration: Duration::from_nanos(1_000_000),
            status_code: StatusCode::Ok,
            err: None,
            panic_stack: RawStack::default(),
            parent_trace: TraceId::ZERO,
            parent_span: SpanId::ZERO,
        },
        &RequestSpanEndParams {
            service: "svc".into(),
            endpoint: "ping".into(),
            http_status: 200,
            response_headers: headers,
            response_payload: b"ok".to_vec(),
            ..Default::default()
        },
    );

    let drained = tracer.log().drain(10);
    assert_eq!(drained.len(), 2);
    assert_eq!(drained[0].event_id, EventId(1));
    assert_eq!(drained[1].event_id, EventId(2));

    let stream = encode_stream(&drained);
    let records = FrameReader::new(&stream).unwrap().collect_all().unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[1].kind, EventKind::RequestSpanEnd);

    let mut r = FieldReader::new(&records[1].payload);
    r.duration();
    r.byte(); // status code
    assert_eq!(r.err_with_stack(), None);
    r.formatted_stack();
    r.bytes(16);
    r.bytes(8);
    assert_eq!(r.string(), "svc");
    assert_eq!(r.string(), "ping");
    assert_eq!(r.uvarint(), 200);
    let resp_headers = r.headers();
    assert_eq!(resp_headers.get("x-k").map(|s| s.as_str()), Some("v"));
    assert_eq!(r.byte_string(), b"ok");
    assert!(r.finish().is_ok());
}

/// S2: DB transaction with a nested query correlates parent and child by
/// EventID.
#[test]
fn nested_db_query_correlates_to_its_transaction() {
    let tracer = Tracer::new(TraceConfig::default());
    let trace = TraceId::generate();
    let span = SpanId::generate();
    let base = envelope(trace, span);

    let tx_start = tracer.db_transaction_start(
        &InnerOpEnvelope {
            base,
            correlation_event_id: EventId::NONE,
        },
        &RawStack::default(),
    );
    assert_eq!(tx_start, EventId(1));

    let query_start = tracer.db_query_start(
        &InnerOpEnvelope {
            base,
            correlation_event_id: tx_start,
        },
        &DbQueryStartParams {
            query: "SELECT 1".into(),
            caller_stack: RawStack::default(),
        },
    );
    assert_eq!(query_start, EventId(2));

    tracer.db_query_end(
        &InnerOpEnvelope {
            base,
            correlation_event_id: query_start,
        },
        None,
    );
    tracer.db_transaction_end(
        &InnerOpEnvelope {
            base,
            correlation_event_id: tx_start,
        },
        &DbTransactionEndParams {
            commit: true,
            commit_stack: RawStack::default(),
            err: None,
        },
    );

    let drained = tracer.log().drain(10);
    assert_eq!(drained.len(), 4);
    let stream = encode_stream(&drained);
    let records = FrameReader::new(&stream).unwrap().collect_all().unwrap();

    // DBQueryStart's correlation_event_id must point back at the transaction.
    let mut query_start_r = FieldReader::new(&records[1].payload);
    query_start_r.uvarint(); // def_loc
    query_start_r.uvarint(); // goid
    assert_eq!(query_start_r.event_id(), tx_start);

    // DBTransactionEnd's correlation_event_id must point back at the
    // transaction start itself (the envelope's own correlation id).
    let mut tx_end_r = FieldReader::new(&records[3].payload);
    tx_end_r.uvarint();
    tx_end_r.uvarint();
    assert_eq!(tx_end_r.event_id(), tx_start);
    assert!(tx_end_r.bool_val()); // commit
}

/// S3: cache miss decodes the expected result code.
#[test]
fn cache_miss_round_trips_result_code() {
    let tracer = Tracer::new(TraceConfig::default());
    let base = envelope(TraceId::generate(), SpanId::generate());
    let start_id = tracer.cache_call_start(
        &InnerOpEnvelope {
            base,
            correlation_event_id: EventId::NONE,
        },
        &CacheCallStartParams {
            operation: "get".into(),
            is_write: false,
            caller_stack: RawStack::default(),
            keys: vec!["a".into(), "b".into()],
        },
    );
    tracer.cache_call_end(
        &InnerOpEnvelope {
            base,
            correlation_event_id: start_id,
        },
        &CacheCallEndParams {
            result_code: CacheResult::NoSuchKey,
            err: None,
        },
    );
    let drained = tracer.log().drain(10);
    let stream = encode_stream(&drained);
    let records = FrameReader::new(&stream).unwrap().collect_all().unwrap();

    let mut start_r = FieldReader::new(&records[0].payload);
    start_r.uvarint();
    start_r.uvarint();
    start_r.event_id();
    assert_eq!(start_r.string(), "get");
    assert!(!start_r.bool_val());
    start_r.stack();
    assert_eq!(start_r.uvarint(), 2);
    assert_eq!(start_r.string(), "a");
    assert_eq!(start_r.string(), "b");

    let mut end_r = FieldReader::new(&records[1].payload);
    end_r.uvarint();
    end_r.uvarint();
    assert_eq!(end_r.event_id(), start_id);
    assert_eq!(end_r.byte(), CacheResult::NoSuchKey as u8);
}

/// S4: a log message with mixed field types encodes its type tags, keys,
/// and per-tag values in declaration order.
#[test]
fn log_message_mixed_fields_round_trip_in_order() {
    let tracer = Tracer::new(TraceConfig::default());
    let base = envelope(TraceId::generate(), SpanId::generate());
    tracer.log_message(
        &InnerOpEnvelope {
            base,
            correlation_event_id: EventId::NONE,
        },
        &LogMessageParams {
            level: LogLevel::Warn,
            message: "x".into(),
            fields: vec![
                LogField {
                    key: "a".into(),
                    value: LogFieldValue::Int(-3),
                },
                LogField {
                    key: "b".into(),
                    value: LogFieldValue::Uuid([9u8; 16]),
                },
                LogField {
                    key: "c".into(),
                    value: LogFieldValue::Json {
                        data: b"{}".to_vec(),
                        err: None,
                    },
                },
            ],
            caller_stack: RawStack::default(),
        },
    );
    let drained = tracer.log().drain(10);
    let stream = encode_stream(&drained);
    let records = FrameReader::new(&stream).unwrap().collect_all().unwrap();
    assert_eq!(records[0].kind, EventKind::LogMessage);

    let mut r = FieldReader::new(&records[0].payload);
    r.uvarint();
    r.uvarint();
    r.event_id();
    assert_eq!(r.byte(), LogLevel::Warn as u8);
    assert_eq!(r.string(), "x");
    assert_eq!(r.uvarint(), 3);
    assert_eq!(r.byte(), 8); // Int tag
    assert_eq!(r.string(), "a");
    assert_eq!(r.varint(), -3);
    assert_eq!(r.byte(), 6); // Uuid tag
    assert_eq!(r.string(), "b");
    assert_eq!(r.bytes(16), vec![9u8; 16]);
    assert_eq!(r.byte(), 7); // Json tag
    assert_eq!(r.string(), "c");
    assert_eq!(r.byte_string(), b"{}");
    assert_eq!(r.err_with_stack(), None);
    r.stack();
    assert!(r.finish().is_ok());
}

/// S5: a saturated queue drops events past the byte cap without blocking,
/// and every successful add keeps its EventID contiguous.
#[test]
fn saturation_drop_leaves_ids_contiguous_and_counts_drops() {
    let mut cfg = TraceConfig::default();
    cfg.queue_soft_cap_bytes = 1024;
    let tracer = Tracer::new(cfg);
    let base = envelope(TraceId::generate(), SpanId::generate());

    let mut accepted = Vec::new();
    for _ in 0..20 {
        let id = tracer.cache_call_start(
            &InnerOpEnvelope {
                base,
                correlation_event_id: EventId::NONE,
            },
            &CacheCallStartParams {
                operation: "get".into(),
                is_write: false,
                caller_stack: RawStack::default(),
                keys: vec!["x".repeat(90)],
            },
        );
        if !id.is_none() {
            accepted.push(id);
        }
    }

    assert!(tracer.log().dropped_events() >= 10);
    assert!(accepted.len() < 20);
    // Every accepted EventID is unique and the sequence is strictly
    // increasing: a dropped add never reissues or skips ahead of a
    // previously assigned ID out of order.
    for pair in accepted.windows(2) {
        assert!(pair[1].0 > pair[0].0);
    }
}

/// S6: a pubsub publish/deliver pair lets a consumer link a message span
/// in a *different* trace back to the publish event via `caller_event_id`.
#[test]
fn pubsub_publish_links_to_delivery_across_traces() {
    let tracer = Tracer::new(TraceConfig::default());
    let publish_trace = TraceId::generate();
    let publish_span = SpanId::generate();
    let publish_base = envelope(publish_trace, publish_span);

    let publish_start = tracer.pubsub_publish_start(
        &InnerOpEnvelope {
            base: publish_base,
            correlation_event_id: EventId::NONE,
        },
        &PubsubPublishStartParams {
            topic: "orders".into(),
            message: b"payload".to_vec(),
            caller_stack: RawStack::default(),
        },
    );
    tracer.pubsub_publish_end(
        &InnerOpEnvelope {
            base: publish_base,
            correlation_event_id: publish_start,
        },
        &PubsubPublishEndParams {
            message_id: "m1".into(),
            err: None,
        },
    );

    let drained = tracer.log().drain(10);
    let publish_end_id = drained[1].event_id;

    // The delivery happens in a brand new trace, but carries
    // caller_event_id pointing back at the publish end.
    let delivery_trace = TraceId::generate();
    let delivery_span = SpanId::generate();
    let delivery_base = envelope(delivery_trace, delivery_span);
    let delivery_start_env = SpanStartEnvelope {
        base: delivery_base,
        parent_trace: TraceId::ZERO,
        parent_span: SpanId::ZERO,
        caller_event_id: publish_end_id,
        ext_correlation_id: String::new(),
    };
    tracer.pubsub_message_span_start(
        &delivery_start_env,
        &PubsubMessageSpanStartParams {
            service: "worker".into(),
            topic: "orders".into(),
            subscription: "orders-sub".into(),
            message_id: "m1".into(),
            attempt: 1,
            published: chrono::Utc::now(),
            payload: b"payload".to_vec(),
        },
    );

    let lineage = tracer
        .spans()
        .lineage_of(delivery_trace, delivery_span)
        .expect("delivery span recorded in the registry");
    assert_eq!(lineage.caller_event_id, Some(publish_end_id));

    let all = tracer.log().drain(10);
    let stream = encode_stream(&all);
    let records = FrameReader::new(&stream).unwrap().collect_all().unwrap();
    assert_eq!(records[0].kind, EventKind::PubsubMessageSpanStart);
    let mut r = FieldReader::new(&records[0].payload);
    r.uvarint(); // goid
    r.bytes(16); // parent_trace
    r.bytes(8); // parent_span
    r.uvarint(); // def_loc
    assert_eq!(r.event_id(), publish_end_id);
}
