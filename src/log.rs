//! The event sink: a bounded, backpressured queue of encoded events
//! awaiting drain by a reporter. This is the only contention point in the
//! whole write path — everything upstream of `add` (building the
//! [`crate::buf::EventBuffer`] payload) happens outside any lock.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use bytes::Bytes;

use crate::catalog::EventKind;
use crate::config::TraceConfig;
use crate::ids::{Clock, EventId, MonotonicClock, SpanId, TraceId};

/// One encoded event as it sits in the queue, ready to be framed and
/// written by a reporter.
#[derive(Debug, Clone)]
pub struct QueuedEvent {
    pub kind: EventKind,
    pub trace: TraceId,
    pub span: SpanId,
    pub event_id: EventId,
    pub ts_nanos: u64,
    pub payload: Bytes,
}

/// A bounded queue of [`QueuedEvent`]s with saturation-drop backpressure.
///
/// `add` never blocks: once either resource bound in [`TraceConfig`] is
/// hit, new events are silently dropped and counted rather than queued or
/// used to apply backpressure to the caller. Losing an occasional event
/// under load is preferable to an observability subsystem adding latency
/// to the thing it's observing.
pub struct Log {
    queue: Mutex<VecDeque<QueuedEvent>>,
    queue_bytes: AtomicU64,
    next_event_id: AtomicU64,
    dropped_events: AtomicU64,
    truncated_payloads: AtomicU64,
    config: TraceConfig,
    clock: Arc<dyn Clock>,
}

impl Log {
    pub fn new(config: TraceConfig, clock: Arc<dyn Clock>) -> Self {
        Log {
            queue: Mutex::new(VecDeque::new()),
            queue_bytes: AtomicU64::new(0),
            next_event_id: AtomicU64::new(1),
            dropped_events: AtomicU64::new(0),
            truncated_payloads: AtomicU64::new(0),
            config,
            clock,
        }
    }

    pub fn with_config(config: TraceConfig) -> Self {
        Log::new(config, Arc::new(MonotonicClock::new()))
    }

    pub fn config(&self) -> &TraceConfig {
        &self.config
    }

    /// Assigns the next monotonic EventID and queues the event, or drops it
    /// and returns [`EventId::NONE`] if either resource bound in
    /// [`TraceConfig`] is already exceeded. A dropped `add` never consumes
    /// an EventID, so the sequence of IDs actually returned stays
    /// contiguous and strictly increasing.
    pub fn add(&self, kind: EventKind, trace: TraceId, span: SpanId, payload: Bytes) -> EventId {
        let size = payload.len() as u64;
        let mut queue = self.queue.lock().unwrap();
        let over_event_cap = queue.len() as u64 >= self.config.queue_event_cap;
        let over_byte_cap =
            self.queue_bytes.load(Ordering::Relaxed) + size > self.config.queue_soft_cap_bytes;
        if over_event_cap || over_byte_cap {
            drop(queue);
            let dropped = self.dropped_events.fetch_add(1, Ordering::Relaxed) + 1;
            log::warn!(kind = ?kind, dropped_events = dropped; "dropping trace event: queue saturated");
            return EventId::NONE;
        }
        let event_id = EventId(self.next_event_id.fetch_add(1, Ordering::Relaxed));
        queue.push_back(QueuedEvent {
            kind,
            trace,
            span,
            event_id,
            ts_nanos: self.clock.now_nanos(),
            payload,
        });
        self.queue_bytes.fetch_add(size, Ordering::Relaxed);
        event_id
    }

    pub fn record_truncation(&self) {
        self.truncated_payloads.fetch_add(1, Ordering::Relaxed);
    }

    /// Removes up to `limit` events from the front of the queue, oldest
    /// first.
    pub fn drain(&self, limit: usize) -> Vec<QueuedEvent> {
        let mut queue = self.queue.lock().unwrap();
        let n = limit.min(queue.len());
        let mut out = Vec::with_capacity(n);
        for _ in 0..n {
            let ev = queue.pop_front().expect("checked len above");
            self.queue_bytes
                .fetch_sub(ev.payload.len() as u64, Ordering::Relaxed);
            out.push(ev);
        }
        out
    }

    pub fn len(&self) -> usize {
        self.queue.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn queue_bytes(&self) -> u64 {
        self.queue_bytes.load(Ordering::Relaxed)
    }

    /// Number of events dropped so far due to saturation. Monotonically
    /// increasing; callers that want a delta (to piggyback a report on
    /// the next successful `add`) should snapshot and subtract.
    pub fn dropped_events(&self) -> u64 {
        self.dropped_events.load(Ordering::Relaxed)
    }

    pub fn truncated_payloads(&self) -> u64 {
        self.truncated_payloads.load(Ordering::Relaxed)
    }
}
