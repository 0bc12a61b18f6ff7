//! Span state: the lifecycle a single span passes through as its start and
//! end events are emitted, plus the lineage fields that thread nested and
//! cross-trace operations back to their parent.

use dashmap::DashMap;

use crate::ids::{EventId, SpanId, TraceId};

/// Where a span came from: either nothing (it's a root), a parent span in
/// the same trace, or an explicit caller in a different trace entirely
/// (cross-process / cross-trace causality).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Lineage {
    pub parent_trace: Option<TraceId>,
    pub parent_span: Option<SpanId>,
    pub caller_event_id: Option<EventId>,
    pub ext_correlation_id: Option<String>,
}

#[derive(Debug, Clone)]
pub struct SpanEntry {
    pub lineage: Lineage,
    pub start_event_id: EventId,
}

/// A registry of spans that have been started but not yet ended, keyed by
/// `(trace, span)`. A span's presence in the registry means `CREATED ->
/// STARTED`; removal (successful or refused) means `-> ENDED`. A span that
/// receives an end without having been started, or a second start, is a
/// caller bug: rather than panicking (an event can be emitted from
/// anywhere, including a panic handler) these transitions are refused and
/// counted so they surface as a metric instead of taking the process down.
#[derive(Debug, Default)]
pub struct SpanRegistry {
    spans: DashMap<(TraceId, SpanId), SpanEntry>,
    refused_transitions: std::sync::atomic::AtomicU64,
}

impl SpanRegistry {
    pub fn new() -> Self {
        SpanRegistry::default()
    }

    pub fn refused_transitions(&self) -> u64 {
        self.refused_transitions.load(std::sync::atomic::Ordering::Relaxed)
    }

    /// Records a span start. Returns `false` (and counts a refusal) if this
    /// span was already started.
    pub fn start(
        &self,
        trace: TraceId,
        span: SpanId,
        lineage: Lineage,
        start_event_id: EventId,
    ) -> bool {
        use dashmap::mapref::entry::Entry;
        match self.spans.entry((trace, span)) {
            Entry::Occupied(_) => {
                self.refused_transitions
                    .fetch_add(1, std::sync::atomic::Ordering::Relaxed);
                log::warn!("refusing duplicate span start for an already-started span");
                false
            }
            Entry::Vacant(v) => {
                v.insert(SpanEntry {
                    lineage,
                    start_event_id,
                });
                true
            }
        }
    }

    /// Records a span end, returning the span's recorded start event ID if
    /// it had in fact been started. Removes the span from the registry
    /// either way so the map does not grow unbounded.
    pub fn end(&self, trace: TraceId, span: SpanId) -> Option<EventId> {
        match self.spans.remove(&(trace, span)) {
            Some((_, entry)) => Some(entry.start_event_id),
            None => {
                self.refused_transitions
                    .fetch_add(1, std::sync::atomic::Ordering::Relaxed);
                log::warn!("refusing span end for a span with no recorded start");
                None
            }
        }
    }

    pub fn lineage_of(&self, trace: TraceId, span: SpanId) -> Option<Lineage> {
        self.spans.get(&(trace, span)).map(|e| e.lineage.clone())
    }

    pub fn len(&self) -> usize {
        self.spans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }
}
