//! Tunable resource bounds for the event log.

/// Resource bounds for one [`crate::log::Log`] instance. All limits are
/// soft caps checked at `add` time; none of them cause `add` to block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraceConfig {
    /// Once the queue's total buffered payload size reaches this many
    /// bytes, further `add` calls are dropped until the sink drains.
    pub queue_soft_cap_bytes: u64,
    /// Once the queue holds this many undrained events, further `add`
    /// calls are dropped regardless of byte size.
    pub queue_event_cap: u64,
    /// Individual payloads larger than this are truncated before being
    /// queued (applies to the byte-string fields that support truncation).
    pub max_payload_bytes: u64,
    /// Maximum number of frames captured by a single stack trace.
    pub max_stack_depth: usize,
    /// Whether request/response headers are captured at all.
    pub capture_headers: bool,
}

impl Default for TraceConfig {
    fn default() -> Self {
        TraceConfig {
            queue_soft_cap_bytes: 64 * 1024 * 1024,
            queue_event_cap: 200_000,
            max_payload_bytes: 1024 * 1024,
            max_stack_depth: 64,
            capture_headers: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_bounds() {
        let cfg = TraceConfig::default();
        assert_eq!(cfg.queue_soft_cap_bytes, 64 * 1024 * 1024);
        assert_eq!(cfg.queue_event_cap, 200_000);
        assert_eq!(cfg.max_payload_bytes, 1024 * 1024);
        assert_eq!(cfg.max_stack_depth, 64);
        assert!(cfg.capture_headers);
    }
}
