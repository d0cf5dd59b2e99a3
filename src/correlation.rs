//! Correlation ids and per-request diagnostics.
//!
//! Every logical HTTP call gets one correlation id, stable across its
//! retries, sent as `x-correlation-id` (mirrored as `x-request-id`) and
//! echoed by the server. Each physical attempt is recorded in a capped ring
//! buffer so recent request history can be inspected when debugging; the
//! records feed observability only, never business logic.

use std::collections::VecDeque;
use std::sync::Mutex;
use uuid::Uuid;

/// Default number of records retained in the diagnostics ring buffer.
pub const DEFAULT_DIAGNOSTICS_CAPACITY: usize = 256;

/// Generate a fresh correlation id for one logical request.
pub fn new_correlation_id() -> String {
    Uuid::new_v4().to_string()
}

/// Diagnostic record for one physical HTTP attempt.
#[derive(Debug, Clone)]
pub struct CorrelationRecord {
    pub correlation_id: String,
    pub endpoint: String,
    pub method: String,
    /// HTTP status, absent when no response was obtained.
    pub status: Option<u16>,
    pub duration_ms: u64,
    pub success: bool,
    pub error: Option<String>,
}

/// Capped ring buffer of recent [`CorrelationRecord`]s.
///
/// Oldest records are dropped once capacity is reached.
#[derive(Debug)]
pub struct CorrelationLog {
    records: Mutex<VecDeque<CorrelationRecord>>,
    capacity: usize,
}

impl CorrelationLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            records: Mutex::new(VecDeque::with_capacity(capacity.min(64))),
            capacity: capacity.max(1),
        }
    }

    /// Append a record, evicting the oldest when full.
    pub fn record(&self, record: CorrelationRecord) {
        let mut records = match self.records.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if records.len() == self.capacity {
            records.pop_front();
        }
        records.push_back(record);
    }

    /// Snapshot of the retained records, oldest first.
    pub fn snapshot(&self) -> Vec<CorrelationRecord> {
        let records = match self.records.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        records.iter().cloned().collect()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for CorrelationLog {
    fn default() -> Self {
        Self::new(DEFAULT_DIAGNOSTICS_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str) -> CorrelationRecord {
        CorrelationRecord {
            correlation_id: id.to_string(),
            endpoint: "/status/s1".to_string(),
            method: "GET".to_string(),
            status: Some(200),
            duration_ms: 12,
            success: true,
            error: None,
        }
    }

    #[test]
    fn test_correlation_ids_are_unique() {
        assert_ne!(new_correlation_id(), new_correlation_id());
    }

    #[test]
    fn test_ring_buffer_evicts_oldest() {
        let log = CorrelationLog::new(3);
        for i in 0..5 {
            log.record(record(&format!("corr-{}", i)));
        }
        let snapshot = log.snapshot();
        assert_eq!(snapshot.len(), 3);
        assert_eq!(snapshot[0].correlation_id, "corr-2");
        assert_eq!(snapshot[2].correlation_id, "corr-4");
    }

    #[test]
    fn test_snapshot_preserves_insertion_order() {
        let log = CorrelationLog::new(10);
        log.record(record("a"));
        log.record(record("b"));
        let snapshot = log.snapshot();
        assert_eq!(snapshot[0].correlation_id, "a");
        assert_eq!(snapshot[1].correlation_id, "b");
    }
}
