use crate::listener::LogListener;
use crate::record::LogRecord;
use std::sync::Mutex;

/// A listener that collects every delivered record in memory.
///
/// Intended for tests and diagnostics; `records` clones the collected
/// snapshot so the listener can keep receiving while the caller inspects.
#[derive(Default)]
pub struct MemoryListener {
    records: Mutex<Vec<LogRecord>>,
}

impl MemoryListener {
    pub fn new() -> Self {
        MemoryListener::default()
    }

    /// Snapshot of everything delivered so far, in delivery order.
    pub fn records(&self) -> Vec<LogRecord> {
        self.records.lock().expect("memory listener lock").clone()
    }
}

impl LogListener for MemoryListener {
    fn handle(&self, record: &LogRecord) {
        self.records
            .lock()
            .expect("memory listener lock")
            .push(record.clone());
    }
}
