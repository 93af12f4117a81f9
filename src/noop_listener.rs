use crate::listener::LogListener;
use crate::record::LogRecord;

/// A listener that simply drops all records.
///
/// Useful for measuring the overhead of the hub itself, and for unit tests
/// that only care about listener bookkeeping.
#[derive(Clone, Default)]
pub struct NoopListener;

impl LogListener for NoopListener {
    fn handle(&self, _record: &LogRecord) {}
}
