use crate::record::LogRecord;

/// Destination for [`LogRecord`]s dispatched by the event hub.
///
/// Implementations consume records inside the application process
/// (update a UI, collect diagnostics, forward to a side channel, etc).
/// The hub calls `handle` synchronously on whatever thread produced the
/// event, so implementations should return promptly.
///
/// `handle` runs while the hub's internal lock is held. A listener must
/// not call back into the hub (`subscribe`, `append`, ...) from inside
/// `handle`; doing so deadlocks.
pub trait LogListener: Send + Sync {
    /// Consume a single log record.
    ///
    /// **Parameters**
    /// - `record`: fully-populated [`LogRecord`] produced by the bridge
    ///   layer. Shared by reference; the same record instance may be
    ///   handed to every registered listener in turn.
    ///
    /// Panicking here aborts delivery of this record to any listeners
    /// registered after this one and unwinds into the producing caller.
    fn handle(&self, record: &LogRecord);
}

/// Any `Fn(&LogRecord)` closure is a listener.
impl<F> LogListener for F
where
    F: Fn(&LogRecord) + Send + Sync,
{
    fn handle(&self, record: &LogRecord) {
        self(record)
    }
}
