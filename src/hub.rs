use crate::listener::LogListener;
use crate::record::LogRecord;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};

struct HubState {
    listeners: Vec<Arc<dyn LogListener>>,
    cache: VecDeque<LogRecord>,
}

/// In-process hub that fans log records out to registered listeners.
///
/// While no listener is registered, incoming records accumulate in a FIFO
/// cache; the first `subscribe` call drains that backlog so nothing emitted
/// during startup is lost. Once a listener is present, records are delivered
/// directly, in registration order, on the producing thread.
///
/// The application owns the hub for the lifetime of the process: construct
/// one, wrap it in an [`Arc`], and hand it to
/// [`HubLayer`](crate::layer::HubLayer) and to whatever code registers
/// listeners. There is no hidden global instance.
///
/// One mutex guards the listener set and the cache, and is held across
/// delivery, so records are observed in append order even with concurrent
/// producers. The flip side is that listener callbacks run under that lock;
/// see [`LogListener`] for the re-entrancy restriction.
pub struct EventHub {
    state: Mutex<HubState>,
    cache_capacity: Option<usize>,
}

impl EventHub {
    /// Create a hub whose pre-subscription cache grows without bound.
    ///
    /// Records are buffered for as long as no listener is registered, so a
    /// process that never subscribes keeps accumulating them. Use
    /// [`EventHub::bounded`] to cap the buffering phase instead.
    pub fn new() -> Self {
        EventHub {
            state: Mutex::new(HubState {
                listeners: Vec::new(),
                cache: VecDeque::new(),
            }),
            cache_capacity: None,
        }
    }

    /// Create a hub that caches at most `capacity` records while no
    /// listener is registered.
    ///
    /// When the cache is full, the oldest record is evicted to admit the
    /// new one, so a late subscriber sees the most recent `capacity`
    /// records of the buffering phase. The minimum capacity is 1 (clamped).
    pub fn bounded(capacity: usize) -> Self {
        EventHub {
            state: Mutex::new(HubState {
                listeners: Vec::new(),
                cache: VecDeque::new(),
            }),
            cache_capacity: Some(capacity.max(1)),
        }
    }

    // A panicking listener poisons the mutex; keep serving from the inner
    // state so the hub stays usable after the panic unwound past us.
    fn lock(&self) -> std::sync::MutexGuard<'_, HubState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Publish one record.
    ///
    /// With no listeners registered the record is pushed at the tail of the
    /// cache (evicting the oldest entry first on a bounded hub). Otherwise
    /// it is delivered to every listener in registration order,
    /// synchronously, on the calling thread.
    pub fn append(&self, record: LogRecord) {
        let mut state = self.lock();
        if state.listeners.is_empty() {
            if let Some(capacity) = self.cache_capacity {
                while state.cache.len() >= capacity {
                    state.cache.pop_front();
                }
            }
            state.cache.push_back(record);
        } else {
            for listener in &state.listeners {
                listener.handle(&record);
            }
        }
    }

    /// Register a listener at the tail of the listener set.
    ///
    /// No uniqueness is enforced: subscribing the same listener twice means
    /// it is invoked twice per record.
    ///
    /// If this is the first registration and records were cached, the whole
    /// backlog is delivered to the listener at position 0 in FIFO order and
    /// the cache is cleared, before this call returns. Records appended
    /// after that are delivered directly.
    pub fn subscribe(&self, listener: Arc<dyn LogListener>) {
        let mut state = self.lock();
        state.listeners.push(listener);
        if state.listeners.len() == 1 && !state.cache.is_empty() {
            let backlog = std::mem::take(&mut state.cache);
            let first = Arc::clone(&state.listeners[0]);
            for record in &backlog {
                first.handle(record);
            }
        }
    }

    /// Remove the first registered occurrence of `listener`, matched by
    /// `Arc` pointer identity. No-op when it was never registered. The
    /// cache is untouched.
    pub fn unsubscribe(&self, listener: &Arc<dyn LogListener>) {
        let mut state = self.lock();
        if let Some(pos) = state
            .listeners
            .iter()
            .position(|registered| Arc::ptr_eq(registered, listener))
        {
            state.listeners.remove(pos);
        }
    }

    /// Remove every listener.
    ///
    /// The cache is untouched, so a subsequent [`append`](EventHub::append)
    /// with zero listeners starts buffering again.
    pub fn unsubscribe_all(&self) {
        self.lock().listeners.clear();
    }

    /// Number of currently registered listeners.
    pub fn listener_count(&self) -> usize {
        self.lock().listeners.len()
    }

    /// Number of records waiting in the pre-subscription cache.
    pub fn cached_len(&self) -> usize {
        self.lock().cache.len()
    }
}

impl Default for EventHub {
    fn default() -> Self {
        EventHub::new()
    }
}
