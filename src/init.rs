use crate::hub::EventHub;
use crate::layer::HubLayer;
use std::sync::Arc;
use tracing::subscriber::SetGlobalDefaultError;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::Registry;

/// Configuration for [`init_with_config`].
///
/// **Fields**
/// - `cache_capacity`: bound on the pre-subscription cache. `None` keeps it
///   unbounded; `Some(n)` evicts the oldest record once `n` are buffered.
/// - `enable_stdout`: if `true`, a `tracing_subscriber::fmt` layer is
///   stacked on top of the hub layer so events are also printed to the
///   console.
#[derive(Clone, Debug)]
pub struct HubConfig {
    pub cache_capacity: Option<usize>,
    pub enable_stdout: bool,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            cache_capacity: None,
            enable_stdout: true,
        }
    }
}

/// Error returned when installing the global subscriber fails.
#[derive(thiserror::Error, Debug)]
pub enum InitError {
    #[error("global tracing subscriber is already set")]
    SubscriberAlreadySet(#[from] SetGlobalDefaultError),
}

/// Clears every hub listener when dropped.
///
/// Hold this for as long as the application wants its listeners attached;
/// dropping it is the equivalent of the logging pipeline shutting the
/// appender down. Records emitted after the drop are buffered again until
/// someone re-subscribes.
#[must_use = "dropping the guard unsubscribes all hub listeners"]
pub struct HubGuard {
    hub: Arc<EventHub>,
}

impl Drop for HubGuard {
    fn drop(&mut self) {
        self.hub.unsubscribe_all();
    }
}

/// Initialize the global `tracing` subscriber with a hub layer built from
/// the given [`HubConfig`].
///
/// **Parameters**
/// - `config`: [`HubConfig`] controlling the cache bound and console echo.
///
/// **Returns**
/// - The freshly constructed [`EventHub`], for registering listeners, and a
///   [`HubGuard`] tying listener lifetime to a scope.
/// - [`InitError`] if another global subscriber was installed first.
///
/// **Effects**
///
/// Installs a [`Registry`] combined with [`HubLayer`] as the global default
/// subscriber, so all `tracing` events in the process reach the hub.
///
/// Applications that compose their own subscriber stack can skip this and
/// layer [`HubLayer::new`] onto it directly.
pub fn init_with_config(config: HubConfig) -> Result<(Arc<EventHub>, HubGuard), InitError> {
    let hub = Arc::new(match config.cache_capacity {
        Some(capacity) => EventHub::bounded(capacity),
        None => EventHub::new(),
    });
    let layer = HubLayer::new(Arc::clone(&hub));

    // The fmt layer changes the subscriber's type, so the stack is
    // assembled in two variants.
    if config.enable_stdout {
        let fmt_layer = tracing_subscriber::fmt::layer();
        let subscriber = Registry::default().with(layer).with(fmt_layer);
        tracing::subscriber::set_global_default(subscriber)?;
    } else {
        let subscriber = Registry::default().with(layer);
        tracing::subscriber::set_global_default(subscriber)?;
    }

    let guard = HubGuard {
        hub: Arc::clone(&hub),
    };
    Ok((hub, guard))
}

/// Initialize with defaults: unbounded cache, console echo enabled.
///
/// Equivalent to calling [`init_with_config`] with [`HubConfig::default`].
pub fn init() -> Result<(Arc<EventHub>, HubGuard), InitError> {
    init_with_config(HubConfig::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory_listener::MemoryListener;

    #[test]
    fn default_config_keeps_cache_unbounded() {
        let config = HubConfig::default();
        assert_eq!(config.cache_capacity, None);
        assert!(config.enable_stdout);
    }

    #[test]
    fn guard_drop_unsubscribes_all_listeners() {
        let hub = Arc::new(EventHub::new());
        hub.subscribe(Arc::new(MemoryListener::new()));
        hub.subscribe(Arc::new(MemoryListener::new()));

        let guard = HubGuard {
            hub: Arc::clone(&hub),
        };
        drop(guard);

        assert_eq!(hub.listener_count(), 0);
    }
}
