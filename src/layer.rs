use crate::hub::EventHub;
use crate::record::{CapturedError, LogRecord};
use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::{Context, Layer};
use tracing_subscriber::registry::LookupSpan;

/// `tracing_subscriber` layer that observes events and forwards them to an
/// [`EventHub`] as [`LogRecord`]s.
///
/// The layer does no level filtering and no formatting: it hands the hub the
/// raw structured data of every event it sees. Compose it with the standard
/// `tracing_subscriber` filter layers to narrow what reaches the hub.
///
/// Delivery is synchronous: `hub.append` runs on the thread that emitted the
/// event, and so do any listener callbacks it triggers.
pub struct HubLayer {
    hub: Arc<EventHub>,
    /// Total events seen by the layer.
    pub total_events: Arc<AtomicU64>,
}

impl HubLayer {
    /// Create a layer that appends every observed event to `hub`.
    pub fn new(hub: Arc<EventHub>) -> Self {
        HubLayer {
            hub,
            total_events: Arc::new(AtomicU64::new(0)),
        }
    }

    /// The hub this layer forwards to.
    pub fn hub(&self) -> &Arc<EventHub> {
        &self.hub
    }
}

impl<S> Layer<S> for HubLayer
where
    S: Subscriber + for<'span> LookupSpan<'span>,
{
    fn on_event(&self, event: &Event, _ctx: Context<'_, S>) {
        self.total_events.fetch_add(1, Ordering::Relaxed);

        let mut fields = BTreeMap::new();
        let mut message: Option<String> = None;
        let mut exception: Option<CapturedError> = None;

        let mut visitor = FieldVisitor {
            fields: &mut fields,
            message: &mut message,
            exception: &mut exception,
        };
        event.record(&mut visitor);

        let meta = event.metadata();
        let record = LogRecord {
            timestamp: Utc::now(),
            level: *meta.level(),
            target: meta.target().to_string(),
            module_path: meta.module_path().map(|s| s.to_string()),
            file: meta.file().map(|s| s.to_string()),
            line: meta.line(),
            fields,
            message,
            exception,
        };

        self.hub.append(record);
    }
}

use tracing::field::{Field, Visit};

struct FieldVisitor<'a> {
    fields: &'a mut BTreeMap<String, serde_json::Value>,
    message: &'a mut Option<String>,
    exception: &'a mut Option<CapturedError>,
}

impl<'a> Visit for FieldVisitor<'a> {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            *self.message = Some(value.to_string());
        } else {
            self.fields.insert(
                field.name().to_string(),
                serde_json::Value::String(value.to_string()),
            );
        }
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.fields
            .insert(field.name().to_string(), serde_json::Value::from(value));
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.fields
            .insert(field.name().to_string(), serde_json::Value::from(value));
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        self.fields
            .insert(field.name().to_string(), serde_json::Value::from(value));
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.fields
            .insert(field.name().to_string(), serde_json::Value::from(value));
    }

    fn record_error(&mut self, field: &Field, value: &(dyn std::error::Error + 'static)) {
        // The first error-valued field becomes the record's exception;
        // further ones are kept as plain rendered fields.
        if self.exception.is_none() {
            *self.exception = Some(CapturedError::from_error(value));
        } else {
            self.fields.insert(
                field.name().to_string(),
                serde_json::Value::String(value.to_string()),
            );
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        // The event message arrives here as pre-formatted arguments.
        if field.name() == "message" {
            *self.message = Some(format!("{:?}", value));
        } else {
            self.fields.insert(
                field.name().to_string(),
                serde_json::Value::String(format!("{:?}", value)),
            );
        }
    }
}
