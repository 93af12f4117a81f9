use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::error::Error;
use tracing::Level;

/// Immutable snapshot of one log event.
///
/// Built once per incoming `tracing` event and never modified afterwards.
/// Listeners receive the record by shared reference, so the same instance
/// may be observed by several listeners at once.
#[derive(Debug, Clone, Serialize)]
pub struct LogRecord {
    pub timestamp: DateTime<Utc>,
    #[serde(serialize_with = "serialize_level")]
    pub level: Level,
    pub target: String,
    pub module_path: Option<String>,
    pub file: Option<String>,
    pub line: Option<u32>,
    pub fields: BTreeMap<String, serde_json::Value>,
    pub message: Option<String>,
    pub exception: Option<CapturedError>,
}

/// Owned snapshot of an error captured from an event field.
///
/// A borrowed `&dyn Error` cannot outlive the event callback, so the
/// error's rendered message and its `source()` chain are copied out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CapturedError {
    pub message: String,
    /// Rendered messages of the `source()` chain, outermost cause first.
    pub chain: Vec<String>,
}

impl CapturedError {
    pub fn from_error(err: &(dyn Error + 'static)) -> Self {
        let mut chain = Vec::new();
        let mut source = err.source();
        while let Some(cause) = source {
            chain.push(cause.to_string());
            source = cause.source();
        }
        CapturedError {
            message: err.to_string(),
            chain,
        }
    }
}

fn serialize_level<S: Serializer>(level: &Level, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(level)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Inner;

    impl std::fmt::Display for Inner {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "connection refused")
        }
    }

    impl Error for Inner {}

    #[derive(Debug)]
    struct Outer(Inner);

    impl std::fmt::Display for Outer {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "request failed")
        }
    }

    impl Error for Outer {
        fn source(&self) -> Option<&(dyn Error + 'static)> {
            Some(&self.0)
        }
    }

    #[test]
    fn captured_error_keeps_source_chain() {
        let err = Outer(Inner);
        let captured = CapturedError::from_error(&err);
        assert_eq!(captured.message, "request failed");
        assert_eq!(captured.chain, vec!["connection refused".to_string()]);
    }

    #[test]
    fn record_serializes_level_as_text() {
        let record = LogRecord {
            timestamp: Utc::now(),
            level: Level::WARN,
            target: "app".to_string(),
            module_path: None,
            file: None,
            line: None,
            fields: BTreeMap::new(),
            message: Some("low disk space".to_string()),
            exception: None,
        };

        let json = serde_json::to_value(&record).expect("serialize record");
        assert_eq!(json["level"], "WARN");
        assert_eq!(json["message"], "low disk space");
    }
}
