use std::sync::Arc;
use tracing::{error, info, warn};

use tracing_event_hub::init::{init_with_config, HubConfig};
use tracing_event_hub::record::LogRecord;

fn main() {
    let config = HubConfig {
        cache_capacity: None,
        enable_stdout: false,
    };
    let (hub, _guard) = init_with_config(config).expect("install subscriber");

    hub.subscribe(Arc::new(|record: &LogRecord| {
        println!(
            "[listener] {} {} {}",
            record.timestamp,
            record.level,
            record.message.as_deref().unwrap_or("")
        );
    }));

    info!("starting service");
    warn!(disk_free_mb = 420, "low disk space");
    error!(user_id = 42, reason = "invalid password", "auth failed");
}
