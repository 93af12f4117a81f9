use std::sync::Arc;
use tracing::{error, info};

use tracing_event_hub::init::{init_with_config, HubConfig};
use tracing_event_hub::record::LogRecord;

fn main() {
    let config = HubConfig {
        cache_capacity: Some(64),
        enable_stdout: false,
    };
    let (hub, _guard) = init_with_config(config).expect("install subscriber");

    // No listener yet: these land in the hub's cache.
    info!("loading configuration");
    error!(path = "/etc/app.toml", "config file missing, using defaults");

    println!("cached before subscription: {}", hub.cached_len());

    // First subscription drains the backlog in emission order.
    hub.subscribe(Arc::new(|record: &LogRecord| {
        println!(
            "[listener] {} {}",
            record.level,
            record.message.as_deref().unwrap_or("")
        );
    }));

    info!("listener attached, delivery is direct from here on");
}
