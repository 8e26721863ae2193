use std::sync::Arc;
use std::time::Duration;

use tracing::info;
use tracing_subscriber::EnvFilter;

use claims_server::events::{ChannelSink, Event, EventSink, LogSink};
use claims_server::monitor::{DelayMonitor, MonitorConfig};
use claims_server::store::InMemoryStore;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Monitor cadence from the environment, defaulting to 5 minutes.
    let interval_secs = std::env::var("MONITOR_INTERVAL_SECS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(5 * 60);

    let config = MonitorConfig {
        interval: Duration::from_secs(interval_secs),
        ..MonitorConfig::default()
    };

    let store = Arc::new(InMemoryStore::new());

    // Event pipeline: the monitor publishes into a channel, a drain task
    // forwards to the log sink. Real deployments replace the drain with
    // their notification transport.
    let (sink, mut rx) = ChannelSink::new();
    tokio::spawn(async move {
        let log = LogSink;
        while let Some(event) = rx.recv().await {
            if let Event::BookingCompleted(e) = &event {
                info!(
                    booking_id = %e.booking_id,
                    delay_minutes = e.delay_minutes,
                    eligible = e.is_eligible_for_claim,
                    "journey completed"
                );
            }
            log.publish(event);
        }
    });

    info!(
        interval_secs,
        "delay monitor starting (feed ingestion and API layers run separately)"
    );

    let monitor = DelayMonitor::new(store, Arc::new(sink), config);
    monitor.run_forever().await;
}
