use async_trait::async_trait;
use favorites::{Controller, Store};
use logging::*;
use std::time::Duration;
use tonic_health::ServingStatus;
use tonic_health::server::HealthReporter;

#[cfg(test)]
mod tests;

fn seconds(key: &str, fallback: u64) -> Duration {
    let value = common::config::get(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(fallback);
    Duration::from_secs(value)
}

/// Sink for the serving signal. The worker is the sole writer; readers
/// of the health registry only ever see the latest published value.
#[async_trait]
pub(crate) trait StatusSink: Send {
    async fn publish(&mut self, serving: bool);
}

#[async_trait]
impl StatusSink for HealthReporter {
    async fn publish(&mut self, serving: bool) {
        let status = if serving {
            ServingStatus::Serving
        } else {
            ServingStatus::NotServing
        };
        // Empty service name publishes the overall server status.
        self.set_service_status("", status).await;
    }
}

/// Periodically derives the serving signal from store connectivity.
///
/// Runs for the lifetime of the process: each cycle probes the store
/// through the controller, publishes the outcome to the sink and sleeps
/// one check interval, so a connectivity change is reflected within at
/// most one interval.
pub(crate) async fn worker<S: Store, P: StatusSink>(mut sink: P, controller: Controller<S>) {
    let log = DEFAULT.new(o!("module" => "health_worker"));
    let interval = seconds("HEALTH_CHECK_INTERVAL", 3);
    let ping_timeout = seconds("MONGO_CLIENT_PING_TIMEOUT", 10);

    info!(log, "health check worker started";
        "interval" => ?interval,
        "ping_timeout" => ?ping_timeout,
    );

    loop {
        let serving = controller.health_check(ping_timeout).await;
        if !serving {
            warn!(log, "store unreachable"; "status" => "NOT_SERVING");
        }
        sink.publish(serving).await;

        tokio::time::sleep(interval).await;
    }
}
