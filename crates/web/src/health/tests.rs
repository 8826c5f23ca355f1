use super::*;
use favorites::mock::MemStore;
use serial_test::serial;
use std::sync::Arc;
use tokio::sync::watch;

// Records every published status in a watch cell so the test observes
// exactly what the registry would.
struct WatchSink(watch::Sender<Option<bool>>);

#[async_trait]
impl StatusSink for WatchSink {
    async fn publish(&mut self, serving: bool) {
        let _ = self.0.send(Some(serving));
    }
}

async fn wait_for(rx: &mut watch::Receiver<Option<bool>>, want: bool) {
    tokio::time::timeout(Duration::from_secs(5), async {
        while *rx.borrow_and_update() != Some(want) {
            rx.changed().await.expect("worker dropped the status sink");
        }
    })
    .await
    .unwrap_or_else(|_| panic!("status did not reach serving={want} within deadline"));
}

fn spawn_worker(store: Arc<MemStore>) -> (watch::Receiver<Option<bool>>, tokio::task::JoinHandle<()>) {
    let controller = Controller::new(store);
    let (tx, rx) = watch::channel(None);
    let handle = tokio::spawn(worker(WatchSink(tx), controller));
    (rx, handle)
}

#[tokio::test]
#[serial]
async fn test_worker_tracks_probe_failure_and_recovery() {
    // Tight interval so each transition lands within the test deadline.
    let _guard = common::config::ConfigGuard::new("HEALTH_CHECK_INTERVAL", "0");

    let store = Arc::new(MemStore::new());
    let (mut rx, handle) = spawn_worker(store.clone());

    // Healthy store publishes SERVING.
    wait_for(&mut rx, true).await;

    // A failing probe flips the signal within one check interval.
    store.set_probe_fails(true);
    wait_for(&mut rx, false).await;

    // Recovery flips it back within one interval.
    store.set_probe_fails(false);
    wait_for(&mut rx, true).await;

    handle.abort();
}

#[tokio::test]
#[serial]
async fn test_worker_reports_not_serving_on_unhealthy_probe() {
    let _guard = common::config::ConfigGuard::new("HEALTH_CHECK_INTERVAL", "0");

    let store = Arc::new(MemStore::new());
    store.set_probe_unhealthy(true);
    let (mut rx, handle) = spawn_worker(store.clone());

    // A probe that answers "unhealthy" is published as NOT_SERVING even
    // though it is not an error.
    wait_for(&mut rx, false).await;

    store.set_probe_unhealthy(false);
    wait_for(&mut rx, true).await;

    handle.abort();
}
