use std::sync::Arc;
use std::time::Duration;

use tokio::time::interval;

use crate::inventory::Store;
use crate::resolver::ConnectionResolver;
use crate::utils::TokenGuard;

/// Status poller: periodically re-runs the connection test for every known
/// switch so the dashboard reflects reachability without manual refreshes.
pub struct StatusPoller {
    store: Store,
    resolver: Arc<ConnectionResolver>,
    poll_interval: Duration,
    sweeps: Arc<TokenGuard>,
    stop_tx: Option<tokio::sync::oneshot::Sender<()>>,
}

impl StatusPoller {
    pub fn new(store: Store, resolver: Arc<ConnectionResolver>, poll_interval: Duration) -> Self {
        Self {
            store,
            resolver,
            poll_interval,
            sweeps: Arc::new(TokenGuard::new()),
            stop_tx: None,
        }
    }

    /// Start the poller
    pub fn start(&mut self) {
        let (stop_tx, mut stop_rx) = tokio::sync::oneshot::channel();
        self.stop_tx = Some(stop_tx);

        let store = self.store.clone();
        let resolver = Arc::clone(&self.resolver);
        let sweeps = Arc::clone(&self.sweeps);
        let poll_interval = self.poll_interval;

        tokio::spawn(async move {
            let mut ticker = interval(poll_interval);

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        // Each sweep runs as its own task; one still in
                        // flight at the next tick sees a newer token and
                        // abandons its remaining work.
                        let token = sweeps.issue();
                        tokio::spawn(sweep(
                            store.clone(),
                            Arc::clone(&resolver),
                            Arc::clone(&sweeps),
                            token,
                        ));
                    }
                    _ = &mut stop_rx => {
                        tracing::info!("Status poller stopped");
                        break;
                    }
                }
            }
        });
    }

    /// Stop the poller
    #[allow(dead_code)]
    pub fn stop(&mut self) {
        if let Some(tx) = self.stop_tx.take() {
            let _ = tx.send(());
        }
    }
}

/// Re-test every switch once. A sweep that has been superseded by a newer
/// tick abandons its remaining work instead of overwriting fresher results.
async fn sweep(store: Store, resolver: Arc<ConnectionResolver>, sweeps: Arc<TokenGuard>, token: u64) {
    let switches = store.list_switches().await;

    for record in switches {
        if !sweeps.is_current(token) {
            tracing::debug!("Abandoning stale poll sweep {}", token);
            return;
        }
        // Failures are already classified and written to the record; nothing
        // more to do here than note them.
        if let Err(err) = resolver.resolve(&record.address, None).await {
            tracing::debug!("Poll of {} failed: {}", record.address, err);
        }
    }
}
