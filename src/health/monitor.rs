//! Active health probing through the client layer.
//!
//! # Responsibilities
//! - Probe the health path immediately on start, then on an interval
//! - Publish state transitions over a watch channel
//! - Serve manual rechecks out of band (offline → online without waiting
//!   for the next tick)

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tokio::sync::{broadcast, mpsc, watch};
use tokio::time;

use crate::client::{ApiCall, ApiClient};
use crate::config::HealthConfig;
use crate::health::state::HealthState;

/// Periodic health prober.
pub struct HealthMonitor {
    client: Arc<ApiClient>,
    config: HealthConfig,
    tx: watch::Sender<HealthState>,
    recheck_rx: mpsc::UnboundedReceiver<()>,
}

/// Caller-facing handle: observe state, request a recheck.
#[derive(Clone)]
pub struct HealthHandle {
    rx: watch::Receiver<HealthState>,
    recheck_tx: mpsc::UnboundedSender<()>,
}

impl HealthHandle {
    /// Current state.
    pub fn state(&self) -> HealthState {
        *self.rx.borrow()
    }

    /// Watch receiver for awaiting transitions.
    pub fn watch(&self) -> watch::Receiver<HealthState> {
        self.rx.clone()
    }

    /// Trigger an out-of-band probe (e.g. a user click while offline).
    pub fn recheck(&self) {
        let _ = self.recheck_tx.send(());
    }
}

impl HealthMonitor {
    pub fn new(client: Arc<ApiClient>, config: HealthConfig) -> (Self, HealthHandle) {
        let (tx, rx) = watch::channel(HealthState::Checking);
        let (recheck_tx, recheck_rx) = mpsc::unbounded_channel();
        (
            Self {
                client,
                config,
                tx,
                recheck_rx,
            },
            HealthHandle { rx, recheck_tx },
        )
    }

    /// Run until shutdown. The first tick fires immediately.
    pub async fn run(self, mut shutdown: broadcast::Receiver<()>) {
        let Self {
            client,
            config,
            tx,
            mut recheck_rx,
        } = self;

        tracing::info!(
            interval = config.interval_secs,
            path = %config.path,
            "Health monitor starting"
        );

        let mut ticker = time::interval(Duration::from_secs(config.interval_secs));

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    probe(&client, &config, &tx).await;
                }
                Some(()) = recheck_rx.recv() => {
                    probe(&client, &config, &tx).await;
                }
                _ = shutdown.recv() => {
                    tracing::info!("Health monitor shutting down");
                    break;
                }
            }
        }
    }
}

async fn probe(client: &ApiClient, config: &HealthConfig, tx: &watch::Sender<HealthState>) {
    let call = ApiCall::get(config.path.as_str())
        .timeout(Duration::from_secs(config.probe_timeout_secs));

    let next = match client.request::<Value>(call).await {
        Ok(_) => HealthState::Online,
        Err(e) => {
            tracing::warn!(error = %e, "Health probe failed");
            HealthState::Offline
        }
    };

    let previous = *tx.borrow();
    if previous != next {
        tracing::info!(?previous, ?next, "Health state changed");
    }
    let _ = tx.send(next);
}
