//! Shutdown signaling.
//!
//! One broadcast channel fans the stop signal out to every long-running
//! task; the HTTP server and the health monitor each hold a receiver and
//! drain it in their own select loops.

use tokio::sync::broadcast;

/// Fan-out stop signal for the gateway's long-running tasks.
pub struct Shutdown {
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    /// New receiver. Each task drains its own; a receiver only sees
    /// triggers issued after it subscribed.
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// Signal every current subscriber to stop.
    pub fn trigger(&self) {
        let _ = self.tx.send(());
    }

    /// Arm a background task that triggers on Ctrl-C.
    pub fn trigger_on_ctrl_c(&self) {
        let tx = self.tx.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("Ctrl-C received, shutting down");
                let _ = tx.send(());
            }
        });
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}
