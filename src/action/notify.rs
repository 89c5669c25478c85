//! Notification sink for action failures.
//!
//! The UI surfaces action errors as transient notifications; the sink is a
//! trait so the wrapper stays independent of any particular toast surface.

use std::sync::Arc;
use tokio::sync::mpsc;

/// Receiver of transient, user-visible messages.
pub trait Notifier: Send + Sync {
    fn notify(&self, message: &str);
}

/// Notifier forwarding messages over a channel to whatever renders them.
pub struct ChannelNotifier {
    tx: mpsc::UnboundedSender<String>,
}

impl ChannelNotifier {
    pub fn new() -> (Arc<Self>, mpsc::UnboundedReceiver<String>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Arc::new(Self { tx }), rx)
    }
}

impl Notifier for ChannelNotifier {
    fn notify(&self, message: &str) {
        // The rendering side may already be gone; losing a toast is fine.
        let _ = self.tx.send(message.to_string());
    }
}
