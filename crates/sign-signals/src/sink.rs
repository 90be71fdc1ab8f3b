//! Destinations for rendered signals.

use tokio::sync::mpsc;
use tracing::debug;

/// Delivers a rendered signal to subscribers.
#[cfg_attr(test, mockall::automock)]
pub trait SignalSink: Send + Sync {
    fn send(&self, payload: String);
}

/// Sink forwarding signals to an in-process channel.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<String>,
}

impl ChannelSink {
    /// Create a sink and the receiver its signals arrive on.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<String>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl SignalSink for ChannelSink {
    fn send(&self, payload: String) {
        if self.tx.send(payload).is_err() {
            debug!("Signal subscriber is gone, dropping signal");
        }
    }
}
