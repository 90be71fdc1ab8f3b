//! Queue observer publishing signals.

use crate::envelope::render;
use crate::sink::SignalSink;
use async_trait::async_trait;
use sign_queue::{SignEvent, SignObserver};
use tracing::{debug, warn};

/// Turns queue events into signals and hands them to a [`SignalSink`].
pub struct SignalObserver<S> {
    sink: S,
}

impl<S: SignalSink> SignalObserver<S> {
    pub fn new(sink: S) -> Self {
        Self { sink }
    }
}

#[async_trait]
impl<S: SignalSink> SignObserver for SignalObserver<S> {
    async fn notify(&self, event: SignEvent) {
        match render(&event) {
            Ok(Some(payload)) => {
                debug!("Sending signal for sign request {}", event.request().id());
                self.sink.send(payload);
            }
            Ok(None) => {}
            Err(e) => warn!(
                "Failed to render signal for sign request {}: {}",
                event.request().id(),
                e
            ),
        }
    }
}
