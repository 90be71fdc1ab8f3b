//! Sign request event delivery.
//!
//! The queue reports two events: a request was added, and a completion attempt
//! returned. Events are pushed onto a bounded channel and handed to a
//! [`SignObserver`] by a background task, so a slow or failing observer can
//! never stall or alter the queue.

use crate::request::{Request, SignResult};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::{debug, warn};

/// Event emitted by the pending request queue.
#[derive(Debug, Clone)]
pub enum SignEvent {
    /// A request was added and is waiting for approval.
    Enqueued { request: Arc<Request> },
    /// A completion attempt finished. Emitted for transient failures too.
    Returned {
        request: Arc<Request>,
        outcome: SignResult,
    },
}

impl SignEvent {
    pub fn request(&self) -> &Arc<Request> {
        match self {
            SignEvent::Enqueued { request } | SignEvent::Returned { request, .. } => request,
        }
    }
}

/// Receives queue events.
#[async_trait]
pub trait SignObserver: Send + Sync {
    async fn notify(&self, event: SignEvent);
}

/// Observer that ignores every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

#[async_trait]
impl SignObserver for NoopObserver {
    async fn notify(&self, _event: SignEvent) {}
}

/// Handle to the background event dispatcher.
#[derive(Debug, Clone)]
pub struct Notifier {
    tx: mpsc::Sender<SignEvent>,
}

impl Notifier {
    /// Spawn the dispatcher task feeding `observer`.
    ///
    /// Must be called from within a tokio runtime. Events are delivered in the
    /// order they were dispatched.
    pub fn spawn(observer: Arc<dyn SignObserver>, buffer: usize) -> Self {
        let (tx, mut rx) = mpsc::channel::<SignEvent>(buffer.max(1));

        tokio::spawn(async move {
            while let Some(event) = rx.recv().await {
                observer.notify(event).await;
            }
            debug!("Sign event dispatcher stopped");
        });

        Self { tx }
    }

    /// Queue an event without waiting. Dropped with a warning if the queue is full.
    pub fn dispatch(&self, event: SignEvent) {
        match self.tx.try_send(event) {
            Ok(()) => {}
            Err(TrySendError::Full(event)) => {
                warn!(
                    "Sign event queue full, dropping event for request {}",
                    event.request().id()
                );
            }
            Err(TrySendError::Closed(event)) => {
                warn!(
                    "Sign event dispatcher is gone, dropping event for request {}",
                    event.request().id()
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::CompleteFunc;
    use crate::error::SignError;
    use crate::types::{Hash, Meta, RequestContext, SelectedAccount};
    use std::time::Duration;
    use tokio::sync::Mutex;

    #[derive(Default)]
    struct Recorder {
        events: Mutex<Vec<SignEvent>>,
    }

    #[async_trait]
    impl SignObserver for Recorder {
        async fn notify(&self, event: SignEvent) {
            self.events.lock().await.push(event);
        }
    }

    fn request() -> Arc<Request> {
        let complete: Box<dyn CompleteFunc> =
            Box::new(|_account: SelectedAccount| async { Ok::<_, SignError>(Hash::default()) });
        let (request, _tx) = Request::new(
            RequestContext::new(),
            Meta::new("personal_sign", serde_json::json!({})),
            complete,
        );
        Arc::new(request)
    }

    #[tokio::test]
    async fn test_events_delivered_in_order() {
        let recorder = Arc::new(Recorder::default());
        let notifier = Notifier::spawn(recorder.clone(), 16);
        let req = request();

        notifier.dispatch(SignEvent::Enqueued { request: req.clone() });
        notifier.dispatch(SignEvent::Returned {
            request: req.clone(),
            outcome: Err(SignError::Discarded),
        });

        tokio::time::sleep(Duration::from_millis(50)).await;

        let events = recorder.events.lock().await;
        assert_eq!(events.len(), 2);
        assert!(matches!(events[0], SignEvent::Enqueued { .. }));
        match &events[1] {
            SignEvent::Returned { request, outcome } => {
                assert_eq!(request.id(), req.id());
                assert_eq!(outcome, &Err(SignError::Discarded));
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_full_queue_drops_without_blocking() {
        let recorder = Arc::new(Recorder::default());
        let notifier = Notifier::spawn(recorder.clone(), 1);
        let req = request();

        // The dispatcher cannot run until this task yields, so only the first
        // event fits in the queue and the rest are dropped.
        let dispatched = tokio::time::timeout(Duration::from_secs(1), async {
            for _ in 0..10 {
                notifier.dispatch(SignEvent::Enqueued { request: req.clone() });
            }
        })
        .await;
        assert!(dispatched.is_ok());

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(recorder.events.lock().await.len(), 1);
    }

    #[tokio::test]
    async fn test_noop_observer() {
        let notifier = Notifier::spawn(Arc::new(NoopObserver), 4);
        notifier.dispatch(SignEvent::Enqueued { request: request() });
    }
}
