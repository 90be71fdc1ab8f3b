//! In-memory registry of pending sign requests.

use crate::account::{AccountVerifier, CompleteFunc};
use crate::config::QueueConfig;
use crate::error::SignError;
use crate::notify::{Notifier, SignEvent, SignObserver};
use crate::request::{Request, ResultSlot, SignResult};
use crate::types::{Meta, RequestContext};
use secrecy::SecretString;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{oneshot, RwLock};
use tracing::{debug, info, instrument, warn};

/// Registry bookkeeping for one request.
struct PendingEntry {
    request: Arc<Request>,
    /// Set while an approval attempt is running for this request.
    locked: bool,
    result_tx: oneshot::Sender<SignResult>,
}

/// Pending sign requests, keyed by request ID.
///
/// Every request reaches a durable outcome (approved, discarded, timed out or
/// failed) at most once. Transient failures such as a wrong password keep the
/// request registered so it can be approved again.
///
/// The map lock is only held while the map or a completion guard changes,
/// never while the verifier or completion callback runs.
pub struct PendingRequests {
    requests: RwLock<HashMap<String, PendingEntry>>,
    notifier: Notifier,
    completion_timeout: Duration,
}

impl PendingRequests {
    /// Create an empty registry reporting events to `observer`.
    ///
    /// Spawns the event dispatcher, so it must be called within a tokio runtime.
    pub fn new(observer: Arc<dyn SignObserver>) -> Self {
        Self::with_config(&QueueConfig::default(), observer)
    }

    pub fn with_config(config: &QueueConfig, observer: Arc<dyn SignObserver>) -> Self {
        info!(
            "Pending sign request queue initialized (completion_timeout={:?}, notification_buffer={})",
            config.completion_timeout, config.notification_buffer
        );

        Self {
            requests: RwLock::new(HashMap::new()),
            notifier: Notifier::spawn(observer, config.notification_buffer),
            completion_timeout: config.completion_timeout,
        }
    }

    /// Add a new signing request.
    #[instrument(skip_all, fields(method = %meta.method))]
    pub async fn add<F>(&self, context: RequestContext, meta: Meta, complete: F) -> Arc<Request>
    where
        F: CompleteFunc + 'static,
    {
        let (request, result_tx) = Request::new(context, meta, Box::new(complete));
        let request = Arc::new(request);

        let mut requests = self.requests.write().await;
        requests.insert(
            request.id().to_string(),
            PendingEntry {
                request: request.clone(),
                locked: false,
                result_tx,
            },
        );
        info!("Sign request created: {}", request.id());

        self.notifier.dispatch(SignEvent::Enqueued {
            request: request.clone(),
        });

        request
    }

    /// Get a request by its ID.
    pub async fn get(&self, id: &str) -> Result<Arc<Request>, SignError> {
        let requests = self.requests.read().await;
        requests
            .get(id)
            .map(|entry| entry.request.clone())
            .ok_or(SignError::NotFound)
    }

    /// Any pending request, or `None` if the queue is empty.
    ///
    /// Which one is returned is unspecified and may change between calls; this
    /// is meant for callers that expect a single outstanding request.
    pub async fn first(&self) -> Option<Arc<Request>> {
        let requests = self.requests.read().await;
        requests.values().next().map(|entry| entry.request.clone())
    }

    /// Whether a request with the given ID is pending.
    pub async fn has(&self, id: &str) -> bool {
        self.requests.read().await.contains_key(id)
    }

    /// Number of pending requests.
    pub async fn count(&self) -> usize {
        self.requests.read().await.len()
    }

    /// Approve a request, signing it with the account unlocked by `password`.
    ///
    /// Fails with [`SignError::InProgress`] if another approval of the same
    /// request is running, and with [`SignError::NotFound`] (without calling
    /// the verifier) if the ID is unknown.
    #[instrument(skip(self, password, verifier))]
    pub async fn approve(
        &self,
        id: &str,
        password: &SecretString,
        verifier: &dyn AccountVerifier,
    ) -> SignResult {
        info!("Completing sign request {}", id);
        let request = match self.try_lock(id).await {
            Ok(request) => request,
            Err(e) => {
                warn!("Can't process sign request {}: {}", id, e);
                return Err(e);
            }
        };

        let account = match verifier.verify(password).await {
            Ok(account) => account,
            Err(e) => {
                self.complete(&request, Err(e.clone())).await;
                return Err(e);
            }
        };

        let outcome = request.complete_fn().complete(account).await;
        match &outcome {
            Ok(hash) => info!("Sign request {} completed with hash {}", id, hash),
            Err(e) => info!("Sign request {} failed: {}", id, e),
        }

        self.complete(&request, outcome.clone()).await;

        outcome
    }

    /// Discard a pending request.
    #[instrument(skip(self))]
    pub async fn discard(&self, id: &str) -> Result<(), SignError> {
        let request = self.get(id).await?;
        self.complete(&request, Err(SignError::Discarded)).await;
        Ok(())
    }

    /// Wait until the request is approved, discarded or fails durably.
    ///
    /// Each time `timeout` elapses without an outcome the request is completed
    /// with [`SignError::TimedOut`], even if an approval is still running. An
    /// approval that finishes after that returns its own result to its caller,
    /// but the waiter only ever sees the first durable outcome.
    #[instrument(skip(self))]
    pub async fn wait(&self, id: &str, timeout: Duration) -> SignResult {
        let request = self.get(id).await?;
        let mut slot = request.result_slot().await;

        loop {
            let rx = match &mut *slot {
                ResultSlot::Delivered(outcome) => return outcome.clone(),
                ResultSlot::Pending(rx) => rx,
            };

            match tokio::time::timeout(timeout, rx).await {
                Ok(Ok(outcome)) => {
                    *slot = ResultSlot::Delivered(outcome.clone());
                    return outcome;
                }
                Ok(Err(_)) => {
                    // Sender dropped without a result; the entry is gone.
                    return Err(SignError::NotFound);
                }
                Err(_) => {
                    debug!("Sign request {} timed out after {:?}", id, timeout);
                    self.complete(&request, Err(SignError::TimedOut)).await;
                }
            }
        }
    }

    /// [`wait`](Self::wait) using the configured completion timeout.
    pub async fn wait_for_completion(&self, id: &str) -> SignResult {
        self.wait(id, self.completion_timeout).await
    }

    /// Mark a request as being completed so no other approval can start.
    async fn try_lock(&self, id: &str) -> Result<Arc<Request>, SignError> {
        let mut requests = self.requests.write().await;
        let entry = requests.get_mut(id).ok_or(SignError::NotFound)?;
        if entry.locked {
            return Err(SignError::InProgress);
        }
        entry.locked = true;
        Ok(entry.request.clone())
    }

    /// Record the outcome of a completion attempt.
    ///
    /// Every attempt is reported to observers, including one that finishes
    /// after the request was already resolved. Transient errors release the guard and keep the request pending.
    /// Anything else removes the request and delivers the outcome to its waiter.
    async fn complete(&self, request: &Arc<Request>, outcome: SignResult) {
        let mut requests = self.requests.write().await;

        self.notifier.dispatch(SignEvent::Returned {
            request: request.clone(),
            outcome: outcome.clone(),
        });

        let Some(entry) = requests.get_mut(request.id()) else {
            debug!("Sign request {} already completed", request.id());
            return;
        };
        entry.locked = false;

        if let Err(e) = &outcome {
            if e.is_transient() {
                debug!("Sign request {} stays pending after transient error: {}", request.id(), e);
                return;
            }
        }

        let Some(entry) = requests.remove(request.id()) else {
            return;
        };

        if entry.result_tx.send(outcome).is_err() {
            debug!("Sign request {} outcome has no receiver", request.id());
        }
    }
}
