//! A single pending sign request.

use crate::account::CompleteFunc;
use crate::error::SignError;
use crate::types::{Hash, Meta, RequestContext};
use chrono::{DateTime, Utc};
use std::fmt;
use tokio::sync::{oneshot, Mutex, MutexGuard};
use uuid::Uuid;

/// Final outcome of a sign request.
pub type SignResult = Result<Hash, SignError>;

/// Result slot read by waiters.
///
/// Holds the receiving half of the request's single-slot channel until the
/// outcome arrives, then keeps the outcome so later waiters see the same value.
pub(crate) enum ResultSlot {
    Pending(oneshot::Receiver<SignResult>),
    Delivered(SignResult),
}

/// A signing request awaiting approval.
pub struct Request {
    id: String,
    meta: Meta,
    context: RequestContext,
    created_at: DateTime<Utc>,
    complete_fn: Box<dyn CompleteFunc>,
    result: Mutex<ResultSlot>,
}

impl Request {
    /// Build a request with a fresh ID, returning it with the sender for its outcome.
    pub(crate) fn new(
        context: RequestContext,
        meta: Meta,
        complete_fn: Box<dyn CompleteFunc>,
    ) -> (Self, oneshot::Sender<SignResult>) {
        let (tx, rx) = oneshot::channel();
        let request = Self {
            id: Uuid::new_v4().to_string(),
            meta,
            context,
            created_at: Utc::now(),
            complete_fn,
            result: Mutex::new(ResultSlot::Pending(rx)),
        };
        (request, tx)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn meta(&self) -> &Meta {
        &self.meta
    }

    pub fn method(&self) -> &str {
        &self.meta.method
    }

    pub fn args(&self) -> &serde_json::Value {
        &self.meta.args
    }

    pub fn context(&self) -> &RequestContext {
        &self.context
    }

    /// ID of the RPC message that created this request, if any.
    pub fn message_id(&self) -> Option<&str> {
        self.context.message_id.as_deref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub(crate) fn complete_fn(&self) -> &dyn CompleteFunc {
        self.complete_fn.as_ref()
    }

    pub(crate) async fn result_slot(&self) -> MutexGuard<'_, ResultSlot> {
        self.result.lock().await
    }
}

impl fmt::Debug for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Request")
            .field("id", &self.id)
            .field("meta", &self.meta)
            .field("message_id", &self.context.message_id)
            .field("created_at", &self.created_at)
            .finish_non_exhaustive()
    }
}
