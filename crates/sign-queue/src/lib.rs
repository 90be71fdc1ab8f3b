//! Queue of signing requests awaiting approval.
//!
//! An RPC handler adds a request and waits on it; an approval UI or policy
//! layer approves or discards it. Each request reaches exactly one durable
//! outcome, even when approvals, discards and timeouts race:
//!
//! ```text
//! add ─► pending ──approve (wrong password)──► pending
//!           │
//!           ├─approve (ok / durable error)──► removed, outcome delivered
//!           ├─discard───────────────────────► removed, Discarded
//!           └─wait timeout──────────────────► removed, TimedOut
//! ```
//!
//! Nothing is persisted; pending requests are lost when the process exits.

mod account;
mod config;
mod error;
mod notify;
mod registry;
mod request;
mod types;

pub use account::{AccountVerifier, CompleteFunc};
pub use config::{Config, LogConfig, QueueConfig};
pub use error::SignError;
pub use notify::{NoopObserver, Notifier, SignEvent, SignObserver};
pub use registry::PendingRequests;
pub use request::{Request, SignResult};
pub use types::*;

pub use tokio_util::sync::CancellationToken;
