//! Signals for pending sign request events.
//!
//! Queue events are rendered as JSON envelopes and handed to a [`SignalSink`]:
//!
//! ```text
//! {"type": "sign-request.queued", "event": {"id": ..., "method": ..., "args": ..., "message_id": ...}}
//! {"type": "sign-request.failed", "event": {..., "error_message": ..., "error_code": "2"}}
//! ```

mod envelope;
mod error;
mod observer;
mod sink;

pub use envelope::*;
pub use error::SignalError;
pub use observer::SignalObserver;
pub use sink::{ChannelSink, SignalSink};
