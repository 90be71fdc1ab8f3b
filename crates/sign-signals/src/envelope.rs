//! Signal envelope types for sign request events.

use crate::error::SignalError;
use serde::{Deserialize, Serialize};
use sign_queue::{Request, SignError, SignEvent};

/// Signal type sent when a request is queued.
pub const EVENT_SIGN_REQUEST_QUEUED: &str = "sign-request.queued";

/// Signal type sent when a completion attempt fails.
pub const EVENT_SIGN_REQUEST_FAILED: &str = "sign-request.failed";

/// Envelope wrapping every signal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    #[serde(rename = "type")]
    pub event_type: String,
    pub event: T,
}

/// Payload of a `sign-request.queued` signal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueuedEvent {
    pub id: String,
    pub method: String,
    pub args: serde_json::Value,
    pub message_id: Option<String>,
}

impl From<&Request> for QueuedEvent {
    fn from(request: &Request) -> Self {
        Self {
            id: request.id().to_string(),
            method: request.method().to_string(),
            args: request.args().clone(),
            message_id: request.message_id().map(String::from),
        }
    }
}

/// Payload of a `sign-request.failed` signal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FailedEvent {
    #[serde(flatten)]
    pub request: QueuedEvent,
    pub error_message: String,
    pub error_code: ErrorCode,
}

/// Error codes reported to signal subscribers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    #[serde(rename = "1")]
    Default,
    #[serde(rename = "2")]
    Password,
    #[serde(rename = "3")]
    Timeout,
    #[serde(rename = "4")]
    Discarded,
}

impl ErrorCode {
    pub fn from_error(error: &SignError) -> Self {
        match error {
            SignError::InvalidPassword => ErrorCode::Password,
            SignError::TimedOut => ErrorCode::Timeout,
            SignError::Discarded => ErrorCode::Discarded,
            _ => ErrorCode::Default,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::Default => "1",
            ErrorCode::Password => "2",
            ErrorCode::Timeout => "3",
            ErrorCode::Discarded => "4",
        }
    }
}

/// Render the signal for a queue event.
///
/// Successful completions produce no signal: the RPC caller receives the
/// result directly.
pub fn render(event: &SignEvent) -> Result<Option<String>, SignalError> {
    let json = match event {
        SignEvent::Enqueued { request } => serde_json::to_string(&Envelope {
            event_type: EVENT_SIGN_REQUEST_QUEUED.to_string(),
            event: QueuedEvent::from(request.as_ref()),
        })?,
        SignEvent::Returned {
            request,
            outcome: Err(error),
        } => serde_json::to_string(&Envelope {
            event_type: EVENT_SIGN_REQUEST_FAILED.to_string(),
            event: FailedEvent {
                request: QueuedEvent::from(request.as_ref()),
                error_message: error.to_string(),
                error_code: ErrorCode::from_error(error),
            },
        })?,
        SignEvent::Returned { outcome: Ok(_), .. } => return Ok(None),
    };

    Ok(Some(json))
}
