//! Sign request errors.

use thiserror::Error;

/// Errors produced while resolving a pending signing request.
///
/// Errors returned by an [`AccountVerifier`](crate::AccountVerifier) or a
/// [`CompleteFunc`](crate::CompleteFunc) become the request's outcome, so the
/// type is `Clone`: the same error is delivered to the waiter and reported to
/// observers.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SignError {
    /// No request with the given ID is registered.
    #[error("sign request not found")]
    NotFound,

    /// Another completion attempt for the request is underway.
    #[error("sign request is in progress")]
    InProgress,

    /// The request was discarded by an operator.
    #[error("transaction has been discarded")]
    Discarded,

    /// Nobody resolved the request within the wait window.
    #[error("sign request timed out")]
    TimedOut,

    /// The supplied password did not unlock the account key.
    #[error("could not decrypt key with given password")]
    InvalidPassword,

    /// The account manager has no selected account to sign with.
    #[error("no account has been selected, please login")]
    NoAccountSelected,

    /// The requested account is not the selected one.
    #[error("invalid account as only the selected one can generate a signature")]
    InvalidAccount,

    /// Failure reported by the completion callback.
    #[error("{0}")]
    Completion(String),
}

impl SignError {
    /// Whether the request survives this error and can be approved again.
    pub fn is_transient(&self) -> bool {
        matches!(self, SignError::InvalidPassword | SignError::NoAccountSelected)
    }

    /// Wrap an arbitrary completion failure.
    pub fn completion(message: impl Into<String>) -> Self {
        SignError::Completion(message.into())
    }
}
