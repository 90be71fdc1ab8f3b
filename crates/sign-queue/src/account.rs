//! Seams to the account manager.

use crate::error::SignError;
use crate::types::{Hash, SelectedAccount};
use async_trait::async_trait;
use secrecy::SecretString;
use std::future::Future;

/// Resolves a password into the account that is allowed to sign.
///
/// Implemented by the account manager. Returning a transient error (see
/// [`SignError::is_transient`]) keeps the request pending so the user can be
/// prompted again.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountVerifier: Send + Sync {
    async fn verify(&self, password: &SecretString) -> Result<SelectedAccount, SignError>;
}

#[async_trait]
impl<F, Fut> AccountVerifier for F
where
    F: Fn(&SecretString) -> Fut + Send + Sync,
    Fut: Future<Output = Result<SelectedAccount, SignError>> + Send,
{
    async fn verify(&self, password: &SecretString) -> Result<SelectedAccount, SignError> {
        (self)(password).await
    }
}

/// Produces the signature for a request once its account has been verified.
///
/// Bound to the request when it is added. It runs once per approval attempt
/// that got past verification, so it may run again after a transient failure.
#[async_trait]
pub trait CompleteFunc: Send + Sync {
    async fn complete(&self, account: SelectedAccount) -> Result<Hash, SignError>;
}

#[async_trait]
impl<F, Fut> CompleteFunc for F
where
    F: Fn(SelectedAccount) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Hash, SignError>> + Send,
{
    async fn complete(&self, account: SelectedAccount) -> Result<Hash, SignError> {
        (self)(account).await
    }
}
