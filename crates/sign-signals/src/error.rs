//! Signal rendering errors.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SignalError {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
