//! Shared helpers for sign queue integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use sign_queue::{
    AccountVerifier, CompleteFunc, Hash, LogConfig, Meta, SelectedAccount, SignError, SignEvent,
    SignObserver,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

pub const ACCOUNT: &str = "0xAAAA000000000000000000000000000000000001";
pub const SIGN_DATA: &str = "0xBAADBEEF";
pub const PASSWORD: &str = "correct horse";
pub const SIGNED_HASH: &str = "0x1230000000000000000000000000000000000000000000000000000000000000";

pub fn init_tracing() {
    let log = LogConfig {
        level: "sign_queue=debug".into(),
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(log.env_filter())
        .with_test_writer()
        .try_init();
}

pub fn personal_sign_meta() -> Meta {
    Meta::new(
        "personal_sign",
        serde_json::json!({"data": SIGN_DATA, "account": ACCOUNT}),
    )
}

pub fn signed_hash() -> Hash {
    SIGNED_HASH.parse().unwrap()
}

pub fn password(p: &str) -> SecretString {
    SecretString::new(p.into())
}

/// Verifier accepting only [`PASSWORD`].
pub fn password_verifier() -> impl AccountVerifier {
    |password: &SecretString| {
        let ok = password.expose_secret() == PASSWORD;
        async move {
            if ok {
                Ok(SelectedAccount::new(ACCOUNT, vec![0x42; 32]))
            } else {
                Err(SignError::InvalidPassword)
            }
        }
    }
}

/// Completion callback that always produces `hash`.
pub fn signer(hash: Hash) -> impl CompleteFunc {
    move |_account: SelectedAccount| async move { Ok::<_, SignError>(hash) }
}

/// Observer that keeps every event it sees.
#[derive(Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<SignEvent>>,
}

impl RecordingObserver {
    pub async fn events(&self) -> Vec<SignEvent> {
        self.events.lock().await.clone()
    }

    /// Wait until at least `count` events were recorded.
    pub async fn wait_for(&self, count: usize) -> Vec<SignEvent> {
        for _ in 0..200 {
            let events = self.events().await;
            if events.len() >= count {
                return events;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("expected {} events, got {:?}", count, self.events().await);
    }
}

#[async_trait]
impl SignObserver for RecordingObserver {
    async fn notify(&self, event: SignEvent) {
        self.events.lock().await.push(event);
    }
}

pub fn recording_observer() -> Arc<RecordingObserver> {
    Arc::new(RecordingObserver::default())
}
