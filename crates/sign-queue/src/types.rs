//! Value types carried by sign requests.

use secrecy::SecretVec;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use tokio_util::sync::CancellationToken;

/// A 32-byte signature or transaction hash.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Hash(pub [u8; 32]);

impl Hash {
    pub fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 32]
    }
}

impl fmt::Display for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl FromStr for Hash {
    type Err = hex::FromHexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.strip_prefix("0x").unwrap_or(s);
        let mut bytes = [0u8; 32];
        hex::decode_to_slice(digits, &mut bytes)?;
        Ok(Self(bytes))
    }
}

impl From<[u8; 32]> for Hash {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

impl Serialize for Hash {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Hash {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Caller-supplied request metadata.
///
/// The queue never looks inside; it is only stored and handed to observers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meta {
    /// RPC method that produced the request (e.g. "personal_sign").
    pub method: String,
    /// Method arguments, e.g. `{"data": "0x...", "account": "0x..."}`.
    pub args: serde_json::Value,
}

impl Meta {
    pub fn new(method: impl Into<String>, args: serde_json::Value) -> Self {
        Self {
            method: method.into(),
            args,
        }
    }
}

/// The signing identity produced by a successful password check.
pub struct SelectedAccount {
    /// Account address.
    pub address: String,
    /// Decrypted key material.
    pub key: SecretVec<u8>,
}

impl SelectedAccount {
    pub fn new(address: impl Into<String>, key: Vec<u8>) -> Self {
        Self {
            address: address.into(),
            key: SecretVec::new(key),
        }
    }
}

impl fmt::Debug for SelectedAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectedAccount")
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}

/// Context captured when a request is added.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    /// ID of the RPC message that created the request, echoed in signals.
    pub message_id: Option<String>,
    /// Upstream cancellation. Stored with the request; the queue does not act on it.
    pub cancellation: CancellationToken,
}

impl RequestContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_message_id(mut self, message_id: impl Into<String>) -> Self {
        self.message_id = Some(message_id.into());
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = token;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    const HASH_HEX: &str = "0x1230000000000000000000000000000000000000000000000000000000000abc";

    #[test]
    fn test_hash_parse_and_display() {
        let hash: Hash = HASH_HEX.parse().unwrap();
        assert_eq!(hash.0[0], 0x12);
        assert_eq!(hash.0[31], 0xbc);
        assert_eq!(hash.to_string(), HASH_HEX);

        let unprefixed: Hash = HASH_HEX.trim_start_matches("0x").parse().unwrap();
        assert_eq!(unprefixed, hash);
    }

    #[test]
    fn test_hash_rejects_bad_input() {
        assert!("0x1234".parse::<Hash>().is_err());
        assert!("zz".repeat(32).parse::<Hash>().is_err());
    }

    #[test]
    fn test_hash_serializes_as_hex_string() {
        let hash: Hash = HASH_HEX.parse().unwrap();
        let json = serde_json::to_string(&hash).unwrap();
        assert_eq!(json, format!("\"{}\"", HASH_HEX));

        let back: Hash = serde_json::from_str(&json).unwrap();
        assert_eq!(back, hash);
    }

    #[test]
    fn test_default_hash_is_zero() {
        assert!(Hash::default().is_zero());
        assert!(!Hash::new([1u8; 32]).is_zero());
    }

    #[test]
    fn test_meta_serialization() {
        let meta = Meta::new(
            "personal_sign",
            serde_json::json!({"data": "0xBAADBEEF", "account": "0xAAA"}),
        );
        let json = serde_json::to_value(&meta).unwrap();
        assert_eq!(json["method"], "personal_sign");
        assert_eq!(json["args"]["data"], "0xBAADBEEF");
    }

    #[test]
    fn test_selected_account_hides_key() {
        let account = SelectedAccount::new("0xAAA", vec![7u8; 32]);
        assert_eq!(account.key.expose_secret().len(), 32);
        let debug = format!("{:?}", account);
        assert!(debug.contains("0xAAA"));
        assert!(!debug.contains("7, 7"));
    }

    #[test]
    fn test_request_context_builder() {
        let token = CancellationToken::new();
        let ctx = RequestContext::new()
            .with_message_id("msg-1")
            .with_cancellation(token.clone());

        assert_eq!(ctx.message_id.as_deref(), Some("msg-1"));
        token.cancel();
        assert!(ctx.cancellation.is_cancelled());
    }
}
