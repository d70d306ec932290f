//! Bearer token authentication.
//!
//! Tokens are signed with HMAC-SHA256 and carry an issue timestamp for
//! expiration checking.
//!
//! ## Token Format
//!
//! - 8 bytes: timestamp (Unix millis, big-endian)
//! - N bytes: user id (UTF-8)
//! - 32 bytes: HMAC-SHA256 signature over the preceding bytes
//!
//! The whole token is base64url-encoded (no padding) for the
//! `Authorization: Bearer` header.

use crate::error::{ServerError, ServerResult};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tracing::debug;

type HmacSha256 = Hmac<Sha256>;

const TIMESTAMP_LEN: usize = 8;
const SIGNATURE_LEN: usize = 32;

/// Authentication configuration.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Secret key for HMAC.
    pub secret: Vec<u8>,
    /// Token expiration duration.
    pub token_expiry: Duration,
}

impl AuthConfig {
    /// Creates a new auth configuration.
    pub fn new(secret: Vec<u8>) -> Self {
        Self {
            secret,
            token_expiry: Duration::from_secs(60 * 60), // 1 hour
        }
    }

    /// Sets the token expiration duration.
    pub fn with_expiry(mut self, expiry: Duration) -> Self {
        self.token_expiry = expiry;
        self
    }
}

/// Issues and validates bearer tokens.
#[derive(Clone)]
pub struct TokenValidator {
    config: AuthConfig,
}

impl TokenValidator {
    /// Creates a new token validator.
    pub fn new(config: AuthConfig) -> Self {
        Self { config }
    }

    /// Creates a token for `user_id`, timestamped now.
    pub fn create_token(&self, user_id: &str) -> ServerResult<String> {
        self.create_token_at(user_id, now_millis())
    }

    fn create_token_at(&self, user_id: &str, timestamp: u64) -> ServerResult<String> {
        let mut token = Vec::with_capacity(TIMESTAMP_LEN + user_id.len() + SIGNATURE_LEN);
        token.extend_from_slice(&timestamp.to_be_bytes());
        token.extend_from_slice(user_id.as_bytes());

        let signature = self.mac(&token)?.finalize().into_bytes();
        token.extend_from_slice(&signature);
        Ok(URL_SAFE_NO_PAD.encode(token))
    }

    /// Validates a token and returns the user id it was issued for.
    pub fn validate_token(&self, token: &str) -> ServerResult<String> {
        let bytes = URL_SAFE_NO_PAD.decode(token).map_err(|e| {
            debug!(error = %e, "token is not base64");
            ServerError::NotAuthenticated
        })?;
        if bytes.len() <= TIMESTAMP_LEN + SIGNATURE_LEN {
            return Err(ServerError::NotAuthenticated);
        }

        let (signed, signature) = bytes.split_at(bytes.len() - SIGNATURE_LEN);
        self.mac(signed)?.verify_slice(signature).map_err(|_| {
            debug!("token signature mismatch");
            ServerError::NotAuthenticated
        })?;

        let (timestamp_bytes, user_id) = signed.split_at(TIMESTAMP_LEN);
        let mut raw = [0u8; TIMESTAMP_LEN];
        raw.copy_from_slice(timestamp_bytes);
        let timestamp = u64::from_be_bytes(raw);

        let expiry_millis = self.config.token_expiry.as_millis() as u64;
        if now_millis() > timestamp.saturating_add(expiry_millis) {
            debug!("token expired");
            return Err(ServerError::NotAuthenticated);
        }

        String::from_utf8(user_id.to_vec()).map_err(|_| ServerError::NotAuthenticated)
    }

    fn mac(&self, data: &[u8]) -> ServerResult<HmacSha256> {
        let mut mac = HmacSha256::new_from_slice(&self.config.secret)
            .map_err(|e| ServerError::Internal(e.to_string()))?;
        mac.update(data);
        Ok(mac)
    }
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
