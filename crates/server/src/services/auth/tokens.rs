//! Opaque bearer tokens.
//!
//! A token is 32 random bytes, base64url-encoded without padding. Tokens map
//! to a user id in a `moka` cache whose time-to-live is the token lifetime.

use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use moka::future::Cache;
use rand::RngCore;
use secrecy::{ExposeSecret, SecretString};

use backlink_vista_core::UserId;

const TOKEN_BYTES: usize = 32;
const MAX_LIVE_TOKENS: u64 = 100_000;

/// Issued tokens and the users they authenticate.
#[derive(Clone)]
pub struct TokenStore {
    cache: Cache<String, UserId>,
}

impl std::fmt::Debug for TokenStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenStore")
            .field("live_tokens", &self.cache.entry_count())
            .finish()
    }
}

impl TokenStore {
    /// Create a token store whose tokens expire after `ttl`.
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        let cache = Cache::builder()
            .max_capacity(MAX_LIVE_TOKENS)
            .time_to_live(ttl)
            .build();
        Self { cache }
    }

    /// Issue a fresh token for `user_id`.
    pub async fn issue(&self, user_id: UserId) -> SecretString {
        let mut bytes = [0u8; TOKEN_BYTES];
        rand::rng().fill_bytes(&mut bytes);
        let token = URL_SAFE_NO_PAD.encode(bytes);

        self.cache.insert(token.clone(), user_id).await;
        SecretString::from(token)
    }

    /// The user a live token belongs to.
    pub async fn resolve(&self, token: &str) -> Option<UserId> {
        self.cache.get(token).await
    }

    /// Invalidate a token. Unknown tokens are ignored.
    pub async fn revoke(&self, token: &SecretString) {
        self.cache.invalidate(token.expose_secret()).await;
    }
}
