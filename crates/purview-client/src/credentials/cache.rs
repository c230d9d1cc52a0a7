//! Per-scope token cache shared by the refreshing credentials.

use std::collections::HashMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

/// A token and the instant it stops being valid.
#[derive(Debug, Clone)]
pub struct CachedToken {
    /// Bearer token.
    pub token: String,
    /// Expiry reported by the issuer.
    pub expires_at: DateTime<Utc>,
}

/// Tokens keyed by scope.
#[derive(Debug, Default)]
pub struct TokenCache {
    entries: Mutex<HashMap<String, CachedToken>>,
    skew: Duration,
}

impl TokenCache {
    /// Creates a cache that treats tokens as expired `skew` early.
    pub fn new(skew: Duration) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            skew,
        }
    }

    /// Returns the cached token for `scope` if it is still fresh at `now`.
    pub async fn get(&self, scope: &str, now: DateTime<Utc>) -> Option<String> {
        let skew = chrono::Duration::from_std(self.skew).unwrap_or_else(|_| chrono::Duration::zero());
        let entries = self.entries.lock().await;
        entries
            .get(scope)
            .filter(|cached| cached.expires_at - skew > now)
            .map(|cached| cached.token.clone())
    }

    /// Stores a freshly issued token.
    pub async fn put(&self, scope: &str, token: CachedToken) {
        self.entries.lock().await.insert(scope.to_string(), token);
    }
}
