//! Bearer token acquisition.

use async_trait::async_trait;

use crate::result::AppResult;

/// Yields bearer tokens on demand.
///
/// Implementations own refresh and caching; callers only attach the
/// returned string as `Authorization: Bearer <token>`.
#[async_trait]
pub trait TokenProvider: Send + Sync + std::fmt::Debug + 'static {
    /// Return a token valid for `scope` (e.g. `https://purview.azure.net/.default`).
    async fn access_token(&self, scope: &str) -> AppResult<String>;
}
