//! Fixed token provider.

use async_trait::async_trait;

use purview_core::result::AppResult;
use purview_core::traits::TokenProvider;

/// Returns the same token for every scope.
#[derive(Clone)]
pub struct StaticTokenProvider {
    token: String,
}

impl StaticTokenProvider {
    /// Wraps a pre-issued token.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

impl std::fmt::Debug for StaticTokenProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticTokenProvider").finish_non_exhaustive()
    }
}

#[async_trait]
impl TokenProvider for StaticTokenProvider {
    async fn access_token(&self, _scope: &str) -> AppResult<String> {
        Ok(self.token.clone())
    }
}
