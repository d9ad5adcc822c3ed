//! Token lookup for GitHub integrations

use crate::core::integration::{GitHubIntegrationConfig, GITHUB_HOST};
use crate::core::{CredentialStore, ReaderResult};
use crate::di::traits::{Credentials, CredentialsProvider};
use async_trait::async_trait;

/// Environment variable consulted for `github.com` tokens
pub const GITHUB_TOKEN_ENV: &str = "GITHUB_TOKEN";

/// Supplies a token for one integration.
///
/// Sources are tried in order on every call: the token in the
/// integration record, `GITHUB_TOKEN` (public `github.com` only), then
/// the OS keychain. Nothing is cached, so a token stored by `login`
/// is picked up on the next request.
#[derive(Debug, Clone)]
pub struct GithubCredentialsProvider {
    host: String,
    config_token: Option<String>,
    use_keychain: bool,
}

impl GithubCredentialsProvider {
    pub fn new(config: &GitHubIntegrationConfig, use_keychain: bool) -> Self {
        Self {
            host: config.host.clone(),
            config_token: config.token.clone(),
            use_keychain,
        }
    }

    async fn lookup_token(&self) -> Option<String> {
        if let Some(ref token) = self.config_token {
            return Some(token.clone());
        }

        if self.host == GITHUB_HOST {
            if let Some(token) = std::env::var(GITHUB_TOKEN_ENV)
                .ok()
                .filter(|t| !t.trim().is_empty())
            {
                return Some(token);
            }
        }

        if !self.use_keychain {
            return None;
        }

        let key = CredentialStore::token_key(&self.host);
        match tokio::task::spawn_blocking(move || CredentialStore::retrieve(&key)).await {
            Ok(Ok(token)) => Some(token),
            Ok(Err(e)) => {
                tracing::debug!(host = %self.host, error = %e, "No keychain token");
                None
            }
            Err(e) => {
                tracing::warn!(host = %self.host, error = %e, "Keychain lookup panicked");
                None
            }
        }
    }
}

#[async_trait]
impl CredentialsProvider for GithubCredentialsProvider {
    async fn get_credentials(&self, _url: &str) -> ReaderResult<Credentials> {
        Ok(Credentials::from_token(self.lookup_token().await))
    }
}
