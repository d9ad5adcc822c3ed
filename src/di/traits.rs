//! Capability traits at the reader seams

use crate::core::ReaderResult;
use crate::tree::{
    ReadTreeOptions, ReadTreeResponse, ReadUrlOptions, ReadUrlResponse, SearchOptions,
    SearchResponse,
};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::fmt;

/// Reads files, trees and glob searches from one kind of source
///
/// Implementations must be safe to call concurrently; each call is an
/// independent operation and nothing is cached between calls.
#[async_trait]
pub trait UrlReader: Send + Sync {
    /// Read a single file and return its bytes
    async fn read(&self, url: &str) -> ReaderResult<Vec<u8>> {
        Ok(self.read_url(url, ReadUrlOptions::default()).await?.buffer)
    }

    /// Read a single file, honoring a previous etag
    async fn read_url(&self, url: &str, options: ReadUrlOptions) -> ReaderResult<ReadUrlResponse>;

    /// Snapshot the directory tree the URL points at
    async fn read_tree(&self, url: &str, options: ReadTreeOptions)
        -> ReaderResult<ReadTreeResponse>;

    /// Find files matching the glob in the URL's path
    async fn search(&self, url: &str, options: SearchOptions) -> ReaderResult<SearchResponse>;

    /// Short identity for logs, e.g. `github{host=github.com,authed=false}`
    fn describe(&self) -> String;
}

/// Produces authorization for requests made on behalf of one integration
#[async_trait]
pub trait CredentialsProvider: Send + Sync {
    /// Headers to attach to a request for `url`. Only called with URLs
    /// belonging to the provider's own integration.
    async fn get_credentials(&self, url: &str) -> ReaderResult<Credentials>;
}

/// Request authorization for a single call
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub token: Option<String>,
    pub headers: BTreeMap<String, String>,
}

impl Credentials {
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Credentials carrying `Authorization: token <token>`
    pub fn from_token(token: Option<String>) -> Self {
        let mut headers = BTreeMap::new();
        if let Some(ref token) = token {
            headers.insert("Authorization".to_string(), format!("token {}", token));
        }
        Self { token, headers }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("headers", &self.headers.keys().collect::<Vec<_>>())
            .finish()
    }
}
