//! Dispatch of URLs to the reader owning their host

use crate::config::Config;
use crate::core::integration::host_with_port;
use crate::core::{ReaderError, ReaderResult};
use crate::di::traits::{CredentialsProvider, UrlReader};
use crate::github::{GithubCredentialsProvider, GithubUrlReader};
use crate::tree::{
    ReadTreeOptions, ReadTreeResponse, ReadUrlOptions, ReadUrlResponse, SearchOptions,
    SearchResponse,
};
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;
use url::Url;

/// Decides whether a reader handles a URL
pub type HostPredicate = Arc<dyn Fn(&Url) -> bool + Send + Sync>;

/// A reader together with the predicate selecting it
#[derive(Clone)]
pub struct ReaderPredicateTuple {
    pub reader: Arc<dyn UrlReader>,
    pub predicate: HostPredicate,
    host: Option<String>,
}

impl ReaderPredicateTuple {
    pub fn new(reader: Arc<dyn UrlReader>, predicate: HostPredicate) -> Self {
        Self {
            reader,
            predicate,
            host: None,
        }
    }

    /// Select `reader` for URLs whose `host[:port]` equals `host` exactly
    pub fn for_host(host: impl Into<String>, reader: Arc<dyn UrlReader>) -> Self {
        let host = host.into();
        let expected = host.clone();
        Self {
            reader,
            predicate: Arc::new(move |url: &Url| {
                host_with_port(url).as_deref() == Some(expected.as_str())
            }),
            host: Some(host),
        }
    }
}

impl fmt::Debug for ReaderPredicateTuple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReaderPredicateTuple")
            .field("reader", &self.reader.describe())
            .field("host", &self.host)
            .finish()
    }
}

/// The registry of configured readers
///
/// Readers are consulted in registration order and the first whose
/// predicate accepts the URL wins. Two readers bound to the same host
/// are rejected at construction.
#[derive(Clone, Debug, Default)]
pub struct UrlReaders {
    readers: Vec<ReaderPredicateTuple>,
}

impl UrlReaders {
    pub fn new(readers: Vec<ReaderPredicateTuple>) -> ReaderResult<Self> {
        let mut seen: Vec<&str> = Vec::new();
        for host in readers.iter().filter_map(|r| r.host.as_deref()) {
            if seen.contains(&host) {
                return Err(ReaderError::Config(format!(
                    "Duplicate reader for host '{}'",
                    host
                )));
            }
            seen.push(host);
        }
        Ok(Self { readers })
    }

    /// One GitHub reader per configured integration
    pub fn from_config(config: &Config) -> ReaderResult<Self> {
        let materializer = config.materializer();
        let mut readers = Vec::new();

        for integration in config.github_integrations()?.list() {
            let credentials: Arc<dyn CredentialsProvider> = Arc::new(
                GithubCredentialsProvider::new(integration, config.use_keychain),
            );
            let reader =
                GithubUrlReader::new(integration.clone(), credentials, materializer.clone())?;
            tracing::debug!(reader = %reader.describe(), "Registered reader");
            readers.push(ReaderPredicateTuple::for_host(
                integration.host.clone(),
                Arc::new(reader),
            ));
        }

        Self::new(readers)
    }

    pub fn len(&self) -> usize {
        self.readers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readers.is_empty()
    }

    /// The reader responsible for `url`
    pub fn resolve(&self, url: &str) -> ReaderResult<Arc<dyn UrlReader>> {
        let parsed =
            Url::parse(url).map_err(|e| ReaderError::InvalidUrl(format!("{}: {}", url, e)))?;

        let reader = self
            .readers
            .iter()
            .find(|r| (r.predicate)(&parsed))
            .map(|r| Arc::clone(&r.reader))
            .ok_or_else(|| ReaderError::UnsupportedUrl(url.to_string()))?;

        tracing::debug!(url, reader = %reader.describe(), "Selected reader");
        Ok(reader)
    }
}

#[async_trait]
impl UrlReader for UrlReaders {
    async fn read_url(&self, url: &str, options: ReadUrlOptions) -> ReaderResult<ReadUrlResponse> {
        self.resolve(url)?.read_url(url, options).await
    }

    async fn read_tree(
        &self,
        url: &str,
        options: ReadTreeOptions,
    ) -> ReaderResult<ReadTreeResponse> {
        self.resolve(url)?.read_tree(url, options).await
    }

    async fn search(&self, url: &str, options: SearchOptions) -> ReaderResult<SearchResponse> {
        self.resolve(url)?.search(url, options).await
    }

    fn describe(&self) -> String {
        let readers: Vec<String> = self.readers.iter().map(|r| r.reader.describe()).collect();
        format!("readers[{}]", readers.join(","))
    }
}
