//! Mock implementations of the reader traits for testing

use super::traits::{Credentials, CredentialsProvider, UrlReader};
use crate::core::{ReaderError, ReaderResult};
use crate::tree::{
    PathFilter, ReadTreeOptions, ReadTreeResponse, ReadUrlOptions, ReadUrlResponse,
    ResponseFile, SearchOptions, SearchResponse, TreeMaterializer, DEFAULT_MAX_ARCHIVE_SIZE,
};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Mock credentials provider returning a fixed token
///
/// # Example
///
/// ```
/// use url_reader::di::mocks::MockCredentialsProvider;
///
/// let provider = MockCredentialsProvider::with_token("abc");
/// assert_eq!(provider.calls(), 0);
/// ```
#[derive(Clone, Default)]
pub struct MockCredentialsProvider {
    token: Option<String>,
    calls: Arc<AtomicUsize>,
}

impl MockCredentialsProvider {
    /// A provider that never attaches authorization
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn with_token(token: &str) -> Self {
        Self {
            token: Some(token.to_string()),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Number of times credentials were requested
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CredentialsProvider for MockCredentialsProvider {
    async fn get_credentials(&self, _url: &str) -> ReaderResult<Credentials> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(Credentials::from_token(self.token.clone()))
    }
}

/// In-memory reader for testing code that consumes `UrlReader`
///
/// Files are keyed by path relative to `base_url`. Every call is
/// recorded so tests can check dispatch.
///
/// # Example
///
/// ```
/// use url_reader::di::mocks::MockUrlReader;
///
/// let reader = MockUrlReader::new("https://git.test/acme/widgets", "c0ffee");
/// reader.add_file("README.md", b"# Widgets".to_vec());
/// ```
#[derive(Clone)]
pub struct MockUrlReader {
    base_url: String,
    etag: String,
    files: Arc<Mutex<BTreeMap<String, Vec<u8>>>>,
    calls: Arc<Mutex<Vec<String>>>,
    materializer: TreeMaterializer,
}

impl MockUrlReader {
    pub fn new(base_url: &str, etag: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            etag: etag.to_string(),
            files: Arc::new(Mutex::new(BTreeMap::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
            materializer: TreeMaterializer::new(
                std::env::temp_dir().join("url-reader-mock"),
                DEFAULT_MAX_ARCHIVE_SIZE,
            ),
        }
    }

    /// Add a file at `path` relative to the base URL
    pub fn add_file(&self, path: &str, content: Vec<u8>) {
        self.files
            .lock()
            .unwrap()
            .insert(path.trim_start_matches('/').to_string(), content);
    }

    /// URLs this reader has been called with, in order
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, url: &str) {
        self.calls.lock().unwrap().push(url.to_string());
    }

    fn relative<'a>(&self, url: &'a str) -> ReaderResult<&'a str> {
        url.strip_prefix(&self.base_url)
            .map(|rest| rest.trim_start_matches('/'))
            .ok_or_else(|| ReaderError::UnsupportedUrl(url.to_string()))
    }

    fn check_etag(&self, etag: Option<&str>) -> ReaderResult<()> {
        if etag == Some(self.etag.as_str()) {
            return Err(ReaderError::NotModified);
        }
        Ok(())
    }
}

#[async_trait]
impl UrlReader for MockUrlReader {
    async fn read_url(&self, url: &str, options: ReadUrlOptions) -> ReaderResult<ReadUrlResponse> {
        self.record(url);
        self.check_etag(options.etag.as_deref())?;
        let path = self.relative(url)?;

        let buffer = self
            .files
            .lock()
            .unwrap()
            .get(path)
            .cloned()
            .ok_or_else(|| ReaderError::NotFound(url.to_string()))?;

        Ok(ReadUrlResponse {
            buffer,
            etag: Some(self.etag.clone()),
            last_modified_at: None,
        })
    }

    async fn read_tree(
        &self,
        url: &str,
        options: ReadTreeOptions,
    ) -> ReaderResult<ReadTreeResponse> {
        self.record(url);
        self.check_etag(options.etag.as_deref())?;
        let prefix = self.relative(url)?.trim_end_matches('/').to_string();

        let entries: Vec<(String, Vec<u8>)> = self
            .files
            .lock()
            .unwrap()
            .iter()
            .filter_map(|(path, content)| {
                if prefix.is_empty() {
                    return Some((path.clone(), content.clone()));
                }
                path.strip_prefix(&prefix)
                    .and_then(|rest| rest.strip_prefix('/'))
                    .map(|rest| (rest.to_string(), content.clone()))
            })
            .collect();

        self.materializer
            .from_files(entries, self.etag.clone(), options.filter.as_ref())
    }

    async fn search(&self, url: &str, options: SearchOptions) -> ReaderResult<SearchResponse> {
        self.record(url);
        self.check_etag(options.etag.as_deref())?;
        let filter = PathFilter::glob(self.relative(url)?)?;

        let files = self
            .files
            .lock()
            .unwrap()
            .iter()
            .filter(|(path, _)| filter.matches(path))
            .map(|(path, content)| {
                ResponseFile::from_bytes(path.clone(), content.clone())
                    .with_url(format!("{}/{}", self.base_url, path))
            })
            .collect();

        Ok(SearchResponse {
            etag: self.etag.clone(),
            files,
        })
    }

    fn describe(&self) -> String {
        format!("mock{{base={}}}", self.base_url)
    }
}
