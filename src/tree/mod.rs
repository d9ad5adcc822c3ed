//! Response shapes produced by readers
//!
//! File contents are exposed through deferred accessors rather than
//! eager buffers: a [`ResponseFile`] holds a callable that produces the
//! bytes when awaited. Accessors may be invoked any number of times and
//! do nothing beyond the fetch or disk read itself.

pub mod archive;
pub mod glob;

pub use archive::{ReadTreeResponse, TreeMaterializer, DEFAULT_MAX_ARCHIVE_SIZE};
pub use glob::{is_glob, PathFilter};

use crate::core::ReaderResult;
use chrono::{DateTime, Utc};
use futures::future::BoxFuture;
use std::fmt;
use std::sync::Arc;

/// Future returned by a content accessor
pub type ContentFuture = BoxFuture<'static, ReaderResult<Vec<u8>>>;

type ContentFn = Arc<dyn Fn() -> ContentFuture + Send + Sync>;

/// A single file in a tree or search response
#[derive(Clone)]
pub struct ResponseFile {
    /// Path relative to the tree root (or repository root for search)
    pub path: String,
    /// Browsable URL of the file, when the reader knows one
    pub url: Option<String>,
    content: ContentFn,
}

impl ResponseFile {
    pub fn new<F>(path: impl Into<String>, content: F) -> Self
    where
        F: Fn() -> ContentFuture + Send + Sync + 'static,
    {
        Self {
            path: path.into(),
            url: None,
            content: Arc::new(content),
        }
    }

    /// A file whose bytes are already in memory
    pub fn from_bytes(path: impl Into<String>, bytes: Vec<u8>) -> Self {
        let bytes = Arc::new(bytes);
        Self::new(path, move || {
            let bytes = Arc::clone(&bytes);
            Box::pin(async move { Ok(bytes.as_ref().clone()) })
        })
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Produce the file's bytes. Each call performs its own read.
    pub async fn content(&self) -> ReaderResult<Vec<u8>> {
        (self.content)().await
    }
}

impl fmt::Debug for ResponseFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResponseFile")
            .field("path", &self.path)
            .field("url", &self.url)
            .finish_non_exhaustive()
    }
}

/// Options for a single-file read
#[derive(Debug, Clone, Default)]
pub struct ReadUrlOptions {
    /// Etag from a previous read; a match yields `NotModified`
    pub etag: Option<String>,
}

/// Result of a single-file read
#[derive(Debug, Clone)]
pub struct ReadUrlResponse {
    pub buffer: Vec<u8>,
    pub etag: Option<String>,
    pub last_modified_at: Option<DateTime<Utc>>,
}

/// Options for a tree read
#[derive(Debug, Clone, Default)]
pub struct ReadTreeOptions {
    /// Commit id from a previous read; a match yields `NotModified`
    pub etag: Option<String>,
    /// Keeps only files whose path (relative to the requested
    /// directory) passes the filter
    pub filter: Option<PathFilter>,
}

/// Options for a glob search
#[derive(Debug, Clone, Default)]
pub struct SearchOptions {
    /// Commit id from a previous search; a match yields `NotModified`
    pub etag: Option<String>,
}

/// Result of a glob search
#[derive(Debug, Clone)]
pub struct SearchResponse {
    /// Revision the matches were taken from. Empty when the search
    /// degraded to a single-file read with no etag upstream.
    pub etag: String,
    pub files: Vec<ResponseFile>,
}

impl SearchResponse {
    pub fn empty() -> Self {
        Self {
            etag: String::new(),
            files: Vec::new(),
        }
    }

    /// Paths of all matched files, sorted
    pub fn paths(&self) -> Vec<&str> {
        let mut paths: Vec<&str> = self.files.iter().map(|f| f.path.as_str()).collect();
        paths.sort_unstable();
        paths
    }
}
