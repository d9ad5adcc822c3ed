//! Path filters, including shell-style glob matching
//!
//! `*` and `?` stay within a path segment, `**` spans segments, and a
//! leading `/` on either the pattern or the path is ignored.

use crate::core::{ReaderError, ReaderResult};
use globset::{GlobBuilder, GlobMatcher};
use std::fmt;
use std::sync::Arc;

/// Predicate over repository-relative paths
#[derive(Clone)]
pub struct PathFilter {
    predicate: Arc<dyn Fn(&str) -> bool + Send + Sync>,
}

impl PathFilter {
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        Self {
            predicate: Arc::new(predicate),
        }
    }

    /// Compile a glob pattern into a filter
    pub fn glob(pattern: &str) -> ReaderResult<Self> {
        let matcher = compile_glob(pattern)?;
        Ok(Self::new(move |path| {
            matcher.is_match(path.trim_start_matches('/'))
        }))
    }

    pub fn matches(&self, path: &str) -> bool {
        (self.predicate)(path)
    }
}

impl fmt::Debug for PathFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PathFilter(..)")
    }
}

/// True if `pattern` contains glob metacharacters
pub fn is_glob(pattern: &str) -> bool {
    pattern.contains(|c: char| matches!(c, '*' | '?' | '[' | '{'))
}

fn compile_glob(pattern: &str) -> ReaderResult<GlobMatcher> {
    let glob = GlobBuilder::new(pattern.trim_start_matches('/'))
        .literal_separator(true)
        .build()
        .map_err(|e| {
            ReaderError::InvalidUrl(format!("Invalid glob pattern '{}': {}", pattern, e))
        })?;
    Ok(glob.compile_matcher())
}
