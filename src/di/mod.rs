//! Trait seams for readers and credentials
//!
//! Concrete readers are selected once, when the registry is built from
//! configuration, and held as `Arc<dyn UrlReader>`. Tests swap in the
//! in-memory implementations from [`mocks`].
//!
//! # Example (Testing)
//! ```
//! use url_reader::di::mocks::MockUrlReader;
//! use url_reader::di::UrlReader;
//! use std::sync::Arc;
//!
//! let reader: Arc<dyn UrlReader> = Arc::new(MockUrlReader::new("https://git.test/a/b", "e"));
//! assert!(reader.describe().starts_with("mock"));
//! ```

pub mod mocks;
pub mod traits;

// Re-export key types
pub use traits::{Credentials, CredentialsProvider, UrlReader};
