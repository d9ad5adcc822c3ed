//! url-reader: read remote content from source-control hosts by URL
//!
//! This crate provides the main url-reader library, re-exporting core
//! functionality from `url-reader-core` and organizing the readers, the
//! registry that selects between them, and the response types they share.

pub use url_reader_core::{format_error_with_help, CredentialStore, ErrorHelp, ReaderError, ReaderResult};

/// Core module re-exported from url-reader-core.
pub mod core {
    pub use url_reader_core::core::*;
    pub use url_reader_core::*;

    /// Path module re-exported from url-reader-core.
    pub mod path {
        pub use url_reader_core::core::path::*;
    }
}

/// Configuration management.
pub mod config;

/// Capability traits and test doubles.
pub mod di;

/// GitHub integration.
pub mod github;

/// Reader selection by host.
pub mod registry;

/// Response types and archive materialization.
pub mod tree;

pub use config::Config;
pub use di::{Credentials, CredentialsProvider, UrlReader};
pub use registry::{ReaderPredicateTuple, UrlReaders};
