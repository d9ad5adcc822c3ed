//! GitHub integration
//!
//! This module provides:
//! - Decomposition of GitHub web URLs into API endpoints
//! - Per-integration token lookup
//! - A reader for single files, directory trees and glob searches

pub mod credentials;
pub mod reader;
pub mod types;
pub mod url;

pub use credentials::GithubCredentialsProvider;
pub use reader::GithubUrlReader;
pub use url::{choose_endpoint, Endpoint, GitHubUrl, UrlKind};
