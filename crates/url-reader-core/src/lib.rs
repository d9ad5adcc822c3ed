//! Core types shared by the url-reader crates
//!
//! Holds the error taxonomy every reader reports with, the validated
//! integration records used for host matching, and keychain-backed
//! credential storage.

pub mod core;
pub mod integration;

pub use crate::core::{
    format_error_with_help, CredentialStore, ErrorHelp, ReaderError, ReaderResult,
};
pub use integration::{GitHubIntegrationConfig, GitHubIntegrations};
