//! Integration records and host matching
//!
//! An integration is one configured source-control host. Records are
//! validated once at startup and are read-only afterwards.

use crate::core::{ReaderError, ReaderResult};
use serde::{Deserialize, Serialize};
use url::Url;

/// Host of the public GitHub service
pub const GITHUB_HOST: &str = "github.com";

/// Public API endpoint used when `github.com` has no explicit override
pub const GITHUB_API_BASE_URL: &str = "https://api.github.com";

/// Public raw-content endpoint used when `github.com` has no explicit override
pub const GITHUB_RAW_BASE_URL: &str = "https://raw.githubusercontent.com";

/// Connection details for one GitHub-like host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitHubIntegrationConfig {
    /// Host name, optionally with a port (e.g. `github.example.com:8443`)
    pub host: String,

    /// REST API base, e.g. `https://github.example.com/api/v3`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_base_url: Option<String>,

    /// Raw content base, e.g. `https://raw.github.example.com`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_base_url: Option<String>,

    /// Static access token
    #[serde(default, skip_serializing)]
    pub token: Option<String>,
}

impl GitHubIntegrationConfig {
    /// Create a validated integration record
    pub fn new(
        host: impl Into<String>,
        api_base_url: Option<String>,
        raw_base_url: Option<String>,
        token: Option<String>,
    ) -> ReaderResult<Self> {
        Self {
            host: host.into(),
            api_base_url,
            raw_base_url,
            token,
        }
        .validated()
    }

    /// The public `github.com` integration with default endpoints
    pub fn github_com() -> Self {
        Self {
            host: GITHUB_HOST.to_string(),
            api_base_url: Some(GITHUB_API_BASE_URL.to_string()),
            raw_base_url: Some(GITHUB_RAW_BASE_URL.to_string()),
            token: None,
        }
    }

    /// Normalize and check a record.
    ///
    /// Trailing slashes are trimmed from base URLs, `github.com` gets the
    /// public endpoints as defaults, and a record with neither base URL
    /// is rejected.
    pub fn validated(mut self) -> ReaderResult<Self> {
        let host = self.host.trim().to_ascii_lowercase();
        if !is_valid_host(&host) {
            return Err(ReaderError::Config(format!(
                "Invalid integration host '{}'",
                self.host
            )));
        }
        self.host = host;

        self.api_base_url = normalize_base_url(&self.host, "api_base_url", self.api_base_url)?;
        self.raw_base_url = normalize_base_url(&self.host, "raw_base_url", self.raw_base_url)?;

        if self.host == GITHUB_HOST {
            self.api_base_url
                .get_or_insert_with(|| GITHUB_API_BASE_URL.to_string());
            self.raw_base_url
                .get_or_insert_with(|| GITHUB_RAW_BASE_URL.to_string());
        }

        if self.api_base_url.is_none() && self.raw_base_url.is_none() {
            return Err(ReaderError::Config(format!(
                "Integration for host '{}' needs at least one of api_base_url or raw_base_url",
                self.host
            )));
        }

        self.token = self.token.filter(|t| !t.trim().is_empty());
        Ok(self)
    }

    /// True if this integration owns the URL's host
    pub fn matches(&self, url: &Url) -> bool {
        host_with_port(url).as_deref() == Some(self.host.as_str())
    }
}

/// The set of configured GitHub integrations, in configuration order
#[derive(Debug, Clone, Default)]
pub struct GitHubIntegrations {
    integrations: Vec<GitHubIntegrationConfig>,
}

impl GitHubIntegrations {
    /// Validate every record and reject duplicate hosts
    pub fn new(configs: Vec<GitHubIntegrationConfig>) -> ReaderResult<Self> {
        let mut integrations: Vec<GitHubIntegrationConfig> = Vec::with_capacity(configs.len());

        for config in configs {
            let config = config.validated()?;
            if integrations.iter().any(|i| i.host == config.host) {
                return Err(ReaderError::Config(format!(
                    "Duplicate integration for host '{}'",
                    config.host
                )));
            }
            integrations.push(config);
        }

        Ok(Self { integrations })
    }

    pub fn list(&self) -> &[GitHubIntegrationConfig] {
        &self.integrations
    }

    pub fn len(&self) -> usize {
        self.integrations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.integrations.is_empty()
    }

    pub fn by_host(&self, host: &str) -> Option<&GitHubIntegrationConfig> {
        self.integrations.iter().find(|i| i.host == host)
    }

    /// The integration owning `url`, if any
    pub fn by_url(&self, url: &str) -> Option<&GitHubIntegrationConfig> {
        let parsed = Url::parse(url).ok()?;
        self.integrations.iter().find(|i| i.matches(&parsed))
    }
}

/// `host[:port]` of a URL, with the port only when it is explicit and
/// not the scheme default.
pub fn host_with_port(url: &Url) -> Option<String> {
    let host = url.host_str()?;
    Some(match url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    })
}

fn is_valid_host(host: &str) -> bool {
    if host.is_empty() || host.contains('/') || host.contains("://") {
        return false;
    }
    match Url::parse(&format!("https://{}", host)) {
        Ok(url) => host_with_port(&url).as_deref() == Some(host),
        Err(_) => false,
    }
}

fn normalize_base_url(
    host: &str,
    field: &str,
    value: Option<String>,
) -> ReaderResult<Option<String>> {
    let Some(value) = value else {
        return Ok(None);
    };

    let trimmed = value.trim().trim_end_matches('/').to_string();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let url = Url::parse(&trimmed).map_err(|e| {
        ReaderError::Config(format!(
            "Invalid {} '{}' for host '{}': {}",
            field, value, host, e
        ))
    })?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ReaderError::Config(format!(
            "Invalid {} '{}' for host '{}': expected http or https",
            field, value, host
        )));
    }

    Ok(Some(trimmed))
}
