//! Decomposition of GitHub web URLs and endpoint construction
//!
//! A web URL such as `https://github.com/acme/widgets/blob/main/docs/a.md`
//! is split into owner, repository, ref and path. Everything here is pure:
//! no requests are made and the same input always yields the same output.
//!
//! Refs are taken to be a single path segment. A branch named
//! `release/v2` therefore resolves as ref `release` with the remainder
//! prepended to the path.

use crate::core::{ReaderError, ReaderResult};
use crate::core::integration::{host_with_port, GitHubIntegrationConfig};
use url::Url;

/// The view a web URL was taken from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UrlKind {
    /// `/{owner}/{repo}` with nothing after it
    Repo,
    Blob,
    Tree,
    Raw,
}

impl UrlKind {
    fn from_segment(segment: &str) -> Option<Self> {
        match segment {
            "blob" => Some(UrlKind::Blob),
            "tree" => Some(UrlKind::Tree),
            "raw" => Some(UrlKind::Raw),
            _ => None,
        }
    }
}

/// Which upstream endpoint a file read goes to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    /// `{api}/repos/{owner}/{repo}/contents/{path}`
    Api,
    /// `{raw}/{owner}/{repo}/{ref}/{path}`
    Raw,
}

/// A parsed GitHub web URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitHubUrl {
    pub scheme: String,
    /// `host[:port]`
    pub host: String,
    pub owner: String,
    pub repo: String,
    pub kind: UrlKind,
    /// Branch, tag or commit. `None` means the default branch.
    pub git_ref: Option<String>,
    /// Path below the repository root, without leading or trailing `/`.
    /// Percent-escapes are decoded.
    pub filepath: String,
}

impl GitHubUrl {
    pub fn parse(url: &str) -> ReaderResult<Self> {
        let parsed =
            Url::parse(url).map_err(|e| ReaderError::InvalidUrl(format!("{}: {}", url, e)))?;
        let host = host_with_port(&parsed)
            .ok_or_else(|| ReaderError::InvalidUrl(format!("{}: missing host", url)))?;

        let segments = parsed
            .path_segments()
            .map(|segments| {
                segments
                    .filter(|s| !s.is_empty())
                    .map(decode_segment)
                    .collect::<ReaderResult<Vec<_>>>()
            })
            .transpose()?
            .unwrap_or_default();

        let [owner, repo, rest @ ..] = segments.as_slice() else {
            return Err(ReaderError::InvalidUrl(format!(
                "{}: expected /<owner>/<repo>",
                url
            )));
        };
        let repo = repo.strip_suffix(".git").unwrap_or(repo.as_str());

        let (kind, git_ref, filepath) = match rest {
            [] => (UrlKind::Repo, None, String::new()),
            [kind, git_ref, path @ ..] => {
                let kind = UrlKind::from_segment(kind).ok_or_else(|| {
                    ReaderError::InvalidUrl(format!(
                        "{}: expected blob, tree or raw after the repository, got '{}'",
                        url, kind
                    ))
                })?;
                (kind, Some(git_ref.clone()), path.join("/"))
            }
            [kind] => {
                return Err(ReaderError::InvalidUrl(format!(
                    "{}: missing ref after '{}'",
                    url, kind
                )))
            }
        };

        Ok(Self {
            scheme: parsed.scheme().to_string(),
            host,
            owner: owner.clone(),
            repo: repo.to_string(),
            kind,
            git_ref,
            filepath,
        })
    }

    /// `owner/repo`
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }

    /// Browsable URL of a file at a given ref
    pub fn browse_url(&self, git_ref: &str, path: &str) -> String {
        format!(
            "{}://{}/{}/{}/blob/{}/{}",
            self.scheme,
            self.host,
            self.owner,
            self.repo,
            encode_path(git_ref),
            encode_path(path)
        )
    }

    /// Endpoint serving the file's raw bytes
    pub fn file_fetch_url(
        &self,
        config: &GitHubIntegrationConfig,
        endpoint: Endpoint,
    ) -> ReaderResult<String> {
        if self.filepath.is_empty() {
            return Err(ReaderError::InvalidUrl(format!(
                "{}/{} does not point at a file",
                self.host,
                self.full_name()
            )));
        }

        match endpoint {
            Endpoint::Api => {
                let mut url = format!(
                    "{}/contents/{}",
                    self.repo_url(config)?,
                    encode_path(&self.filepath)
                );
                if let Some(ref git_ref) = self.git_ref {
                    url.push_str("?ref=");
                    url.push_str(&urlencoding::encode(git_ref));
                }
                Ok(url)
            }
            Endpoint::Raw => {
                let raw = config.raw_base_url.as_deref().ok_or_else(|| {
                    ReaderError::Config(format!("No raw_base_url configured for {}", config.host))
                })?;
                Ok(format!(
                    "{}/{}/{}/{}/{}",
                    raw,
                    urlencoding::encode(&self.owner),
                    urlencoding::encode(&self.repo),
                    encode_path(self.git_ref.as_deref().unwrap_or("HEAD")),
                    encode_path(&self.filepath)
                ))
            }
        }
    }

    /// `{api}/repos/{owner}/{repo}`
    pub fn repo_url(&self, config: &GitHubIntegrationConfig) -> ReaderResult<String> {
        Ok(format!(
            "{}/repos/{}/{}",
            api_base(config)?,
            urlencoding::encode(&self.owner),
            urlencoding::encode(&self.repo)
        ))
    }

    pub fn branch_url(
        &self,
        config: &GitHubIntegrationConfig,
        branch: &str,
    ) -> ReaderResult<String> {
        Ok(format!(
            "{}/branches/{}",
            self.repo_url(config)?,
            urlencoding::encode(branch)
        ))
    }

    /// Recursive tree listing of a commit
    pub fn tree_url(&self, config: &GitHubIntegrationConfig, sha: &str) -> ReaderResult<String> {
        Ok(format!(
            "{}/git/trees/{}?recursive=true",
            self.repo_url(config)?,
            urlencoding::encode(sha)
        ))
    }

    /// Gzipped tarball of a commit
    pub fn archive_url(&self, config: &GitHubIntegrationConfig, sha: &str) -> ReaderResult<String> {
        Ok(format!(
            "{}/tarball/{}",
            self.repo_url(config)?,
            urlencoding::encode(sha)
        ))
    }
}

/// Pick the endpoint for file reads.
///
/// The contents API is used when an API base is configured and either a
/// token is available or there is no raw base to fall back on.
pub fn choose_endpoint(config: &GitHubIntegrationConfig, has_token: bool) -> Endpoint {
    match (&config.api_base_url, &config.raw_base_url) {
        (Some(_), None) => Endpoint::Api,
        (Some(_), Some(_)) if has_token => Endpoint::Api,
        _ => Endpoint::Raw,
    }
}

fn api_base(config: &GitHubIntegrationConfig) -> ReaderResult<&str> {
    config.api_base_url.as_deref().ok_or_else(|| {
        ReaderError::Config(format!("No api_base_url configured for {}", config.host))
    })
}

fn decode_segment(segment: &str) -> ReaderResult<String> {
    urlencoding::decode(segment)
        .map(|s| s.into_owned())
        .map_err(|e| ReaderError::InvalidUrl(format!("Bad escape in '{}': {}", segment, e)))
}

fn encode_path(path: &str) -> String {
    path.split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}
