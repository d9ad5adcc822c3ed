//! Reader for GitHub and GitHub Enterprise hosts

use crate::core::integration::GitHubIntegrationConfig;
use crate::core::{ReaderError, ReaderResult};
use crate::di::traits::{Credentials, CredentialsProvider, UrlReader};
use crate::github::types::{
    GitHubBlob, GitHubBranch, GitHubErrorBody, GitHubRepo, GitHubTree, RepoDetails, TreeEntry,
    TreeEntryType,
};
use crate::github::url::{choose_endpoint, Endpoint, GitHubUrl};
use crate::tree::{
    is_glob, PathFilter, ReadTreeOptions, ReadTreeResponse, ReadUrlOptions, ReadUrlResponse,
    ResponseFile, SearchOptions, SearchResponse, TreeMaterializer,
};
use async_trait::async_trait;
use base64::Engine;
use chrono::{DateTime, Utc};
use reqwest::{header, Client as HttpClient, StatusCode};
use serde::de::DeserializeOwned;
use std::sync::Arc;

const JSON_MEDIA_TYPE: &str = "application/vnd.github.v3+json";
const RAW_MEDIA_TYPE: &str = "application/vnd.github.v3.raw";

/// Reads files, trees and searches from one GitHub integration
///
/// Holds no per-request state: every call fetches credentials afresh and
/// resolves the ref to a commit again, so concurrent calls are
/// independent.
pub struct GithubUrlReader {
    integration: GitHubIntegrationConfig,
    credentials: Arc<dyn CredentialsProvider>,
    materializer: TreeMaterializer,
    http_client: HttpClient,
}

impl GithubUrlReader {
    pub fn new(
        integration: GitHubIntegrationConfig,
        credentials: Arc<dyn CredentialsProvider>,
        materializer: TreeMaterializer,
    ) -> ReaderResult<Self> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::USER_AGENT,
            header::HeaderValue::from_static("url-reader"),
        );

        let http_client = HttpClient::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| ReaderError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            integration,
            credentials,
            materializer,
            http_client,
        })
    }

    pub fn integration(&self) -> &GitHubIntegrationConfig {
        &self.integration
    }

    fn parse_url(&self, url: &str) -> ReaderResult<GitHubUrl> {
        let parsed = GitHubUrl::parse(url)?;
        if parsed.host != self.integration.host {
            return Err(ReaderError::UnsupportedUrl(url.to_string()));
        }
        Ok(parsed)
    }

    /// Resolve the URL's ref (or the default branch) to its current commit
    async fn repo_details(
        &self,
        url: &GitHubUrl,
        credentials: &Credentials,
    ) -> ReaderResult<RepoDetails> {
        let git_ref = match url.git_ref {
            Some(ref git_ref) => git_ref.clone(),
            None => {
                let repo_url = url.repo_url(&self.integration)?;
                let repo: GitHubRepo = get_json(&self.http_client, &repo_url, credentials).await?;
                repo.default_branch
            }
        };

        let branch_url = url.branch_url(&self.integration, &git_ref)?;
        let branch: GitHubBranch = get_json(&self.http_client, &branch_url, credentials).await?;

        tracing::debug!(
            repo = %url.full_name(),
            git_ref = %git_ref,
            sha = %branch.commit.sha,
            "Resolved ref"
        );

        Ok(RepoDetails {
            git_ref,
            commit_sha: branch.commit.sha,
        })
    }

    /// Download the commit's tarball and materialize the part under `subpath`
    async fn extract_archive(
        &self,
        url: &GitHubUrl,
        credentials: &Credentials,
        details: &RepoDetails,
        subpath: &str,
        filter: Option<PathFilter>,
    ) -> ReaderResult<ReadTreeResponse> {
        let archive_url = url.archive_url(&self.integration, &details.commit_sha)?;
        let response = send(&self.http_client, &archive_url, credentials, "*/*", None).await?;
        let bytes = response.bytes().await.map_err(|e| {
            ReaderError::transport(format!("Failed to read archive {}: {}", archive_url, e))
        })?;

        tracing::debug!(
            repo = %url.full_name(),
            sha = %details.commit_sha,
            compressed = bytes.len(),
            "Downloaded archive"
        );

        let materializer = self.materializer.clone();
        let subpath = subpath.to_string();
        let etag = details.commit_sha.clone();

        tokio::task::spawn_blocking(move || -> ReaderResult<ReadTreeResponse> {
            materializer.from_tar_gz(&bytes[..], &subpath, etag, filter.as_ref())
        })
        .await
        .map_err(|e| ReaderError::transport(format!("Archive extraction failed: {}", e)))?
    }

    /// A search hit whose content is fetched from the blob API on demand
    fn lazy_blob(
        &self,
        url: &GitHubUrl,
        details: &RepoDetails,
        entry: TreeEntry,
        credentials: &Credentials,
    ) -> ReaderResult<ResponseFile> {
        let blob_url = match entry.url {
            Some(blob_url) => blob_url,
            None => format!(
                "{}/git/blobs/{}",
                url.repo_url(&self.integration)?,
                entry.sha
            ),
        };
        let browse_url = url.browse_url(&details.git_ref, &entry.path);
        let client = self.http_client.clone();
        let credentials = credentials.clone();

        Ok(ResponseFile::new(entry.path, move || {
            let client = client.clone();
            let credentials = credentials.clone();
            let blob_url = blob_url.clone();
            Box::pin(async move { fetch_blob(&client, &blob_url, &credentials).await })
        })
        .with_url(browse_url))
    }

    async fn search_single(
        &self,
        url: &str,
        parsed: &GitHubUrl,
        etag: Option<String>,
    ) -> ReaderResult<SearchResponse> {
        match self.read_url(url, ReadUrlOptions { etag }).await {
            Ok(response) => Ok(SearchResponse {
                etag: response.etag.unwrap_or_default(),
                files: vec![ResponseFile::from_bytes(parsed.filepath.clone(), response.buffer)
                    .with_url(url.to_string())],
            }),
            Err(ReaderError::NotFound(_)) => Ok(SearchResponse::empty()),
            Err(e) => Err(e),
        }
    }
}

#[async_trait]
impl UrlReader for GithubUrlReader {
    async fn read_url(&self, url: &str, options: ReadUrlOptions) -> ReaderResult<ReadUrlResponse> {
        let parsed = self.parse_url(url)?;
        let credentials = self.credentials.get_credentials(url).await?;

        let endpoint = choose_endpoint(&self.integration, credentials.token.is_some());
        let fetch_url = parsed.file_fetch_url(&self.integration, endpoint)?;
        let accept = match endpoint {
            Endpoint::Api => RAW_MEDIA_TYPE,
            Endpoint::Raw => "*/*",
        };

        tracing::debug!(url = %fetch_url, ?endpoint, "Fetching file");

        let response = send(
            &self.http_client,
            &fetch_url,
            &credentials,
            accept,
            options.etag.as_deref(),
        )
        .await?;

        let etag = header_str(&response, header::ETAG).map(str::to_string);
        let last_modified_at = header_str(&response, header::LAST_MODIFIED).and_then(parse_http_date);

        let buffer = response
            .bytes()
            .await
            .map_err(|e| ReaderError::transport(format!("Failed to read {}: {}", fetch_url, e)))?
            .to_vec();

        Ok(ReadUrlResponse {
            buffer,
            etag,
            last_modified_at,
        })
    }

    async fn read_tree(
        &self,
        url: &str,
        options: ReadTreeOptions,
    ) -> ReaderResult<ReadTreeResponse> {
        let parsed = self.parse_url(url)?;
        let credentials = self.credentials.get_credentials(url).await?;
        let details = self.repo_details(&parsed, &credentials).await?;

        if options.etag.as_deref() == Some(details.commit_sha.as_str()) {
            tracing::debug!(repo = %parsed.full_name(), "Tree unchanged");
            return Err(ReaderError::NotModified);
        }

        self.extract_archive(
            &parsed,
            &credentials,
            &details,
            &parsed.filepath,
            options.filter,
        )
        .await
    }

    async fn search(&self, url: &str, options: SearchOptions) -> ReaderResult<SearchResponse> {
        let parsed = self.parse_url(url)?;
        if !is_glob(&parsed.filepath) {
            return self.search_single(url, &parsed, options.etag).await;
        }

        let filter = PathFilter::glob(&parsed.filepath)?;
        let credentials = self.credentials.get_credentials(url).await?;
        let details = self.repo_details(&parsed, &credentials).await?;

        if options.etag.as_deref() == Some(details.commit_sha.as_str()) {
            tracing::debug!(repo = %parsed.full_name(), "Search unchanged");
            return Err(ReaderError::NotModified);
        }

        let tree_url = parsed.tree_url(&self.integration, &details.commit_sha)?;
        let tree: GitHubTree = get_json(&self.http_client, &tree_url, &credentials).await?;

        if tree.truncated {
            tracing::info!(
                repo = %parsed.full_name(),
                sha = %details.commit_sha,
                "Tree listing truncated, searching the archive instead"
            );
            let snapshot = self
                .extract_archive(&parsed, &credentials, &details, "", Some(filter))
                .await?;
            let files = snapshot
                .files()
                .into_iter()
                .map(|file| {
                    let browse_url = parsed.browse_url(&details.git_ref, &file.path);
                    file.with_url(browse_url)
                })
                .collect();
            return Ok(SearchResponse {
                etag: details.commit_sha,
                files,
            });
        }

        let files = tree
            .tree
            .into_iter()
            .filter(|entry| entry.entry_type == TreeEntryType::Blob && filter.matches(&entry.path))
            .map(|entry| self.lazy_blob(&parsed, &details, entry, &credentials))
            .collect::<ReaderResult<Vec<_>>>()?;

        tracing::debug!(matches = files.len(), "Search complete");

        Ok(SearchResponse {
            etag: details.commit_sha,
            files,
        })
    }

    fn describe(&self) -> String {
        format!(
            "github{{host={},authed={}}}",
            self.integration.host,
            self.integration.token.is_some()
        )
    }
}

/// Issue a GET and map the status onto the error taxonomy
async fn send(
    client: &HttpClient,
    url: &str,
    credentials: &Credentials,
    accept: &str,
    etag: Option<&str>,
) -> ReaderResult<reqwest::Response> {
    let mut request = client.get(url).header(header::ACCEPT, accept);
    for (name, value) in &credentials.headers {
        request = request.header(name.as_str(), value.as_str());
    }
    if let Some(etag) = etag {
        request = request.header(header::IF_NONE_MATCH, etag);
    }

    let response = request
        .send()
        .await
        .map_err(|e| ReaderError::transport(format!("Request to {} failed: {}", url, e)))?;

    let status = response.status();
    if status == StatusCode::NOT_MODIFIED {
        return Err(ReaderError::NotModified);
    }
    if status == StatusCode::NOT_FOUND {
        return Err(ReaderError::NotFound(url.to_string()));
    }
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<GitHubErrorBody>(&body)
            .map(|b| b.message)
            .unwrap_or(body);
        return Err(ReaderError::from_status(
            status.as_u16(),
            format!("{} returned HTTP {}: {}", url, status, message.trim()),
        ));
    }

    Ok(response)
}

async fn get_json<T: DeserializeOwned>(
    client: &HttpClient,
    url: &str,
    credentials: &Credentials,
) -> ReaderResult<T> {
    send(client, url, credentials, JSON_MEDIA_TYPE, None)
        .await?
        .json()
        .await
        .map_err(|e| ReaderError::transport(format!("Failed to parse response from {}: {}", url, e)))
}

async fn fetch_blob(
    client: &HttpClient,
    url: &str,
    credentials: &Credentials,
) -> ReaderResult<Vec<u8>> {
    let blob: GitHubBlob = get_json(client, url, credentials).await?;
    match blob.encoding.as_str() {
        "base64" => base64::engine::general_purpose::STANDARD
            .decode(blob.content.replace('\n', ""))
            .map_err(|e| ReaderError::transport(format!("Failed to decode blob {}: {}", url, e))),
        "utf-8" => Ok(blob.content.into_bytes()),
        other => Err(ReaderError::transport(format!(
            "Unexpected blob encoding '{}' from {}",
            other, url
        ))),
    }
}

fn header_str(response: &reqwest::Response, name: header::HeaderName) -> Option<&str> {
    response.headers().get(name).and_then(|v| v.to_str().ok())
}

fn parse_http_date(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc2822(value)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}
