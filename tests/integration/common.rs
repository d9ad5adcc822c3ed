//! Common utilities for integration tests

use flate2::write::GzEncoder;
use flate2::Compression;
use tempfile::TempDir;
use url_reader::config::Config;
use url_reader::UrlReaders;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const HOST: &str = "github.test";
pub const SHA: &str = "5ca1ab1e";

/// Files in the fake `acme/widgets` repository
pub const FILES: &[(&str, &[u8])] = &[
    ("README.md", b"# Widgets\n"),
    ("CHANGELOG.md", b"## 1.0.0\n"),
    ("docs/guide.md", b"Guide\n"),
    ("docs/api/index.md", b"API\n"),
    ("docs/logo.png", b"\x89PNG"),
    ("src/lib.rs", b"pub fn widget() {}\n"),
];

/// A mock GitHub API serving `acme/widgets` plus a registry pointed at it
pub struct TestHost {
    pub server: MockServer,
    pub readers: UrlReaders,
    pub scratch: TempDir,
}

impl TestHost {
    pub async fn start() -> Self {
        Self::start_with_limit(64 * 1024 * 1024).await
    }

    pub async fn start_with_limit(max_archive_size: u64) -> Self {
        let server = MockServer::start().await;
        let scratch = TempDir::new().unwrap();

        let yaml = format!(
            r#"
integrations:
  github:
    - host: {host}
      api_base_url: {uri}
      raw_base_url: {uri}/raw
    - host: github.com
scratch_dir: {scratch}
max_archive_size: {max_archive_size}
use_keychain: false
"#,
            host = HOST,
            uri = server.uri(),
            scratch = scratch.path().display(),
            max_archive_size = max_archive_size,
        );
        let config = Config::from_yaml(&yaml).unwrap();
        let readers = UrlReaders::from_config(&config).unwrap();

        Self {
            server,
            readers,
            scratch,
        }
    }

    pub fn url(&self, rest: &str) -> String {
        format!("https://{}/acme/widgets/{}", HOST, rest)
    }

    /// Repository metadata, the `main` branch and the commit tarball.
    /// Returns nothing; archive downloads are counted with `expect`.
    pub async fn mount_repo(&self, archive_downloads: u64) {
        Mock::given(method("GET"))
            .and(path("/repos/acme/widgets"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "name": "widgets",
                "full_name": "acme/widgets",
                "default_branch": "main"
            })))
            .mount(&self.server)
            .await;

        Mock::given(method("GET"))
            .and(path("/repos/acme/widgets/branches/main"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "name": "main",
                "commit": {"sha": SHA}
            })))
            .mount(&self.server)
            .await;

        Mock::given(method("GET"))
            .and(path(format!("/repos/acme/widgets/tarball/{}", SHA)))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(tarball()))
            .expect(archive_downloads)
            .mount(&self.server)
            .await;
    }

    /// Recursive listing of the commit, with a blob endpoint per file
    pub async fn mount_tree(&self, truncated: bool) {
        let entries: Vec<serde_json::Value> = FILES
            .iter()
            .enumerate()
            .map(|(i, (file, _))| {
                serde_json::json!({
                    "path": file,
                    "type": "blob",
                    "sha": format!("blob{}", i),
                    "url": format!("{}/repos/acme/widgets/git/blobs/blob{}", self.server.uri(), i)
                })
            })
            .collect();

        // A truncated listing omits most of the tree
        let listed = if truncated { &entries[..1] } else { &entries[..] };

        Mock::given(method("GET"))
            .and(path(format!("/repos/acme/widgets/git/trees/{}", SHA)))
            .and(query_param("recursive", "true"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "sha": SHA,
                "truncated": truncated,
                "tree": listed
            })))
            .mount(&self.server)
            .await;

        for (i, (_, content)) in FILES.iter().enumerate() {
            use base64::Engine;
            let encoded = base64::engine::general_purpose::STANDARD.encode(content);
            Mock::given(method("GET"))
                .and(path(format!("/repos/acme/widgets/git/blobs/blob{}", i)))
                .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                    "content": encoded,
                    "encoding": "base64"
                })))
                .mount(&self.server)
                .await;
        }
    }

    /// A raw file endpoint with an etag
    pub async fn mount_raw(&self, file: &str, content: &[u8], etag: &str) {
        Mock::given(method("GET"))
            .and(path(format!("/raw/acme/widgets/main/{}", file)))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_bytes(content.to_vec())
                    .insert_header("ETag", etag),
            )
            .mount(&self.server)
            .await;
    }
}

/// The repository as GitHub serves it: one top-level directory named
/// after the commit, holding every file
pub fn tarball() -> Vec<u8> {
    let encoder = GzEncoder::new(Vec::new(), Compression::default());
    let mut tar = tar::Builder::new(encoder);
    let root = format!("acme-widgets-{}", SHA);

    for (file, content) in FILES {
        let mut header = tar::Header::new_gnu();
        header.set_path(format!("{}/{}", root, file)).unwrap();
        header.set_size(content.len() as u64);
        header.set_mode(0o644);
        header.set_cksum();
        tar.append(&header, *content).unwrap();
    }

    tar.into_inner().unwrap().finish().unwrap()
}

/// Expected contents of a file in the fake repository
pub fn content_of(file: &str) -> &'static [u8] {
    FILES
        .iter()
        .find(|(name, _)| *name == file)
        .map(|(_, content)| *content)
        .unwrap()
}
