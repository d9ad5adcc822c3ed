//! Tests for single-file reads

use super::common::{TestHost, HOST};
use url_reader::tree::ReadUrlOptions;
use url_reader::UrlReader;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, ResponseTemplate};

#[tokio::test]
async fn test_read_readme() {
    let host = TestHost::start().await;
    host.mount_raw("README.md", b"# Widgets\n", "\"r1\"").await;

    let bytes = host
        .readers
        .read(&host.url("blob/main/README.md"))
        .await
        .unwrap();

    assert_eq!(bytes, b"# Widgets\n");
}

#[tokio::test]
async fn test_read_url_etag_round_trip() {
    let host = TestHost::start().await;
    Mock::given(method("GET"))
        .and(path("/raw/acme/widgets/main/README.md"))
        .and(header("If-None-Match", "\"r1\""))
        .respond_with(ResponseTemplate::new(304))
        .with_priority(1)
        .mount(&host.server)
        .await;
    host.mount_raw("README.md", b"# Widgets\n", "\"r1\"").await;

    let first = host
        .readers
        .read_url(&host.url("blob/main/README.md"), ReadUrlOptions::default())
        .await
        .unwrap();
    assert_eq!(first.etag.as_deref(), Some("\"r1\""));

    let second = host
        .readers
        .read_url(
            &host.url("blob/main/README.md"),
            ReadUrlOptions { etag: first.etag },
        )
        .await;
    assert!(second.unwrap_err().is_not_modified());
}

#[tokio::test]
async fn test_read_missing_file_is_not_found() {
    let host = TestHost::start().await;

    let err = host
        .readers
        .read(&format!("https://{}/acme/widgets/blob/main/nope.md", HOST))
        .await
        .unwrap_err();

    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_read_server_error_keeps_status() {
    let host = TestHost::start().await;
    Mock::given(method("GET"))
        .and(path("/raw/acme/widgets/main/README.md"))
        .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
        .mount(&host.server)
        .await;

    let err = host
        .readers
        .read(&host.url("blob/main/README.md"))
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(502));
    assert!(err.to_string().contains("bad gateway"));
}
