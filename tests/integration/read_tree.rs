//! Tests for directory tree reads

use super::common::{content_of, TestHost, SHA};
use url_reader::core::ReaderError;
use url_reader::tree::{PathFilter, ReadTreeOptions};
use url_reader::UrlReader;

#[tokio::test]
async fn test_read_tree_etag_round_trip() {
    let host = TestHost::start().await;
    host.mount_repo(1).await;

    let first = host
        .readers
        .read_tree(&host.url("tree/main/docs"), ReadTreeOptions::default())
        .await
        .unwrap();
    assert_eq!(first.etag(), SHA);
    assert_eq!(first.paths(), &["api/index.md", "guide.md", "logo.png"]);

    // Same commit: no second archive download
    let options = ReadTreeOptions {
        etag: Some(first.etag().to_string()),
        ..Default::default()
    };
    let second = host
        .readers
        .read_tree(&host.url("tree/main/docs"), options)
        .await;
    assert!(second.unwrap_err().is_not_modified());
}

#[tokio::test]
async fn test_read_tree_of_default_branch() {
    let host = TestHost::start().await;
    host.mount_repo(1).await;

    let response = host
        .readers
        .read_tree(
            &format!("https://{}/acme/widgets", super::common::HOST),
            ReadTreeOptions {
                filter: Some(PathFilter::glob("**/*.md").unwrap()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(
        response.paths(),
        &[
            "CHANGELOG.md",
            "README.md",
            "docs/api/index.md",
            "docs/guide.md"
        ]
    );
    for file in response.files() {
        assert_eq!(file.content().await.unwrap(), content_of(&file.path));
    }
}

#[tokio::test]
async fn test_read_tree_dir_and_archive() {
    let host = TestHost::start().await;
    host.mount_repo(1).await;

    let response = host
        .readers
        .read_tree(&host.url("tree/main/src"), ReadTreeOptions::default())
        .await
        .unwrap();

    let out = tempfile::TempDir::new().unwrap();
    let dir = response.dir(Some(out.path())).await.unwrap();
    assert_eq!(
        std::fs::read(dir.join("lib.rs")).unwrap(),
        content_of("src/lib.rs")
    );

    let archive = response.archive().await.unwrap();
    let mut entries = tar::Archive::new(flate2::read::GzDecoder::new(&archive[..]));
    let names: Vec<String> = entries
        .entries()
        .unwrap()
        .map(|e| e.unwrap().path().unwrap().display().to_string())
        .collect();
    assert_eq!(names, vec!["lib.rs"]);
}

#[tokio::test]
async fn test_read_tree_over_limit() {
    let host = TestHost::start_with_limit(16).await;
    host.mount_repo(1).await;

    let err = host
        .readers
        .read_tree(&host.url("tree/main"), ReadTreeOptions::default())
        .await
        .unwrap_err();

    assert!(matches!(err, ReaderError::ArchiveTooLarge { limit: 16 }));
    // The partial extraction is removed
    let leftovers: Vec<_> = std::fs::read_dir(host.scratch.path())
        .unwrap()
        .collect();
    assert!(leftovers.is_empty());
}

#[tokio::test]
async fn test_scratch_is_released_when_response_dropped() {
    let host = TestHost::start().await;
    host.mount_repo(1).await;

    let response = host
        .readers
        .read_tree(&host.url("tree/main"), ReadTreeOptions::default())
        .await
        .unwrap();
    assert_eq!(std::fs::read_dir(host.scratch.path()).unwrap().count(), 1);

    drop(response);
    assert_eq!(std::fs::read_dir(host.scratch.path()).unwrap().count(), 0);
}
