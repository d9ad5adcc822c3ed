use super::*;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const HOST: &str = "github.test";

async fn mount_branch(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/repos/acme/widgets/branches/main"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "name": "main",
            "commit": {"sha": "5ca1ab1e"}
        })))
        .mount(server)
        .await;
}

#[tokio::test(flavor = "multi_thread")]
async fn test_read_prints_file() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/raw/acme/widgets/main/README.md"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(b"# Widgets\n".to_vec())
                .insert_header("ETag", "\"r1\""),
        )
        .mount(&server)
        .await;
    let ctx = TestContext::with_host(HOST, &server.uri());

    ctx.url_reader()
        .arg("read")
        .arg(format!("https://{}/acme/widgets/blob/main/README.md", HOST))
        .assert()
        .success()
        .stdout("# Widgets\n")
        .stderr(predicate::str::contains("etag: \"r1\""));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_read_to_output_file() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/raw/acme/widgets/main/docs/guide.md"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"Guide\n".to_vec()))
        .mount(&server)
        .await;
    let ctx = TestContext::with_host(HOST, &server.uri());
    let output = ctx.temp.path().join("guide.md");

    ctx.url_reader()
        .arg("read")
        .arg(format!("https://{}/acme/widgets/blob/main/docs/guide.md", HOST))
        .arg("--output")
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote 6 byte(s)"));

    assert_eq!(std::fs::read(&output).unwrap(), b"Guide\n");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_read_not_modified_exits_zero() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/raw/acme/widgets/main/README.md"))
        .and(header("If-None-Match", "\"r1\""))
        .respond_with(ResponseTemplate::new(304))
        .mount(&server)
        .await;
    let ctx = TestContext::with_host(HOST, &server.uri());

    ctx.url_reader()
        .arg("read")
        .arg(format!("https://{}/acme/widgets/blob/main/README.md", HOST))
        .arg("--etag")
        .arg("\"r1\"")
        .assert()
        .success()
        .stderr(predicate::str::contains("Not modified"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_tree_unchanged_commit_exits_zero() {
    let server = MockServer::start().await;
    mount_branch(&server).await;
    let ctx = TestContext::with_host(HOST, &server.uri());

    ctx.url_reader()
        .arg("tree")
        .arg(format!("https://{}/acme/widgets/tree/main/docs", HOST))
        .arg("--etag")
        .arg("5ca1ab1e")
        .assert()
        .success()
        .stderr(predicate::str::contains("Not modified"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_search_lists_matches() {
    let server = MockServer::start().await;
    mount_branch(&server).await;
    Mock::given(method("GET"))
        .and(path("/repos/acme/widgets/git/trees/5ca1ab1e"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "sha": "5ca1ab1e",
            "truncated": false,
            "tree": [
                {"path": "README.md", "type": "blob", "sha": "b1"},
                {"path": "docs/guide.md", "type": "blob", "sha": "b2"},
                {"path": "src/lib.rs", "type": "blob", "sha": "b3"}
            ]
        })))
        .mount(&server)
        .await;
    let ctx = TestContext::with_host(HOST, &server.uri());

    ctx.url_reader()
        .arg("search")
        .arg(format!("https://{}/acme/widgets/blob/main/**/*.md", HOST))
        .assert()
        .success()
        .stdout(
            predicate::str::contains("README.md")
                .and(predicate::str::contains("docs/guide.md"))
                .and(predicate::str::contains("src/lib.rs").not()),
        )
        .stderr(predicate::str::contains("etag: 5ca1ab1e"));
}
