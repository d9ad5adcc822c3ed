use super::*;

#[test]
fn test_unsupported_host_fails() {
    let ctx = TestContext::new();

    ctx.url_reader()
        .arg("read")
        .arg("https://gitlab.example.com/acme/widgets/blob/main/README.md")
        .assert()
        .failure()
        .code(1)
        .stderr(
            predicate::str::contains("Unsupported URL")
                .and(predicate::str::contains("integrations.github")),
        );
}

#[test]
fn test_malformed_url_fails() {
    let ctx = TestContext::new();

    ctx.url_reader()
        .arg("tree")
        .arg("not-a-url")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid URL"));
}

#[test]
fn test_invalid_config_fails() {
    let ctx = TestContext::new();
    std::fs::write(
        &ctx.config_path,
        "integrations:\n  github:\n    - host: ghe.example.com\n",
    )
    .unwrap();

    ctx.url_reader()
        .arg("search")
        .arg("https://ghe.example.com/acme/widgets/blob/main/**/*.md")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration error"));
}

#[test]
fn test_missing_config_file_fails() {
    let ctx = TestContext::new();

    Command::cargo_bin("url-reader")
        .unwrap()
        .arg("--config")
        .arg(ctx.temp.path().join("absent.yaml"))
        .arg("read")
        .arg("https://github.com/acme/widgets/blob/main/README.md")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read"));
}
