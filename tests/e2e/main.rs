use assert_cmd::Command;
use predicates::prelude::*;
use std::path::PathBuf;
use tempfile::TempDir;

// Declare submodules
pub mod commands;
pub mod errors;

/// Test context that provides an isolated config and scratch directory
pub struct TestContext {
    pub temp: TempDir,
    pub config_path: PathBuf,
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

impl TestContext {
    /// Context whose only integration is public github.com
    pub fn new() -> Self {
        Self::with_integrations("    - host: github.com\n")
    }

    /// Context with a GitHub-like host served from `api_base_url`
    pub fn with_host(host: &str, api_base_url: &str) -> Self {
        Self::with_integrations(&format!(
            "    - host: {}\n      api_base_url: {}\n      raw_base_url: {}/raw\n",
            host, api_base_url, api_base_url
        ))
    }

    fn with_integrations(entries: &str) -> Self {
        let temp = TempDir::new().unwrap();
        let config_path = temp.path().join("config.yaml");
        let yaml = format!(
            "integrations:\n  github:\n{}scratch_dir: {}\nuse_keychain: false\n",
            entries,
            temp.path().join("scratch").display()
        );
        std::fs::write(&config_path, yaml).unwrap();
        Self { temp, config_path }
    }

    /// The url-reader binary, pointed at this context's config
    pub fn url_reader(&self) -> Command {
        let mut cmd = Command::cargo_bin("url-reader").unwrap();
        cmd.arg("--config")
            .arg(&self.config_path)
            .env_remove("GITHUB_TOKEN")
            .env_remove("RUST_LOG");
        cmd
    }
}

#[test]
fn test_help_lists_commands() {
    Command::cargo_bin("url-reader")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("read")
                .and(predicate::str::contains("tree"))
                .and(predicate::str::contains("search"))
                .and(predicate::str::contains("login")),
        );
}
