use crate::core::integration::{GitHubIntegrationConfig, GitHubIntegrations};
use crate::core::path::{config_file, scratch_dir};
use crate::core::{ReaderError, ReaderResult};
use crate::tree::{TreeMaterializer, DEFAULT_MAX_ARCHIVE_SIZE};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Source-control hosts readers are created for
    #[serde(default)]
    pub integrations: IntegrationsConfig,

    /// Directory archives are extracted under (defaults to a
    /// platform-specific cache directory)
    ///
    /// Default locations:
    /// - Windows: %LOCALAPPDATA%\url-reader\scratch
    /// - Linux: ~/.cache/url-reader/scratch
    /// - macOS: ~/Library/Caches/url-reader/scratch
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scratch_dir: Option<String>,

    /// Upper bound on the bytes extracted from a single archive
    #[serde(default = "default_max_archive_size")]
    pub max_archive_size: u64,

    /// Whether tokens stored with `url-reader login` are used
    #[serde(default = "default_true")]
    pub use_keychain: bool,
}

/// Integration records, grouped by provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntegrationsConfig {
    #[serde(default)]
    pub github: Vec<GitHubIntegrationConfig>,
}

impl Default for IntegrationsConfig {
    fn default() -> Self {
        Self {
            github: vec![GitHubIntegrationConfig::github_com()],
        }
    }
}

fn default_max_archive_size() -> u64 {
    DEFAULT_MAX_ARCHIVE_SIZE
}

fn default_true() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            integrations: IntegrationsConfig::default(),
            scratch_dir: None,
            max_archive_size: default_max_archive_size(),
            use_keychain: true,
        }
    }
}

impl Config {
    /// Load config from the platform-specific config directory, falling
    /// back to defaults if it doesn't exist
    ///
    /// Config locations:
    /// - Windows: %APPDATA%\url-reader\config.yaml
    /// - Linux: ~/.config/url-reader/config.yaml
    /// - macOS: ~/Library/Application Support/url-reader/config.yaml
    pub fn load() -> ReaderResult<Self> {
        let config_path = config_file()?;

        if !config_path.exists() {
            tracing::debug!(path = %config_path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }

        Self::load_from(&config_path)
    }

    /// Load and validate config from an explicit path
    pub fn load_from(path: &Path) -> ReaderResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            ReaderError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_yaml(&content)
    }

    /// Parse config and validate its integration records
    pub fn from_yaml(content: &str) -> ReaderResult<Self> {
        let config: Config = serde_yaml::from_str(content)
            .map_err(|e| ReaderError::Config(format!("Failed to parse config: {}", e)))?;

        if config.max_archive_size == 0 {
            return Err(ReaderError::Config(
                "max_archive_size must be greater than zero".to_string(),
            ));
        }
        config.github_integrations()?;

        Ok(config)
    }

    /// The validated GitHub integrations
    pub fn github_integrations(&self) -> ReaderResult<GitHubIntegrations> {
        GitHubIntegrations::new(self.integrations.github.clone())
    }

    /// Get the scratch directory path
    pub fn get_scratch_dir(&self) -> PathBuf {
        match self.scratch_dir {
            Some(ref dir) => PathBuf::from(dir),
            None => scratch_dir(),
        }
    }

    /// Materializer bound to this config's scratch directory and size limit
    pub fn materializer(&self) -> TreeMaterializer {
        TreeMaterializer::new(self.get_scratch_dir(), self.max_archive_size)
    }
}
