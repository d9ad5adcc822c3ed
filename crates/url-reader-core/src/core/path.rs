use crate::core::error::{ReaderError, ReaderResult};
use std::path::{Path, PathBuf};

/// Get the url-reader home directory
///
/// Platform-specific locations:
/// - Windows: %APPDATA%\url-reader
/// - Linux: ~/.config/url-reader
/// - macOS: ~/Library/Application Support/url-reader
pub fn reader_home() -> ReaderResult<PathBuf> {
    let config_dir = dirs::config_dir()
        .ok_or_else(|| ReaderError::Path("Could not determine config directory".to_string()))?;
    Ok(config_dir.join("url-reader"))
}

/// Get the config file path (`<reader_home>/config.yaml`)
pub fn config_file() -> ReaderResult<PathBuf> {
    Ok(reader_home()?.join("config.yaml"))
}

/// Default parent directory for extracted archives.
///
/// Falls back to the system temp dir when no cache dir is known.
pub fn scratch_dir() -> PathBuf {
    dirs::cache_dir()
        .map(|dir| dir.join("url-reader").join("scratch"))
        .unwrap_or_else(|| std::env::temp_dir().join("url-reader"))
}

/// Ensure a directory exists, creating it if necessary
pub fn ensure_dir(path: &Path) -> ReaderResult<()> {
    if !path.exists() {
        std::fs::create_dir_all(path)?;
    }
    Ok(())
}
