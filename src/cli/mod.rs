pub mod login;
pub mod read;
pub mod search;
pub mod tree;

use std::path::Path;
use url_reader::config::Config;
use url_reader::core::ReaderResult;
use url_reader::UrlReaders;

/// Build the registry from an explicit config file or the default location
pub fn readers(config_path: Option<&Path>) -> ReaderResult<UrlReaders> {
    let config = match config_path {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    UrlReaders::from_config(&config)
}
