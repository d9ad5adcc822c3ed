//! User-facing rendering of errors with a remediation hint

use crate::core::error::ReaderError;

/// A remediation hint attached to an error category
pub trait ErrorHelp {
    fn help(&self) -> Option<&'static str>;
}

impl ErrorHelp for ReaderError {
    fn help(&self) -> Option<&'static str> {
        match self {
            ReaderError::NotFound(_) => {
                Some("Check the owner, repository, ref and path in the URL, and that the token can see the repository.")
            }
            ReaderError::NotModified => None,
            ReaderError::UnsupportedUrl(_) => {
                Some("Add an entry for this host under `integrations.github` in config.yaml.")
            }
            ReaderError::ArchiveTooLarge { .. } => {
                Some("Narrow the URL to a subdirectory or raise `max_archive_size` in config.yaml.")
            }
            ReaderError::Read {
                status: Some(401) | Some(403),
                ..
            } => Some("The request was rejected. Set a token for this host (config, GITHUB_TOKEN, or `url-reader login`)."),
            ReaderError::Read { status: None, .. } => {
                Some("The host could not be reached. Check network access and the configured base URLs.")
            }
            ReaderError::InvalidUrl(_) => Some(
                "Expected https://<host>/<owner>/<repo>[/blob|tree/<ref>/<path>].",
            ),
            ReaderError::Config(_) | ReaderError::Yaml(_) => {
                Some("Each integration needs a host and at least one of api_base_url or raw_base_url.")
            }
            _ => None,
        }
    }
}

/// Format an error for display, appending its hint when there is one
pub fn format_error_with_help(error: &ReaderError) -> String {
    match error.help() {
        Some(help) => format!("Error: {}\n\nHelp: {}", error, help),
        None => format!("Error: {}", error),
    }
}
