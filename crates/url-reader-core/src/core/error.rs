use thiserror::Error;

pub type ReaderResult<T> = Result<T, ReaderError>;

#[derive(Error, Debug)]
pub enum ReaderError {
    /// The requested resource does not exist upstream (HTTP 404).
    #[error("Not found: {0}")]
    NotFound(String),

    /// The caller's etag matches the current revision. Not a failure:
    /// there is simply nothing new to return.
    #[error("Not modified")]
    NotModified,

    /// No configured integration owns the URL's host.
    #[error("Unsupported URL: {0}")]
    UnsupportedUrl(String),

    /// Archive extraction exceeded the configured byte limit.
    #[error("Archive too large: extracted content exceeds {limit} bytes")]
    ArchiveTooLarge { limit: u64 },

    /// Any other upstream failure. `status` is absent for transport errors.
    #[error("Read error: {message}")]
    Read { status: Option<u16>, message: String },

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Credential error: {0}")]
    Credentials(String),

    #[error("Path error: {0}")]
    Path(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("WalkDir error: {0}")]
    WalkDir(#[from] walkdir::Error),
}

impl ReaderError {
    /// Build a `Read` error from an upstream HTTP status.
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        ReaderError::Read {
            status: Some(status),
            message: message.into(),
        }
    }

    /// Build a `Read` error for a failure that never produced a status.
    pub fn transport(message: impl Into<String>) -> Self {
        ReaderError::Read {
            status: None,
            message: message.into(),
        }
    }

    pub fn is_not_modified(&self) -> bool {
        matches!(self, ReaderError::NotModified)
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ReaderError::NotFound(_))
    }

    /// Upstream HTTP status carried by the error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            ReaderError::Read { status, .. } => *status,
            ReaderError::NotFound(_) => Some(404),
            ReaderError::NotModified => Some(304),
            _ => None,
        }
    }
}
