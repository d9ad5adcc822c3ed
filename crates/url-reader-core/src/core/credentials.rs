use crate::core::error::{ReaderError, ReaderResult};
use keyring::Entry;

/// Service name for keyring entries
const KEYRING_SERVICE: &str = "url-reader";

/// Manages integration tokens stored in the OS keychain
///
/// Platform support:
/// - macOS: Keychain
/// - Windows: Credential Manager
/// - Linux: Secret Service (libsecret)
pub struct CredentialStore;

impl CredentialStore {
    /// Keychain key under which the token for `host` is stored
    pub fn token_key(host: &str) -> String {
        format!("github-token:{}", host)
    }

    /// Store a credential in the OS keychain
    pub fn store(key: &str, value: &str) -> ReaderResult<()> {
        let entry = Entry::new(KEYRING_SERVICE, key).map_err(|e| {
            ReaderError::Credentials(format!("Failed to create keyring entry: {}", e))
        })?;

        entry.set_password(value).map_err(|e| {
            ReaderError::Credentials(format!("Failed to store credential in keychain: {}", e))
        })?;

        Ok(())
    }

    /// Retrieve a credential from the OS keychain
    pub fn retrieve(key: &str) -> ReaderResult<String> {
        let entry = Entry::new(KEYRING_SERVICE, key).map_err(|e| {
            ReaderError::Credentials(format!("Failed to create keyring entry: {}", e))
        })?;

        entry.get_password().map_err(|e| {
            ReaderError::Credentials(format!(
                "Failed to retrieve credential from keychain: {}",
                e
            ))
        })
    }

    /// Delete a credential from the OS keychain
    pub fn delete(key: &str) -> ReaderResult<()> {
        let entry = Entry::new(KEYRING_SERVICE, key).map_err(|e| {
            ReaderError::Credentials(format!("Failed to create keyring entry: {}", e))
        })?;

        entry.delete_credential().map_err(|e| {
            ReaderError::Credentials(format!("Failed to delete credential from keychain: {}", e))
        })
    }

    /// Check if a credential exists in the keychain
    pub fn exists(key: &str) -> bool {
        Self::retrieve(key).is_ok()
    }
}
