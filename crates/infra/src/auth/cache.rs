//! Token persistence
//!
//! The cache holds exactly one bearer token, stored verbatim. Nothing here
//! checks the token's shape or age; a stale token is discovered when the
//! protected API answers 401.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use parking_lot::RwLock;
use rocketfuel_domain::constants::{
    TOKEN_CACHE_FILE_EXTENSION, TOKEN_CACHE_FILE_PREFIX, TOKEN_CACHE_HASH_LEN,
};
use rocketfuel_domain::{AccessToken, Credentials, Result, RocketFuelError};
use sha2::{Digest, Sha256};
use tempfile::NamedTempFile;
use tracing::debug;

use crate::errors::InfraError;

/// Storage for the last token obtained from the auth endpoint.
pub trait TokenCache: Send + Sync {
    /// The cached token, or `None` if nothing has been stored.
    ///
    /// # Errors
    /// Returns `RocketFuelError::Storage` if the entry exists but cannot be
    /// read.
    fn load(&self) -> Result<Option<AccessToken>>;

    /// Replace the cached token.
    ///
    /// # Errors
    /// Returns `RocketFuelError::Storage` if the entry cannot be written.
    fn save(&self, token: &AccessToken) -> Result<()>;
}

/// File-backed cache.
///
/// Writes go to a uniquely named sibling temp file that is renamed over the
/// target, so a reader never sees a half-written token. Concurrent saves,
/// from threads or processes, all succeed and the last rename wins.
#[derive(Debug, Clone)]
pub struct FileTokenCache {
    path: PathBuf,
}

impl FileTokenCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Cache at [`default_token_cache_path`] for `credentials`.
    pub fn for_credentials(credentials: &Credentials) -> Self {
        Self::new(default_token_cache_path(credentials))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TokenCache for FileTokenCache {
    fn load(&self) -> Result<Option<AccessToken>> {
        if !self.path.is_file() {
            debug!(path = %self.path.display(), "token cache file does not exist");
            return Ok(None);
        }

        let contents = fs::read_to_string(&self.path).map_err(storage_error)?;
        Ok(Some(AccessToken::new(contents)))
    }

    fn save(&self, token: &AccessToken) -> Result<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir).map_err(storage_error)?;

        // Each save gets its own uniquely named temp file; dropping it on an
        // error path removes it.
        let mut temp = NamedTempFile::new_in(dir).map_err(storage_error)?;
        temp.write_all(token.as_str().as_bytes()).map_err(storage_error)?;
        temp.as_file().sync_all().map_err(storage_error)?;

        // Atomic rename
        temp.persist(&self.path).map_err(|err| storage_error(err.error))?;

        debug!(path = %self.path.display(), "token cache updated");
        Ok(())
    }
}

/// Process-local cache for callers that do not want a file on disk.
#[derive(Debug, Default)]
pub struct MemoryTokenCache {
    token: RwLock<Option<AccessToken>>,
}

impl MemoryTokenCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cache pre-populated with `token`.
    pub fn with_token(token: impl Into<AccessToken>) -> Self {
        Self { token: RwLock::new(Some(token.into())) }
    }
}

impl TokenCache for MemoryTokenCache {
    fn load(&self) -> Result<Option<AccessToken>> {
        Ok(self.token.read().clone())
    }

    fn save(&self, token: &AccessToken) -> Result<()> {
        *self.token.write() = Some(token.clone());
        Ok(())
    }
}

/// Default cache location: a file in the system temp directory named after a
/// hash of the credentials, so different credential pairs never share a
/// token.
pub fn default_token_cache_path(credentials: &Credentials) -> PathBuf {
    let mut hasher = Sha256::new();
    hasher.update(credentials.client_id.as_bytes());
    hasher.update(b":");
    hasher.update(credentials.client_secret.as_bytes());
    let digest = hex::encode(hasher.finalize());

    std::env::temp_dir().join(format!(
        "{}_{}.{}",
        TOKEN_CACHE_FILE_PREFIX,
        &digest[..TOKEN_CACHE_HASH_LEN],
        TOKEN_CACHE_FILE_EXTENSION
    ))
}

fn storage_error(err: std::io::Error) -> RocketFuelError {
    InfraError::from(err).into()
}
