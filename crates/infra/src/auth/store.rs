//! Live token ownership
//!
//! [`TokenStore`] decides where a token comes from (cache or network), keeps
//! the one in use, and writes freshly issued tokens back to the cache.

use std::sync::Arc;

use parking_lot::RwLock;
use rocketfuel_domain::{AccessToken, Credentials};
use tracing::info;

use super::cache::TokenCache;
use super::requester::TokenRequester;
use crate::api::errors::ApiError;

/// Holds the credentials, the cache and the currently live token.
pub struct TokenStore {
    credentials: Credentials,
    cache: Arc<dyn TokenCache>,
    requester: TokenRequester,
    live: RwLock<Option<AccessToken>>,
}

impl TokenStore {
    pub fn new(
        credentials: Credentials,
        cache: Arc<dyn TokenCache>,
        requester: TokenRequester,
    ) -> Self {
        Self { credentials, cache, requester, live: RwLock::new(None) }
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Make a token live and return it.
    ///
    /// With `force` unset a cached token is used as-is, without contacting
    /// the auth endpoint. With `force` set, or when the cache is empty, a new
    /// token is requested and written to the cache before it becomes live.
    ///
    /// # Errors
    /// `ApiError::CredentialAcquisition` when the auth endpoint fails,
    /// `ApiError::TokenCache` when the cache cannot be read or written.
    pub fn obtain(&self, force: bool) -> Result<AccessToken, ApiError> {
        let cached = if force { None } else { self.cache.load()? };

        let token = match cached {
            Some(token) => {
                info!(source = "cache", client_id = %self.credentials.client_id, "access token loaded");
                token
            }
            None => {
                let token = self.requester.request()?;
                self.cache.save(&token)?;
                info!(
                    source = "network",
                    client_id = %self.credentials.client_id,
                    forced = force,
                    "access token issued"
                );
                token
            }
        };

        *self.live.write() = Some(token.clone());
        Ok(token)
    }

    /// The live token, obtaining one first if none is live yet.
    ///
    /// # Errors
    /// Same as [`TokenStore::obtain`].
    pub fn current(&self) -> Result<AccessToken, ApiError> {
        if let Some(token) = self.live.read().clone() {
            return Ok(token);
        }
        self.obtain(false)
    }
}

impl std::fmt::Debug for TokenStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenStore")
            .field("credentials", &self.credentials)
            .field("auth_url", &self.requester.auth_url())
            .field("live", &*self.live.read())
            .finish_non_exhaustive()
    }
}
