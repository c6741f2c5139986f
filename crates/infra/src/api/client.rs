//! Authenticated request engine
//!
//! Every call goes through the same two phases: send with connection retry,
//! then, on 401, force one token refresh and send again. The refresh is
//! allowed at most once per logical call.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use rocketfuel_domain::constants::{DEFAULT_API_BASE_URL, DEFAULT_AUTH_URL, UNAUTHORIZED_STATUS};
use rocketfuel_domain::{AccessToken, ApiResponse, ClientConfig, Credentials, HttpMethod};
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use super::errors::ApiError;
use crate::auth::{FileTokenCache, TokenCache, TokenRequester, TokenStore};
use crate::http::{
    HttpRequest, HttpTransport, ReqwestTransport, RetryPolicy, Sleeper, ThreadSleeper,
};

/// Blocking Marketing Cloud REST client.
///
/// Construction obtains a token (from the cache when present), so a value of
/// this type always has one live.
pub struct SfmcClient {
    base_url: String,
    transport: Arc<dyn HttpTransport>,
    tokens: TokenStore,
    retry: RetryPolicy,
    sleeper: Arc<dyn Sleeper>,
}

impl SfmcClient {
    /// Client with the default endpoints, retry policy and production
    /// transport.
    ///
    /// `token_cache_path` of `None` uses a per-credential file in the system
    /// temp directory.
    ///
    /// # Errors
    /// Fails when the initial token cannot be obtained.
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        token_cache_path: Option<PathBuf>,
    ) -> Result<Self, ApiError> {
        let mut builder =
            Self::builder().credentials(Credentials::new(client_id, client_secret));
        if let Some(path) = token_cache_path {
            builder = builder.token_cache_path(path);
        }
        builder.build()
    }

    /// Client from a loaded [`ClientConfig`].
    ///
    /// # Errors
    /// Fails when the transport cannot be built or the initial token cannot
    /// be obtained.
    pub fn from_config(config: ClientConfig) -> Result<Self, ApiError> {
        Self::builder().config(config).build()
    }

    /// Create a builder for fluent configuration
    pub fn builder() -> SfmcClientBuilder {
        SfmcClientBuilder::default()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn credentials(&self) -> &Credentials {
        self.tokens.credentials()
    }

    /// The token currently in use.
    ///
    /// # Errors
    /// Only fails if no token is live and obtaining one fails.
    pub fn access_token(&self) -> Result<AccessToken, ApiError> {
        self.tokens.current()
    }

    /// Force a new token from the auth endpoint and write it to the cache.
    ///
    /// # Errors
    /// `ApiError::CredentialAcquisition` or `ApiError::TokenCache`.
    pub fn refresh_access_token(&self) -> Result<AccessToken, ApiError> {
        self.tokens.obtain(true)
    }

    /// Send `body` to `path` with one token refresh allowed.
    ///
    /// # Errors
    /// See [`SfmcClient::call_with_refresh`].
    pub fn call<B>(&self, path: &str, body: &B, method: HttpMethod) -> Result<ApiResponse, ApiError>
    where
        B: Serialize + ?Sized,
    {
        self.call_with_refresh(path, body, method, true)
    }

    /// Send `body` as JSON to `base_url + path` with the live bearer token.
    ///
    /// Connection failures are retried per the retry policy. A 401 triggers
    /// a forced token refresh and a second send when `allow_refresh` is set.
    /// Any other status, success or not, is returned as-is.
    ///
    /// # Errors
    /// - `ApiError::Serialization` if `body` cannot be encoded
    /// - `ApiError::ConnectionExhausted` if every attempt failed to connect
    /// - `ApiError::AuthRejectedAfterRefresh` on a 401 with no refresh left
    /// - `ApiError::CredentialAcquisition` / `ApiError::TokenCache` from the
    ///   refresh
    #[instrument(skip(self, body), fields(path = %path, method = %method))]
    pub fn call_with_refresh<B>(
        &self,
        path: &str,
        body: &B,
        method: HttpMethod,
        allow_refresh: bool,
    ) -> Result<ApiResponse, ApiError>
    where
        B: Serialize + ?Sized,
    {
        let url = format!("{}{}", self.base_url, path);
        let payload = serde_json::to_vec(body)?;
        debug!(url = %url, payload_bytes = payload.len(), "request prepared");

        let mut refresh_allowed = allow_refresh;

        loop {
            let token = self.tokens.current()?;

            let response = self.retry.run(self.sleeper.as_ref(), |attempt| {
                debug!(attempt, max_attempts = self.retry.max_attempts(), "sending request");
                self.transport.execute(HttpRequest::json(method, &url, &payload).bearer(&token))
            })?;

            if response.status() != UNAUTHORIZED_STATUS {
                debug!(status = response.status(), "response received");
                return Ok(response);
            }

            if !refresh_allowed {
                warn!("access token rejected and no refresh left");
                return Err(ApiError::AuthRejectedAfterRefresh { path: path.to_string() });
            }

            info!("access token rejected, refreshing");
            refresh_allowed = false;
            self.tokens.obtain(true)?;
        }
    }
}

impl std::fmt::Debug for SfmcClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SfmcClient")
            .field("base_url", &self.base_url)
            .field("tokens", &self.tokens)
            .field("retry", &self.retry)
            .finish_non_exhaustive()
    }
}

/// Builder for [`SfmcClient`]
#[derive(Default)]
pub struct SfmcClientBuilder {
    credentials: Option<Credentials>,
    api_base_url: Option<String>,
    auth_url: Option<String>,
    token_cache: Option<Arc<dyn TokenCache>>,
    token_cache_path: Option<PathBuf>,
    transport: Option<Arc<dyn HttpTransport>>,
    sleeper: Option<Arc<dyn Sleeper>>,
    retry: Option<RetryPolicy>,
    timeout: Option<Duration>,
}

impl SfmcClientBuilder {
    /// Take every setting from `config`. Later builder calls override it.
    pub fn config(mut self, config: ClientConfig) -> Self {
        self.retry = Some(RetryPolicy::from_config(&config.retry));
        self.timeout = config.timeout();
        self.credentials = Some(config.credentials);
        self.api_base_url = Some(config.api_base_url);
        self.auth_url = Some(config.auth_url);
        self.token_cache_path = config.token_cache_path;
        self
    }

    pub fn credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    pub fn api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = Some(url.into());
        self
    }

    pub fn auth_url(mut self, url: impl Into<String>) -> Self {
        self.auth_url = Some(url.into());
        self
    }

    /// File cache at `path`. Ignored when [`Self::token_cache`] is set.
    pub fn token_cache_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.token_cache_path = Some(path.into());
        self
    }

    pub fn token_cache(mut self, cache: Arc<dyn TokenCache>) -> Self {
        self.token_cache = Some(cache);
        self
    }

    /// Transport for both the auth endpoint and the protected API.
    pub fn transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = Some(sleeper);
        self
    }

    pub fn retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry = Some(policy);
        self
    }

    /// Request timeout for the default transport.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Build the client and obtain its first token.
    ///
    /// # Errors
    /// `ApiError::Config` when credentials are missing or the transport
    /// cannot be built; otherwise any error from obtaining the token.
    pub fn build(self) -> Result<SfmcClient, ApiError> {
        let credentials =
            self.credentials.ok_or_else(|| ApiError::Config("credentials not set".to_string()))?;

        let transport = match self.transport {
            Some(transport) => transport,
            None => Arc::new(ReqwestTransport::builder().maybe_timeout(self.timeout).build()?),
        };

        let cache = match (self.token_cache, self.token_cache_path) {
            (Some(cache), _) => cache,
            (None, Some(path)) => Arc::new(FileTokenCache::new(path)),
            (None, None) => Arc::new(FileTokenCache::for_credentials(&credentials)),
        };

        let auth_url = self.auth_url.unwrap_or_else(|| DEFAULT_AUTH_URL.to_string());
        let base_url = self
            .api_base_url
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let requester = TokenRequester::new(auth_url, credentials.clone(), transport.clone());
        let tokens = TokenStore::new(credentials, cache, requester);
        tokens.obtain(false)?;

        Ok(SfmcClient {
            base_url,
            transport,
            tokens,
            retry: self.retry.unwrap_or_default(),
            sleeper: self.sleeper.unwrap_or_else(|| Arc::new(ThreadSleeper)),
        })
    }
}
