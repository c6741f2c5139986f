//! Client-credentials exchange against the auth endpoint.

use std::sync::Arc;

use rocketfuel_domain::{AccessToken, Credentials};
use serde::Deserialize;
use tracing::debug;

use crate::api::errors::ApiError;
use crate::http::{HttpRequest, HttpTransport};

#[derive(Debug, Deserialize)]
struct TokenResponse {
    #[serde(rename = "accessToken")]
    access_token: Option<serde_json::Value>,
}

/// Requests new access tokens. A single attempt per call; failures are not
/// retried here.
#[derive(Clone)]
pub struct TokenRequester {
    auth_url: String,
    credentials: Credentials,
    transport: Arc<dyn HttpTransport>,
}

impl TokenRequester {
    pub fn new(
        auth_url: impl Into<String>,
        credentials: Credentials,
        transport: Arc<dyn HttpTransport>,
    ) -> Self {
        Self { auth_url: auth_url.into(), credentials, transport }
    }

    pub fn auth_url(&self) -> &str {
        &self.auth_url
    }

    /// Exchange the client credentials for a new token.
    ///
    /// # Errors
    /// `ApiError::CredentialAcquisition` for any transport failure, a
    /// non-JSON body, or a missing, non-string or empty `accessToken`.
    pub fn request(&self) -> Result<AccessToken, ApiError> {
        let fields = [
            ("clientId", self.credentials.client_id.as_str()),
            ("clientSecret", self.credentials.client_secret.as_str()),
        ];

        debug!(auth_url = %self.auth_url, "requesting access token");

        let response = self
            .transport
            .execute(HttpRequest::form(&self.auth_url, &fields))
            .map_err(|err| ApiError::CredentialAcquisition(err.to_string()))?;

        let parsed: TokenResponse = serde_json::from_slice(response.body()).map_err(|err| {
            ApiError::CredentialAcquisition(format!(
                "auth endpoint returned status {} with a non-JSON body: {err}",
                response.status()
            ))
        })?;

        match parsed.access_token {
            Some(serde_json::Value::String(token)) if !token.is_empty() => {
                Ok(AccessToken::new(token))
            }
            Some(serde_json::Value::String(_)) => Err(ApiError::CredentialAcquisition(
                "auth endpoint returned an empty accessToken".into(),
            )),
            Some(_) => Err(ApiError::CredentialAcquisition(
                "accessToken in auth response is not a string".into(),
            )),
            None => Err(ApiError::CredentialAcquisition(format!(
                "auth response (status {}) has no accessToken",
                response.status()
            ))),
        }
    }
}
