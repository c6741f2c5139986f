use std::time::Duration;

use reqwest::blocking::Client as ReqwestClient;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::Method;
use rocketfuel_domain::{ApiResponse, HttpMethod, RocketFuelError};
use tracing::debug;

use super::transport::{HttpRequest, HttpTransport, RequestBody, TransportError};
use crate::errors::InfraError;

/// Production transport over a blocking reqwest client.
///
/// Connection pooling is left to reqwest; this type adds no retries of its
/// own.
#[derive(Clone)]
pub struct ReqwestTransport {
    client: ReqwestClient,
}

impl ReqwestTransport {
    /// Start building a new transport.
    pub fn builder() -> ReqwestTransportBuilder {
        ReqwestTransportBuilder::default()
    }

    /// Convenience constructor with default configuration.
    pub fn new() -> Result<Self, RocketFuelError> {
        Self::builder().build()
    }
}

impl HttpTransport for ReqwestTransport {
    fn execute(&self, request: HttpRequest<'_>) -> Result<ApiResponse, TransportError> {
        let method = to_reqwest_method(request.method);
        let mut builder = self.client.request(method.clone(), request.url);

        if let Some(token) = request.bearer_token {
            builder = builder.header(AUTHORIZATION, token.bearer_header());
        }

        builder = match request.body {
            RequestBody::Json(payload) => {
                builder.header(CONTENT_TYPE, "application/json").body(payload.to_vec())
            }
            RequestBody::Form(fields) => builder.form(fields),
        };

        debug!(%method, url = %request.url, "sending HTTP request");

        let response = builder.send().map_err(classify_error)?;
        let status = response.status();
        debug!(%method, url = %request.url, %status, "received HTTP response");

        // A status line arrived, so a failed body read is not a connection
        // failure.
        let body = response.bytes().map_err(|err| {
            TransportError::Request(format!("failed to read response body: {}", describe(err)))
        })?;

        Ok(ApiResponse::new(status.as_u16(), body.to_vec()))
    }
}

/// Builder for [`ReqwestTransport`].
#[derive(Debug, Default)]
pub struct ReqwestTransportBuilder {
    timeout: Option<Duration>,
}

impl ReqwestTransportBuilder {
    /// Overall request timeout. Without one the reqwest default applies.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn maybe_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn build(self) -> Result<ReqwestTransport, RocketFuelError> {
        let mut builder = ReqwestClient::builder().no_proxy();

        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder.build().map_err(|err| RocketFuelError::from(InfraError::from(err)))?;

        Ok(ReqwestTransport { client })
    }
}

fn to_reqwest_method(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Post => Method::POST,
        HttpMethod::Put => Method::PUT,
    }
}

fn classify_error(err: reqwest::Error) -> TransportError {
    if is_connection_failure(&err) {
        TransportError::Connection(describe(err))
    } else {
        TransportError::Request(describe(err))
    }
}

fn is_connection_failure(err: &reqwest::Error) -> bool {
    err.is_connect() || err.is_timeout() || err.is_request()
}

fn describe(err: reqwest::Error) -> String {
    RocketFuelError::from(InfraError::from(err)).to_string()
}
