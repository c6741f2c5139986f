//! Transport seam between the request engine and the network.
//!
//! The engine only needs one capability: send a request and either get a
//! response back or learn that the exchange never completed. Keeping that
//! behind a trait lets tests script connection failures and status codes
//! without a live server.

use rocketfuel_domain::{AccessToken, ApiResponse, HttpMethod};
use thiserror::Error;

/// Body of an outgoing request.
#[derive(Debug, Clone, Copy)]
pub enum RequestBody<'a> {
    /// Pre-serialized JSON payload.
    Json(&'a [u8]),
    /// `application/x-www-form-urlencoded` fields.
    Form(&'a [(&'a str, &'a str)]),
}

/// A single outgoing request.
#[derive(Debug, Clone, Copy)]
pub struct HttpRequest<'a> {
    pub method: HttpMethod,
    pub url: &'a str,
    pub bearer_token: Option<&'a AccessToken>,
    pub body: RequestBody<'a>,
}

impl<'a> HttpRequest<'a> {
    pub fn json(method: HttpMethod, url: &'a str, payload: &'a [u8]) -> Self {
        Self { method, url, bearer_token: None, body: RequestBody::Json(payload) }
    }

    pub fn form(url: &'a str, fields: &'a [(&'a str, &'a str)]) -> Self {
        Self { method: HttpMethod::Post, url, bearer_token: None, body: RequestBody::Form(fields) }
    }

    #[must_use]
    pub fn bearer(mut self, token: &'a AccessToken) -> Self {
        self.bearer_token = Some(token);
        self
    }
}

/// Failure to obtain any response.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The exchange could not complete (DNS, refused, reset, timeout before a
    /// response). Safe to retry.
    #[error("connection failure: {0}")]
    Connection(String),

    /// Any other transport failure. Not retried.
    #[error("request failure: {0}")]
    Request(String),
}

/// Blocking HTTP capability used by the token requester and the engine.
pub trait HttpTransport: Send + Sync {
    /// Send `request` and return the received status and body.
    ///
    /// # Errors
    /// `TransportError::Connection` when no response was received,
    /// `TransportError::Request` for every other failure.
    fn execute(&self, request: HttpRequest<'_>) -> Result<ApiResponse, TransportError>;
}
