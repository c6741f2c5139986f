//! API-specific error types
//!
//! Provides error classification for client operations.

use rocketfuel_domain::RocketFuelError;
use thiserror::Error;

use crate::http::{RetryError, TransportError};

/// Categories of API errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiErrorCategory {
    /// Token could not be obtained or was rejected after a refresh
    Authentication,
    /// Connection or transport failures
    Network,
    /// Token cache read/write failures
    Storage,
    /// Caller input or response shape problems
    Client,
    /// Configuration errors
    Config,
}

/// Client operation errors
#[derive(Debug, Error)]
pub enum ApiError {
    /// The auth endpoint failed or returned no usable `accessToken`.
    #[error("Credential acquisition failed: {0}")]
    CredentialAcquisition(String),

    /// Every attempt ended in a connection-level failure.
    #[error("Connection failed after {attempts} attempts: {last_error}")]
    ConnectionExhausted { attempts: u32, last_error: String },

    /// The protected API answered 401 and no refresh was left to try.
    #[error("Request to {path} was rejected with 401 and no further token refresh is allowed")]
    AuthRejectedAfterRefresh { path: String },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Token cache error: {0}")]
    TokenCache(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    /// The response body did not have the expected shape.
    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ApiError {
    /// Get the error category for this error
    pub fn category(&self) -> ApiErrorCategory {
        match self {
            Self::CredentialAcquisition(_) | Self::AuthRejectedAfterRefresh { .. } => {
                ApiErrorCategory::Authentication
            }
            Self::ConnectionExhausted { .. } | Self::Transport(_) => ApiErrorCategory::Network,
            Self::TokenCache(_) => ApiErrorCategory::Storage,
            Self::Serialization(_) | Self::UnexpectedResponse(_) | Self::InvalidInput(_) => {
                ApiErrorCategory::Client
            }
            Self::Config(_) => ApiErrorCategory::Config,
        }
    }
}

impl From<RetryError> for ApiError {
    fn from(err: RetryError) -> Self {
        match err {
            RetryError::AttemptsExhausted { attempts, last_error } => {
                Self::ConnectionExhausted { attempts, last_error }
            }
            RetryError::NonRetryable { source } => Self::from(source),
        }
    }
}

impl From<TransportError> for ApiError {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::Connection(message) | TransportError::Request(message) => {
                Self::Transport(message)
            }
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Convert from the domain error to ApiError
impl From<RocketFuelError> for ApiError {
    fn from(err: RocketFuelError) -> Self {
        match err {
            RocketFuelError::Config(msg) => Self::Config(msg),
            RocketFuelError::Network(msg) => Self::Transport(msg),
            RocketFuelError::Auth(msg) => Self::CredentialAcquisition(msg),
            RocketFuelError::Storage(msg) => Self::TokenCache(msg),
            RocketFuelError::Serialization(msg) => Self::Serialization(msg),
            RocketFuelError::InvalidInput(msg) => Self::InvalidInput(msg),
            RocketFuelError::Internal(msg) => Self::UnexpectedResponse(msg),
        }
    }
}

impl From<ApiError> for RocketFuelError {
    fn from(err: ApiError) -> Self {
        let message = err.to_string();
        match err.category() {
            ApiErrorCategory::Authentication => Self::Auth(message),
            ApiErrorCategory::Network => Self::Network(message),
            ApiErrorCategory::Storage => Self::Storage(message),
            ApiErrorCategory::Client => match err {
                ApiError::Serialization(_) => Self::Serialization(message),
                ApiError::InvalidInput(_) => Self::InvalidInput(message),
                _ => Self::Internal(message),
            },
            ApiErrorCategory::Config => Self::Config(message),
        }
    }
}
