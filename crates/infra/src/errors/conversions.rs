//! Conversions from external infrastructure errors into domain errors.

use std::io::{Error as IoError, ErrorKind};

use reqwest::Error as HttpError;
use rocketfuel_domain::RocketFuelError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub RocketFuelError);

impl From<InfraError> for RocketFuelError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<RocketFuelError> for InfraError {
    fn from(value: RocketFuelError) -> Self {
        InfraError(value)
    }
}

/// Extension trait to make the conversion logic explicit in tests and within
/// this module.
trait IntoRocketFuelError {
    fn into_rocketfuel(self) -> RocketFuelError;
}

/* -------------------------------------------------------------------------- */
/* std::io::Error → RocketFuelError */
/* -------------------------------------------------------------------------- */

impl IntoRocketFuelError for IoError {
    fn into_rocketfuel(self) -> RocketFuelError {
        match self.kind() {
            ErrorKind::NotFound => RocketFuelError::Storage(format!("file not found: {self}")),
            ErrorKind::PermissionDenied => {
                RocketFuelError::Storage(format!("permission denied: {self}"))
            }
            ErrorKind::InvalidData => {
                RocketFuelError::Storage(format!("file is not valid UTF-8: {self}"))
            }
            _ => RocketFuelError::Storage(self.to_string()),
        }
    }
}

impl From<IoError> for InfraError {
    fn from(value: IoError) -> Self {
        InfraError(value.into_rocketfuel())
    }
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → RocketFuelError */
/* -------------------------------------------------------------------------- */

impl IntoRocketFuelError for HttpError {
    fn into_rocketfuel(self) -> RocketFuelError {
        if self.is_timeout() {
            return RocketFuelError::Network("HTTP request timed out".into());
        }

        if self.is_connect() {
            return RocketFuelError::Network(format!("HTTP connection failure: {self}"));
        }

        if self.is_builder() {
            return RocketFuelError::Config(format!("invalid HTTP request: {self}"));
        }

        RocketFuelError::Network(self.to_string())
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_rocketfuel())
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */
