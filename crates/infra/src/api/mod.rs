//! Marketing Cloud REST client
//!
//! [`SfmcClient`] owns the token store and sends every request through one
//! engine: connection retry first, then at most one forced token refresh on
//! a 401. The endpoint methods (`validate_email`, `upsert_data_extension_rows`,
//! `trigger_send`, `send_sms`) only shape bodies and read results.

pub mod client;
mod endpoints;
pub mod errors;
#[cfg(test)]
mod test_support;

pub use client::{SfmcClient, SfmcClientBuilder};
pub use errors::{ApiError, ApiErrorCategory};
