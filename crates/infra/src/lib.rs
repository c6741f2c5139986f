//! # Rocket Fuel Infrastructure
//!
//! Blocking client for the Marketing Cloud REST API.
//!
//! This crate contains:
//! - The authenticated request engine and endpoint calls (`api`)
//! - Token acquisition and the on-disk token cache (`auth`)
//! - The reqwest transport and connection retry (`http`)
//! - Configuration loading from env or file (`config`)
//! - Logging setup (`observability`)
//!
//! ## Architecture
//! - Data types and the domain error live in `rocketfuel-domain`
//! - All I/O (network, filesystem) lives here, behind the `HttpTransport`,
//!   `TokenCache` and `Sleeper` traits

pub mod api;
pub mod auth;
pub mod config;
pub mod errors;
pub mod http;
pub mod observability;

// Re-export commonly used items
pub use api::{ApiError, ApiErrorCategory, SfmcClient, SfmcClientBuilder};
pub use auth::{default_token_cache_path, FileTokenCache, MemoryTokenCache, TokenCache};
pub use errors::InfraError;
pub use http::{HttpTransport, ReqwestTransport, RetryPolicy};
