//! # Rocket Fuel Domain
//!
//! Domain types for the Marketing Cloud REST client.
//!
//! This crate contains:
//! - Domain error types and Result definitions
//! - Configuration structures
//! - Credentials, bearer tokens, request verbs and raw responses
//! - Data extension rows and messaging request bodies
//! - Service constants and endpoint paths
//!
//! ## Architecture
//! - No dependencies on other Rocket Fuel crates
//! - No I/O: transports, caches and the request engine live in
//!   `rocketfuel-infra`

pub mod config;
pub mod constants;
pub mod errors;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
