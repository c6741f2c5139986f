//! Example: validating an address against the live API
//!
//! # Setup
//!
//! 1. Provide credentials, either as environment variables: ```bash export
//!    ROCKETFUEL_CLIENT_ID=... export ROCKETFUEL_CLIENT_SECRET=... ``` or in
//!    a `rocketfuel.toml` / `rocketfuel.json` next to the working directory.
//!
//! 2. Run this example: ```bash cargo run --example validate_email --
//!    someone@example.com ```
//!
//! Set `RUST_LOG=rocketfuel_infra=debug` to see every attempt.

use rocketfuel_infra::config;
use rocketfuel_infra::observability::{init_logging, DEFAULT_LOG_DIRECTIVE};
use rocketfuel_infra::SfmcClient;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging(DEFAULT_LOG_DIRECTIVE);

    let email = std::env::args().nth(1).ok_or("usage: validate_email <address>")?;

    let config = config::load()?;
    let client = SfmcClient::from_config(config)?;

    let valid = client.validate_email(&email)?;
    tracing::info!(%email, valid, "address checked");

    println!("{email}: {}", if valid { "valid" } else { "invalid" });
    Ok(())
}
