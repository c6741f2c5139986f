//! Access token acquisition and persistence.

pub mod cache;
mod requester;
mod store;

pub use cache::{default_token_cache_path, FileTokenCache, MemoryTokenCache, TokenCache};
pub use requester::TokenRequester;
pub use store::TokenStore;
