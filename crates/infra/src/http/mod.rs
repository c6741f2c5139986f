//! Blocking HTTP transport and connection retry.

mod client;
pub mod retry;
mod transport;

pub use client::{ReqwestTransport, ReqwestTransportBuilder};
pub use retry::{BackoffStrategy, RetryError, RetryPolicy, Sleeper, ThreadSleeper};
pub use transport::{HttpRequest, HttpTransport, RequestBody, TransportError};
