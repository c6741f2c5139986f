//! Scripted transport and sleeper for engine and endpoint tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use rocketfuel_domain::{ApiResponse, Credentials, HttpMethod};

use super::client::SfmcClient;
use crate::auth::{MemoryTokenCache, TokenCache};
use crate::http::{HttpRequest, HttpTransport, RequestBody, RetryPolicy, Sleeper, TransportError};

pub const AUTH_URL: &str = "https://auth.test/v1/requestToken";
pub const BASE_URL: &str = "https://api.test";

#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: HttpMethod,
    pub url: String,
    pub bearer: Option<String>,
    pub json: Option<serde_json::Value>,
}

/// Answers the auth URL with `T1`, `T2`, ... and every other URL from a
/// scripted queue (200 `{}` once the queue is empty).
#[derive(Default)]
pub struct FakeTransport {
    auth_calls: AtomicUsize,
    replies: Mutex<VecDeque<Result<ApiResponse, TransportError>>>,
    requests: Mutex<Vec<Recorded>>,
}

impl FakeTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn push(&self, reply: Result<ApiResponse, TransportError>) {
        self.replies.lock().push_back(reply);
    }

    pub fn push_status(&self, status: u16, body: &str) {
        self.push(Ok(ApiResponse::new(status, body.as_bytes().to_vec())));
    }

    pub fn auth_calls(&self) -> usize {
        self.auth_calls.load(Ordering::SeqCst)
    }

    /// Requests sent to the protected API, in order.
    pub fn api_requests(&self) -> Vec<Recorded> {
        self.requests.lock().clone()
    }
}

impl HttpTransport for FakeTransport {
    fn execute(&self, request: HttpRequest<'_>) -> Result<ApiResponse, TransportError> {
        if request.url == AUTH_URL {
            let n = self.auth_calls.fetch_add(1, Ordering::SeqCst) + 1;
            return Ok(ApiResponse::new(200, format!(r#"{{"accessToken":"T{n}"}}"#)));
        }

        let json = match request.body {
            RequestBody::Json(payload) => serde_json::from_slice(payload).ok(),
            RequestBody::Form(_) => None,
        };
        self.requests.lock().push(Recorded {
            method: request.method,
            url: request.url.to_string(),
            bearer: request.bearer_token.map(|t| t.as_str().to_string()),
            json,
        });

        self.replies
            .lock()
            .pop_front()
            .unwrap_or_else(|| Ok(ApiResponse::new(200, b"{}".to_vec())))
    }
}

#[derive(Default)]
pub struct RecordingSleeper {
    pub slept: Mutex<Vec<Duration>>,
}

impl Sleeper for RecordingSleeper {
    fn sleep(&self, duration: Duration) {
        self.slept.lock().push(duration);
    }
}

pub struct Harness {
    pub client: SfmcClient,
    pub transport: Arc<FakeTransport>,
    pub cache: Arc<MemoryTokenCache>,
    pub sleeper: Arc<RecordingSleeper>,
}

/// Client over a fake transport with an empty in-memory cache.
pub fn harness() -> Harness {
    harness_with_cache(Arc::new(MemoryTokenCache::new()))
}

pub fn harness_with_cache(cache: Arc<MemoryTokenCache>) -> Harness {
    let transport = FakeTransport::new();
    let sleeper = Arc::new(RecordingSleeper::default());
    let client = SfmcClient::builder()
        .credentials(Credentials::new("abc", "xyz"))
        .api_base_url(BASE_URL)
        .auth_url(AUTH_URL)
        .transport(transport.clone())
        .token_cache(cache.clone() as Arc<dyn TokenCache>)
        .sleeper(sleeper.clone())
        .retry_policy(RetryPolicy::default())
        .build()
        .unwrap();

    Harness { client, transport, cache, sleeper }
}
