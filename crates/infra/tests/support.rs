use std::net::TcpListener;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use rocketfuel_domain::Credentials;
use rocketfuel_infra::http::Sleeper;
use rocketfuel_infra::SfmcClientBuilder;
use rocketfuel_infra::SfmcClient;
use wiremock::matchers::{body_string, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const CLIENT_ID: &str = "abc";
pub const CLIENT_SECRET: &str = "xyz";
pub const TOKEN_PATH: &str = "/v1/requestToken";

/// The blocking reqwest client owns a runtime of its own, so clients must be
/// created, used and dropped off the async worker threads.
pub async fn run_blocking<T, F>(f: F) -> T
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f).await.expect("blocking task panicked")
}

/// Answer the token endpoint with `token`, at most `times` times when given.
pub async fn mount_token(server: &MockServer, token: &str, times: Option<u64>) {
    let mock = Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .and(body_string(format!("clientId={CLIENT_ID}&clientSecret={CLIENT_SECRET}")))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"accessToken": token, "expiresIn": 3600})),
        );

    match times {
        Some(n) => mock.up_to_n_times(n).mount(server).await,
        None => mock.mount(server).await,
    }
}

/// Builder wired to `server` for both auth and API calls, with no sleeping
/// between attempts.
pub fn builder_for(server_uri: &str, sleeper: Arc<RecordingSleeper>) -> SfmcClientBuilder {
    SfmcClient::builder()
        .credentials(Credentials::new(CLIENT_ID, CLIENT_SECRET))
        .api_base_url(server_uri)
        .auth_url(format!("{server_uri}{TOKEN_PATH}"))
        .sleeper(sleeper)
        .timeout(Duration::from_secs(5))
}

/// A local URL nothing is listening on.
pub fn refused_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);
    format!("http://{addr}")
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
