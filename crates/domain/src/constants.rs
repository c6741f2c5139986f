//! Service constants
//!
//! Centralized location for the remote endpoints and defaults used by the
//! client.

// Remote service
pub const DEFAULT_API_BASE_URL: &str = "https://www.exacttargetapis.com";
pub const DEFAULT_AUTH_URL: &str = "https://auth.exacttargetapis.com/v1/requestToken";

// Token cache
pub const TOKEN_CACHE_FILE_PREFIX: &str = "rocket_fuel_access_token";
pub const TOKEN_CACHE_FILE_EXTENSION: &str = "txt";
/// Number of hex characters of the credential hash used in the cache file name
pub const TOKEN_CACHE_HASH_LEN: usize = 16;

// Retry policy for connection-level failures
pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;
pub const DEFAULT_RETRY_DELAY_MS: u64 = 3_000;
pub const DEFAULT_BACKOFF_BASE: f64 = 2.0;
pub const DEFAULT_MAX_BACKOFF_MS: u64 = 60_000;

// Endpoint paths
pub const VALIDATE_EMAIL_PATH: &str = "/address/v1/validateEmail";
pub const DEFAULT_EMAIL_VALIDATOR: &str = "SyntaxValidator";

/// Status the rowset endpoint returns when every row was accepted
pub const UPSERT_SUCCESS_STATUS: u16 = 200;
/// Status the messaging endpoints return once a send is queued
pub const SEND_ACCEPTED_STATUS: u16 = 202;
/// Status the protected API uses for an expired or unknown token
pub const UNAUTHORIZED_STATUS: u16 = 401;

/// Path of the rowset upsert endpoint for a data extension.
pub fn rowset_path(data_extension_key: &str) -> String {
    format!("/hub/v1/dataevents/key:{data_extension_key}/rowset")
}

/// Path of the triggered-send endpoint for a message definition.
pub fn triggered_send_path(triggered_send_key: &str) -> String {
    format!("/messaging/v1/messageDefinitionSends/key:{triggered_send_key}/send")
}

/// Path of the SMS contact-send endpoint for a message.
pub fn sms_send_path(message_key: &str) -> String {
    format!("/sms/v1/messageContact/{message_key}/send")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_paths_embed_keys() {
        assert_eq!(rowset_path("DE1"), "/hub/v1/dataevents/key:DE1/rowset");
        assert_eq!(
            triggered_send_path("welcome"),
            "/messaging/v1/messageDefinitionSends/key:welcome/send"
        );
        assert_eq!(sms_send_path("MSG1"), "/sms/v1/messageContact/MSG1/send");
    }
}
