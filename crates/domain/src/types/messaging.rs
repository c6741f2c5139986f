//! Request and response bodies for the messaging endpoints

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::constants::DEFAULT_EMAIL_VALIDATOR;

/// Body of an address validation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmailValidationRequest {
    pub email: String,
    pub validators: Vec<String>,
}

impl EmailValidationRequest {
    /// Validation using only the syntax validator.
    pub fn syntax(email: impl Into<String>) -> Self {
        Self { email: email.into(), validators: vec![DEFAULT_EMAIL_VALIDATOR.to_string()] }
    }

    pub fn with_validators(email: impl Into<String>, validators: &[&str]) -> Self {
        Self {
            email: email.into(),
            validators: validators.iter().map(|v| (*v).to_string()).collect(),
        }
    }
}

/// Body of a triggered (transactional) email send.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TriggeredSendRequest {
    #[serde(rename = "To")]
    pub to: TriggeredSendRecipient,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TriggeredSendRecipient {
    #[serde(rename = "Address")]
    pub address: String,
    #[serde(rename = "SubscriberKey")]
    pub subscriber_key: String,
    #[serde(rename = "ContactAttributes")]
    pub contact_attributes: ContactAttributes,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContactAttributes {
    #[serde(rename = "SubscriberAttributes")]
    pub subscriber_attributes: Map<String, Value>,
}

impl TriggeredSendRequest {
    pub fn new(
        subscriber_key: impl Into<String>,
        email_address: impl Into<String>,
        recipient_attributes: Map<String, Value>,
    ) -> Self {
        Self {
            to: TriggeredSendRecipient {
                address: email_address.into(),
                subscriber_key: subscriber_key.into(),
                contact_attributes: ContactAttributes {
                    subscriber_attributes: recipient_attributes,
                },
            },
        }
    }
}

/// Response of a queued triggered send.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TriggeredSendResponse {
    pub request_id: String,
    #[serde(default)]
    pub responses: Vec<RecipientSendResult>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipientSendResult {
    #[serde(default)]
    pub messages: Vec<String>,
    #[serde(default)]
    pub has_errors: bool,
    pub recipient_send_id: Option<String>,
}

impl TriggeredSendResponse {
    pub fn has_errors(&self) -> bool {
        self.responses.iter().any(|r| r.has_errors)
    }
}

/// Body of an SMS contact send.
///
/// `keyword` is always present in the body (as `null` when unset);
/// `messageText` is only included when a message override is given.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SmsSend {
    pub mobile_numbers: Vec<String>,
    pub subscribe: bool,
    pub resubscribe: bool,
    pub keyword: Option<String>,
    #[serde(rename = "override")]
    pub override_: bool,
    #[serde(rename = "messageText", skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl SmsSend {
    pub fn builder<I, S>(mobile_numbers: I) -> SmsSendBuilder
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        SmsSendBuilder {
            inner: SmsSend {
                mobile_numbers: mobile_numbers.into_iter().map(Into::into).collect(),
                subscribe: false,
                resubscribe: false,
                keyword: None,
                override_: false,
                message: None,
            },
        }
    }
}

/// Builder for [`SmsSend`].
#[derive(Debug, Clone)]
pub struct SmsSendBuilder {
    inner: SmsSend,
}

impl SmsSendBuilder {
    #[must_use]
    pub fn message(mut self, text: impl Into<String>) -> Self {
        self.inner.message = Some(text.into());
        self
    }

    #[must_use]
    pub fn keyword(mut self, keyword: impl Into<String>) -> Self {
        self.inner.keyword = Some(keyword.into());
        self
    }

    #[must_use]
    pub fn subscribe(mut self, subscribe: bool) -> Self {
        self.inner.subscribe = subscribe;
        self
    }

    #[must_use]
    pub fn resubscribe(mut self, resubscribe: bool) -> Self {
        self.inner.resubscribe = resubscribe;
        self
    }

    /// Send even if the number is not subscribed to the keyword.
    #[must_use]
    pub fn override_subscription(mut self, enabled: bool) -> Self {
        self.inner.override_ = enabled;
        self
    }

    pub fn build(self) -> SmsSend {
        self.inner
    }
}
