//! Domain types and models

pub mod credentials;
pub mod http;
pub mod messaging;
pub mod row;

pub use credentials::{AccessToken, Credentials};
pub use http::{ApiResponse, HttpMethod};
pub use messaging::{
    ContactAttributes, EmailValidationRequest, RecipientSendResult, SmsSend, SmsSendBuilder,
    TriggeredSendRecipient, TriggeredSendRequest, TriggeredSendResponse,
};
pub use row::{FieldValue, Row};
