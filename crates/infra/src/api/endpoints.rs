//! Endpoint calls on top of the request engine.
//!
//! Each method shapes a body, sends it with [`SfmcClient::call`] and reads
//! the one thing the caller cares about from the response.

use rocketfuel_domain::constants::{
    rowset_path, sms_send_path, triggered_send_path, SEND_ACCEPTED_STATUS, UPSERT_SUCCESS_STATUS,
    VALIDATE_EMAIL_PATH,
};
use rocketfuel_domain::{
    EmailValidationRequest, HttpMethod, Row, SmsSend, TriggeredSendRequest,
};
use serde_json::{Map, Value};
use tracing::{debug, instrument};

use super::client::SfmcClient;
use super::errors::ApiError;

impl SfmcClient {
    /// Check an address with the syntax validator.
    ///
    /// # Errors
    /// Engine errors, or `ApiError::UnexpectedResponse` when the response
    /// has no boolean `valid` field.
    pub fn validate_email(&self, email: &str) -> Result<bool, ApiError> {
        self.send_email_validation(&EmailValidationRequest::syntax(email))
    }

    /// Check an address with the named validators, e.g. `SyntaxValidator`,
    /// `MXValidator`, `ListDetectiveValidator`.
    ///
    /// # Errors
    /// Same as [`SfmcClient::validate_email`].
    pub fn validate_email_with(&self, email: &str, validators: &[&str]) -> Result<bool, ApiError> {
        self.send_email_validation(&EmailValidationRequest::with_validators(email, validators))
    }

    fn send_email_validation(&self, request: &EmailValidationRequest) -> Result<bool, ApiError> {
        let response = self.call(VALIDATE_EMAIL_PATH, request, HttpMethod::Post)?;

        let body: Value = serde_json::from_slice(response.body()).map_err(|err| {
            ApiError::UnexpectedResponse(format!(
                "validateEmail returned status {} with a non-JSON body: {err}",
                response.status()
            ))
        })?;

        body.get("valid").and_then(Value::as_bool).ok_or_else(|| {
            ApiError::UnexpectedResponse(format!(
                "validateEmail response (status {}) has no boolean `valid` field",
                response.status()
            ))
        })
    }

    /// Insert or update rows of a data extension, matched on `pk_fields`.
    ///
    /// Returns `true` only for a 200 response.
    ///
    /// # Errors
    /// `ApiError::InvalidInput` if a row lacks one of `pk_fields` (nothing is
    /// sent in that case), otherwise engine errors.
    #[instrument(skip(self, pk_fields, rows), fields(rows = rows.len()))]
    pub fn upsert_data_extension_rows(
        &self,
        data_extension_key: &str,
        pk_fields: &[&str],
        rows: &[Row],
    ) -> Result<bool, ApiError> {
        let body = rowset_body(pk_fields, rows)?;
        let response =
            self.call(&rowset_path(data_extension_key), &body, HttpMethod::Post)?;

        debug!(status = response.status(), "rowset upsert answered");
        Ok(response.status() == UPSERT_SUCCESS_STATUS)
    }

    /// Single-row form of [`SfmcClient::upsert_data_extension_rows`].
    ///
    /// # Errors
    /// Same as [`SfmcClient::upsert_data_extension_rows`].
    pub fn upsert_data_extension_row(
        &self,
        data_extension_key: &str,
        pk_fields: &[&str],
        row: &Row,
    ) -> Result<bool, ApiError> {
        self.upsert_data_extension_rows(data_extension_key, pk_fields, std::slice::from_ref(row))
    }

    /// Queue a triggered email to one recipient.
    ///
    /// Returns `true` only for a 202 response. The body can be parsed into a
    /// [`rocketfuel_domain::TriggeredSendResponse`] by callers that need the
    /// per-recipient result.
    ///
    /// # Errors
    /// Engine errors.
    #[instrument(skip(self, email_address, recipient_attributes))]
    pub fn trigger_send(
        &self,
        triggered_send_key: &str,
        subscriber_key: &str,
        email_address: &str,
        recipient_attributes: Map<String, Value>,
    ) -> Result<bool, ApiError> {
        let body = TriggeredSendRequest::new(subscriber_key, email_address, recipient_attributes);
        let response =
            self.call(&triggered_send_path(triggered_send_key), &body, HttpMethod::Post)?;

        Ok(response.status() == SEND_ACCEPTED_STATUS)
    }

    /// Send an SMS message definition to the given numbers.
    ///
    /// Returns `true` only for a 202 response.
    ///
    /// # Errors
    /// Engine errors.
    #[instrument(skip(self, send), fields(recipients = send.mobile_numbers.len()))]
    pub fn send_sms(&self, message_key: &str, send: &SmsSend) -> Result<bool, ApiError> {
        let response = self.call(&sms_send_path(message_key), send, HttpMethod::Post)?;
        Ok(response.status() == SEND_ACCEPTED_STATUS)
    }
}

/// `[{"keys": {pk: value, ..}, "values": row}, ..]`
fn rowset_body(pk_fields: &[&str], rows: &[Row]) -> Result<Vec<Value>, ApiError> {
    rows.iter()
        .enumerate()
        .map(|(index, row)| {
            let mut keys = Map::new();
            for field in pk_fields {
                let value = row.get(field).ok_or_else(|| {
                    ApiError::InvalidInput(format!(
                        "row {index} is missing primary key field `{field}`"
                    ))
                })?;
                keys.insert((*field).to_string(), value.to_json());
            }

            let mut entry = Map::new();
            entry.insert("keys".into(), Value::Object(keys));
            entry.insert("values".into(), Value::Object(row.to_json()));
            Ok(Value::Object(entry))
        })
        .collect()
}
