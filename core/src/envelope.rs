//! Decoding of the response envelope shared by every open platform api.

use bytes::Bytes;
use log::debug;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::value::RawValue;

use crate::utils::null_as_default;
use crate::{Error, ErrorDetail, ErrorResponse, Result};

/// Envelope code the platform uses for success.
pub const SUCCESS_CODE: &str = "0";

/// Envelope wraps every response of the open platform.
///
/// ```json
/// {"code":"0","data":{...},"request_id":"0ba2887315178178017221014"}
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Envelope {
    /// `"0"` on success.
    #[serde(default)]
    pub code: String,
    /// Payload of the call, kept undecoded until the caller picks a type.
    #[serde(default)]
    pub data: Option<Box<RawValue>>,
    /// Request id assigned by the platform.
    #[serde(default)]
    pub request_id: String,
    /// Error type, only set on failure.
    #[serde(default, rename = "type")]
    pub kind: String,
    /// Error message, only set on failure.
    #[serde(default)]
    pub message: String,
    /// Field level error details, only set on validation failures.
    #[serde(default, deserialize_with = "null_as_default")]
    pub detail: Vec<ErrorDetail>,
}

impl Envelope {
    /// Check if the envelope reports success.
    pub fn is_success(&self) -> bool {
        self.code == SUCCESS_CODE
    }

    /// Decode `data` into `T`.
    ///
    /// A missing, empty or `null` data field means "no data" and returns
    /// `Ok(None)`.
    pub fn decode_data<T: DeserializeOwned>(&self) -> Result<Option<T>> {
        let Some(raw) = &self.data else {
            return Ok(None);
        };
        let raw = raw.get().trim();
        if raw.is_empty() || raw == "null" {
            return Ok(None);
        }

        serde_json::from_str(raw).map(Some).map_err(|e| {
            Error::malformed_response("unable to decode envelope data")
                .with_source(e)
                .with_context(format!("request_id: {}", self.request_id))
        })
    }

    fn into_error_response(self, status: http::StatusCode) -> ErrorResponse {
        ErrorResponse {
            status: Some(status),
            code: self.code,
            kind: self.kind,
            message: self.message,
            request_id: self.request_id,
            detail: self.detail,
        }
    }
}

/// Validate a raw response and decode its envelope.
///
/// - Non-2xx status returns [`crate::ErrorKind::Status`] with whatever error
///   fields could be parsed from the body.
/// - A body that is not an envelope returns [`crate::ErrorKind::MalformedResponse`].
/// - An envelope whose code isn't `"0"` returns [`crate::ErrorKind::Api`].
///
/// On success the envelope is returned together with the untouched body, so
/// endpoints that don't nest their payload under `data` can decode it
/// themselves.
pub fn check_response(resp: http::Response<Bytes>) -> Result<(Envelope, Bytes)> {
    let (parts, body) = resp.into_parts();
    let status = parts.status;

    if !status.is_success() {
        debug!("open platform responded with status {status}");
        let mut err_resp: ErrorResponse = serde_json::from_slice(&body).unwrap_or_default();
        err_resp.status = Some(status);
        return Err(Error::status(err_resp));
    }

    let envelope: Envelope = serde_json::from_slice(&body).map_err(|e| {
        Error::malformed_response("unable to decode response envelope")
            .with_source(e)
            .with_context(format!("response_length: {}", body.len()))
    })?;

    if !envelope.is_success() {
        debug!(
            "open platform returned code {} for request {}",
            envelope.code, envelope.request_id
        );
        return Err(Error::api(envelope.into_error_response(status)));
    }

    Ok((envelope, body))
}
