use std::fmt;

use http::StatusCode;
use serde::Deserialize;
use thiserror::Error;

use crate::utils::null_as_default;

/// The error type for lazop operations
#[derive(Error, Debug)]
#[error("{}", self.render())]
pub struct Error {
    kind: ErrorKind,
    message: String,
    #[source]
    source: Option<anyhow::Error>,
    context: Vec<String>,
    response: Option<Box<ErrorResponse>>,
}

/// The kind of error that occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorKind {
    /// Request cannot be built (malformed url, payload serialization failed, etc.)
    RequestInvalid,

    /// Configuration error (missing app key or secret, unknown region)
    ConfigInvalid,

    /// The operation requires a client bound to an access token.
    TokenRequired,

    /// Sending the request failed before any response was obtained.
    Transport,

    /// The response body is not a well-formed envelope, or its data
    /// doesn't match the expected shape.
    MalformedResponse,

    /// The platform answered with a non-2xx http status.
    Status,

    /// The platform answered with an envelope whose code is not `"0"`.
    Api,

    /// Unexpected errors.
    Unexpected,
}

impl Error {
    /// Create a new error with the given kind and message
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
            context: Vec::new(),
            response: None,
        }
    }

    /// Add a source error
    pub fn with_source(mut self, source: impl Into<anyhow::Error>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Append a line of context, like `uri: https://...`.
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context.push(context.into());
        self
    }

    /// Attach the structured error response decoded from the platform.
    pub fn with_response(mut self, response: ErrorResponse) -> Self {
        self.response = Some(Box::new(response));
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the context lines attached to this error.
    pub fn context(&self) -> &[String] {
        &self.context
    }

    /// Get the structured error response returned by the platform, if any.
    ///
    /// Only errors of kind [`ErrorKind::Api`] and [`ErrorKind::Status`] carry one.
    pub fn response(&self) -> Option<&ErrorResponse> {
        self.response.as_deref()
    }

    fn render(&self) -> String {
        let mut s = self.message.clone();
        if let Some(resp) = &self.response {
            s.push_str(": ");
            s.push_str(&resp.to_string());
        }
        for ctx in &self.context {
            s.push_str(", ");
            s.push_str(ctx);
        }
        s
    }
}

// Convenience constructors
impl Error {
    /// Create a request invalid error
    pub fn request_invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::RequestInvalid, message)
    }

    /// Create a config invalid error
    pub fn config_invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ConfigInvalid, message)
    }

    /// Create a token required error
    pub fn token_required() -> Self {
        Self::new(
            ErrorKind::TokenRequired,
            "an access token is required for this api call",
        )
    }

    /// Create a transport error
    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Transport, message)
    }

    /// Create a malformed response error
    pub fn malformed_response(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::MalformedResponse, message)
    }

    /// Create an error for a non-2xx http status.
    pub fn status(response: ErrorResponse) -> Self {
        let message = match response.status {
            Some(status) => format!("unexpected http status {status}"),
            None => "unexpected http status".to_string(),
        };
        Self::new(ErrorKind::Status, message).with_response(response)
    }

    /// Create an error for an envelope that carries a failure code.
    pub fn api(response: ErrorResponse) -> Self {
        Self::new(ErrorKind::Api, "open platform returned an error").with_response(response)
    }

    /// Create an unexpected error
    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unexpected, message)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::RequestInvalid => write!(f, "invalid request"),
            ErrorKind::ConfigInvalid => write!(f, "invalid configuration"),
            ErrorKind::TokenRequired => write!(f, "access token required"),
            ErrorKind::Transport => write!(f, "transport failure"),
            ErrorKind::MalformedResponse => write!(f, "malformed response"),
            ErrorKind::Status => write!(f, "unexpected http status"),
            ErrorKind::Api => write!(f, "api error"),
            ErrorKind::Unexpected => write!(f, "unexpected error"),
        }
    }
}

/// Convenience type alias for Results
pub type Result<T> = std::result::Result<T, Error>;

/// ErrorResponse carries everything the platform told us about a failed call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ErrorResponse {
    /// Http status of the response, if known.
    #[serde(skip)]
    pub status: Option<StatusCode>,
    /// Platform error code, e.g. `IllegalAccessToken`.
    pub code: String,
    /// Error type, e.g. `ISV` or `SYSTEM`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Human readable message.
    pub message: String,
    /// Request id assigned by the platform.
    pub request_id: String,
    /// Field level details for validation failures.
    #[serde(deserialize_with = "null_as_default")]
    pub detail: Vec<ErrorDetail>,
}

/// ErrorDetail is a single field level failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ErrorDetail {
    /// Name of the offending field.
    pub field: String,
    /// What is wrong with it.
    pub message: String,
}

impl fmt::Display for ErrorResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.code, self.kind, self.message)?;
        if !self.request_id.is_empty() {
            write!(f, " (request_id: {})", self.request_id)?;
        }
        for d in &self.detail {
            write!(f, "\nField: {}, Message: {}", d.field, d.message)?;
        }
        Ok(())
    }
}

// Common From implementations
impl From<http::Error> for Error {
    fn from(err: http::Error) -> Self {
        Self::request_invalid(err.to_string()).with_source(anyhow::Error::from(err))
    }
}

impl From<http::uri::InvalidUri> for Error {
    fn from(err: http::uri::InvalidUri) -> Self {
        Self::request_invalid(err.to_string()).with_source(anyhow::Error::from(err))
    }
}

impl From<http::uri::InvalidUriParts> for Error {
    fn from(err: http::uri::InvalidUriParts) -> Self {
        Self::request_invalid(err.to_string()).with_source(anyhow::Error::from(err))
    }
}

impl From<http::header::InvalidHeaderValue> for Error {
    fn from(err: http::header::InvalidHeaderValue) -> Self {
        Self::request_invalid(err.to_string()).with_source(anyhow::Error::from(err))
    }
}
