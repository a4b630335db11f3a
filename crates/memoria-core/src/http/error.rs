//! HTTP failure classification and normalization
//!
//! Every request attempt that does not succeed produces a [`RequestFailure`].
//! The retry engine classifies it, and once a failure is terminal
//! [`normalize`] turns it into the crate [`Error`](crate::Error).

use std::fmt;
use std::ops::RangeInclusive;

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Status the service uses for rate limiting; always retried
pub const RATE_LIMIT_STATUS: u16 = 429;

/// Server statuses treated as transient and retried
pub const RETRYABLE_SERVER_STATUSES: RangeInclusive<u16> = 500..=504;

/// Sentinel code for a request that was sent but never answered
pub const NO_RESPONSE: &str = "NO_RESPONSE";

/// Sentinel code for a request that could not be built or dispatched
pub const REQUEST_SETUP_ERROR: &str = "REQUEST_SETUP_ERROR";

/// Classification of request failures for retry logic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorClassification {
    /// 4xx other than auth and rate limiting - should not retry
    ClientError,
    /// 401/403 - should not retry
    AuthenticationError,
    /// 429 - should retry with backoff
    RateLimited,
    /// 500..=504 - should retry
    TransientServerError,
    /// Request sent, nothing came back (timeout, refused, reset) - should retry
    NoResponse,
    /// Request never left the client - should not retry
    RequestSetup,
    /// Any other status - default to no retry
    Unknown,
}

impl ErrorClassification {
    /// Check if this failure type should be retried
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ErrorClassification::RateLimited
                | ErrorClassification::TransientServerError
                | ErrorClassification::NoResponse
        )
    }

    /// Classify an HTTP status code
    pub fn from_status(status: u16) -> Self {
        match status {
            RATE_LIMIT_STATUS => ErrorClassification::RateLimited,
            s if RETRYABLE_SERVER_STATUSES.contains(&s) => ErrorClassification::TransientServerError,
            401 | 403 => ErrorClassification::AuthenticationError,
            400..=499 => ErrorClassification::ClientError,
            _ => ErrorClassification::Unknown,
        }
    }
}

/// Normalized error for a failed call to the service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiError {
    /// Human-readable error message
    pub message: String,
    /// HTTP status code if a response was received
    pub status_code: Option<u16>,
    /// Machine-readable code from the server, or a client sentinel
    pub code: Option<String>,
    /// Server-provided diagnostics, passed through verbatim
    pub details: Option<Value>,
    /// How the failure was classified for retry purposes
    pub classification: ErrorClassification,
}

impl ApiError {
    /// Build the error for a non-success response body
    pub fn from_response(status: StatusCode, body: &str) -> Self {
        let status_code = status.as_u16();
        let parsed = serde_json::from_str::<Value>(body).ok();

        let (message, code, details) = match &parsed {
            Some(json) if json.is_object() => {
                let (message, nested_code) = Self::extract_error(json);
                let code = json
                    .get("code")
                    .and_then(Self::code_string)
                    .or(nested_code);
                (message, code, json.get("details").cloned())
            }
            Some(json) => (None, None, Some(json.clone())),
            None if body.trim().is_empty() => (None, None, None),
            None => (None, None, Some(Value::String(body.to_string()))),
        };

        Self {
            message: message.unwrap_or_else(|| Self::generic_message(status_code)),
            status_code: Some(status_code),
            code,
            details,
            classification: ErrorClassification::from_status(status_code),
        }
    }

    /// Build the error for a request that got no response
    pub fn no_response(reason: impl Into<String>) -> Self {
        Self {
            message: reason.into(),
            status_code: None,
            code: Some(NO_RESPONSE.to_string()),
            details: None,
            classification: ErrorClassification::NoResponse,
        }
    }

    /// Build the error for a request that could not be set up
    pub fn request_setup(reason: impl Into<String>) -> Self {
        Self {
            message: reason.into(),
            status_code: None,
            code: Some(REQUEST_SETUP_ERROR.to_string()),
            details: None,
            classification: ErrorClassification::RequestSetup,
        }
    }

    /// Message used when the body carries no `error` field
    fn generic_message(status: u16) -> String {
        format!("Request failed with status code {}", status)
    }

    /// Read the `error` field, either a string or an object with `message`
    fn extract_error(json: &Value) -> (Option<String>, Option<String>) {
        match json.get("error") {
            Some(Value::String(message)) => (Some(message.clone()), None),
            Some(Value::Object(inner)) => {
                let message = inner
                    .get("message")
                    .and_then(|m| m.as_str())
                    .map(|s| s.to_string());
                let code = inner.get("code").and_then(Self::code_string);
                (message, code)
            }
            _ => (None, None),
        }
    }

    fn code_string(value: &Value) -> Option<String> {
        match value {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    /// Check if this error should trigger a retry
    pub fn should_retry(&self) -> bool {
        self.classification.is_retryable()
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status_code {
            Some(status) => write!(f, "API error [{}]: {}", status, self.message),
            None => write!(f, "API error: {}", self.message),
        }
    }
}

impl std::error::Error for ApiError {}

/// Raw outcome of one failed request attempt
#[derive(Debug)]
pub enum RequestFailure {
    /// The server answered with a non-success status
    Response { status: StatusCode, body: String },
    /// The request was dispatched but no response arrived
    NoResponse { reason: String },
    /// The request could not be constructed or dispatched
    Setup { reason: String },
    /// Anything else; surfaced to the caller unchanged
    Other(crate::Error),
}

impl RequestFailure {
    /// Map a transport error from reqwest
    ///
    /// Builder errors happen before dispatch. Everything else reqwest reports
    /// from `send` means the request went out without a usable response.
    pub fn from_transport(error: reqwest::Error) -> Self {
        let target = error
            .url()
            .map(|u| format!("{}{}", u.origin().ascii_serialization(), u.path()))
            .unwrap_or_else(|| "the server".to_string());

        if error.is_builder() {
            return RequestFailure::Setup {
                reason: format!("Failed to build request for {}", target),
            };
        }

        let cause = if error.is_timeout() {
            "request timed out"
        } else if error.is_connect() {
            "connection failed"
        } else if error.is_body() || error.is_decode() {
            "response body could not be read"
        } else {
            "transport error"
        };

        RequestFailure::NoResponse {
            reason: format!("No response received from {} ({})", target, cause),
        }
    }

    /// Retry classification for this failure
    pub fn classification(&self) -> ErrorClassification {
        match self {
            RequestFailure::Response { status, .. } => ErrorClassification::from_status(status.as_u16()),
            RequestFailure::NoResponse { .. } => ErrorClassification::NoResponse,
            RequestFailure::Setup { .. } => ErrorClassification::RequestSetup,
            RequestFailure::Other(_) => ErrorClassification::Unknown,
        }
    }

    /// Check if this failure may be retried
    pub fn is_retryable(&self) -> bool {
        match self {
            RequestFailure::Other(_) => false,
            failure => failure.classification().is_retryable(),
        }
    }

    /// HTTP status if the server answered
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            RequestFailure::Response { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl fmt::Display for RequestFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestFailure::Response { status, .. } => write!(f, "HTTP {}", status.as_u16()),
            RequestFailure::NoResponse { reason } => write!(f, "{}", reason),
            RequestFailure::Setup { reason } => write!(f, "{}", reason),
            RequestFailure::Other(err) => write!(f, "{}", err),
        }
    }
}

impl From<crate::Error> for RequestFailure {
    fn from(err: crate::Error) -> Self {
        RequestFailure::Other(err)
    }
}

/// Turn a terminal failure into the error returned to callers
pub fn normalize(failure: RequestFailure) -> crate::Error {
    match failure {
        RequestFailure::Response { status, body } => ApiError::from_response(status, &body).into(),
        RequestFailure::NoResponse { reason } => ApiError::no_response(reason).into(),
        RequestFailure::Setup { reason } => ApiError::request_setup(reason).into(),
        RequestFailure::Other(err) => err,
    }
}
