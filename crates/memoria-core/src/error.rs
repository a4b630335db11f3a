//! Error types for the Memoria core library
//!
//! Every failure the client can produce, local or remote, surfaces as one
//! [`Error`]. Whatever the variant, callers can read the same four fields
//! through [`Error::message`], [`Error::status_code`], [`Error::code`] and
//! [`Error::details`].

use serde_json::Value;
use thiserror::Error;

use crate::http::error::ApiError;

/// Machine code for a client constructed without any credential
pub const AUTH_CONFIG_MISSING: &str = "AUTH_CONFIG_MISSING";
/// Machine code for a client constructed with both credentials
pub const AUTH_CONFIG_CONFLICT: &str = "AUTH_CONFIG_CONFLICT";
/// Machine code for any other invalid client option
pub const CONFIGURATION_ERROR: &str = "CONFIGURATION_ERROR";
/// Machine code for a rejected method argument
pub const VALIDATION_ERROR: &str = "VALIDATION_ERROR";
/// Machine code for a subject-scoped call made without a user id
pub const MISSING_USER_ID: &str = "MISSING_USER_ID";
/// Machine code for a body that could not be encoded or decoded
pub const JSON_ERROR: &str = "JSON_ERROR";

/// Why the credential options were rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthConfigError {
    /// Neither `api_key` nor `service_token` was supplied
    #[error("either api_key or service_token must be provided")]
    Missing,
    /// Both `api_key` and `service_token` were supplied
    #[error("api_key and service_token are mutually exclusive, provide only one")]
    Conflict,
}

impl AuthConfigError {
    /// Machine-readable code for this condition
    pub fn code(&self) -> &'static str {
        match self {
            AuthConfigError::Missing => AUTH_CONFIG_MISSING,
            AuthConfigError::Conflict => AUTH_CONFIG_CONFLICT,
        }
    }
}

/// Main error type for Memoria operations
#[derive(Error, Debug)]
pub enum Error {
    /// Credential options were missing or conflicting
    #[error("Authentication configuration error: {0}")]
    AuthConfig(AuthConfigError),

    /// Any other invalid constructor option
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// A method argument failed local validation
    #[error("Validation error: {field} - {message}")]
    Validation { field: String, message: String },

    /// Service-token auth requires a user id for subject-scoped calls
    #[error("user_id is required when authenticating with a service token")]
    MissingSubjectId,

    /// Normalized failure of a request to the service
    #[error(transparent)]
    Api(ApiError),

    /// A request body could not be encoded, or a response body decoded
    #[error("JSON error: {message}")]
    Json {
        message: String,
        status_code: Option<u16>,
        #[source]
        source: serde_json::Error,
    },
}

/// Convenience type alias for Results using our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Build a validation error for `field`
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Build a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Error::Configuration {
            message: message.into(),
        }
    }

    /// Human-readable message
    pub fn message(&self) -> String {
        match self {
            Error::Api(api) => api.message.clone(),
            other => other.to_string(),
        }
    }

    /// HTTP status, when the failure came from a server response
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Error::Api(api) => api.status_code,
            Error::Json { status_code, .. } => *status_code,
            _ => None,
        }
    }

    /// Machine-readable code
    pub fn code(&self) -> Option<&str> {
        match self {
            Error::AuthConfig(kind) => Some(kind.code()),
            Error::Configuration { .. } => Some(CONFIGURATION_ERROR),
            Error::Validation { .. } => Some(VALIDATION_ERROR),
            Error::MissingSubjectId => Some(MISSING_USER_ID),
            Error::Api(api) => api.code.as_deref(),
            Error::Json { .. } => Some(JSON_ERROR),
        }
    }

    /// Opaque server-provided diagnostics
    pub fn details(&self) -> Option<&Value> {
        match self {
            Error::Api(api) => api.details.as_ref(),
            _ => None,
        }
    }

    /// The normalized API error, if this failure reached the network layer
    pub fn as_api_error(&self) -> Option<&ApiError> {
        match self {
            Error::Api(api) => Some(api),
            _ => None,
        }
    }

    /// True for failures raised before any request was attempted
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            Error::AuthConfig(_)
                | Error::Configuration { .. }
                | Error::Validation { .. }
                | Error::MissingSubjectId
        )
    }
}

impl From<AuthConfigError> for Error {
    fn from(err: AuthConfigError) -> Self {
        Error::AuthConfig(err)
    }
}

impl From<ApiError> for Error {
    fn from(err: ApiError) -> Self {
        Error::Api(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json {
            message: err.to_string(),
            status_code: None,
            source: err,
        }
    }
}
