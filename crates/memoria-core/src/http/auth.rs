//! Authentication handling for the Memoria service
//!
//! Two mutually exclusive schemes are supported:
//! - Per-user API keys sent in `X-API-Key`
//! - Server-to-server service tokens sent in `X-Service-Token`, which act on
//!   behalf of any user and therefore need an explicit user id per call

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, InvalidHeaderValue};

use crate::config::Credential;
use crate::{Error, Result};

/// Header carrying a per-user API key
pub const API_KEY_HEADER: &str = "X-API-Key";

/// Header carrying a service token
pub const SERVICE_TOKEN_HEADER: &str = "X-Service-Token";

/// Which credential the client authenticates with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuthMode {
    /// Per-user API key
    ApiKey,
    /// Server-to-server service token
    ServiceToken,
}

impl AuthMode {
    /// Name of the header this mode writes
    pub fn header_name(&self) -> &'static str {
        match self {
            AuthMode::ApiKey => API_KEY_HEADER,
            AuthMode::ServiceToken => SERVICE_TOKEN_HEADER,
        }
    }

    /// Whether subject-scoped calls must name a user explicitly
    pub fn requires_subject_id(&self) -> bool {
        matches!(self, AuthMode::ServiceToken)
    }
}

/// Fail fast when a subject-scoped call lacks the user id its auth mode needs
///
/// Under API-key auth the key already identifies the user, so this is a no-op.
pub fn require_subject_id(mode: AuthMode, provided: Option<&str>) -> Result<()> {
    if !mode.requires_subject_id() {
        return Ok(());
    }

    match provided {
        Some(id) if !id.trim().is_empty() => Ok(()),
        _ => Err(Error::MissingSubjectId),
    }
}

/// Trait for applying the configured credential to outgoing requests
pub trait AuthHandler: Send + Sync {
    /// Auth mode implemented by this handler
    fn mode(&self) -> AuthMode;

    /// Apply authentication to request headers
    fn apply_auth(&self, headers: &mut HeaderMap) -> std::result::Result<(), InvalidHeaderValue>;
}

/// `X-API-Key` authentication
#[derive(Clone)]
pub struct ApiKeyAuth {
    api_key: String,
}

impl ApiKeyAuth {
    /// Create with explicit API key
    pub fn new(api_key: impl Into<String>) -> Self {
        Self { api_key: api_key.into() }
    }
}

impl AuthHandler for ApiKeyAuth {
    fn mode(&self) -> AuthMode {
        AuthMode::ApiKey
    }

    fn apply_auth(&self, headers: &mut HeaderMap) -> std::result::Result<(), InvalidHeaderValue> {
        insert_secret(headers, HeaderName::from_static("x-api-key"), &self.api_key)
    }
}

/// `X-Service-Token` authentication
#[derive(Clone)]
pub struct ServiceTokenAuth {
    token: String,
}

impl ServiceTokenAuth {
    /// Create with explicit service token
    pub fn new(token: impl Into<String>) -> Self {
        Self { token: token.into() }
    }
}

impl AuthHandler for ServiceTokenAuth {
    fn mode(&self) -> AuthMode {
        AuthMode::ServiceToken
    }

    fn apply_auth(&self, headers: &mut HeaderMap) -> std::result::Result<(), InvalidHeaderValue> {
        insert_secret(headers, HeaderName::from_static("x-service-token"), &self.token)
    }
}

fn insert_secret(
    headers: &mut HeaderMap,
    name: HeaderName,
    secret: &str,
) -> std::result::Result<(), InvalidHeaderValue> {
    let mut value = HeaderValue::from_str(secret)?;
    value.set_sensitive(true);
    headers.insert(name, value);
    Ok(())
}

/// Create the handler matching a validated credential
pub fn create_auth_handler(credential: &Credential) -> Box<dyn AuthHandler> {
    match credential {
        Credential::ApiKey(key) => Box::new(ApiKeyAuth::new(key.clone())),
        Credential::ServiceToken(token) => Box::new(ServiceTokenAuth::new(token.clone())),
    }
}
