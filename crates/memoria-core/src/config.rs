//! Client configuration and validation
//!
//! [`ClientOptions`] is the raw, all-optional constructor input. It can be
//! built in code, deserialized from a config file, or read from the
//! environment. [`ClientConfig::from_options`] validates it once and fills in
//! defaults; the result is immutable for the life of the client.

use std::fmt;
use std::time::Duration;

use serde::Deserialize;
use url::Url;

use crate::error::AuthConfigError;
use crate::http::auth::AuthMode;
use crate::http::retry::RetryPolicy;
use crate::{Error, Result};

/// Base URL used when none is configured
pub const DEFAULT_BASE_URL: &str = "https://api.memoria.dev";
/// Per-attempt timeout in milliseconds
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;
/// Retries after the first attempt
pub const DEFAULT_MAX_RETRIES: u32 = 3;
/// Initial backoff delay in milliseconds
pub const DEFAULT_RETRY_DELAY_MS: u64 = 1_000;
/// Backoff ceiling in milliseconds
pub const DEFAULT_MAX_RETRY_DELAY_MS: u64 = 10_000;

/// Environment variable names read by [`ClientOptions::from_env`]
pub mod env {
    pub const API_KEY: &str = "MEMORIA_API_KEY";
    pub const SERVICE_TOKEN: &str = "MEMORIA_SERVICE_TOKEN";
    pub const BASE_URL: &str = "MEMORIA_BASE_URL";
    pub const TIMEOUT_MS: &str = "MEMORIA_TIMEOUT_MS";
    pub const MAX_RETRIES: &str = "MEMORIA_MAX_RETRIES";
    pub const RETRY_DELAY_MS: &str = "MEMORIA_RETRY_DELAY_MS";
    pub const MAX_RETRY_DELAY_MS: &str = "MEMORIA_MAX_RETRY_DELAY_MS";
}

/// Raw client options, all optional
#[derive(Clone, Default, Deserialize)]
#[serde(default)]
pub struct ClientOptions {
    /// Per-user API key
    pub api_key: Option<String>,

    /// Server-to-server service token
    pub service_token: Option<String>,

    /// Service base URL
    pub base_url: Option<String>,

    /// Per-attempt timeout in milliseconds
    pub timeout: Option<u64>,

    /// Retries after the first attempt
    pub max_retries: Option<u32>,

    /// Initial backoff delay in milliseconds
    pub retry_delay: Option<u64>,

    /// Backoff ceiling in milliseconds
    pub max_retry_delay: Option<u64>,
}

impl ClientOptions {
    /// Options authenticating with an API key
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Some(api_key.into()),
            ..Default::default()
        }
    }

    /// Options authenticating with a service token
    pub fn with_service_token(token: impl Into<String>) -> Self {
        Self {
            service_token: Some(token.into()),
            ..Default::default()
        }
    }

    /// Set the base URL
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Set the per-attempt timeout
    pub fn timeout_ms(mut self, millis: u64) -> Self {
        self.timeout = Some(millis);
        self
    }

    /// Set the number of retries after the first attempt
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.max_retries = Some(retries);
        self
    }

    /// Set the initial backoff delay
    pub fn retry_delay_ms(mut self, millis: u64) -> Self {
        self.retry_delay = Some(millis);
        self
    }

    /// Set the backoff ceiling
    pub fn max_retry_delay_ms(mut self, millis: u64) -> Self {
        self.max_retry_delay = Some(millis);
        self
    }

    /// Read options from `MEMORIA_*` environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read options through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            api_key: lookup(env::API_KEY),
            service_token: lookup(env::SERVICE_TOKEN),
            base_url: lookup(env::BASE_URL),
            timeout: parse_var(&lookup, env::TIMEOUT_MS)?,
            max_retries: parse_var(&lookup, env::MAX_RETRIES)?,
            retry_delay: parse_var(&lookup, env::RETRY_DELAY_MS)?,
            max_retry_delay: parse_var(&lookup, env::MAX_RETRY_DELAY_MS)?,
        })
    }
}

fn parse_var<F, T>(lookup: &F, name: &str) -> Result<Option<T>>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(name) {
        None => Ok(None),
        Some(raw) if raw.trim().is_empty() => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| Error::configuration(format!("{} must be a non-negative integer, got {:?}", name, raw))),
    }
}

impl fmt::Debug for ClientOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientOptions")
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .field("service_token", &self.service_token.as_ref().map(|_| "***"))
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("max_retries", &self.max_retries)
            .field("retry_delay", &self.retry_delay)
            .field("max_retry_delay", &self.max_retry_delay)
            .finish()
    }
}

/// The single credential a client authenticates with
#[derive(Clone, PartialEq, Eq)]
pub enum Credential {
    /// Per-user API key
    ApiKey(String),
    /// Server-to-server service token
    ServiceToken(String),
}

impl Credential {
    /// Auth mode implied by this credential
    pub fn mode(&self) -> AuthMode {
        match self {
            Credential::ApiKey(_) => AuthMode::ApiKey,
            Credential::ServiceToken(_) => AuthMode::ServiceToken,
        }
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Credential::ApiKey(_) => f.write_str("ApiKey(***)"),
            Credential::ServiceToken(_) => f.write_str("ServiceToken(***)"),
        }
    }
}

/// Validated, immutable client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    credential: Credential,
    base_url: Url,
    timeout: Duration,
    retry_policy: RetryPolicy,
}

impl ClientConfig {
    /// Validate options and apply defaults
    pub fn from_options(options: ClientOptions) -> Result<Self> {
        let credential = select_credential(options.api_key, options.service_token)?;

        let raw_url = options.base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let base_url = Url::parse(raw_url.trim())
            .map_err(|e| Error::configuration(format!("Invalid base_url {:?}: {}", raw_url, e)))?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(Error::configuration(format!(
                "base_url must use http or https, got {:?}",
                base_url.scheme()
            )));
        }

        let retry_policy = RetryPolicy::new(options.max_retries.unwrap_or(DEFAULT_MAX_RETRIES))
            .with_retry_delay(Duration::from_millis(
                options.retry_delay.unwrap_or(DEFAULT_RETRY_DELAY_MS),
            ))
            .with_max_retry_delay(Duration::from_millis(
                options.max_retry_delay.unwrap_or(DEFAULT_MAX_RETRY_DELAY_MS),
            ));

        Ok(Self {
            credential,
            base_url,
            timeout: Duration::from_millis(options.timeout.unwrap_or(DEFAULT_TIMEOUT_MS)),
            retry_policy,
        })
    }

    /// The configured credential
    pub fn credential(&self) -> &Credential {
        &self.credential
    }

    /// Auth mode fixed at construction
    pub fn auth_mode(&self) -> AuthMode {
        self.credential.mode()
    }

    /// Service base URL
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Per-attempt timeout
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Retry policy derived from the options
    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry_policy
    }
}

impl TryFrom<ClientOptions> for ClientConfig {
    type Error = Error;

    fn try_from(options: ClientOptions) -> Result<Self> {
        Self::from_options(options)
    }
}

fn select_credential(api_key: Option<String>, service_token: Option<String>) -> Result<Credential> {
    let present = |value: Option<String>| value.filter(|v| !v.trim().is_empty());

    match (present(api_key), present(service_token)) {
        (None, None) => Err(AuthConfigError::Missing.into()),
        (Some(_), Some(_)) => Err(AuthConfigError::Conflict.into()),
        (Some(key), None) => Ok(Credential::ApiKey(key)),
        (None, Some(token)) => Ok(Credential::ServiceToken(token)),
    }
}
