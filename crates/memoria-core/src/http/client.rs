//! Authenticated request executor
//!
//! [`HttpClient`] owns the validated configuration and a pooled transport.
//! Every endpoint call goes through [`HttpClient::execute`], which applies
//! auth, retries transient failures and normalizes the final error.

use std::sync::Arc;

use reqwest::Client as ReqwestClient;
use serde_json::Value;

use crate::config::{ClientConfig, ClientOptions};
use crate::http::auth::{self, create_auth_handler, AuthHandler, AuthMode};
use crate::http::builder::{ApiRequest, RequestBuilder};
use crate::http::error::RequestFailure;
use crate::http::retry::execute_with_retry;
use crate::{Error, Result};

/// HTTP client for the Memoria API
///
/// Cheap to clone; clones share the connection pool and configuration.
#[derive(Clone)]
pub struct HttpClient {
    /// Underlying reqwest client
    client: ReqwestClient,
    /// Request builder for constructing requests
    request_builder: RequestBuilder,
    /// Validated configuration
    config: Arc<ClientConfig>,
}

impl HttpClient {
    /// Create a client from validated configuration
    pub fn new(config: ClientConfig) -> Result<Self> {
        let client = ReqwestClient::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| Error::configuration(format!("Failed to create HTTP client: {}", e)))?;

        let auth_handler: Arc<dyn AuthHandler> = Arc::from(create_auth_handler(config.credential()));
        let request_builder = RequestBuilder::new(config.base_url().clone(), auth_handler);

        tracing::debug!(
            base_url = %config.base_url(),
            auth_mode = ?config.auth_mode(),
            max_retries = config.retry_policy().max_retries,
            "Memoria HTTP client created"
        );

        Ok(Self {
            client,
            request_builder,
            config: Arc::new(config),
        })
    }

    /// Validate raw options and create a client
    pub fn from_options(options: ClientOptions) -> Result<Self> {
        Self::new(ClientConfig::from_options(options)?)
    }

    /// Configuration this client was built with
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Auth mode fixed at construction
    pub fn auth_mode(&self) -> AuthMode {
        self.config.auth_mode()
    }

    /// Check that a subject-scoped call names a user when the auth mode needs one
    pub fn require_subject_id(&self, user_id: Option<&str>) -> Result<()> {
        auth::require_subject_id(self.auth_mode(), user_id)
    }

    /// Execute a request with retry and error normalization
    ///
    /// Returns the decoded JSON body, or `Value::Null` for an empty body.
    pub async fn execute(&self, request: ApiRequest) -> Result<Value> {
        tracing::debug!(method = %request.method(), path = %request.path(), "Executing request");

        execute_with_retry(self.config.retry_policy(), || self.execute_once(&request)).await
    }

    /// One network attempt
    async fn execute_once(&self, request: &ApiRequest) -> std::result::Result<Value, RequestFailure> {
        let http_request = self.request_builder.build_request(&self.client, request)?;

        let response = self
            .client
            .execute(http_request)
            .await
            .map_err(RequestFailure::from_transport)?;

        let status = response.status();
        tracing::debug!(
            method = %request.method(),
            path = %request.path(),
            status = status.as_u16(),
            "Received response"
        );
        let body = response.text().await;

        // Once a status arrived it alone decides retryability; an unreadable
        // error body falls back to the generic message
        if !status.is_success() {
            return Err(RequestFailure::Response {
                status,
                body: body.unwrap_or_default(),
            });
        }

        let body = body.map_err(RequestFailure::from_transport)?;

        if body.trim().is_empty() {
            return Ok(Value::Null);
        }

        serde_json::from_str(&body).map_err(|e| {
            RequestFailure::Other(Error::Json {
                message: format!("Failed to decode response body: {}", e),
                status_code: Some(status.as_u16()),
                source: e,
            })
        })
    }
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
