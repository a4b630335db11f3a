//! Memoria Core - request execution pipeline for the Memoria memory service
//!
//! This crate provides everything between an endpoint method and the wire:
//! configuration validation, credential selection, request construction,
//! retry with capped exponential backoff, and normalization of every failure
//! into one error shape.
//!
//! # Main Components
//!
//! - **Configuration**: [`ClientOptions`] validated into an immutable [`ClientConfig`]
//! - **Error Handling**: one [`Error`] type built with `thiserror`
//! - **HTTP**: the authenticated executor [`HttpClient`] and its retry policy
//! - **Validation**: argument checks shared by endpoint methods
//!
//! # Example
//!
//! ```no_run
//! use memoria_core::{ApiRequest, ClientOptions, HttpClient, Result};
//!
//! async fn example() -> Result<()> {
//!     let client = HttpClient::from_options(ClientOptions::with_api_key("mk_live_123"))?;
//!     let stats = client
//!         .execute(ApiRequest::get(["v1", "insights", "stats"]))
//!         .await?;
//!     println!("{}", stats);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod http;
pub mod validation;

// Re-export main types for convenience
pub use config::{ClientConfig, ClientOptions, Credential};
pub use error::{AuthConfigError, Error, Result};
pub use http::{
    ApiError, ApiRequest, AuthMode, ErrorClassification, HttpClient, Method, RetryPolicy,
    StatusCode,
};

// Re-export machine codes
pub use error::{
    AUTH_CONFIG_CONFLICT, AUTH_CONFIG_MISSING, CONFIGURATION_ERROR, JSON_ERROR, MISSING_USER_ID,
    VALIDATION_ERROR,
};
pub use http::error::{NO_RESPONSE, REQUEST_SETUP_ERROR};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
