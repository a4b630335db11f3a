//! HTTP layer for the Memoria API
//!
//! This module provides:
//! - Request building with credential headers
//! - Error classification and normalization
//! - Retry logic with capped exponential backoff
//! - The authenticated request executor used by every endpoint

pub mod auth;
pub mod builder;
pub mod client;
pub mod error;
pub mod retry;

pub use auth::{AuthHandler, AuthMode, API_KEY_HEADER, SERVICE_TOKEN_HEADER};
pub use builder::{ApiRequest, RequestBuilder};
pub use client::HttpClient;
pub use error::{normalize, ApiError, ErrorClassification, RequestFailure};
pub use retry::{execute_with_retry, RetryDecision, RetryHandler, RetryPolicy};

// Re-export commonly used types
pub use reqwest::{Method, StatusCode};
