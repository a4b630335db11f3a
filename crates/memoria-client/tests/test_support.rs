//! Shared test support utilities for integration tests

#![allow(dead_code)]

use memoria_client::{ClientOptions, MemoryClient};
use wiremock::MockServer;

pub const API_KEY: &str = "test-api-key";
pub const SERVICE_TOKEN: &str = "test-service-token";

/// Client authenticating with an API key against the mock server
pub fn api_key_client(server: &MockServer) -> MemoryClient {
    MemoryClient::new(fast_retries(ClientOptions::with_api_key(API_KEY), server)).expect("client")
}

/// Client authenticating with a service token against the mock server
pub fn service_client(server: &MockServer) -> MemoryClient {
    MemoryClient::new(fast_retries(ClientOptions::with_service_token(SERVICE_TOKEN), server))
        .expect("client")
}

fn fast_retries(options: ClientOptions, server: &MockServer) -> ClientOptions {
    options
        .base_url(server.uri())
        .max_retries(2)
        .retry_delay_ms(5)
        .max_retry_delay_ms(20)
}

/// Number of requests the mock server has seen
pub async fn request_count(server: &MockServer) -> usize {
    server.received_requests().await.unwrap_or_default().len()
}

/// JSON body of the `index`-th received request
pub async fn request_body(server: &MockServer, index: usize) -> serde_json::Value {
    let requests = server.received_requests().await.unwrap_or_default();
    serde_json::from_slice(&requests[index].body).expect("json body")
}
