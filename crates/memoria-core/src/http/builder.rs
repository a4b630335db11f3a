//! HTTP request construction
//!
//! Endpoint methods describe a call with an [`ApiRequest`]; the
//! [`RequestBuilder`] turns it into a `reqwest::Request` against the
//! configured base URL with auth and JSON headers applied.

use std::sync::Arc;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE, USER_AGENT};
use reqwest::{Client as ReqwestClient, Method, Url};
use serde::Serialize;
use serde_json::Value;

use crate::http::auth::AuthHandler;
use crate::http::error::RequestFailure;
use crate::validation::is_dot_segment;
use crate::{Error, Result};

const JSON_MIME: &str = "application/json";
const CLIENT_USER_AGENT: &str = concat!("memoria-rust/", env!("CARGO_PKG_VERSION"));

/// Description of one API call, independent of transport
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    method: Method,
    segments: Vec<String>,
    query: Vec<(String, String)>,
    body: Option<Value>,
}

impl ApiRequest {
    /// Create a request for the given path segments
    ///
    /// Segments are percent-encoded individually, so ids may contain `/`.
    pub fn new<I, S>(method: Method, segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            method,
            segments: segments.into_iter().map(Into::into).collect(),
            query: Vec::new(),
            body: None,
        }
    }

    /// Shorthand for a `GET` request
    pub fn get<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(Method::GET, segments)
    }

    /// Shorthand for a `POST` request
    pub fn post<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(Method::POST, segments)
    }

    /// Shorthand for a `PATCH` request
    pub fn patch<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(Method::PATCH, segments)
    }

    /// Shorthand for a `DELETE` request
    pub fn delete<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(Method::DELETE, segments)
    }

    /// Append a query parameter
    pub fn query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    /// Append a query parameter when a value is present
    pub fn query_opt<V: ToString>(self, key: impl Into<String>, value: Option<V>) -> Self {
        match value {
            Some(value) => self.query(key, value),
            None => self,
        }
    }

    /// Attach a JSON body
    ///
    /// Serialization failures are returned as [`Error::Json`](crate::Error::Json)
    /// before any request is attempted.
    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self> {
        self.body = Some(serde_json::to_value(body)?);
        Ok(self)
    }

    /// HTTP method
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Path relative to the base URL, unencoded, for logging
    pub fn path(&self) -> String {
        format!("/{}", self.segments.join("/"))
    }

    /// Query parameters in insertion order
    pub fn query_params(&self) -> &[(String, String)] {
        &self.query
    }

    /// JSON body, if any
    pub fn body(&self) -> Option<&Value> {
        self.body.as_ref()
    }
}

/// Builds transport requests from [`ApiRequest`]s
#[derive(Clone)]
pub struct RequestBuilder {
    base_url: Url,
    auth_handler: Arc<dyn AuthHandler>,
}

impl RequestBuilder {
    /// Create a builder for the given base URL and credential
    pub fn new(base_url: Url, auth_handler: Arc<dyn AuthHandler>) -> Self {
        Self { base_url, auth_handler }
    }

    /// Build a request for one attempt
    pub fn build_request(
        &self,
        client: &ReqwestClient,
        request: &ApiRequest,
    ) -> std::result::Result<reqwest::Request, RequestFailure> {
        let url = self.build_url(request)?;
        let headers = self.build_headers(request)?;

        let mut builder = client.request(request.method.clone(), url).headers(headers);

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }

        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        builder.build().map_err(RequestFailure::from_transport)
    }

    /// Join the base URL with the request's path segments
    pub fn build_url(&self, request: &ApiRequest) -> std::result::Result<Url, RequestFailure> {
        if let Some(segment) = request.segments.iter().find(|s| is_dot_segment(s)) {
            return Err(RequestFailure::Other(Error::validation(
                "path",
                format!("Path segment {:?} would be resolved as a relative path", segment),
            )));
        }

        let mut url = self.base_url.clone();
        {
            let mut path = url.path_segments_mut().map_err(|_| RequestFailure::Setup {
                reason: format!("Base URL {} cannot carry a path", self.base_url),
            })?;
            path.pop_if_empty().extend(&request.segments);
        }
        Ok(url)
    }

    fn build_headers(&self, request: &ApiRequest) -> std::result::Result<HeaderMap, RequestFailure> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(JSON_MIME));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(JSON_MIME));
        headers.insert(USER_AGENT, HeaderValue::from_static(CLIENT_USER_AGENT));

        // The credential value never goes into the message
        self.auth_handler
            .apply_auth(&mut headers)
            .map_err(|_| RequestFailure::Setup {
                reason: format!(
                    "Failed to build {} {}: invalid {} header value",
                    request.method,
                    request.path(),
                    self.auth_handler.mode().header_name()
                ),
            })?;

        Ok(headers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::auth::{ApiKeyAuth, ServiceTokenAuth, API_KEY_HEADER, SERVICE_TOKEN_HEADER};
    use crate::http::error::REQUEST_SETUP_ERROR;
    use serde_json::json;

    fn builder(base: &str) -> RequestBuilder {
        RequestBuilder::new(Url::parse(base).unwrap(), Arc::new(ApiKeyAuth::new("test-key")))
    }

    #[test]
    fn test_url_building() {
        let request = ApiRequest::get(["v1", "memories"]);

        let url = builder("https://api.example.com").build_url(&request).unwrap();
        assert_eq!(url.as_str(), "https://api.example.com/v1/memories");

        let url = builder("http://localhost:8080/api/").build_url(&request).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/api/v1/memories");

        let url = builder("http://localhost:8080/api").build_url(&request).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/api/v1/memories");
    }

    #[test]
    fn test_segments_are_encoded() {
        let request = ApiRequest::get(["v1", "memories", "a/b c"]);
        let url = builder("https://api.example.com").build_url(&request).unwrap();
        assert_eq!(url.as_str(), "https://api.example.com/v1/memories/a%2Fb%20c");
        assert_eq!(request.path(), "/v1/memories/a/b c");
    }

    #[test]
    fn test_dot_segments_are_rejected() {
        let builder = builder("https://api.example.com");

        for id in [".", "..", "%2e%2E"] {
            let failure = builder
                .build_url(&ApiRequest::delete(["v1", "memories", id]))
                .unwrap_err();
            assert!(!failure.is_retryable());

            let err = crate::http::error::normalize(failure);
            assert_eq!(err.code(), Some(crate::error::VALIDATION_ERROR), "{}", id);
        }

        let url = builder
            .build_url(&ApiRequest::get(["v1", "memories", "v1.2"]))
            .unwrap();
        assert_eq!(url.as_str(), "https://api.example.com/v1/memories/v1.2");
    }

    #[test]
    fn test_build_request_headers_and_body() {
        let client = ReqwestClient::new();
        let request = ApiRequest::post(["v1", "memories"])
            .json(&json!({"text": "hello", "user_id": "u-1"}))
            .unwrap();

        let built = builder("https://api.example.com")
            .build_request(&client, &request)
            .unwrap();

        assert_eq!(built.method(), Method::POST);
        assert_eq!(built.headers().get(API_KEY_HEADER).unwrap(), "test-key");
        assert_eq!(built.headers().get(CONTENT_TYPE).unwrap(), JSON_MIME);
        assert!(built.headers().get(SERVICE_TOKEN_HEADER).is_none());

        let body = built.body().and_then(|b| b.as_bytes()).unwrap();
        let decoded: Value = serde_json::from_slice(body).unwrap();
        assert_eq!(decoded, json!({"text": "hello", "user_id": "u-1"}));
    }

    #[test]
    fn test_query_parameters() {
        let client = ReqwestClient::new();
        let request = ApiRequest::get(["v1", "memories"])
            .query("limit", 20)
            .query_opt("user_id", Some("u 1"))
            .query_opt::<String>("tag", None);

        assert_eq!(request.query_params().len(), 2);

        let built = builder("https://api.example.com")
            .build_request(&client, &request)
            .unwrap();
        assert_eq!(built.url().query(), Some("limit=20&user_id=u+1"));
    }

    #[test]
    fn test_invalid_credential_is_setup_failure() {
        let client = ReqwestClient::new();
        let builder = RequestBuilder::new(
            Url::parse("https://api.example.com").unwrap(),
            Arc::new(ServiceTokenAuth::new("line\nbreak-secret")),
        );

        let failure = builder
            .build_request(&client, &ApiRequest::get(["v1", "goals"]))
            .unwrap_err();

        let err = crate::http::error::normalize(failure);
        assert_eq!(err.code(), Some(REQUEST_SETUP_ERROR));
        assert!(err.message().contains(SERVICE_TOKEN_HEADER));
        assert!(!err.message().contains("break-secret"));
    }
}
