//! Tracking statements the agent is unsure about

use memoria_core::validation::{
    optional_min, require_non_blank, require_path_id, require_unit_interval,
};
use memoria_core::{ApiRequest, HttpClient, Result};
use serde::Serialize;
use serde_json::Value;

use crate::types::UncertaintyOptions;

#[derive(Serialize)]
struct RecordBody<'a> {
    statement: &'a str,
    confidence: f64,
    #[serde(flatten)]
    options: &'a UncertaintyOptions,
}

#[derive(Serialize)]
struct ResolveBody<'a> {
    resolution: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    user_id: Option<&'a str>,
}

/// Uncertainty operations, see [`MemoryClient::uncertainty`](crate::MemoryClient::uncertainty)
#[derive(Debug, Clone, Copy)]
pub struct UncertaintyClient<'a> {
    http: &'a HttpClient,
}

impl<'a> UncertaintyClient<'a> {
    pub(crate) fn new(http: &'a HttpClient) -> Self {
        Self { http }
    }

    /// Record a statement with the confidence held in it, in `[0, 1]`
    pub async fn record(&self, statement: &str, confidence: f64, options: UncertaintyOptions) -> Result<Value> {
        require_non_blank("statement", statement)?;
        require_unit_interval("confidence", confidence)?;
        self.http.require_subject_id(options.user_id.as_deref())?;

        let request = ApiRequest::post(["v1", "uncertainty"]).json(&RecordBody {
            statement,
            confidence,
            options: &options,
        })?;
        self.http.execute(request).await
    }

    /// Open uncertainties, most recent first
    pub async fn list(&self, user_id: Option<&str>, limit: Option<u32>) -> Result<Value> {
        optional_min("limit", limit, 1)?;
        self.http.require_subject_id(user_id)?;

        let request = ApiRequest::get(["v1", "uncertainty"])
            .query_opt("user_id", user_id)
            .query_opt("limit", limit);
        self.http.execute(request).await
    }

    /// Close an uncertainty with what turned out to be true
    pub async fn resolve(&self, uncertainty_id: &str, resolution: &str, user_id: Option<&str>) -> Result<Value> {
        require_path_id("uncertainty_id", uncertainty_id)?;
        require_non_blank("resolution", resolution)?;
        self.http.require_subject_id(user_id)?;

        let request = ApiRequest::post(["v1", "uncertainty", uncertainty_id, "resolve"])
            .json(&ResolveBody { resolution, user_id })?;
        self.http.execute(request).await
    }
}
