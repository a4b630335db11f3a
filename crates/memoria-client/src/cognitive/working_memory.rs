//! Working memory: a small, decaying set of items the agent is attending to

use memoria_core::validation::{optional_unit_interval, require_non_blank, require_path_id};
use memoria_core::{ApiRequest, HttpClient, Result};
use serde::Serialize;
use serde_json::Value;

use super::SubjectBody;
use crate::types::WorkingMemoryOptions;

#[derive(Serialize)]
struct AddBody<'a> {
    content: &'a str,
    #[serde(flatten)]
    options: &'a WorkingMemoryOptions,
}

/// Working-memory operations, see [`MemoryClient::working_memory`](crate::MemoryClient::working_memory)
#[derive(Debug, Clone, Copy)]
pub struct WorkingMemoryClient<'a> {
    http: &'a HttpClient,
}

impl<'a> WorkingMemoryClient<'a> {
    pub(crate) fn new(http: &'a HttpClient) -> Self {
        Self { http }
    }

    /// Put an item into working memory
    pub async fn add(&self, content: &str, options: WorkingMemoryOptions) -> Result<Value> {
        require_non_blank("content", content)?;
        optional_unit_interval("priority", options.priority)?;
        self.http.require_subject_id(options.user_id.as_deref())?;

        let request = ApiRequest::post(["v1", "working-memory"]).json(&AddBody {
            content,
            options: &options,
        })?;
        self.http.execute(request).await
    }

    /// Current working-memory contents
    pub async fn get(&self, user_id: Option<&str>) -> Result<Value> {
        self.http.require_subject_id(user_id)?;
        self.http
            .execute(ApiRequest::get(["v1", "working-memory"]).query_opt("user_id", user_id))
            .await
    }

    /// Drop every item
    pub async fn clear(&self, user_id: Option<&str>) -> Result<Value> {
        self.http.require_subject_id(user_id)?;
        self.http
            .execute(ApiRequest::delete(["v1", "working-memory"]).query_opt("user_id", user_id))
            .await
    }

    /// Move attention onto one item
    pub async fn focus(&self, item_id: &str, user_id: Option<&str>) -> Result<Value> {
        require_path_id("item_id", item_id)?;
        self.http.require_subject_id(user_id)?;

        let request =
            ApiRequest::post(["v1", "working-memory", item_id, "focus"]).json(&SubjectBody { user_id })?;
        self.http.execute(request).await
    }
}
