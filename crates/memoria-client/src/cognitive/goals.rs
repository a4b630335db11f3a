//! Goal tracking

use memoria_core::validation::{
    optional_unit_interval, require_non_blank, require_path_id, require_unit_interval,
};
use memoria_core::{ApiRequest, HttpClient, Result};
use serde::Serialize;
use serde_json::Value;

use super::SubjectBody;
use crate::types::{GoalFilter, GoalOptions};

#[derive(Serialize)]
struct CreateGoalBody<'a> {
    title: &'a str,
    #[serde(flatten)]
    options: &'a GoalOptions,
}

#[derive(Serialize)]
struct ProgressBody<'a> {
    progress: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    user_id: Option<&'a str>,
}

/// Goal operations, see [`MemoryClient::goals`](crate::MemoryClient::goals)
#[derive(Debug, Clone, Copy)]
pub struct GoalsClient<'a> {
    http: &'a HttpClient,
}

impl<'a> GoalsClient<'a> {
    pub(crate) fn new(http: &'a HttpClient) -> Self {
        Self { http }
    }

    /// Create a goal for a user
    pub async fn create(&self, title: &str, options: GoalOptions) -> Result<Value> {
        require_non_blank("title", title)?;
        optional_unit_interval("priority", options.priority)?;
        self.http.require_subject_id(options.user_id.as_deref())?;

        let request = ApiRequest::post(["v1", "goals"]).json(&CreateGoalBody {
            title,
            options: &options,
        })?;
        self.http.execute(request).await
    }

    /// Goals for a user, optionally filtered by status
    pub async fn list(&self, filter: GoalFilter) -> Result<Value> {
        self.http.require_subject_id(filter.user_id.as_deref())?;

        let request = ApiRequest::get(["v1", "goals"])
            .query_opt("user_id", filter.user_id)
            .query_opt("status", filter.status);
        self.http.execute(request).await
    }

    /// Record progress as a fraction in `[0, 1]`
    pub async fn update_progress(&self, goal_id: &str, progress: f64, user_id: Option<&str>) -> Result<Value> {
        require_path_id("goal_id", goal_id)?;
        require_unit_interval("progress", progress)?;
        self.http.require_subject_id(user_id)?;

        let request = ApiRequest::patch(["v1", "goals", goal_id]).json(&ProgressBody { progress, user_id })?;
        self.http.execute(request).await
    }

    /// Mark a goal as completed
    pub async fn complete(&self, goal_id: &str, user_id: Option<&str>) -> Result<Value> {
        require_path_id("goal_id", goal_id)?;
        self.http.require_subject_id(user_id)?;

        let request = ApiRequest::post(["v1", "goals", goal_id, "complete"]).json(&SubjectBody { user_id })?;
        self.http.execute(request).await
    }
}
