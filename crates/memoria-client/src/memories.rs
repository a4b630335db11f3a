//! Memory record endpoints

use memoria_core::validation::{optional_min, optional_unit_interval, require_non_blank, require_path_id};
use memoria_core::{ApiRequest, Result};
use serde::Serialize;
use serde_json::Value;
use tracing::instrument;

use crate::types::{
    query_timestamp, CreateMemoryOptions, ListMemoriesOptions, PredictOptions, SearchOptions,
    SuggestOptions, UpdateMemoryOptions, WeightedSearchOptions,
};
use crate::MemoryClient;

const MEMORIES: [&str; 2] = ["v1", "memories"];

#[derive(Serialize)]
struct TextBody<'a, T: Serialize> {
    text: &'a str,
    #[serde(flatten)]
    options: &'a T,
}

#[derive(Serialize)]
struct QueryBody<'a, T: Serialize> {
    query: &'a str,
    #[serde(flatten)]
    options: &'a T,
}

#[derive(Serialize)]
struct ContextBody<'a, T: Serialize> {
    context: &'a str,
    #[serde(flatten)]
    options: &'a T,
}

fn memory_path(id: &str) -> [&str; 3] {
    ["v1", "memories", id]
}

impl MemoryClient {
    /// Store a new memory
    #[instrument(skip_all)]
    pub async fn create_memory(&self, text: &str, options: CreateMemoryOptions) -> Result<Value> {
        require_non_blank("text", text)?;
        optional_unit_interval("importance", options.importance)?;
        self.http.require_subject_id(options.user_id.as_deref())?;

        let request = ApiRequest::post(MEMORIES).json(&TextBody {
            text,
            options: &options,
        })?;
        self.http.execute(request).await
    }

    /// Fetch one memory by id
    #[instrument(skip(self))]
    pub async fn get_memory(&self, id: &str) -> Result<Value> {
        require_path_id("id", id)?;
        self.http.execute(ApiRequest::get(memory_path(id))).await
    }

    /// List memories, newest first
    #[instrument(skip_all)]
    pub async fn list_memories(&self, options: ListMemoriesOptions) -> Result<Value> {
        optional_min("limit", options.limit, 1)?;
        self.http.require_subject_id(options.user_id.as_deref())?;

        let request = ApiRequest::get(MEMORIES)
            .query_opt("user_id", options.user_id)
            .query_opt("limit", options.limit)
            .query_opt("offset", options.offset)
            .query_opt("tag", options.tag)
            .query_opt("since", options.since.as_ref().map(query_timestamp));
        self.http.execute(request).await
    }

    /// Change fields of an existing memory
    #[instrument(skip(self, options))]
    pub async fn update_memory(&self, id: &str, options: UpdateMemoryOptions) -> Result<Value> {
        require_path_id("id", id)?;
        if let Some(text) = &options.text {
            require_non_blank("text", text)?;
        }
        optional_unit_interval("importance", options.importance)?;

        let request = ApiRequest::patch(memory_path(id)).json(&options)?;
        self.http.execute(request).await
    }

    /// Remove a memory
    #[instrument(skip(self))]
    pub async fn delete_memory(&self, id: &str) -> Result<Value> {
        require_path_id("id", id)?;
        self.http.execute(ApiRequest::delete(memory_path(id))).await
    }

    /// Semantic search over stored memories
    #[instrument(skip_all)]
    pub async fn search_memories(&self, query: &str, options: SearchOptions) -> Result<Value> {
        require_non_blank("query", query)?;
        optional_min("limit", options.limit, 1)?;
        optional_unit_interval("threshold", options.threshold)?;
        self.http.require_subject_id(options.user_id.as_deref())?;

        let request = ApiRequest::post(["v1", "memories", "search"]).json(&QueryBody {
            query,
            options: &options,
        })?;
        self.http.execute(request).await
    }

    /// Search ranked by a caller-chosen mix of similarity, recency and importance
    #[instrument(skip_all)]
    pub async fn weighted_search(&self, query: &str, options: WeightedSearchOptions) -> Result<Value> {
        require_non_blank("query", query)?;
        optional_min("limit", options.limit, 1)?;
        optional_unit_interval("weights.semantic", options.weights.semantic)?;
        optional_unit_interval("weights.recency", options.weights.recency)?;
        optional_unit_interval("weights.importance", options.weights.importance)?;
        self.http.require_subject_id(options.user_id.as_deref())?;

        let request = ApiRequest::post(["v1", "memories", "search", "weighted"]).json(&QueryBody {
            query,
            options: &options,
        })?;
        self.http.execute(request).await
    }

    /// Memories likely to be relevant next, given the current context
    #[instrument(skip_all)]
    pub async fn predict_memories(&self, context: &str, options: PredictOptions) -> Result<Value> {
        require_non_blank("context", context)?;
        optional_min("limit", options.limit, 1)?;
        self.http.require_subject_id(options.user_id.as_deref())?;

        let request = ApiRequest::post(["v1", "memories", "predict"]).json(&ContextBody {
            context,
            options: &options,
        })?;
        self.http.execute(request).await
    }

    /// Memories worth surfacing to the user
    #[instrument(skip_all)]
    pub async fn suggest_memories(&self, options: SuggestOptions) -> Result<Value> {
        optional_min("limit", options.limit, 1)?;
        self.http.require_subject_id(options.user_id.as_deref())?;

        let request = ApiRequest::post(["v1", "memories", "suggest"]).json(&options)?;
        self.http.execute(request).await
    }
}
