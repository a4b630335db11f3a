//! Relations between memories and graph traversal

use memoria_core::validation::{
    optional_unit_interval, require_non_blank, require_path_id, require_range, MAX_GRAPH_DEPTH, MIN_GRAPH_DEPTH,
};
use memoria_core::{ApiRequest, Result};
use serde::Serialize;
use serde_json::Value;
use tracing::instrument;

use crate::types::{GraphOptions, RelationOptions};
use crate::MemoryClient;

#[derive(Serialize)]
struct RelationBody<'a> {
    source_id: &'a str,
    target_id: &'a str,
    #[serde(flatten)]
    options: &'a RelationOptions,
}

impl MemoryClient {
    /// Link two memories
    #[instrument(skip(self, options), fields(relation_type = %options.relation_type))]
    pub async fn create_relation(
        &self,
        source_id: &str,
        target_id: &str,
        options: RelationOptions,
    ) -> Result<Value> {
        require_non_blank("source_id", source_id)?;
        require_non_blank("target_id", target_id)?;
        require_non_blank("relation_type", &options.relation_type)?;
        optional_unit_interval("strength", options.strength)?;

        let request = ApiRequest::post(["v1", "relations"]).json(&RelationBody {
            source_id,
            target_id,
            options: &options,
        })?;
        self.http.execute(request).await
    }

    /// Relations touching one memory
    #[instrument(skip(self))]
    pub async fn list_relations(&self, memory_id: &str) -> Result<Value> {
        require_path_id("memory_id", memory_id)?;
        self.http
            .execute(ApiRequest::get(["v1", "memories", memory_id, "relations"]))
            .await
    }

    /// Remove a relation; the linked memories are kept
    #[instrument(skip(self))]
    pub async fn delete_relation(&self, relation_id: &str) -> Result<Value> {
        require_path_id("relation_id", relation_id)?;
        self.http
            .execute(ApiRequest::delete(["v1", "relations", relation_id]))
            .await
    }

    /// Walk the relation graph outward from a memory
    ///
    /// `depth` must lie in `1..=10`; anything else fails locally.
    #[instrument(skip(self, options))]
    pub async fn traverse_graph(&self, memory_id: &str, depth: u32, options: GraphOptions) -> Result<Value> {
        require_path_id("memory_id", memory_id)?;
        require_range("depth", depth, MIN_GRAPH_DEPTH, MAX_GRAPH_DEPTH)?;
        optional_unit_interval("min_strength", options.min_strength)?;

        let relation_types = (!options.relation_types.is_empty()).then(|| options.relation_types.join(","));
        let request = ApiRequest::get(["v1", "memories", memory_id, "graph"])
            .query("depth", depth)
            .query_opt("relation_types", relation_types)
            .query_opt("min_strength", options.min_strength);
        self.http.execute(request).await
    }
}
