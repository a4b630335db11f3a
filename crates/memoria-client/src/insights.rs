//! Aggregate views over a user's memories

use memoria_core::validation::{require_min, MIN_DAY_WINDOW};
use memoria_core::{ApiRequest, Result};
use serde_json::Value;
use tracing::instrument;

use crate::types::InsightOptions;
use crate::MemoryClient;

impl MemoryClient {
    /// Memory activity over the last `days` days
    #[instrument(skip(self, options))]
    pub async fn timeline(&self, days: u32, options: InsightOptions) -> Result<Value> {
        require_min("days", days, MIN_DAY_WINDOW)?;
        self.http.require_subject_id(options.user_id.as_deref())?;

        let request = ApiRequest::get(["v1", "insights", "timeline"])
            .query("days", days)
            .query_opt("user_id", options.user_id);
        self.http.execute(request).await
    }

    /// Counts and distributions for the user's memories
    #[instrument(skip_all)]
    pub async fn memory_stats(&self, options: InsightOptions) -> Result<Value> {
        self.http.require_subject_id(options.user_id.as_deref())?;

        let request = ApiRequest::get(["v1", "insights", "stats"]).query_opt("user_id", options.user_id);
        self.http.execute(request).await
    }
}
