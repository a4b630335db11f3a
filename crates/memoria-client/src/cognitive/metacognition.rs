//! Reflection over stored memories and self-assessed confidence

use memoria_core::validation::{require_min, require_non_blank, require_path_id, MIN_DAY_WINDOW};
use memoria_core::{ApiRequest, HttpClient, Result};
use serde::Serialize;
use serde_json::Value;

use crate::types::ReflectOptions;

#[derive(Serialize)]
struct ReflectBody<'a> {
    topic: &'a str,
    #[serde(flatten)]
    options: &'a ReflectOptions,
}

/// Metacognition operations, see [`MemoryClient::metacognition`](crate::MemoryClient::metacognition)
#[derive(Debug, Clone, Copy)]
pub struct MetacognitionClient<'a> {
    http: &'a HttpClient,
}

impl<'a> MetacognitionClient<'a> {
    pub(crate) fn new(http: &'a HttpClient) -> Self {
        Self { http }
    }

    /// Ask the service to reflect on what it knows about a topic
    pub async fn reflect(&self, topic: &str, options: ReflectOptions) -> Result<Value> {
        require_non_blank("topic", topic)?;
        self.http.require_subject_id(options.user_id.as_deref())?;

        let request = ApiRequest::post(["v1", "metacognition", "reflect"]).json(&ReflectBody {
            topic,
            options: &options,
        })?;
        self.http.execute(request).await
    }

    /// Confidence the service assigns to one memory
    pub async fn confidence(&self, memory_id: &str, user_id: Option<&str>) -> Result<Value> {
        require_path_id("memory_id", memory_id)?;
        self.http.require_subject_id(user_id)?;

        let request =
            ApiRequest::get(["v1", "metacognition", "confidence", memory_id]).query_opt("user_id", user_id);
        self.http.execute(request).await
    }

    /// Topics the user asked about recently that memory could not answer
    pub async fn knowledge_gaps(&self, days: u32, user_id: Option<&str>) -> Result<Value> {
        require_min("days", days, MIN_DAY_WINDOW)?;
        self.http.require_subject_id(user_id)?;

        let request = ApiRequest::get(["v1", "metacognition", "gaps"])
            .query("days", days)
            .query_opt("user_id", user_id);
        self.http.execute(request).await
    }
}
