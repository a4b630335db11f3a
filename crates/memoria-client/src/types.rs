//! Option types for endpoint methods
//!
//! Every option struct serializes to the snake_case wire format. Unset
//! optional fields are left out of request bodies and query strings.

use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Relation type used when none is given
pub const DEFAULT_RELATION_TYPE: &str = "related_to";

/// Options for [`MemoryClient::create_memory`](crate::MemoryClient::create_memory)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreateMemoryOptions {
    /// User the memory belongs to; required with service-token auth
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,

    /// Importance score in `[0, 1]`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub importance: Option<f64>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,

    /// Free-form kind label, e.g. `"episodic"`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memory_type: Option<String>,

    /// Arbitrary caller metadata stored with the memory
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
}

impl CreateMemoryOptions {
    /// Options for a memory owned by `user_id`
    pub fn for_user(user_id: impl Into<String>) -> Self {
        Self {
            user_id: Some(user_id.into()),
            ..Default::default()
        }
    }

    /// Set the importance score
    pub fn importance(mut self, importance: f64) -> Self {
        self.importance = Some(importance);
        self
    }

    /// Add one tag
    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    /// Attach caller metadata
    pub fn metadata(mut self, metadata: Value) -> Self {
        self.metadata = Some(metadata);
        self
    }
}

/// Filters for [`MemoryClient::list_memories`](crate::MemoryClient::list_memories)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListMemoriesOptions {
    pub user_id: Option<String>,
    /// Page size, at least 1
    pub limit: Option<u32>,
    pub offset: Option<u32>,
    pub tag: Option<String>,
    /// Only memories created at or after this instant
    pub since: Option<DateTime<Utc>>,
}

impl ListMemoriesOptions {
    /// List memories owned by `user_id`
    pub fn for_user(user_id: impl Into<String>) -> Self {
        Self {
            user_id: Some(user_id.into()),
            ..Default::default()
        }
    }

    /// Cap the page size
    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Fields to change in [`MemoryClient::update_memory`](crate::MemoryClient::update_memory)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateMemoryOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub importance: Option<f64>,

    /// Replaces the tag set when present
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
}

/// Options for [`MemoryClient::search_memories`](crate::MemoryClient::search_memories)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,

    /// Minimum similarity score in `[0, 1]`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub threshold: Option<f64>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub since: Option<DateTime<Utc>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub until: Option<DateTime<Utc>>,
}

impl SearchOptions {
    /// Search the memories of `user_id`
    pub fn for_user(user_id: impl Into<String>) -> Self {
        Self {
            user_id: Some(user_id.into()),
            ..Default::default()
        }
    }

    /// Cap the number of hits
    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Drop hits scoring below `threshold`
    pub fn threshold(mut self, threshold: f64) -> Self {
        self.threshold = Some(threshold);
        self
    }
}

/// Relative weight of each ranking signal, each in `[0, 1]`
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchWeights {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub semantic: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub recency: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub importance: Option<f64>,
}

/// Options for [`MemoryClient::weighted_search`](crate::MemoryClient::weighted_search)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeightedSearchOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,

    #[serde(default)]
    pub weights: SearchWeights,
}

/// Options for [`MemoryClient::predict_memories`](crate::MemoryClient::predict_memories)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PredictOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

/// Options for [`MemoryClient::suggest_memories`](crate::MemoryClient::suggest_memories)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SuggestOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,

    /// Text describing what the user is doing right now
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

/// Options for [`MemoryClient::create_relation`](crate::MemoryClient::create_relation)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationOptions {
    pub relation_type: String,

    /// Link strength in `[0, 1]`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strength: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
}

impl Default for RelationOptions {
    fn default() -> Self {
        Self {
            relation_type: DEFAULT_RELATION_TYPE.to_string(),
            strength: None,
            metadata: None,
        }
    }
}

impl RelationOptions {
    /// Relation of the given type with no explicit strength
    pub fn typed(relation_type: impl Into<String>) -> Self {
        Self {
            relation_type: relation_type.into(),
            ..Default::default()
        }
    }

    /// Set the link strength
    pub fn strength(mut self, strength: f64) -> Self {
        self.strength = Some(strength);
        self
    }
}

/// Filters for [`MemoryClient::traverse_graph`](crate::MemoryClient::traverse_graph)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GraphOptions {
    /// Only follow these relation types; empty follows all
    pub relation_types: Vec<String>,
    /// Skip edges weaker than this, in `[0, 1]`
    pub min_strength: Option<f64>,
}

/// Subject selector for insight endpoints
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InsightOptions {
    pub user_id: Option<String>,
}

impl InsightOptions {
    /// Insights about `user_id`
    pub fn for_user(user_id: impl Into<String>) -> Self {
        Self {
            user_id: Some(user_id.into()),
        }
    }
}

/// Options for adding an item to working memory
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkingMemoryOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,

    /// Attention priority in `[0, 1]`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<f64>,

    /// Seconds until the item decays out of working memory
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ttl_seconds: Option<u64>,
}

/// Lifecycle state of a goal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalStatus {
    Active,
    Completed,
    Abandoned,
}

impl GoalStatus {
    /// Wire name, as sent in the `status` query parameter
    pub fn as_str(&self) -> &'static str {
        match self {
            GoalStatus::Active => "active",
            GoalStatus::Completed => "completed",
            GoalStatus::Abandoned => "abandoned",
        }
    }
}

impl fmt::Display for GoalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Options for creating a goal
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GoalOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Priority in `[0, 1]`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub deadline: Option<DateTime<Utc>>,
}

/// Filters for listing goals
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GoalFilter {
    pub user_id: Option<String>,
    pub status: Option<GoalStatus>,
}

/// Options for a reflection request
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReflectOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,

    /// Restrict reflection to these memories
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub memory_ids: Vec<String>,
}

/// Options for recording an uncertainty
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UncertaintyOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

/// RFC 3339 form used for timestamps in query strings
pub(crate) fn query_timestamp(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}
