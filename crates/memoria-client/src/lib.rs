//! Memoria Client - typed async access to the Memoria memory service
//!
//! [`MemoryClient`] exposes one async method per endpoint. Every method
//! checks its own arguments, makes sure a `user_id` is present when the
//! client authenticates with a service token, and then hands the call to
//! the shared executor in `memoria-core`, which retries transient failures
//! and normalizes errors.
//!
//! Successful calls return the decoded JSON body as `serde_json::Value`,
//! exactly as the service sent it.
//!
//! # Example
//!
//! ```no_run
//! use memoria_client::{ClientOptions, MemoryClient, SearchOptions};
//!
//! # async fn run() -> memoria_client::Result<()> {
//! let client = MemoryClient::new(
//!     ClientOptions::with_service_token("svc_live_abc").max_retries(5),
//! )?;
//!
//! let hits = client
//!     .search_memories("coffee preferences", SearchOptions::for_user("user-42").limit(5))
//!     .await?;
//!
//! client.goals().complete("goal-7", Some("user-42")).await?;
//! # let _ = hits;
//! # Ok(())
//! # }
//! ```

pub mod cognitive;
mod client;
mod insights;
mod memories;
mod relations;
pub mod types;

pub use client::MemoryClient;
pub use cognitive::{GoalsClient, MetacognitionClient, UncertaintyClient, WorkingMemoryClient};
pub use types::{
    CreateMemoryOptions, GoalFilter, GoalOptions, GoalStatus, GraphOptions, InsightOptions,
    ListMemoriesOptions, PredictOptions, ReflectOptions, RelationOptions, SearchOptions,
    SearchWeights, SuggestOptions, UncertaintyOptions, UpdateMemoryOptions, WeightedSearchOptions,
    WorkingMemoryOptions, DEFAULT_RELATION_TYPE,
};

// Re-export the core surface callers need
pub use memoria_core::{
    ApiError, AuthMode, ClientConfig, ClientOptions, Error, ErrorClassification, Result,
    RetryPolicy,
};
pub use memoria_core::{
    AUTH_CONFIG_CONFLICT, AUTH_CONFIG_MISSING, CONFIGURATION_ERROR, JSON_ERROR, MISSING_USER_ID,
    NO_RESPONSE, REQUEST_SETUP_ERROR, VALIDATION_ERROR,
};
