//! Autonomous-feature sub-clients
//!
//! Each sub-client borrows the parent [`MemoryClient`](crate::MemoryClient)'s
//! executor, so it shares its credential, retry policy and connection pool.
//! Every operation here is scoped to one user: under service-token auth a
//! `user_id` must be supplied or the call fails before reaching the network.

mod goals;
mod metacognition;
mod uncertainty;
mod working_memory;

pub use goals::GoalsClient;
pub use metacognition::MetacognitionClient;
pub use uncertainty::UncertaintyClient;
pub use working_memory::WorkingMemoryClient;

use serde::Serialize;

/// Body carrying only the subject id, for actions with no other payload
#[derive(Serialize)]
struct SubjectBody<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    user_id: Option<&'a str>,
}
