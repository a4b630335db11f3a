// Store a memory and search for it
// Usage: cargo run --example quickstart -- "text to remember" [user_id]
// Reads MEMORIA_API_KEY or MEMORIA_SERVICE_TOKEN (and optional MEMORIA_* settings) from .env

use dotenv::dotenv;
use memoria_client::{AuthMode, CreateMemoryOptions, MemoryClient, SearchOptions};
use std::env;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("memoria_core=debug")))
        .init();

    let args: Vec<String> = env::args().collect();
    let text = args.get(1).map(|s| s.as_str()).unwrap_or("Prefers green tea in the afternoon");
    let user_id = args.get(2).cloned();

    let client = MemoryClient::from_env()?;
    if client.auth_mode() == AuthMode::ServiceToken && user_id.is_none() {
        eprintln!("Service-token auth needs a user id: cargo run --example quickstart -- \"text\" <user_id>");
        std::process::exit(2);
    }

    let memory = client
        .create_memory(
            text,
            CreateMemoryOptions {
                user_id: user_id.clone(),
                ..Default::default()
            },
        )
        .await?;
    println!("Stored: {}", serde_json::to_string_pretty(&memory)?);

    let results = client
        .search_memories(
            text,
            SearchOptions {
                user_id,
                limit: Some(5),
                ..Default::default()
            },
        )
        .await;

    match results {
        Ok(results) => println!("Search results: {}", serde_json::to_string_pretty(&results)?),
        Err(e) => {
            eprintln!(
                "Search failed: {} (status: {:?}, code: {:?})",
                e.message(),
                e.status_code(),
                e.code()
            );
        }
    }

    Ok(())
}
