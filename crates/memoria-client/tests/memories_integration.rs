//! Integration tests for memory, relation and insight endpoints

mod test_support;

use memoria_client::{
    CreateMemoryOptions, GraphOptions, InsightOptions, ListMemoriesOptions, RelationOptions,
    SearchOptions, SearchWeights, UpdateMemoryOptions, WeightedSearchOptions, MISSING_USER_ID,
    VALIDATION_ERROR,
};
use serde_json::json;
use test_support::{api_key_client, request_body, request_count, service_client, API_KEY};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_create_memory_with_api_key() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/memories"))
        .and(header("x-api-key", API_KEY))
        .and(body_json(json!({"text": "Prefers window seats", "importance": 0.8})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "mem-1",
            "text": "Prefers window seats",
            "importance": 0.8,
            "created_at": "2024-03-01T12:00:00Z"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = api_key_client(&server);
    let memory = client
        .create_memory(
            "Prefers window seats",
            CreateMemoryOptions::default().importance(0.8),
        )
        .await
        .expect("create");

    assert_eq!(memory["id"], "mem-1");
    assert_eq!(memory["created_at"], "2024-03-01T12:00:00Z");
}

#[tokio::test]
async fn test_service_token_write_sends_user_id_in_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/memories/search"))
        .and(header("x-service-token", test_support::SERVICE_TOKEN))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"results": []})))
        .expect(1)
        .mount(&server)
        .await;

    let client = service_client(&server);
    client
        .search_memories("travel", SearchOptions::for_user("user-7").limit(3))
        .await
        .expect("search");

    assert_eq!(
        request_body(&server, 0).await,
        json!({"query": "travel", "user_id": "user-7", "limit": 3})
    );
}

#[tokio::test]
async fn test_service_token_read_sends_user_id_in_query() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/memories"))
        .and(query_param("user_id", "user-7"))
        .and(query_param("limit", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"memories": []})))
        .expect(1)
        .mount(&server)
        .await;

    let client = service_client(&server);
    let body = client
        .list_memories(ListMemoriesOptions::for_user("user-7").limit(10))
        .await
        .expect("list");
    assert_eq!(body, json!({"memories": []}));
}

#[tokio::test]
async fn test_service_token_without_user_id_makes_no_request() {
    let server = MockServer::start().await;
    let client = service_client(&server);

    let err = client
        .create_memory("note", CreateMemoryOptions::default())
        .await
        .unwrap_err();
    assert_eq!(err.code(), Some(MISSING_USER_ID));

    let err = client
        .memory_stats(InsightOptions { user_id: Some("  ".to_string()) })
        .await
        .unwrap_err();
    assert_eq!(err.code(), Some(MISSING_USER_ID));

    assert_eq!(request_count(&server).await, 0);
}

#[tokio::test]
async fn test_argument_validation_happens_before_network() {
    let server = MockServer::start().await;
    let client = api_key_client(&server);

    let cases = vec![
        client.create_memory("   ", CreateMemoryOptions::default()).await,
        client
            .create_memory("ok", CreateMemoryOptions::default().importance(1.5))
            .await,
        client.get_memory("").await,
        client.get_memory(".").await,
        client.delete_memory("..").await,
        client.list_relations("%2E%2E").await,
        client.delete_relation("..").await,
        client.search_memories("", SearchOptions::default()).await,
        client
            .search_memories("q", SearchOptions::default().limit(0))
            .await,
        client
            .weighted_search(
                "q",
                WeightedSearchOptions {
                    weights: SearchWeights {
                        recency: Some(-0.1),
                        ..Default::default()
                    },
                    ..Default::default()
                },
            )
            .await,
        client.traverse_graph("mem-1", 0, GraphOptions::default()).await,
        client.traverse_graph("mem-1", 11, GraphOptions::default()).await,
        client.timeline(0, InsightOptions::default()).await,
        client
            .create_relation("a", "b", RelationOptions::typed(" "))
            .await,
        client
            .create_relation("a", "b", RelationOptions::default().strength(2.0))
            .await,
    ];

    for result in cases {
        let err = result.unwrap_err();
        assert_eq!(err.code(), Some(VALIDATION_ERROR), "{}", err);
        assert!(err.is_local());
    }
    assert_eq!(request_count(&server).await, 0);
}

#[tokio::test]
async fn test_validation_runs_before_subject_check() {
    let server = MockServer::start().await;
    let client = service_client(&server);

    let err = client
        .timeline(0, InsightOptions::default())
        .await
        .unwrap_err();
    assert_eq!(err.code(), Some(VALIDATION_ERROR));
}

#[tokio::test]
async fn test_update_and_delete_memory() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/v1/memories/mem-1"))
        .and(body_json(json!({"text": "Prefers aisle seats"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "mem-1"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/v1/memories/mem-1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let client = api_key_client(&server);
    let updated = client
        .update_memory(
            "mem-1",
            UpdateMemoryOptions {
                text: Some("Prefers aisle seats".to_string()),
                ..Default::default()
            },
        )
        .await
        .expect("update");
    assert_eq!(updated["id"], "mem-1");

    let deleted = client.delete_memory("mem-1").await.expect("delete");
    assert!(deleted.is_null());
}

#[tokio::test]
async fn test_ids_are_percent_encoded() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/memories/a%2Fb/relations"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let client = api_key_client(&server);
    client.list_relations("a/b").await.expect("relations");
}

#[tokio::test]
async fn test_relations_and_graph() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/relations"))
        .and(body_json(json!({
            "source_id": "mem-1",
            "target_id": "mem-2",
            "relation_type": "causes",
            "strength": 0.6
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": "rel-1"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/memories/mem-1/graph"))
        .and(query_param("depth", "10"))
        .and(query_param("relation_types", "causes,supports"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"nodes": [], "edges": []})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/v1/relations/rel-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"deleted": true})))
        .expect(1)
        .mount(&server)
        .await;

    let client = api_key_client(&server);
    let relation = client
        .create_relation("mem-1", "mem-2", RelationOptions::typed("causes").strength(0.6))
        .await
        .expect("relation");
    assert_eq!(relation["id"], "rel-1");

    let graph = client
        .traverse_graph(
            "mem-1",
            10,
            GraphOptions {
                relation_types: vec!["causes".to_string(), "supports".to_string()],
                min_strength: None,
            },
        )
        .await
        .expect("graph");
    assert_eq!(graph, json!({"nodes": [], "edges": []}));

    let deleted = client.delete_relation("rel-1").await.expect("delete");
    assert_eq!(deleted["deleted"], true);
}

#[tokio::test]
async fn test_server_errors_are_retried_then_normalized() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/insights/timeline"))
        .respond_with(ResponseTemplate::new(502).set_body_json(json!({
            "error": {"message": "upstream unavailable", "code": "UPSTREAM"}
        })))
        .expect(3)
        .mount(&server)
        .await;

    let client = api_key_client(&server);
    let err = client
        .timeline(7, InsightOptions::default())
        .await
        .unwrap_err();

    assert_eq!(err.status_code(), Some(502));
    assert_eq!(err.message(), "upstream unavailable");
    assert_eq!(err.code(), Some("UPSTREAM"));
    assert_eq!(request_count(&server).await, 3);
}
