//! Integration tests for the working-memory, goal, metacognition and uncertainty sub-clients

mod test_support;

use memoria_client::{
    GoalFilter, GoalOptions, GoalStatus, ReflectOptions, UncertaintyOptions, WorkingMemoryOptions,
    MISSING_USER_ID, VALIDATION_ERROR,
};
use serde_json::json;
use test_support::{api_key_client, request_body, request_count, service_client};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn ok(body: serde_json::Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(body)
}

#[tokio::test]
async fn test_working_memory_flow() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/working-memory"))
        .respond_with(ok(json!({"id": "wm-1"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/working-memory"))
        .and(query_param("user_id", "user-1"))
        .respond_with(ok(json!({"items": [{"id": "wm-1"}]})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/working-memory/wm-1/focus"))
        .respond_with(ok(json!({"focused": "wm-1"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/v1/working-memory"))
        .and(query_param("user_id", "user-1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let client = service_client(&server);
    let wm = client.working_memory();

    let added = wm
        .add(
            "Booking flights to Lisbon",
            WorkingMemoryOptions {
                user_id: Some("user-1".to_string()),
                priority: Some(0.9),
                ttl_seconds: Some(600),
            },
        )
        .await
        .expect("add");
    assert_eq!(added["id"], "wm-1");
    assert_eq!(
        request_body(&server, 0).await,
        json!({
            "content": "Booking flights to Lisbon",
            "user_id": "user-1",
            "priority": 0.9,
            "ttl_seconds": 600
        })
    );

    let items = wm.get(Some("user-1")).await.expect("get");
    assert_eq!(items["items"][0]["id"], "wm-1");

    wm.focus("wm-1", Some("user-1")).await.expect("focus");
    assert_eq!(request_body(&server, 2).await, json!({"user_id": "user-1"}));

    assert!(wm.clear(Some("user-1")).await.expect("clear").is_null());
}

#[tokio::test]
async fn test_sub_clients_require_user_id_with_service_token() {
    let server = MockServer::start().await;
    let client = service_client(&server);

    let results = vec![
        client.working_memory().get(None).await,
        client.working_memory().clear(Some("")).await,
        client.goals().create("Learn Rust", GoalOptions::default()).await,
        client.goals().list(GoalFilter::default()).await,
        client.goals().complete("goal-1", None).await,
        client.metacognition().confidence("mem-1", None).await,
        client.metacognition().knowledge_gaps(7, None).await,
        client
            .uncertainty()
            .record("It might rain", 0.4, UncertaintyOptions::default())
            .await,
        client.uncertainty().list(None, None).await,
    ];

    for result in results {
        assert_eq!(result.unwrap_err().code(), Some(MISSING_USER_ID));
    }
    assert_eq!(request_count(&server).await, 0);
}

#[tokio::test]
async fn test_api_key_sub_clients_omit_user_id() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/goals/goal-1/complete"))
        .respond_with(ok(json!({"status": "completed"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = api_key_client(&server);
    let goal = client.goals().complete("goal-1", None).await.expect("complete");

    assert_eq!(goal["status"], "completed");
    assert_eq!(request_body(&server, 0).await, json!({}));
}

#[tokio::test]
async fn test_goal_progress_and_listing() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/goals"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": "goal-1"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/v1/goals/goal-1"))
        .respond_with(ok(json!({"id": "goal-1", "progress": 0.5})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/goals"))
        .and(query_param("user_id", "user-1"))
        .and(query_param("status", "active"))
        .respond_with(ok(json!([{"id": "goal-1"}])))
        .expect(1)
        .mount(&server)
        .await;

    let client = service_client(&server);
    let goals = client.goals();

    goals
        .create(
            "Run a marathon",
            GoalOptions {
                user_id: Some("user-1".to_string()),
                description: Some("Spring race".to_string()),
                ..Default::default()
            },
        )
        .await
        .expect("create");
    assert_eq!(
        request_body(&server, 0).await,
        json!({"title": "Run a marathon", "user_id": "user-1", "description": "Spring race"})
    );

    let progress = goals
        .update_progress("goal-1", 0.5, Some("user-1"))
        .await
        .expect("progress");
    assert_eq!(progress["progress"], 0.5);
    assert_eq!(
        request_body(&server, 1).await,
        json!({"progress": 0.5, "user_id": "user-1"})
    );

    let listed = goals
        .list(GoalFilter {
            user_id: Some("user-1".to_string()),
            status: Some(GoalStatus::Active),
        })
        .await
        .expect("list");
    assert_eq!(listed[0]["id"], "goal-1");
}

#[tokio::test]
async fn test_sub_client_argument_validation() {
    let server = MockServer::start().await;
    let client = service_client(&server);
    let user = Some("user-1");

    let results = vec![
        client.goals().update_progress("goal-1", 1.2, user).await,
        client.goals().update_progress("", 0.5, user).await,
        client.goals().complete("..", user).await,
        client.working_memory().focus(".", user).await,
        client.working_memory().focus(" ", user).await,
        client.metacognition().knowledge_gaps(0, user).await,
        client.metacognition().reflect("", ReflectOptions::default()).await,
        client
            .uncertainty()
            .record("Maybe", -0.2, UncertaintyOptions::default())
            .await,
        client.uncertainty().resolve("unc-1", "  ", user).await,
        client.uncertainty().list(user, Some(0)).await,
    ];

    for result in results {
        assert_eq!(result.unwrap_err().code(), Some(VALIDATION_ERROR));
    }
    assert_eq!(request_count(&server).await, 0);
}

#[tokio::test]
async fn test_metacognition_and_uncertainty() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/metacognition/reflect"))
        .respond_with(ok(json!({"summary": "Mostly travel plans"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/metacognition/gaps"))
        .and(query_param("days", "30"))
        .respond_with(ok(json!({"gaps": ["visa rules"]})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/uncertainty/unc-1/resolve"))
        .respond_with(ok(json!({"resolved": true})))
        .expect(1)
        .mount(&server)
        .await;

    let client = service_client(&server);

    let reflection = client
        .metacognition()
        .reflect(
            "travel",
            ReflectOptions {
                user_id: Some("user-1".to_string()),
                memory_ids: vec!["mem-1".to_string()],
            },
        )
        .await
        .expect("reflect");
    assert_eq!(reflection["summary"], "Mostly travel plans");
    assert_eq!(
        request_body(&server, 0).await,
        json!({"topic": "travel", "user_id": "user-1", "memory_ids": ["mem-1"]})
    );

    let gaps = client
        .metacognition()
        .knowledge_gaps(30, Some("user-1"))
        .await
        .expect("gaps");
    assert_eq!(gaps["gaps"][0], "visa rules");

    let resolved = client
        .uncertainty()
        .resolve("unc-1", "It did rain", Some("user-1"))
        .await
        .expect("resolve");
    assert_eq!(resolved["resolved"], true);
    assert_eq!(
        request_body(&server, 2).await,
        json!({"resolution": "It did rain", "user_id": "user-1"})
    );
}
