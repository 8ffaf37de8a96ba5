//! HTTP contract tests for the Todoist client

use serde_json::json;
use todo_glance::tasks::fetch_all_tasks;
use todo_glance::todoist::{DueDate, Priority, TaskService, TodoistClient, TodoistError};
use wiremock::matchers::{header, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> TodoistClient {
    TodoistClient::new("secret-token")
        .unwrap()
        .with_base_url(format!("{}/api/v1", server.uri()))
}

#[tokio::test]
async fn test_list_tasks_sends_bearer_and_decodes_page() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/tasks"))
        .and(header("authorization", "Bearer secret-token"))
        .and(query_param("limit", "100"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [
                {
                    "id": "6X7rM8997g3RQmvh",
                    "content": "Write report",
                    "description": "",
                    "priority": 4,
                    "due": {
                        "date": "2024-03-10",
                        "string": "today",
                        "is_recurring": false,
                        "timezone": null,
                        "lang": "en"
                    },
                    "labels": ["work"]
                },
                {
                    "id": "2",
                    "content": "No due",
                    "priority": 1,
                    "due": null
                }
            ],
            "next_cursor": null
        })))
        .expect(1)
        .mount(&server)
        .await;

    let page = client_for(&server).list_tasks(None).await.unwrap();

    assert_eq!(page.results.len(), 2);
    assert!(page.next_cursor.is_none());

    let first = &page.results[0];
    assert_eq!(first.id, "6X7rM8997g3RQmvh");
    assert_eq!(first.effective_priority(), Priority::P1);
    assert_eq!(
        first.due.as_ref().unwrap().date,
        DueDate::Date(chrono::NaiveDate::from_ymd_opt(2024, 3, 10).unwrap())
    );

    let second = &page.results[1];
    assert!(second.due.is_none());
    assert_eq!(second.effective_priority(), Priority::P4);
}

#[tokio::test]
async fn test_fetch_all_tasks_follows_cursor() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/tasks"))
        .and(query_param_is_missing("cursor"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [{ "id": "1", "content": "first" }],
            "next_cursor": "page-2"
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v1/tasks"))
        .and(query_param("cursor", "page-2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [{ "id": "2", "content": "second" }],
            "next_cursor": null
        })))
        .expect(1)
        .mount(&server)
        .await;

    let tasks = fetch_all_tasks(&client_for(&server)).await.unwrap();
    let ids: Vec<&str> = tasks.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, vec!["1", "2"]);
}

#[tokio::test]
async fn test_page_size_is_sent_as_limit() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/tasks"))
        .and(query_param("limit", "25"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "results": [] })))
        .expect(1)
        .mount(&server)
        .await;

    let page = client_for(&server)
        .with_page_size(25)
        .list_tasks(None)
        .await
        .unwrap();
    assert!(page.results.is_empty());
}

#[tokio::test]
async fn test_close_task_accepts_no_content() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/tasks/42/close"))
        .and(header("authorization", "Bearer secret-token"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    client_for(&server).close_task("42").await.unwrap();
}

#[tokio::test]
async fn test_unauthorized_maps_to_dedicated_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/tasks"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Forbidden"))
        .mount(&server)
        .await;

    let err = client_for(&server).list_tasks(None).await.unwrap_err();
    assert!(matches!(err, TodoistError::Unauthorized(401)), "got {err:?}");
}

#[tokio::test]
async fn test_server_error_keeps_status_and_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/tasks/42/close"))
        .respond_with(ResponseTemplate::new(500).set_body_string("  boom  "))
        .mount(&server)
        .await;

    let err = client_for(&server).close_task("42").await.unwrap_err();
    match err {
        TodoistError::Status { status, body } => {
            assert_eq!(status, 500);
            assert_eq!(body, "boom");
        }
        other => panic!("Expected Status, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_malformed_body_is_a_decode_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/tasks"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{\"results\": 12}"))
        .mount(&server)
        .await;

    let err = client_for(&server).list_tasks(None).await.unwrap_err();
    assert!(matches!(err, TodoistError::Decode(_)), "got {err:?}");
}

#[tokio::test]
async fn test_unreachable_server_is_a_transport_error() {
    // Nothing listens on port 1.
    let client = TodoistClient::new("secret-token")
        .unwrap()
        .with_base_url("http://127.0.0.1:1/api/v1");

    let err = client.list_tasks(None).await.unwrap_err();
    assert!(matches!(err, TodoistError::Transport(_)), "got {err:?}");
}
