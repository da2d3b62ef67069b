use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use taskd::api::build_router;
use taskd::repository::TaskRepository;
use taskd::storage::MemStore;
use tower::ServiceExt;

fn test_router() -> Router {
    build_router(Arc::new(TaskRepository::new(MemStore::default())))
}

async fn request(
    router: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(v) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(v.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

#[tokio::test]
async fn test_task_lifecycle() {
    let router = test_router();

    // Create against an empty store.
    let (status, task) = request(
        &router,
        Method::POST,
        "/api/tasks",
        Some(json!({ "title": "Write report" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(task["id"], json!(1));
    assert_eq!(task["status"], json!("pending"));
    assert!(task["created_at"].is_string());
    assert!(task["updated_at"].is_null());

    // Partial update: only the status changes.
    let (status, updated) = request(
        &router,
        Method::PUT,
        "/api/tasks/1",
        Some(json!({ "status": "completed" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["status"], json!("completed"));
    assert_eq!(updated["title"], json!("Write report"));
    assert!(updated["updated_at"].is_string());

    // Delete, then the id is gone.
    let (status, confirmation) = request(&router, Method::DELETE, "/api/tasks/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        confirmation["message"],
        json!("Task with ID 1 deleted successfully")
    );

    let (status, body) = request(&router, Method::GET, "/api/tasks/1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains('1'));
}

#[tokio::test]
async fn test_create_with_all_fields() {
    let router = test_router();
    let (status, task) = request(
        &router,
        Method::POST,
        "/api/tasks",
        Some(json!({
            "title": "Write report",
            "description": "First draft",
            "status": "in_progress",
            "due_date": "2025-05-15",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(task["description"], json!("First draft"));
    assert_eq!(task["status"], json!("in_progress"));
    assert_eq!(task["due_date"], json!("2025-05-15"));
}

#[tokio::test]
async fn test_create_validation_errors_name_the_field() {
    let router = test_router();

    let (status, body) = request(
        &router,
        Method::POST,
        "/api/tasks",
        Some(json!({ "title": "" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["field"], json!("title"));

    let (status, body) = request(
        &router,
        Method::POST,
        "/api/tasks",
        Some(json!({ "title": "Task", "status": "archived" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["field"], json!("status"));

    let (status, body) = request(
        &router,
        Method::POST,
        "/api/tasks",
        Some(json!({ "title": "Task", "due_date": "tomorrow" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["field"], json!("due_date"));
}

#[tokio::test]
async fn test_create_without_title_is_client_error() {
    let router = test_router();
    let (status, _) = request(&router, Method::POST, "/api/tasks", Some(json!({}))).await;
    assert!(status.is_client_error());
}

#[tokio::test]
async fn test_list_empty() {
    let router = test_router();
    let (status, body) = request(&router, Method::GET, "/api/tasks", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_list_filter_and_limit() {
    let router = test_router();
    for i in 0..3 {
        request(
            &router,
            Method::POST,
            "/api/tasks",
            Some(json!({ "title": format!("Task {i}") })),
        )
        .await;
    }
    request(
        &router,
        Method::PUT,
        "/api/tasks/2",
        Some(json!({ "status": "completed" })),
    )
    .await;

    let (status, body) = request(&router, Method::GET, "/api/tasks?status=completed", None).await;
    assert_eq!(status, StatusCode::OK);
    let tasks = body.as_array().unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0]["id"], json!(2));

    let (status, body) = request(&router, Method::GET, "/api/tasks?limit=2", None).await;
    assert_eq!(status, StatusCode::OK);
    let ids: Vec<&Value> = body.as_array().unwrap().iter().map(|t| &t["id"]).collect();
    assert_eq!(ids, vec![&json!(1), &json!(2)]);
}

#[tokio::test]
async fn test_list_rejects_bad_query_parameters() {
    let router = test_router();

    let (status, body) = request(&router, Method::GET, "/api/tasks?limit=0", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["field"], json!("limit"));

    let (status, body) = request(&router, Method::GET, "/api/tasks?limit=101", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["field"], json!("limit"));

    let (status, body) = request(&router, Method::GET, "/api/tasks?status=bogus", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["field"], json!("status"));
}

#[tokio::test]
async fn test_missing_id_responses_name_the_id() {
    let router = test_router();

    let (status, body) = request(&router, Method::GET, "/api/tasks/99", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], json!("Task with ID 99 not found"));

    let (status, _) = request(
        &router,
        Method::PUT,
        "/api/tasks/99",
        Some(json!({ "title": "nope" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = request(&router, Method::DELETE, "/api/tasks/99", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_preserves_and_clears_optional_fields() {
    let router = test_router();
    request(
        &router,
        Method::POST,
        "/api/tasks",
        Some(json!({ "title": "Task", "description": "keep me" })),
    )
    .await;

    // Omitted description is preserved.
    let (_, updated) = request(
        &router,
        Method::PUT,
        "/api/tasks/1",
        Some(json!({ "title": "Renamed" })),
    )
    .await;
    assert_eq!(updated["description"], json!("keep me"));

    // Explicit null clears it.
    let (_, updated) = request(
        &router,
        Method::PUT,
        "/api/tasks/1",
        Some(json!({ "description": null })),
    )
    .await;
    assert!(updated["description"].is_null());
    assert_eq!(updated["title"], json!("Renamed"));
}

#[tokio::test]
async fn test_invalid_update_leaves_record_unchanged() {
    let router = test_router();
    request(
        &router,
        Method::POST,
        "/api/tasks",
        Some(json!({ "title": "Original" })),
    )
    .await;

    let (status, body) = request(
        &router,
        Method::PUT,
        "/api/tasks/1",
        Some(json!({ "title": "" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["field"], json!("title"));

    let (_, task) = request(&router, Method::GET, "/api/tasks/1", None).await;
    assert_eq!(task["title"], json!("Original"));
    assert!(task["updated_at"].is_null());
}

#[tokio::test]
async fn test_health() {
    let router = test_router();
    let (status, body) = request(&router, Method::GET, "/api/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], json!("ok"));
    assert!(body["version"].is_string());
}
