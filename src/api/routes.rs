// api/routes.rs — Task CRUD route handlers.
//
// Handlers validate request shape, call into the repository and translate
// repository errors into HTTP error responses. No persistence logic here.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::error;

use crate::error::{TaskError, ValidationError};
use crate::models::{NewTask, Task, TaskPatch, TaskStatus};
use crate::repository::TaskRepository;

/// Number of tasks returned by the list endpoint when `limit` is omitted.
pub const DEFAULT_LIMIT: usize = 100;
/// Accepted bounds for the `limit` query parameter.
pub const MIN_LIMIT: usize = 1;
pub const MAX_LIMIT: usize = 100;

type ApiError = (StatusCode, Json<Value>);

pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

#[derive(Deserialize)]
pub struct ListParams {
    /// Filter tasks by status.
    #[serde(default)]
    pub status: Option<String>,
    /// Maximum number of tasks to return.
    #[serde(default)]
    pub limit: Option<usize>,
}

pub async fn list_tasks(
    State(repo): State<Arc<TaskRepository>>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<Task>>, ApiError> {
    let limit = params.limit.unwrap_or(DEFAULT_LIMIT);
    if !(MIN_LIMIT..=MAX_LIMIT).contains(&limit) {
        return Err(error_response(
            ValidationError::new(
                "limit",
                format!("must be between {MIN_LIMIT} and {MAX_LIMIT}, got {limit}"),
            )
            .into(),
        ));
    }
    let filter = params
        .status
        .as_deref()
        .map(str::parse::<TaskStatus>)
        .transpose()
        .map_err(|e| error_response(e.into()))?;
    let tasks = repo.list(filter, limit).map_err(error_response)?;
    Ok(Json(tasks))
}

pub async fn get_task(
    State(repo): State<Arc<TaskRepository>>,
    Path(id): Path<u64>,
) -> Result<Json<Task>, ApiError> {
    repo.get(id).map(Json).map_err(error_response)
}

pub async fn create_task(
    State(repo): State<Arc<TaskRepository>>,
    Json(fields): Json<NewTask>,
) -> Result<(StatusCode, Json<Task>), ApiError> {
    let task = repo.create(fields).map_err(error_response)?;
    Ok((StatusCode::CREATED, Json(task)))
}

pub async fn update_task(
    State(repo): State<Arc<TaskRepository>>,
    Path(id): Path<u64>,
    Json(patch): Json<TaskPatch>,
) -> Result<Json<Task>, ApiError> {
    repo.update(id, patch).map(Json).map_err(error_response)
}

pub async fn delete_task(
    State(repo): State<Arc<TaskRepository>>,
    Path(id): Path<u64>,
) -> Result<Json<Value>, ApiError> {
    let id = repo.delete(id).map_err(error_response)?;
    Ok(Json(json!({
        "message": format!("Task with ID {id} deleted successfully"),
    })))
}

fn error_response(err: TaskError) -> ApiError {
    let status = match &err {
        TaskError::Validation(_) => StatusCode::BAD_REQUEST,
        TaskError::NotFound(_) => StatusCode::NOT_FOUND,
        TaskError::Storage(e) => {
            error!("task store failure: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    let body = match &err {
        TaskError::Validation(v) => json!({ "error": v.to_string(), "field": v.field }),
        _ => json!({ "error": err.to_string() }),
    };
    (status, Json(body))
}
