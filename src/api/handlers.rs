use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
};
use serde_json::json;

use super::models::*;
use super::server::AppState;
use crate::db::models::Task;
use crate::error::SchedulerError;
use crate::nextdate::{next_date as evaluate_next_date, RepeatContext};
use crate::tasks::{prepare_new_task, TaskStore};
use crate::time_utils::{format_date, parse_date, today};

/// Render an error as `{"error": "..."}` with the matching status
fn error_response(err: SchedulerError) -> Response {
    let status = err.status_code();
    if status.is_server_error() {
        crate::log_error!(err, "api request");
    } else {
        tracing::debug!(error = %err, status = status.as_u16(), "Request rejected");
    }

    (status, Json(err.to_error_response())).into_response()
}

fn bad_json(rejection: JsonRejection) -> Response {
    error_response(SchedulerError::InvalidInput(format!(
        "Invalid JSON body: {}",
        rejection.body_text()
    )))
}

fn empty_ok() -> Response {
    (StatusCode::OK, Json(json!({}))).into_response()
}

/// Compute the next occurrence of a rule, answering in plain text
pub async fn next_date(Query(query): Query<NextDateQuery>) -> impl IntoResponse {
    let plain = |status: StatusCode, body: String| {
        (
            status,
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            body,
        )
    };

    let now = match parse_date(query.now.as_deref().unwrap_or_default()) {
        Ok(now) => now,
        Err(e) => return plain(StatusCode::BAD_REQUEST, e.to_string()),
    };

    match evaluate_next_date(
        now,
        query.date.as_deref().unwrap_or_default(),
        query.repeat.as_deref().unwrap_or_default(),
        RepeatContext::NextDate,
    ) {
        Ok(next) => plain(StatusCode::OK, next.map(format_date).unwrap_or_default()),
        Err(e) => plain(StatusCode::BAD_REQUEST, e.to_string()),
    }
}

/// Create a new task
pub async fn add_task(
    State(state): State<AppState>,
    payload: Result<Json<AddTaskRequest>, JsonRejection>,
) -> impl IntoResponse {
    let Json(req) = match payload {
        Ok(body) => body,
        Err(rejection) => return bad_json(rejection),
    };

    let new_task = match prepare_new_task(
        req.date.as_deref(),
        &req.title,
        req.comment.as_deref(),
        req.repeat.as_deref(),
        today(),
    ) {
        Ok(task) => task,
        Err(e) => return error_response(e),
    };

    let store = TaskStore::new(&state.db_pool);
    match store.add_task(&new_task).await {
        Ok(id) => (
            StatusCode::CREATED,
            Json(AddTaskResponse { id: id.to_string() }),
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}

/// List upcoming tasks
pub async fn list_tasks(State(state): State<AppState>) -> impl IntoResponse {
    let store = TaskStore::new(&state.db_pool);

    match store.list_upcoming(today()).await {
        Ok(tasks) => (StatusCode::OK, Json(TasksResponse { tasks })).into_response(),
        Err(e) => error_response(e),
    }
}

/// Get a single task by ID
pub async fn get_task(
    State(state): State<AppState>,
    Query(query): Query<IdQuery>,
) -> impl IntoResponse {
    let id = match parse_task_id(query.id.as_deref()) {
        Ok(id) => id,
        Err(e) => return error_response(e),
    };

    let store = TaskStore::new(&state.db_pool);
    match store.get_task(id).await {
        Ok(task) => (StatusCode::OK, Json(task)).into_response(),
        Err(e) => error_response(e),
    }
}

/// Replace every field of a task
pub async fn update_task(
    State(state): State<AppState>,
    payload: Result<Json<UpdateTaskRequest>, JsonRejection>,
) -> impl IntoResponse {
    let Json(req) = match payload {
        Ok(body) => body,
        Err(rejection) => return bad_json(rejection),
    };

    let id = match req.id.as_ref() {
        Some(raw) => raw.to_task_id(),
        None => parse_task_id(None),
    };
    let id = match id {
        Ok(id) => id,
        Err(e) => return error_response(e),
    };

    if req.date.trim().is_empty() {
        return error_response(SchedulerError::InvalidInput(
            "Task date is required".to_string(),
        ));
    }

    let task = Task {
        id,
        date: req.date.trim().to_string(),
        title: req.title.trim().to_string(),
        comment: req.comment,
        repeat: req.repeat,
    };

    let store = TaskStore::new(&state.db_pool);
    match store.update_task(&task, today()).await {
        Ok(()) => empty_ok(),
        Err(e) => error_response(e),
    }
}

/// Mark a task as done
pub async fn done_task(
    State(state): State<AppState>,
    Query(query): Query<IdQuery>,
) -> impl IntoResponse {
    let id = match parse_task_id(query.id.as_deref()) {
        Ok(id) => id,
        Err(e) => return error_response(e),
    };

    let store = TaskStore::new(&state.db_pool);
    match store.complete_task(id, today()).await {
        Ok(_) => empty_ok(),
        Err(e) => error_response(e),
    }
}

/// Delete a task
pub async fn delete_task(
    State(state): State<AppState>,
    Query(query): Query<IdQuery>,
) -> impl IntoResponse {
    let id = match parse_task_id(query.id.as_deref()) {
        Ok(id) => id,
        Err(e) => return error_response(e),
    };

    let store = TaskStore::new(&state.db_pool);
    match store.delete_task(id).await {
        Ok(()) => empty_ok(),
        Err(e) => error_response(e),
    }
}

/// 404 for unknown API routes
pub async fn api_not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": "Not found" })),
    )
}
