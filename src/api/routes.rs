use axum::{
    routing::{get, post},
    Router,
};

use super::handlers;
use super::server::AppState;

/// Create API router with all endpoints
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Stateless calculator
        .route("/nextdate", get(handlers::next_date))
        // Task management routes
        .route("/tasks", get(handlers::list_tasks))
        .route(
            "/task",
            get(handlers::get_task)
                .post(handlers::add_task)
                .put(handlers::update_task)
                .delete(handlers::delete_task),
        )
        .route("/task/done", post(handlers::done_task))
        .fallback(handlers::api_not_found)
}
