//! HTTP API module
//!
//! This module contains all HTTP endpoint handlers and response structures.
//! The API is the stand-in for the UI event layer: every user intent
//! arrives here and is forwarded to the session controller.

pub mod handlers;
pub mod responses;

use std::sync::Arc;
use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;
use handlers::*;

/// Create the HTTP router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/timer/toggle", post(timer_toggle_handler))
        .route("/timer/reset", post(timer_reset_handler))
        .route("/timer/mode/:mode", post(timer_mode_handler))
        .route("/tasks", get(list_tasks_handler).post(add_task_handler))
        .route("/tasks/plan", post(plan_tasks_handler))
        .route("/tasks/:id/toggle", post(toggle_task_handler))
        .route("/tasks/:id", delete(delete_task_handler))
        .route("/sound/toggle", post(sound_toggle_handler))
        .route("/status", get(status_handler))
        .route("/health", get(health_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
