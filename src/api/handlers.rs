//! HTTP endpoint handlers

use std::sync::Arc;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use serde::Deserialize;
use tracing::{error, info};
use uuid::Uuid;

use super::responses::{
    HealthResponse, SoundResponse, StatusResponse, TaskResponse, TimerResponse,
};
use crate::state::{AppState, PlanOutcome, TimerMode};
use crate::utils::RingGeometry;

/// Request body for POST /tasks
#[derive(Debug, Deserialize)]
pub struct AddTaskRequest {
    pub title: String,
}

/// Request body for POST /tasks/plan
#[derive(Debug, Deserialize)]
pub struct PlanRequest {
    pub goal: String,
}

/// Handle POST /timer/toggle - Start the timer if paused, pause if running
pub async fn timer_toggle_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<TimerResponse>, StatusCode> {
    match state.toggle_timer() {
        Ok(timer) => {
            let message = if timer.running {
                "Timer started"
            } else if timer.finished {
                "Timer is finished; reset or switch mode to start again"
            } else {
                "Timer paused"
            };
            info!("Timer toggle - {}", message);
            Ok(Json(TimerResponse::new(message.to_string(), timer)))
        }
        Err(e) => {
            error!("Failed to toggle timer: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle POST /timer/reset - Restore the current mode to full duration
pub async fn timer_reset_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<TimerResponse>, StatusCode> {
    match state.reset_timer() {
        Ok(timer) => {
            info!("Timer reset to {}", timer.clock);
            Ok(Json(TimerResponse::new("Timer reset".to_string(), timer)))
        }
        Err(e) => {
            error!("Failed to reset timer: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle POST /timer/mode/:mode - Switch session mode
pub async fn timer_mode_handler(
    State(state): State<Arc<AppState>>,
    Path(mode): Path<String>,
) -> Result<Json<TimerResponse>, StatusCode> {
    let Some(mode) = TimerMode::from_name(&mode) else {
        return Err(StatusCode::BAD_REQUEST);
    };

    match state.switch_mode(mode) {
        Ok(timer) => Ok(Json(TimerResponse::new(
            format!("Switched to {}", mode.label()),
            timer,
        ))),
        Err(e) => {
            error!("Failed to switch mode: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle GET /tasks - List session tasks in insertion order
pub async fn list_tasks_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<TaskResponse>, StatusCode> {
    match state.tasks() {
        Ok(tasks) => Ok(Json(TaskResponse::changed(
            format!("{} tasks", tasks.len()),
            tasks,
        ))),
        Err(e) => {
            error!("Failed to list tasks: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle POST /tasks - Add a manual task
pub async fn add_task_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<AddTaskRequest>,
) -> Result<Json<TaskResponse>, StatusCode> {
    match state.add_task(&request.title) {
        Ok(Some(task)) => Ok(Json(TaskResponse::changed(
            "Task added".to_string(),
            vec![task],
        ))),
        Ok(None) => Ok(Json(TaskResponse::ignored(
            "Empty title ignored".to_string(),
        ))),
        Err(e) => {
            error!("Failed to add task: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle POST /tasks/plan - Expand a goal into subtasks via the generator
pub async fn plan_tasks_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<PlanRequest>,
) -> Result<Json<TaskResponse>, StatusCode> {
    match state.plan_tasks(&request.goal).await {
        Ok(PlanOutcome::Planned(added)) => Ok(Json(TaskResponse::changed(
            format!("Added {} generated subtasks", added.len()),
            added,
        ))),
        Ok(PlanOutcome::FellBack(task)) => Ok(Json(TaskResponse::fallback(
            "Generator unavailable; goal kept as a single task".to_string(),
            vec![task],
        ))),
        Ok(PlanOutcome::Ignored) => Ok(Json(TaskResponse::ignored(
            "Empty goal ignored".to_string(),
        ))),
        Ok(PlanOutcome::Busy) => Err(StatusCode::CONFLICT),
        Err(e) => {
            error!("Failed to plan tasks: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle POST /tasks/:id/toggle - Flip a task's completed flag
pub async fn toggle_task_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<TaskResponse>, StatusCode> {
    match state.toggle_task(id) {
        Ok(true) => match state.tasks() {
            Ok(tasks) => Ok(Json(TaskResponse::changed(
                "Task toggled".to_string(),
                tasks,
            ))),
            Err(e) => {
                error!("Failed to list tasks: {}", e);
                Err(StatusCode::INTERNAL_SERVER_ERROR)
            }
        },
        Ok(false) => Err(StatusCode::NOT_FOUND),
        Err(e) => {
            error!("Failed to toggle task: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle DELETE /tasks/:id - Remove a task
pub async fn delete_task_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<TaskResponse>, StatusCode> {
    match state.remove_task(id) {
        Ok(true) => match state.tasks() {
            Ok(tasks) => Ok(Json(TaskResponse::changed(
                "Task removed".to_string(),
                tasks,
            ))),
            Err(e) => {
                error!("Failed to list tasks: {}", e);
                Err(StatusCode::INTERNAL_SERVER_ERROR)
            }
        },
        Ok(false) => Err(StatusCode::NOT_FOUND),
        Err(e) => {
            error!("Failed to remove task: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle POST /sound/toggle - Mute or unmute completion alerts
pub async fn sound_toggle_handler(State(state): State<Arc<AppState>>) -> Json<SoundResponse> {
    let enabled = state.toggle_sound();
    info!("Completion alerts {}", if enabled { "enabled" } else { "muted" });
    Json(SoundResponse::new(enabled))
}

/// Handle GET /status - Return the full session status
pub async fn status_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<StatusResponse>, StatusCode> {
    let timer = match state.timer_snapshot() {
        Ok(t) => t,
        Err(e) => {
            error!("Failed to get timer state: {}", e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let tasks = match state.tasks() {
        Ok(t) => t,
        Err(e) => {
            error!("Failed to get task list: {}", e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let (last_action, last_action_time) = state.get_last_action();

    Ok(Json(StatusResponse {
        ring: RingGeometry::with_progress(timer.progress),
        timer,
        tasks,
        sound_enabled: state.sound_enabled(),
        notifications_available: state.notifier.is_available(),
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    }))
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
