//! API response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::state::{Task, TimerSnapshot};
use crate::utils::RingGeometry;

/// API response structure for timer mutation endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub timer: TimerSnapshot,
    pub ring: RingGeometry,
}

impl TimerResponse {
    /// Create a response from the snapshot produced by a timer operation
    pub fn new(message: String, timer: TimerSnapshot) -> Self {
        let status = if timer.running { "running" } else { "paused" };
        Self {
            status: status.to_string(),
            message,
            timestamp: Utc::now(),
            ring: RingGeometry::with_progress(timer.progress),
            timer,
        }
    }
}

/// API response structure for task mutation endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub tasks: Vec<Task>,
}

impl TaskResponse {
    pub fn new(status: &str, message: String, tasks: Vec<Task>) -> Self {
        Self {
            status: status.to_string(),
            message,
            timestamp: Utc::now(),
            tasks,
        }
    }

    /// Tasks were added or changed
    pub fn changed(message: String, tasks: Vec<Task>) -> Self {
        Self::new("ok", message, tasks)
    }

    /// The request reduced to a no-op (blank input, unknown id)
    pub fn ignored(message: String) -> Self {
        Self::new("ignored", message, Vec::new())
    }

    /// The generator declined and the goal was kept as a plain task
    pub fn fallback(message: String, tasks: Vec<Task>) -> Self {
        Self::new("fallback", message, tasks)
    }
}

/// Full session status: timer, ring geometry, and task list
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub timer: TimerSnapshot,
    pub ring: RingGeometry,
    pub tasks: Vec<Task>,
    pub sound_enabled: bool,
    pub notifications_available: bool,
    pub uptime: String,
    pub port: u16,
    pub host: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}

/// Response for the alert mute toggle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SoundResponse {
    pub status: String,
    pub sound_enabled: bool,
    pub timestamp: DateTime<Utc>,
}

impl SoundResponse {
    pub fn new(sound_enabled: bool) -> Self {
        Self {
            status: "ok".to_string(),
            sound_enabled,
            timestamp: Utc::now(),
        }
    }
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    /// Create a new health response
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
