//! Luplup - a state-managed focus timer service
//!
//! This library provides a Pomodoro-style countdown with three session
//! modes, an in-memory task list, and optional AI-assisted expansion of a
//! goal into subtasks via the Gemini API.

pub mod api;
pub mod config;
pub mod services;
pub mod state;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use api::create_router;
pub use config::Config;
pub use state::AppState;
pub use utils::signals::shutdown_signal;
