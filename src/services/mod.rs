//! External service clients
//!
//! This module contains the subtask generation client and the desktop
//! notification capability. Both are isolated so that failures can never
//! corrupt timer or task state.

pub mod gemini;
pub mod notify;

// Re-export main types
pub use gemini::{GeminiClient, GeneratorError, SubtaskGenerator, MAX_SUBTASKS};
pub use notify::Notifier;
