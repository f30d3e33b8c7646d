//! State management module
//!
//! This module contains the timer engine, the task store, and the session
//! controller that owns them both.

pub mod app_state;
pub mod tasks;
pub mod timer;

// Re-export main types
pub use app_state::{AppState, PlanOutcome, SessionComplete};
pub use tasks::{Task, TaskStore};
pub use timer::{format_clock, ModeDurations, TickOutcome, TimerEngine, TimerMode, TimerSnapshot};
