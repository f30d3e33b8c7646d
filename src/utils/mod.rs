//! Utility functions module
//!
//! This module contains utility functions used throughout the application.

pub mod ring;
pub mod signals;

// Re-export main functions
pub use ring::{ring_geometry, RingGeometry};
pub use signals::shutdown_signal;
