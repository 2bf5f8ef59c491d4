//! Core air-hockey simulation
//!
//! This module contains the physics table and rules without any I/O or
//! rendering dependencies. It can be driven programmatically for both human
//! play and RL training.

pub mod action;
pub mod bot;
pub mod config;
pub mod engine;
pub mod state;

// Re-export commonly used types
pub use action::PaddleAction;
pub use bot::Bot;
pub use config::TableConfig;
pub use engine::{HockeyEngine, StepResult};
pub use state::{BodyState, Goal, TableState, Vec2};
