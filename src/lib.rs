//! ML Hockey - A 2D air-hockey game with reinforcement learning capabilities
//!
//! This library provides:
//! - Rigid-body physics for the table, ball, and paddles (game module)
//! - PPO training infrastructure built on Burn (rl module)
//! - TUI rendering of the table (render module)
//! - Keyboard and mouse input handling (input module)
//! - Training and match statistics (metrics module)
//! - Execution modes: train, play against the policy, visualize (modes module)

pub mod game;
pub mod input;
pub mod metrics;
pub mod modes;
pub mod render;
pub mod rl;
