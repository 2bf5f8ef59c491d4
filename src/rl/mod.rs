//! Reinforcement learning infrastructure for air hockey
//!
//! Provides:
//! - 8-dimensional normalized observations (ball, velocity, both paddles)
//! - Burn-compatible RL environment interface
//! - Backend-agnostic tensor operations
//! - Actor-Critic network with a Gaussian policy head for PPO training
//! - PPO algorithm configuration, training, and model persistence

pub mod backend;
pub mod buffer;
pub mod config;
pub mod environment;
pub mod network;
pub mod observation;
pub mod persistence;
pub mod ppo;

pub use backend::{InferenceBackend, TrainingBackend, default_device};
pub use buffer::RolloutBuffer;
pub use config::PPOConfig;
pub use environment::HockeyEnvironment;
pub use network::{ActorCriticConfig, ActorCriticNetwork};
pub use observation::{OBS_DIM, create_mirrored_observation, create_observation};
pub use persistence::{ModelMetadata, load_network, save_model};
pub use ppo::PPOAgent;
