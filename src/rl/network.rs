//! Actor-Critic neural network for the air-hockey agent
//!
//! This module implements a fully connected network with two heads:
//! - **Actor head**: Outputs the mean of a diagonal Gaussian over the 2D
//!   force action, with a state-independent learnable log standard deviation
//! - **Critic head**: Outputs value estimate for state evaluation
//!
//! # Architecture
//!
//! ```text
//! Input: [batch, 8]
//!   ↓ Linear(8 → 256) + ReLU
//!   ↓ Linear(256 → 256) + ReLU
//!   ↓ Split
//!   ├─→ Actor: Linear(256 → 2) → Action mean
//!   └─→ Critic: Linear(256 → 1) → Value estimate
//!
//! log_std: learnable [2] parameter, shared across states
//! ```
//!
//! The network processes 8-dimensional normalized observations (ball position
//! and velocity, both paddle positions).

use burn::{
    module::{Module, Param},
    nn::{Linear, LinearConfig},
    tensor::{Tensor, activation::relu, backend::Backend},
};

/// Configuration for the Actor-Critic network
#[derive(Debug, Clone)]
pub struct ActorCriticConfig {
    /// Observation dimension (default: 8)
    pub obs_dim: usize,

    /// Action dimension (default: 2 for a planar force)
    pub action_dim: usize,

    /// Hidden dimension for the two shared fully connected layers (default: 256)
    pub hidden_dim: usize,
}

impl ActorCriticConfig {
    /// Create a new configuration with default hyperparameters
    pub fn new(obs_dim: usize, action_dim: usize) -> Self {
        Self {
            obs_dim,
            action_dim,
            hidden_dim: 256,
        }
    }

    /// Initialize the Actor-Critic network from this configuration
    pub fn init<B: Backend>(&self, device: &B::Device) -> ActorCriticNetwork<B> {
        ActorCriticNetwork {
            fc1: LinearConfig::new(self.obs_dim, self.hidden_dim).init(device),
            fc2: LinearConfig::new(self.hidden_dim, self.hidden_dim).init(device),
            actor_head: LinearConfig::new(self.hidden_dim, self.action_dim).init(device),
            critic_head: LinearConfig::new(self.hidden_dim, 1).init(device),
            log_std: Param::from_tensor(Tensor::zeros([self.action_dim], device)),
        }
    }
}

impl Default for ActorCriticConfig {
    fn default() -> Self {
        Self::new(8, 2)
    }
}

/// Actor-Critic network with a Gaussian policy head
///
/// Processes observation vectors through a shared fully connected trunk and
/// outputs both the action distribution mean (policy) and value estimates
/// (critic). The standard deviation of the policy is a free parameter stored
/// in log space, so it stays positive and can be annealed by the optimizer.
///
/// The network is generic over the Backend, allowing it to run on different
/// hardware and support automatic differentiation for training (Autodiff
/// wrapper).
#[derive(Module, Debug)]
pub struct ActorCriticNetwork<B: Backend> {
    /// First shared fully connected layer
    fc1: Linear<B>,
    /// Second shared fully connected layer
    fc2: Linear<B>,
    /// Actor head: outputs the Gaussian mean per action dimension
    actor_head: Linear<B>,
    /// Critic head: outputs value estimate
    critic_head: Linear<B>,
    /// State-independent log standard deviation of the policy
    log_std: Param<Tensor<B, 1>>,
}

impl<B: Backend> ActorCriticNetwork<B> {
    /// Forward pass through the network
    ///
    /// # Arguments
    ///
    /// * `observation` - Tensor with shape `[batch, obs_dim]`
    ///
    /// # Returns
    ///
    /// A tuple of:
    /// - `action_mean`: Tensor with shape `[batch, action_dim]`
    /// - `value`: Tensor with shape `[batch, 1]` - value estimate for each state
    pub fn forward(&self, observation: Tensor<B, 2>) -> (Tensor<B, 2>, Tensor<B, 2>) {
        let x = relu(self.fc1.forward(observation));
        let x = relu(self.fc2.forward(x));

        let action_mean = self.actor_head.forward(x.clone());
        let value = self.critic_head.forward(x);

        (action_mean, value)
    }

    /// Current log standard deviation, shape `[action_dim]`
    pub fn log_std(&self) -> Tensor<B, 1> {
        self.log_std.val()
    }
}
