//! PPO algorithm hyperparameter configuration

use serde::{Deserialize, Serialize};

/// Configuration for the PPO (Proximal Policy Optimization) algorithm
///
/// This struct contains all hyperparameters used by the PPO training loop.
/// Default values follow common PPO implementations and work well for the
/// air-hockey environment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PPOConfig {
    /// Learning rate for the Adam optimizer
    ///
    /// Default: 3e-4
    pub learning_rate: f64,

    /// Discount factor for future rewards (gamma)
    ///
    /// Values closer to 1.0 make the agent more far-sighted.
    ///
    /// Default: 0.99
    pub gamma: f32,

    /// GAE (Generalized Advantage Estimation) lambda parameter
    ///
    /// Controls the bias-variance tradeoff in advantage estimation. Higher
    /// values lean on Monte Carlo returns, lower values on TD estimates.
    ///
    /// Default: 0.95
    pub gae_lambda: f32,

    /// PPO clipping parameter (epsilon)
    ///
    /// Limits how much the policy can change in a single update.
    ///
    /// Default: 0.2
    pub clip_epsilon: f32,

    /// Coefficient for the entropy bonus in the loss function
    ///
    /// Higher values keep the Gaussian policy wider for longer.
    ///
    /// Default: 0.01
    pub entropy_coef: f32,

    /// Coefficient for the value function loss
    ///
    /// Default: 0.5
    pub value_coef: f32,

    /// Number of optimization epochs per PPO update
    ///
    /// Default: 10
    pub n_epochs: usize,

    /// Minibatch size for training
    ///
    /// Default: 64
    pub batch_size: usize,

    /// Number of environment steps to collect before performing a PPO update
    ///
    /// Also determines the rollout buffer capacity.
    ///
    /// Default: 2048
    pub rollout_steps: usize,
}

impl PPOConfig {
    /// Create a new configuration with default hyperparameters
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate configuration parameters
    ///
    /// Checks that all hyperparameters are in valid ranges.
    pub fn validate(&self) -> Result<(), String> {
        if self.learning_rate <= 0.0 {
            return Err(format!(
                "learning_rate must be positive, got {}",
                self.learning_rate
            ));
        }

        if !(0.0..=1.0).contains(&self.gamma) {
            return Err(format!("gamma must be in [0, 1], got {}", self.gamma));
        }

        if !(0.0..=1.0).contains(&self.gae_lambda) {
            return Err(format!(
                "gae_lambda must be in [0, 1], got {}",
                self.gae_lambda
            ));
        }

        if self.clip_epsilon <= 0.0 || self.clip_epsilon > 1.0 {
            return Err(format!(
                "clip_epsilon must be in (0, 1], got {}",
                self.clip_epsilon
            ));
        }

        if self.entropy_coef < 0.0 {
            return Err(format!(
                "entropy_coef must be non-negative, got {}",
                self.entropy_coef
            ));
        }

        if self.value_coef < 0.0 {
            return Err(format!(
                "value_coef must be non-negative, got {}",
                self.value_coef
            ));
        }

        if self.n_epochs == 0 {
            return Err("n_epochs must be at least 1".to_string());
        }

        if self.batch_size == 0 {
            return Err("batch_size must be at least 1".to_string());
        }

        if self.rollout_steps == 0 {
            return Err("rollout_steps must be at least 1".to_string());
        }

        if self.batch_size > self.rollout_steps {
            return Err(format!(
                "batch_size ({}) cannot exceed rollout_steps ({})",
                self.batch_size, self.rollout_steps
            ));
        }

        Ok(())
    }
}

impl Default for PPOConfig {
    fn default() -> Self {
        Self {
            learning_rate: 3e-4,
            gamma: 0.99,
            gae_lambda: 0.95,
            clip_epsilon: 0.2,
            entropy_coef: 0.01,
            value_coef: 0.5,
            n_epochs: 10,
            batch_size: 64,
            rollout_steps: 2048,
        }
    }
}
