//! PPO (Proximal Policy Optimization) agent implementation
//!
//! This module implements the PPO algorithm for training the air-hockey agent.
//! The policy is a diagonal Gaussian over the 2D paddle force, so action
//! selection samples from a normal distribution around the network's mean
//! output. It includes action selection, loss computation, and parameter
//! updates.

use super::buffer::RolloutBuffer;
use super::config::PPOConfig;
use super::network::ActorCriticNetwork;
use burn::{
    module::AutodiffModule,
    optim::{Adam, AdamConfig, GradientsParams, Optimizer, adaptor::OptimizerAdaptor},
    tensor::{Distribution, ElementConversion, Tensor, backend::AutodiffBackend},
};

/// ln(2π), used by the Gaussian log density
const LN_2PI: f32 = 1.837_877_1;

/// PPO agent for reinforcement learning
///
/// Combines an actor-critic neural network with the PPO training algorithm.
/// Manages experience collection, advantage estimation, and policy
/// optimization.
///
/// # Type Parameters
///
/// * `B` - Autodiff backend for gradient computation
pub struct PPOAgent<B: AutodiffBackend> {
    /// Actor-Critic neural network
    network: ActorCriticNetwork<B>,

    /// Adam optimizer for network parameters
    optim: OptimizerAdaptor<Adam, ActorCriticNetwork<B>, B>,

    /// PPO hyperparameters
    config: PPOConfig,

    /// Experience buffer for rollout data
    buffer: RolloutBuffer<B::InnerBackend>,

    /// Training step counter
    training_step: usize,

    /// Episode counter
    episodes_trained: usize,

    /// Observation dimension (for model persistence)
    obs_dim: usize,

    /// Action dimension (for model persistence)
    action_dim: usize,

    /// Device for tensor operations
    device: B::Device,
}

impl<B: AutodiffBackend> PPOAgent<B> {
    /// Create a new PPO agent
    ///
    /// # Panics
    ///
    /// Panics if the PPO configuration fails validation.
    pub fn new(
        network: ActorCriticNetwork<B>,
        config: PPOConfig,
        obs_dim: usize,
        action_dim: usize,
        device: B::Device,
    ) -> Self {
        config.validate().expect("Invalid PPO configuration");

        let optim = AdamConfig::new().init();
        let buffer = RolloutBuffer::new(config.rollout_steps, device.clone());

        Self {
            network,
            optim,
            config,
            buffer,
            training_step: 0,
            episodes_trained: 0,
            obs_dim,
            action_dim,
            device,
        }
    }

    /// Select an action from an observation during rollout
    ///
    /// Samples a force vector from the Gaussian policy and returns the action,
    /// its log probability, and the value estimate.
    ///
    /// # Arguments
    ///
    /// * `observation` - State observation tensor [8]
    ///
    /// # Returns
    ///
    /// A tuple containing:
    /// - `action` - Sampled 2D force fractions (unclamped)
    /// - `log_prob` - Log probability of the sampled action
    /// - `value` - Value estimate V(s)
    pub fn select_action(&self, observation: Tensor<B::InnerBackend, 1>) -> ([f32; 2], f32, f32) {
        let device = observation.device();

        // Add batch dimension
        let obs_batch = observation.unsqueeze_dim(0); // [1, 8]

        // Forward pass in valid (no-grad) mode
        let network = self.network.clone().valid();
        let (mean, value) = network.forward(obs_batch);
        let log_std = network.log_std();

        let mean_data = mean.into_data();
        let mean_vals = mean_data.as_slice::<f32>().expect("mean tensor data");
        let log_std_data = log_std.into_data();
        let log_std_vals = log_std_data.as_slice::<f32>().expect("log_std tensor data");

        // Reparameterized sample: a = μ + z * σ with z ~ N(0, 1)
        let noise = Tensor::<B::InnerBackend, 1>::random(
            [self.action_dim],
            Distribution::Normal(0.0, 1.0),
            &device,
        );
        let noise_data = noise.into_data();
        let z = noise_data.as_slice::<f32>().expect("noise tensor data");

        let mut action = [0.0f32; 2];
        let mut log_prob = 0.0f32;
        for i in 0..2 {
            let std = log_std_vals[i].exp();
            action[i] = mean_vals[i] + z[i] * std;
            log_prob += -0.5 * z[i] * z[i] - log_std_vals[i] - 0.5 * LN_2PI;
        }

        let value_scalar = value.squeeze::<1>(1).into_scalar().elem::<f32>();

        (action, log_prob, value_scalar)
    }

    /// Store a transition in the buffer
    pub fn store_transition(
        &mut self,
        observation: Tensor<B::InnerBackend, 1>,
        action: [f32; 2],
        log_prob: f32,
        reward: f32,
        value: f32,
        done: bool,
    ) {
        self.buffer
            .push(observation, action, log_prob, reward, value, done);
    }

    /// Check if the buffer is full and ready for update
    pub fn should_update(&self) -> bool {
        self.buffer.is_full()
    }

    /// Perform a PPO update
    ///
    /// Computes advantages using GAE, then performs multiple epochs of
    /// minibatch updates using the clipped PPO objective.
    ///
    /// # Arguments
    ///
    /// * `last_value` - Value estimate for the last state (for bootstrapping)
    /// * `last_done` - Whether the last state ended an episode
    ///
    /// # Returns
    ///
    /// A tuple containing:
    /// - `policy_loss` - Average policy loss
    /// - `value_loss` - Average value loss
    /// - `entropy` - Average policy entropy
    /// - `total_loss` - Average total loss
    pub fn update(&mut self, last_value: f32, last_done: bool) -> (f32, f32, f32, f32) {
        self.buffer.compute_advantages(
            self.config.gamma,
            self.config.gae_lambda,
            last_value,
            last_done,
        );

        let mut total_policy_loss = 0.0;
        let mut total_value_loss = 0.0;
        let mut total_entropy = 0.0;
        let mut n_updates = 0;

        for _epoch in 0..self.config.n_epochs {
            let batch_indices = self.buffer.sample_indices(self.config.batch_size);

            for indices in batch_indices {
                let (obs_data, actions_data, old_log_probs_data, advantages_data, returns_data) =
                    self.buffer.get_batch(&indices);

                // Construct tensors directly on autodiff backend
                let obs: Tensor<B, 2> = Tensor::from_data(obs_data, &self.device);
                let actions: Tensor<B, 2> = Tensor::from_data(actions_data, &self.device);
                let old_log_probs: Tensor<B, 1> =
                    Tensor::from_data(old_log_probs_data, &self.device);
                let advantages: Tensor<B, 1> = Tensor::from_data(advantages_data, &self.device);
                let returns: Tensor<B, 1> = Tensor::from_data(returns_data, &self.device);

                // Forward pass
                let (mean, values) = self.network.forward(obs);
                let log_std = self.network.log_std();

                let (policy_loss, entropy) = self.compute_policy_loss(
                    &mean,
                    &log_std,
                    &actions,
                    &old_log_probs,
                    &advantages,
                );

                let value_loss = self.compute_value_loss(&values, &returns);

                // Total loss: L_policy - c_entropy * H + c_value * L_value
                let total_loss = policy_loss.clone() - entropy.clone() * self.config.entropy_coef
                    + value_loss.clone() * self.config.value_coef;

                // Backward pass
                let grads = total_loss.backward();

                let grads = GradientsParams::from_grads(grads, &self.network);
                self.network =
                    self.optim
                        .step(self.config.learning_rate, self.network.clone(), grads);

                total_policy_loss += policy_loss.into_scalar().elem::<f32>();
                total_value_loss += value_loss.into_scalar().elem::<f32>();
                total_entropy += entropy.into_scalar().elem::<f32>();
                n_updates += 1;
            }
        }

        // Clear buffer for next rollout
        self.buffer.clear();
        self.training_step += 1;

        let n = n_updates as f32;
        (
            total_policy_loss / n,
            total_value_loss / n,
            total_entropy / n,
            (total_policy_loss + total_value_loss) / n,
        )
    }

    /// Compute the clipped PPO policy loss
    ///
    /// Implements the clipped surrogate objective:
    /// L = -E[min(r * A, clip(r, 1-ε, 1+ε) * A)]
    /// where r = π_new(a|s) / π_old(a|s) under the diagonal Gaussian policy.
    fn compute_policy_loss(
        &self,
        mean: &Tensor<B, 2>,
        log_std: &Tensor<B, 1>,
        actions: &Tensor<B, 2>,
        old_log_probs: &Tensor<B, 1>,
        advantages: &Tensor<B, 1>,
    ) -> (Tensor<B, 1>, Tensor<B, 1>) {
        let new_log_probs = gaussian_log_prob(mean, log_std, actions);

        // Probability ratio: r = exp(log π_new - log π_old)
        let ratio = (new_log_probs - old_log_probs.clone()).exp();

        // Clipped surrogate objective
        let surr1 = ratio.clone() * advantages.clone();
        let surr2 = ratio.clamp(
            1.0 - self.config.clip_epsilon,
            1.0 + self.config.clip_epsilon,
        ) * advantages.clone();

        // Policy loss: -E[min(surr1, surr2)]
        let policy_loss = surr1.min_pair(surr2).neg().mean();

        // Diagonal Gaussian entropy: Σ_i (log σ_i + (1 + ln 2π) / 2)
        let entropy = (log_std.clone() + 0.5 * (1.0 + LN_2PI)).sum();

        (policy_loss, entropy)
    }

    /// Compute the value function loss (MSE)
    ///
    /// L = E[(V(s) - R)²]
    fn compute_value_loss(&self, values: &Tensor<B, 2>, returns: &Tensor<B, 1>) -> Tensor<B, 1> {
        let values = values.clone().squeeze(1); // [batch]
        let diff = values - returns.clone();
        (diff.clone() * diff).mean()
    }

    /// Get the current training step
    pub fn training_step(&self) -> usize {
        self.training_step
    }

    /// Get a reference to the neural network
    pub fn network(&self) -> &ActorCriticNetwork<B> {
        &self.network
    }

    /// Get a reference to the PPO configuration
    pub fn config(&self) -> &PPOConfig {
        &self.config
    }

    /// Get the observation dimension
    pub fn obs_dim(&self) -> usize {
        self.obs_dim
    }

    /// Get the action dimension
    pub fn action_dim(&self) -> usize {
        self.action_dim
    }

    /// Get the number of episodes trained
    pub fn episodes_trained(&self) -> usize {
        self.episodes_trained
    }

    /// Increment the episode counter
    pub fn increment_episode(&mut self) {
        self.episodes_trained += 1;
    }
}

/// Log density of a batch of actions under a diagonal Gaussian policy
///
/// # Arguments
///
/// * `mean` - Distribution means [batch, action_dim]
/// * `log_std` - Log standard deviations [action_dim]
/// * `actions` - Actions to score [batch, action_dim]
///
/// # Returns
///
/// Log probabilities [batch], summed over the action dimensions
pub fn gaussian_log_prob<B: burn::tensor::backend::Backend>(
    mean: &Tensor<B, 2>,
    log_std: &Tensor<B, 1>,
    actions: &Tensor<B, 2>,
) -> Tensor<B, 1> {
    let log_std_row: Tensor<B, 2> = log_std.clone().unsqueeze_dim(0); // [1, action_dim]
    let std_row = log_std_row.clone().exp();

    let z = (actions.clone() - mean.clone()) / std_row;

    // Per-dimension: -z²/2 - log σ - ln(2π)/2, then sum over dimensions
    let per_dim = z.clone() * z * (-0.5) - log_std_row - 0.5 * LN_2PI;
    per_dim.sum_dim(1).squeeze(1)
}
