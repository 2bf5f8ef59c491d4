//! Experience buffer for PPO trajectory collection
//!
//! This module implements a rollout buffer for storing transitions during
//! environment interaction and computing advantages using Generalized Advantage
//! Estimation (GAE).

use burn::tensor::{Tensor, TensorData, backend::Backend};
use rand::seq::SliceRandom;

/// Experience buffer for storing rollout data during PPO training
///
/// The buffer stores transitions (observations, actions, rewards, etc.)
/// collected during environment interaction. Once full, it computes advantages
/// using GAE and provides batched data for PPO updates.
///
/// # Type Parameters
///
/// * `B` - The Burn backend type for tensor operations
pub struct RolloutBuffer<B: Backend> {
    /// Stored observations [capacity] of [8] tensors
    observations: Vec<Tensor<B, 1>>,

    /// Continuous 2D actions taken [capacity]
    actions: Vec<[f32; 2]>,

    /// Log probabilities of actions [capacity]
    log_probs: Vec<f32>,

    /// Rewards received [capacity]
    rewards: Vec<f32>,

    /// Value estimates [capacity]
    values: Vec<f32>,

    /// Episode end flags (terminated or truncated) [capacity]
    dones: Vec<bool>,

    /// Current position in buffer
    pos: usize,

    /// Maximum buffer capacity
    capacity: usize,

    /// Device for tensor operations
    device: B::Device,

    /// Computed advantages (populated after GAE)
    advantages: Option<Vec<f32>>,

    /// Computed returns (populated after GAE)
    returns: Option<Vec<f32>>,
}

impl<B: Backend> RolloutBuffer<B> {
    /// Create a new rollout buffer with the given capacity
    pub fn new(capacity: usize, device: B::Device) -> Self {
        Self {
            observations: Vec::with_capacity(capacity),
            actions: Vec::with_capacity(capacity),
            log_probs: Vec::with_capacity(capacity),
            rewards: Vec::with_capacity(capacity),
            values: Vec::with_capacity(capacity),
            dones: Vec::with_capacity(capacity),
            pos: 0,
            capacity,
            device,
            advantages: None,
            returns: None,
        }
    }

    /// Add a transition to the buffer
    ///
    /// # Arguments
    ///
    /// * `observation` - State observation tensor [8]
    /// * `action` - Continuous action taken
    /// * `log_prob` - Log probability of the action under the behavior policy
    /// * `reward` - Reward received
    /// * `value` - Value estimate V(s)
    /// * `done` - Whether the episode ended (goal or step limit)
    pub fn push(
        &mut self,
        observation: Tensor<B, 1>,
        action: [f32; 2],
        log_prob: f32,
        reward: f32,
        value: f32,
        done: bool,
    ) {
        if self.pos < self.capacity {
            self.observations.push(observation);
            self.actions.push(action);
            self.log_probs.push(log_prob);
            self.rewards.push(reward);
            self.values.push(value);
            self.dones.push(done);
            self.pos += 1;
        }
    }

    /// Check if the buffer is full
    pub fn is_full(&self) -> bool {
        self.pos >= self.capacity
    }

    /// Get the number of stored transitions
    pub fn len(&self) -> usize {
        self.pos
    }

    /// Check if the buffer is empty
    pub fn is_empty(&self) -> bool {
        self.pos == 0
    }

    /// Compute advantages and returns using Generalized Advantage Estimation (GAE)
    ///
    /// ```text
    /// δ_t = r_t + γ * V(s_{t+1}) * (1 - done_{t+1}) - V(s_t)
    /// A_t = Σ_{l=0}^{T-t} (γλ)^l * δ_{t+l}
    /// R_t = A_t + V(s_t)
    /// ```
    ///
    /// Advantages are normalized to zero mean and unit variance for training
    /// stability.
    ///
    /// # Arguments
    ///
    /// * `gamma` - Discount factor for future rewards
    /// * `gae_lambda` - GAE lambda parameter for bias-variance tradeoff
    /// * `last_value` - Value estimate V(s_T) for bootstrapping the last state
    /// * `last_done` - Whether the last state ended an episode
    pub fn compute_advantages(
        &mut self,
        gamma: f32,
        gae_lambda: f32,
        last_value: f32,
        last_done: bool,
    ) {
        let n = self.len();
        if n == 0 {
            return;
        }

        let mut advantages = vec![0.0; n];
        let mut returns = vec![0.0; n];

        let mut next_value = last_value;
        let mut next_advantage = 0.0;
        let mut next_done = last_done;

        // Iterate backwards through the buffer
        for t in (0..n).rev() {
            // Mask: 0.0 if next state ends an episode, 1.0 otherwise
            let mask = if next_done { 0.0 } else { 1.0 };

            let delta = self.rewards[t] + gamma * next_value * mask - self.values[t];
            advantages[t] = delta + gamma * gae_lambda * next_advantage * mask;
            returns[t] = advantages[t] + self.values[t];

            next_value = self.values[t];
            next_advantage = advantages[t];
            next_done = self.dones[t];
        }

        // Normalize advantages: (A - mean(A)) / (std(A) + 1e-8)
        let mean = advantages.iter().sum::<f32>() / n as f32;
        let variance = advantages.iter().map(|a| (a - mean).powi(2)).sum::<f32>() / n as f32;
        let std = variance.sqrt();

        for a in &mut advantages {
            *a = (*a - mean) / (std + 1e-8);
        }

        self.advantages = Some(advantages);
        self.returns = Some(returns);
    }

    /// Get a batch of data for training
    ///
    /// # Arguments
    ///
    /// * `indices` - Indices of transitions to include in the batch
    ///
    /// # Returns
    ///
    /// A tuple containing:
    /// - observations: TensorData [batch, 8]
    /// - actions: TensorData [batch, 2]
    /// - old_log_probs: TensorData [batch]
    /// - advantages: TensorData [batch]
    /// - returns: TensorData [batch]
    ///
    /// # Panics
    ///
    /// Panics if advantages have not been computed yet or `indices` is empty.
    pub fn get_batch(
        &self,
        indices: &[usize],
    ) -> (
        TensorData, // observations [batch, 8]
        TensorData, // actions [batch, 2]
        TensorData, // old_log_probs [batch]
        TensorData, // advantages [batch]
        TensorData, // returns [batch]
    ) {
        let advantages = self
            .advantages
            .as_ref()
            .expect("Advantages must be computed before getting batches");
        let returns = self
            .returns
            .as_ref()
            .expect("Returns must be computed before getting batches");
        assert!(!indices.is_empty(), "Cannot create batch from empty indices");

        // Stack observation vectors into [batch, obs_dim]
        let obs_batch: Vec<Tensor<B, 1>> = indices
            .iter()
            .map(|&i| self.observations[i].clone())
            .collect();
        let obs_tensor: Tensor<B, 2> = Tensor::stack(obs_batch, 0);

        let actions_data: Vec<f32> = indices
            .iter()
            .flat_map(|&i| self.actions[i])
            .collect();
        let actions = TensorData::new(actions_data, [indices.len(), 2]);

        let log_probs_data: Vec<f32> = indices.iter().map(|&i| self.log_probs[i]).collect();
        let log_probs_tensor: Tensor<B, 1> =
            Tensor::from_floats(log_probs_data.as_slice(), &self.device);

        let advantages_data: Vec<f32> = indices.iter().map(|&i| advantages[i]).collect();
        let advantages_tensor: Tensor<B, 1> =
            Tensor::from_floats(advantages_data.as_slice(), &self.device);

        let returns_data: Vec<f32> = indices.iter().map(|&i| returns[i]).collect();
        let returns_tensor: Tensor<B, 1> =
            Tensor::from_floats(returns_data.as_slice(), &self.device);

        (
            obs_tensor.into_data(),
            actions,
            log_probs_tensor.into_data(),
            advantages_tensor.into_data(),
            returns_tensor.into_data(),
        )
    }

    /// Sample random batch indices for minibatch training
    ///
    /// The last batch may be smaller if the buffer size is not evenly divisible
    /// by the batch size.
    pub fn sample_indices(&self, batch_size: usize) -> Vec<Vec<usize>> {
        let n = self.len();
        let mut indices: Vec<usize> = (0..n).collect();

        let mut rng = rand::thread_rng();
        indices.shuffle(&mut rng);

        let mut batches = Vec::new();
        for chunk in indices.chunks(batch_size) {
            batches.push(chunk.to_vec());
        }

        batches
    }

    /// Clear the buffer for the next rollout
    pub fn clear(&mut self) {
        self.observations.clear();
        self.actions.clear();
        self.log_probs.clear();
        self.rewards.clear();
        self.values.clear();
        self.dones.clear();
        self.pos = 0;
        self.advantages = None;
        self.returns = None;
    }
}
