//! Training statistics tracking for PPO
//!
//! This module provides utilities for tracking and monitoring training
//! progress, including episode rewards, lengths, win rate, and loss values.

use std::collections::VecDeque;

/// Training statistics tracker with rolling averages
///
/// Tracks episode-level metrics (rewards, lengths, wins against the scripted
/// bot) and training-level metrics (policy loss, value loss, entropy) using
/// rolling windows for smoothed statistics.
#[derive(Debug, Clone)]
pub struct TrainingStats {
    /// Episode rewards (rolling window)
    episode_rewards: VecDeque<f32>,

    /// Episode lengths in steps (rolling window)
    episode_lengths: VecDeque<usize>,

    /// Episode wins, 1.0 if the agent scored (rolling window)
    episode_wins: VecDeque<f32>,

    /// Policy losses (rolling window)
    policy_losses: VecDeque<f32>,

    /// Value losses (rolling window)
    value_losses: VecDeque<f32>,

    /// Entropy values (rolling window)
    entropies: VecDeque<f32>,

    /// Total number of episodes completed
    total_episodes: usize,

    /// Total number of environment steps taken
    total_steps: usize,

    /// Window size for rolling averages
    window_size: usize,
}

impl TrainingStats {
    /// Create a new training statistics tracker
    ///
    /// # Arguments
    ///
    /// * `window_size` - Number of recent values to keep for rolling averages
    pub fn new(window_size: usize) -> Self {
        Self {
            episode_rewards: VecDeque::with_capacity(window_size),
            episode_lengths: VecDeque::with_capacity(window_size),
            episode_wins: VecDeque::with_capacity(window_size),
            policy_losses: VecDeque::with_capacity(window_size),
            value_losses: VecDeque::with_capacity(window_size),
            entropies: VecDeque::with_capacity(window_size),
            total_episodes: 0,
            total_steps: 0,
            window_size,
        }
    }

    /// Record the completion of an episode
    ///
    /// # Arguments
    ///
    /// * `reward` - Total reward accumulated during the episode
    /// * `length` - Number of steps taken in the episode
    /// * `won` - Whether the agent scored the winning goal (truncated episodes
    ///   count as not won)
    pub fn record_episode(&mut self, reward: f32, length: usize, won: bool) {
        Self::push_deque(&mut self.episode_rewards, reward, self.window_size);
        Self::push_deque(&mut self.episode_lengths, length, self.window_size);
        Self::push_deque(
            &mut self.episode_wins,
            if won { 1.0 } else { 0.0 },
            self.window_size,
        );
        self.total_episodes += 1;
        self.total_steps += length;
    }

    /// Record a training update
    pub fn record_update(&mut self, policy_loss: f32, value_loss: f32, entropy: f32) {
        Self::push_deque(&mut self.policy_losses, policy_loss, self.window_size);
        Self::push_deque(&mut self.value_losses, value_loss, self.window_size);
        Self::push_deque(&mut self.entropies, entropy, self.window_size);
    }

    /// Get the mean episode reward over the rolling window
    pub fn mean_episode_reward(&self) -> f32 {
        self.mean(&self.episode_rewards)
    }

    /// Get the mean episode length over the rolling window
    pub fn mean_episode_length(&self) -> f32 {
        let sum: usize = self.episode_lengths.iter().sum();
        if self.episode_lengths.is_empty() {
            0.0
        } else {
            sum as f32 / self.episode_lengths.len() as f32
        }
    }

    /// Get the win rate over the rolling window
    pub fn win_rate(&self) -> f32 {
        self.mean(&self.episode_wins)
    }

    /// Get the mean policy loss over the rolling window
    pub fn mean_policy_loss(&self) -> f32 {
        self.mean(&self.policy_losses)
    }

    /// Get the mean value loss over the rolling window
    pub fn mean_value_loss(&self) -> f32 {
        self.mean(&self.value_losses)
    }

    /// Get the mean entropy over the rolling window
    pub fn mean_entropy(&self) -> f32 {
        self.mean(&self.entropies)
    }

    /// Get the total number of episodes completed
    pub fn total_episodes(&self) -> usize {
        self.total_episodes
    }

    /// Get the total number of environment steps taken
    pub fn total_steps(&self) -> usize {
        self.total_steps
    }

    /// Get the window size for rolling averages
    pub fn window_size(&self) -> usize {
        self.window_size
    }

    /// Format a summary of the current statistics
    pub fn format_summary(&self) -> String {
        format!(
            "Episodes: {} | Steps: {} | Reward: {:.2} | WinRate: {:.2} | Len: {:.1} | P_Loss: {:.4} | V_Loss: {:.4} | Entropy: {:.4}",
            self.total_episodes,
            self.total_steps,
            self.mean_episode_reward(),
            self.win_rate(),
            self.mean_episode_length(),
            self.mean_policy_loss(),
            self.mean_value_loss(),
            self.mean_entropy(),
        )
    }

    /// Helper function to compute mean of a VecDeque<f32>
    fn mean(&self, deque: &VecDeque<f32>) -> f32 {
        if deque.is_empty() {
            0.0
        } else {
            deque.iter().sum::<f32>() / deque.len() as f32
        }
    }

    /// Helper function to push to a deque with size limit
    fn push_deque<T>(deque: &mut VecDeque<T>, value: T, window_size: usize) {
        if deque.len() >= window_size {
            deque.pop_front();
        }
        deque.push_back(value);
    }
}
