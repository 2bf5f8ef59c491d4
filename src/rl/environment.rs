use super::observation::create_observation;
use crate::game::{Goal, HockeyEngine, PaddleAction, TableConfig, TableState};
use burn::tensor::{Tensor, backend::Backend};

/// Air-hockey environment for reinforcement learning
///
/// Wraps the physics engine and provides a Burn-compatible RL interface with:
/// - Tensor observations (8-dimensional normalized vector)
/// - Continuous 2D action space (force on the policy paddle)
/// - Standard RL interface (reset, step) with separate termination and
///   truncation flags
pub struct HockeyEnvironment<B: Backend> {
    engine: HockeyEngine,
    state: TableState,
    last_outcome: Option<Goal>,
    device: B::Device,
}

impl<B: Backend> HockeyEnvironment<B> {
    /// Create a new air-hockey environment
    pub fn new(config: TableConfig, device: B::Device) -> Self {
        let mut engine = HockeyEngine::new(config);
        let state = engine.reset();
        Self {
            engine,
            state,
            last_outcome: None,
            device,
        }
    }

    /// Reset the environment and return the initial observation
    ///
    /// Returns: Tensor<B, 1> with shape [8]
    pub fn reset(&mut self) -> Tensor<B, 1> {
        self.state = self.engine.reset();
        self.last_outcome = None;
        create_observation(&self.state, &self.device)
    }

    /// Step the environment with a continuous 2D action
    ///
    /// The action components are force fractions in [-1, 1]; the engine clamps
    /// out-of-range values before scaling.
    ///
    /// Returns: (observation, reward, terminated, truncated)
    /// - observation: Tensor<B, 1> with shape [8]
    /// - reward: f32 (goal rewards plus the upper-half shaping bonus)
    /// - terminated: bool (a goal was scored)
    /// - truncated: bool (step limit reached without a goal)
    pub fn step(&mut self, action: [f32; 2]) -> (Tensor<B, 1>, f32, bool, bool) {
        let result = self.engine.step(PaddleAction::from(action));
        self.state = self.engine.snapshot();
        self.last_outcome = result.outcome;

        let observation = create_observation(&self.state, &self.device);

        (observation, result.reward, result.terminated, result.truncated)
    }

    /// Get current observation without stepping
    pub fn get_observation(&self) -> Tensor<B, 1> {
        create_observation(&self.state, &self.device)
    }

    /// Goal scored on the last step, if any
    pub fn last_outcome(&self) -> Option<Goal> {
        self.last_outcome
    }

    /// Get the device used by this environment
    pub fn device(&self) -> &B::Device {
        &self.device
    }

    /// Get reference to current table state (for rendering/debugging)
    pub fn state(&self) -> &TableState {
        &self.state
    }

    /// Get reference to the table configuration
    pub fn config(&self) -> &TableConfig {
        self.engine.config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;
    use burn::backend::ndarray::NdArrayDevice;

    type TestBackend = NdArray<f32>;

    #[test]
    fn test_environment_creation() {
        let device = NdArrayDevice::default();
        let env = HockeyEnvironment::<TestBackend>::new(TableConfig::default(), device);

        assert_eq!(env.state().steps, 0);
        assert!(env.last_outcome().is_none());
    }

    #[test]
    fn test_reset_returns_valid_observation() {
        let device = NdArrayDevice::default();
        let mut env = HockeyEnvironment::<TestBackend>::new(TableConfig::default(), device);

        let obs = env.reset();
        assert_eq!(obs.shape().dims, [8]);
    }

    #[test]
    fn test_step_returns_correct_shapes() {
        let device = NdArrayDevice::default();
        let mut env = HockeyEnvironment::<TestBackend>::new(TableConfig::default(), device);

        let (obs, reward, terminated, truncated) = env.step([0.0, 0.0]);

        assert_eq!(obs.shape().dims, [8]);
        assert!(reward.is_finite());
        assert!(!(terminated && truncated));
    }

    #[test]
    fn test_step_advances_state() {
        let device = NdArrayDevice::default();
        let mut env = HockeyEnvironment::<TestBackend>::new(TableConfig::default(), device);

        env.reset();
        env.step([0.5, 0.5]);

        assert_eq!(env.state().steps, 1);
    }

    #[test]
    fn test_observation_changes_after_step() {
        let device = NdArrayDevice::default();
        let mut env = HockeyEnvironment::<TestBackend>::new(TableConfig::default(), device);

        env.reset();
        let obs1 = env.get_observation();
        env.step([1.0, 1.0]);
        let obs2 = env.get_observation();

        let data1 = obs1.to_data();
        let data2 = obs2.to_data();

        assert_ne!(
            data1.as_slice::<f32>().unwrap(),
            data2.as_slice::<f32>().unwrap()
        );
    }

    #[test]
    fn test_out_of_range_action_is_accepted() {
        let device = NdArrayDevice::default();
        let mut env = HockeyEnvironment::<TestBackend>::new(TableConfig::default(), device);

        env.reset();
        let (_obs, reward, _terminated, _truncated) = env.step([100.0, -100.0]);
        assert!(reward.is_finite());
    }

    #[test]
    fn test_truncation_at_step_limit() {
        let device = NdArrayDevice::default();
        let mut config = TableConfig::for_play();
        config.max_steps = 20;
        let mut env = HockeyEnvironment::<TestBackend>::new(config, device);

        env.reset();
        let mut truncated = false;
        for _ in 0..20 {
            let (_, _, terminated, trunc) = env.step([0.0, 0.0]);
            assert!(!terminated);
            truncated = trunc;
        }

        assert!(truncated);
    }

    #[test]
    fn test_multiple_episodes() {
        let device = NdArrayDevice::default();
        let mut config = TableConfig::default();
        config.max_steps = 50;
        let mut env = HockeyEnvironment::<TestBackend>::new(config, device);

        for _ in 0..2 {
            env.reset();
            let mut done = false;
            let mut steps = 0;

            while !done && steps < 50 {
                let (_obs, _reward, terminated, truncated) = env.step([0.0, 0.0]);
                done = terminated || truncated;
                steps += 1;
            }

            assert!(done || steps == 50);
        }
    }

    #[test]
    fn test_device_access() {
        let device = NdArrayDevice::default();
        let env = HockeyEnvironment::<TestBackend>::new(TableConfig::default(), device.clone());
        let _env_device = env.device();
    }
}
